//! HTTP server and shared application state

mod http;

pub use http::{run, serve};

use std::sync::Arc;
use std::time::Instant;

use crate::config::Args;
use crate::principles::PrincipleTable;
use crate::registry::ConnectionRegistry;
use crate::scorer::Scorer;
use crate::types::Result;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Scorer over the immutable principle table
    pub scorer: Arc<Scorer>,
    /// Attached streaming listeners
    pub registry: Arc<ConnectionRegistry>,
    pub started_at: Instant,
}

impl AppState {
    /// Create AppState with the default randomness and clock sources
    pub fn new(args: Args, table: PrincipleTable) -> Self {
        let scorer = Arc::new(Scorer::new(Arc::new(table)));
        let registry = Arc::new(ConnectionRegistry::new(args.registry_config()));
        Self::with_parts(args, scorer, registry)
    }

    /// Create AppState from prebuilt components
    pub fn with_parts(args: Args, scorer: Arc<Scorer>, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            args,
            scorer,
            registry,
            started_at: Instant::now(),
        }
    }

    /// Load the principle table named by the arguments, or the built-in one
    pub fn from_args(args: Args) -> Result<Self> {
        let table = match &args.principles_file {
            Some(path) => PrincipleTable::load(path)?,
            None => PrincipleTable::default(),
        };
        Ok(Self::new(args, table))
    }
}
