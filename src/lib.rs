//! MA'AT Engine - real-time principle resonance scoring
//!
//! Scores free text against a fixed table of MA'AT principles and delivers
//! the result either as a direct response or as a broadcast to every
//! listener attached to the streaming channel.
//!
//! ## Components
//!
//! - **Scorer**: keyword/sentiment scoring, pure apart from injected
//!   randomness and clock
//! - **Registry**: concurrency-safe listener set with isolated, time-bounded
//!   fan-out
//! - **Server**: hyper HTTP/WebSocket transport over both

pub mod config;
pub mod principles;
pub mod registry;
pub mod routes;
pub mod scorer;
pub mod server;
pub mod types;

pub use config::Args;
pub use principles::{Principle, PrincipleTable};
pub use registry::{ConnectionHandle, ConnectionRegistry, PublishReport, RegistryConfig};
pub use scorer::{EmotionalField, ScoreResult, Scorer};
pub use server::{run, AppState};
pub use types::{MaatError, Result};
