//! Real-time WebSocket validation feed
//!
//! ## Protocol
//!
//! Connect: `ws://localhost:8000/ws`
//!
//! Every text frame a client sends is scored once, and the serialized result
//! is broadcast to *all* attached clients, not only the sender. Ping frames
//! are answered with pong; binary frames are ignored.

use futures_util::{SinkExt, StreamExt};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use crate::registry::{ConnectionHandle, ListenerReceiver};
use crate::server::AppState;
use crate::types::{MaatError, Result};

/// WebSocket type after upgrade
type HyperWebSocket =
    hyper_tungstenite::WebSocketStream<hyper_util::rt::TokioIo<hyper::upgrade::Upgraded>>;

/// Characters of the inbound message echoed into the log line
const LOG_PREVIEW_CHARS: usize = 50;

/// Handle WebSocket upgrade for the validation feed
pub async fn handle_stream(state: Arc<AppState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    if !hyper_tungstenite::is_upgrade_request(&req) {
        return super::error_response(MaatError::BadRequest(
            "WebSocket upgrade required".to_string(),
        ));
    }

    // Slot is reserved before the upgrade; the capacity check and insert are one step
    let Some((handle, outbound)) = state.registry.try_attach() else {
        warn!(
            listeners = state.registry.listener_count(),
            "Refusing stream connection, listener capacity reached"
        );
        return super::json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"error": "Listener capacity reached"}"#.to_string(),
        );
    };

    let (response, websocket) = match hyper_tungstenite::upgrade(req, None) {
        Ok((resp, ws)) => (resp, ws),
        Err(e) => {
            state.registry.detach(&handle);
            error!("WebSocket upgrade failed: {}", e);
            return super::error_response(MaatError::WebSocket(format!(
                "WebSocket upgrade failed: {}",
                e
            )));
        }
    };

    tokio::spawn(async move {
        match websocket.await {
            Ok(ws) => {
                let ws: HyperWebSocket = ws;
                if let Err(e) = handle_listener(ws, state, handle, outbound).await {
                    warn!("Stream WebSocket error: {}", e);
                }
            }
            Err(e) => {
                state.registry.detach(&handle);
                error!("WebSocket connection failed: {}", e);
            }
        }
    });

    let (parts, _body) = response.into_parts();
    Response::from_parts(parts, Full::new(Bytes::new()))
}

/// Serve one attached listener until it closes or is detached
///
/// Inbound text is handed to a per-connection publisher task, so this loop
/// keeps draining `outbound` while broadcasts (including the one addressed
/// to this listener) are in flight. When the publisher falls behind, reading
/// from the socket pauses instead of queueing without bound.
async fn handle_listener(
    ws: HyperWebSocket,
    state: Arc<AppState>,
    handle: ConnectionHandle,
    mut outbound: ListenerReceiver,
) -> Result<()> {
    let (mut sender, mut receiver) = ws.split();
    let (inbound_tx, inbound_rx) = mpsc::channel(state.registry.config().queue_capacity.max(1));
    tokio::spawn(publish_inbound(Arc::clone(&state), handle, inbound_rx));

    info!(
        %handle,
        total = state.registry.listener_count(),
        "☥ New client connected"
    );

    let outcome = loop {
        tokio::select! {
            // Broadcast payload queued for this listener
            payload = outbound.recv() => {
                match payload {
                    Some(json) => {
                        if let Err(e) = sender.send(WsMessage::Text(json)).await {
                            break Err(MaatError::from(e));
                        }
                    }
                    // Registry dropped us after a failed delivery
                    None => break Ok(()),
                }
            }

            // Message from client
            msg = receiver.next(), if inbound_tx.capacity() > 0 => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        if inbound_tx.try_send(text).is_err() {
                            break Err(MaatError::Internal("stream publisher stopped".to_string()));
                        }
                    }
                    Some(Ok(WsMessage::Ping(data))) => {
                        let _ = sender.send(WsMessage::Pong(data)).await;
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break Ok(()),
                    Some(Ok(WsMessage::Binary(_))) => {
                        debug!(%handle, "Ignoring binary frame");
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(MaatError::from(e)),
                }
            }
        }
    };

    drop(inbound_tx);
    state.registry.detach(&handle);
    info!(
        %handle,
        total = state.registry.listener_count(),
        "☥ Client disconnected"
    );
    outcome
}

/// Score and broadcast one listener's messages in arrival order
async fn publish_inbound(
    state: Arc<AppState>,
    sender: ConnectionHandle,
    mut inbound: mpsc::Receiver<String>,
) {
    while let Some(text) = inbound.recv().await {
        validate_and_broadcast(&state, sender, &text).await;
    }
}

/// Score one inbound message and fan the result out to every listener
async fn validate_and_broadcast(state: &AppState, sender: ConnectionHandle, text: &str) {
    let result = state.scorer.score(text);
    let payload = match result.to_json() {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize score result: {}", e);
            return;
        }
    };

    let report = state.registry.publish_all(&payload).await;

    info!(
        %sender,
        delivered = report.delivered,
        failed = report.failed.len(),
        "☥ Validated: \"{}...\" -> Coherence: {:.1}%",
        preview(text),
        result.coherence
    );
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
