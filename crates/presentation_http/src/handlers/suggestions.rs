//! WebSocket suggestion channel
//!
//! Each connection owns one [`SuggestionSession`]. The client reports what
//! happens in its search box; the server pushes every published snapshot.
//! Closing the socket drops the session, which cancels pending work.

use application::{SuggestionSession, SuggestionSnapshot};
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use domain::{ResolvedLocation, SuggestionCandidate};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::state::AppState;

/// Messages sent by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// The search box text changed
    Input { text: String },
    /// A suggestion was chosen
    Select { index: usize },
    /// The search box regained focus
    Focus,
    /// The search box lost focus
    Blur,
}

/// Messages sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A new snapshot of the list
    Suggestions {
        generation: u64,
        candidates: Vec<SuggestionCandidate>,
        visible: bool,
    },
    /// The chosen suggestion, resolved without another lookup
    Selected { location: ResolvedLocation },
    /// The last client message could not be handled
    Error { code: String, message: String },
}

impl From<SuggestionSnapshot> for ServerMessage {
    fn from(snapshot: SuggestionSnapshot) -> Self {
        Self::Suggestions {
            generation: snapshot.generation,
            candidates: snapshot.candidates,
            visible: snapshot.visible,
        }
    }
}

impl ServerMessage {
    fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Apply one client frame to the session, returning an immediate reply if any
pub fn handle_client_text(session: &SuggestionSession, text: &str) -> Option<ServerMessage> {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            debug!(error = %e, "Unreadable client message");
            return Some(ServerMessage::error("bad_request", e.to_string()));
        },
    };

    match message {
        ClientMessage::Input { text } => {
            session.on_input(text);
            None
        },
        ClientMessage::Select { index } => Some(session.select(index).map_or_else(
            || ServerMessage::error("invalid_selection", format!("no suggestion at index {index}")),
            |location| ServerMessage::Selected { location },
        )),
        ClientMessage::Focus => {
            session.focus();
            None
        },
        ClientMessage::Blur => {
            session.blur();
            None
        },
    }
}

/// `GET /v1/location/suggestions` (WebSocket upgrade)
#[instrument(skip_all)]
pub async fn suggestions(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| {
        let session = state.location_service.suggestion_session();
        run_session(socket, session)
    })
}

async fn send(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), axum::Error> {
    let json = serde_json::to_string(message).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

async fn run_session(mut socket: WebSocket, session: SuggestionSession) {
    let mut updates = session.subscribe();
    debug!("Suggestion session opened");

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        debug!(error = %e, "Suggestion socket failed");
                        break;
                    },
                };
                if let Some(reply) = handle_client_text(&session, text.as_str()) {
                    if let Err(e) = send(&mut socket, &reply).await {
                        warn!(error = %e, "Failed to send reply");
                        break;
                    }
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if let Err(e) = send(&mut socket, &ServerMessage::from(snapshot)).await {
                    debug!(error = %e, "Client went away");
                    break;
                }
            }
        }
    }

    debug!(generation = session.generation(), "Suggestion session closed");
}
