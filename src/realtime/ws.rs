use std::collections::HashMap;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::realtime::JobEventHub;
use crate::AppState;

/// Client-to-server frames. A viewer joins the room of the job it is
/// displaying and leaves when navigating away; the connection itself may
/// hold several rooms at once.
#[derive(Debug, Deserialize)]
#[serde(tag = "action")]
enum ClientFrame {
    #[serde(rename = "join-job-room", rename_all = "camelCase")]
    JoinJobRoom { job_id: Uuid },
    #[serde(rename = "leave-job-room", rename_all = "camelCase")]
    LeaveJobRoom { job_id: Uuid },
}

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| client_loop(socket, state.events))
}

async fn client_loop(mut socket: WebSocket, hub: JobEventHub) {
    let (out_tx, mut out_rx) = mpsc::channel::<String>(32);
    let mut rooms: HashMap<Uuid, JoinHandle<()>> = HashMap::new();

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        handle_frame(&text, &hub, &out_tx, &mut rooms).await;
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            Some(payload) = out_rx.recv() => {
                if socket.send(Message::Text(payload)).await.is_err() {
                    break;
                }
            }
        }
    }

    for (job_id, handle) in rooms.drain() {
        handle.abort();
        hub.remove_if_idle(job_id).await;
    }
}

async fn handle_frame(
    text: &str,
    hub: &JobEventHub,
    out_tx: &mpsc::Sender<String>,
    rooms: &mut HashMap<Uuid, JoinHandle<()>>,
) {
    let frame: ClientFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(error = ?e, "ignoring malformed realtime frame");
            return;
        }
    };

    match frame {
        ClientFrame::JoinJobRoom { job_id } => {
            if rooms.contains_key(&job_id) {
                return;
            }
            let mut receiver = hub.subscribe(job_id).await;
            let out = out_tx.clone();
            let handle = tokio::spawn(async move {
                loop {
                    match receiver.recv().await {
                        Ok(event) => match serde_json::to_string(&event) {
                            Ok(payload) => {
                                if out.send(payload).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::warn!(error = ?e, "failed to serialize job event");
                            }
                        },
                        // lagged subscribers skip missed events; clients
                        // reconcile by re-fetching comments
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
            });
            rooms.insert(job_id, handle);
        }
        ClientFrame::LeaveJobRoom { job_id } => {
            if let Some(handle) = rooms.remove(&job_id) {
                handle.abort();
                hub.remove_if_idle(job_id).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_and_leave_frames_parse() {
        let job_id = Uuid::new_v4();
        let frame: ClientFrame = serde_json::from_str(&format!(
            r#"{{"action":"join-job-room","jobId":"{}"}}"#,
            job_id
        ))
        .unwrap();
        assert!(matches!(frame, ClientFrame::JoinJobRoom { job_id: id } if id == job_id));

        let frame: ClientFrame = serde_json::from_str(&format!(
            r#"{{"action":"leave-job-room","jobId":"{}"}}"#,
            job_id
        ))
        .unwrap();
        assert!(matches!(frame, ClientFrame::LeaveJobRoom { job_id: id } if id == job_id));
    }

    #[test]
    fn unknown_actions_are_rejected() {
        assert!(serde_json::from_str::<ClientFrame>(
            r#"{"action":"subscribe-all"}"#
        )
        .is_err());
    }
}
