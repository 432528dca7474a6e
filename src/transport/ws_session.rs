use crate::game::room::session::SessionIo;
use crate::game::room::Room;
use crate::protocol::decode_client_message;
use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

const SEND_TIMEOUT: Duration = Duration::from_secs(5);

fn close_message(reason: &str) -> Message {
  Message::Close(Some(CloseFrame {
    code: close_code::NORMAL,
    reason: Cow::Owned(reason.to_string()),
  }))
}

pub async fn handle_socket(socket: WebSocket, room: Arc<Room>, player_id: String) {
  let (mut sender, mut receiver) = socket.split();
  let session = match room.join(player_id.clone()).await {
    Ok(session) => session,
    Err(rejection) => {
      tracing::info!(%player_id, ?rejection, "join refused");
      let _ = sender.send(close_message(rejection.close_reason())).await;
      return;
    }
  };
  let SessionIo {
    player_id,
    inbound,
    outbound,
  } = session;
  let mut frames = outbound.frames;
  let mut close = outbound.close;

  let mut send_task = tokio::spawn(async move {
    loop {
      tokio::select! {
        biased;
        Some(payload) = frames.recv() => {
          match tokio::time::timeout(SEND_TIMEOUT, sender.send(Message::Text(payload))).await {
            Ok(Ok(())) => {}
            _ => return,
          }
        }
        reason = &mut close => {
          if let Ok(reason) = reason {
            let _ = tokio::time::timeout(SEND_TIMEOUT, sender.send(close_message(&reason))).await;
          }
          return;
        }
      }
    }
  });

  loop {
    tokio::select! {
      message = receiver.next() => {
        let Some(Ok(message)) = message else { break };
        match message {
          Message::Text(text) => {
            if let Some(message) = decode_client_message(&text) {
              inbound.apply(message);
            }
          }
          Message::Close(_) => break,
          _ => {}
        }
      }
      _ = &mut send_task => break,
    }
  }

  room.remove_session(&player_id).await;
  send_task.abort();
}
