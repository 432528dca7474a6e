use crate::game::constants::{OUTBOUND_QUEUE_CAPACITY, STALLED_TICK_LIMIT};
use crate::game::snake::Snake;
use crate::game::types::Direction;
use crate::protocol::ClientMessage;
use crate::shared::names::sanitize_player_name;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::sync::{Mutex as StdMutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone)]
struct SessionInboundState {
  heading: Direction,
  pending_direction: Option<Direction>,
  pending_name: Option<String>,
}

#[derive(Debug)]
pub struct SessionInbound {
  inner: StdMutex<SessionInboundState>,
}

impl SessionInbound {
  pub(crate) fn new() -> Self {
    Self {
      inner: StdMutex::new(SessionInboundState {
        heading: Direction::Right,
        pending_direction: None,
        pending_name: None,
      }),
    }
  }

  fn lock(&self) -> MutexGuard<'_, SessionInboundState> {
    self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  pub(crate) fn apply(&self, message: ClientMessage) {
    match message {
      ClientMessage::Turn(direction) => {
        self.request_direction(direction);
      }
      ClientMessage::Name(name) => self.request_name(&name),
    }
  }

  pub(crate) fn request_direction(&self, direction: Direction) -> bool {
    let mut state = self.lock();
    if direction.is_opposite(state.heading) {
      return false;
    }
    state.pending_direction = Some(direction);
    true
  }

  pub(crate) fn request_name(&self, name: &str) {
    self.lock().pending_name = Some(sanitize_player_name(name, ""));
  }

  pub(crate) fn drain_into(&self, snake: &mut Snake) -> Option<String> {
    let mut state = self.lock();
    if let Some(direction) = state.pending_direction.take() {
      snake.set_direction(direction);
    }
    state.heading = snake.direction();
    state.pending_name.take()
  }

  #[cfg(test)]
  pub(crate) fn pending_direction(&self) -> Option<Direction> {
    self.lock().pending_direction
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
  Sent,
  Dropped,
  Stalled,
  Closed,
}

#[derive(Debug)]
pub struct SessionOutbound {
  frames: mpsc::Sender<String>,
  close: StdMutex<Option<oneshot::Sender<String>>>,
  stalled_ticks: AtomicU32,
}

pub struct OutboundReceivers {
  pub frames: mpsc::Receiver<String>,
  pub close: oneshot::Receiver<String>,
}

impl SessionOutbound {
  pub(crate) fn channel() -> (Arc<Self>, OutboundReceivers) {
    let (frames_tx, frames_rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
    let (close_tx, close_rx) = oneshot::channel();
    let outbound = Arc::new(Self {
      frames: frames_tx,
      close: StdMutex::new(Some(close_tx)),
      stalled_ticks: AtomicU32::new(0),
    });
    (
      outbound,
      OutboundReceivers {
        frames: frames_rx,
        close: close_rx,
      },
    )
  }

  pub(crate) fn send_frame(&self, payload: String) -> SendOutcome {
    match self.frames.try_send(payload) {
      Ok(()) => {
        self.stalled_ticks.store(0, Ordering::Relaxed);
        SendOutcome::Sent
      }
      Err(mpsc::error::TrySendError::Full(_)) => {
        let stalled = self.stalled_ticks.fetch_add(1, Ordering::Relaxed) + 1;
        if stalled >= STALLED_TICK_LIMIT {
          SendOutcome::Stalled
        } else {
          SendOutcome::Dropped
        }
      }
      Err(mpsc::error::TrySendError::Closed(_)) => SendOutcome::Closed,
    }
  }

  pub(crate) fn close(&self, reason: &str) {
    let sender = self
      .close
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .take();
    if let Some(sender) = sender {
      let _ = sender.send(reason.to_string());
    }
  }
}

pub struct SessionIo {
  pub player_id: String,
  pub inbound: Arc<SessionInbound>,
  pub outbound: OutboundReceivers,
}
