use super::board::{Board, Eliminated};
use super::constants::OUTBOUND_QUEUE_CAPACITY;
use super::types::{JoinRejection, Point};
use crate::protocol::{encode_server_message, ServerMessage};
use session::{SendOutcome, SessionInbound, SessionIo, SessionOutbound};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub mod session;

const STALLED_REASON: &str = "connection stalled";

#[derive(Debug)]
pub struct Room {
  board: RwLock<Board>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomStats {
  pub rows: usize,
  pub cols: usize,
  pub players: usize,
  pub food: Option<Point>,
}

#[derive(Debug)]
pub struct Scheduler {
  tick: JoinHandle<()>,
  food: JoinHandle<()>,
}

impl Scheduler {
  pub fn abort(&self) {
    self.tick.abort();
    self.food.abort();
  }
}

impl Room {
  pub fn new(rows: usize, cols: usize) -> Self {
    Self {
      board: RwLock::new(Board::new(rows, cols)),
    }
  }

  pub fn start(self: &Arc<Self>, tick_period: Duration, food_period: Duration) -> Scheduler {
    let room = Arc::clone(self);
    let tick = tokio::spawn(async move {
      let mut interval = interval_at(Instant::now() + tick_period, tick_period);
      interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
      loop {
        interval.tick().await;
        room.step().await;
      }
    });

    let room = Arc::clone(self);
    let food = tokio::spawn(async move {
      let mut interval = interval_at(Instant::now() + food_period, food_period);
      interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
      loop {
        interval.tick().await;
        room.spawn_food().await;
      }
    });

    Scheduler { tick, food }
  }

  pub async fn join(&self, player_id: String) -> Result<SessionIo, JoinRejection> {
    let inbound = Arc::new(SessionInbound::new());
    let (outbound, receivers) = SessionOutbound::channel();
    let mut board = self.board.write().await;
    let player = board.insert_player(player_id, Arc::clone(&inbound), outbound)?;
    tracing::info!(
      player_id = %player.id,
      color = player.color,
      head = ?player.snake.head(),
      "player joined"
    );
    Ok(SessionIo {
      player_id: player.id.clone(),
      inbound,
      outbound: receivers,
    })
  }

  // Also reached after elimination already removed the player.
  pub async fn remove_session(&self, player_id: &str) -> bool {
    let mut board = self.board.write().await;
    match board.remove_player(player_id) {
      Some(player) => {
        tracing::info!(player_id, score = player.snake.score(), "player left");
        true
      }
      None => false,
    }
  }

  pub async fn spawn_food(&self) -> Option<Point> {
    let mut board = self.board.write().await;
    let placed = board.spawn_food(&mut rand::thread_rng());
    match placed {
      Some(point) => tracing::debug!(?point, "food spawned"),
      None if board.food().is_none() => tracing::debug!("no free cell for food"),
      None => {}
    }
    placed
  }

  pub async fn step(&self) {
    let outcome = {
      let mut board = self.board.write().await;
      board.tick()
    };
    if let Some(player_id) = &outcome.fed {
      tracing::debug!(%player_id, "food eaten");
    }
    for gone in &outcome.eliminated {
      tracing::info!(
        player_id = %gone.player.id,
        reason = ?gone.reason,
        score = gone.player.snake.score(),
        length = gone.player.snake.length(),
        "player eliminated"
      );
    }
    self.broadcast(outcome.eliminated).await;
  }

  async fn broadcast(&self, eliminated: Vec<Eliminated>) {
    let (snapshot, recipients) = {
      let board = self.board.read().await;
      (board.snapshot(), board.recipients())
    };

    if !eliminated.is_empty() {
      match encode_server_message(&ServerMessage::Over(&snapshot)) {
        Ok(payload) => {
          for gone in &eliminated {
            gone.player.outbound.send_frame(payload.clone());
          }
        }
        Err(error) => tracing::error!(?error, "failed to encode game over message"),
      }
      for gone in &eliminated {
        gone.player.outbound.close(gone.reason.close_reason());
      }
    }

    if recipients.is_empty() {
      return;
    }
    let payload = match encode_server_message(&ServerMessage::State(&snapshot)) {
      Ok(payload) => payload,
      Err(error) => {
        tracing::error!(?error, "failed to encode state snapshot, skipping broadcast");
        return;
      }
    };

    let mut failed: Vec<(String, SendOutcome)> = Vec::new();
    for (player_id, outbound) in recipients {
      match outbound.send_frame(payload.clone()) {
        SendOutcome::Sent => {}
        SendOutcome::Dropped => {
          tracing::debug!(%player_id, "outbound queue full, frame dropped");
        }
        outcome => failed.push((player_id, outcome)),
      }
    }
    if failed.is_empty() {
      return;
    }

    let mut board = self.board.write().await;
    for (player_id, outcome) in failed {
      let Some(player) = board.remove_player(&player_id) else { continue };
      if outcome == SendOutcome::Stalled {
        player.outbound.close(STALLED_REASON);
      }
      tracing::debug!(
        %player_id,
        ?outcome,
        capacity = OUTBOUND_QUEUE_CAPACITY,
        "removed player after failed send"
      );
    }
  }

  pub async fn stats(&self) -> RoomStats {
    let board = self.board.read().await;
    RoomStats {
      rows: board.rows(),
      cols: board.cols(),
      players: board.players().len(),
      food: board.food(),
    }
  }

  #[cfg(test)]
  pub(crate) async fn with_board<R>(&self, f: impl FnOnce(&mut Board) -> R) -> R {
    let mut board = self.board.write().await;
    f(&mut board)
  }
}
