use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Point {
  pub row: i32,
  pub col: i32,
}

impl Point {
  pub const fn new(row: i32, col: i32) -> Self {
    Self { row, col }
  }

  pub fn step(self, direction: Direction) -> Self {
    let (dr, dc) = direction.offset();
    Self {
      row: self.row + dr,
      col: self.col + dc,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Up,
  Down,
  Left,
  Right,
}

impl Direction {
  pub fn offset(self) -> (i32, i32) {
    match self {
      Direction::Up => (-1, 0),
      Direction::Down => (1, 0),
      Direction::Left => (0, -1),
      Direction::Right => (0, 1),
    }
  }

  pub fn opposite(self) -> Direction {
    match self {
      Direction::Up => Direction::Down,
      Direction::Down => Direction::Up,
      Direction::Left => Direction::Right,
      Direction::Right => Direction::Left,
    }
  }

  pub fn is_opposite(self, other: Direction) -> bool {
    self.opposite() == other
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Cell {
  #[default]
  #[serde(rename = ".")]
  Empty,
  #[serde(rename = "f")]
  Food,
  #[serde(rename = "b")]
  Body,
  #[serde(rename = "h")]
  Head,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminationReason {
  OutOfBounds,
  Collision,
}

impl EliminationReason {
  pub fn close_reason(self) -> &'static str {
    match self {
      EliminationReason::OutOfBounds => "eliminated: hit the wall",
      EliminationReason::Collision => "eliminated: collided with a snake",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinRejection {
  DuplicateId,
  BoardFull,
}

impl JoinRejection {
  pub fn close_reason(self) -> &'static str {
    match self {
      JoinRejection::DuplicateId => "already playing from this address",
      JoinRejection::BoardFull => "board is full",
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct SnakeSnapshot {
  pub head: Point,
  pub tail: Point,
  pub body: Vec<Point>,
  pub direction: Direction,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
  pub id: String,
  pub name: String,
  pub color: String,
  pub score: u32,
  pub snake: SnakeSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameStateSnapshot {
  pub rows: usize,
  pub cols: usize,
  pub grid: Vec<Vec<Cell>>,
  pub players: Vec<PlayerSnapshot>,
}
