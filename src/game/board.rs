use super::constants::{COLOR_POOL, MIN_SNAKE_LENGTH, SPAWN_COLUMN};
#[cfg(test)]
use super::room::session::OutboundReceivers;
use super::room::session::{SessionInbound, SessionOutbound};
use super::snake::Snake;
use super::types::{
  Cell, EliminationReason, GameStateSnapshot, JoinRejection, PlayerSnapshot, Point,
};
use rand::seq::IteratorRandom;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
pub struct Player {
  pub id: String,
  pub name: String,
  pub color: &'static str,
  pub snake: Snake,
  pub inbound: Arc<SessionInbound>,
  pub outbound: Arc<SessionOutbound>,
}

impl Player {
  fn snapshot(&self) -> PlayerSnapshot {
    PlayerSnapshot {
      id: self.id.clone(),
      name: self.name.clone(),
      color: self.color.to_string(),
      score: self.snake.score(),
      snake: self.snake.snapshot(),
    }
  }
}

#[derive(Debug)]
pub struct Eliminated {
  pub player: Player,
  pub reason: EliminationReason,
}

#[derive(Debug, Default)]
pub struct TickOutcome {
  pub eliminated: Vec<Eliminated>,
  pub fed: Option<String>,
}

#[derive(Debug)]
pub struct Board {
  rows: usize,
  cols: usize,
  grid: Vec<Vec<Cell>>,
  food: Option<Point>,
  players: Vec<Player>,
  joins: usize,
}

impl Board {
  pub fn new(rows: usize, cols: usize) -> Self {
    Self {
      rows,
      cols,
      grid: vec![vec![Cell::Empty; cols]; rows],
      food: None,
      players: Vec::new(),
      joins: 0,
    }
  }

  pub fn rows(&self) -> usize {
    self.rows
  }

  pub fn cols(&self) -> usize {
    self.cols
  }

  pub fn food(&self) -> Option<Point> {
    self.food
  }

  pub fn players(&self) -> &[Player] {
    &self.players
  }

  pub fn player(&self, id: &str) -> Option<&Player> {
    self.players.iter().find(|player| player.id == id)
  }

  pub fn in_bounds(&self, point: Point) -> bool {
    point.row >= 0
      && point.col >= 0
      && (point.row as usize) < self.rows
      && (point.col as usize) < self.cols
  }

  pub fn cell(&self, point: Point) -> Option<Cell> {
    if !self.in_bounds(point) {
      return None;
    }
    Some(self.grid[point.row as usize][point.col as usize])
  }

  fn set_cell(&mut self, point: Point, cell: Cell) {
    if self.in_bounds(point) {
      self.grid[point.row as usize][point.col as usize] = cell;
    }
  }

  pub fn insert_player(
    &mut self,
    id: String,
    inbound: Arc<SessionInbound>,
    outbound: Arc<SessionOutbound>,
  ) -> Result<&Player, JoinRejection> {
    if self.player(&id).is_some() {
      return Err(JoinRejection::DuplicateId);
    }
    let (row, start_col) = self.free_lane().ok_or(JoinRejection::BoardFull)?;
    let mut snake = Snake::new();
    snake.lay_out(row, start_col);
    Ok(self.push_player(id, snake, inbound, outbound))
  }

  #[cfg(test)]
  pub(crate) fn insert_snake(
    &mut self,
    id: &str,
    snake: Snake,
  ) -> (Arc<SessionInbound>, OutboundReceivers) {
    let inbound = Arc::new(SessionInbound::new());
    let (outbound, receivers) = SessionOutbound::channel();
    self.push_player(id.to_string(), snake, Arc::clone(&inbound), outbound);
    (inbound, receivers)
  }

  fn push_player(
    &mut self,
    id: String,
    snake: Snake,
    inbound: Arc<SessionInbound>,
    outbound: Arc<SessionOutbound>,
  ) -> &Player {
    self.mark_snake(&snake);
    let color = COLOR_POOL[self.joins % COLOR_POOL.len()];
    self.joins += 1;
    self.players.push(Player {
      id,
      name: String::new(),
      color,
      snake,
      inbound,
      outbound,
    });
    &self.players[self.players.len() - 1]
  }

  fn free_lane(&self) -> Option<(i32, i32)> {
    let start_col = SPAWN_COLUMN.min(self.cols.checked_sub(MIN_SNAKE_LENGTH)?);
    let middle = self.rows / 2;
    (0..self.rows)
      .map(|offset| (middle + offset) % self.rows)
      .find(|&row| {
        self.grid[row][start_col..start_col + MIN_SNAKE_LENGTH]
          .iter()
          .all(|cell| *cell == Cell::Empty)
      })
      .map(|row| (row as i32, start_col as i32))
  }

  fn mark_snake(&mut self, snake: &Snake) {
    for &cell in snake.body() {
      self.set_cell(cell, Cell::Body);
    }
    self.set_cell(snake.head(), Cell::Head);
  }

  pub fn remove_player(&mut self, id: &str) -> Option<Player> {
    let index = self.players.iter().position(|player| player.id == id)?;
    let player = self.players.remove(index);
    for &cell in player.snake.body() {
      self.set_cell(cell, Cell::Empty);
    }
    Some(player)
  }

  pub fn spawn_food<R: Rng>(&mut self, rng: &mut R) -> Option<Point> {
    if self.food.is_some() {
      return None;
    }
    let candidate = self
      .grid
      .iter()
      .enumerate()
      .flat_map(|(row, cells)| {
        cells
          .iter()
          .enumerate()
          .filter(|(_, cell)| **cell == Cell::Empty)
          .map(move |(col, _)| Point::new(row as i32, col as i32))
      })
      .choose(rng)?;
    self.place_food(candidate).then_some(candidate)
  }

  pub fn place_food(&mut self, point: Point) -> bool {
    if self.food.is_some() || self.cell(point) != Some(Cell::Empty) {
      return false;
    }
    self.set_cell(point, Cell::Food);
    self.food = Some(point);
    true
  }

  // Every snake moves before anything is judged. Only a lone head on the food
  // grows; collisions count every post-move body, a grower's restored tail
  // included, and grid writes wait until all verdicts are in.
  pub fn tick(&mut self) -> TickOutcome {
    for player in &mut self.players {
      if let Some(name) = player.inbound.drain_into(&mut player.snake) {
        player.name = name;
      }
    }

    for player in &mut self.players {
      player.snake.advance();
    }

    let grower = self.food.and_then(|food| {
      let mut eaters = self
        .players
        .iter()
        .enumerate()
        .filter(|(_, player)| player.snake.head() == food)
        .map(|(index, _)| index);
      match (eaters.next(), eaters.next()) {
        (Some(index), None) => Some(index),
        _ => None,
      }
    });
    if let Some(index) = grower {
      self.players[index].snake.grow();
      self.food = None;
    }

    let mut occupancy: HashMap<Point, usize> = HashMap::new();
    for player in &self.players {
      for &cell in player.snake.body() {
        *occupancy.entry(cell).or_default() += 1;
      }
    }

    let verdicts: Vec<Option<EliminationReason>> = self
      .players
      .iter()
      .map(|player| {
        let head = player.snake.head();
        if !self.in_bounds(head) {
          Some(EliminationReason::OutOfBounds)
        } else if occupancy.get(&head).copied().unwrap_or(0) > 1 {
          Some(EliminationReason::Collision)
        } else {
          None
        }
      })
      .collect();

    let mut cleared: Vec<Point> = Vec::new();
    let mut marked: Vec<(Point, Point)> = Vec::new();
    for (index, (player, verdict)) in self.players.iter().zip(&verdicts).enumerate() {
      if verdict.is_some() {
        cleared.extend(player.snake.pre_move_cells());
        continue;
      }
      if grower != Some(index) {
        cleared.push(player.snake.tail());
      }
      marked.push((player.snake.previous_head(), player.snake.head()));
    }
    for cell in cleared {
      self.set_cell(cell, Cell::Empty);
    }
    for (previous_head, head) in marked {
      self.set_cell(previous_head, Cell::Body);
      self.set_cell(head, Cell::Head);
    }

    let fed = grower.map(|index| self.players[index].id.clone());
    let mut eliminated = Vec::new();
    let mut survivors = Vec::with_capacity(self.players.len());
    for (player, verdict) in self.players.drain(..).zip(verdicts) {
      match verdict {
        Some(reason) => eliminated.push(Eliminated { player, reason }),
        None => survivors.push(player),
      }
    }
    self.players = survivors;

    TickOutcome { eliminated, fed }
  }

  pub fn snapshot(&self) -> GameStateSnapshot {
    GameStateSnapshot {
      rows: self.rows,
      cols: self.cols,
      grid: self.grid.clone(),
      players: self.players.iter().map(Player::snapshot).collect(),
    }
  }

  pub fn recipients(&self) -> Vec<(String, Arc<SessionOutbound>)> {
    self.players
      .iter()
      .map(|player| (player.id.clone(), Arc::clone(&player.outbound)))
      .collect()
  }
}
