use super::constants::MIN_SNAKE_LENGTH;
use super::types::{Direction, Point, SnakeSnapshot};

#[derive(Debug, Clone)]
pub struct Snake {
  body: Vec<Point>,
  head: Point,
  tail: Point,
  direction: Direction,
  score: u32,
}

impl Default for Snake {
  fn default() -> Self {
    Self::new()
  }
}

impl Snake {
  pub fn new() -> Self {
    Self {
      body: vec![Point::default(); MIN_SNAKE_LENGTH],
      head: Point::default(),
      tail: Point::default(),
      direction: Direction::Right,
      score: 0,
    }
  }

  #[cfg(test)]
  pub(crate) fn from_body(body: Vec<Point>, direction: Direction) -> Self {
    assert!(body.len() >= MIN_SNAKE_LENGTH, "snake body too short");
    let head = *body.last().expect("non-empty body");
    let tail = body[0];
    Self {
      body,
      head,
      tail,
      direction,
      score: 0,
    }
  }

  pub fn lay_out(&mut self, row: i32, start_col: i32) {
    for (index, cell) in self.body.iter_mut().enumerate() {
      *cell = Point::new(row, start_col + index as i32);
    }
    self.direction = Direction::Right;
    self.head = self.body[self.body.len() - 1];
    self.tail = self.body[0];
  }

  pub fn body(&self) -> &[Point] {
    &self.body
  }

  pub fn head(&self) -> Point {
    self.head
  }

  pub fn tail(&self) -> Point {
    self.tail
  }

  pub fn direction(&self) -> Direction {
    self.direction
  }

  pub fn score(&self) -> u32 {
    self.score
  }

  pub fn length(&self) -> usize {
    self.body.len()
  }

  pub fn set_direction(&mut self, direction: Direction) -> bool {
    if direction.is_opposite(self.direction) {
      return false;
    }
    self.direction = direction;
    true
  }

  // `tail` keeps the pre-move first cell so `grow` can restore it.
  pub fn advance(&mut self) -> Point {
    let new_head = self.head.step(self.direction);
    let last = self.body.len() - 1;
    self.tail = self.body[0];
    self.body.copy_within(1.., 0);
    self.body[last] = new_head;
    self.head = new_head;
    new_head
  }

  pub fn grow(&mut self) {
    self.body.insert(0, self.tail);
    self.score += 1;
  }

  pub fn previous_head(&self) -> Point {
    self.body[self.body.len() - 2]
  }

  // What the grid still shows for this snake until the tick rewrites it.
  pub fn pre_move_cells(&self) -> impl Iterator<Item = Point> + '_ {
    std::iter::once(self.tail).chain(self.body[..self.body.len() - 1].iter().copied())
  }

  pub fn snapshot(&self) -> SnakeSnapshot {
    SnakeSnapshot {
      head: self.head,
      tail: self.body[0],
      body: self.body.clone(),
      direction: self.direction,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn laid_out(row: i32, col: i32) -> Snake {
    let mut snake = Snake::new();
    snake.lay_out(row, col);
    snake
  }

  #[test]
  fn new_snake_has_minimum_length_and_heads_right() {
    let snake = Snake::new();
    assert_eq!(snake.length(), MIN_SNAKE_LENGTH);
    assert_eq!(snake.direction(), Direction::Right);
    assert_eq!(snake.score(), 0);
  }

  #[test]
  fn lay_out_keeps_head_and_tail_on_body_ends() {
    let snake = laid_out(4, 2);
    assert_eq!(snake.tail(), Point::new(4, 2));
    assert_eq!(snake.head(), Point::new(4, 6));
    assert_eq!(snake.head(), *snake.body().last().expect("body"));
  }

  #[test]
  fn reversing_into_the_neck_is_rejected() {
    let mut snake = laid_out(4, 2);
    assert!(!snake.set_direction(Direction::Left));
    assert_eq!(snake.direction(), Direction::Right);
    assert!(snake.set_direction(Direction::Up));
    assert_eq!(snake.direction(), Direction::Up);
    assert!(!snake.set_direction(Direction::Down));
  }

  #[test]
  fn advance_shifts_body_and_captures_old_tail() {
    let mut snake = laid_out(4, 2);
    let head = snake.advance();
    assert_eq!(head, Point::new(4, 7));
    assert_eq!(snake.tail(), Point::new(4, 2));
    assert_eq!(snake.body()[0], Point::new(4, 3));
    assert_eq!(snake.previous_head(), Point::new(4, 6));
    assert_eq!(snake.length(), MIN_SNAKE_LENGTH);
  }

  #[test]
  fn grow_restores_tail_and_scores() {
    let mut snake = laid_out(4, 2);
    snake.advance();
    snake.grow();
    assert_eq!(snake.length(), MIN_SNAKE_LENGTH + 1);
    assert_eq!(snake.body()[0], Point::new(4, 2));
    assert_eq!(snake.score(), 1);
    assert_eq!(snake.head(), Point::new(4, 7));
  }

  #[test]
  fn pre_move_cells_match_body_before_advance() {
    let mut snake = laid_out(4, 2);
    let before: Vec<Point> = snake.body().to_vec();
    snake.advance();
    let recovered: Vec<Point> = snake.pre_move_cells().collect();
    assert_eq!(recovered, before);
  }
}
