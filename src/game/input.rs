use super::types::Direction;

pub fn parse_key(payload: &str) -> Option<Direction> {
  match payload {
    "k" | "w" => Some(Direction::Up),
    "j" | "s" => Some(Direction::Down),
    "l" | "d" => Some(Direction::Right),
    "h" | "a" => Some(Direction::Left),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn vi_and_wasd_keys_map_to_directions() {
    assert_eq!(parse_key("k"), Some(Direction::Up));
    assert_eq!(parse_key("w"), Some(Direction::Up));
    assert_eq!(parse_key("j"), Some(Direction::Down));
    assert_eq!(parse_key("s"), Some(Direction::Down));
    assert_eq!(parse_key("l"), Some(Direction::Right));
    assert_eq!(parse_key("d"), Some(Direction::Right));
    assert_eq!(parse_key("h"), Some(Direction::Left));
    assert_eq!(parse_key("a"), Some(Direction::Left));
  }

  #[test]
  fn keys_are_case_sensitive() {
    assert_eq!(parse_key("K"), None);
    assert_eq!(parse_key("W"), None);
    assert_eq!(parse_key("kk"), None);
    assert_eq!(parse_key(""), None);
  }
}
