use crate::game::input::parse_key;
use crate::game::types::{Direction, GameStateSnapshot};
use serde::Serialize;

pub const NAME_PREFIX: &str = "NAME:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
  Turn(Direction),
  Name(String),
}

pub fn decode_client_message(text: &str) -> Option<ClientMessage> {
  if let Some(name) = text.strip_prefix(NAME_PREFIX) {
    return Some(ClientMessage::Name(name.to_string()));
  }
  parse_key(text).map(ClientMessage::Turn)
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage<'a> {
  State(&'a GameStateSnapshot),
  Over(&'a GameStateSnapshot),
}

pub fn encode_server_message(message: &ServerMessage<'_>) -> serde_json::Result<String> {
  serde_json::to_string(message)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::types::{Cell, Point, PlayerSnapshot, SnakeSnapshot};
  use serde_json::Value;

  #[test]
  fn decode_direction_keys() {
    assert_eq!(
      decode_client_message("w"),
      Some(ClientMessage::Turn(Direction::Up))
    );
    assert_eq!(
      decode_client_message("h"),
      Some(ClientMessage::Turn(Direction::Left))
    );
    assert_eq!(decode_client_message("client has connected"), None);
  }

  #[test]
  fn decode_name_keeps_raw_text() {
    assert_eq!(
      decode_client_message("NAME:viper 9"),
      Some(ClientMessage::Name("viper 9".to_string()))
    );
    assert_eq!(
      decode_client_message("NAME:"),
      Some(ClientMessage::Name(String::new()))
    );
    assert_eq!(decode_client_message("name:viper"), None);
  }

  #[test]
  fn state_message_carries_type_grid_and_players() {
    let snapshot = GameStateSnapshot {
      rows: 1,
      cols: 2,
      grid: vec![vec![Cell::Head, Cell::Food]],
      players: vec![PlayerSnapshot {
        id: "127.0.0.1:5000".to_string(),
        name: "viper".to_string(),
        color: "red".to_string(),
        score: 3,
        snake: SnakeSnapshot {
          head: Point::new(0, 0),
          tail: Point::new(0, 0),
          body: vec![Point::new(0, 0)],
          direction: Direction::Right,
        },
      }],
    };
    let json = encode_server_message(&ServerMessage::State(&snapshot)).expect("encode");
    let value: Value = serde_json::from_str(&json).expect("json");
    assert_eq!(value["type"], "state");
    assert_eq!(value["grid"][0][0], "h");
    assert_eq!(value["grid"][0][1], "f");
    assert_eq!(value["players"][0]["score"], 3);
    assert_eq!(value["players"][0]["snake"]["head"]["row"], 0);
    assert_eq!(value["players"][0]["snake"]["direction"], "right");

    let over = encode_server_message(&ServerMessage::Over(&snapshot)).expect("encode");
    let value: Value = serde_json::from_str(&over).expect("json");
    assert_eq!(value["type"], "over");
  }
}
