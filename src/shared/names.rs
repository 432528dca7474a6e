pub const MAX_DISPLAY_NAME_CHARS: usize = 20;

pub fn sanitize_player_name(name: &str, fallback: &str) -> String {
  let cleaned = name
    .split_whitespace()
    .map(|word| word.chars().filter(|ch| !ch.is_control()).collect::<String>())
    .filter(|word| !word.is_empty())
    .collect::<Vec<_>>()
    .join(" ");
  if cleaned.is_empty() {
    return fallback.to_string();
  }
  cleaned.chars().take(MAX_DISPLAY_NAME_CHARS).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn collapses_inner_whitespace() {
    assert_eq!(sanitize_player_name("  neo \t the  one ", ""), "neo the one");
  }

  #[test]
  fn blank_names_use_fallback() {
    assert_eq!(sanitize_player_name("   ", ""), "");
    assert_eq!(sanitize_player_name("", "anon"), "anon");
  }

  #[test]
  fn long_names_are_truncated_by_chars() {
    let name = "é".repeat(40);
    assert_eq!(sanitize_player_name(&name, "").chars().count(), MAX_DISPLAY_NAME_CHARS);
  }

  #[test]
  fn control_characters_are_removed() {
    assert_eq!(sanitize_player_name("a\u{1b}[2Jb", ""), "a[2Jb");
  }
}
