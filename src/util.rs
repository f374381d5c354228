//! Small utility helpers used across modules.

/// Normalize a social handle: strip all whitespace, collapse any leading
/// `@` runs, and re-attach a single `@`. Empty input collapses to `None`.
pub fn normalize_handle(raw: Option<&str>) -> Option<String> {
  let cleaned: String = raw?.chars().filter(|c| !c.is_whitespace()).collect();
  let bare = cleaned.trim_start_matches('@');
  if bare.is_empty() { None } else { Some(format!("@{bare}")) }
}

/// Trim a display name. Returns `None` when nothing printable remains.
pub fn clean_name(raw: &str) -> Option<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn handle_gets_single_at_prefix() {
    assert_eq!(normalize_handle(Some("kerning_fan")), Some("@kerning_fan".into()));
    assert_eq!(normalize_handle(Some("@kerning_fan")), Some("@kerning_fan".into()));
    assert_eq!(normalize_handle(Some("@@kerning_fan")), Some("@kerning_fan".into()));
  }

  #[test]
  fn handle_whitespace_is_stripped() {
    assert_eq!(normalize_handle(Some("  @ker ning ")), Some("@kerning".into()));
  }

  #[test]
  fn empty_handle_collapses_to_none() {
    assert_eq!(normalize_handle(None), None);
    assert_eq!(normalize_handle(Some("")), None);
    assert_eq!(normalize_handle(Some("   ")), None);
    assert_eq!(normalize_handle(Some("@")), None);
    assert_eq!(normalize_handle(Some("@@@")), None);
  }

  #[test]
  fn names_are_trimmed() {
    assert_eq!(clean_name("  Ada  "), Some("Ada".into()));
    assert_eq!(clean_name("   "), None);
  }
}
