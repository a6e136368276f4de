//! Runtime configuration: optional TOML file layered under `ROSTER_*` env vars.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Default feed: three JSON pages named `generated-01.json` … `generated-03.json`.
pub const DEFAULT_FEED_URL: &str =
  "https://raw.githubusercontent.com/SkbkonturMobile/mobile-test-ios/master/json/generated-0{page}.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub store_path:            PathBuf,
  /// Page URL template; `{page}` is replaced by the 1-based page number.
  pub feed_url:              String,
  pub page_ceiling:          u32,
  pub page_size:             usize,
  pub refresh_interval_secs: u64,
  pub request_timeout_secs:  u64,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path:            PathBuf::from("~/.local/share/roster/contacts.db"),
      feed_url:              DEFAULT_FEED_URL.to_owned(),
      page_ceiling:          3,
      page_size:             20,
      refresh_interval_secs: 61,
      request_timeout_secs:  30,
    }
  }
}

impl Settings {
  /// Read `path` if it exists, then apply `ROSTER_*` overrides.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("ROSTER").try_parsing(true))
      .build()
      .context("failed to read config file")?;

    let mut settings: Self = settings
      .try_deserialize()
      .context("failed to deserialise Settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let settings = Settings::load(Path::new("/nonexistent/roster.toml")).unwrap();
    assert_eq!(settings.page_ceiling, 3);
    assert_eq!(settings.refresh_interval_secs, 61);
    assert_eq!(settings.feed_url, DEFAULT_FEED_URL);
    if std::env::var("HOME").is_ok() {
      assert!(!settings.store_path.starts_with("~"));
    }
  }

  #[test]
  fn file_values_override_defaults() {
    let dir = std::env::temp_dir().join(format!("roster-settings-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("roster.toml");
    std::fs::write(
      &path,
      "page_ceiling = 2\nfeed_url = \"http://localhost:8080/page-{page}.json\"\nstore_path = \"/tmp/roster.db\"\n",
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.page_ceiling, 2);
    assert_eq!(settings.page_size, 20);
    assert_eq!(settings.feed_url, "http://localhost:8080/page-{page}.json");
    assert_eq!(settings.store_path, PathBuf::from("/tmp/roster.db"));

    let _ = std::fs::remove_dir_all(&dir);
  }

  #[test]
  fn tilde_is_expanded_only_at_the_start() {
    assert_eq!(expand_tilde(Path::new("/a/~/b")), PathBuf::from("/a/~/b"));
  }
}
