use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CONFIG_FILE: &str = "column-dash.toml";

/// Settings for the terminal shell. The level itself is fixed.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub fps: u32,
    /// How long a key stays down after a press when the terminal does not
    /// report releases.
    pub key_hold_ms: u64,
    pub sound: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 30,
            key_hold_ms: 150,
            sound: true,
            log_file: None,
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut cfg: Config = toml::from_str(content)?;
        cfg.fps = cfg.fps.clamp(1, 240);
        Ok(cfg)
    }

    /// Missing file means defaults; an unreadable or broken one is reported
    /// once logging is up, via the returned message.
    pub fn load(path: &Path) -> (Self, Option<String>) {
        match fs::read_to_string(path) {
            Ok(content) => match Self::parse(&content) {
                Ok(cfg) => (cfg, None),
                Err(e) => (Self::default(), Some(format!("{}: {e}", path.display()))),
            },
            Err(e) if e.kind() == ErrorKind::NotFound => (Self::default(), None),
            Err(e) => (Self::default(), Some(format!("{}: {e}", path.display()))),
        }
    }

    pub fn report(problem: Option<String>) {
        if let Some(problem) = problem {
            warn!(%problem, "ignoring config file, using defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = Config::parse("fps = 60\nlog_file = \"game.log\"").unwrap();
        assert_eq!(cfg.fps, 60);
        assert_eq!(cfg.key_hold_ms, 150);
        assert!(cfg.sound);
        assert_eq!(cfg.log_file, Some(PathBuf::from("game.log")));
    }

    #[test]
    fn fps_is_clamped() {
        assert_eq!(Config::parse("fps = 0").unwrap().fps, 1);
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(Config::parse("sound = \"loud\"").is_err());
    }

    #[test]
    fn missing_file_is_not_a_problem() {
        let (cfg, problem) = Config::load(Path::new("does/not/exist.toml"));
        assert_eq!(cfg, Config::default());
        assert!(problem.is_none());
    }

    #[test]
    fn unreadable_path_is_reported() {
        let (cfg, problem) = Config::load(Path::new(env!("CARGO_MANIFEST_DIR")));
        assert_eq!(cfg, Config::default());
        assert!(problem.is_some());
    }
}
