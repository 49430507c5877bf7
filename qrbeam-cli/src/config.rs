//! Load config from file and environment.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Receiver host configuration. File: ~/.config/qrbeam/config.toml or /etc/qrbeam/config.toml.
/// Env overrides: QRBEAM_OUTPUT_DIR, QRBEAM_MAX_FILE_LENGTH.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory the finished file is written to (default: current directory).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Largest file a metadata block may announce, in bytes.
    #[serde(default = "default_max_file_length")]
    pub max_file_length: u64,
    /// Save whatever was received when input ends before the transfer completes.
    #[serde(default)]
    pub allow_partial: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_max_file_length() -> u64 {
    qrbeam_core::config::DEFAULT_MAX_FILE_LENGTH
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_file_length: default_max_file_length(),
            allow_partial: false,
        }
    }
}

/// Load config: default, then config file, then env vars.
/// An explicit path must exist and parse; the default locations are optional.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let mut c = match explicit {
        Some(p) => {
            let s = std::fs::read_to_string(p)
                .with_context(|| format!("reading config {}", p.display()))?;
            parse(&s).with_context(|| format!("parsing config {}", p.display()))?
        }
        None => load_default_file().unwrap_or_default(),
    };
    apply_env(&mut c, |k| std::env::var(k).ok());
    Ok(c)
}

pub fn parse(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(s)
}

/// Apply env overrides through `lookup`. Unparseable values are ignored.
pub fn apply_env(c: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(s) = lookup("QRBEAM_OUTPUT_DIR") {
        if !s.is_empty() {
            c.output_dir = PathBuf::from(s);
        }
    }
    if let Some(s) = lookup("QRBEAM_MAX_FILE_LENGTH") {
        if let Ok(n) = s.parse::<u64>() {
            c.max_file_length = n;
        }
    }
}

fn config_paths() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let mut out = Vec::new();
    if let Some(h) = home {
        out.push(h.join(".config/qrbeam/config.toml"));
    }
    out.push(PathBuf::from("/etc/qrbeam/config.toml"));
    out
}

fn load_default_file() -> Option<Config> {
    for p in config_paths() {
        if p.exists() {
            match std::fs::read_to_string(&p).map(|s| parse(&s)) {
                Ok(Ok(c)) => return Some(c),
                Ok(Err(e)) => tracing::warn!(path = %p.display(), error = %e, "ignoring config"),
                Err(e) => tracing::warn!(path = %p.display(), error = %e, "cannot read config"),
            }
            break;
        }
    }
    None
}
