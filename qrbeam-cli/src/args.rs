//! Command-line arguments. CLI values take precedence over the config file and environment.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Rebuild a file from captured QR payloads (one hex-encoded payload per line).
#[derive(Parser, Debug, Clone)]
#[command(name = "qrbeam", author, version, about)]
pub struct Args {
    /// Payload capture to read. `-` or omitted reads stdin.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory to write the reassembled file to.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Save the partial file if input ends before every block arrived.
    #[arg(long)]
    pub allow_partial: bool,

    /// Fail unless the reassembled file has this SHA-256 (hex).
    #[arg(long, value_name = "HEX")]
    pub expect_sha256: Option<String>,

    /// Config file (default: ~/.config/qrbeam/config.toml, then /etc/qrbeam/config.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Input path, `None` meaning stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }

    /// Overlay CLI values on top of the loaded config.
    pub fn merge_into(&self, c: &mut Config) {
        if let Some(dir) = &self.output_dir {
            c.output_dir = dir.clone();
        }
        if self.allow_partial {
            c.allow_partial = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_means_stdin() {
        let a = Args::parse_from(["qrbeam", "--input", "-"]);
        assert!(a.input_path().is_none());
        let a = Args::parse_from(["qrbeam", "-i", "capture.txt"]);
        assert_eq!(a.input_path(), Some(&PathBuf::from("capture.txt")));
    }

    #[test]
    fn cli_overrides_config() {
        let a = Args::parse_from(["qrbeam", "-o", "/out", "--allow-partial", "-vv"]);
        let mut c = Config::default();
        a.merge_into(&mut c);
        assert_eq!(c.output_dir, PathBuf::from("/out"));
        assert!(c.allow_partial);
        assert_eq!(a.verbose, 2);
    }

    #[test]
    fn absent_flags_keep_config() {
        let a = Args::parse_from(["qrbeam"]);
        let mut c = Config {
            allow_partial: true,
            ..Config::default()
        };
        a.merge_into(&mut c);
        assert!(c.allow_partial);
        assert_eq!(c.output_dir, PathBuf::from("."));
    }
}
