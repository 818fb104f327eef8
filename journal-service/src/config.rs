use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub reject_duplicate_ids: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            data_dir: PathBuf::from("./data"),
            reject_duplicate_ids: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("JOURNAL_HOST").unwrap_or(defaults.host),
            port: parse_var("JOURNAL_PORT", defaults.port),
            data_dir: env::var("JOURNAL_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            reject_duplicate_ids: parse_var(
                "JOURNAL_REJECT_DUPLICATE_IDS",
                defaults.reject_duplicate_ids,
            ),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    parse_value(name, env::var(name).ok(), default)
}

/// Parses `raw`, keeping `default` when unset or unparsable.
fn parse_value<T: FromStr + std::fmt::Display>(name: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            log::warn!("Ignoring invalid {}={:?}, using {}", name, raw, default);
            default
        }
    }
}
