use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_CONFIG_NAME: &str = "driftrelay.toml";

pub const DEFAULT_SECRET_ID: &str = "slack/sre-notifications";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the webhook URL and account id come from
    pub source: Source,
    /// Upper bound for the outbound webhook call, in seconds
    pub timeout_secs: u64,
    pub log_format: LogFormat,
    /// Static parts of the Slack attachment
    pub message: MessageStyle,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum Source {
    /// Secrets Manager for the webhook, STS for the account id.
    Aws {
        #[serde(default = "default_secret_id")]
        secret_id: String,
    },
    /// Values given inline, for local runs.
    Static {
        webhook_url: String,
        account_id: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessageStyle {
    pub title: String,
    pub fallback: String,
    pub color: String,
    pub footer: String,
}

impl Default for MessageStyle {
    fn default() -> Self {
        Self {
            title: "AWS Config Warning".to_string(),
            fallback: "Required plain-text summary of the attachment.".to_string(),
            color: "#9036a6".to_string(),
            footer: "SRE4".to_string(),
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::Aws {
            secret_id: default_secret_id(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: Source::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_format: LogFormat::default(),
            message: MessageStyle::default(),
        }
    }
}

fn default_secret_id() -> String {
    DEFAULT_SECRET_ID.to_string()
}

impl Config {
    /// Load configuration from an explicit path, or search upward from current dir.
    /// Without either, built-in defaults apply.
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let path = match path_override.or_else(|| find_upwards(DEFAULT_CONFIG_NAME)) {
            Some(p) => p,
            None => return Ok(Config::default()),
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Reading config file {}", path.display()))?;
        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Parsing TOML config {}", path.display()))?;
        if cfg.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero in {}", path.display());
        }
        Ok(cfg)
    }
}

fn find_upwards(file_name: &str) -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(file_name);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(toml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_static_source() {
        let file = write_config(
            r#"timeout_secs = 3
log_format = "json"

[source]
provider = "static"
webhook_url = "https://hooks.slack.com/services/T000/B000/XXXX"
account_id = "123456789012"
"#,
        );

        let cfg = Config::load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.timeout_secs, 3);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_matches!(
            &cfg.source,
            Source::Static { webhook_url, account_id }
                if webhook_url.starts_with("https://hooks.slack.com/") && account_id == "123456789012"
        );
        assert_eq!(cfg.message, MessageStyle::default());
    }

    #[test]
    fn aws_source_defaults_secret_id() {
        let file = write_config(
            r#"[source]
provider = "aws"
"#,
        );
        let cfg = Config::load(Some(file.path().to_path_buf())).unwrap();
        assert_matches!(&cfg.source, Source::Aws { secret_id } if secret_id == DEFAULT_SECRET_ID);
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn message_overrides_are_partial() {
        let file = write_config(
            r##"[message]
color = "#ff0000"
"##,
        );
        let cfg = Config::load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.message.color, "#ff0000");
        assert_eq!(cfg.message.footer, "SRE4");
        assert_eq!(cfg.message.title, "AWS Config Warning");
    }

    #[test]
    fn zero_timeout_errors() {
        let file = write_config("timeout_secs = 0\n");
        let result = Config::load(Some(file.path().to_path_buf()));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_provider_errors() {
        let file = write_config(
            r#"[source]
provider = "vault"
"#,
        );
        assert!(Config::load(Some(file.path().to_path_buf())).is_err());
    }

    #[test]
    fn missing_explicit_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(dir.path().join("nope.toml")));
        assert!(result.is_err());
    }
}
