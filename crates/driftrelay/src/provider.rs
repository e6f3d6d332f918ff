use std::fmt;

#[cfg(feature = "aws")]
use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::config::Source;
#[cfg(feature = "aws")]
use aws_config::{self, BehaviorVersion, SdkConfig};
#[cfg(feature = "aws")]
use aws_sdk_secretsmanager::Client as SecretsClient;
#[cfg(feature = "aws")]
use aws_sdk_sts::Client as StsClient;
#[cfg(feature = "aws")]
use tokio::sync::OnceCell;

#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Incoming-webhook URL the chat message is posted to.
    async fn webhook_url(&self) -> Result<String>;

    /// Account identifier of the principal this process runs as.
    async fn account_id(&self) -> Result<String>;
}

pub fn source_from_config(source: &Source) -> Result<Box<dyn SecretSource>> {
    match source {
        Source::Static {
            webhook_url,
            account_id,
        } => Ok(Box::new(StaticSource {
            webhook_url: webhook_url.clone(),
            account_id: account_id.clone(),
        })),
        #[cfg(feature = "aws")]
        Source::Aws { secret_id } => Ok(Box::new(AwsSource::new(secret_id.clone()))),
        #[cfg(not(feature = "aws"))]
        Source::Aws { .. } => anyhow::bail!("driftrelay was built without the `aws` feature"),
    }
}

/// Secrets resolved once at process start and shared read-only by every invocation.
#[derive(Clone)]
pub struct ResolvedSecrets {
    pub webhook_url: String,
    pub account_id: String,
}

impl ResolvedSecrets {
    pub async fn resolve(source: &dyn SecretSource) -> Result<Self> {
        let (webhook_url, account_id) =
            tokio::try_join!(source.webhook_url(), source.account_id())?;
        info!(account_id = %account_id, "resolved webhook secret and caller identity");
        Ok(Self {
            webhook_url,
            account_id,
        })
    }
}

// The webhook URL is the only credential for posting, keep it out of logs.
impl fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field("webhook_url", &"<redacted>")
            .field("account_id", &self.account_id)
            .finish()
    }
}

struct StaticSource {
    webhook_url: String,
    account_id: String,
}

#[async_trait]
impl SecretSource for StaticSource {
    async fn webhook_url(&self) -> Result<String> {
        if self.webhook_url.trim().is_empty() {
            anyhow::bail!("static source has an empty webhook_url");
        }
        Ok(self.webhook_url.clone())
    }

    async fn account_id(&self) -> Result<String> {
        Ok(self.account_id.clone())
    }
}

#[cfg(feature = "aws")]
struct AwsSource {
    secret_id: String,
    sdk: OnceCell<SdkConfig>,
}

#[cfg(feature = "aws")]
impl AwsSource {
    fn new(secret_id: String) -> Self {
        Self {
            secret_id,
            sdk: OnceCell::new(),
        }
    }

    /// Default credential/region chain, loaded on first use and shared by both clients.
    async fn sdk_config(&self) -> &SdkConfig {
        self.sdk
            .get_or_init(|| aws_config::load_defaults(BehaviorVersion::latest()))
            .await
    }
}

#[cfg(feature = "aws")]
#[async_trait]
impl SecretSource for AwsSource {
    async fn webhook_url(&self) -> Result<String> {
        let client = SecretsClient::new(self.sdk_config().await);
        let resp = client
            .get_secret_value()
            .secret_id(&self.secret_id)
            .send()
            .await
            .with_context(|| format!("Fetching secret {}", self.secret_id))?;

        resp.secret_string()
            .map(str::to_string)
            .with_context(|| format!("Secret {} has no string value", self.secret_id))
    }

    async fn account_id(&self) -> Result<String> {
        let client = StsClient::new(self.sdk_config().await);
        let resp = client
            .get_caller_identity()
            .send()
            .await
            .context("Calling sts:GetCallerIdentity")?;

        resp.account()
            .map(str::to_string)
            .context("GetCallerIdentity returned no account")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(feature = "aws")]
    use crate::config::DEFAULT_SECRET_ID;

    fn static_source(url: &str) -> Source {
        Source::Static {
            webhook_url: url.to_string(),
            account_id: "123456789012".to_string(),
        }
    }

    #[tokio::test]
    async fn static_source_resolves_both_values() {
        let src = source_from_config(&static_source("https://hooks.slack.com/services/T/B/X")).unwrap();
        let secrets = ResolvedSecrets::resolve(src.as_ref()).await.unwrap();
        assert_eq!(secrets.webhook_url, "https://hooks.slack.com/services/T/B/X");
        assert_eq!(secrets.account_id, "123456789012");
    }

    #[tokio::test]
    async fn empty_webhook_fails_resolution() {
        let src = source_from_config(&static_source("  ")).unwrap();
        assert!(ResolvedSecrets::resolve(src.as_ref()).await.is_err());
    }

    #[cfg(feature = "aws")]
    #[tokio::test]
    async fn aws_sdk_config_is_loaded_once() {
        // Region from env keeps the default chain off the instance metadata endpoint.
        std::env::set_var("AWS_REGION", "us-east-1");
        std::env::set_var("AWS_EC2_METADATA_DISABLED", "true");

        let src = AwsSource::new(DEFAULT_SECRET_ID.to_string());
        let (first, second) = tokio::join!(src.sdk_config(), src.sdk_config());
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(first, src.sdk_config().await));
        assert_eq!(first.region().map(|r| r.as_ref()), Some("us-east-1"));
    }

    #[test]
    fn debug_redacts_webhook() {
        let secrets = ResolvedSecrets {
            webhook_url: "https://hooks.slack.com/services/T/B/secret".to_string(),
            account_id: "123456789012".to_string(),
        };
        let rendered = format!("{secrets:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("123456789012"));
    }
}
