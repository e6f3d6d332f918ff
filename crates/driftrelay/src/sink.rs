use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};

use crate::payload::SlackMessage;

/// Outcome of a post that reached the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub status: StatusCode,
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Response [{}]>", self.status.as_u16())
    }
}

#[async_trait]
pub trait Sink: Send + Sync {
    /// Errors only on transport failure. Any HTTP status is a delivery.
    async fn deliver(&self, message: &SlackMessage) -> Result<Delivery>;
}

pub struct SlackWebhook {
    url: Url,
    client: reqwest::Client,
}

impl SlackWebhook {
    pub fn new(webhook_url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(webhook_url).context("Webhook URL is not a valid URL")?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Building webhook HTTP client")?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl Sink for SlackWebhook {
    async fn deliver(&self, message: &SlackMessage) -> Result<Delivery> {
        let body = serde_json::to_vec(message)?;
        // No error_for_status: a rejected post still counts as sent.
        let resp = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .with_context(|| "Sending Slack webhook")?;
        Ok(Delivery {
            status: resp.status(),
        })
    }
}

/// Prints the payload instead of posting it.
pub struct DryRunSink;

#[async_trait]
impl Sink for DryRunSink {
    async fn deliver(&self, message: &SlackMessage) -> Result<Delivery> {
        println!("{}", serde_json::to_string_pretty(message)?);
        Ok(Delivery {
            status: StatusCode::OK,
        })
    }
}
