use std::time::Duration;

use anyhow::Result;
use lambda_runtime::LambdaEvent;
use serde_json::Value;
use tracing::{error, info};

use crate::config::{Config, MessageStyle};
use crate::encoding::encode_text;
use crate::event::sns_message;
use crate::payload::{InvocationResult, SlackMessage};
use crate::provider::{source_from_config, ResolvedSecrets};
use crate::sink::{DryRunSink, Sink, SlackWebhook};
use crate::timestamp;

/// Relays one compliance event to the chat webhook per call.
pub struct Notifier {
    secrets: ResolvedSecrets,
    style: MessageStyle,
    sink: Box<dyn Sink>,
}

impl Notifier {
    pub fn new(secrets: ResolvedSecrets, style: MessageStyle, sink: Box<dyn Sink>) -> Self {
        Self {
            secrets,
            style,
            sink,
        }
    }

    /// Resolves secrets from the configured source and wires up the sink.
    /// Called once per process.
    pub async fn from_config(config: &Config, dry_run: bool) -> Result<Self> {
        let source = source_from_config(&config.source)?;
        let secrets = ResolvedSecrets::resolve(source.as_ref()).await?;
        let sink: Box<dyn Sink> = if dry_run {
            Box::new(DryRunSink)
        } else {
            Box::new(SlackWebhook::new(
                &secrets.webhook_url,
                Duration::from_secs(config.timeout_secs),
            )?)
        };
        Ok(Self::new(secrets, config.message.clone(), sink))
    }

    pub async fn handle(&self, event: &Value) -> Result<InvocationResult> {
        info!("Event: {event}");
        let message = sns_message(event)?;

        let text = encode_text(message)?;
        let ts = timestamp::current()?;
        let payload = SlackMessage::compliance_warning(&self.style, &self.secrets.account_id, text, ts);

        match self.sink.deliver(&payload).await {
            Ok(delivery) => info!(status = delivery.status.as_u16(), "Response: {delivery}"),
            Err(err) => {
                error!("Error: {err:#}");
                return Err(err);
            }
        }

        Ok(InvocationResult::sent())
    }
}

/// Lambda entry point. The execution context is not used.
pub async fn relay(
    notifier: &Notifier,
    event: LambdaEvent<Value>,
) -> Result<InvocationResult, lambda_runtime::Error> {
    Ok(notifier.handle(&event.payload).await?)
}
