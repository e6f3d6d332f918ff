use serde::{Deserialize, Serialize};

use crate::config::MessageStyle;

/// Body of an incoming-webhook post: a single attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackMessage {
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub fallback: String,
    pub color: String,
    pub pretext: String,
    pub text: String,
    pub mrkdwn_in: Vec<String>,
    pub footer: String,
    pub ts: f64,
}

impl SlackMessage {
    /// Compliance warning for `account_id` carrying the already encoded `text`.
    pub fn compliance_warning(style: &MessageStyle, account_id: &str, text: String, ts: f64) -> Self {
        Self {
            attachments: vec![Attachment {
                fallback: style.fallback.clone(),
                color: style.color.clone(),
                pretext: format!("*{} (AWS: {})*\n", style.title, account_id),
                text,
                mrkdwn_in: vec!["text".to_string(), "pretext".to_string()],
                footer: style.footer.clone(),
                ts,
            }],
        }
    }
}

pub const SENT_MESSAGE: &str = "Message sent to Slack";

/// What a successful invocation returns to the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(rename = "Message")]
    pub message: String,
}

impl InvocationResult {
    pub fn sent() -> Self {
        Self {
            status_code: 200,
            message: SENT_MESSAGE.to_string(),
        }
    }
}
