use anyhow::{Context, Result};
use serde_json::Value;

/// Returns `Records[0].Sns.Message` of an SNS-delivered event.
///
/// Nothing else in the event is inspected. The message is returned as-is,
/// whatever its JSON type.
pub fn sns_message(event: &Value) -> Result<&Value> {
    let records = event.get("Records").context("event has no Records")?;
    let first = records
        .get(0)
        .context("event Records is empty or not a list")?;
    first
        .get("Sns")
        .and_then(|sns| sns.get("Message"))
        .context("first record has no Sns.Message")
}
