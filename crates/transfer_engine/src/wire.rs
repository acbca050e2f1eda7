use serde::{Deserialize, Deserializer};
use serde_json::Value;
use transfer_core::ProgressSnapshot;

use crate::{FailureKind, TransportError};

/// Status body as the backend sends it. Every field is optional and loosely typed:
/// counts may arrive as numbers or numeric strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    #[serde(default, deserialize_with = "lenient_flag")]
    done: bool,
    #[serde(default, deserialize_with = "lenient_text")]
    status: String,
    #[serde(default, deserialize_with = "lenient_count")]
    total: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    current: u64,
    #[serde(default, deserialize_with = "lenient_text")]
    time_left: String,
}

impl From<StatusResponse> for ProgressSnapshot {
    fn from(response: StatusResponse) -> Self {
        Self {
            done: response.done,
            status: response.status,
            total: response.total,
            current: response.current,
            time_left: response.time_left,
        }
    }
}

/// Decodes a status body. Only a body that is not a JSON object is an error;
/// odd or missing fields fall back to `0` / `""` / `false`.
pub fn decode_snapshot(body: &[u8]) -> Result<ProgressSnapshot, TransportError> {
    serde_json::from_slice::<StatusResponse>(body)
        .map(ProgressSnapshot::from)
        .map_err(|err| TransportError::new(FailureKind::Decode, err.to_string()))
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => {
            let text = text.trim();
            !(text.is_empty() || text == "0" || text.eq_ignore_ascii_case("false"))
        }
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n >= 0.0).map(|n| n.trunc() as u64))
            .unwrap_or(0),
        Value::String(text) => leading_digits(&text),
        _ => 0,
    })
}

/// Integer prefix of `text` after leading whitespace, `0` when there is none.
fn leading_digits(text: &str) -> u64 {
    let trimmed = text.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().unwrap_or(0)
}
