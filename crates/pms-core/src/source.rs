use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::party::{Party, StageDump};
use crate::row::RawRow;

pub type SourceResult<T> = Result<T, SourceError>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("{0}")]
    Transport(String),
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    #[error("{0}")]
    Api(String),
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl SourceError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }
}

/// Server-side operations of the script endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    GetAllParties,
    GetAllStageData,
    GetStageData,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetAllParties => "getAllParties",
            Self::GetAllStageData => "getAllStageData",
            Self::GetStageData => "getStageData",
        }
    }
}

/// Form fields of one request: `action` first, then its parameters.
pub fn form_fields(action: Action, stage_name: Option<&str>) -> Vec<(&'static str, String)> {
    let mut fields = vec![("action", action.as_str().to_string())];
    if let Some(stage) = stage_name {
        fields.push(("stageName", stage.to_string()));
    }
    fields
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScriptEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Turns a raw response into its `data` payload.
///
/// Non-2xx responses report the body's `error` when there is one, otherwise
/// the status code. A missing `data` field is an empty result.
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &[u8]) -> SourceResult<Option<T>> {
    if !(200..300).contains(&status) {
        let reported = serde_json::from_slice::<ScriptEnvelope<serde_json::Value>>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .filter(|message| !message.trim().is_empty());
        return Err(match reported {
            Some(message) => SourceError::Api(message),
            None => SourceError::Http { status },
        });
    }

    let envelope: ScriptEnvelope<T> =
        serde_json::from_slice(body).map_err(|err| SourceError::Decode(err.to_string()))?;

    if envelope.success {
        Ok(envelope.data)
    } else {
        Err(SourceError::Api(
            envelope.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        ))
    }
}

/// Where stage data comes from.
///
/// The console implements this over HTTP; tests use in-memory sheets.
#[allow(async_fn_in_trait)]
pub trait StageSource {
    async fn all_parties(&self) -> SourceResult<Vec<Party>>;

    async fn all_stage_data(&self) -> SourceResult<Vec<StageDump>>;

    async fn stage_rows(&self, stage_name: &str) -> SourceResult<Vec<RawRow>>;

    /// Pause between prefetch batches.
    async fn throttle(&self, delay: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn success_yields_data() {
        let data: Option<Vec<Value>> =
            decode_envelope(200, br#"{"success":true,"data":[1,2]}"#).unwrap();
        assert_eq!(data.map(|d| d.len()), Some(2));

        let empty: Option<Vec<Value>> = decode_envelope(200, br#"{"success":true}"#).unwrap();
        assert!(empty.is_none());
    }

    #[test]
    fn envelope_decodes_payloads_without_default() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Sheet {
            name: String,
        }

        let data: Option<Sheet> =
            decode_envelope(200, br#"{"success":true,"data":{"name":"Design"}}"#).unwrap();
        assert_eq!(data, Some(Sheet { name: "Design".into() }));

        let missing: Option<Sheet> = decode_envelope(200, br#"{"success":true}"#).unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn application_failure_carries_message() {
        let err = decode_envelope::<Value>(200, br#"{"success":false,"error":"Sheet not found"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Sheet not found");

        let err = decode_envelope::<Value>(200, br#"{"success":false}"#).unwrap_err();
        assert_eq!(err.to_string(), UNKNOWN_ERROR);
    }

    #[test]
    fn http_failure_prefers_body_error() {
        let err = decode_envelope::<Value>(500, b"<html>oops</html>").unwrap_err();
        assert_eq!(err, SourceError::Http { status: 500 });
        assert_eq!(err.to_string(), "HTTP error! status: 500");

        let err = decode_envelope::<Value>(503, br#"{"success":false,"error":"quota"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "quota");
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let err = decode_envelope::<Value>(200, b"not json").unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[test]
    fn stage_requests_carry_the_stage_name() {
        assert_eq!(
            form_fields(Action::GetStageData, Some("Design")),
            vec![("action", "getStageData".to_string()), ("stageName", "Design".to_string())]
        );
        assert_eq!(form_fields(Action::GetAllParties, None).len(), 1);
    }
}
