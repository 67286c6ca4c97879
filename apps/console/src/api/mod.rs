use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use pms_core::row::rows_from_values;
use pms_core::source::{decode_envelope, form_fields};
use pms_core::{Action, Party, RawRow, SourceError, SourceResult, StageDump, StageSource};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;

pub type ClientResult<T> = Result<T, ClientError>;

/// Form-POST client for the spreadsheet script endpoint.
#[derive(Clone)]
pub struct ScriptClient {
    inner: reqwest::Client,
    config: Arc<AppConfig>,
}

impl ScriptClient {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        reqwest::Url::parse(&config.script_url)
            .with_context(|| format!("invalid script url {}", config.script_url))?;

        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.request_timeout);

        let client = builder.build().context("failed to build reqwest client")?;

        Ok(Self {
            inner: client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }

    async fn call<T>(&self, action: Action, stage_name: Option<&str>) -> ClientResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let fields = form_fields(action, stage_name);
        debug!(action = action.as_str(), stage = ?stage_name, "script request");

        let response = self
            .inner
            .post(&self.config.script_url)
            .form(&fields)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(action = action.as_str(), %status, bytes = bytes.len(), "script response");

        decode_envelope(status.as_u16(), &bytes).map_err(ClientError::Script)
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Script(SourceError),
}

impl From<ClientError> for SourceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(err) => match err.status() {
                Some(status) => SourceError::Http {
                    status: status.as_u16(),
                },
                None => SourceError::Transport(err.to_string()),
            },
            ClientError::Script(err) => err,
        }
    }
}

fn throttle_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}

fn object_rows(values: Vec<Value>) -> Vec<StageDump> {
    values
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(object) => Some(StageDump::from_object(object)),
            _ => None,
        })
        .collect()
}

impl StageSource for ScriptClient {
    async fn all_parties(&self) -> SourceResult<Vec<Party>> {
        let parties: Option<Vec<Party>> = self.call(Action::GetAllParties, None).await?;
        Ok(parties.unwrap_or_default())
    }

    async fn all_stage_data(&self) -> SourceResult<Vec<StageDump>> {
        let stages: Option<Vec<Value>> = self.call(Action::GetAllStageData, None).await?;
        Ok(object_rows(stages.unwrap_or_default()))
    }

    async fn stage_rows(&self, stage_name: &str) -> SourceResult<Vec<RawRow>> {
        let rows: Option<Vec<Value>> = self.call(Action::GetStageData, Some(stage_name)).await?;
        Ok(rows_from_values(rows.unwrap_or_default()))
    }

    async fn throttle(&self, delay: Duration) {
        #[cfg(target_arch = "wasm32")]
        gloo_timers::future::TimeoutFuture::new(throttle_millis(delay)).await;

        // no timer outside the browser; batches run back to back
        #[cfg(not(target_arch = "wasm32"))]
        debug!(skipped_ms = throttle_millis(delay), "batch pause skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn script_errors_pass_through_unchanged() {
        let err: SourceError = ClientError::Script(SourceError::Http { status: 404 }).into();
        assert_eq!(err.to_string(), "HTTP error! status: 404");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn undecodable_bodies_surface_as_source_decode() {
        let err: SourceError = ClientError::Script(
            decode_envelope::<Value>(200, b"{").unwrap_err(),
        )
        .into();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_throttle_returns_without_blocking() {
        let client = ScriptClient::new(AppConfig::default()).unwrap();
        let started = std::time::Instant::now();
        futures::executor::block_on(client.throttle(Duration::from_secs(5)));
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(throttle_millis(Duration::from_secs(u64::MAX)), u32::MAX);
    }

    #[test]
    fn stage_dump_keeps_only_objects() {
        let dumps = object_rows(vec![
            json!({"name": "Design", "stageData": [{"PartyName": "Acme"}]}),
            json!("stray"),
            json!({"Stage": "Civil", "stageData": []}),
        ]);
        let names: Vec<_> = dumps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Design", "Civil"]);
        assert_eq!(dumps[0].rows.len(), 1);
    }

    #[test]
    fn rejects_unparsable_url() {
        let config = AppConfig {
            script_url: "not a url".into(),
            ..AppConfig::default()
        };
        assert!(ScriptClient::new(config).is_err());
    }
}
