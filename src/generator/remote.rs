//! HTTP drawing service client

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use super::{CommandGenerator, GenerationContext};
use crate::command::legacy::{try_from_legacy, LegacyDrawingCommand};
use crate::command::Command;
use crate::config::RemoteConfig;
use crate::errors::{DrawError, Result};

/// Body of `POST /ai/generate-drawing`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDrawingRequest<'a> {
    pub user_id: u64,
    pub prompt: &'a str,
    pub title: &'a str,
}

/// Decode a generation response.
///
/// The body must be an object with a `commands` array of interchange
/// commands. Unlike replay, one undecodable entry fails the whole response.
pub fn parse_generation_response(body: Value) -> Result<Vec<Command>> {
    let Some(entries) = body.get("commands").and_then(Value::as_array) else {
        return Err(DrawError::generation("Invalid response format from server"));
    };

    let legacy: Vec<LegacyDrawingCommand> = entries
        .iter()
        .map(|entry| {
            serde_json::from_value(entry.clone())
                .map_err(|e| DrawError::generation(format!("Invalid command entry: {e}")))
        })
        .collect::<Result<_>>()?;

    try_from_legacy(&legacy)
        .map_err(|e| DrawError::generation(format!("Invalid command parameters: {e}")))
}

/// Generator backed by the remote drawing service
#[derive(Clone)]
pub struct RemoteGenerator {
    config: RemoteConfig,
    client: reqwest::Client,
}

impl RemoteGenerator {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("drawbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DrawError::Network(Arc::new(format!("Failed to create HTTP client: {e}")))
            })?;

        info!("Remote generator using {}", config.base_url);
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }
}

#[async_trait]
impl CommandGenerator for RemoteGenerator {
    fn name(&self) -> &str {
        "remote"
    }

    async fn generate(&self, prompt: &str, context: &GenerationContext) -> Result<Vec<Command>> {
        let url = self.config.generate_url();
        let request = GenerateDrawingRequest {
            user_id: context.user_id,
            prompt,
            title: &context.title,
        };
        debug!("Requesting drawing from {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    DrawError::Network(Arc::new(format!(
                        "No response from server at {url}. Please check if the server is running."
                    )))
                } else {
                    DrawError::from(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| "Unknown error".to_string());
            error!("Drawing service error {}: {}", status.as_u16(), message);
            return Err(DrawError::generation(format!(
                "Server error ({}): {}",
                status.as_u16(),
                message
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| DrawError::generation(format!("Invalid response body: {e}")))?;

        let commands = parse_generation_response(body)?;
        debug!(commands = commands.len(), "Remote generation complete");
        Ok(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_names() {
        let request = GenerateDrawingRequest {
            user_id: 2,
            prompt: "a tree",
            title: "Drawing: a tree",
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"userId": 2, "prompt": "a tree", "title": "Drawing: a tree"})
        );
    }

    #[test]
    fn test_parse_response_sorts_and_maps_types() {
        let body = json!({
            "commands": [
                {"commandType": "CIRCLE", "parameters": "{\"x\":1,\"y\":2,\"radius\":3,\"color\":\"red\"}", "order": 1},
                {"commandType": "RECTANGLE", "parameters": "{\"x\":0,\"y\":0,\"width\":4,\"height\":5}", "order": 0}
            ]
        });
        let commands = parse_generation_response(body).unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Rect {
                    x: 0.0,
                    y: 0.0,
                    width: 4.0,
                    height: 5.0,
                    color: None,
                },
                Command::circle(1.0, 2.0, 3.0, "red"),
            ]
        );
    }

    #[test]
    fn test_parse_response_rejects_bad_shape() {
        assert!(matches!(
            parse_generation_response(json!({"items": []})),
            Err(DrawError::Generation(_))
        ));
        assert!(matches!(
            parse_generation_response(json!({"commands": [
                {"commandType": "LINE", "parameters": "{broken", "order": 0}
            ]})),
            Err(DrawError::Generation(_))
        ));
    }

    #[test]
    fn test_new_rejects_bad_url() {
        let config = RemoteConfig {
            base_url: "ftp://example".to_string(),
            ..RemoteConfig::default()
        };
        assert!(matches!(
            RemoteGenerator::new(config),
            Err(DrawError::Configuration(_))
        ));
    }
}
