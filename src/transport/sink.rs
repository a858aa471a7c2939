use crate::error::TransportError;
use crate::messages::{CommandRequest, CommandResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Destination for outgoing command requests
#[async_trait]
pub trait CommandSink: Send {
    async fn send(&self, request: &CommandRequest) -> Result<(), TransportError>;
}

/// Posts commands as JSON to the robot's HTTP endpoint
pub struct HttpSink {
    client: reqwest::Client,
    url: String,
}

impl HttpSink {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl CommandSink for HttpSink {
    async fn send(&self, request: &CommandRequest) -> Result<(), TransportError> {
        let response = self.client.post(&self.url).json(request).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = match response.json::<CommandResponse>().await {
            Ok(CommandResponse::Error { mensaje }) => mensaje,
            Ok(CommandResponse::Ok { accion_ejecutada }) => accion_ejecutada,
            Err(e) => e.to_string(),
        };

        Err(TransportError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
