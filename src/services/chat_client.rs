// src/services/chat_client.rs
use std::time::Duration;

use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::{
    config::WidgetConfig,
    error::ClientError,
    message::{ChatRequest, ServerReply},
};

/// Anything that can answer a chat query.
pub trait ChatBackend: Send + Sync + 'static {
    fn send_query(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<ServerReply, ClientError>> + Send;
}

/// POSTs `{"query": ...}` as JSON and decodes whatever JSON comes back.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    http: Client,
    endpoint: Url,
}

impl HttpChatClient {
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint,
        })
    }

    pub fn from_config(config: &WidgetConfig) -> Result<Self, ClientError> {
        Self::new(config.endpoint.clone(), config.timeout)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl ChatBackend for HttpChatClient {
    async fn send_query(&self, query: &str) -> Result<ServerReply, ClientError> {
        let request = ChatRequest {
            query: query.to_string(),
        };

        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        // status is not checked: error bodies are JSON too
        let status = res.status();
        let body = res.bytes().await?;
        let reply: ServerReply = serde_json::from_slice(&body)?;

        if let Some(err) = &reply.error {
            warn!(%status, error = %err, "chat service reported an error");
        } else {
            debug!(%status, bytes = body.len(), "chat reply received");
        }

        Ok(reply)
    }
}
