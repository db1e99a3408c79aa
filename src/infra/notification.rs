//! Push notification delivery through Firebase Cloud Messaging (HTTP v1).
//!
//! Delivery is best-effort. `NotificationError` has no conversion into
//! `AppError`; the reservation flow logs failures and moves on.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::{Config, FCM_SEND_URL_TEMPLATE, FCM_TIMEOUT_SECONDS};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("device token is empty")]
    MissingToken,

    #[error("push transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("push provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// One push message addressed to a single device.
#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub token: String,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send(&self, message: PushMessage) -> Result<(), NotificationError>;
}

#[derive(Serialize)]
struct FcmRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Serialize)]
struct FcmMessage<'a> {
    token: &'a str,
    notification: FcmNotification<'a>,
    data: &'a HashMap<String, String>,
}

#[derive(Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

impl<'a> From<&'a PushMessage> for FcmRequest<'a> {
    fn from(message: &'a PushMessage) -> Self {
        Self {
            message: FcmMessage {
                token: &message.token,
                notification: FcmNotification {
                    title: &message.title,
                    body: &message.body,
                },
                data: &message.data,
            },
        }
    }
}

/// FCM HTTP v1 client authenticated with a bearer access token.
pub struct FcmGateway {
    http: reqwest::Client,
    send_url: String,
    access_token: String,
}

impl FcmGateway {
    pub fn new(project_id: &str, access_token: &str) -> Result<Self, NotificationError> {
        let http = reqwest::Client::builder()
            .user_agent("petcare-api")
            .timeout(Duration::from_secs(FCM_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            http,
            send_url: FCM_SEND_URL_TEMPLATE.replace("{project}", project_id),
            access_token: access_token.to_string(),
        })
    }
}

#[async_trait]
impl NotificationGateway for FcmGateway {
    async fn send(&self, message: PushMessage) -> Result<(), NotificationError> {
        if message.token.trim().is_empty() {
            return Err(NotificationError::MissingToken);
        }

        let response = self
            .http
            .post(&self.send_url)
            .bearer_auth(&self.access_token)
            .json(&FcmRequest::from(&message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Push notification delivered");
        Ok(())
    }
}

/// Gateway used when FCM is not configured; drops every message.
pub struct DisabledGateway;

#[async_trait]
impl NotificationGateway for DisabledGateway {
    async fn send(&self, message: PushMessage) -> Result<(), NotificationError> {
        tracing::debug!(title = %message.title, "Push disabled, message dropped");
        Ok(())
    }
}

/// Pick the FCM gateway when credentials are configured.
pub fn gateway_from_config(config: &Config) -> Arc<dyn NotificationGateway> {
    match config.fcm_credentials() {
        Some((project, token)) => match FcmGateway::new(project, token) {
            Ok(gateway) => Arc::new(gateway),
            Err(e) => {
                tracing::warn!(error = %e, "FCM client init failed, push disabled");
                Arc::new(DisabledGateway)
            }
        },
        None => Arc::new(DisabledGateway),
    }
}
