//! Firebase Cloud Messaging HTTP v1 client.

use pulse_common::services::PushPayload;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::auth::TokenSource;
use crate::error::PushError;

pub const FCM_BASE_URL: &str = "https://fcm.googleapis.com";

/// Upper bound for a single `messages:send` call, token fetch excluded.
pub const FCM_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Top-level body of `messages:send`.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FcmMessage {
    pub message: Message,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Message {
    pub token: String,
    pub notification: Notification,
    pub data: BTreeMap<String, String>,
    pub webpush: WebpushConfig,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Web push specifics; the tag collapses repeated notifications of one kind.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WebpushConfig {
    pub notification: WebpushNotification,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WebpushNotification {
    pub tag: String,
    pub icon: String,
    pub badge: String,
}

impl FcmMessage {
    pub fn for_device(registration_token: &str, payload: &PushPayload) -> Self {
        Self {
            message: Message {
                token: registration_token.to_string(),
                notification: Notification {
                    title: payload.title.clone(),
                    body: payload.body.clone(),
                },
                data: payload.data.clone(),
                webpush: WebpushConfig {
                    notification: WebpushNotification {
                        tag: payload.tag.clone(),
                        icon: "/logo.svg".to_string(),
                        badge: "/logo.svg".to_string(),
                    },
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FcmResponse {
    /// `projects/{project_id}/messages/{message_id}`
    pub name: String,
}

#[derive(Clone)]
pub struct FcmClient {
    client: Client,
    base_url: String,
    project_id: String,
    tokens: Arc<dyn TokenSource>,
    timeout: Duration,
}

impl FcmClient {
    pub fn new(project_id: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            client: Client::new(),
            base_url: FCM_BASE_URL.to_string(),
            project_id: project_id.into(),
            tokens,
            timeout: FCM_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Points the client at another host, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sends one message and returns the FCM message name.
    pub async fn send(&self, message: &FcmMessage) -> Result<String, PushError> {
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.base_url, self.project_id
        );
        let token = self.tokens.token().await?;

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("FCM answered {}: {}", status, body);
            return Err(PushError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let fcm_response: FcmResponse = response.json().await?;
        Ok(fcm_response.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenSource;
    use wiremock::matchers::{header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> PushPayload {
        let mut data = BTreeMap::new();
        data.insert("type".to_string(), "nudge".to_string());
        PushPayload {
            title: "💗 Nudge from Alex".to_string(),
            body: "Alex wants to know how you're doing!".to_string(),
            tag: "aimo-pulse-nudge".to_string(),
            data,
        }
    }

    fn client(server: &MockServer) -> FcmClient {
        FcmClient::new("pulse-test", Arc::new(StaticTokenSource("t0k3n".into())))
            .with_base_url(server.uri())
    }

    #[test]
    fn test_message_shape() {
        let message = FcmMessage::for_device("device-token", &payload());
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["message"]["token"], "device-token");
        assert_eq!(json["message"]["notification"]["title"], "💗 Nudge from Alex");
        assert_eq!(json["message"]["data"]["type"], "nudge");
        assert_eq!(json["message"]["webpush"]["notification"]["tag"], "aimo-pulse-nudge");
    }

    #[tokio::test]
    async fn test_send_returns_message_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/projects/pulse-test/messages:send"))
            .and(header_eq("authorization", "Bearer t0k3n"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "projects/pulse-test/messages/42"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let name = client(&server)
            .send(&FcmMessage::for_device("device-token", &payload()))
            .await
            .unwrap();
        assert_eq!(name, "projects/pulse-test/messages/42");
    }

    #[tokio::test]
    async fn test_slow_fcm_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_json(serde_json::json!({"name": "late"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .with_timeout(Duration::from_millis(100))
            .send(&FcmMessage::for_device("device-token", &payload()))
            .await
            .unwrap_err();
        assert!(matches!(err, PushError::Request(ref e) if e.is_timeout()));
        assert!(!err.is_unregistered());
    }

    #[tokio::test]
    async fn test_unregistered_token_is_recognised() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("UNREGISTERED"))
            .mount(&server)
            .await;

        let err = client(&server)
            .send(&FcmMessage::for_device("stale", &payload()))
            .await
            .unwrap_err();
        assert!(err.is_unregistered());
    }
}
