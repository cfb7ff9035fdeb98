//! Acceptance notification via an EmailJS-compatible REST API.

use reqwest::Client;
use serde::Serialize;

use crate::config::EmailConfig;
use crate::error::{AppError, Result};

/// EmailJS REST send endpoint.
const SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Template parameters for the acceptance notification.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptanceEmail {
    pub to_email: String,
    pub meet_link: String,
    pub date: String,
    pub time: String,
    pub appointment_type: String,
}

/// Request body for the EmailJS send endpoint.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a AcceptanceEmail,
}

/// Transactional email sender.
///
/// Delivery is best-effort from the caller's point of view: the accept
/// workflow logs a failed send and moves on, it never rolls back the
/// already-committed accept.
pub struct EmailNotifier {
    client: Client,
    config: EmailConfig,
    endpoint: String,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self::with_endpoint(config, SEND_URL.to_string())
    }

    /// Create a notifier targeting a specific send endpoint.
    pub fn with_endpoint(config: EmailConfig, endpoint: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            config,
            endpoint,
        }
    }

    /// Send the acceptance notification to the requester.
    pub async fn send_acceptance(&self, params: &AcceptanceEmail) -> Result<()> {
        if !self.config.enabled {
            tracing::debug!("Email disabled in config, skipping notification to {}", params.to_email);
            return Ok(());
        }

        let body = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: params,
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        if response.status().is_success() {
            tracing::info!("Acceptance email sent to {}", params.to_email);
            Ok(())
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(AppError::Email(format!("{status}: {text}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_request_body_shape() {
        let params = AcceptanceEmail {
            to_email: "jane@example.com".to_string(),
            meet_link: "https://meet.google.com/abc-defg-hij".to_string(),
            date: "2026-01-05".to_string(),
            time: "14:30".to_string(),
            appointment_type: "counseling".to_string(),
        };
        let body = SendRequest {
            service_id: "svc",
            template_id: "tpl",
            user_id: "key",
            template_params: &params,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["service_id"], "svc");
        assert_eq!(json["template_id"], "tpl");
        assert_eq!(json["user_id"], "key");
        assert_eq!(json["template_params"]["to_email"], "jane@example.com");
        assert_eq!(json["template_params"]["meet_link"], "https://meet.google.com/abc-defg-hij");
        assert_eq!(json["template_params"]["appointment_type"], "counseling");
    }
}
