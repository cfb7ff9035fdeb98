//! REST backend client.

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Appointment;

/// Response body of `GET /user/countNonAdminUsers`.
#[derive(Debug, Deserialize)]
struct UserCount {
    count: u64,
}

/// Body of `PATCH /schedules/updateByDateTime`, freeing a slot by date/time.
#[derive(Debug, Serialize)]
struct SlotKey<'a> {
    date: &'a str,
    time: &'a str,
}

/// Body of `PATCH /Appointments/api/accept/{id}`.
#[derive(Debug, Serialize)]
struct AcceptBody<'a> {
    #[serde(rename = "meetLink")]
    meet_link: &'a str,
}

/// Response body of `POST /auth/forgot-password`.
#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl ForgotPasswordResponse {
    /// Whether the backend acknowledged the reset request.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Clinic backend HTTP client.
///
/// One method per endpoint; no retry and no caching. Non-2xx responses map
/// to [`AppError::Backend`] with the response body as the message.
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The backend host (e.g., "https://backend.example.com")
    /// * `timeout_secs` - Per-request timeout
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{base}{path}", base = self.base_url)
    }

    /// Count registered non-admin users.
    pub async fn count_non_admin_users(&self) -> Result<u64> {
        let response = self.client.get(self.endpoint("/user/countNonAdminUsers")).send().await?;
        let body: UserCount = ensure_success(response).await?.json().await?;
        Ok(body.count)
    }

    /// Fetch all appointments awaiting an accept/reject decision.
    pub async fn pending_appointments(&self) -> Result<Vec<Appointment>> {
        let response = self.client.get(self.endpoint("/Appointments/api/pending")).send().await?;
        let appointments = ensure_success(response).await?.json().await?;
        Ok(appointments)
    }

    /// Mark an appointment rejected.
    pub async fn reject_appointment(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&format!("/Appointments/api/reject/{id}"));
        let response = self.client.patch(&url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Free the schedule slot held by a rejected appointment.
    pub async fn release_slot(&self, date: &str, time: &str) -> Result<()> {
        let url = self.endpoint("/schedules/updateByDateTime");
        let response = self.client.patch(&url).json(&SlotKey { date, time }).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Mark an appointment accepted, attaching the meeting link.
    pub async fn accept_appointment(&self, id: &str, meet_link: &str) -> Result<()> {
        let url = self.endpoint(&format!("/Appointments/api/accept/{id}"));
        let response = self.client.patch(&url).json(&AcceptBody { meet_link }).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Ask the backend to email a password-reset link.
    pub async fn request_password_reset(&self, email: &str) -> Result<ForgotPasswordResponse> {
        let url = self.endpoint("/auth/forgot-password");
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;
        // The backend reports failures in the body with a 200, so parse
        // either way and let the caller inspect `status`.
        let body = response.json().await?;
        Ok(body)
    }

    /// Download a receipt image from its absolute URL.
    pub async fn fetch_receipt(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Check that the backend answers at all.
    pub async fn test_connection(&self) -> Result<bool> {
        let response = self.client.get(self.endpoint("/user/countNonAdminUsers")).send().await?;
        Ok(response.status().is_success())
    }
}

/// Map a non-2xx response to [`AppError::Backend`].
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(AppError::backend(status.as_u16(), message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = BackendClient::new("https://example.test/", 30);
        assert_eq!(
            client.endpoint("/Appointments/api/pending"),
            "https://example.test/Appointments/api/pending"
        );
    }

    #[test]
    fn test_reject_endpoint_carries_id() {
        let client = BackendClient::new("https://example.test", 30);
        assert_eq!(
            client.endpoint(&format!("/Appointments/api/reject/{}", "65f1")),
            "https://example.test/Appointments/api/reject/65f1"
        );
    }

    #[test]
    fn test_accept_body_uses_backend_field_name() {
        let body = serde_json::to_value(AcceptBody {
            meet_link: "https://meet.google.com/abc",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "meetLink": "https://meet.google.com/abc" }));
    }

    #[test]
    fn test_slot_key_body_shape() {
        let body = serde_json::to_value(SlotKey {
            date: "2026-01-05",
            time: "14:30",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "date": "2026-01-05", "time": "14:30" }));
    }

    #[test]
    fn test_forgot_password_response() {
        let ok: ForgotPasswordResponse = serde_json::from_str(r#"{ "status": "success", "message": "sent" }"#).unwrap();
        assert!(ok.is_success());

        let err: ForgotPasswordResponse =
            serde_json::from_str(r#"{ "status": "error", "message": "unknown email" }"#).unwrap();
        assert!(!err.is_success());
        assert_eq!(err.message, "unknown email");
    }

    #[test]
    fn test_forgot_password_response_without_message() {
        let resp: ForgotPasswordResponse = serde_json::from_str(r#"{ "status": "success" }"#).unwrap();
        assert!(resp.is_success());
        assert!(resp.message.is_empty());
    }
}
