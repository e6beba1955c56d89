//! HTTP client for the remote user service.
//!
//! One POST per remote action against a fixed base URL. Successes decode to
//! typed payloads; failures normalize into [`ApiError`] so transport faults
//! never leak upward (see `error`).

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PortalConfig;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub health_care_number: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub health_care_number: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub health_care_number: String,
    pub otp: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// The full registration record. Values travel verbatim as the strings the
/// form collected; the service owns any further typing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub registration_date: String,
    pub registration_time: String,
    pub patient_first_name: String,
    pub patient_last_name: String,
    pub sex: String,
    pub birth_month: String,
    pub birth_day: String,
    pub birth_year: String,
    pub phone_number: String,
    pub email: String,
    pub password: String,
    pub street_address: String,
    pub street_address_line2: String,
    pub city: String,
    pub state_or_province: String,
    pub postal_or_zip_code: String,
    pub marital_status: String,
    pub emergency_contact_first_name: String,
    pub emergency_contact_last_name: String,
    pub emergency_contact_relationship: String,
    pub emergency_contact_phone_number: String,
    pub family_doctor_first_name: String,
    pub family_doctor_last_name: String,
    pub family_doctor_phone_number: String,
    pub preferred_pharmacy: String,
    pub pharmacy_phone_number: String,
    pub reason_for_registration: String,
    pub additional_notes: String,
    pub insurance_company: String,
    #[serde(rename = "insuranceID")]
    pub insurance_id: String,
    pub policy_holder_first_name: String,
    pub policy_holder_last_name: String,
    pub policy_holder_date_of_birth: String,
}

/// Authenticated user's profile as returned by login. Fields the dashboard
/// renders are typed; anything else the service sends round-trips in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub health_care_number: String,
    pub email: String,
    pub patient_first_name: String,
    pub patient_last_name: String,
    pub sex: String,
    pub family_doctor_first_name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body shape the service uses for rejections.
#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Seam between page controllers and the network. Tests drive controllers
/// against a recording mock; production uses [`HttpPortalApi`].
#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> ApiResult<Profile>;
    async fn register(&self, form: &RegistrationForm) -> ApiResult<()>;
    async fn forgot_password(&self, req: &ForgotPasswordRequest) -> ApiResult<MessageResponse>;
    async fn reset_password(&self, req: &ResetPasswordRequest) -> ApiResult<MessageResponse>;
}

pub struct HttpPortalApi {
    base: String,
    client: reqwest::Client,
}

impl HttpPortalApi {
    pub fn new(cfg: &PortalConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(cfg.timeout).build()?;
        Ok(Self { base: cfg.api_url.trim_end_matches('/').to_string(), client })
    }

    /// `path` is appended to the base URL, which already carries `/api/users`.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + Sync,
        T: serde::de::DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(target: "portal", "POST {url}");
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                debug!(target: "portal", "transport failure on {url}: {e}");
                ApiError::transport()
            })?;
        let status = resp.status();
        if status.is_success() {
            resp.json::<T>().await.map_err(|e| {
                debug!(target: "portal", "bad success payload from {url}: {e}");
                ApiError::transport()
            })
        } else {
            let body: ErrorBody = resp.json().await.unwrap_or_default();
            Err(ApiError::status(status.as_u16(), body.message))
        }
    }

    /// POST that only cares about the HTTP ok flag, not the body.
    async fn post_json_unit<B: Serialize + Sync>(&self, path: &str, body: &B) -> ApiResult<()> {
        let url = self.endpoint(path);
        debug!(target: "portal", "POST {url}");
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|_| ApiError::transport())?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body: ErrorBody = resp.json().await.unwrap_or_default();
            Err(ApiError::status(status.as_u16(), body.message))
        }
    }
}

#[async_trait]
impl PortalApi for HttpPortalApi {
    async fn login(&self, req: &LoginRequest) -> ApiResult<Profile> {
        self.post_json("/login", req).await
    }

    async fn register(&self, form: &RegistrationForm) -> ApiResult<()> {
        self.post_json_unit("/register", form).await
    }

    async fn forgot_password(&self, req: &ForgotPasswordRequest) -> ApiResult<MessageResponse> {
        self.post_json("/forgot-password", req).await
    }

    async fn reset_password(&self, req: &ResetPasswordRequest) -> ApiResult<MessageResponse> {
        self.post_json("/reset-password", req).await
    }
}
