//! Forgot-password page: requests an OTP for a health-care number + email,
//! then hands off to the reset-password page.

use tracing::info;

use crate::api::{ForgotPasswordRequest, PortalApi};
use crate::error::ApiError;
use crate::form::FormState;
use crate::routes::Route;
use crate::validate::{Check, FieldRule, EMAIL_RE, HEALTH_CARE_NUMBER_RE};

use super::Phase;

pub const FIELD_HEALTH_CARE_NUMBER: &str = "healthCareNumber";
pub const FIELD_EMAIL: &str = "email";

pub const DEFAULT_SUCCESS_MESSAGE: &str = "OTP sent to your email.";
pub const DEFAULT_FAILURE_MESSAGE: &str = "An error occurred. Please try again.";

fn rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new(FIELD_HEALTH_CARE_NUMBER, "Health Care Number")
            .required("Health Care Number is required.")
            .check(Check::Pattern {
                re: &HEALTH_CARE_NUMBER_RE,
                message: "Health Care Number must be 14 digits.",
            }),
        FieldRule::new(FIELD_EMAIL, "Email")
            .required("Email is required.")
            .check(Check::Pattern { re: &EMAIL_RE, message: "Invalid email format." }),
    ]
}

pub struct ForgotPasswordPage {
    pub form: FormState,
    phase: Phase,
    success: Option<String>,
    banner: Option<String>,
}

impl Default for ForgotPasswordPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ForgotPasswordPage {
    pub fn new() -> Self {
        Self { form: FormState::new(rules()), phase: Phase::Idle, success: None, banner: None }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Server confirmation shown after the OTP was generated.
    pub fn success_message(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Validate, then request the OTP. On success the form is cleared and
    /// navigation to the reset-password page is signaled.
    pub async fn submit(&mut self, api: &dyn PortalApi) -> Option<Route> {
        if self.phase == Phase::Submitting {
            return None;
        }
        self.phase = Phase::Validating;
        if !self.form.validate_all() {
            self.phase = Phase::Invalid;
            return None;
        }
        self.phase = Phase::Submitting;
        self.success = None;
        self.banner = None;

        let req = ForgotPasswordRequest {
            health_care_number: self.form.value(FIELD_HEALTH_CARE_NUMBER).to_string(),
            email: self.form.value(FIELD_EMAIL).to_string(),
        };
        match api.forgot_password(&req).await {
            Ok(resp) => {
                info!(target: "portal", "otp requested for {}", req.health_care_number);
                self.phase = Phase::Success;
                self.success =
                    Some(resp.message.unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()));
                self.form.reset();
                Some(Route::ResetPassword)
            }
            Err(err) => {
                self.phase = Phase::Failed;
                self.banner = Some(match err {
                    ApiError::Status { message: Some(m), .. } => m,
                    _ => DEFAULT_FAILURE_MESSAGE.to_string(),
                });
                None
            }
        }
    }
}
