//! Reset-password page: health-care number + OTP + new/confirm password.
//! Stays on the page after success, showing the server confirmation.

use tracing::info;

use crate::api::{PortalApi, ResetPasswordRequest};
use crate::error::ApiError;
use crate::form::FormState;
use crate::routes::Route;
use crate::validate::{Check, FieldRule, OTP_RE};

use super::Phase;

pub const FIELD_HEALTH_CARE_NUMBER: &str = "healthCareNumber";
pub const FIELD_OTP: &str = "otp";
pub const FIELD_NEW_PASSWORD: &str = "newPassword";
pub const FIELD_CONFIRM_PASSWORD: &str = "confirmPassword";

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Password reset successfully.";
pub const DEFAULT_FAILURE_MESSAGE: &str = "An error occurred. Please try again.";

pub const HEALTH_CARE_NUMBER_REJECTED: &str = "The provided Healthcare Number doesn't exist.";
pub const OTP_REJECTED: &str = "The provided OTP is incorrect.";

fn rules() -> Vec<FieldRule> {
    vec![
        // This page checks length only, not digits; preserved as-is.
        FieldRule::new(FIELD_HEALTH_CARE_NUMBER, "Health Care Number")
            .required("Health Care Number is required.")
            .check(Check::ExactLen { len: 14, message: "Health Care Number must be 14 digits long." }),
        FieldRule::new(FIELD_OTP, "OTP")
            .required("OTP is required.")
            .check(Check::Pattern { re: &OTP_RE, message: "OTP must be a 6-digit number." }),
        FieldRule::new(FIELD_NEW_PASSWORD, "New Password")
            .required("New Password is required.")
            .check(Check::MinLen { min: 8, message: "Password must contain at least 8 characters." })
            .secret(),
        FieldRule::new(FIELD_CONFIRM_PASSWORD, "Confirm Password")
            .required("Confirm Password is required.")
            .check(Check::MatchesField { other: FIELD_NEW_PASSWORD, message: "Passwords do not match." })
            .secret(),
    ]
}

pub struct ResetPasswordPage {
    pub form: FormState,
    phase: Phase,
    success: Option<String>,
    banner: Option<String>,
}

impl Default for ResetPasswordPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ResetPasswordPage {
    pub fn new() -> Self {
        Self { form: FormState::new(rules()), phase: Phase::Idle, success: None, banner: None }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Validate, then attempt the reset. Success clears the form and shows
    /// the confirmation; no navigation is signaled.
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

        let req = ResetPasswordRequest {
            health_care_number: self.form.value(FIELD_HEALTH_CARE_NUMBER).to_string(),
            otp: self.form.value(FIELD_OTP).to_string(),
            new_password: self.form.value(FIELD_NEW_PASSWORD).to_string(),
            confirm_password: self.form.value(FIELD_CONFIRM_PASSWORD).to_string(),
        };
        match api.reset_password(&req).await {
            Ok(resp) => {
                info!(target: "portal", "password reset for {}", req.health_care_number);
                self.phase = Phase::Success;
                self.success =
                    Some(resp.message.unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()));
                self.form.reset();
                None
            }
            Err(err) => {
                self.phase = Phase::Failed;
                self.apply_failure(err);
                None
            }
        }
    }

    fn apply_failure(&mut self, err: ApiError) {
        // Contains-matching on the server message is an interim compatibility
        // shim; the remote API defines no error codes.
        let message = err.message().to_string();
        if message.contains("Healthcare number doesn't exist") {
            self.form.set_server_error(FIELD_HEALTH_CARE_NUMBER, HEALTH_CARE_NUMBER_REJECTED);
        } else if message.contains("Invalid OTP") {
            self.form.set_server_error(FIELD_OTP, OTP_REJECTED);
        } else {
            self.banner = Some(match err {
                ApiError::Status { message: Some(m), .. } => m,
                _ => DEFAULT_FAILURE_MESSAGE.to_string(),
            });
        }
    }
}
