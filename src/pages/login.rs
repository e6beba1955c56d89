//! Login page: health-care number + email + password, writes the session on
//! success and navigates to the dashboard.

use tracing::info;

use crate::api::{LoginRequest, PortalApi};
use crate::error::ApiError;
use crate::form::FormState;
use crate::routes::Route;
use crate::session::SessionStore;
use crate::validate::{Check, FieldRule, EMAIL_RE, HEALTH_CARE_NUMBER_RE};

use super::Phase;

pub const FIELD_HEALTH_CARE_NUMBER: &str = "healthCareNumber";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD: &str = "password";

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access - check your credentials.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

fn rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new(FIELD_HEALTH_CARE_NUMBER, "HealthCare Number")
            .required("HealthCare Number is required.")
            .check(Check::Pattern {
                re: &HEALTH_CARE_NUMBER_RE,
                message: "Must be 14 digits and only numbers.",
            }),
        FieldRule::new(FIELD_EMAIL, "Email")
            .required("Email is required.")
            .check(Check::Pattern { re: &EMAIL_RE, message: "Invalid email format." }),
        FieldRule::new(FIELD_PASSWORD, "Password")
            .required("Password is required.")
            .check(Check::Password {
                message: "Must contain at least one uppercase, lowercase, number, and special character.",
            })
            .secret(),
    ]
}

pub struct LoginPage {
    pub form: FormState,
    phase: Phase,
    banner: Option<String>,
}

impl Default for LoginPage {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginPage {
    pub fn new() -> Self {
        Self { form: FormState::new(rules()), phase: Phase::Idle, banner: None }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Page-level error message, shown below the form.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Validate, then attempt the login. On success the profile is written
    /// into `session` and navigation to the dashboard is signaled.
    pub async fn submit(&mut self, api: &dyn PortalApi, session: &SessionStore) -> Option<Route> {
        if self.phase == Phase::Submitting {
            return None;
        }
        self.phase = Phase::Validating;
        if !self.form.validate_all() {
            self.phase = Phase::Invalid;
            return None;
        }
        self.phase = Phase::Submitting;
        self.banner = None;

        let req = LoginRequest {
            health_care_number: self.form.value(FIELD_HEALTH_CARE_NUMBER).to_string(),
            email: self.form.value(FIELD_EMAIL).to_string(),
            password: self.form.value(FIELD_PASSWORD).to_string(),
        };
        match api.login(&req).await {
            Ok(profile) => {
                info!(target: "portal", "login ok for {}", profile.health_care_number);
                session.set(profile);
                self.phase = Phase::Success;
                Some(Route::Dashboard)
            }
            Err(err) => {
                self.phase = Phase::Failed;
                self.apply_failure(err);
                None
            }
        }
    }

    fn apply_failure(&mut self, err: ApiError) {
        match err {
            ApiError::Status { status: 401, .. } => {
                self.banner = Some(UNAUTHORIZED_MESSAGE.to_string());
            }
            ApiError::Status { message: Some(msg), .. } if msg == "HealthCare Number doesn't exist" => {
                self.form.set_server_error(FIELD_HEALTH_CARE_NUMBER, msg);
            }
            ApiError::Status { message: Some(msg), .. } if msg == "Email doesn't exist" => {
                self.form.set_server_error(FIELD_EMAIL, msg);
            }
            ApiError::Status { message, .. } => {
                self.banner = Some(message.unwrap_or_else(|| "Login failed".to_string()));
            }
            ApiError::Transport { .. } => {
                self.banner = Some(UNEXPECTED_ERROR_MESSAGE.to_string());
            }
        }
    }
}
