//! Page controllers: one small state machine per routed page.
//!
//! Every page owns a `FormState` and a [`Phase`]. Submit is the only async
//! transition; `Validating` is synchronous and resolves immediately into
//! `Invalid` or `Submitting`. While `Submitting`, further submits are ignored.

pub mod dashboard;
pub mod forgot_password;
pub mod login;
pub mod register;
pub mod reset_password;

pub use dashboard::DashboardPage;
pub use forgot_password::ForgotPasswordPage;
pub use login::LoginPage;
pub use register::RegisterPage;
pub use reset_password::ResetPasswordPage;

/// Lifecycle of a page instance. The tagged union makes the illegal
/// loading/success/error flag combinations of the old portal unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fields empty or being edited; no submit in flight.
    Idle,
    /// Submit pressed; synchronous validation running.
    Validating,
    /// Validation failed; error map populated, awaiting edits.
    Invalid,
    /// Exactly one API call in flight; re-submits are ignored.
    Submitting,
    /// The remote action succeeded; navigation (if any) has been signaled.
    Success,
    /// The remote action failed; errors mapped to fields or the banner.
    Failed,
}
