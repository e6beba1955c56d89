//! Navigation vocabulary the page controllers emit on success.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    Dashboard,
}

impl Route {
    /// Path as exposed by the portal's router.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::ForgotPassword => "/forgotpassword",
            Route::ResetPassword => "/resetpassword",
            Route::Dashboard => "/welcomepage",
        }
    }
}
