//! End-to-end page controller flows against a recording mock of the user
//! service: navigation, session writes and server-error mapping.

use async_trait::async_trait;
use parking_lot::Mutex;

use patient_portal::api::{
    ForgotPasswordRequest, LoginRequest, MessageResponse, PortalApi, Profile, RegistrationForm,
    ResetPasswordRequest,
};
use patient_portal::error::{ApiError, ApiResult};
use patient_portal::pages::{
    ForgotPasswordPage, LoginPage, Phase, RegisterPage, ResetPasswordPage,
};
use patient_portal::routes::Route;
use patient_portal::session::SessionStore;

#[derive(Default)]
struct MockApi {
    login: Mutex<Option<ApiResult<Profile>>>,
    register: Mutex<Option<ApiResult<()>>>,
    forgot: Mutex<Option<ApiResult<MessageResponse>>>,
    reset: Mutex<Option<ApiResult<MessageResponse>>>,
    calls: Mutex<Vec<String>>,
}

impl MockApi {
    fn new() -> Self {
        Self::default()
    }

    fn with_login(self, result: ApiResult<Profile>) -> Self {
        *self.login.lock() = Some(result);
        self
    }

    fn with_register(self, result: ApiResult<()>) -> Self {
        *self.register.lock() = Some(result);
        self
    }

    fn with_forgot(self, result: ApiResult<MessageResponse>) -> Self {
        *self.forgot.lock() = Some(result);
        self
    }

    fn with_reset(self, result: ApiResult<MessageResponse>) -> Self {
        *self.reset.lock() = Some(result);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl PortalApi for MockApi {
    async fn login(&self, req: &LoginRequest) -> ApiResult<Profile> {
        self.calls.lock().push(format!("login {}", req.health_care_number));
        self.login.lock().clone().expect("unexpected login call")
    }

    async fn register(&self, form: &RegistrationForm) -> ApiResult<()> {
        self.calls.lock().push(format!("register {}", form.email));
        self.register.lock().clone().expect("unexpected register call")
    }

    async fn forgot_password(&self, req: &ForgotPasswordRequest) -> ApiResult<MessageResponse> {
        self.calls.lock().push(format!("forgot-password {}", req.health_care_number));
        self.forgot.lock().clone().expect("unexpected forgot-password call")
    }

    async fn reset_password(&self, req: &ResetPasswordRequest) -> ApiResult<MessageResponse> {
        self.calls.lock().push(format!("reset-password {}", req.health_care_number));
        self.reset.lock().clone().expect("unexpected reset-password call")
    }
}

fn sample_profile() -> Profile {
    Profile {
        health_care_number: "12345678901234".into(),
        email: "ada@b.co".into(),
        patient_first_name: "Ada".into(),
        patient_last_name: "Lovelace".into(),
        sex: "Female".into(),
        family_doctor_first_name: "Gregory".into(),
        ..Default::default()
    }
}

fn fill_login(page: &mut LoginPage) {
    page.form.on_field_change("healthCareNumber", "12345678901234");
    page.form.on_field_change("email", "ada@b.co");
    page.form.on_field_change("password", "Aa1!aaaa");
}

#[tokio::test]
async fn login_success_stores_session_and_navigates_to_dashboard() {
    let api = MockApi::new().with_login(Ok(sample_profile()));
    let session = SessionStore::in_memory();
    let mut page = LoginPage::new();
    fill_login(&mut page);

    let nav = page.submit(&api, &session).await;

    assert_eq!(nav, Some(Route::Dashboard));
    assert_eq!(page.phase(), Phase::Success);
    assert_eq!(session.get(), Some(sample_profile()));
    assert_eq!(api.calls(), vec!["login 12345678901234"]);
}

#[tokio::test]
async fn login_unauthorized_shows_banner_and_leaves_session_untouched() {
    let api = MockApi::new().with_login(Err(ApiError::status(401, None)));
    let session = SessionStore::in_memory();
    let mut page = LoginPage::new();
    fill_login(&mut page);

    let nav = page.submit(&api, &session).await;

    assert_eq!(nav, None);
    assert_eq!(page.phase(), Phase::Failed);
    assert_eq!(page.banner(), Some("Unauthorized access - check your credentials."));
    assert!(session.get().is_none());
}

#[tokio::test]
async fn login_maps_known_rejections_onto_field_slots() {
    let session = SessionStore::in_memory();

    let api = MockApi::new()
        .with_login(Err(ApiError::status(400, Some("HealthCare Number doesn't exist".into()))));
    let mut page = LoginPage::new();
    fill_login(&mut page);
    page.submit(&api, &session).await;
    assert_eq!(page.form.error("healthCareNumber"), Some("HealthCare Number doesn't exist"));
    assert_eq!(page.banner(), None);

    let api =
        MockApi::new().with_login(Err(ApiError::status(400, Some("Email doesn't exist".into()))));
    let mut page = LoginPage::new();
    fill_login(&mut page);
    page.submit(&api, &session).await;
    assert_eq!(page.form.error("email"), Some("Email doesn't exist"));
}

#[tokio::test]
async fn login_transport_failure_shows_generic_banner() {
    let api = MockApi::new().with_login(Err(ApiError::transport()));
    let session = SessionStore::in_memory();
    let mut page = LoginPage::new();
    fill_login(&mut page);

    page.submit(&api, &session).await;

    assert_eq!(page.phase(), Phase::Failed);
    assert_eq!(page.banner(), Some("An unexpected error occurred. Please try again later."));
}

#[tokio::test]
async fn invalid_login_never_reaches_the_network() {
    let api = MockApi::new();
    let session = SessionStore::in_memory();
    let mut page = LoginPage::new();
    page.form.on_field_change("healthCareNumber", "123");
    page.form.on_field_change("email", "ada@b.co");
    page.form.on_field_change("password", "Aa1!aaaa");

    let nav = page.submit(&api, &session).await;

    assert_eq!(nav, None);
    assert_eq!(page.phase(), Phase::Invalid);
    assert_eq!(page.form.error("healthCareNumber"), Some("Must be 14 digits and only numbers."));
    assert!(api.calls().is_empty(), "no network call may be issued");
    // Other field values stay untouched.
    assert_eq!(page.form.value("email"), "ada@b.co");
    assert_eq!(page.form.value("password"), "Aa1!aaaa");
}

#[tokio::test]
async fn forgot_password_success_navigates_to_reset_page() {
    let api = MockApi::new()
        .with_forgot(Ok(MessageResponse { message: Some("OTP sent to your email.".into()) }));
    let mut page = ForgotPasswordPage::new();
    page.form.on_field_change("healthCareNumber", "12345678901234");
    page.form.on_field_change("email", "ada@b.co");

    let nav = page.submit(&api).await;

    assert_eq!(nav, Some(Route::ResetPassword));
    assert_eq!(page.phase(), Phase::Success);
    assert_eq!(page.success_message(), Some("OTP sent to your email."));
    // The form resets after a successful request.
    assert_eq!(page.form.value("healthCareNumber"), "");
    assert_eq!(page.form.value("email"), "");
}

#[tokio::test]
async fn forgot_password_failure_shows_server_message() {
    let api = MockApi::new()
        .with_forgot(Err(ApiError::status(404, Some("HealthCare Number doesn't exist".into()))));
    let mut page = ForgotPasswordPage::new();
    page.form.on_field_change("healthCareNumber", "12345678901234");
    page.form.on_field_change("email", "ada@b.co");

    let nav = page.submit(&api).await;

    assert_eq!(nav, None);
    assert_eq!(page.phase(), Phase::Failed);
    assert_eq!(page.banner(), Some("HealthCare Number doesn't exist"));
}

#[tokio::test]
async fn reset_password_mismatch_blocks_submission() {
    let api = MockApi::new();
    let mut page = ResetPasswordPage::new();
    page.form.on_field_change("healthCareNumber", "12345678901234");
    page.form.on_field_change("otp", "123456");
    page.form.on_field_change("newPassword", "abcd1234");
    page.form.on_field_change("confirmPassword", "abcd9999");

    let nav = page.submit(&api).await;

    assert_eq!(nav, None);
    assert_eq!(page.phase(), Phase::Invalid);
    assert_eq!(page.form.error("confirmPassword"), Some("Passwords do not match."));
    assert!(api.calls().is_empty(), "no network call may be issued");
}

#[tokio::test]
async fn reset_password_maps_server_rejections_and_clears_on_success() {
    let mut page = ResetPasswordPage::new();
    page.form.on_field_change("healthCareNumber", "12345678901234");
    page.form.on_field_change("otp", "123456");
    page.form.on_field_change("newPassword", "abcd1234");
    page.form.on_field_change("confirmPassword", "abcd1234");

    let api = MockApi::new()
        .with_reset(Err(ApiError::status(400, Some("Invalid OTP provided".into()))));
    page.submit(&api).await;
    assert_eq!(page.phase(), Phase::Failed);
    assert_eq!(page.form.error("otp"), Some("The provided OTP is incorrect."));

    // Editing the OTP clears the server error; a retry can then succeed.
    page.form.on_field_change("otp", "654321");
    let api = MockApi::new()
        .with_reset(Ok(MessageResponse { message: Some("Password reset successfully.".into()) }));
    page.submit(&api).await;
    assert_eq!(page.phase(), Phase::Success);
    assert_eq!(page.success_message(), Some("Password reset successfully."));
    assert_eq!(page.form.value("healthCareNumber"), "");
    assert_eq!(page.form.value("otp"), "");
}

#[tokio::test]
async fn reset_password_maps_unknown_healthcare_number() {
    let api = MockApi::new().with_reset(Err(ApiError::status(
        404,
        Some("Healthcare number doesn't exist in our records".into()),
    )));
    let mut page = ResetPasswordPage::new();
    page.form.on_field_change("healthCareNumber", "12345678901234");
    page.form.on_field_change("otp", "123456");
    page.form.on_field_change("newPassword", "abcd1234");
    page.form.on_field_change("confirmPassword", "abcd1234");

    page.submit(&api).await;

    assert_eq!(
        page.form.error("healthCareNumber"),
        Some("The provided Healthcare Number doesn't exist.")
    );
    assert_eq!(page.banner(), None);
}

fn fill_register(page: &mut RegisterPage) {
    let set = |p: &mut RegisterPage, f: &str, v: &str| p.form.on_field_change(f, v);
    set(page, "patientFirstName", "Ada");
    set(page, "patientLastName", "Lovelace");
    set(page, "sex", "Female");
    set(page, "birthMonth", "12");
    set(page, "birthDay", "10");
    set(page, "birthYear", "1990");
    set(page, "phoneNumber", "(321) 654-0987");
    set(page, "email", "ada@b.co");
    set(page, "password", "Aa1!aaaa");
    set(page, "streetAddress", "1 Analytical Way");
    set(page, "city", "London");
    set(page, "stateOrProvince", "ON");
    set(page, "postalOrZipCode", "123456");
    set(page, "maritalStatus", "Single");
    set(page, "emergencyContactFirstName", "Charles");
    set(page, "emergencyContactLastName", "Babbage");
    set(page, "emergencyContactRelationship", "Friend");
    set(page, "emergencyContactPhoneNumber", "(321) 654-0987");
    set(page, "familyDoctorFirstName", "Gregory");
    set(page, "familyDoctorLastName", "House");
    set(page, "familyDoctorPhoneNumber", "(321) 654-0987");
    set(page, "preferredPharmacy", "Corner Pharmacy");
    set(page, "pharmacyPhoneNumber", "(321) 654-0987");
    set(page, "reasonForRegistration", "Checkup");
    set(page, "insuranceCompany", "Acme Insurance");
    set(page, "insuranceID", "H123456789");
    set(page, "policyHolderFirstName", "Ada");
    set(page, "policyHolderLastName", "Lovelace");
    set(page, "policyHolderDateOfBirth", "1990-12-10");
}

#[tokio::test]
async fn register_success_navigates_to_login() {
    let api = MockApi::new().with_register(Ok(()));
    let mut page = RegisterPage::new();
    fill_register(&mut page);

    let nav = page.submit(&api).await;

    assert_eq!(nav, Some(Route::Login));
    assert_eq!(page.phase(), Phase::Success);
    assert_eq!(page.banner(), Some("Registration successfully done!"));
    assert_eq!(api.calls(), vec!["register ada@b.co"]);
}

#[tokio::test]
async fn register_with_bad_insurance_id_never_reaches_the_network() {
    let api = MockApi::new();
    let mut page = RegisterPage::new();
    fill_register(&mut page);
    page.form.on_field_change("insuranceID", "X123456789");

    let nav = page.submit(&api).await;

    assert_eq!(nav, None);
    assert_eq!(page.phase(), Phase::Invalid);
    assert_eq!(page.form.error("insuranceID"), Some("Insurance ID must be in format H123456789"));
    assert!(api.calls().is_empty());
    // Untouched siblings keep their values.
    assert_eq!(page.form.value("patientFirstName"), "Ada");
}

#[tokio::test]
async fn register_failure_shows_generic_banner() {
    let api = MockApi::new().with_register(Err(ApiError::status(500, None)));
    let mut page = RegisterPage::new();
    fill_register(&mut page);

    let nav = page.submit(&api).await;

    assert_eq!(nav, None);
    assert_eq!(page.phase(), Phase::Failed);
    assert_eq!(page.banner(), Some("Form submission failed"));
}
