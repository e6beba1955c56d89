//! Patient registration page: the full record, with format checks on phone
//! numbers, postal code, insurance ID, email and birth date parts.

use chrono::Utc;
use once_cell::sync::Lazy;
use tracing::info;

use crate::api::{PortalApi, RegistrationForm};
use crate::error::ApiError;
use crate::form::FormState;
use crate::routes::Route;
use crate::validate::{spaced_label, Check, FieldRule, EMAIL_RE, INSURANCE_ID_RE, PHONE_RE, POSTAL_CODE_RE};

use super::Phase;

pub const SUCCESS_MESSAGE: &str = "Registration successfully done!";
pub const GENERIC_FAILURE_MESSAGE: &str = "Form submission failed";

const PHONE_FORMAT: &str = "Phone number must be in format (321) 654-0987";
const EMERGENCY_PHONE_FORMAT: &str = "Emergency Contact Phone number must be in format (321) 654-0987";
const DOCTOR_PHONE_FORMAT: &str = "Family Doctor Phone number must be in format (321) 654-0987";
const PHARMACY_PHONE_FORMAT: &str = "Pharmacy Phone number must be in format (321) 654-0987";

// Required messages are derived from the field name ("patientFirstName" ->
// "Patient First Name is required."). The rule table is built once; the
// derived messages are interned so rules keep borrowing &'static str.
static RULES: Lazy<Vec<FieldRule>> = Lazy::new(rules);

fn required(field: &'static str, label: &'static str) -> FieldRule {
    let message: &'static str =
        Box::leak(format!("{} is required.", spaced_label(field)).into_boxed_str());
    FieldRule::new(field, label).required(message)
}

fn rules() -> Vec<FieldRule> {
    vec![
        // Stamped from the clock on page construction, not user-validated.
        FieldRule::new("registrationDate", "Registration Date"),
        FieldRule::new("registrationTime", "Registration Time"),
        required("patientFirstName", "Patient First Name"),
        required("patientLastName", "Patient Last Name"),
        required("sex", "Sex"),
        // Format checks run even on empty input, so a blank field reports the
        // format message rather than a required one (portal behavior).
        FieldRule::new("birthMonth", "Birth Month")
            .check(Check::IntRange { min: 1, max: 12, message: "Birth month must be between 1 and 12." }),
        FieldRule::new("birthDay", "Birth Day")
            .check(Check::IntRange { min: 1, max: 31, message: "Birth day must be between 1 and 31." }),
        FieldRule::new("birthYear", "Birth Year")
            .check(Check::IntRange { min: 1970, max: 2024, message: "Birth year must be between 1970 and 2024." }),
        FieldRule::new("phoneNumber", "Phone Number")
            .check(Check::Pattern { re: &PHONE_RE, message: PHONE_FORMAT }),
        FieldRule::new("email", "Email")
            .check(Check::Pattern { re: &EMAIL_RE, message: "Please enter a valid email address." }),
        required("password", "Password")
            .check(Check::Password {
                message: "Must contain at least one uppercase, lowercase, number, and special character.",
            })
            .secret(),
        required("streetAddress", "Street Address"),
        FieldRule::new("streetAddressLine2", "Street Address Line 2"),
        required("city", "City"),
        required("stateOrProvince", "State/Province"),
        FieldRule::new("postalOrZipCode", "Postal/Zip Code")
            .check(Check::Pattern { re: &POSTAL_CODE_RE, message: "Postal code must consist of 6 digits" }),
        required("maritalStatus", "Marital Status"),
        required("emergencyContactFirstName", "Emergency Contact First Name"),
        required("emergencyContactLastName", "Emergency Contact Last Name"),
        required("emergencyContactRelationship", "Emergency Contact Relationship"),
        FieldRule::new("emergencyContactPhoneNumber", "Emergency Contact Phone Number")
            .check(Check::Pattern { re: &PHONE_RE, message: EMERGENCY_PHONE_FORMAT }),
        required("familyDoctorFirstName", "Family Doctor First Name"),
        required("familyDoctorLastName", "Family Doctor Last Name"),
        FieldRule::new("familyDoctorPhoneNumber", "Family Doctor Phone Number")
            .check(Check::Pattern { re: &PHONE_RE, message: DOCTOR_PHONE_FORMAT }),
        required("preferredPharmacy", "Preferred Pharmacy"),
        FieldRule::new("pharmacyPhoneNumber", "Pharmacy Phone Number")
            .check(Check::Pattern { re: &PHONE_RE, message: PHARMACY_PHONE_FORMAT }),
        required("reasonForRegistration", "Reason for Registration"),
        FieldRule::new("additionalNotes", "Additional Notes"),
        required("insuranceCompany", "Insurance Company"),
        FieldRule::new("insuranceID", "Insurance ID")
            .check(Check::Pattern { re: &INSURANCE_ID_RE, message: "Insurance ID must be in format H123456789" }),
        required("policyHolderFirstName", "Policy Holder First Name"),
        required("policyHolderLastName", "Policy Holder Last Name"),
        required("policyHolderDateOfBirth", "Policy Holder Date of Birth"),
    ]
}

pub struct RegisterPage {
    pub form: FormState,
    phase: Phase,
    banner: Option<String>,
}

impl Default for RegisterPage {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterPage {
    /// Fresh form with registration date/time stamped from the current UTC time.
    pub fn new() -> Self {
        let mut form = FormState::new(RULES.clone());
        let now = Utc::now();
        form.on_field_change("registrationDate", &now.format("%Y-%m-%d").to_string());
        form.on_field_change("registrationTime", &now.format("%H:%M").to_string());
        Self { form, phase: Phase::Idle, banner: None }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

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
        self.banner = None;

        let record = self.to_record();
        match api.register(&record).await {
            Ok(()) => {
                info!(target: "portal", "registration submitted for {}", record.email);
                self.phase = Phase::Success;
                self.banner = Some(SUCCESS_MESSAGE.to_string());
                Some(Route::Login)
            }
            Err(err) => {
                self.phase = Phase::Failed;
                self.banner = Some(match err {
                    ApiError::Status { message: Some(m), .. } => m,
                    _ => GENERIC_FAILURE_MESSAGE.to_string(),
                });
                None
            }
        }
    }

    fn to_record(&self) -> RegistrationForm {
        let v = |f: &str| self.form.value(f).to_string();
        RegistrationForm {
            registration_date: v("registrationDate"),
            registration_time: v("registrationTime"),
            patient_first_name: v("patientFirstName"),
            patient_last_name: v("patientLastName"),
            sex: v("sex"),
            birth_month: v("birthMonth"),
            birth_day: v("birthDay"),
            birth_year: v("birthYear"),
            phone_number: v("phoneNumber"),
            email: v("email"),
            password: v("password"),
            street_address: v("streetAddress"),
            street_address_line2: v("streetAddressLine2"),
            city: v("city"),
            state_or_province: v("stateOrProvince"),
            postal_or_zip_code: v("postalOrZipCode"),
            marital_status: v("maritalStatus"),
            emergency_contact_first_name: v("emergencyContactFirstName"),
            emergency_contact_last_name: v("emergencyContactLastName"),
            emergency_contact_relationship: v("emergencyContactRelationship"),
            emergency_contact_phone_number: v("emergencyContactPhoneNumber"),
            family_doctor_first_name: v("familyDoctorFirstName"),
            family_doctor_last_name: v("familyDoctorLastName"),
            family_doctor_phone_number: v("familyDoctorPhoneNumber"),
            preferred_pharmacy: v("preferredPharmacy"),
            pharmacy_phone_number: v("pharmacyPhoneNumber"),
            reason_for_registration: v("reasonForRegistration"),
            additional_notes: v("additionalNotes"),
            insurance_company: v("insuranceCompany"),
            insurance_id: v("insuranceID"),
            policy_holder_first_name: v("policyHolderFirstName"),
            policy_holder_last_name: v("policyHolderLastName"),
            policy_holder_date_of_birth: v("policyHolderDateOfBirth"),
        }
    }
}
