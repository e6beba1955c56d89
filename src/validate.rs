//! Field validation rules: pure predicates over raw string input paired with
//! the exact error messages the portal shows. Deterministic and side-effect
//! free; running a rule twice on the same input always yields the same verdict.

use once_cell::sync::Lazy;
use regex::Regex;

pub static HEALTH_CARE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{14}$").unwrap());
pub static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
pub static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\([0-9]{3}\) [0-9]{3}-[0-9]{4}$").unwrap());
pub static POSTAL_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{6}$").unwrap());
pub static INSURANCE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^H[0-9]{9}$").unwrap());
pub static OTP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

/// Symbols the password rule accepts; at least one must be present.
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Password strength: >=1 lowercase, >=1 uppercase, >=1 digit, >=1 symbol
/// from [`PASSWORD_SYMBOLS`], length >=8, and no character outside
/// `[A-Za-z0-9@$!%*?&]`. (The upstream service expresses this as a
/// look-ahead regex; `regex` has no look-ahead, so the predicate is
/// decomposed with identical accept/reject behavior.)
pub fn password_strength_ok(value: &str) -> bool {
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut symbol = false;
    let mut len = 0usize;
    for ch in value.chars() {
        len += 1;
        if ch.is_ascii_lowercase() {
            lower = true;
        } else if ch.is_ascii_uppercase() {
            upper = true;
        } else if ch.is_ascii_digit() {
            digit = true;
        } else if PASSWORD_SYMBOLS.contains(ch) {
            symbol = true;
        } else {
            return false;
        }
    }
    lower && upper && digit && symbol && len >= 8
}

/// The check half of a rule; the required half lives on [`FieldRule`].
#[derive(Debug, Clone, Copy)]
pub enum Check {
    None,
    Pattern { re: &'static Lazy<Regex>, message: &'static str },
    Password { message: &'static str },
    /// Inclusive integer range. Unparseable input fails with the same message.
    IntRange { min: i64, max: i64, message: &'static str },
    MinLen { min: usize, message: &'static str },
    ExactLen { len: usize, message: &'static str },
    /// Value must equal another field's current value.
    MatchesField { other: &'static str, message: &'static str },
}

/// One field's declarative validation rule. Field names double as the JSON
/// keys sent to the remote service.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    /// Human label used by the terminal front end when prompting.
    pub label: &'static str,
    /// Message reported when the value is empty. `None` means an empty value
    /// falls through to the check (which may itself reject it).
    pub required: Option<&'static str>,
    pub check: Check,
    /// Hidden input (passwords) for front-end rendering.
    pub secret: bool,
}

impl FieldRule {
    pub const fn new(field: &'static str, label: &'static str) -> Self {
        Self { field, label, required: None, check: Check::None, secret: false }
    }

    pub const fn required(mut self, message: &'static str) -> Self {
        self.required = Some(message);
        self
    }

    pub const fn check(mut self, check: Check) -> Self {
        self.check = check;
        self
    }

    pub const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Run the rule. `peer` is the current value of the field named by a
    /// `MatchesField` check, empty when absent. Returns `None` when valid.
    pub fn verdict(&self, value: &str, peer: &str) -> Option<String> {
        if value.is_empty() {
            if let Some(msg) = self.required {
                return Some(msg.to_string());
            }
        }
        match self.check {
            Check::None => None,
            Check::Pattern { re, message } => (!re.is_match(value)).then(|| message.to_string()),
            Check::Password { message } => (!password_strength_ok(value)).then(|| message.to_string()),
            Check::IntRange { min, max, message } => match value.parse::<i64>() {
                Ok(n) if n >= min && n <= max => None,
                _ => Some(message.to_string()),
            },
            Check::MinLen { min, message } => (value.chars().count() < min).then(|| message.to_string()),
            Check::ExactLen { len, message } => {
                (value.chars().count() != len).then(|| message.to_string())
            }
            Check::MatchesField { message, .. } => (value != peer).then(|| message.to_string()),
        }
    }
}

/// "patientFirstName" -> "Patient First Name", matching the portal's
/// camel-case-to-words required messages (including its "Insurance I D" quirk).
pub fn spaced_label(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for (i, ch) in field.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else {
            if ch.is_ascii_uppercase() {
                out.push(' ');
            }
            out.push(ch);
        }
    }
    out
}
