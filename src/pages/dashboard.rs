//! Dashboard page: reads the session without mutating it; logout clears the
//! session and navigates back to login.

use crate::api::Profile;
use crate::routes::Route;
use crate::session::SessionStore;

pub struct DashboardPage {
    session: SessionStore,
}

impl DashboardPage {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    pub fn profile(&self) -> Option<Profile> {
        self.session.get()
    }

    /// The profile lines the dashboard renders, in display order.
    pub fn profile_lines(&self) -> Option<Vec<(&'static str, String)>> {
        let p = self.profile()?;
        Some(vec![
            ("Name", format!("{} {}", p.patient_first_name, p.patient_last_name)),
            ("Health Care Number", p.health_care_number),
            ("Email", p.email),
            ("Sex", p.sex),
            ("Family Doctor Name", p.family_doctor_first_name),
        ])
    }

    pub fn logout(&self) -> Route {
        self.session.clear();
        Route::Login
    }
}
