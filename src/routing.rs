//! Role-based landing areas.

#[cfg(test)]
#[path = "routing_test.rs"]
mod routing_test;

use crate::net::types::Role;

pub const PATIENT_LANDING_PATH: &str = "/dashboard";
pub const CLINICIAN_LANDING_PATH: &str = "/clinician";
pub const ADMIN_LANDING_PATH: &str = "/admin";
pub const LOGIN_PATH: &str = "/login";

/// Application area a role lands on after authentication.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LandingArea {
    Patient,
    Clinician,
    Admin,
}

impl LandingArea {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Patient => PATIENT_LANDING_PATH,
            Self::Clinician => CLINICIAN_LANDING_PATH,
            Self::Admin => ADMIN_LANDING_PATH,
        }
    }
}

/// Total mapping; unrecognized roles get the patient area.
#[must_use]
pub fn landing_area(role: &Role) -> LandingArea {
    match role {
        Role::Clinician => LandingArea::Clinician,
        Role::Admin => LandingArea::Admin,
        Role::Patient | Role::Other(_) => LandingArea::Patient,
    }
}

#[must_use]
pub fn landing_path(role: &Role) -> &'static str {
    landing_area(role).path()
}
