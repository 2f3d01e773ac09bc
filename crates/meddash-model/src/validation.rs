//! Form rules for doctor data.
//!
//! Every rule is checked and all violations are reported together, so an
//! edit form can highlight each offending field at once.

use std::sync::OnceLock;

use regex::Regex;

use crate::doctor::{DoctorFormData, DoctorPatch, Location};
use crate::error::{ValidationError, ValidationResult, Violation};

/// Lowest accepted rating.
pub const RATING_MIN: f64 = 0.0;

/// Highest accepted rating.
pub const RATING_MAX: f64 = 5.0;

const NAME_MIN_CHARS: usize = 2;
const PHONE_MIN_CHARS: usize = 5;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// Returns true if `email` looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

fn check_name(name: &str, out: &mut Vec<Violation>) {
    if name.chars().count() < NAME_MIN_CHARS {
        out.push(Violation::new("name", "Name must be at least 2 characters."));
    }
}

fn check_specialty(specialty: &str, out: &mut Vec<Violation>) {
    if specialty.is_empty() {
        out.push(Violation::new("specialty", "Please select a specialty."));
    }
}

fn check_address(address: &str, out: &mut Vec<Violation>) {
    if address.is_empty() {
        out.push(Violation::new("address", "Please enter a hospital."));
    }
}

fn check_email(email: &str, out: &mut Vec<Violation>) {
    if !is_valid_email(email) {
        out.push(Violation::new("email", "Please enter a valid email address."));
    }
}

fn check_phone(phone: &str, out: &mut Vec<Violation>) {
    if phone.chars().count() < PHONE_MIN_CHARS {
        out.push(Violation::new("phone", "Please enter a valid phone number."));
    }
}

fn check_rating(rating: f64, out: &mut Vec<Violation>) {
    // NaN fails the range check too
    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        out.push(Violation::new("rating", "Ratings must be between 0 and 5."));
    }
}

fn check_location(location: &Location, out: &mut Vec<Violation>) {
    if !(-90.0..=90.0).contains(&location.latitude) {
        out.push(Violation::new("location", "Latitude must be between -90 and 90."));
    }
    if !(-180.0..=180.0).contains(&location.longitude) {
        out.push(Violation::new("location", "Longitude must be between -180 and 180."));
    }
}

fn finish(violations: Vec<Violation>) -> ValidationResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Invalid { violations })
    }
}

impl DoctorFormData {
    /// Checks every form rule.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut violations = Vec::new();
        check_name(&self.name, &mut violations);
        check_specialty(&self.specialty, &mut violations);
        check_address(&self.address, &mut violations);
        check_email(&self.email, &mut violations);
        check_phone(&self.phone, &mut violations);
        check_rating(self.rating, &mut violations);
        if let Some(location) = &self.location {
            check_location(location, &mut violations);
        }
        finish(violations)
    }
}

impl DoctorPatch {
    /// Checks the form rules for the fields this patch carries.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut violations = Vec::new();
        if let Some(name) = &self.name {
            check_name(name, &mut violations);
        }
        if let Some(specialty) = &self.specialty {
            check_specialty(specialty, &mut violations);
        }
        if let Some(address) = &self.address {
            check_address(address, &mut violations);
        }
        if let Some(email) = &self.email {
            check_email(email, &mut violations);
        }
        if let Some(phone) = &self.phone {
            check_phone(phone, &mut violations);
        }
        if let Some(rating) = self.rating {
            check_rating(rating, &mut violations);
        }
        if let Some(Some(location)) = &self.location {
            check_location(location, &mut violations);
        }
        finish(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> DoctorFormData {
        DoctorFormData {
            name: "Dr. Jessica Lee".to_string(),
            specialty: "Ophthalmology".to_string(),
            email: "jessica.lee@example.com".to_string(),
            phone: "678-901-2345".to_string(),
            address: "Vision Care Center".to_string(),
            rating: 4.7,
            ..DoctorFormData::default()
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn test_rating_bounds_are_inclusive() {
        for rating in [0.0, 5.0] {
            let form = DoctorFormData {
                rating,
                ..valid_form()
            };
            assert!(form.validate().is_ok(), "rating {rating} should pass");
        }
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        for rating in [-0.1, 5.01, f64::NAN, f64::INFINITY] {
            let form = DoctorFormData {
                rating,
                ..valid_form()
            };
            let err = form.validate().unwrap_err();
            assert!(err.has_field("rating"), "rating {rating} should fail");
        }
    }

    #[test]
    fn test_all_violations_reported() {
        let err = DoctorFormData::default().validate().unwrap_err();
        for field in ["name", "specialty", "address", "email", "phone"] {
            assert!(err.has_field(field), "missing violation for {field}");
        }
        assert!(!err.has_field("rating"));
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("admin@meddash.com"));
        assert!(!is_valid_email("admin@meddash"));
        assert!(!is_valid_email("admin meddash.com"));
        assert!(!is_valid_email("@meddash.com"));
    }

    #[test]
    fn test_location_bounds() {
        let form = DoctorFormData {
            location: Some(Location {
                latitude: 91.0,
                longitude: 0.0,
            }),
            ..valid_form()
        };
        assert!(form.validate().unwrap_err().has_field("location"));
    }

    #[test]
    fn test_patch_checks_only_provided_fields() {
        assert!(DoctorPatch::new().validate().is_ok());
        assert!(DoctorPatch::new().with_rating(2.5).validate().is_ok());

        let err = DoctorPatch::new()
            .with_rating(7.0)
            .with_name("X")
            .validate()
            .unwrap_err();
        assert_eq!(err.violations().len(), 2);
        assert!(err.has_field("name"));
        assert!(err.has_field("rating"));
    }
}
