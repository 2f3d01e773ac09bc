//! Specialty and hospital catalogs, and the demo roster.

use chrono::{DateTime, NaiveDate, Utc};

use crate::doctor::{Doctor, DoctorStatus};

/// Specialties offered by the doctor form.
pub const SPECIALTIES: [&str; 12] = [
    "Cardiology",
    "Neurology",
    "Orthopedics",
    "Pediatrics",
    "Dermatology",
    "Ophthalmology",
    "Psychiatry",
    "Oncology",
    "Endocrinology",
    "Gastroenterology",
    "Urology",
    "Pulmonology",
];

/// Hospitals offered by the doctor form.
pub const HOSPITALS: [&str; 8] = [
    "City General Hospital",
    "Metropolitan Medical Center",
    "University Hospital",
    "Children's Medical Center",
    "Skin & Health Clinic",
    "Vision Care Center",
    "Behavioral Health Institute",
    "Cancer Treatment Center",
];

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    name: &str,
    specialty: &str,
    email: &str,
    phone: &str,
    portrait: &str,
    rating: f64,
    address: &str,
    status: DoctorStatus,
    created_at: DateTime<Utc>,
) -> Doctor {
    Doctor {
        id: id.to_string(),
        name: name.to_string(),
        specialty: specialty.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        address: address.to_string(),
        bio: String::new(),
        status,
        rating,
        image_url: Some(format!("https://randomuser.me/api/portraits/{portrait}.jpg")),
        created_at,
        location: None,
        working_hours: None,
        available_slots: None,
    }
}

/// The eight-doctor demo roster, ids `"1"` through `"8"`.
///
/// Six are active, Dr. Emily Parker is on leave and Dr. Amanda Martinez is
/// retired.
pub fn seed_roster() -> Vec<Doctor> {
    use DoctorStatus::{Active, OnLeave, Retired};

    vec![
        seed(
            "1",
            "Dr. John Smith",
            "Cardiology",
            "john.smith@example.com",
            "123-456-7890",
            "men/32",
            4.8,
            HOSPITALS[0],
            Active,
            at(2023, 1, 15, 10, 30),
        ),
        seed(
            "2",
            "Dr. Sarah Johnson",
            "Neurology",
            "sarah.johnson@example.com",
            "234-567-8901",
            "women/65",
            4.7,
            HOSPITALS[1],
            Active,
            at(2023, 2, 22, 9, 15),
        ),
        seed(
            "3",
            "Dr. Michael Chen",
            "Orthopedics",
            "michael.chen@example.com",
            "345-678-9012",
            "men/75",
            4.9,
            HOSPITALS[2],
            Active,
            at(2022, 11, 5, 14, 45),
        ),
        seed(
            "4",
            "Dr. Emily Parker",
            "Pediatrics",
            "emily.parker@example.com",
            "456-789-0123",
            "women/42",
            4.6,
            HOSPITALS[3],
            OnLeave,
            at(2023, 3, 18, 11, 20),
        ),
        seed(
            "5",
            "Dr. Robert Williams",
            "Dermatology",
            "robert.williams@example.com",
            "567-890-1234",
            "men/45",
            4.5,
            HOSPITALS[4],
            Active,
            at(2023, 5, 7, 13, 10),
        ),
        seed(
            "6",
            "Dr. Jessica Lee",
            "Ophthalmology",
            "jessica.lee@example.com",
            "678-901-2345",
            "women/32",
            4.7,
            HOSPITALS[5],
            Active,
            at(2022, 12, 12, 15, 35),
        ),
        seed(
            "7",
            "Dr. Daniel Kim",
            "Psychiatry",
            "daniel.kim@example.com",
            "789-012-3456",
            "men/22",
            4.8,
            HOSPITALS[6],
            Active,
            at(2023, 4, 25, 10, 50),
        ),
        seed(
            "8",
            "Dr. Amanda Martinez",
            "Oncology",
            "amanda.martinez@example.com",
            "890-123-4567",
            "women/58",
            4.9,
            HOSPITALS[7],
            Retired,
            at(2022, 10, 30, 12, 40),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_roster_shape() {
        let roster = seed_roster();
        assert_eq!(roster.len(), 8);

        let ids: HashSet<&str> = roster.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), 8);

        let count = |s: DoctorStatus| roster.iter().filter(|d| d.status == s).count();
        assert_eq!(count(DoctorStatus::Active), 6);
        assert_eq!(count(DoctorStatus::OnLeave), 1);
        assert_eq!(count(DoctorStatus::Retired), 1);
    }

    #[test]
    fn test_seed_roster_specialties_are_catalogued() {
        for doctor in seed_roster() {
            assert!(SPECIALTIES.contains(&doctor.specialty.as_str()));
            assert!(HOSPITALS.contains(&doctor.address.as_str()));
        }
    }

    #[test]
    fn test_seed_timestamps() {
        let roster = seed_roster();
        assert_eq!(roster[0].created_at.to_rfc3339(), "2023-01-15T10:30:00+00:00");
    }
}
