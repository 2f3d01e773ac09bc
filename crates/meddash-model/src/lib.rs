//! # meddash-model
//!
//! Domain types for the MedDash doctor roster.
//!
//! This crate provides:
//! - **Records**: [`Doctor`] and its form/patch shapes used by create and update
//! - **Criteria**: [`DoctorFilter`], the search/specialty/status selection
//! - **Validation**: the dashboard's form rules, reported as [`ValidationError`]
//! - **Notices**: the one-shot success/failure channel ([`Notifier`])
//! - **Catalogs**: specialties, hospitals and the demo roster
//!
//! ## Usage
//!
//! ```rust
//! use meddash_model::{DoctorFilter, DoctorFormData, DoctorStatus};
//!
//! let form = DoctorFormData {
//!     name: "Dr. Ada Lovelace".to_string(),
//!     specialty: "Cardiology".to_string(),
//!     email: "ada@example.com".to_string(),
//!     phone: "555-0100".to_string(),
//!     address: "City General Hospital".to_string(),
//!     rating: 4.5,
//!     ..DoctorFormData::default()
//! };
//! assert!(form.validate().is_ok());
//! assert_eq!(form.status, DoctorStatus::Active);
//!
//! let criteria = DoctorFilter::new().with_search("ada").with_status("all");
//! assert_eq!(criteria.status_constraint(), None);
//! ```
//!
//! ## Wire Names
//!
//! | Field | Serialized as | Also accepted |
//! |-------|---------------|---------------|
//! | `image_url` | `imageUrl` | `avatar` |
//! | `address` | `address` | `hospital` |
//! | `rating` | `rating` | `ratings` |
//! | `status` | `active` / `on-leave` / `retired` | |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod catalog;
mod criteria;
mod doctor;
mod error;
mod notice;
mod validation;

pub use catalog::{seed_roster, HOSPITALS, SPECIALTIES};
pub use criteria::{DoctorFilter, ALL};
pub use doctor::{Doctor, DoctorFormData, DoctorPatch, DoctorStatus, Location, WorkingHours};
pub use error::{ValidationError, ValidationResult, Violation};
pub use notice::{Notice, NoticeLevel, Notifier, NullNotifier, RecordingNotifier, TracingNotifier};
pub use validation::{is_valid_email, RATING_MAX, RATING_MIN};

/// Identifier assigned to a doctor by the persistence collaborator.
pub type DoctorId = String;
