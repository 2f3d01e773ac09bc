//! Doctor records and the shapes used to create and update them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Employment status of a doctor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DoctorStatus {
    /// Currently practicing.
    #[default]
    Active,
    /// Temporarily away.
    OnLeave,
    /// No longer practicing.
    Retired,
}

impl DoctorStatus {
    /// Every status, in display order.
    pub const ALL: [DoctorStatus; 3] = [Self::Active, Self::OnLeave, Self::Retired];

    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnLeave => "on-leave",
            Self::Retired => "retired",
        }
    }
}

impl fmt::Display for DoctorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DoctorStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStatus(s.to_string()))
    }
}

/// Geographic position of a practice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Weekly opening hours, as free text per block of days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHours {
    /// Hours from Monday to Friday.
    pub monday_to_friday: String,
    /// Saturday hours.
    pub saturday: String,
    /// Sunday hours.
    pub sunday: String,
}

/// A doctor on the roster.
///
/// `id` is assigned by the persistence collaborator and `created_at` is
/// stamped once at creation; neither changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// Opaque unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Medical specialty.
    pub specialty: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Practice address or hospital.
    #[serde(default, alias = "hospital")]
    pub address: String,
    /// Free-text biography.
    #[serde(default)]
    pub bio: String,
    /// Employment status.
    #[serde(default)]
    pub status: DoctorStatus,
    /// Rating in `[0, 5]`.
    #[serde(default, alias = "ratings")]
    pub rating: f64,
    /// Profile image.
    #[serde(default, alias = "avatar", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Practice location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Opening hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<WorkingHours>,
    /// Bookable times of day, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_slots: Option<Vec<String>>,
}

impl Doctor {
    /// Builds a record from submitted form data and the values the store assigns.
    pub fn from_form(id: impl Into<String>, created_at: DateTime<Utc>, form: DoctorFormData) -> Self {
        Self {
            id: id.into(),
            name: form.name,
            specialty: form.specialty,
            email: form.email,
            phone: form.phone,
            address: form.address,
            bio: form.bio,
            status: form.status,
            rating: form.rating,
            image_url: form.image_url,
            created_at,
            location: form.location,
            working_hours: form.working_hours,
            available_slots: form.available_slots,
        }
    }

    /// Returns the editable part of the record, as the edit form shows it.
    pub fn form_data(&self) -> DoctorFormData {
        DoctorFormData {
            name: self.name.clone(),
            specialty: self.specialty.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            bio: self.bio.clone(),
            status: self.status,
            rating: self.rating,
            image_url: self.image_url.clone(),
            location: self.location,
            working_hours: self.working_hours.clone(),
            available_slots: self.available_slots.clone(),
        }
    }

    /// Shallow-merges a patch into this record. `id` and `created_at` are untouched.
    pub fn apply(&mut self, patch: &DoctorPatch) {
        patch.apply_to(self);
    }
}

/// Every field of a [`Doctor`] except `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorFormData {
    /// Display name.
    pub name: String,
    /// Medical specialty.
    pub specialty: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Practice address or hospital.
    #[serde(default, alias = "hospital")]
    pub address: String,
    /// Free-text biography.
    #[serde(default)]
    pub bio: String,
    /// Employment status.
    #[serde(default)]
    pub status: DoctorStatus,
    /// Rating in `[0, 5]`.
    #[serde(default, alias = "ratings")]
    pub rating: f64,
    /// Profile image.
    #[serde(default, alias = "avatar", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Practice location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Opening hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<WorkingHours>,
    /// Bookable times of day, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_slots: Option<Vec<String>>,
}

/// A partial write: only the fields that are `Some` are sent and merged.
///
/// Serializes to exactly the provided fields, which is the shape the remote
/// collaborator receives for an update. Optional attributes are doubly
/// wrapped so a clear (`Some(None)`, sent as `null`) differs from "not
/// provided" (`None`, omitted).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorPatch {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New specialty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    /// New contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New address or hospital.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// New biography.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DoctorStatus>,
    /// New rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// New profile image; `Some(None)` clears it.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    /// New practice location; `Some(None)` clears it.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<Location>>,
    /// New opening hours; `Some(None)` clears them.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<Option<WorkingHours>>,
    /// New bookable slots; `Some(None)` clears them.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub available_slots: Option<Option<Vec<String>>>,
}

impl DoctorPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the specialty.
    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = Some(specialty.into());
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: DoctorStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the rating.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Sets the profile image.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(Some(url.into()));
        self
    }

    /// Removes the profile image.
    pub fn clear_image_url(mut self) -> Self {
        self.image_url = Some(None);
        self
    }

    /// Sets or removes the practice location.
    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = Some(location);
        self
    }

    /// Returns true if the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrites every provided field on `doctor`.
    pub fn apply_to(&self, doctor: &mut Doctor) {
        if let Some(name) = &self.name {
            doctor.name.clone_from(name);
        }
        if let Some(specialty) = &self.specialty {
            doctor.specialty.clone_from(specialty);
        }
        if let Some(email) = &self.email {
            doctor.email.clone_from(email);
        }
        if let Some(phone) = &self.phone {
            doctor.phone.clone_from(phone);
        }
        if let Some(address) = &self.address {
            doctor.address.clone_from(address);
        }
        if let Some(bio) = &self.bio {
            doctor.bio.clone_from(bio);
        }
        if let Some(status) = self.status {
            doctor.status = status;
        }
        if let Some(rating) = self.rating {
            doctor.rating = rating;
        }
        if let Some(url) = &self.image_url {
            doctor.image_url.clone_from(url);
        }
        if let Some(location) = self.location {
            doctor.location = location;
        }
        if let Some(hours) = &self.working_hours {
            doctor.working_hours.clone_from(hours);
        }
        if let Some(slots) = &self.available_slots {
            doctor.available_slots.clone_from(slots);
        }
    }
}

impl From<DoctorFormData> for DoctorPatch {
    fn from(form: DoctorFormData) -> Self {
        Self {
            name: Some(form.name),
            specialty: Some(form.specialty),
            email: Some(form.email),
            phone: Some(form.phone),
            address: Some(form.address),
            bio: Some(form.bio),
            status: Some(form.status),
            rating: Some(form.rating),
            image_url: Some(form.image_url),
            location: Some(form.location),
            working_hours: Some(form.working_hours),
            available_slots: Some(form.available_slots),
        }
    }
}

/// Maps a present field, including an explicit `null`, to `Some`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
