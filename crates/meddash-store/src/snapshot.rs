//! Read-only views published by the store.

use meddash_model::{Doctor, DoctorFilter, DoctorStatus};
use serde::Serialize;

/// The state observers render from.
///
/// Published after every mutation, filter change and loading transition.
///
/// # Example
///
/// ```ignore
/// let mut updates = store.subscribe();
/// while updates.changed().await.is_ok() {
///     let snapshot = updates.borrow_and_update().clone();
///     println!("{} of {} doctors shown", snapshot.visible_count(), snapshot.count());
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSnapshot {
    /// The full collection.
    pub doctors: Vec<Doctor>,
    /// The subset selected by `criteria`.
    pub visible: Vec<Doctor>,
    /// The last-applied criteria.
    pub criteria: DoctorFilter,
    /// True while a load is in flight.
    pub loading: bool,
    /// Bumped on every collection change.
    pub revision: u64,
}

impl RosterSnapshot {
    /// Returns the size of the full collection.
    pub fn count(&self) -> usize {
        self.doctors.len()
    }

    /// Returns the size of the visible subset.
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Looks up a record in the full collection.
    pub fn get(&self, id: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == id)
    }

    /// Returns the dashboard counters for the full collection.
    pub fn summary(&self) -> RosterSummary {
        RosterSummary::of(&self.doctors)
    }
}

/// Dashboard counters: head count per status and the average rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSummary {
    /// Number of doctors.
    pub total: usize,
    /// Number of active doctors.
    pub active: usize,
    /// Number of doctors on leave.
    pub on_leave: usize,
    /// Number of retired doctors.
    pub retired: usize,
    /// Mean rating rounded to one decimal, 0 for an empty roster.
    pub average_rating: f64,
}

impl RosterSummary {
    /// Computes the counters for `doctors`.
    pub fn of(doctors: &[Doctor]) -> Self {
        let count = |status: DoctorStatus| doctors.iter().filter(|d| d.status == status).count();
        let average_rating = if doctors.is_empty() {
            0.0
        } else {
            let mean = doctors.iter().map(|d| d.rating).sum::<f64>() / doctors.len() as f64;
            (mean * 10.0).round() / 10.0
        };
        Self {
            total: doctors.len(),
            active: count(DoctorStatus::Active),
            on_leave: count(DoctorStatus::OnLeave),
            retired: count(DoctorStatus::Retired),
            average_rating,
        }
    }
}

impl std::fmt::Display for RosterSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Roster Summary:")?;
        writeln!(f, "  Doctors:         {}", self.total)?;
        writeln!(f, "  Active:          {}", self.active)?;
        writeln!(f, "  On leave:        {}", self.on_leave)?;
        writeln!(f, "  Retired:         {}", self.retired)?;
        writeln!(f, "  Average rating:  {:.1}", self.average_rating)?;
        Ok(())
    }
}
