use std::fmt;

use tracing::info;

use crate::error::PlannerError;
use crate::planner::Planner;

/// RSVP state shown for a guest. Only `Confirmed` exists: responses are not
/// tracked, so every listed guest is reported as attending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpStatus {
    Confirmed,
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsvpStatus::Confirmed => f.write_str("Confirmed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rsvp {
    pub guest: String,
    pub status: RsvpStatus,
}

impl fmt::Display for Rsvp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.guest, self.status)
    }
}

impl Planner {
    /// Append `name` unless an identical (case-sensitive) name is already listed.
    ///
    /// Surrounding whitespace is trimmed before the comparison, so `" Ann"`
    /// duplicates `"Ann"`.
    pub fn add_guest(&mut self, name: &str) -> Result<(), PlannerError> {
        let name = required(name)?;
        if self.plan.guests.iter().any(|g| g == name) {
            return Err(PlannerError::GuestAlreadyPresent {
                name: name.to_owned(),
            });
        }
        self.plan.guests.push(name.to_owned());
        info!(guest = name, "guest added");
        self.commit()
    }

    pub fn remove_guest(&mut self, name: &str) -> Result<(), PlannerError> {
        let name = required(name)?;
        let Some(pos) = self.plan.guests.iter().position(|g| g == name) else {
            return Err(PlannerError::GuestNotFound {
                name: name.to_owned(),
            });
        };
        self.plan.guests.remove(pos);
        info!(guest = name, "guest removed");
        self.commit()
    }

    pub fn guests(&self) -> &[String] {
        &self.plan.guests
    }

    /// Guests joined with `", "` for display, or `None` when nobody is invited.
    pub fn guest_list(&self) -> Option<String> {
        if self.plan.guests.is_empty() {
            None
        } else {
            Some(self.plan.guests.join(", "))
        }
    }

    pub fn rsvps(&self) -> Vec<Rsvp> {
        self.plan
            .guests
            .iter()
            .map(|guest| Rsvp {
                guest: guest.clone(),
                status: RsvpStatus::Confirmed,
            })
            .collect()
    }
}

fn required(name: &str) -> Result<&str, PlannerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PlannerError::EmptyField {
            field: "Guest name",
        });
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::tests::{reload, temp_planner};

    #[test]
    fn add_guest_appends_in_order_and_persists() {
        let (dir, mut planner) = temp_planner();
        planner.add_guest("Ann").unwrap();
        planner.add_guest("Bo").unwrap();

        assert_eq!(planner.guests(), &["Ann".to_owned(), "Bo".to_owned()]);
        assert_eq!(reload(&dir).guests, vec!["Ann", "Bo"]);
    }

    #[test]
    fn duplicate_guest_is_signalled_and_not_added() {
        let (_dir, mut planner) = temp_planner();
        planner.add_guest("Ann").unwrap();

        let err = planner.add_guest("Ann").unwrap_err();

        assert!(matches!(err, PlannerError::GuestAlreadyPresent { .. }));
        assert_eq!(planner.guests().iter().filter(|g| *g == "Ann").count(), 1);
    }

    #[test]
    fn names_are_trimmed_before_duplicate_check() {
        let (_dir, mut planner) = temp_planner();
        planner.add_guest("Ann").unwrap();

        let err = planner.add_guest(" Ann ").unwrap_err();

        assert!(matches!(err, PlannerError::GuestAlreadyPresent { .. }));
        assert_eq!(planner.guests(), ["Ann"]);
    }

    #[test]
    fn guest_names_are_case_sensitive() {
        let (_dir, mut planner) = temp_planner();
        planner.add_guest("ann").unwrap();
        planner.add_guest("Ann").unwrap();
        assert_eq!(planner.guests().len(), 2);
    }

    #[test]
    fn blank_guest_name_is_rejected() {
        let (_dir, mut planner) = temp_planner();
        let err = planner.add_guest("   ").unwrap_err();
        assert!(err.is_validation());
        assert!(planner.guests().is_empty());
    }

    #[test]
    fn remove_guest_persists() {
        let (dir, mut planner) = temp_planner();
        planner.add_guest("Ann").unwrap();
        planner.add_guest("Bo").unwrap();

        planner.remove_guest("Ann").unwrap();

        assert_eq!(planner.guests(), &["Bo".to_owned()]);
        assert_eq!(reload(&dir).guests, vec!["Bo"]);
    }

    #[test]
    fn removing_unknown_guest_is_not_found_and_leaves_list() {
        let (_dir, mut planner) = temp_planner();
        planner.add_guest("Ann").unwrap();

        let err = planner.remove_guest("Zed").unwrap_err();

        assert!(matches!(err, PlannerError::GuestNotFound { .. }));
        assert_eq!(planner.guests(), &["Ann".to_owned()]);
    }

    #[test]
    fn guest_list_joins_names_or_reports_empty() {
        let (_dir, mut planner) = temp_planner();
        assert_eq!(planner.guest_list(), None);

        planner.add_guest("Ann").unwrap();
        planner.add_guest("Bo").unwrap();
        assert_eq!(planner.guest_list().as_deref(), Some("Ann, Bo"));
    }

    #[test]
    fn every_guest_is_confirmed() {
        let (_dir, mut planner) = temp_planner();
        assert!(planner.rsvps().is_empty());

        planner.add_guest("Ann").unwrap();
        planner.add_guest("Bo").unwrap();
        let rsvps = planner.rsvps();

        assert!(rsvps.iter().all(|r| r.status == RsvpStatus::Confirmed));
        assert_eq!(rsvps[1].to_string(), "Bo (Confirmed)");
    }
}
