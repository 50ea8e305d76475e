//! In-memory party plan: catalogs, guests, preferences, timeline, photos
//! and checklist for a single user.
//!
//! The serde layout of [`PartyPlan`] is the on-disk document. Field order
//! here is the key order in the written JSON.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Guest count assumed for catering estimates while the guest list is empty.
pub const DEFAULT_GUEST_COUNT: usize = 10;

/// Anything with a name that can be priced for a party of a given size.
pub trait Priced {
    fn name(&self) -> &str;

    /// Total cost for `guest_count` guests.
    fn estimated_cost(&self, guest_count: usize) -> f64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    pub cost: f64,
}

impl Priced for Venue {
    fn name(&self) -> &str {
        &self.name
    }

    fn estimated_cost(&self, _guest_count: usize) -> f64 {
        self.cost
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caterer {
    pub name: String,
    pub cost_per_person: f64,
}

impl Priced for Caterer {
    fn name(&self) -> &str {
        &self.name
    }

    fn estimated_cost(&self, guest_count: usize) -> f64 {
        self.cost_per_person * guest_count as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntertainmentOption {
    pub name: String,
    pub cost: f64,
}

impl Priced for EntertainmentOption {
    fn name(&self) -> &str {
        &self.name
    }

    fn estimated_cost(&self, _guest_count: usize) -> f64 {
        self.cost
    }
}

/// A dated to-do on the event timeline. `deadline` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineTask {
    pub task: String,
    pub deadline: NaiveDate,
}

/// The whole per-user document.
///
/// Missing keys in a stored document read back as empty values, not as the
/// seed catalog; only a user with no document at all gets [`PartyPlan::seeded`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyPlan {
    #[serde(default)]
    pub budget: f64,

    #[serde(default)]
    pub venues: Vec<Venue>,

    #[serde(default)]
    pub caterers: Vec<Caterer>,

    #[serde(default, rename = "entertainment")]
    pub entertainment_options: Vec<EntertainmentOption>,

    /// Insertion-ordered, no duplicates (enforced by the guest manager).
    #[serde(default)]
    pub guests: Vec<String>,

    /// `BTreeMap` keeps JSON keys in deterministic order.
    #[serde(default)]
    pub preferences: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    pub event_timeline: Vec<TimelineTask>,

    #[serde(default)]
    pub photo_gallery: Vec<PathBuf>,

    #[serde(default)]
    pub checklist: Vec<String>,
}

impl PartyPlan {
    /// A plan with no catalog entries and nothing planned.
    pub fn empty() -> Self {
        Self {
            budget: 0.0,
            venues: Vec::new(),
            caterers: Vec::new(),
            entertainment_options: Vec::new(),
            guests: Vec::new(),
            preferences: BTreeMap::new(),
            event_timeline: Vec::new(),
            photo_gallery: Vec::new(),
            checklist: Vec::new(),
        }
    }

    /// The starting plan for a new user: the built-in catalog and nothing else.
    pub fn seeded() -> Self {
        Self {
            venues: vec![
                venue("Banquet Hall A", 100, 2000.0),
                venue("Garden Venue B", 150, 3000.0),
                venue("Beachside Venue C", 200, 5000.0),
            ],
            caterers: vec![
                caterer("Caterer X", 20.0),
                caterer("Caterer Y", 25.0),
                caterer("Caterer Z", 30.0),
            ],
            entertainment_options: vec![
                entertainment("DJ Services", 800.0),
                entertainment("Live Band", 1500.0),
                entertainment("Magician", 500.0),
            ],
            ..Self::empty()
        }
    }

    /// Guest count used for per-person pricing.
    pub fn effective_guest_count(&self) -> usize {
        if self.guests.is_empty() {
            DEFAULT_GUEST_COUNT
        } else {
            self.guests.len()
        }
    }
}

impl Default for PartyPlan {
    fn default() -> Self {
        Self::seeded()
    }
}

fn venue(name: &str, capacity: u32, cost: f64) -> Venue {
    Venue {
        name: name.to_owned(),
        capacity: Some(capacity),
        cost,
    }
}

fn caterer(name: &str, cost_per_person: f64) -> Caterer {
    Caterer {
        name: name.to_owned(),
        cost_per_person,
    }
}

fn entertainment(name: &str, cost: f64) -> EntertainmentOption {
    EntertainmentOption {
        name: name.to_owned(),
        cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_plan_has_three_entries_per_catalog() {
        let plan = PartyPlan::seeded();
        assert_eq!(plan.venues.len(), 3);
        assert_eq!(plan.caterers.len(), 3);
        assert_eq!(plan.entertainment_options.len(), 3);
        assert_eq!(plan.budget, 0.0);
        assert!(plan.guests.is_empty());
        assert!(plan.preferences.is_empty());
        assert!(plan.event_timeline.is_empty());
        assert!(plan.photo_gallery.is_empty());
        assert!(plan.checklist.is_empty());
    }

    #[test]
    fn effective_guest_count_falls_back_to_ten() {
        let mut plan = PartyPlan::seeded();
        assert_eq!(plan.effective_guest_count(), 10);

        plan.guests = vec!["Ann".into(), "Bo".into()];
        assert_eq!(plan.effective_guest_count(), 2);
    }

    #[test]
    fn caterer_cost_scales_with_guests() {
        let c = caterer("Caterer X", 20.0);
        assert_eq!(c.estimated_cost(10), 200.0);
        assert_eq!(c.estimated_cost(3), 60.0);

        let v = venue("Hall", 50, 900.0);
        assert_eq!(v.estimated_cost(500), 900.0);
    }

    #[test]
    fn json_uses_document_key_names() {
        let json = serde_json::to_value(PartyPlan::seeded()).expect("to_value");
        let obj = json.as_object().expect("object");

        for key in [
            "budget",
            "venues",
            "caterers",
            "entertainment",
            "guests",
            "preferences",
            "event_timeline",
            "photo_gallery",
            "checklist",
        ] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert!(obj.get("entertainment_options").is_none());
        assert_eq!(json["caterers"][0]["cost_per_person"], 20.0);
        assert_eq!(json["venues"][0]["capacity"], 100);
    }

    #[test]
    fn deadline_serializes_as_iso_date() {
        let task = TimelineTask {
            task: "Book cake".into(),
            deadline: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        };
        let json = serde_json::to_value(&task).expect("to_value");
        assert_eq!(json["deadline"], "2026-03-09");
    }

    #[test]
    fn missing_keys_read_back_as_empty() {
        let plan: PartyPlan = serde_json::from_str(r#"{"budget": 300}"#).expect("parse");
        assert_eq!(plan.budget, 300.0);
        assert!(plan.venues.is_empty());
        assert!(plan.caterers.is_empty());
        assert!(plan.guests.is_empty());
    }

    #[test]
    fn venue_without_capacity_parses() {
        let v: Venue = serde_json::from_str(r#"{"name": "Loft", "cost": 700}"#).expect("parse");
        assert_eq!(v.capacity, None);
        assert_eq!(v.cost, 700.0);
    }
}
