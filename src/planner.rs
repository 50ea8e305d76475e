//! The loaded party plan for one user plus the handle it is saved through.
//!
//! Every mutating operation (here and in the `budget`, `guests`,
//! `checklist` and `timeline` modules) runs validate, then mutate in
//! memory, then [`Planner::commit`]. A rejected request never writes. A
//! failed write is returned to the caller but the in-memory change stays.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::info;

use crate::error::PlannerError;
use crate::generate::PlanGenerator;
use crate::plan::PartyPlan;
use crate::store::PlanStore;

/// Kinds of service the booking placeholder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ServiceType {
    Venue,
    Caterer,
    Entertainment,
}

impl ServiceType {
    fn label(self) -> &'static str {
        match self {
            ServiceType::Venue => "Venue",
            ServiceType::Caterer => "Caterer",
            ServiceType::Entertainment => "Entertainment",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_ascii_lowercase())
    }
}

impl FromStr for ServiceType {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "venue" => Ok(ServiceType::Venue),
            "caterer" => Ok(ServiceType::Caterer),
            "entertainment" => Ok(ServiceType::Entertainment),
            _ => Err(PlannerError::InvalidServiceType {
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug)]
pub struct Planner {
    user: String,
    store: PlanStore,
    pub(crate) plan: PartyPlan,
}

/// Outcome of [`Planner::adjust_plan`].
#[derive(Debug)]
pub struct Adjustment {
    pub reply: String,
    pub saved: Result<(), PlannerError>,
}

impl Planner {
    /// Load (or default) the plan for `user` from `store`.
    ///
    /// The user id is only a storage key; it must not be blank.
    pub fn open(user: &str, store: PlanStore) -> Result<Self, PlannerError> {
        let user = user.trim();
        if user.is_empty() {
            return Err(PlannerError::EmptyField { field: "User ID" });
        }
        let plan = store.load(user);
        Ok(Self {
            user: user.to_owned(),
            store,
            plan,
        })
    }

    /// Wrap an already-built plan; nothing is read from `store`.
    #[cfg(test)]
    pub(crate) fn with_plan(user: &str, store: PlanStore, plan: PartyPlan) -> Self {
        Self {
            user: user.to_owned(),
            store,
            plan,
        }
    }

    #[cfg(test)]
    pub(crate) fn user(&self) -> &str {
        &self.user
    }

    #[cfg(test)]
    pub(crate) fn plan(&self) -> &PartyPlan {
        &self.plan
    }

    pub fn store_path(&self) -> PathBuf {
        self.store.path_for(&self.user)
    }

    /// Rewrite the whole document for this user.
    pub fn commit(&self) -> Result<(), PlannerError> {
        self.store.save(&self.user, &self.plan)
    }

    // -- preferences --

    /// Set `key` to `value`, replacing any previous value.
    pub fn update_preference(
        &mut self,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), PlannerError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(PlannerError::EmptyField {
                field: "Preference key",
            });
        }
        info!(key, %value, "preference updated");
        self.plan.preferences.insert(key.to_owned(), value);
        self.commit()
    }

    /// Parse `"key, value"` (split on the first comma) and store the value as a string.
    pub fn update_preference_pair(
        &mut self,
        input: &str,
    ) -> Result<(String, String), PlannerError> {
        let Some((key, value)) = input.split_once(',') else {
            return Err(PlannerError::InvalidPreference {
                input: input.to_owned(),
            });
        };
        let (key, value) = (key.trim(), value.trim());
        self.update_preference(key, serde_json::Value::String(value.to_owned()))?;
        Ok((key.to_owned(), value.to_owned()))
    }

    pub fn preferences(&self) -> &std::collections::BTreeMap<String, serde_json::Value> {
        &self.plan.preferences
    }

    // -- photos --

    /// Append `path` to the gallery if it is an existing regular file right now.
    pub fn add_photo(&mut self, path: &Path) -> Result<(), PlannerError> {
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "photo not found");
            return Err(PlannerError::PhotoNotFound {
                path: path.to_path_buf(),
            });
        }
        self.plan.photo_gallery.push(path.to_path_buf());
        info!(path = %path.display(), "photo added to gallery");
        self.commit()
    }

    pub fn photos(&self) -> &[PathBuf] {
        &self.plan.photo_gallery
    }

    // -- booking --

    /// Record a booking request. No booking system is contacted; the request
    /// is logged and the plan is re-saved.
    pub fn book_service(
        &mut self,
        service: ServiceType,
        details: &str,
    ) -> Result<String, PlannerError> {
        let details = details.trim();
        if details.is_empty() {
            return Err(PlannerError::EmptyField {
                field: "Service details",
            });
        }
        info!(service = %service, details, "service booked");
        self.commit()?;
        Ok(format!(
            "{} '{details}' has been booked successfully!",
            service.label()
        ))
    }

    // -- export / adjust --

    /// Write the plan to `dest`, or to this user's store path when `None`.
    pub fn export(&self, dest: Option<&Path>) -> Result<PathBuf, PlannerError> {
        let dest = dest.map_or_else(|| self.store_path(), Path::to_path_buf);
        self.store.export(&self.plan, &dest)?;
        info!(path = %dest.display(), "plan exported");
        Ok(dest)
    }

    /// Generate a revised plan from `details`, then re-save the current plan.
    ///
    /// The generated text is returned, not stored. A failed save does not
    /// hide the generated text; it is reported alongside it.
    pub fn adjust_plan(&self, generator: &PlanGenerator, details: &str) -> Adjustment {
        info!("adjusting the plan based on new details");
        Adjustment {
            reply: generator.generate(details),
            saved: self.commit(),
        }
    }
}
