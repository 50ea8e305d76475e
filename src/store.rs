use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::PlannerError;
use crate::plan::PartyPlan;

const FILE_PREFIX: &str = "party_plan_";
const INDENT: &[u8] = b"    ";

/// Handle to the directory that holds one JSON document per user.
///
/// Passed explicitly to whoever reads or writes plans; there is no
/// process-wide store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStore {
    data_dir: PathBuf,
}

impl PlanStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Returns the document path for `user`: `<data_dir>/party_plan_<user>.json`.
    pub fn path_for(&self, user: &str) -> PathBuf {
        self.data_dir.join(format!("{FILE_PREFIX}{user}.json"))
    }

    /// Load the plan for `user`.
    ///
    /// A missing file yields the seeded plan. So does a file that cannot be
    /// read or parsed; that case is logged as an error and the file is left
    /// alone until the next save overwrites it.
    pub fn load(&self, user: &str) -> PartyPlan {
        match self.try_load(user) {
            Ok(Some(plan)) => {
                tracing::info!(user, "plan loaded");
                plan
            }
            Ok(None) => {
                tracing::info!(user, "no saved plan, starting from defaults");
                PartyPlan::seeded()
            }
            Err(e) => {
                tracing::error!(user, err = %e, "failed to load plan, starting from defaults");
                PartyPlan::seeded()
            }
        }
    }

    /// Like [`load`](Self::load) but reports what went wrong.
    ///
    /// `Ok(None)` means there is no document for `user` yet.
    pub fn try_load(&self, user: &str) -> Result<Option<PartyPlan>, PlannerError> {
        let path = self.path_for(user);

        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PlannerError::StoreReadFailed {
                    path,
                    detail: e.to_string(),
                });
            }
        };

        serde_json::from_str::<PartyPlan>(&contents)
            .map(Some)
            .map_err(|e| PlannerError::StoreReadFailed {
                path,
                detail: format!("invalid plan document: {e}"),
            })
    }

    /// Persist the whole plan for `user`, replacing any previous document.
    ///
    /// Creates the data directory if needed. The failure is logged here as
    /// well as returned, so callers may keep going after reporting it.
    pub fn save(&self, user: &str, plan: &PartyPlan) -> Result<(), PlannerError> {
        let path = self.path_for(user);
        match write_document(plan, &path) {
            Ok(()) => {
                tracing::info!(user, path = %path.display(), "plan saved");
                Ok(())
            }
            Err(e) => {
                tracing::error!(user, err = %e, "failed to save plan");
                Err(e)
            }
        }
    }

    /// Write the plan to an arbitrary `dest`, in the same format as [`save`](Self::save).
    pub fn export(&self, plan: &PartyPlan, dest: &Path) -> Result<(), PlannerError> {
        write_document(plan, dest).inspect_err(|e| {
            tracing::error!(path = %dest.display(), err = %e, "failed to export plan");
        })
    }
}

/// Render the plan as pretty JSON with four-space indentation.
pub fn to_document(plan: &PartyPlan) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    plan.serialize(&mut ser)?;
    // serde_json only ever emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes to a sibling temp file and renames over `path`; falls back to a
/// direct write if the rename fails.
fn write_document(plan: &PartyPlan, path: &Path) -> Result<(), PlannerError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PlannerError::StoreWriteFailed {
                path: parent.to_path_buf(),
                detail: format!("failed to create directory: {e}"),
            })?;
        }
    }

    let json = to_document(plan).map_err(|e| PlannerError::StoreWriteFailed {
        path: path.to_path_buf(),
        detail: format!("serialization failed: {e}"),
    })?;

    let tmp_path = path.with_extension("json.tmp");

    let write_result = (|| -> std::io::Result<()> {
        let mut f = fs::File::create(&tmp_path)?;
        f.write_all(json.as_bytes())?;
        f.flush()?;
        Ok(())
    })();

    if let Err(e) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(PlannerError::StoreWriteFailed {
            path: tmp_path,
            detail: e.to_string(),
        });
    }

    if fs::rename(&tmp_path, path).is_err() {
        fs::write(path, &json).map_err(|e| PlannerError::StoreWriteFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let _ = fs::remove_file(&tmp_path);
    }

    Ok(())
}
