use tracing::info;

use crate::error::PlannerError;
use crate::planner::Planner;

impl Planner {
    /// Append `item`; blank items are rejected, repeats are allowed.
    pub fn add_checklist_item(&mut self, item: &str) -> Result<(), PlannerError> {
        let item = item.trim();
        if item.is_empty() {
            return Err(PlannerError::EmptyField {
                field: "Checklist item",
            });
        }
        self.plan.checklist.push(item.to_owned());
        info!(item, "checklist item added");
        self.commit()
    }

    pub fn checklist(&self) -> &[String] {
        &self.plan.checklist
    }
}

#[cfg(test)]
mod tests {
    use crate::error::PlannerError;
    use crate::planner::tests::{reload, temp_planner};

    #[test]
    fn items_keep_insertion_order_and_persist() {
        let (dir, mut planner) = temp_planner();
        planner.add_checklist_item("Order cake").unwrap();
        planner.add_checklist_item("Buy balloons").unwrap();

        assert_eq!(planner.checklist(), &["Order cake", "Buy balloons"]);
        assert_eq!(reload(&dir).checklist, vec!["Order cake", "Buy balloons"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let (_dir, mut planner) = temp_planner();
        planner.add_checklist_item("Call mom").unwrap();
        planner.add_checklist_item("Call mom").unwrap();
        assert_eq!(planner.checklist().len(), 2);
    }

    #[test]
    fn blank_item_is_rejected_without_write() {
        let (dir, mut planner) = temp_planner();
        let err = planner.add_checklist_item(" \t").unwrap_err();

        assert!(matches!(err, PlannerError::EmptyField { .. }));
        assert!(planner.checklist().is_empty());
        assert!(!dir.path().join("party_plan_tester.json").exists());
    }
}
