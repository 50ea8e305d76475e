use tracing::info;

use crate::error::PlannerError;
use crate::planner::Planner;

impl Planner {
    /// Replace the budget. Negative or non-finite amounts are rejected and
    /// leave the stored budget untouched.
    pub fn set_budget(&mut self, amount: f64) -> Result<(), PlannerError> {
        if !amount.is_finite() {
            return Err(PlannerError::NonFiniteBudget);
        }
        if amount < 0.0 {
            return Err(PlannerError::NegativeBudget { amount });
        }
        self.plan.budget = amount;
        info!(amount, "budget set");
        self.commit()
    }

    pub fn budget(&self) -> f64 {
        self.plan.budget
    }
}

#[cfg(test)]
mod tests {
    use crate::error::PlannerError;
    use crate::planner::tests::{reload, temp_planner, unwritable_planner};

    #[test]
    fn set_budget_persists() {
        let (dir, mut planner) = temp_planner();
        planner.set_budget(2500.0).unwrap();

        assert_eq!(planner.budget(), 2500.0);
        assert_eq!(reload(&dir).budget, 2500.0);
    }

    #[test]
    fn zero_budget_is_allowed() {
        let (_dir, mut planner) = temp_planner();
        planner.set_budget(0.0).unwrap();
        assert_eq!(planner.budget(), 0.0);
    }

    #[test]
    fn negative_budget_is_rejected_without_change() {
        let (dir, mut planner) = temp_planner();
        planner.set_budget(300.0).unwrap();

        let err = planner.set_budget(-5.0).unwrap_err();

        assert!(matches!(err, PlannerError::NegativeBudget { .. }));
        assert_eq!(planner.budget(), 300.0);
        assert_eq!(reload(&dir).budget, 300.0);
    }

    #[test]
    fn nan_and_infinite_budgets_are_rejected() {
        let (_dir, mut planner) = temp_planner();
        assert!(matches!(
            planner.set_budget(f64::NAN),
            Err(PlannerError::NonFiniteBudget)
        ));
        assert!(matches!(
            planner.set_budget(f64::INFINITY),
            Err(PlannerError::NonFiniteBudget)
        ));
        assert_eq!(planner.budget(), 0.0);
    }

    #[test]
    fn rejected_budget_never_writes() {
        let (dir, mut planner) = temp_planner();
        let _ = planner.set_budget(-1.0);
        assert!(!dir.path().join("party_plan_tester.json").exists());
    }

    #[test]
    fn write_failure_keeps_new_budget_in_memory() {
        let (_dir, mut planner) = unwritable_planner();
        let err = planner.set_budget(75.0).unwrap_err();

        assert!(matches!(err, PlannerError::StoreWriteFailed { .. }));
        assert_eq!(planner.budget(), 75.0);
    }
}
