use chrono::{Days, Local, NaiveDate};
use tracing::info;

use crate::error::PlannerError;
use crate::plan::TimelineTask;
use crate::planner::Planner;

impl Planner {
    /// Append `task` due `days_before` days from today. Returns the deadline.
    pub fn add_timeline_task(
        &mut self,
        task: &str,
        days_before: i64,
    ) -> Result<NaiveDate, PlannerError> {
        self.add_timeline_task_from(task, days_before, Local::now().date_naive())
    }

    /// Same as [`add_timeline_task`](Self::add_timeline_task) with an explicit "today".
    pub fn add_timeline_task_from(
        &mut self,
        task: &str,
        days_before: i64,
        today: NaiveDate,
    ) -> Result<NaiveDate, PlannerError> {
        let task = task.trim();
        if task.is_empty() {
            return Err(PlannerError::EmptyField { field: "Task" });
        }
        let deadline = deadline_from(today, days_before)?;

        self.plan.event_timeline.push(TimelineTask {
            task: task.to_owned(),
            deadline,
        });
        info!(task, %deadline, "timeline task created");
        self.commit()?;
        Ok(deadline)
    }

    /// Tasks in the order they were added.
    pub fn timeline(&self) -> &[TimelineTask] {
        &self.plan.event_timeline
    }
}

fn deadline_from(today: NaiveDate, days_before: i64) -> Result<NaiveDate, PlannerError> {
    let days = u64::try_from(days_before)
        .map_err(|_| PlannerError::NegativeDayOffset { days: days_before })?;
    today
        .checked_add_days(Days::new(days))
        .ok_or(PlannerError::DayOffsetOutOfRange { days: days_before })
}
