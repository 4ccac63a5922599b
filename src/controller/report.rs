use chrono::NaiveDate;

use super::GoalCard;
use crate::model::{GoalStatus, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub title: String,
    pub due_date: NaiveDate,
    pub status: GoalStatus,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub feedback: usize,
}

/// Summary of one employee's goals, derived from the same reads as the
/// performance view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerformanceReport {
    pub rows: Vec<ReportRow>,
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub on_hold: usize,
    pub tasks_pending: usize,
    pub tasks_approved: usize,
    pub tasks_rejected: usize,
}

impl PerformanceReport {
    pub fn build(cards: &[GoalCard]) -> Self {
        let mut report = PerformanceReport::default();

        for card in cards {
            let count = |status: TaskStatus| card.tasks.iter().filter(|t| t.status == status).count();
            let row = ReportRow {
                title: card.goal.title.clone(),
                due_date: card.goal.due_date,
                status: card.goal.status,
                pending: count(TaskStatus::Pending),
                approved: count(TaskStatus::Approved),
                rejected: count(TaskStatus::Rejected),
                feedback: card.feedback.len(),
            };

            match row.status {
                GoalStatus::NotStarted => report.not_started += 1,
                GoalStatus::InProgress => report.in_progress += 1,
                GoalStatus::Completed => report.completed += 1,
                GoalStatus::OnHold => report.on_hold += 1,
            }
            report.tasks_pending += row.pending;
            report.tasks_approved += row.approved;
            report.tasks_rejected += row.rejected;
            report.rows.push(row);
        }

        report
    }

    pub fn total_goals(&self) -> usize {
        self.rows.len()
    }

    /// Share of goals marked completed, 0.0 when there are none.
    pub fn completion_rate(&self) -> f64 {
        if self.rows.is_empty() {
            0.0
        } else {
            self.completed as f64 / self.rows.len() as f64
        }
    }
}
