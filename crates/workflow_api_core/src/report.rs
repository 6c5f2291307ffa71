use crate::contract::{AssignedTaskRow, TaskDocument, TaskStatusCounts};

/// Closed set of task status literals. Parsing is exact and case-sensitive;
/// anything else is classified as unrecognized rather than coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Pending" => Some(Self::Pending),
            "In Progress" => Some(Self::InProgress),
            "Completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Inclusive date window over the caller-supplied bound strings.
///
/// Comparison is lexical on the raw strings, which coincides with
/// chronological order exactly when both sides are zero-padded ISO-8601
/// dates. No normalization is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    pub from_date: String,
    pub to_date: String,
}

impl DateWindow {
    pub fn new(from_date: impl Into<String>, to_date: impl Into<String>) -> Self {
        Self {
            from_date: from_date.into(),
            to_date: to_date.into(),
        }
    }

    /// A task is in the window only when fully contained: its own start is
    /// at or after `from_date` and its own end is at or before `to_date`.
    /// Overlap is not containment.
    pub fn contains(&self, task: &TaskDocument) -> bool {
        task.start_date.as_str() >= self.from_date.as_str()
            && task.end_date.as_str() <= self.to_date.as_str()
    }
}

pub fn tally_tasks(rows: &[AssignedTaskRow], window: &DateWindow) -> TaskStatusCounts {
    let mut counts = TaskStatusCounts::default();
    for row in rows {
        if !window.contains(&row.task) {
            continue;
        }

        match TaskStatus::parse(&row.task.status) {
            Some(TaskStatus::Completed) => counts.completed_tasks += 1,
            Some(TaskStatus::InProgress) => counts.inprogress_tasks += 1,
            Some(TaskStatus::Pending) => counts.pending_tasks += 1,
            // Unrecognized literals contribute to no counter.
            None => {}
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str, start_date: &str, end_date: &str) -> AssignedTaskRow {
        AssignedTaskRow {
            task: TaskDocument {
                status: status.to_string(),
                start_date: start_date.to_string(),
                end_date: end_date.to_string(),
            },
            resource_name: "Dana".to_string(),
        }
    }

    fn march_window() -> DateWindow {
        DateWindow::new("2024-03-01", "2024-03-31")
    }

    #[test]
    fn status_parsing_is_exact_and_case_sensitive() {
        assert_eq!(TaskStatus::parse("Pending"), Some(TaskStatus::Pending));
        assert_eq!(TaskStatus::parse("In Progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("Completed"), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::parse("pending"), None);
        assert_eq!(TaskStatus::parse("IN PROGRESS"), None);
        assert_eq!(TaskStatus::parse("Done"), None);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = march_window();
        assert!(window.contains(&row("Pending", "2024-03-01", "2024-03-31").task));
        assert!(window.contains(&row("Pending", "2024-03-10", "2024-03-10").task));
    }

    #[test]
    fn task_starting_before_window_is_excluded_even_when_end_is_in_range() {
        let window = march_window();
        assert!(!window.contains(&row("Pending", "2024-02-28", "2024-03-05").task));
    }

    #[test]
    fn task_ending_after_window_is_excluded_even_when_start_is_in_range() {
        let window = march_window();
        assert!(!window.contains(&row("Pending", "2024-03-28", "2024-04-02").task));
    }

    #[test]
    fn lexical_comparison_matches_chronology_for_padded_iso_dates() {
        let window = DateWindow::new("2024-09-01", "2024-10-31");
        assert!(window.contains(&row("Pending", "2024-09-02", "2024-10-30").task));
    }

    #[test]
    fn lexical_comparison_diverges_for_unpadded_dates() {
        // "2024-9-02" sorts after "2024-10-31" byte-wise, so a chronologically
        // in-range task falls outside the window when the month is unpadded.
        let window = DateWindow::new("2024-09-01", "2024-10-31");
        assert!(!window.contains(&row("Pending", "2024-9-02", "2024-10-30").task));
    }

    #[test]
    fn tally_counts_statuses_within_window() {
        let rows = vec![
            row("Completed", "2024-03-02", "2024-03-04"),
            row("Completed", "2024-03-10", "2024-03-12"),
            row("Pending", "2024-03-20", "2024-03-25"),
        ];

        let counts = tally_tasks(&rows, &march_window());
        assert_eq!(counts.completed_tasks, 2);
        assert_eq!(counts.inprogress_tasks, 0);
        assert_eq!(counts.pending_tasks, 1);
    }

    #[test]
    fn unrecognized_statuses_leave_all_counters_untouched() {
        let rows = vec![
            row("Done", "2024-03-02", "2024-03-04"),
            row("completed", "2024-03-10", "2024-03-12"),
            row("", "2024-03-20", "2024-03-25"),
        ];

        let counts = tally_tasks(&rows, &march_window());
        assert_eq!(counts, TaskStatusCounts::default());
    }

    #[test]
    fn counters_never_exceed_row_count() {
        let rows = vec![
            row("Completed", "2024-03-02", "2024-03-04"),
            row("In Progress", "2024-02-01", "2024-03-04"),
            row("Mystery", "2024-03-05", "2024-03-06"),
            row("Pending", "2024-03-07", "2024-03-08"),
        ];

        let counts = tally_tasks(&rows, &march_window());
        assert!(counts.total() <= rows.len() as u64);
        assert_eq!(counts.completed_tasks, 1);
        assert_eq!(counts.inprogress_tasks, 0);
        assert_eq!(counts.pending_tasks, 1);
    }

    #[test]
    fn empty_bounds_match_nothing() {
        let rows = vec![row("Pending", "2024-03-02", "2024-03-04")];
        let counts = tally_tasks(&rows, &DateWindow::new("", ""));
        assert_eq!(counts, TaskStatusCounts::default());
    }
}
