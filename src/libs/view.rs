use super::error::Result;
use super::filter::TaskView;
use super::stats::TaskStats;
use super::task::{TaskPriority, TaskStatus};
use crate::db::categories::Category;
use crate::db::users::User;
use chrono::NaiveDateTime;
use prettytable::{row, Cell, Row, Table};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

fn date(value: &NaiveDateTime) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Foreground color spec for a status cell.
fn status_style(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "Fy",
        TaskStatus::InProgress => "Fc",
        TaskStatus::Completed => "Fg",
    }
}

/// Foreground color spec for a priority cell.
fn priority_style(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "Fg",
        TaskPriority::Medium => "Fy",
        TaskPriority::High => "Fr",
    }
}

pub struct View {}

impl View {
    pub fn task_table(tasks: &[TaskView]) -> Table {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "STATUS", "PRIORITY", "CATEGORY", "DUE", "CREATED"]);
        for view in tasks {
            let task = &view.task;
            let due = match &task.due_date {
                Some(due) if view.overdue => format!("{} (overdue)", date(due)),
                Some(due) => date(due),
                None => String::new(),
            };
            let category = view
                .category
                .as_ref()
                .map(|badge| format!("{} {}", badge.name, badge.color))
                .unwrap_or_default();
            table.add_row(Row::new(vec![
                Cell::new(&task.id.to_string()),
                Cell::new(&task.title),
                Cell::new(task.status.as_str()).style_spec(status_style(task.status)),
                Cell::new(task.priority.as_str()).style_spec(priority_style(task.priority)),
                Cell::new(&category),
                Cell::new(&due),
                Cell::new(&date(&task.created_at)),
            ]));
        }

        table
    }

    pub fn tasks(tasks: &[TaskView]) -> Result<()> {
        View::task_table(tasks).printstd();
        Ok(())
    }

    /// Every field of a single task, one per row.
    pub fn task(view: &TaskView) -> Result<()> {
        let task = &view.task;
        let mut table = Table::new();

        table.add_row(row!["ID", task.id]);
        table.add_row(row!["TITLE", task.title]);
        table.add_row(row!["DESCRIPTION", task.description.as_deref().unwrap_or("")]);
        table.add_row(Row::new(vec![
            Cell::new("STATUS"),
            Cell::new(task.status.as_str()).style_spec(status_style(task.status)),
        ]));
        table.add_row(Row::new(vec![
            Cell::new("PRIORITY"),
            Cell::new(task.priority.as_str()).style_spec(priority_style(task.priority)),
        ]));
        table.add_row(row![
            "CATEGORY",
            view.category.as_ref().map(|badge| badge.name.as_str()).unwrap_or("")
        ]);
        table.add_row(row!["DUE", task.due_date.as_ref().map(date).unwrap_or_default()]);
        table.add_row(row!["OVERDUE", if view.overdue { "yes" } else { "no" }]);
        table.add_row(row!["CREATED", date(&task.created_at)]);
        table.add_row(row!["UPDATED", date(&task.updated_at)]);
        table.printstd();

        Ok(())
    }

    pub fn categories(categories: &[Category]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "COLOR", "DESCRIPTION"]);
        for category in categories {
            table.add_row(row![
                category.id,
                category.name,
                category.color,
                category.description.as_deref().unwrap_or("")
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn stats_table(stats: &TaskStats) -> Table {
        let mut table = Table::new();

        table.add_row(row!["TOTAL", "PENDING", "IN PROGRESS", "COMPLETED", "OVERDUE", "DONE %"]);
        table.add_row(row![
            stats.total,
            stats.pending,
            stats.in_progress,
            stats.completed,
            stats.overdue,
            format!("{:.0}", stats.completion_rate())
        ]);

        table
    }

    pub fn stats(stats: &TaskStats) -> Result<()> {
        View::stats_table(stats).printstd();
        Ok(())
    }

    pub fn user(user: &User) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", user.id]);
        table.add_row(row!["USERNAME", user.username]);
        table.add_row(row!["EMAIL", user.email]);
        table.add_row(row!["NAME", user.full_name()]);
        table.add_row(row!["REGISTERED", date(&user.created_at)]);
        table.printstd();

        Ok(())
    }

    pub fn migrations(history: &[(u32, String, String)]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["VERSION", "NAME", "APPLIED"]);
        for (version, name, applied_at) in history {
            table.add_row(row![version, name, applied_at]);
        }
        table.printstd();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::filter::CategoryBadge;
    use crate::libs::task::{parse_due_date, Task};
    use prettytable::{color, Attr};

    #[test]
    fn task_table_marks_overdue_and_category() {
        let created = parse_due_date("2026-02-01 08:00").unwrap();
        let view = TaskView {
            task: Task {
                id: 4,
                title: "Pay rent".to_string(),
                description: None,
                status: TaskStatus::Pending,
                priority: TaskPriority::High,
                due_date: Some(parse_due_date("2026-02-03").unwrap()),
                created_at: created,
                updated_at: created,
                user_id: 1,
                category_id: Some(2),
            },
            category: Some(CategoryBadge {
                name: "Personal".to_string(),
                color: "#28a745".to_string(),
            }),
            overdue: true,
        };

        let rendered = View::task_table(&[view]).to_string();
        assert!(rendered.contains("Pay rent"));
        assert!(rendered.contains("2026-02-03 00:00 (overdue)"));
        assert!(rendered.contains("Personal #28a745"));
        assert!(rendered.contains("high"));
    }

    #[test]
    fn stats_table_shows_completion_rate() {
        let stats = TaskStats {
            total: 4,
            pending: 1,
            in_progress: 1,
            completed: 2,
            overdue: 0,
        };
        let rendered = View::stats_table(&stats).to_string();
        assert!(rendered.contains("50"));
        assert!(rendered.contains("IN PROGRESS"));
    }

    #[test]
    fn status_and_priority_cells_are_colored() {
        assert_eq!(status_style(TaskStatus::Pending), "Fy");
        assert_eq!(status_style(TaskStatus::Completed), "Fg");
        assert_eq!(priority_style(TaskPriority::High), "Fr");

        let created = parse_due_date("2026-02-01 08:00").unwrap();
        let view = TaskView {
            task: Task {
                id: 9,
                title: "Fix roof".to_string(),
                description: None,
                status: TaskStatus::InProgress,
                priority: TaskPriority::High,
                due_date: None,
                created_at: created,
                updated_at: created,
                user_id: 1,
                category_id: None,
            },
            category: None,
            overdue: false,
        };

        let table = View::task_table(&[view]);
        let row = table.get_row(1).unwrap();
        assert_eq!(row.get_cell(2), Some(&Cell::new("in_progress").style_spec("Fc")));
        assert_eq!(
            row.get_cell(3),
            Some(&Cell::new("high").with_style(Attr::ForegroundColor(color::RED)))
        );
    }
}
