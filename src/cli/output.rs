//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::Task;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// The `[x]` / `[ ]` marker for a task.
pub fn status_marker(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Print a table of tasks (Status, Id, Task) in vault order.
pub fn print_tasks_table(tasks: &[Task]) {
    if tasks.is_empty() {
        info("No tasks.");
        tip("Run `todo add <TEXT>` to add your first task.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "Id", "Task"]);

    for t in tasks {
        let text = if t.done {
            style(&t.text).dim().to_string()
        } else {
            t.text.clone()
        };
        table.add_row(vec![
            status_marker(t.done).to_string(),
            t.id.to_string(),
            text,
        ]);
    }

    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_markers() {
        assert_eq!(status_marker(true), "[x]");
        assert_eq!(status_marker(false), "[ ]");
    }
}
