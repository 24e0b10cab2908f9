//! Table formatting utilities using comfy-table.

use comfy_table::{Cell, Table};
use spmtask_core::TaskDefinition;

/// Prints discovered tasks in host order.
pub fn print_task_table(tasks: &[TaskDefinition]) {
    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("Task").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Kind").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Group").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Command").add_attribute(comfy_table::Attribute::Bold),
        ])
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);

    for task in tasks {
        let group = match task.group() {
            Some(spmtask_core::TaskGroup::Build) => "build",
            Some(spmtask_core::TaskGroup::Test) => "test",
            None => "-",
        };
        table.add_row(vec![
            Cell::new(task.label()).fg(comfy_table::Color::White),
            Cell::new(task.kind().as_str()).fg(comfy_table::Color::DarkGrey),
            Cell::new(group).fg(comfy_table::Color::DarkGrey),
            Cell::new(task.shell_command()).fg(comfy_table::Color::Cyan),
        ]);
    }

    println!("{}", table);
}
