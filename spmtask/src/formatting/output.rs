//! General output formatting utilities.

use owo_colors::OwoColorize;
use spmtask_core::diagnostics::CHANNEL_NAME;

/// Prints a key-value pair with consistent formatting.
pub fn print_key_value(key: &str, value: &str) {
    println!("  {} {}", key.bright_black().bold(), value.bold().white());
}

/// Writes diagnostic channel lines to stderr in a box titled with the channel name.
///
/// `failed` highlights the title when the channel was revealed by a failure.
pub fn print_diagnostics(lines: &[String], failed: bool) {
    if lines.is_empty() {
        return;
    }

    let title = if failed {
        CHANNEL_NAME.red().bold().to_string()
    } else {
        CHANNEL_NAME.yellow().bold().to_string()
    };
    eprintln!("┌─ {} {}", title, "─".repeat(30).bright_black());
    for entry in lines {
        for line in entry.lines() {
            eprintln!("│ {}", line);
        }
    }
    eprintln!("└{}", "─".repeat(60).bright_black());
}
