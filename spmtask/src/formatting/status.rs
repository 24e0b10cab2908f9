//! One-line status messages.

use owo_colors::{AnsiColors, OwoColorize};

#[derive(Debug, Clone, Copy)]
enum Status {
    Success,
    Error,
    Warning,
    Info,
}

impl Status {
    fn symbol(self) -> &'static str {
        match self {
            Status::Success => "✓",
            Status::Error => "✗",
            Status::Warning => "⚠",
            Status::Info => "→",
        }
    }

    fn color(self) -> AnsiColors {
        match self {
            Status::Success => AnsiColors::Green,
            Status::Error => AnsiColors::Red,
            Status::Warning => AnsiColors::Yellow,
            Status::Info => AnsiColors::Cyan,
        }
    }

    fn format(self, message: &str) -> String {
        let symbol_str = self.symbol();
        let symbol = symbol_str.color(self.color());
        match self {
            Status::Info => format!("{} {}", symbol, message.color(self.color())),
            _ => format!("{} {}", symbol, message.color(self.color()).bold()),
        }
    }
}

pub fn print_success(message: &str) {
    println!("  {}", Status::Success.format(message));
}

/// Errors go to stderr so `--json` output stays parseable.
pub fn print_error(message: &str) {
    eprintln!("  {}", Status::Error.format(message));
}

pub fn print_warning(message: &str) {
    println!("  {}", Status::Warning.format(message));
}

pub fn print_info(message: &str) {
    println!("  {}", Status::Info.format(message));
}
