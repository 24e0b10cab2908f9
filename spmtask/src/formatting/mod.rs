//! CLI formatting utilities.
//!
//! Consistent colors and layout for everything the CLI prints.

mod headers;
mod output;
mod status;
mod tables;

pub use headers::{print_section_header, SectionStyle};
pub use output::{print_diagnostics, print_key_value};
pub use status::{print_error, print_info, print_success, print_warning};
pub use tables::print_task_table;
