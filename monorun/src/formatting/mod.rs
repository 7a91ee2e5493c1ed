//! CLI formatting utilities.
//!
//! Consistent colors and visual hierarchy for command output.

mod headers;
mod output;
mod status;
mod tables;

pub use headers::{print_section_header, SectionStyle};
pub use output::{format_duration, print_key_value, print_separator_with_spacing, print_summary_box};
pub use status::{print_error, print_success, print_warning};
pub use tables::{print_project_table, print_publish_table, print_upgrade_table, ProjectRow};
