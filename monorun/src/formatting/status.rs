//! Status indicators and message formatting.

use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy)]
enum Status {
    Success,
    Error,
    Warning,
}

impl Status {
    fn symbol(&self) -> &'static str {
        match self {
            Status::Success => "✓",
            Status::Error => "✗",
            Status::Warning => "⚠",
        }
    }

    fn format(&self, message: &str) -> String {
        match self {
            Status::Success => format!("{} {}", self.symbol().green(), message.green().bold()),
            Status::Error => format!("{} {}", self.symbol().red(), message.red().bold()),
            Status::Warning => format!("{} {}", self.symbol().yellow(), message.yellow().bold()),
        }
    }
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("  {}", Status::Success.format(message));
}

/// Prints an error message.
pub fn print_error(message: &str) {
    println!("  {}", Status::Error.format(message));
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    println!("  {}", Status::Warning.format(message));
}
