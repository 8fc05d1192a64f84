//! Human-readable status lines

use colored::*;

/// Print a success message
pub fn ok(message: &str) {
    println!("{} {}", "✓".bright_green().bold(), message);
}

/// Print a failure message
pub fn failed(message: &str) {
    eprintln!("{} {}", "✗".bright_red().bold(), message.bright_red());
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", "⚠".bright_yellow().bold(), message.bright_yellow());
}

/// Indented secondary line under a status message
pub fn detail(message: &str) {
    println!("  {} {}", "-".dimmed(), message);
}
