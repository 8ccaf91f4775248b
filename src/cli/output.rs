//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented label/value pair (label dimmed)
pub fn field(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {} {}", format!("{label}:").dimmed(), msg);
}

/// Print plain output (no color, for data/JSON)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print the result of a toggle: green [x] when now checked, dimmed [ ] otherwise
pub fn toggled(path: &(impl std::fmt::Display + ?Sized), checked: bool) {
    if checked {
        println!("{} {}", "[x]".green(), path);
    } else {
        println!("{} {}", "[ ]".dimmed(), path);
    }
}

/// Print the result of an expand toggle
pub fn expanded(key: &str, open: bool) {
    let marker = if open { "▾".cyan() } else { "▸".dimmed() };
    println!("{} {}", marker, key);
}
