//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use crate::process::CommandOutput;
use crate::warning::ReleaseWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message);
}

/// Display a release warning to the user.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("\x1b[33m⚠ WARNING:\x1b[0m {}", warning);
}

/// Display the version change and the ordered list of operations about to run.
///
/// # Arguments
/// * `current` - Version as found in the version file
/// * `next` - Version that will be written and tagged
/// * `operations` - One line per step, in execution order
pub fn display_plan(current: &str, next: &str, operations: &[String]) {
    println!("\n\x1b[1mRelease {}:\x1b[0m", next);
    println!("  From: \x1b[31m{}\x1b[0m", current);
    println!("  To:   \x1b[32m{}\x1b[0m", next);
    println!("\x1b[4mThis will:\x1b[0m");
    for line in format_operations(operations) {
        println!("{}", line);
    }
}

/// Display what a real run would have done.
pub fn display_dry_run_summary(next: &str, operations: &[String]) {
    display_status("Dry run: no changes were made");
    println!("\x1b[1mA real run would release {}:\x1b[0m", next);
    for line in format_operations(operations) {
        println!("{}", line);
    }
}

/// Numbered, indented operation lines.
pub fn format_operations(operations: &[String]) -> Vec<String> {
    operations
        .iter()
        .enumerate()
        .map(|(i, op)| format!("  {}. {}", i + 1, op))
        .collect()
}

/// Show captured output of a failed external command.
pub fn display_command_output(output: &CommandOutput) {
    let stdout = output.stdout.trim_end();
    let stderr = output.stderr.trim_end();
    if !stdout.is_empty() {
        eprintln!("\x1b[2m--- stdout ---\x1b[0m\n{}", stdout);
    }
    if !stderr.is_empty() {
        eprintln!("\x1b[2m--- stderr ---\x1b[0m\n{}", stderr);
    }
}

/// Display the commands that undo local git changes the tool cannot revert itself.
pub fn display_remediation(commands: &[String]) {
    if commands.is_empty() {
        return;
    }
    eprintln!("\n\x1b[33m→\x1b[0m You may need to revert git changes manually:");
    for command in commands {
        eprintln!("  \x1b[36m{}\x1b[0m", command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_operations_numbers_lines() {
        let ops = vec!["git add pyproject.toml".to_string(), "git push".to_string()];
        assert_eq!(
            format_operations(&ops),
            vec!["  1. git add pyproject.toml", "  2. git push"]
        );
    }

    #[test]
    fn test_display_remediation_empty_is_silent() {
        // Visual verification test - nothing is printed
        display_remediation(&[]);
    }

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }
}
