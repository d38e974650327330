//! Pure formatting functions for terminal output.
//!
//! This module contains all display logic. Functions here only print; they
//! never read input or decide anything.

use crate::boundary::BoundaryWarning;
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the computed tag change (or initial tag).
///
/// Shows either:
/// - If a previous tag exists: "From: old_tag -> To: new_tag"
/// - If initial: "Initial Tag: new_tag"
///
/// # Arguments
/// * `old_tag` - Highest existing tag (None if this is the first tag)
/// * `new_tag` - The new tag
pub fn display_proposed_tag(old_tag: Option<&str>, new_tag: &str) {
    match old_tag {
        Some(old) => {
            println!("\n{}", style("Tag Change:").bold());
            println!("  From: {}", style(old).red());
            println!("  To:   {}", style(new_tag).green());
        }
        None => {
            println!("\n{}", style("Initial Tag:").bold());
            println!("  New tag: {}", style(new_tag).green());
        }
    }
}

/// Final line of a run.
pub fn display_outcome(tag: &str, simulated: bool) {
    if simulated {
        display_status(&format!("Dry run: tag {} was not created", tag));
    } else {
        display_success(&format!("Created tag {}", tag));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_success() {
        // Visual verification test - output is printed to stdout
        display_success("test success");
    }

    #[test]
    fn test_display_outcome_both_modes() {
        display_outcome("v1.0.0", true);
        display_outcome("v1.0.0", false);
    }
}
