//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Styling goes through `console`, which drops colors when the stream is not a terminal.

use console::style;

use crate::artifacts::ReleaseArtifact;
use crate::manifest::ManifestRecord;
use crate::warning::SafetyWarning;

/// How many uncommitted changes are listed before the rest are summarized.
const CHANGE_PREVIEW_LIMIT: usize = 5;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a safety warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
pub fn display_safety_warning(warning: &SafetyWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow().bold(), warning);
}

/// Display the version transition computed by the bump workflow.
pub fn display_version_change(current: &str, new: &str) {
    println!("\n{}", style("Version Change:").bold());
    println!("  From: {}", style(current).red());
    println!("  To:   {}", style(new).green());
}

/// Display the package being deployed.
pub fn display_package_info(record: &ManifestRecord) {
    println!(
        "\n{} {} v{}",
        style("Package:").bold(),
        record.name,
        record.version
    );
    if !record.description.is_empty() {
        println!("{} {}", style("Description:").bold(), record.description);
    }
}

/// Display the build artifacts found in the output directory.
pub fn display_artifacts(artifacts: &[ReleaseArtifact]) {
    println!("{}", style("Artifacts:").underlined());
    for artifact in artifacts {
        println!("  - {}", artifact.file_name);
    }
}

/// Display a preview of uncommitted changes.
///
/// Lists at most five entries; the remainder is summarized as a count.
pub fn display_uncommitted_changes(changes: &[String]) {
    for line in format_change_preview(changes) {
        eprintln!("   {}", line);
    }
}

/// Lines shown for an uncommitted-change preview.
pub fn format_change_preview(changes: &[String]) -> Vec<String> {
    let mut lines: Vec<String> = changes
        .iter()
        .take(CHANGE_PREVIEW_LIMIT)
        .cloned()
        .collect();

    if changes.len() > CHANGE_PREVIEW_LIMIT {
        lines.push(format!(
            "... and {} more",
            changes.len() - CHANGE_PREVIEW_LIMIT
        ));
    }

    lines
}

/// Display the command an operator can use to try the published package.
pub fn display_install_hint(label: &str, command: &str) {
    println!("   {} {}", label, style(command).cyan());
}
