//! Output formatting utilities for CLI commands

use is_terminal::IsTerminal;
use std::io::{self, Write};
use std::path::Path;

/// Format error message for display
pub fn format_error(operation: &str, details: impl std::fmt::Display) -> String {
    format!("{} - {}", operation, details)
}

/// Log info message (respects quiet flag)
pub fn log_info(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", msg);
    }
}

/// Write output to file or stdout
pub fn write_output(content: &str, path: Option<&Path>) -> Result<(), String> {
    if let Some(path) = path {
        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write to {}: {}", path.display(), e))?;
    } else {
        let mut stdout = io::stdout();
        stdout
            .write_all(content.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| format!("Failed to write to stdout: {}", e))?;
    }
    Ok(())
}

/// Wrap `text` in an ANSI color when stderr is a terminal.
pub fn color(code: &str, text: &str) -> String {
    paint(code, text, io::stderr().is_terminal())
}

fn paint(code: &str, text: &str, enabled: bool) -> String {
    if enabled {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Format a fraction as a percentage.
pub fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}
