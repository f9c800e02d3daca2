//! Output formatting utilities for CLI
//!
//! Command results go to stdout, either as text or as pretty JSON. Errors
//! always go to stderr.

use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn to_json<T: Serialize>(value: &T) -> Option<String> {
    serde_json::to_string_pretty(value)
        .inspect_err(|e| tracing::error!("Failed to serialize output: {}", e))
        .ok()
}

/// Print a value in the specified format
pub fn print_output<T: Serialize + std::fmt::Display>(value: &T, format: OutputFormat) {
    print_formatted(value, format, |v| v.to_string());
}

/// Print a serializable value as JSON or use custom text formatter
pub fn print_formatted<T, F>(value: &T, format: OutputFormat, text_formatter: F)
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    let line = match format {
        OutputFormat::Text => Some(text_formatter(value)),
        OutputFormat::Json => to_json(value),
    };
    if let Some(line) = line {
        println!("{}", line);
    }
}

/// Print a success message (suppressed in quiet mode)
pub fn print_success(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", message);
    }
}

fn error_line(error: &anyhow::Error) -> String {
    // `{:#}` joins the context chain: "outer: inner"
    format!("Error: {:#}", error)
}

/// Print an error and its causes (never suppressed)
pub fn print_error(error: &anyhow::Error) {
    eprintln!("{}", error_line(error));
}

fn status_line(ok: bool, message: &str) -> String {
    format!("[{}] {}", if ok { "OK" } else { "!!" }, message)
}

/// Print a status line marked as passed or failed
pub fn print_status(ok: bool, message: &str) {
    println!("{}", status_line(ok, message));
}
