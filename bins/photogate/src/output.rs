//! Terminal output for reports and profiles.

use owo_colors::{OwoColorize, Stream};
use photogate_core::config::OutputFormat;
use photogate_core::Error;
use photogate_image::{RuleRegistry, ValidationReport};
use serde::Serialize;

/// Renders reports in the configured format.
pub struct Printer {
    format: OutputFormat,
    color: bool,
}

impl Printer {
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }

    /// Print a report to stdout
    pub fn report(&self, report: &ValidationReport) {
        match self.format {
            OutputFormat::Json => print_json(report),
            OutputFormat::Text => {
                println!("{} {}", self.mark(report.success()), report.message());
                for error in report.errors() {
                    println!("  - {error}");
                }
                if let Some(info) = report.image_info() {
                    let mut line = format!(
                        "  format: {}  size: {}  mode: {}",
                        info.format, info.size, info.mode
                    );
                    if let Some(count) = info.transparent_pixels {
                        line.push_str(&format!("  transparent pixels: {count}"));
                    }
                    println!("{}", self.dim(&line));
                }
            }
        }
    }

    /// Print the profile table to stdout
    pub fn profiles(&self, rules: &RuleRegistry) {
        match self.format {
            OutputFormat::Json => {
                let profiles: Vec<_> = rules
                    .iter()
                    .map(|(name, rule)| {
                        serde_json::json!({
                            "name": name,
                            "format": rule.format,
                            "width": rule.width,
                            "height": rule.height,
                            "transparency_required": rule.transparency_required,
                        })
                    })
                    .collect();
                print_json(&profiles);
            }
            OutputFormat::Text => {
                for (name, rule) in rules.iter() {
                    let background = if rule.transparency_required {
                        "transparent background"
                    } else {
                        "any background"
                    };
                    println!("{name}  {} {}  {background}", rule.format, rule.size_string());
                }
            }
        }
    }

    fn mark(&self, ok: bool) -> String {
        let symbol = if ok { "✓" } else { "✗" };
        if !self.color {
            return symbol.to_string();
        }
        if ok {
            symbol.if_supports_color(Stream::Stdout, |s| s.green()).to_string()
        } else {
            symbol.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.if_supports_color(Stream::Stdout, |s| s.dimmed()).to_string()
        } else {
            text.to_string()
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("failed to serialize output: {err}"),
    }
}

/// Print a host error to stderr
pub fn print_error(err: &Error, color: bool) {
    eprintln!("{}", error_line(err, color));
}

/// Print a warning to stderr
pub fn print_warning(message: &str, color: bool) {
    eprintln!("{}", warning_line(message, color));
}

fn error_line(err: &Error, color: bool) -> String {
    let mark = if color {
        "✗".if_supports_color(Stream::Stderr, |s| s.red()).to_string()
    } else {
        "✗".to_string()
    };
    format!("{mark} {err}")
}

fn warning_line(message: &str, color: bool) -> String {
    let mark = if color {
        "⚠".if_supports_color(Stream::Stderr, |s| s.yellow()).to_string()
    } else {
        "⚠".to_string()
    };
    format!("{mark} {message}")
}

/// Print a metrics export to stderr
pub fn print_metrics(metrics: &serde_json::Value) {
    match serde_json::to_string_pretty(metrics) {
        Ok(text) => eprintln!("{text}"),
        Err(_) => eprintln!("{metrics}"),
    }
}
