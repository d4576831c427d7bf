//! Unified output rendering: JSON or human-readable table.
//!
//! Usage:
//! ```ignore
//! use billed_utils::output::{OutputFormat, render};
//!
//! let data = BillsOutput::new(bills);
//! render(format, &data)?;
//! ```

use anyhow::Result;
use serde::Serialize;

use billed_types::output::*;

use crate::format::format_amount;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default).
    Table,
    /// Compact JSON (for piping to jq, scripts).
    Json,
    /// Pretty-printed JSON (for reading).
    JsonPretty,
    /// Page markup, as the browser would receive it.
    Html,
}

/// Trait for types that can render as a human-readable table.
pub trait TableDisplay {
    fn table_lines(&self) -> Vec<String>;

    fn print_table(&self) {
        for line in self.table_lines() {
            println!("{line}");
        }
    }
}

/// Render structured output: JSON or table depending on format.
///
/// `Html` falls back to the table: only commands that own a page render
/// markup, and they handle that format before calling this.
pub fn render<T: Serialize + TableDisplay>(format: OutputFormat, data: &T) -> Result<()> {
    if !render_json_or(format, data)? {
        data.print_table();
    }
    Ok(())
}

/// Render just the JSON formats. Returns true if JSON was rendered.
pub fn render_json_or<T: Serialize>(format: OutputFormat, data: &T) -> Result<bool> {
    match format {
        OutputFormat::Table | OutputFormat::Html => Ok(false),
        OutputFormat::Json => {
            let json = serde_json::to_string(data)?;
            println!("{json}");
            Ok(true)
        }
        OutputFormat::JsonPretty => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{json}");
            Ok(true)
        }
    }
}

// ─── TableDisplay implementations for output types ──────────────────

impl TableDisplay for BillsOutput {
    fn table_lines(&self) -> Vec<String> {
        if self.bills.is_empty() {
            return vec!["No bills.".to_string()];
        }

        let mut lines = vec![
            "┌──────────────────────┬──────────────────────┬──────────────────┬────────────┬────────────┬──────────────┐".to_string(),
            "│ ID                   │ Type                 │ Name             │ Date       │ Amount     │ Status       │".to_string(),
            "├──────────────────────┼──────────────────────┼──────────────────┼────────────┼────────────┼──────────────┤".to_string(),
        ];
        for b in &self.bills {
            lines.push(format!(
                "│ {:<20} │ {:<20} │ {:<16} │ {:<10} │ {:>10} │ {:<12} │",
                clip(&b.id, 20),
                clip(&b.expense_type, 20),
                clip(&b.name, 16),
                clip(&b.date, 10),
                format_amount(b.amount),
                clip(&b.status, 12),
            ));
        }
        lines.push(
            "└──────────────────────┴──────────────────────┴──────────────────┴────────────┴────────────┴──────────────┘".to_string(),
        );
        lines.push(format!("{} bill(s)", self.count));
        lines
    }
}

impl TableDisplay for ReceiptOutput {
    fn table_lines(&self) -> Vec<String> {
        let dash = "—";
        vec![
            format!("Bill     : {}", self.bill_id),
            format!("File     : {}", self.file_name.as_deref().unwrap_or(dash)),
            format!("Receipt  : {}", self.file_url.as_deref().unwrap_or(dash)),
        ]
    }
}

impl TableDisplay for SessionOutput {
    fn table_lines(&self) -> Vec<String> {
        if !self.connected {
            return vec!["Not connected. Run: billed session set --email <email>".to_string()];
        }
        let dash = "—";
        vec![
            format!("Type     : {}", self.user_type.as_deref().unwrap_or(dash)),
            format!("Email    : {}", self.email.as_deref().unwrap_or(dash)),
            format!("Token    : {}", if self.has_token { "yes" } else { "no" }),
        ]
    }
}

impl TableDisplay for ConfigOutput {
    fn table_lines(&self) -> Vec<String> {
        vec![
            format!("Root     : {}", self.root),
            format!("API URL  : {}", self.api_url),
            format!("Timeout  : {}s", self.timeout_secs),
            format!("Locale   : {}", self.locale),
            format!("Verbose  : {}", self.verbose),
        ]
    }
}

/// Truncate on a char boundary.
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
