//! Structured output types for JSON/table rendering.
//!
//! Every data-producing command returns one of these types.
//! They all derive `Serialize` for JSON output, and implement
//! `TableDisplay` for human-readable table rendering.

use serde::Serialize;

use billed_common::types::DisplayBill;

// ─── Bills ──────────────────────────────────────────────────────────

/// Output of `billed bills`.
///
/// ```json
/// { "ok": true, "count": 4, "bills": [{ "id": "...", "date": "4 Avr. 04", ... }] }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct BillsOutput {
    pub ok: bool,
    pub count: usize,
    pub bills: Vec<DisplayBill>,
}

impl BillsOutput {
    pub fn new(bills: Vec<DisplayBill>) -> Self {
        Self {
            ok: true,
            count: bills.len(),
            bills,
        }
    }
}

// ─── Receipt ────────────────────────────────────────────────────────

/// Output of `billed preview <id>`.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptOutput {
    pub bill_id: String,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
}

// ─── Session ────────────────────────────────────────────────────────

/// Output of `billed session show`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutput {
    pub connected: bool,
    #[serde(rename = "type")]
    pub user_type: Option<String>,
    pub email: Option<String>,
    pub has_token: bool,
}

// ─── Config ─────────────────────────────────────────────────────────

/// Output of `billed config show`.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigOutput {
    pub root: String,
    pub api_url: String,
    pub timeout_secs: u64,
    pub locale: String,
    pub verbose: bool,
}
