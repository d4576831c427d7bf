//! Bill records: as received from the store, and as displayed.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{StoreError, TransportErrorKind};

// ─── Status ─────────────────────────────────────────────────────────

/// Review status of a bill. Transitions happen server-side only:
/// `pending → accepted` or `pending → refused`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    /// Parse a raw store status code. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(BillStatus::Pending),
            "accepted" => Some(BillStatus::Accepted),
            "refused" => Some(BillStatus::Refused),
            _ => None,
        }
    }

    /// Display label shown in the bills table.
    pub fn label(self) -> &'static str {
        match self {
            BillStatus::Pending => "En attente",
            BillStatus::Accepted => "Accepté",
            BillStatus::Refused => "Refusé",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, BillStatus::Pending)
    }

    /// Whether the store may move a bill from `self` to `next`.
    pub fn can_transition_to(self, next: BillStatus) -> bool {
        self == BillStatus::Pending && next.is_terminal()
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillStatus::Pending => write!(f, "pending"),
            BillStatus::Accepted => write!(f, "accepted"),
            BillStatus::Refused => write!(f, "refused"),
        }
    }
}

// ─── Raw bill ───────────────────────────────────────────────────────

/// A bill as received from the store.
///
/// Only `id` is required. Every other field decodes leniently: a missing
/// or mistyped value falls back to empty/`None` instead of failing the
/// whole fetch. Date and status are validated later, by the formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBill {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub file_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub commentary: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub comment_admin: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub expense_type: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub vat: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub pct: Option<f64>,
}

impl RawBill {
    /// Minimal record, used by fixtures and tests.
    pub fn new(id: impl Into<String>, date: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            status: status.into(),
            amount: None,
            name: String::new(),
            file_url: None,
            file_name: None,
            commentary: None,
            comment_admin: None,
            email: String::new(),
            expense_type: String::new(),
            vat: None,
            pct: None,
        }
    }

    /// Build the display form, given the already-formatted date and status.
    pub fn into_display(self, date: String, status: String) -> DisplayBill {
        DisplayBill {
            id: self.id,
            raw_date: self.date,
            date,
            raw_status: self.status,
            status,
            amount: self.amount,
            name: self.name,
            file_url: self.file_url,
            file_name: self.file_name,
            commentary: self.commentary,
            comment_admin: self.comment_admin,
            email: self.email,
            expense_type: self.expense_type,
            vat: self.vat,
            pct: self.pct,
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient_opt_string(d)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

// ─── Display bill ───────────────────────────────────────────────────

/// A bill ready for rendering. `date` and `status` are always printable;
/// the raw values are kept for ordering and markup attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayBill {
    pub id: String,
    pub raw_date: String,
    pub date: String,
    pub raw_status: String,
    pub status: String,
    pub amount: Option<f64>,
    pub name: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub commentary: Option<String>,
    pub comment_admin: Option<String>,
    pub email: String,
    #[serde(rename = "type")]
    pub expense_type: String,
    pub vat: Option<String>,
    pub pct: Option<f64>,
}

impl DisplayBill {
    /// Receipt URL, treating an empty attribute as absent.
    pub fn receipt_url(&self) -> Option<&str> {
        self.file_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

// ─── Fetch outcome ──────────────────────────────────────────────────

/// Result of one page activation, consumed by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(Vec<DisplayBill>),
    Failure {
        kind: TransportErrorKind,
        message: String,
    },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }
}

impl From<Result<Vec<DisplayBill>, StoreError>> for FetchOutcome {
    fn from(result: Result<Vec<DisplayBill>, StoreError>) -> Self {
        match result {
            Ok(bills) => FetchOutcome::Success(bills),
            Err(e) => FetchOutcome::Failure {
                kind: e.kind(),
                message: e.message().to_string(),
            },
        }
    }
}
