//! Bills container: fetch, format, order, and the two user intents of the
//! employee bills page (open the new-bill form, preview a receipt).
//!
//! The container holds no cache: every call to [`Bills::get_bills`] goes back
//! to the store. Store failures propagate to the caller untouched; the page
//! glue decides how to render them.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, info, warn};

use billed_common::constants::routes_path;
use billed_common::error::StoreResult;
use billed_common::traits::{Navigator, ReceiptModal, Store};
use billed_common::types::{DisplayBill, RawBill};
use billed_types::config::DateLocale;
use billed_types::session::UserSession;
use billed_utils::format::{format_date_with, format_status, parse_bill_date};

use crate::error::{BilledError, BilledResult};
use crate::view;

/// A user intent on the bills page, produced by the UI adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillsCommand {
    OpenNewBillForm,
    PreviewReceipt(String),
}

/// The "preview receipt" trigger of one rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptIcon {
    pub bill_id: String,
    pub bill_url: Option<String>,
}

impl ReceiptIcon {
    pub fn for_bill(bill: &DisplayBill) -> Self {
        Self {
            bill_id: bill.id.clone(),
            bill_url: bill.receipt_url().map(str::to_string),
        }
    }
}

/// The Bills container.
pub struct Bills {
    navigator: Arc<dyn Navigator>,
    modal: Arc<dyn ReceiptModal>,
    store: Option<Arc<dyn Store>>,
    session: Option<UserSession>,
    /// Used instead of the store when none is connected.
    local_bills: Vec<RawBill>,
    locale: DateLocale,
}

impl Bills {
    pub fn new(
        navigator: Arc<dyn Navigator>,
        modal: Arc<dyn ReceiptModal>,
        store: Option<Arc<dyn Store>>,
        session: Option<UserSession>,
    ) -> Self {
        Self {
            navigator,
            modal,
            store,
            session,
            local_bills: Vec::new(),
            locale: DateLocale::default(),
        }
    }

    /// Bills served when no store is connected (offline/demo mode).
    pub fn with_local_bills(mut self, bills: Vec<RawBill>) -> Self {
        self.local_bills = bills;
        self
    }

    pub fn with_locale(mut self, locale: DateLocale) -> Self {
        self.locale = locale;
        self
    }

    pub fn session(&self) -> Option<&UserSession> {
        self.session.as_ref()
    }

    /// Fetch the bills and return them ready for display, most recent first.
    pub async fn get_bills(&self) -> StoreResult<Vec<DisplayBill>> {
        let raw = match &self.store {
            Some(store) => store.bills().list().await.inspect_err(|e| {
                warn!(kind = %e.kind(), error = %e, "failed to fetch bills");
            })?,
            None => {
                debug!(count = self.local_bills.len(), "no store connected, using local bills");
                self.local_bills.clone()
            }
        };

        let bills = format_bills(raw, self.locale);
        info!(count = bills.len(), "fetched bills");
        Ok(bills)
    }

    /// Navigate to the new-bill form.
    pub fn handle_click_new_bill(&self) {
        info!("opening new bill form");
        self.navigator.navigate(routes_path::NEW_BILL);
    }

    /// Load the icon's receipt into the modal and open it. A missing URL
    /// still opens the modal, just without an image.
    pub fn handle_click_icon_eye(&self, icon: &ReceiptIcon) {
        let img_width = self.modal.width() / 2;
        let body = view::receipt_body(icon.bill_url.as_deref(), img_width);
        self.modal.set_body(body.into_string());
        self.modal.show();
        debug!(bill_id = %icon.bill_id, has_receipt = icon.bill_url.is_some(), "opened receipt modal");
    }

    /// Dispatch a UI intent against the bills of the current render pass.
    pub fn handle(&self, command: &BillsCommand, rendered: &[DisplayBill]) -> BilledResult<()> {
        match command {
            BillsCommand::OpenNewBillForm => {
                self.handle_click_new_bill();
                Ok(())
            }
            BillsCommand::PreviewReceipt(bill_id) => {
                let bill = rendered.iter().find(|b| &b.id == bill_id).ok_or_else(|| {
                    warn!(bill_id = %bill_id, "receipt preview for a bill not on the page");
                    BilledError::BillNotFound(bill_id.clone())
                })?;
                self.handle_click_icon_eye(&ReceiptIcon::for_bill(bill));
                Ok(())
            }
        }
    }
}

/// Format every record and order them most-recent-first by their raw date.
///
/// The sort is stable. Records whose date cannot be parsed keep their raw
/// date, go after every dated record, and stay in fetch order.
pub fn format_bills(raw: Vec<RawBill>, locale: DateLocale) -> Vec<DisplayBill> {
    let mut keyed: Vec<_> = raw
        .into_iter()
        .map(|bill| (parse_bill_date(&bill.date), bill))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    keyed
        .into_iter()
        .map(|(_, bill)| format_bill(bill, locale))
        .collect()
}

/// Format one record. Never fails.
pub fn format_bill(bill: RawBill, locale: DateLocale) -> DisplayBill {
    let date = format_date_with(&bill.date, locale);
    let status = format_status(&bill.status);
    bill.into_display(date, status)
}
