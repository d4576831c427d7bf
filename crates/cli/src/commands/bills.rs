use anyhow::Result;
use billed_common::constants::routes_path;
use billed_common::error::StoreError;
use billed_common::types::FetchOutcome;
use billed_core::{BilledError, BillsCommand, Router};
use billed_types::output::{BillsOutput, ReceiptOutput};
use billed_utils::output::{render, OutputFormat};

use super::{build_router, print_document};

/// Error panel outcome as a command failure.
fn fetch_failure(router: &Router) -> Option<BilledError> {
    match router.last_page()?.outcome() {
        FetchOutcome::Success(_) => None,
        FetchOutcome::Failure { message, .. } => {
            Some(BilledError::Store(StoreError::new(message.clone())))
        }
    }
}

/// `billed bills`: fetch, format and print the bills page.
pub async fn list(offline: bool, fmt: OutputFormat) -> Result<()> {
    let router = build_router(offline)?;
    router.activate(routes_path::BILLS).await;

    if fmt == OutputFormat::Html {
        // The error panel is a valid page.
        print_document(&router);
        return Ok(());
    }

    if let Some(err) = fetch_failure(&router) {
        return Err(err.into());
    }

    let bills = router
        .last_page()
        .map(|page| page.bills().to_vec())
        .unwrap_or_default();
    render(fmt, &BillsOutput::new(bills))
}

/// `billed new-bill`: what a click on the new-bill button leads to.
pub async fn new_bill(fmt: OutputFormat) -> Result<()> {
    let router = build_router(true)?;
    router.dispatch(&BillsCommand::OpenNewBillForm)?;

    match fmt {
        OutputFormat::Html => print_document(&router),
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let route = router.active();
            let out = serde_json::json!({ "ok": true, "route": route.path() });
            if fmt == OutputFormat::Json {
                println!("{out}");
            } else {
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
        }
        OutputFormat::Table => {
            println!("{}", billed_common::constants::NEW_BILL_TITLE);
            println!("  route: {}", router.active().path());
        }
    }
    Ok(())
}

/// `billed preview <id>`: open the receipt modal of one bill.
pub async fn preview(id: &str, offline: bool, fmt: OutputFormat) -> Result<()> {
    let router = build_router(offline)?;
    router.activate(routes_path::BILLS).await;

    if let Some(err) = fetch_failure(&router) {
        return Err(err.into());
    }

    router.dispatch(&BillsCommand::PreviewReceipt(id.to_string()))?;

    if fmt == OutputFormat::Html {
        println!("{}", router.screen().modal_body());
        return Ok(());
    }

    let bill = router
        .last_page()
        .and_then(|page| page.bills().iter().find(|b| b.id == id).cloned())
        .ok_or_else(|| BilledError::BillNotFound(id.to_string()))?;

    let out = ReceiptOutput {
        bill_id: bill.id.clone(),
        file_name: bill.file_name.clone(),
        file_url: bill.receipt_url().map(str::to_string),
    };
    render(fmt, &out)
}
