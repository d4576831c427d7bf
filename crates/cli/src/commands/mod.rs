pub mod bills;
pub mod config;
pub mod session;

use std::sync::Arc;

use anyhow::Result;
use billed_core::{fixtures, BilledError, HttpStore, Router, RouterOptions, Screen};

/// Wire a router the way every bills-facing command needs it.
///
/// `offline` skips the store entirely and serves the demo bills; otherwise
/// a stored session is required.
pub fn build_router(offline: bool) -> Result<Router> {
    let config = billed_core::workspace::load_config()?;
    let session = billed_core::workspace::load_session()?;

    let options = if offline {
        RouterOptions {
            store: None,
            session,
            locale: config.display.locale,
            local_bills: fixtures::bills(),
        }
    } else {
        // The API only answers connected users.
        if session.is_none() {
            return Err(BilledError::NoSession.into());
        }
        let store = HttpStore::from_config(&config, session.as_ref())?;
        RouterOptions {
            store: Some(Arc::new(store)),
            session,
            locale: config.display.locale,
            local_bills: Vec::new(),
        }
    };

    Ok(Router::new(Arc::new(Screen::new()), options))
}

/// Print the screen as a full HTML document.
pub fn print_document(router: &Router) {
    let body = maud::PreEscaped(router.screen().html());
    println!("{}", billed_core::view::document(body).into_string());
}
