use billed_common::constants::routes_path;
use billed_common::types::{DisplayBill, FetchOutcome};
use billed_core::{BillsCommand, BillsPage, Route, Router};

/// Which page the router last rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Bills,
    NewBill,
}

/// All data the TUI needs to render. Pages come from the router.
pub struct App {
    pub router: Router,
    pub view: View,
    pub show_help: bool,
    /// Index into the rendered rows.
    pub selected: usize,
    pub tick_count: u64,

    // ── Bills page ──────────────────────────────────────────────
    pub page: Option<BillsPage>,

    // ── Connection state ────────────────────────────────────────
    pub last_error: Option<String>,
    pub last_refresh: String,

    // ── Command feedback ────────────────────────────────────────
    pub status: Option<String>,
    pub status_tick: u64,
}

impl App {
    /// Create a new App and render the bills page once.
    pub async fn new(router: Router) -> Self {
        let mut app = Self {
            router,
            view: View::Bills,
            show_help: false,
            selected: 0,
            tick_count: 0,
            page: None,
            last_error: None,
            last_refresh: String::from("never"),
            status: None,
            status_tick: 0,
        };
        app.refresh().await;
        app
    }

    /// Activate the bills page again. Fetch errors land in the error panel.
    pub async fn refresh(&mut self) {
        self.router.activate(routes_path::BILLS).await;
        self.view = View::Bills;
        self.page = self.router.last_page();

        match self.page.as_ref().map(BillsPage::outcome) {
            Some(FetchOutcome::Failure { message, .. }) => {
                self.last_error = Some(message.clone());
            }
            _ => {
                self.last_error = None;
                self.last_refresh = chrono::Local::now().format("%H:%M:%S").to_string();
            }
        }

        let len = self.bills().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Rows of the current bills page, most recent first.
    pub fn bills(&self) -> &[DisplayBill] {
        self.page.as_ref().map(BillsPage::bills).unwrap_or_default()
    }

    pub fn selected_bill(&self) -> Option<&DisplayBill> {
        self.bills().get(self.selected)
    }

    pub fn modal_open(&self) -> bool {
        self.router.screen().modal_open()
    }

    /// Hand a page intent to the Bills container.
    pub fn run(&mut self, command: &BillsCommand) {
        if let Err(e) = self.router.dispatch(command) {
            self.set_status(e.to_string());
            return;
        }
        if self.router.active() == Route::NewBill {
            self.view = View::NewBill;
        }
    }

    /// Close the modal, or leave the new-bill form for a fresh bills page.
    pub async fn back(&mut self) {
        if self.modal_open() {
            self.router.screen().close_modal();
            return;
        }
        if self.view == View::NewBill {
            self.refresh().await;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        let len = self.bills().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    fn set_status(&mut self, msg: String) {
        self.status = Some(msg);
        self.status_tick = self.tick_count;
    }

    pub fn tick(&mut self) {
        self.tick_count += 1;
        // Clear command feedback after ~3 seconds (15 ticks at 200ms)
        if self.status.is_some() && self.tick_count.saturating_sub(self.status_tick) > 15 {
            self.status = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use billed_common::traits::Store;
    use billed_core::{fixtures, MemoryStore, RouterOptions, Screen};

    fn router(store: Option<MemoryStore>) -> Router {
        let local_bills = if store.is_none() { fixtures::bills() } else { Vec::new() };
        Router::new(
            Arc::new(Screen::new()),
            RouterOptions {
                store: store.map(|s| Arc::new(s) as Arc<dyn Store>),
                local_bills,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_new_app_renders_sorted_bills() {
        let app = App::new(router(None)).await;
        assert_eq!(app.view, View::Bills);
        let dates: Vec<_> = app.bills().iter().map(|b| b.raw_date.as_str()).collect();
        assert_eq!(dates, vec!["2004-04-04", "2003-03-03", "2002-02-02", "2001-01-01"]);
        assert!(app.last_error.is_none());
        assert_ne!(app.last_refresh, "never");
    }

    #[tokio::test]
    async fn test_store_failure_sets_error() {
        let app = App::new(router(Some(MemoryStore::failing("Erreur 500")))).await;
        assert_eq!(app.last_error.as_deref(), Some("Erreur 500"));
        assert!(app.bills().is_empty());
        assert!(app.selected_bill().is_none());
    }

    #[tokio::test]
    async fn test_selection_is_clamped() {
        let mut app = App::new(router(None)).await;
        app.select_prev();
        assert_eq!(app.selected, 0);
        for _ in 0..10 {
            app.select_next();
        }
        assert_eq!(app.selected, 3);
    }

    #[tokio::test]
    async fn test_preview_then_back_closes_modal() {
        let mut app = App::new(router(None)).await;
        let id = app.selected_bill().unwrap().id.clone();
        app.run(&BillsCommand::PreviewReceipt(id));
        assert!(app.modal_open());
        app.back().await;
        assert!(!app.modal_open());
        assert_eq!(app.view, View::Bills);
    }

    #[tokio::test]
    async fn test_new_bill_then_back_refetches() {
        let mut app = App::new(router(None)).await;
        app.run(&BillsCommand::OpenNewBillForm);
        assert_eq!(app.view, View::NewBill);
        app.back().await;
        assert_eq!(app.view, View::Bills);
        assert_eq!(app.bills().len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_bill_reports_status() {
        let mut app = App::new(router(None)).await;
        app.run(&BillsCommand::PreviewReceipt("missing".into()));
        assert!(!app.modal_open());
        assert!(app.status.is_some());
    }
}
