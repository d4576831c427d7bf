//! Page activation glue: maps logical paths to rendered pages.
//!
//! The [`Screen`] is the document body: the only mutable state shared
//! between activations. A bills activation renders the loading panel, then
//! overwrites it with the list or the error panel once the fetch settles.
//! Concurrent activations are not cancelled; the last one to finish wins.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use billed_common::constants::routes_path;
use billed_common::traits::{Navigator, ReceiptModal, Store};
use billed_common::types::{DisplayBill, FetchOutcome, RawBill};
use billed_types::config::DateLocale;
use billed_types::session::UserSession;

use crate::bills::{Bills, BillsCommand, ReceiptIcon};
use crate::error::BilledResult;
use crate::view::{self, BillsView};

/// Width reported by the screen's modal, in pixels.
pub const MODAL_WIDTH: u32 = 800;

/// A logical page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Bills,
    NewBill,
}

impl Route {
    /// Resolve a path; unknown paths land on the login page.
    pub fn from_path(path: &str) -> Self {
        match path {
            routes_path::BILLS => Route::Bills,
            routes_path::NEW_BILL => Route::NewBill,
            _ => Route::Login,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => routes_path::LOGIN,
            Route::Bills => routes_path::BILLS,
            Route::NewBill => routes_path::NEW_BILL,
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ─── Screen ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
struct ModalState {
    body: String,
    open: bool,
}

/// The rendered document: page markup plus the receipt modal state.
#[derive(Debug, Default)]
pub struct Screen {
    body: Mutex<String>,
    modal: Mutex<ModalState>,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the page. Closes the modal.
    pub fn set(&self, markup: String) {
        *lock(&self.body) = markup;
        *lock(&self.modal) = ModalState::default();
    }

    pub fn html(&self) -> String {
        lock(&self.body).clone()
    }

    pub fn contains(&self, text: &str) -> bool {
        lock(&self.body).contains(text)
    }

    pub fn modal_open(&self) -> bool {
        lock(&self.modal).open
    }

    pub fn modal_body(&self) -> String {
        lock(&self.modal).body.clone()
    }

    pub fn close_modal(&self) {
        lock(&self.modal).open = false;
    }
}

impl ReceiptModal for Screen {
    fn width(&self) -> u32 {
        MODAL_WIDTH
    }

    fn set_body(&self, markup: String) {
        lock(&self.modal).body = markup;
    }

    fn show(&self) {
        lock(&self.modal).open = true;
    }
}

// ─── Bills page ─────────────────────────────────────────────────────

/// One render pass of the bills page.
#[derive(Debug, Clone)]
pub struct BillsPage {
    outcome: FetchOutcome,
    markup: String,
}

impl BillsPage {
    pub fn render(outcome: FetchOutcome, session: Option<&UserSession>) -> Self {
        let markup = match &outcome {
            FetchOutcome::Success(bills) => view::bills_ui(BillsView {
                bills,
                session,
                ..Default::default()
            }),
            FetchOutcome::Failure { message, .. } => view::bills_ui(BillsView {
                error: Some(message),
                session,
                ..Default::default()
            }),
        }
        .into_string();
        Self { outcome, markup }
    }

    pub fn outcome(&self) -> &FetchOutcome {
        &self.outcome
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Rows on the page; empty when the error panel is shown.
    pub fn bills(&self) -> &[DisplayBill] {
        match &self.outcome {
            FetchOutcome::Success(bills) => bills,
            FetchOutcome::Failure { .. } => &[],
        }
    }

    /// The receipt icon of one row.
    pub fn icon(&self, bill_id: &str) -> Option<ReceiptIcon> {
        self.bills()
            .iter()
            .find(|b| b.id == bill_id)
            .map(ReceiptIcon::for_bill)
    }
}

// ─── Router ─────────────────────────────────────────────────────────

/// What the router wires into each Bills container.
#[derive(Default)]
pub struct RouterOptions {
    pub store: Option<Arc<dyn Store>>,
    pub session: Option<UserSession>,
    pub locale: DateLocale,
    /// Served when `store` is `None`.
    pub local_bills: Vec<RawBill>,
}

struct RouterInner {
    screen: Arc<Screen>,
    options: RouterOptions,
    active: Mutex<Route>,
    last_page: Mutex<Option<BillsPage>>,
}

/// Renders pages into a [`Screen`]. Cheap to clone.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

impl Router {
    pub fn new(screen: Arc<Screen>, options: RouterOptions) -> Self {
        Self {
            inner: Arc::new(RouterInner {
                screen,
                options,
                active: Mutex::new(Route::Login),
                last_page: Mutex::new(None),
            }),
        }
    }

    pub fn screen(&self) -> &Arc<Screen> {
        &self.inner.screen
    }

    pub fn active(&self) -> Route {
        *lock(&self.inner.active)
    }

    /// The most recent bills render pass, if any.
    pub fn last_page(&self) -> Option<BillsPage> {
        lock(&self.inner.last_page).clone()
    }

    /// A Bills container wired to this router and its screen.
    pub fn bills_container(&self) -> Bills {
        let options = &self.inner.options;
        Bills::new(
            Arc::new(self.clone()),
            self.inner.screen.clone(),
            options.store.clone(),
            options.session.clone(),
        )
        .with_local_bills(options.local_bills.clone())
        .with_locale(options.locale)
    }

    /// Activate a page and wait until it is fully rendered.
    pub async fn activate(&self, path: &str) -> Route {
        let route = Route::from_path(path);
        info!(route = ?route, "navigating");

        match route {
            Route::Bills => {
                let page = self.render_bills().await;
                *lock(&self.inner.last_page) = Some(page);
            }
            Route::NewBill | Route::Login => self.render_static(route),
        }
        route
    }

    /// Write a page and record its route under one lock, so `active()`
    /// always names what the screen shows.
    fn show_page(&self, route: Route, markup: String) {
        let mut active = lock(&self.inner.active);
        *active = route;
        self.inner.screen.set(markup);
    }

    async fn render_bills(&self) -> BillsPage {
        let session = self.inner.options.session.as_ref();
        self.show_page(
            Route::Bills,
            view::bills_ui(BillsView {
                loading: true,
                session,
                ..Default::default()
            })
            .into_string(),
        );

        let outcome: FetchOutcome = self.bills_container().get_bills().await.into();
        if let FetchOutcome::Failure { kind, message } = &outcome {
            warn!(kind = %kind, error = %message, "rendering error panel");
        }
        let page = BillsPage::render(outcome, session);
        self.show_page(Route::Bills, page.markup().to_string());
        page
    }

    fn render_static(&self, route: Route) {
        let session = self.inner.options.session.as_ref();
        let markup = match route {
            Route::NewBill => view::new_bill_ui(session),
            Route::Login | Route::Bills => view::login_ui(),
        };
        self.show_page(route, markup.into_string());
    }

    /// Run a bills-page intent against the last render pass.
    pub fn dispatch(&self, command: &BillsCommand) -> BilledResult<()> {
        let page = self.last_page();
        let rendered = page.as_ref().map(BillsPage::bills).unwrap_or_default();
        self.bills_container().handle(command, rendered)
    }
}

impl Navigator for Router {
    /// Static pages render immediately; the bills page is fetched on the
    /// current tokio runtime in the background.
    fn navigate(&self, path: &str) {
        let route = Route::from_path(path);
        if route != Route::Bills {
            self.render_static(route);
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let router = self.clone();
                let path = path.to_string();
                handle.spawn(async move {
                    router.activate(&path).await;
                });
            }
            Err(_) => warn!(path = %path, "no async runtime, bills page not activated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use billed_common::constants::{test_ids, NEW_BILL_TITLE};
    use billed_common::error::StoreError;

    use crate::fixtures;
    use crate::store::MemoryStore;

    fn router(store: Option<Arc<dyn Store>>) -> Router {
        Router::new(
            Arc::new(Screen::new()),
            RouterOptions {
                store,
                session: Some(UserSession::employee("a@a")),
                ..Default::default()
            },
        )
    }

    /// Raw dates in the order their rows appear in the markup.
    fn rendered_raw_dates(html: &str) -> Vec<String> {
        html.split(r#"data-raw-date=""#)
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_route_from_path() {
        assert_eq!(Route::from_path("#employee/bills"), Route::Bills);
        assert_eq!(Route::from_path("#employee/bill/new"), Route::NewBill);
        assert_eq!(Route::from_path(""), Route::Login);
        assert_eq!(Route::from_path("#nowhere"), Route::Login);
        assert_eq!(Route::Bills.path(), routes_path::BILLS);
    }

    #[tokio::test]
    async fn test_bills_page_highlights_window_icon() {
        let router = router(Some(Arc::new(MemoryStore::with_bills(fixtures::bills()))));
        router.activate(routes_path::BILLS).await;
        let html = router.screen().html();
        assert!(html.contains(test_ids::ICON_WINDOW));
        assert!(html.contains("active-icon"));
        assert_eq!(router.active(), Route::Bills);
    }

    #[tokio::test]
    async fn test_bills_rendered_most_recent_first() {
        let router = router(Some(Arc::new(MemoryStore::with_bills(fixtures::bills()))));
        router.activate(routes_path::BILLS).await;
        assert_eq!(
            rendered_raw_dates(&router.screen().html()),
            vec!["2004-04-04", "2003-03-03", "2002-02-02", "2001-01-01"]
        );
    }

    #[tokio::test]
    async fn test_404_renders_error_panel() {
        let router = router(Some(Arc::new(MemoryStore::failing("Erreur 404"))));
        router.activate(routes_path::BILLS).await;
        let screen = router.screen();
        assert!(screen.contains("Erreur 404"));
        assert!(!screen.contains(test_ids::ICON_EYE));
        assert!(router.last_page().unwrap().bills().is_empty());
    }

    #[tokio::test]
    async fn test_500_renders_error_panel() {
        let router = router(Some(Arc::new(MemoryStore::failing("Erreur 500"))));
        router.activate(routes_path::BILLS).await;
        assert!(router.screen().contains("Erreur 500"));
        let page = router.last_page().unwrap();
        assert!(matches!(
            page.outcome(),
            FetchOutcome::Failure { kind, .. } if kind.status_code() == Some(500)
        ));
    }

    #[tokio::test]
    async fn test_new_bill_click_shows_form() {
        let screen = Arc::new(Screen::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let nav_screen = screen.clone();
        let nav_calls = calls.clone();
        let on_navigate = move |path: &str| {
            nav_calls.fetch_add(1, Ordering::SeqCst);
            let markup = match Route::from_path(path) {
                Route::NewBill => view::new_bill_ui(None),
                _ => view::login_ui(),
            };
            nav_screen.set(markup.into_string());
        };
        let bills = Bills::new(Arc::new(on_navigate), screen.clone(), None, None)
            .with_local_bills(fixtures::bills());
        let rendered = bills.get_bills().await.unwrap();
        screen.set(
            view::bills_ui(BillsView {
                bills: &rendered,
                ..Default::default()
            })
            .into_string(),
        );
        assert!(screen.contains(test_ids::BTN_NEW_BILL));

        bills.handle(&BillsCommand::OpenNewBillForm, &rendered).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(screen.contains(NEW_BILL_TITLE));
    }

    #[tokio::test]
    async fn test_dispatch_new_bill_through_router() {
        let router = router(None);
        router.activate(routes_path::BILLS).await;
        router.dispatch(&BillsCommand::OpenNewBillForm).unwrap();
        assert_eq!(router.active(), Route::NewBill);
        assert!(router.screen().contains(NEW_BILL_TITLE));
    }

    #[tokio::test]
    async fn test_preview_receipt_opens_modal() {
        let router = router(Some(Arc::new(MemoryStore::with_bills(fixtures::bills()))));
        router.activate(routes_path::BILLS).await;
        let page = router.last_page().unwrap();
        let first = &page.bills()[0];

        router
            .dispatch(&BillsCommand::PreviewReceipt(first.id.clone()))
            .unwrap();

        let screen = router.screen();
        assert!(screen.modal_open());
        assert!(screen.contains(r#"data-testid="modaleFile""#));
        assert!(screen.modal_body().contains(first.receipt_url().unwrap()));
        assert!(screen.modal_body().contains(r#"width="400""#));
    }

    #[tokio::test]
    async fn test_preview_before_any_render_fails() {
        let router = router(None);
        assert!(router
            .dispatch(&BillsCommand::PreviewReceipt("47qAXb6fIm2zOKkLzMro".into()))
            .is_err());
        assert!(!router.screen().modal_open());
    }

    #[tokio::test]
    async fn test_navigator_spawns_bills_activation() {
        let router = router(Some(Arc::new(MemoryStore::with_bills(fixtures::bills()))));
        router.navigate(routes_path::BILLS);
        for _ in 0..50 {
            if router.last_page().is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(router.last_page().unwrap().bills().len(), 4);
        assert!(router.screen().contains(test_ids::ICON_EYE));
    }

    /// Answers with the fixture bills after a delay.
    struct SlowStore {
        bills: SlowBills,
    }

    struct SlowBills;

    #[async_trait::async_trait]
    impl billed_common::traits::BillsResource for SlowBills {
        async fn list(&self) -> billed_common::error::StoreResult<Vec<RawBill>> {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            Ok(fixtures::bills())
        }
    }

    impl Store for SlowStore {
        fn bills(&self) -> &dyn billed_common::traits::BillsResource {
            &self.bills
        }
    }

    #[tokio::test]
    async fn test_late_fetch_keeps_active_route_in_step_with_screen() {
        let router = router(Some(Arc::new(SlowStore { bills: SlowBills })));
        router.navigate(routes_path::BILLS);
        // Let the spawned activation start its fetch.
        tokio::task::yield_now().await;

        router.navigate(routes_path::NEW_BILL);
        assert_eq!(router.active(), Route::NewBill);
        assert!(router.screen().contains(NEW_BILL_TITLE));

        for _ in 0..50 {
            if router.last_page().is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        // The late fetch won the screen, and the active route says so.
        assert!(router.screen().contains(test_ids::ICON_EYE));
        assert_eq!(router.active(), Route::Bills);
    }

    #[test]
    fn test_navigator_renders_static_pages_without_runtime() {
        let router = router(None);
        router.navigate(routes_path::NEW_BILL);
        assert!(router.screen().contains(NEW_BILL_TITLE));
        router.navigate("#unknown");
        assert_eq!(router.active(), Route::Login);
    }

    #[tokio::test]
    async fn test_every_activation_refetches() {
        let store = Arc::new(MemoryStore::with_bills(fixtures::bills()));
        let router = router(Some(store.clone()));
        router.activate(routes_path::BILLS).await;
        router.activate(routes_path::BILLS).await;
        assert_eq!(store.list_calls(), 2);
    }

    #[test]
    fn test_page_render_from_error() {
        let outcome: FetchOutcome = Err(StoreError::new("Erreur 404")).into();
        let page = BillsPage::render(outcome, None);
        assert!(page.markup().contains("Erreur 404"));
        assert!(page.icon("anything").is_none());
    }
}
