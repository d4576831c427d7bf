//! Universal constants for Billed.

/// Logical page paths (URL fragments) understood by the router.
pub mod routes_path {
    pub const LOGIN: &str = "";
    pub const BILLS: &str = "#employee/bills";
    pub const NEW_BILL: &str = "#employee/bill/new";
}

/// Fixed `data-testid` identifiers emitted by the view renderer.
pub mod test_ids {
    pub const BTN_NEW_BILL: &str = "btn-new-bill";
    pub const ICON_EYE: &str = "icon-eye";
    pub const MODAL_FILE: &str = "modaleFile";
    pub const ICON_WINDOW: &str = "icon-window";
    pub const ICON_MAIL: &str = "icon-mail";
    pub const ERROR_MESSAGE: &str = "error-message";
    pub const TBODY: &str = "tbody";
    pub const FORM_NEW_BILL: &str = "form-new-bill";
}

/// Header shown at the top of the new-bill form.
pub const NEW_BILL_TITLE: &str = "Envoyer une note de frais";

/// Header shown at the top of the bills list.
pub const BILLS_TITLE: &str = "Mes notes de frais";

/// Remote store resource path for the bill collection.
pub const BILLS_RESOURCE: &str = "bills";

/// Default store endpoint (local Billed API).
pub const DEFAULT_API_URL: &str = "http://localhost:5678";
