//! Collaborator traits: the seams between the Bills container and the
//! outside world (remote store, router, modal).

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::RawBill;

/// The bill collection of a remote store.
#[async_trait]
pub trait BillsResource: Send + Sync {
    /// Fetch every bill visible to the current session, in store order.
    async fn list(&self) -> StoreResult<Vec<RawBill>>;
}

/// Data-access capability abstracting the remote API.
pub trait Store: Send + Sync {
    /// Access the bill collection.
    fn bills(&self) -> &dyn BillsResource;
}

/// Switches the rendered page to a logical path.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, path: &str) {
        self(path)
    }
}

/// The receipt preview modal.
pub trait ReceiptModal: Send + Sync {
    /// Current rendered width of the modal, in pixels.
    fn width(&self) -> u32;

    /// Replace the modal body markup.
    fn set_body(&self, markup: String);

    /// Open the modal.
    fn show(&self);
}
