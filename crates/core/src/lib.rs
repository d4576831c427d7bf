pub mod bills;
pub mod error;
pub mod fixtures;
pub mod router;
pub mod store;
pub mod view;
pub mod workspace;

pub use bills::{Bills, BillsCommand, ReceiptIcon};
pub use error::{BilledError, BilledResult};
pub use router::{BillsPage, Route, Router, RouterOptions, Screen};
pub use store::{HttpStore, MemoryStore};
pub use workspace::init_workspace;
