//! Domain models and JSON response shapes.
//!
//! All response types serialize with camelCase field names, matching the
//! frontend call contract.

pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use order::{LineItem, OrderDetailWithProduct, OrderWithDetails};
pub use product::{Product, ProductItem, ProductSearchResult};
pub use session::{CurrentUser, session_keys};
pub use user::User;
