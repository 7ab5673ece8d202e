//! Domain rules for the product catalog.
//!
//! No I/O lives here so the repository layer, the HTTP layer and any
//! future tooling can share the same validation.

pub mod error;
pub mod hashing;
pub mod product;
pub mod search;
pub mod types;
