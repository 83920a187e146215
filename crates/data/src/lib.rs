//! Catalog loading and configuration for the card stack.

pub mod catalog;
pub mod load;
pub mod schema;

pub use catalog::*;
pub use load::*;
pub use schema::*;
