//! Card stack engine: image selection and round control. Keep this crate
//! free of IO and platform concerns.

pub mod carousel;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod entity;
pub mod events;
pub mod rng;
pub mod selector;
pub mod used;

pub use carousel::*;
pub use catalog::*;
pub use config::*;
pub use controller::*;
pub use entity::*;
pub use events::*;
pub use rng::*;
pub use selector::*;
pub use used::*;
