//! `stocksim-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no threading, no IO).

pub mod error;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use value_object::ValueObject;
