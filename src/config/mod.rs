//! Configuration for cardsmith runs
//!
//! Provides types and parsing for `cardsmith.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
