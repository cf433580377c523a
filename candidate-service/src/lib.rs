//! HTTP service exposing upsert and lookup of candidates stored in a
//! MongoDB-API document collection.
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
