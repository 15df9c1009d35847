//! Core types and trait definitions for the travels service.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! holds the entity registry, the [`store::TravelStore`] abstraction, and the
//! pure filtering and aggregation logic used by the derived endpoints.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod filter;
pub mod store;

pub use error::{Error, Result};
