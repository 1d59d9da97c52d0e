//! Record store abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the whole-collection persistence contract.
//! - Isolate SQLite and JSON encoding details from service orchestration.
//!
//! # Invariants
//! - Every write replaces the full stored collection.
//! - Store failures are returned, never swallowed.

pub mod application_store;
