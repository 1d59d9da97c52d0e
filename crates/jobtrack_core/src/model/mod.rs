//! Domain model for tracked job applications.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep validation rules next to the data they protect.
//!
//! # Invariants
//! - Every application is identified by a stable `ApplicationId`.
//! - Deletion removes the record; there are no tombstones.

pub mod application;
