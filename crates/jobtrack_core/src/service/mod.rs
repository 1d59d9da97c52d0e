//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, clock and notification sink into use-case APIs.
//! - Keep UI layers decoupled from storage details.

pub mod application_service;
