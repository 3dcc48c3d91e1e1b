//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep the CLI decoupled from storage and parsing details.

pub mod outline_service;
