//! Clinica: bilingual content backend for a therapy clinic.
//!
//! The crate is layered the same way top to bottom: `domain` holds pure
//! types and invariants, `application` holds repository contracts and the
//! admin services that orchestrate them, `infra` holds the Postgres, storage
//! and HTTP adapters, and `config` holds the layered settings loader.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
