//! Classroom Core - Shared types library.
//!
//! This crate provides the types shared across the classroom portal components:
//! - `client` - Session gate, REST client and view-controllers
//! - `cli` - The `classroom` command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. Assignment and submission payloads are passed through to the
//! caller exactly as the backend returned them.
//!
//! # Modules
//!
//! - [`types`] - Roles, sessions, access tokens, typed IDs and API payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
