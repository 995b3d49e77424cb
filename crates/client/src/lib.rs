//! Classroom Client - session gating and API access for the classroom portal.
//!
//! # Architecture
//!
//! - [`session`] - local session state: the [`SessionStore`] seam, token
//!   claim decoding, and the [`SessionGate`] that answers "may this viewer be
//!   here, and if not, where should they go?"
//! - [`routing`] - pages and guard decisions
//! - [`api`] - `reqwest` client for the classroom REST backend
//! - [`portal`] - view-controllers that guard a page, call the API and turn
//!   failures into user-facing messages
//! - [`config`] - environment-driven configuration
//!
//! # Security
//!
//! The role used for routing is read from the token payload without
//! verifying its signature. It only decides which views are offered. The
//! backend re-checks authorization on every request.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod portal;
pub mod routing;
pub mod session;

pub use api::{ApiError, ClassroomClient};
pub use config::{ClientConfig, ConfigError};
pub use portal::{Flash, FlashKind, Navigation, Portal, ViewError};
pub use routing::{Decision, Page};
pub use session::{FileStore, MemoryStore, SessionGate, SessionStore, StoreError};
