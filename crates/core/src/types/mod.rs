//! Core types for the classroom portal.
//!
//! This module provides type-safe wrappers for the domain concepts the
//! client deals with.

pub mod assignment;
pub mod id;
pub mod role;
pub mod session;
pub mod submission;
pub mod timestamp;

pub use assignment::{Assignment, NewAssignment};
pub use id::*;
pub use role::{ParseRoleError, Role};
pub use session::{AccessToken, Session};
pub use submission::Submission;
