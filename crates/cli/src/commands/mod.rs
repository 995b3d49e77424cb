//! Command implementations.
//!
//! - `auth` - signup, login, logout, whoami
//! - `teacher` - teacher dashboard actions
//! - `student` - student dashboard actions

pub mod auth;
pub mod student;
pub mod teacher;
