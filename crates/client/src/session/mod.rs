//! Local session state.
//!
//! A session is three string fields kept in a [`SessionStore`]: the access
//! token, the role claimed by it, and the subject (username). The
//! [`SessionGate`] writes and clears them together and routes viewers based
//! on what it finds.

pub mod claims;
pub mod gate;
pub mod store;

pub use claims::{ClaimsError, TokenClaims};
pub use gate::{EstablishError, SessionGate};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};

/// Storage keys for the session fields.
pub mod keys {
    /// Key for the raw access token.
    pub const ACCESS_TOKEN: &str = "accessToken";

    /// Key for the role claimed by the token.
    pub const USER_ROLE: &str = "userRole";

    /// Key for the token subject, shown as the username.
    pub const USERNAME: &str = "username";

    /// Every session key, for clearing them together.
    pub const ALL: [&str; 3] = [ACCESS_TOKEN, USER_ROLE, USERNAME];
}
