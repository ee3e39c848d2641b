//! Session and role context.
//!
//! This module provides:
//! - `login`: demo credential check producing a placeholder token
//! - `Session`: the current user, mirrored to a single `session.json` file
//! - `Role`: capability checks used to gate edits, creates and deletes
//!
//! None of this is security. Tokens are not signed and never expire.

pub mod credentials;
pub mod session;

pub use credentials::{login, AuthError};
pub use session::{Role, Session, SessionData};
