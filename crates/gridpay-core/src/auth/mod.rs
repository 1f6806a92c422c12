//! Authentication state.
//!
//! This module provides:
//! - `Session`: the authenticated account as returned by Grid
//! - `SessionSecrets`: per-login signing key, generated fresh on every login
//! - `SessionContext`: the pair of the two, owned by the caller's menu loop
//!
//! Nothing here is persisted; a session ends with the process.

pub mod secrets;
pub mod session;

pub use secrets::{SessionSecrets, SigningError};
pub use session::{Session, SessionContext};
