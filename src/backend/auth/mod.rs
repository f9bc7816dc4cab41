//! Authentication and Authorization
//!
//! Verifies bearer tokens, looks up users, and decides what an authenticated
//! user may do with workspaces, boards, cards, lists and subtasks.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs       - Module exports and documentation
//! ├── sessions.rs  - JWT verification
//! ├── users.rs     - User lookups
//! └── access.rs    - Authorization collaborator
//! ```
//!
//! Tokens are issued elsewhere. This server only checks the signature and
//! expiry against `JWT_SECRET`.

/// JWT verification
pub mod sessions;

/// User lookups
pub mod users;

/// Authorization rules and the Postgres-backed authorizer
pub mod access;

pub use access::{AccessError, Action, Authorizer, PgAuthorizer, Resource};
pub use sessions::{get_user_id_from_token, verify_token, Claims};
