//! Backend Module
//!
//! Axum HTTP server for the kanban API. Only compiled with the `ssr` feature.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs         - Module exports and documentation
//! ├── server/        - Configuration, state and startup
//! ├── routes/        - Router assembly
//! ├── middleware/    - Bearer token verification
//! ├── auth/          - Sessions, user lookups, authorization
//! ├── error/         - BackendError and its JSON response
//! ├── positions/     - PostgreSQL PositionStore
//! ├── workspaces/    - Workspaces and members
//! ├── boards/        - Boards
//! ├── cards/         - Cards and assignees
//! ├── lists/         - Card checklists
//! ├── subtasks/      - Checklist items
//! └── users/         - Profile edits and user search
//! ```
//!
//! Handlers authorize first, then either call the positioning engine (for
//! anything that changes a position) or their module's `db` functions.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and authorization
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// PostgreSQL position store
pub mod positions;

pub mod workspaces;
pub mod boards;
pub mod cards;
pub mod lists;
pub mod subtasks;
pub mod users;

pub use error::BackendError;
pub use server::create_app;
