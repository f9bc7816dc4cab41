//! Kanban - Main Library
//!
//! Workspaces hold an ordered list of boards and boards hold an ordered list
//! of cards. Positions under every parent are a dense 1-based ranking, and the
//! parent records the highest one in `last_position`. Only the positioning
//! engine writes either value.
//!
//! # Module Structure
//!
//! - **`shared`** - ordering primitives, error types and API data model
//! - **`positioning`** - reindex planner, store interface, engine, and an
//!   in-memory store
//! - **`backend`** - Axum server over PostgreSQL (only compiled with the
//!   `ssr` feature)
//!
//! # Feature Flags
//!
//! - **`ssr`** - enables the `backend` module and the `kanban-server` binary
//!
//! ```rust,no_run
//! # #[cfg(feature = "ssr")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use kanban::backend::server::{create_app, ServerConfig};
//!
//! let app = create_app(ServerConfig::from_env()?).await;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Dense ordering of boards and cards
pub mod positioning;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
