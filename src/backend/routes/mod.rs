//! Route Configuration Module
//!
//! ```text
//! routes/
//! ├── mod.rs         - Module exports and documentation
//! ├── router.rs      - Main router creation
//! └── api_routes.rs  - Authenticated /api/v1 routes
//! ```

pub mod api_routes;
pub mod router;

pub use router::create_router;
