//! Server Module
//!
//! Configuration, application state and startup.
//!
//! ```text
//! server/
//! ├── mod.rs     - Module exports and documentation
//! ├── config.rs  - Environment configuration and database loading
//! ├── state.rs   - AppState and FromRef implementations
//! └── init.rs    - App creation
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{ConfigError, ServerConfig};
pub use init::create_app;
pub use state::AppState;
