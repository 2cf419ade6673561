//! BLEComm Protocol - Core Module
//!
//! Always-compiled foundation shared by every layer:
//!
//! - [`constants`]: wire constants and configuration defaults
//! - [`error`]: error types for the codec, reassembly, and configuration
//! - [`traits`]: the [`Transport`] collaborator seam

pub mod constants;
pub mod error;
pub mod traits;

pub use error::{ConfigError, FrameError, ReassemblyError};
pub use traits::Transport;
