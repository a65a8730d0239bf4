pub mod config;

pub mod client {
	pub mod http;
}

pub mod core {
	pub mod app;
	pub mod state;
	pub mod ui;
}

// Re-export for convenience
pub use crate::core::state::{GameState, MoveDirection, Session};
