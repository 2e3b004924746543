// Library surface for the binary, headless tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod catalog;
pub mod celebration;
pub mod clips;
pub mod config;
pub mod engine;
pub mod error;
pub mod prefs;
pub mod runtime;
pub mod session;
pub mod share;
pub mod ui;

pub use engine::{Effect, SessionEngine};
pub use error::GameError;
pub use session::{SessionState, Status};
