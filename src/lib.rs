pub mod annotation;
pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod export;
pub mod feedback;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod overlay;
pub mod session;
pub mod state;
pub mod storage;
pub use controller::{ActivationMessage, SessionController};
pub use error::{AppError, AppResult};
