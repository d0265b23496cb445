//! Daytalk Engine library.
//!
//! This crate contains all server-side code for the Daytalk day loop and NPC
//! dialogue engine.
//!
//! ## Structure
//!
//! - `use_cases/` - Time loop, places, game session and dialogue orchestration
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
