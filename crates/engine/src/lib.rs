//! Runtime for the Fernwood forest adventure game.
//!
//! This crate provides the pieces a front end needs to run the game: the
//! data-archive layer that mounts the packaged asset bundle under a virtual
//! `data/` folder, the savegame format, the game-logic state machine with
//! its per-section handlers, and the engine shell that ties them together.

pub mod archive;
pub mod config;
pub mod engine;
pub mod game;
pub mod savegame;

pub use config::EngineConfig;
pub use engine::Engine;
