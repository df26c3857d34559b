//! Mosaic: Azul rules engine and terminal table
//!
//! This crate re-exports the engine crate and adds what the `mosaic` binary
//! needs on top of it: terminal rendering, prompt commands and config files.

pub mod command;
pub mod display;
pub mod settings;

pub use mosaic_engine::*;
