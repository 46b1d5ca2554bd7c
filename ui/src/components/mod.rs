//! Shared presentational components for the embed screens.
pub mod pico;
pub mod status;
