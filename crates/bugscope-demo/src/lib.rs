#![forbid(unsafe_code)]

//! BugScope terminal front end.
//!
//! Drives a [`bugscope_core::Session`] against the wall clock and paints it
//! with crossterm, or prints its events line by line in headless mode.

pub mod app;
pub mod cli;
pub mod headless;
pub mod interactive;
pub mod logging;
pub mod render;
pub mod terminal;
