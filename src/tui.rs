//! Terminal front-end built on ratatui.
//!
//! The TUI owns no game rules. It turns key presses into [`app::InputAction`]s,
//! drives the engine and resolves question requests against the local bank.

pub mod app;
pub mod controller;
pub mod ui;
