//! Terminal UI for Palaver
//!
//! A thin shell over the [`palaver_app`] state machines that provides
//! terminal-specific I/O: crossterm events in, ratatui frames out, and a
//! tokio event loop executing remote actions against a
//! [`ChatService`](palaver_core::ChatService).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod input;
pub mod runtime;
pub mod ui;

pub use input::{InputState, KeyInput};
pub use runtime::{Runtime, RuntimeError};
