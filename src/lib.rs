//! ShadowCoder is a terminal chat client for Google's Gemini models.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript, the busy flag, configuration, and the
//!   streaming client that talks to the provider.
//! - [`ui`] renders the terminal interface and runs the interactive event loop.
//! - [`cli`] parses arguments and dispatches to the chat UI, the one-shot
//!   `say` command, or config editing.
//! - [`api`] defines the request and response payloads sent over the wire.
//!
//! The binary (`src/main.rs`) only calls [`cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
