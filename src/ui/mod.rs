//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: terminal lifecycle and the event loop that turns key
//!   presses and stream messages into app actions.
//! - [`renderer`]: frame layout for the transcript pane and input box.
//! - [`transcript_view`]: transcript to pre-wrapped display lines.
//!
//! This layer presents and captures interaction state; [`crate::core`] owns
//! the transcript and streaming.

pub mod chat_loop;
pub mod renderer;
pub mod transcript_view;
