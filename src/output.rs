//! Output rendering abstraction for superman.
//!
//! Defines the [`Renderer`] trait that decouples streamed text (model tokens
//! and command output lines) from the display. [`StdoutRenderer`] prints to
//! the terminal.

use colored::Colorize;
use std::io::{self, Write};

/// Sink for streamed text.
pub trait Renderer {
    /// Render a chunk of text as it arrives.
    fn render_token(&mut self, token: &str);

    /// Called when a streamed model response is complete.
    fn render_done(&mut self);

    /// Called when an error occurs during streaming.
    fn render_error(&mut self, err: &str);
}

/// Renders streamed output directly to stdout.
///
/// Each chunk is printed immediately with an explicit flush so the user
/// sees output as it arrives.
pub struct StdoutRenderer;

impl Renderer for StdoutRenderer {
    fn render_token(&mut self, token: &str) {
        print!("{}", token);
        io::stdout().flush().ok();
    }

    fn render_done(&mut self) {
        println!();
    }

    fn render_error(&mut self, err: &str) {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), err);
    }
}

/// Collects everything rendered, for tests.
#[cfg(test)]
#[derive(Default)]
pub struct BufferRenderer {
    buffer: String,
    pub errors: Vec<String>,
    pub done: bool,
}

#[cfg(test)]
impl BufferRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }
}

#[cfg(test)]
impl Renderer for BufferRenderer {
    fn render_token(&mut self, token: &str) {
        self.buffer.push_str(token);
    }

    fn render_done(&mut self) {
        self.done = true;
    }

    fn render_error(&mut self, err: &str) {
        self.errors.push(err.to_string());
    }
}
