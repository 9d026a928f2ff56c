use crate::config::Config;
use crate::error::Result;
use crate::theme::ThemeFlag;
use crossterm::event::Event;
use std::io::Write;
use std::time::Duration;

pub mod starfield;

/// A full-screen animation driven by the terminal host loop.
pub trait Effect {
    /// `cols` x `rows` is the terminal size in cells.
    fn new(cols: usize, rows: usize, config: &Config, theme: ThemeFlag) -> Result<Self>
    where
        Self: Sized;
    /// Feeds elapsed wall-clock time; returns true if a new frame is ready.
    fn update(&mut self, elapsed: Duration) -> bool;
    fn render<W: Write>(&mut self, out: &mut W) -> std::io::Result<()>;
    fn resize(&mut self, cols: usize, rows: usize);
    fn handle_event(&mut self, _event: &Event) {}
    /// Stops the animation loop; called once before the terminal is released.
    fn stop(&mut self) {}
    fn summary(&self) -> Option<String> {
        None
    }
}
