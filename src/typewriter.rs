//! Rotating caption that types itself out, holds, then backspaces.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing,
    Paused,
    Deleting,
}

pub struct Typewriter {
    texts: Vec<Vec<char>>,
    index: usize,
    shown: usize, // Characters of the current text on screen
    phase: Phase,
    elapsed: Duration,
    typing: Duration,
    deleting: Duration,
    pause: Duration,
}

impl Typewriter {
    pub fn new<S: AsRef<str>>(
        texts: &[S],
        typing: Duration,
        deleting: Duration,
        pause: Duration,
    ) -> Self {
        Self {
            texts: texts.iter().map(|t| t.as_ref().chars().collect()).collect(),
            index: 0,
            shown: 0,
            phase: Phase::Typing,
            elapsed: Duration::ZERO,
            typing,
            deleting,
            pause,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> String {
        match self.texts.get(self.index) {
            Some(text) => text[..self.shown].iter().collect(),
            None => String::new(),
        }
    }

    fn interval(&self) -> Duration {
        match self.phase {
            Phase::Typing => self.typing,
            Phase::Paused => self.pause,
            Phase::Deleting => self.deleting,
        }
    }

    /// Feeds wall-clock time; may take several steps if `dt` is long.
    pub fn advance(&mut self, dt: Duration) {
        if self.texts.is_empty() {
            return;
        }
        self.elapsed += dt;
        loop {
            // Zero intervals advance one step per call
            let interval = self.interval();
            if self.elapsed < interval {
                break;
            }
            self.elapsed -= interval;
            self.tick();
            if interval.is_zero() {
                break;
            }
        }
    }

    fn tick(&mut self) {
        let len = self.texts[self.index].len();
        match self.phase {
            Phase::Typing => {
                if self.shown < len {
                    self.shown += 1;
                }
                if self.shown == len {
                    self.phase = Phase::Paused;
                }
            }
            Phase::Paused => self.phase = Phase::Deleting,
            Phase::Deleting => {
                if self.shown > 0 {
                    self.shown -= 1;
                }
                if self.shown == 0 {
                    self.phase = Phase::Typing;
                    self.index = (self.index + 1) % self.texts.len();
                }
            }
        }
    }
}
