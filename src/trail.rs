//! Fading dots left behind by the pointer.

use crate::constants::TRAIL_DOT_RADIUS;
use crate::draw::{DrawCommand, Point};
use crate::palette::{Palette, Rgba};
use std::collections::VecDeque;

pub struct CursorTrail {
    points: VecDeque<Point>, // Oldest first
    capacity: usize,
    drop_every: u32,
    frames_since_drop: u32,
}

impl CursorTrail {
    pub fn new(capacity: usize, drop_every: u32) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
            drop_every: drop_every.max(1),
            frames_since_drop: 0,
        }
    }

    pub fn push(&mut self, x: f32, y: f32) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(Point::new(x, y));
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.frames_since_drop = 0;
    }

    /// Called once per frame; sheds the oldest point on a fixed cadence.
    pub fn tick(&mut self) {
        self.frames_since_drop += 1;
        if self.frames_since_drop >= self.drop_every {
            self.frames_since_drop = 0;
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn draw(&self, palette: &Palette, out: &mut Vec<DrawCommand>) {
        // Newest point is brightest
        for (rank, point) in self.points.iter().rev().enumerate() {
            let alpha = 0.5 - rank as f32 * 0.03;
            if alpha <= 0.0 {
                break;
            }
            out.push(DrawCommand::FillCircle {
                center: *point,
                radius: TRAIL_DOT_RADIUS,
                color: Rgba::new(palette.nebula_primary, alpha),
            });
        }
    }
}
