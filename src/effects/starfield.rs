use super::Effect;
use crate::canvas::Canvas;
use crate::config::{Config, DisplayConfig};
use crate::draw::{DrawCommand, Surface};
use crate::error::Result;
use crate::field::ParticleField;
use crate::palette::Palette;
use crate::scheduler::FrameScheduler;
use crate::terminal::{FrameEncoder, Overlay};
use crate::theme::{ThemeFlag, ThemeSource};
use crate::trail::CursorTrail;
use crate::typewriter::Typewriter;
use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEvent, MouseEventKind};
use std::io::Write;
use std::time::Duration;

const CURSOR_BLINK: Duration = Duration::from_millis(530);
const CAPTION_DARK: (u8, u8, u8) = (224, 231, 255);
const CAPTION_LIGHT: (u8, u8, u8) = (76, 29, 149);

#[derive(Debug, Default, Clone, Copy)]
pub struct SessionStats {
    pub frames: u64,
    pub resizes: u32,
    pub theme_toggles: u32,
}

pub struct StarfieldEffect {
    cols: usize,
    rows: usize,
    field: ParticleField,
    scheduler: FrameScheduler,
    canvas: Canvas,
    encoder: FrameEncoder,
    trail: CursorTrail,
    caption: Option<Typewriter>,
    blink: Duration,
    theme: ThemeFlag,
    display: DisplayConfig,
    trail_buf: Vec<DrawCommand>,
    stats: SessionStats,
}

impl Effect for StarfieldEffect {
    fn new(cols: usize, rows: usize, config: &Config, theme: ThemeFlag) -> Result<Self> {
        let display = config.display.clone();
        let grain_seed = match config.field.seed {
            Some(seed) => seed as u32,
            None => fastrand::u32(..),
        };
        let canvas = Canvas::new(
            cols,
            rows * 2,
            display.pixel_scale,
            display.nebula_grain,
            grain_seed,
        );

        let mut scheduler = FrameScheduler::new(display.fps);
        let mut field = ParticleField::new(config.field.clone(), theme.clone());
        let (width, height) = canvas.size();
        field.start(width, height, &mut scheduler)?;

        let caption = (display.show_caption && !display.captions.is_empty()).then(|| {
            Typewriter::new(
                display.captions.as_slice(),
                Duration::from_millis(display.typing_ms),
                Duration::from_millis(display.deleting_ms),
                Duration::from_millis(display.pause_ms),
            )
        });

        Ok(Self {
            cols,
            rows,
            field,
            scheduler,
            canvas,
            encoder: FrameEncoder::with_capacity(cols, rows),
            trail: CursorTrail::new(config.field.trail_length, config.field.trail_drop_frames),
            caption,
            blink: Duration::ZERO,
            theme,
            display,
            trail_buf: Vec::new(),
            stats: SessionStats::default(),
        })
    }

    fn update(&mut self, elapsed: Duration) -> bool {
        self.scheduler.advance(elapsed);
        let mut stepped = false;
        while let Some(request) = self.scheduler.take_due() {
            if self.field.on_frame(request, &mut self.scheduler) {
                self.trail.tick();
                self.stats.frames += 1;
                stepped = true;
            }
        }

        if let Some(caption) = &mut self.caption {
            caption.advance(elapsed);
        }
        self.blink += elapsed;
        if self.blink >= CURSOR_BLINK * 2 {
            self.blink -= CURSOR_BLINK * 2;
        }
        stepped
    }

    fn render<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        let dark = self.theme.is_dark();
        self.canvas.set_background(if dark {
            self.display.dark_background
        } else {
            self.display.light_background
        });
        self.canvas.draw_all(self.field.commands());

        self.trail_buf.clear();
        self.trail.draw(&Palette::for_theme(dark), &mut self.trail_buf);
        self.canvas.draw_all(&self.trail_buf);

        let text = self.caption_text();
        let overlay = text.as_deref().map(|text| Overlay {
            row: self.rows.saturating_sub(3),
            text,
            color: if dark { CAPTION_DARK } else { CAPTION_LIGHT },
        });

        self.encoder.encode(&self.canvas, overlay.as_ref())?;
        self.encoder.present(out)
    }

    fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.canvas.resize(cols, rows * 2);
        let (width, height) = self.canvas.size();
        self.field.resize(width, height);
        self.trail.clear();
        self.stats.resizes += 1;
    }

    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Moved | MouseEventKind::Drag(_),
                column,
                row,
                ..
            }) => {
                let (x, y) = self.cell_center(*column, *row);
                self.field.pointer_moved(x, y);
                self.trail.push(x, y);
            }
            // Terminals report no mouse-leave; losing focus is the nearest signal
            Event::FocusLost => {
                self.field.pointer_left();
                self.trail.clear();
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let KeyCode::Char('t') | KeyCode::Char('T') = key.code {
                    self.theme.toggle();
                    self.stats.theme_toggles += 1;
                }
            }
            _ => {}
        }
    }

    fn stop(&mut self) {
        self.field.stop(&mut self.scheduler);
    }

    fn summary(&self) -> Option<String> {
        Some(format!(
            "{} frames, {} resizes, {} theme toggles, {} stars on a {}x{} grid",
            self.stats.frames,
            self.stats.resizes,
            self.stats.theme_toggles,
            self.field.stars().len(),
            self.cols,
            self.rows,
        ))
    }
}

impl StarfieldEffect {
    /// Logical coordinates of the middle of a terminal cell.
    fn cell_center(&self, column: u16, row: u16) -> (f32, f32) {
        let scale = self.canvas.scale();
        (
            (column as f32 + 0.5) * scale,
            (row as f32 * 2.0 + 1.0) * scale,
        )
    }

    fn caption_text(&self) -> Option<String> {
        let caption = self.caption.as_ref()?;
        if self.rows < 4 {
            return None;
        }
        let cursor = if self.blink < CURSOR_BLINK { '|' } else { ' ' };
        Some(format!("{}{}", caption.text(), cursor))
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }
}
