//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::types::{PieceKind, SessionState};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const PLAYFIELD_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

/// A lightweight terminal view of one session.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
    show_ghost: bool,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

/// Where the playfield landed on screen.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
            show_ghost: true,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn with_ghost(mut self, show_ghost: bool) -> Self {
        self.show_ghost = show_ghost;
        self
    }

    /// Render the snapshot into an existing framebuffer, resizing it to the
    /// viewport. Reusing one framebuffer across frames avoids reallocating.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Style::new(Rgb::new(220, 220, 220), SCREEN_BG).glyph(' '));

        let frame = self.frame(snap, viewport);

        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            frame.w - 2,
            frame.h - 2,
            ' ',
            Style::new(Rgb::new(80, 80, 90), PLAYFIELD_BG),
        );
        fb.draw_box(
            frame.x,
            frame.y,
            frame.w,
            frame.h,
            Style::new(Rgb::new(200, 200, 200), SCREEN_BG),
        );

        let empty = Style::new(Rgb::new(90, 90, 100), PLAYFIELD_BG).dim();
        for y in 0..snap.height as i32 {
            for x in 0..snap.width as i32 {
                match snap.cell(x, y).and_then(PieceKind::from_cell_value) {
                    Some(kind) => self.draw_piece_cell(fb, frame, snap, x, y, kind),
                    None => self.fill_cell(fb, frame, snap, x, y, '·', empty),
                }
            }
        }

        if let Some(active) = &snap.active {
            if self.show_ghost {
                if let Some(offset) = snap.ghost_offset().filter(|&o| o > 0) {
                    let ghost = Style::new(Rgb::new(140, 140, 140), PLAYFIELD_BG).dim();
                    for &(x, y) in &active.cells {
                        self.fill_cell(fb, frame, snap, x, y + offset, '░', ghost);
                    }
                }
            }
            for &(x, y) in &active.cells {
                self.draw_piece_cell(fb, frame, snap, x, y, active.kind);
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        match snap.session {
            SessionState::Paused => self.draw_overlay(fb, frame, &["PAUSED", "p to resume"]),
            SessionState::GameOver => self.draw_overlay(fb, frame, &["GAME OVER", "r to restart"]),
            SessionState::Running => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn frame(&self, snap: &GameSnapshot, viewport: Viewport) -> Frame {
        let w = snap.width.saturating_mul(self.cell_w).saturating_add(2);
        let h = snap.height.saturating_mul(self.cell_h).saturating_add(2);
        let x = viewport.width.saturating_sub(w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h) / 2,
            AnchorY::Top => 0,
        };
        Frame { x, y, w, h }
    }

    fn draw_piece_cell(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        snap: &GameSnapshot,
        x: i32,
        y: i32,
        kind: PieceKind,
    ) {
        let style = Style::new(piece_color(kind), PLAYFIELD_BG).bold();
        self.fill_cell(fb, frame, snap, x, y, '█', style);
    }

    /// Fill board cell `(x, y)`; cells off the board (e.g. above row 0) are skipped.
    #[allow(clippy::too_many_arguments)]
    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        snap: &GameSnapshot,
        x: i32,
        y: i32,
        ch: char,
        style: Style,
    ) {
        if x < 0 || y < 0 || x >= snap.width as i32 || y >= snap.height as i32 {
            return;
        }
        let px = frame.x + 1 + x as u16 * self.cell_w;
        let py = frame.y + 1 + y as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = Style::default().bold();
        let value = Style::new(Rgb::new(200, 200, 200), SCREEN_BG);

        let mut y = frame.y;
        for (name, v) in [
            ("SCORE", snap.score),
            ("LINES", snap.lines as u64),
            ("SPEED", snap.drop_interval_ms as u64),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u64(panel_x, y + 1, v, value);
            y = y.saturating_add(3);
        }
        // SPEED is the gravity interval.
        fb.put_str(panel_x.saturating_add(5), y.saturating_sub(2), "ms", value.dim());

        fb.put_str(panel_x, y, "NEXT", label);
        for kind in &snap.preview {
            y = y.saturating_add(1);
            if y >= viewport.height {
                break;
            }
            let mut buf = [0u8; 4];
            let letter = kind.as_char().encode_utf8(&mut buf);
            fb.put_str(panel_x, y, letter, Style::new(piece_color(*kind), SCREEN_BG).bold());
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, frame: Frame, lines: &[&str]) {
        let style = Style::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        let top = frame.y + frame.h / 2;
        for (i, text) in lines.iter().enumerate() {
            let text_w = text.chars().count() as u16;
            let x = frame.x + frame.w.saturating_sub(text_w) / 2;
            let line_style = if i == 0 { style } else { Style { bold: false, ..style } };
            fb.put_str(x, top.saturating_add(i as u16), text, line_style);
        }
    }
}

pub fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    }
}
