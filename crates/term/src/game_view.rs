//! BoardView: maps the playfield and effect state into a terminal framebuffer.
//!
//! Pure (no I/O), so it can be unit-tested. Board row 0 is the bottom of the
//! playfield and is drawn last; the camera roll shifts the whole frame sideways.

use crate::core::{EffectState, Grid};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{ControlCommand, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

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

/// State of the link to the gesture relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Disabled,
    Live,
    Lost,
}

impl LinkStatus {
    fn label(&self) -> &'static str {
        match self {
            LinkStatus::Disabled => "OFF",
            LinkStatus::Live => "LIVE",
            LinkStatus::Lost => "LOST",
        }
    }
}

/// Side panel contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudStatus {
    pub link: LinkStatus,
    pub input: ControlCommand,
    pub pieces_locked: u32,
    pub pieces_destroyed: u32,
    pub lines_cleared: u32,
    pub games_over: u32,
}

const FIELD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
/// Degrees of camera roll per column of sideways shift
const ROLL_PER_COLUMN: f32 = 5.0;

pub struct BoardView {
    /// Terminal columns per board cell
    cell_w: u16,
}

impl Default for BoardView {
    fn default() -> Self {
        // 2 columns per cell roughly squares up terminal glyphs
        Self { cell_w: 2 }
    }
}

impl BoardView {
    pub fn new(cell_w: u16) -> Self {
        Self { cell_w: cell_w.max(1) }
    }

    pub fn render_into(
        &self,
        grid: &Grid,
        effects: &EffectState,
        status: &HudStatus,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.fill(Cell::default());

        let field_w = BOARD_WIDTH as u16 * self.cell_w;
        let field_h = BOARD_HEIGHT as u16;
        let frame_w = field_w + 2;
        let frame_h = field_h + 2;

        let shift = (effects.lean().roll() / ROLL_PER_COLUMN).round() as i32;
        let centred = (viewport.width.saturating_sub(frame_w) / 2) as i32;
        let start_x = (centred + shift).clamp(0, i32::from(u16::MAX)) as u16;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        self.draw_border(fb, start_x, start_y, frame_w, frame_h);

        for y in 0..BOARD_HEIGHT {
            for x in 0..BOARD_WIDTH {
                let tile = grid.get(x, y).flatten();
                let (ch, style) = match tile {
                    Some(kind) => ('█', CellStyle::new(piece_color(kind), FIELD_BG).bold()),
                    None => ('·', CellStyle::new(Rgb::new(90, 90, 100), FIELD_BG)),
                };
                self.fill_cell(fb, start_x, start_y, x, y, ch, style);
            }
        }

        let burst = CellStyle::new(Rgb::new(255, 240, 160), FIELD_BG).bold();
        for b in effects.bursts() {
            let (x, y) = (b.world.0.floor() as i32, b.world.1.floor() as i32);
            if (0..BOARD_WIDTH).contains(&x) && (0..BOARD_HEIGHT).contains(&y) {
                self.fill_cell(fb, start_x, start_y, x, y, '*', burst);
            }
        }

        self.draw_panel(fb, effects, status, start_x + frame_w + 2, start_y);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        grid: &Grid,
        effects: &EffectState,
        status: &HudStatus,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(grid, effects, status, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
        let style = CellStyle::default();
        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);
        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    /// Board (x, y) with y up, to terminal cells inside the border
    #[allow(clippy::too_many_arguments)]
    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        x: i32,
        y: i32,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x + 1 + x as u16 * self.cell_w;
        let py = start_y + 1 + (BOARD_HEIGHT - 1 - y) as u16;
        fb.fill_rect(px, py, self.cell_w, 1, ch, style);
    }

    fn draw_panel(
        &self,
        fb: &mut FrameBuffer,
        effects: &EffectState,
        status: &HudStatus,
        x: u16,
        y: u16,
    ) {
        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let rows: [(&str, String); 7] = [
            ("SENSOR", status.link.label().to_string()),
            ("INPUT", status.input.as_str().unwrap_or("?").to_string()),
            ("ROLL", format!("{:+.1}", effects.lean().roll())),
            ("LOCKED", status.pieces_locked.to_string()),
            ("SHAKEN", status.pieces_destroyed.to_string()),
            ("LINES", status.lines_cleared.to_string()),
            ("RESETS", status.games_over.to_string()),
        ];

        for (i, (name, text)) in rows.iter().enumerate() {
            let row = y + (i as u16) * 3;
            fb.put_str(x, row, name, label);
            fb.put_str(x, row + 1, text, value);
        }
    }
}

fn piece_color(kind: PieceKind) -> Rgb {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Presentation;
    use crate::types::VisualCue;

    fn status() -> HudStatus {
        HudStatus {
            link: LinkStatus::Live,
            input: ControlCommand::Neutral,
            pieces_locked: 0,
            pieces_destroyed: 0,
            lines_cleared: 0,
            games_over: 0,
        }
    }

    fn find(fb: &FrameBuffer, ch: char) -> Vec<(u16, u16)> {
        let mut found = Vec::new();
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                if fb.get(x, y).map(|c| c.ch) == Some(ch) {
                    found.push((x, y));
                }
            }
        }
        found
    }

    #[test]
    fn bottom_row_is_drawn_last() {
        let mut grid = Grid::new(1);
        grid.set_tile(0, 0, Some(PieceKind::T));
        let fb = BoardView::default().render(&grid, &EffectState::new(), &status(), Viewport::new(60, 24));

        // 60 wide, 22-wide frame: start_x 19; 24 tall, 22-tall frame: start_y 1
        assert_eq!(find(&fb, '█'), vec![(20, 21), (21, 21)]);
        assert_eq!(fb.get(19, 1).unwrap().ch, '┌');
    }

    #[test]
    fn bursts_and_roll_are_visible() {
        let grid = Grid::new(1);
        let mut fx = EffectState::new();
        fx.spawn_burst((0.5, 19.5));
        fx.trigger_cue(VisualCue::LeanRight);
        fx.update(std::time::Duration::from_secs(1));

        let fb = BoardView::default().render(&grid, &fx, &status(), Viewport::new(60, 24));
        // Fully rolled to +10 degrees shifts the frame two columns right
        assert_eq!(fb.get(21, 1).unwrap().ch, '┌');
        assert!(find(&fb, '*').is_empty(), "burst expired after one second");
    }

    #[test]
    fn live_burst_marks_its_cell() {
        let grid = Grid::new(1);
        let mut fx = EffectState::new();
        fx.spawn_burst((0.5, 19.5));

        let fb = BoardView::default().render(&grid, &fx, &status(), Viewport::new(60, 24));
        assert_eq!(find(&fb, '*'), vec![(20, 2), (21, 2)]);
    }

    #[test]
    fn panel_reports_shakes_and_resets() {
        let grid = Grid::new(1);
        let hud = HudStatus {
            pieces_destroyed: 3,
            games_over: 2,
            ..status()
        };
        let fb = BoardView::default().render(&grid, &EffectState::new(), &hud, Viewport::new(60, 24));

        // Panel starts two columns right of the 22-wide frame
        let text = |x: u16, y: u16, len: u16| -> String {
            (x..x + len).filter_map(|x| fb.get(x, y)).map(|c| c.ch).collect()
        };
        assert_eq!(text(43, 13, 6), "SHAKEN");
        assert_eq!(text(43, 14, 1), "3");
        assert_eq!(text(43, 19, 6), "RESETS");
        assert_eq!(text(43, 20, 1), "2");
    }
}
