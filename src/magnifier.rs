// Grid rendering for the magnified view, plus the per-tick engine driver.
// Visual: the magnifier becomes a mosaic of flat cells with thin gray
// separators, the cell under the focus gets a black outline, and the hex
// value of that cell is reported for the HUD/commit.

use crate::error::Error;
use crate::sampler::{self, MagnifierConfig, COVERED};
use crate::types::{unpack_rgb, FrameBuffer};

/// One representative sample per grid cell, captured before any overdraw.
/// Lives only within a single render pass.
pub struct SampleGrid {
    pub cells_per_side: usize,
    pub samples: Vec<u32>, // 0xAARRGGBB, row-major, length = cells_per_side^2
}

impl SampleGrid {
    /// Representative sample of the cell at (col, row).
    pub fn sample(&self, col: usize, row: usize) -> u32 {
        self.samples[row * self.cells_per_side + col]
    }
}

// Separator stroke target: mid gray mixed 50/50 with whatever is underneath.
const GRID_GRAY: u32 = 0x0080_8080;
// Heavy border of the center cell.
const CENTER_STROKE: u32 = 0x0000_0000;

/// 50/50 per-channel mix of two packed colors, used for the low-opacity
/// separator strokes.
#[inline]
fn blend_half(a: u32, b: u32) -> u32 {
    let (ar, ag, ab) = unpack_rgb(a);
    let (br, bg, bb) = unpack_rgb(b);
    crate::types::pack_rgb(
        ((ar as u16 + br as u16) / 2) as u8,
        ((ag as u16 + bg as u16) / 2) as u8,
        ((ab as u16 + bb as u16) / 2) as u8,
    )
}

/// Draw a 1-pixel border just inside the square cell at (x0, y0).
fn stroke_cell(view: &mut FrameBuffer, x0: usize, y0: usize, edge: usize, color: u32, opaque: bool) {
    let w = view.width;
    let mut put = |x: usize, y: usize| {
        let idx = y * w + x;
        let px = if opaque {
            color & 0x00FF_FFFF
        } else {
            blend_half(view.pixels[idx], color)
        };
        view.pixels[idx] = COVERED | px;
    };
    for x in x0..x0 + edge {
        put(x, y0);
        put(x, y0 + edge - 1);
    }
    for y in y0..y0 + edge {
        put(x0, y);
        put(x0 + edge - 1, y);
    }
}

/// Index (per axis) of the cell nearest the view's geometric center.
fn center_cell_index(view_size: usize, cell_size: usize) -> usize {
    view_size / 2 / cell_size
}

/// Format an RGB triple as "#RRGGBB", uppercase and zero-padded.
pub fn hex_color(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Turn the freshly sampled view into the pixelated grid and report the
/// center cell color.
///
/// Each cell is flat-filled with its top-left sample (the representative),
/// taken from a snapshot so a neighbor's separator stroke can never bleed
/// into a later cell's representative. Cells whose representative is
/// uncovered stay transparent and unstroked; what shows there is whatever
/// the compositor puts behind the magnifier.
pub fn render_grid(view: &mut FrameBuffer, cell_size: usize) -> (SampleGrid, String) {
    debug_assert_eq!(view.width % cell_size, 0);
    let n = view.width / cell_size;

    // Snapshot pass: read all representatives before any pixel is written.
    let mut samples = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            samples.push(view.pixels[(row * cell_size) * view.width + col * cell_size]);
        }
    }
    let grid = SampleGrid { cells_per_side: n, samples };

    // Paint pass: flat fill + thin separator per covered cell.
    for row in 0..n {
        for col in 0..n {
            let rep = grid.sample(col, row);
            if rep & COVERED == 0 {
                continue;
            }
            let (x0, y0) = (col * cell_size, row * cell_size);
            for y in y0..y0 + cell_size {
                let line = y * view.width;
                for x in x0..x0 + cell_size {
                    view.pixels[line + x] = rep;
                }
            }
            stroke_cell(view, x0, y0, cell_size, GRID_GRAY, false);
        }
    }

    // Center cell gets the heavy high-contrast border.
    let ci = center_cell_index(view.width, cell_size);
    stroke_cell(view, ci * cell_size, ci * cell_size, cell_size, CENTER_STROKE, true);

    let (r, g, b) = unpack_rgb(grid.sample(ci, ci));
    let center_color = hex_color(r, g, b);
    (grid, center_color)
}

/// The magnifier engine: owns the view buffer, runs Sampler → grid renderer
/// on each pointer-move tick, and hands back the center color.
pub struct Magnifier {
    cfg: MagnifierConfig,
    view: FrameBuffer,
}

impl Magnifier {
    /// Configuration errors surface here, before the first tick.
    pub fn new(cfg: MagnifierConfig) -> Result<Self, Error> {
        let cfg = cfg.validate()?;
        Ok(Self { view: FrameBuffer::new(cfg.view_size, cfg.view_size), cfg })
    }

    pub fn config(&self) -> &MagnifierConfig {
        &self.cfg
    }

    /// The rendered view for the most recent tick, for compositing.
    pub fn view(&self) -> &FrameBuffer {
        &self.view
    }

    /// One full tick: clear + sample the neighborhood around `focus`, render
    /// the grid, return the center cell color. Runs to completion before the
    /// caller can start another tick, so samples never interleave.
    pub fn tick(&mut self, source: &FrameBuffer, focus: (i32, i32)) -> String {
        sampler::sample(source, focus, &self.cfg, &mut self.view);
        let (_grid, color) = render_grid(&mut self.view, self.cfg.cell_size);
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pack_rgb;

    fn solid_source(w: usize, h: usize, px: u32) -> FrameBuffer {
        let mut fb = FrameBuffer::new(w, h);
        fb.pixels.fill(px);
        fb
    }

    fn coded_source(w: usize, h: usize) -> FrameBuffer {
        let mut fb = FrameBuffer::new(w, h);
        for y in 0..h {
            for x in 0..w {
                fb.pixels[y * w + x] = pack_rgb(x as u8, y as u8, 0xAA);
            }
        }
        fb
    }

    #[test]
    fn test_hex_formatting_zero_padded_uppercase() {
        assert_eq!(hex_color(255, 0, 0), "#FF0000");
        assert_eq!(hex_color(1, 15, 255), "#010FFF");
        assert_eq!(hex_color(0, 0, 0), "#000000");
        assert_eq!(hex_color(0x1A, 0x2B, 0x3C), "#1A2B3C");
    }

    #[test]
    fn test_cell_count_matches_geometry() {
        let cfg = MagnifierConfig::default().validate().unwrap();
        let mut view = FrameBuffer::new(cfg.view_size, cfg.view_size);
        let (grid, _) = render_grid(&mut view, cfg.cell_size);
        let n = cfg.view_size / cfg.cell_size;
        assert_eq!(grid.cells_per_side, n);
        assert_eq!(grid.samples.len(), n * n);
        assert_eq!(grid.cells_per_side, cfg.cells_per_side());
    }

    #[test]
    fn test_representatives_are_cell_top_left_samples() {
        let cfg = MagnifierConfig::default().validate().unwrap();
        let mut view = FrameBuffer::new(cfg.view_size, cfg.view_size);
        // Give every view pixel a unique value, then check each cell's
        // representative is exactly the pre-overdraw top-left pixel,
        // uniformly spaced by cell_size.
        for (i, px) in view.pixels.iter_mut().enumerate() {
            *px = COVERED | (i as u32 & 0x00FF_FFFF);
        }
        let snapshot = view.pixels.clone();
        let (grid, _) = render_grid(&mut view, cfg.cell_size);
        for row in 0..grid.cells_per_side {
            for col in 0..grid.cells_per_side {
                let idx = (row * cfg.cell_size) * cfg.view_size + col * cfg.cell_size;
                assert_eq!(grid.sample(col, row), snapshot[idx]);
            }
        }
    }

    #[test]
    fn test_all_red_source_reports_red_center() {
        // 10x10 pure red, focus (5,5): the one-color case.
        let src = solid_source(10, 10, pack_rgb(255, 0, 0));
        let mut mag = Magnifier::new(MagnifierConfig::default()).unwrap();
        assert_eq!(mag.tick(&src, (5, 5)), "#FF0000");
    }

    #[test]
    fn test_center_color_is_exact_focus_pixel() {
        // No averaging: with a source of all-distinct pixels, the reported
        // color is exactly the pixel under the focus.
        let src = coded_source(200, 200);
        let mut mag = Magnifier::new(MagnifierConfig::default()).unwrap();
        let focus = (137, 42);
        let (r, g, b) = unpack_rgb(src.pixel(focus.0, focus.1).unwrap());
        assert_eq!(mag.tick(&src, focus), hex_color(r, g, b));
    }

    #[test]
    fn test_corner_focus_still_reports_defined_color() {
        // Focus (0,0) on 10x10: the window reaches negative coordinates.
        // Must not fail and must report the in-bounds pixel.
        let src = coded_source(10, 10);
        let mut mag = Magnifier::new(MagnifierConfig::default()).unwrap();
        let (r, g, b) = unpack_rgb(src.pixels[0]);
        assert_eq!(mag.tick(&src, (0, 0)), hex_color(r, g, b));
    }

    #[test]
    fn test_focus_move_changes_samples_not_geometry() {
        let src = coded_source(200, 200);
        let mut mag = Magnifier::new(MagnifierConfig::default()).unwrap();
        let a = mag.tick(&src, (100, 100));
        let size_a = (mag.view().width, mag.view().height);
        let b = mag.tick(&src, (101, 100));
        let size_b = (mag.view().width, mag.view().height);
        assert_eq!(size_a, size_b);
        assert_ne!(a, b); // coded source: adjacent pixels differ
    }

    #[test]
    fn test_uncovered_cells_stay_transparent() {
        let src = coded_source(10, 10);
        let mut mag = Magnifier::new(MagnifierConfig::default()).unwrap();
        mag.tick(&src, (0, 0));
        // Top-left cell's representative maps outside the source; the whole
        // cell remains at the cleared value.
        let cell = mag.config().cell_size;
        for y in 0..cell {
            for x in 0..cell {
                assert_eq!(mag.view().pixels[y * mag.config().view_size + x], 0);
            }
        }
    }

    #[test]
    fn test_bad_config_rejected_at_construction() {
        let cfg = MagnifierConfig { view_size: 100, zoom: 0, cell_size: 10 };
        assert!(Magnifier::new(cfg).is_err());
    }
}
