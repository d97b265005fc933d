// Magnifier sampling for Step "hover": grabs a square neighborhood of source
// pixels around the focus point and block-replicates it into the view buffer.
// Visual: the little preview box shows a chunky, zoomed-in patch of the image
// centered on the pixel under the mouse.

use crate::error::Error;
use crate::types::FrameBuffer;

/// Top-byte coverage flag for magnifier view pixels. Samples that landed on a
/// real source pixel carry it; pixels left from the per-tick clear do not, so
/// the compositor can show the window edge through uncovered regions.
pub const COVERED: u32 = 0xFF00_0000;

/// Fixed magnifier geometry. Validated once at startup; ticks never re-check.
#[derive(Clone, Copy, Debug)]
pub struct MagnifierConfig {
    pub view_size: usize, // edge length of the square view, in pixels
    pub zoom: usize,      // integer magnification factor
    pub cell_size: usize, // edge length of one grid cell, in pixels
}

impl Default for MagnifierConfig {
    fn default() -> Self {
        Self { view_size: 100, zoom: 2, cell_size: 10 }
    }
}

impl MagnifierConfig {
    /// Reject broken geometry loudly at setup time. A tick with a bad config
    /// would render garbage, so none of these are recoverable later.
    pub fn validate(self) -> Result<Self, Error> {
        if self.view_size == 0 {
            return Err(Error::BadConfig("view size must be positive".into()));
        }
        if self.zoom == 0 {
            return Err(Error::BadConfig("zoom must be positive".into()));
        }
        if self.cell_size == 0 || self.view_size % self.cell_size != 0 {
            return Err(Error::BadConfig(format!(
                "cell size {} must evenly divide view size {}",
                self.cell_size, self.view_size
            )));
        }
        // The center cell's representative sample must be the focus pixel
        // itself, which needs the cell boundary to land on the view midpoint.
        if (self.view_size / 2) % self.cell_size != 0 {
            return Err(Error::BadConfig(format!(
                "cell size {} does not align a cell with the view midpoint {}",
                self.cell_size,
                self.view_size / 2
            )));
        }
        Ok(self)
    }

    /// Number of grid cells along one edge of the view.
    pub fn cells_per_side(&self) -> usize {
        self.view_size / self.cell_size
    }
}

/// Fill `view` with the magnified neighborhood around `focus`.
///
/// The source-space window is `view_size / zoom` wide and centered on the
/// focus pixel; each zoom×zoom output block copies exactly one source pixel
/// (straight block replication, never interpolation). Parts of the window
/// that fall outside the source stay at the cleared transparent value, so a
/// focus near an image edge shows a partially empty magnifier instead of
/// failing.
pub fn sample(source: &FrameBuffer, focus: (i32, i32), cfg: &MagnifierConfig, view: &mut FrameBuffer) {
    debug_assert_eq!(view.width, cfg.view_size);
    debug_assert_eq!(view.height, cfg.view_size);

    // Full clear first: nothing from the previous focus point may survive.
    view.clear();

    let m = cfg.view_size as i32;
    let z = cfg.zoom as i32;
    let start_x = focus.0 - m / (2 * z);
    let start_y = focus.1 - m / (2 * z);

    for oy in 0..m {
        let sy = start_y + oy / z;
        let row = (oy as usize) * view.width;
        for ox in 0..m {
            let sx = start_x + ox / z;
            if let Some(px) = source.pixel(sx, sy) {
                view.pixels[row + ox as usize] = COVERED | (px & 0x00FF_FFFF);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pack_rgb;

    // Source where every pixel value encodes its own coordinate, so any
    // blending or misaligned copy shows up as a wrong value.
    fn coded_source(w: usize, h: usize) -> FrameBuffer {
        let mut fb = FrameBuffer::new(w, h);
        for y in 0..h {
            for x in 0..w {
                fb.pixels[y * w + x] = pack_rgb(x as u8, y as u8, 0x55);
            }
        }
        fb
    }

    #[test]
    fn test_config_defaults_validate() {
        assert!(MagnifierConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_rejects_bad_geometry() {
        let bad = |f: fn(&mut MagnifierConfig)| {
            let mut cfg = MagnifierConfig::default();
            f(&mut cfg);
            cfg.validate()
        };
        assert!(bad(|c| c.view_size = 0).is_err());
        assert!(bad(|c| c.zoom = 0).is_err());
        assert!(bad(|c| c.cell_size = 0).is_err());
        assert!(bad(|c| c.cell_size = 7).is_err()); // does not divide 100
        // Divides the view but not the midpoint: 100 % 4 == 0, 50 % 4 != 0
        assert!(bad(|c| c.cell_size = 4).is_err());
    }

    #[test]
    fn test_block_replication_no_blending() {
        let src = coded_source(200, 200);
        let cfg = MagnifierConfig::default().validate().unwrap();
        let mut view = FrameBuffer::new(cfg.view_size, cfg.view_size);
        sample(&src, (100, 100), &cfg, &mut view);

        // Every 2x2 output block holds one identical source pixel.
        for oy in (0..cfg.view_size).step_by(cfg.zoom) {
            for ox in (0..cfg.view_size).step_by(cfg.zoom) {
                let base = view.pixels[oy * cfg.view_size + ox];
                for dy in 0..cfg.zoom {
                    for dx in 0..cfg.zoom {
                        assert_eq!(view.pixels[(oy + dy) * cfg.view_size + ox + dx], base);
                    }
                }
            }
        }
    }

    #[test]
    fn test_center_pixel_is_focus_pixel() {
        let src = coded_source(200, 200);
        let cfg = MagnifierConfig::default().validate().unwrap();
        let mut view = FrameBuffer::new(cfg.view_size, cfg.view_size);
        let focus = (123, 45);
        sample(&src, focus, &cfg, &mut view);

        let mid = cfg.view_size / 2;
        let center = view.pixels[mid * cfg.view_size + mid];
        let expected = src.pixel(focus.0, focus.1).unwrap();
        assert_eq!(center & 0x00FF_FFFF, expected);
        assert_ne!(center & COVERED, 0);
    }

    #[test]
    fn test_edge_focus_leaves_uncovered_pixels_transparent() {
        let src = coded_source(10, 10);
        let cfg = MagnifierConfig::default().validate().unwrap();
        let mut view = FrameBuffer::new(cfg.view_size, cfg.view_size);
        // Window around (0,0) reaches 25 pixels into negative space.
        sample(&src, (0, 0), &cfg, &mut view);

        // Top-left of the view maps to source (-25,-25): uncovered.
        assert_eq!(view.pixels[0], 0);
        // The view center still carries source (0,0).
        let mid = cfg.view_size / 2;
        assert_eq!(view.pixels[mid * cfg.view_size + mid], COVERED | src.pixels[0]);
    }

    #[test]
    fn test_view_fully_cleared_between_ticks() {
        let src = coded_source(200, 200);
        let cfg = MagnifierConfig::default().validate().unwrap();
        let mut view = FrameBuffer::new(cfg.view_size, cfg.view_size);

        // First tick covers everything, second tick near the corner must not
        // keep any pixel from the first.
        sample(&src, (100, 100), &cfg, &mut view);
        sample(&src, (0, 0), &cfg, &mut view);
        assert_eq!(view.pixels[0], 0);

        let full = coded_source(200, 200);
        let mut fresh = FrameBuffer::new(cfg.view_size, cfg.view_size);
        sample(&full, (0, 0), &cfg, &mut fresh);
        assert_eq!(view.pixels, fresh.pixels);
    }
}
