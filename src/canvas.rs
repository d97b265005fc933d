// The drawing-surface collaborator: decodes the source image and fits it onto
// the canvas area inside the window.
// Visual expectation: the picture fills the canvas, centered, keeping its
// aspect ratio; overflow on the longer axis is cropped.

use crate::error::Error;
use crate::types::{pack_rgb, FrameBuffer, Rect};
use tracing::info;

/// The canvas owns the only rendered copy of the source image. `surface` is
/// None until the image has finished loading; the picking core must no-op
/// until then. Once installed, the surface is never resized while a picking
/// session runs.
pub struct Canvas {
    surface: Option<FrameBuffer>,
    bounds: Rect,
}

impl Canvas {
    pub fn new(bounds: Rect) -> Self {
        Self { surface: None, bounds }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn surface(&self) -> Option<&FrameBuffer> {
        self.surface.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.surface.is_some()
    }

    /// Decode `path` and install it as the canvas surface.
    pub fn load_image(&mut self, path: &str) -> Result<(), Error> {
        let img = image::open(path).map_err(|e| Error::ImageLoad(format!("{path}: {e}")))?;
        let rgb = img.to_rgb8();
        let (w, h) = rgb.dimensions();

        // Repack RGB8 into the 0x00RRGGBB layout the window wants.
        let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
        for px in rgb.pixels() {
            pixels.push(pack_rgb(px[0], px[1], px[2]));
        }
        info!(path, width = w, height = h, "source image decoded");
        self.install(FrameBuffer { width: w as usize, height: h as usize, pixels });
        Ok(())
    }

    /// Fit an already-decoded source onto the canvas area. This is the
    /// "surface becomes valid" moment for the picking core.
    pub fn install(&mut self, source: FrameBuffer) {
        self.surface = Some(fit_to_frame(
            &source,
            self.bounds.width as usize,
            self.bounds.height as usize,
        ));
    }

    /// Translate a window-space pointer position into canvas pixel
    /// coordinates, clamped onto the surface. None while not ready.
    pub fn focus_at(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        let s = self.surface.as_ref()?;
        let fx = (x - self.bounds.x).clamp(0, s.width as i32 - 1);
        let fy = (y - self.bounds.y).clamp(0, s.height as i32 - 1);
        Some((fx, fy))
    }
}

/// Scale `src` to cover a frame_w × frame_h surface, centered, cropping the
/// overflowing axis. Nearest-neighbor so no new colors are invented — every
/// canvas pixel is an exact source pixel, which is what makes exact picking
/// meaningful.
pub fn fit_to_frame(src: &FrameBuffer, frame_w: usize, frame_h: usize) -> FrameBuffer {
    let mut out = FrameBuffer::new(frame_w, frame_h);
    if src.width == 0 || src.height == 0 {
        return out;
    }

    let scale = f32::max(
        frame_w as f32 / src.width as f32,
        frame_h as f32 / src.height as f32,
    );
    // Offsets center the scaled image; the covering axis goes negative.
    let off_x = (frame_w as f32 - src.width as f32 * scale) / 2.0;
    let off_y = (frame_h as f32 - src.height as f32 * scale) / 2.0;

    for y in 0..frame_h {
        let sy = (((y as f32 - off_y) / scale) as i32).clamp(0, src.height as i32 - 1);
        for x in 0..frame_w {
            let sx = (((x as f32 - off_x) / scale) as i32).clamp(0, src.width as i32 - 1);
            out.pixels[y * frame_w + x] = src.pixels[sy as usize * src.width + sx as usize];
        }
    }
    out
}

/// Built-in fallback image so the tool works without an argument: a smooth
/// two-axis gradient with a few solid swatch stripes along the bottom.
pub fn test_card(width: usize, height: usize) -> FrameBuffer {
    let mut fb = FrameBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            fb.pixels[y * width + x] = pack_rgb(r, g, 0x80);
        }
    }
    // Solid stripes give known flat targets to practice picking on.
    let stripes = [
        pack_rgb(255, 0, 0),
        pack_rgb(0, 255, 0),
        pack_rgb(0, 0, 255),
        pack_rgb(255, 255, 255),
        pack_rgb(0, 0, 0),
    ];
    let band_h = height / 8;
    let band_w = width / stripes.len();
    for (i, &color) in stripes.iter().enumerate() {
        for y in height - band_h..height {
            for x in i * band_w..(i + 1) * band_w {
                fb.pixels[y * width + x] = color;
            }
        }
    }
    fb
}
