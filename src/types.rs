// Core types shared by the canvas, sampler and magnifier.

/// A software pixel buffer. Screen/canvas pixels are 0x00RRGGBB (what minifb
/// expects); the magnifier view reuses the same struct with the top byte as
/// coverage alpha (see `magnifier`).
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,     // pixels across
    pub height: usize,    // pixels down
    pub pixels: Vec<u32>, // row-major, length = width * height
}

impl FrameBuffer {
    /// Allocate a zeroed buffer (all pixels transparent black).
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Read the pixel at (x, y), or None when the coordinate is off the buffer.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Overwrite every pixel with transparent black.
    pub fn clear(&mut self) {
        for px in &mut self.pixels {
            *px = 0;
        }
    }
}

/// Where the canvas sits inside the window, in window pixel coordinates.
/// Used to translate pointer positions into canvas space and to decide
/// whether a click lands on the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// True when (x, y) lies within the rect, edges inclusive.
    /// A click exactly on the right/bottom edge still counts as a pick.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (rx, ry) = (x - self.x, y - self.y);
        rx >= 0 && rx <= self.width && ry >= 0 && ry <= self.height
    }
}

/// Split a packed pixel into (r, g, b), ignoring the top byte.
#[inline]
pub fn unpack_rgb(px: u32) -> (u8, u8, u8) {
    (((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
}

/// Pack (r, g, b) as 0x00RRGGBB.
#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}
