// Every variant states *where* things went wrong. Configuration problems are
// fatal at setup; everything a tick can hit is resolved by no-op/clamping and
// never reaches this type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the window failed.
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Pushing a frame buffer to the window failed.
    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// Opening or decoding the source image failed.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// Magnifier dimensions/zoom rejected at setup time.
    #[error("invalid magnifier config: {0}")]
    BadConfig(String),
}
