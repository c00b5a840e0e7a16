// One error type for the whole crate.
// Every variant states *where* things went wrong.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A frame operation was called out of order (no open layer, or one already open).
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    /// Width or height is zero/negative; nothing to fade.
    #[error("Degenerate geometry: {width}x{height}")]
    DegenerateGeometry { width: f32, height: f32 },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),
}
