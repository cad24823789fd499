use std::io;

/// A frame paired with the time it was captured, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamped<F> {
    pub timestamp: f64,
    pub frame: F,
}

impl<F> Timestamped<F> {
    pub fn new(timestamp: f64, frame: F) -> Self {
        Self { timestamp, frame }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read frame: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl SourceError {
    /// Whether reading again may succeed. A parse error has already
    /// consumed the bad record.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Producer of timestamped frames.
///
/// `Ok(None)` means the source is exhausted; `Err` is a failed read.
/// Timestamps must be non-decreasing.
pub trait FrameSource {
    type Frame;

    fn read(&mut self) -> Result<Option<Timestamped<Self::Frame>>, SourceError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    type Frame = S::Frame;

    fn read(&mut self) -> Result<Option<Timestamped<Self::Frame>>, SourceError> {
        (**self).read()
    }
}
