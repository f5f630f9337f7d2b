use std::fmt;

/// An error raised by the hillshading pipeline. Every variant is a
/// precondition violation, never a transient condition: the caller gets it
/// immediately and there is no retry path inside the crate.
#[derive(Debug)]
pub enum ReliefError {
    /// The source raster violates the single-band precondition.
    Config(String),
    /// The elevation block and validity mask dimensions disagree, or the
    /// block is smaller than the 3x3 gradient stencil footprint.
    Shape(String),
    /// A DEM tile or elevation TIFF could not be loaded.
    Dem(String),
}

impl fmt::Display for ReliefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReliefError::Config(message) => {
                write!(f, "config error: {}", message)
            }
            ReliefError::Shape(message) => {
                write!(f, "shape error: {}", message)
            }
            ReliefError::Dem(message) => write!(f, "DEM error: {}", message),
        }
    }
}

impl std::error::Error for ReliefError {}
