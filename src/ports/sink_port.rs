//! Result persistence port trait.

use crate::domain::error::ScreenError;
use std::path::Path;

/// Port for persisting ticker lists from a screen run.
pub trait ResultSink {
    /// Overwrite `path` with one item per line, no trailing metadata.
    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<(), ScreenError>;
}
