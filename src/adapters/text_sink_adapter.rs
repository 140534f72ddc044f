//! Flat-file result sink: one ticker per line.

use crate::domain::error::ScreenError;
use crate::ports::sink_port::ResultSink;
use std::io::Write;
use std::path::Path;

pub struct TextFileSink;

impl ResultSink for TextFileSink {
    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<(), ScreenError> {
        let mut file = std::fs::File::create(path)?;
        for line in lines {
            writeln!(file, "{line}")?;
        }
        Ok(())
    }
}
