//! Concrete image sinks: an in-memory frame and a PNG file writer.

pub mod file;
pub mod frame;
