//! Frame capture, QR decoding and the scan-to-record pipeline.

pub mod decoder;
pub mod pipeline;
pub mod source;

pub use decoder::{CodeDecoder, QrDecoder};
pub use pipeline::{ScanError, ScanOutcome, ScanPipeline};
pub use source::{CaptureError, Frame, FrameSource, ImageFileSource};
