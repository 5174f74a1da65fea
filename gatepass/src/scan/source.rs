// src/scan/source.rs

//! Single-shot frame capture.
//!
//! A [`FrameSource`] hands over one still RGB frame per call. Whatever device
//! or file backs it is acquired inside `capture_frame` and released before the
//! call returns, on success and on error alike.

use crate::gatepass_log;
use image::RgbImage;
use log::Level;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Frame = RgbImage;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("cannot read frame from {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image source returned no frame")]
    NoFrame,
}

pub trait FrameSource {
    fn capture_frame(&mut self) -> Result<Frame, CaptureError>;
}

/// Reads a still image from disk. Stands in for a camera on machines where
/// frames are captured by another program.
#[derive(Debug, Clone)]
pub struct ImageFileSource {
    path: PathBuf,
}

impl ImageFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for ImageFileSource {
    fn capture_frame(&mut self) -> Result<Frame, CaptureError> {
        // image::open drops its file handle before returning
        let img = image::open(&self.path).map_err(|source| CaptureError::Image {
            path: self.path.clone(),
            source,
        })?;
        let frame = img.to_rgb8();
        if frame.width() == 0 || frame.height() == 0 {
            return Err(CaptureError::NoFrame);
        }
        gatepass_log!(
            Level::Debug,
            "capture",
            "Captured {}x{} frame from {:?}",
            frame.width(),
            frame.height(),
            self.path
        );
        Ok(frame)
    }
}

impl<F: FrameSource + ?Sized> FrameSource for &mut F {
    fn capture_frame(&mut self) -> Result<Frame, CaptureError> {
        (**self).capture_frame()
    }
}
