// src/scan/decoder.rs

//! QR detection on a captured frame.

use super::source::Frame;
use crate::gatepass_log;
use image::imageops;
use log::Level;

pub trait CodeDecoder {
    /// Every payload that could be decoded, in detection order. Empty when
    /// the frame holds no readable code.
    fn decode_frame(&self, frame: &Frame) -> Vec<String>;
}

/// `rqrr` over a grayscale copy of the frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrDecoder;

impl CodeDecoder for QrDecoder {
    fn decode_frame(&self, frame: &Frame) -> Vec<String> {
        let gray = imageops::grayscale(frame);
        let (w, h) = gray.dimensions();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            w as usize,
            h as usize,
            |x, y| gray.get_pixel(x as u32, y as u32)[0],
        );

        let grids = prepared.detect_grids();
        gatepass_log!(Level::Debug, "decode", "Detected {} candidate grid(s)", grids.len());

        grids
            .into_iter()
            .filter_map(|grid| match grid.decode() {
                Ok((_meta, content)) => Some(content),
                Err(e) => {
                    gatepass_log!(Level::Debug, "decode", "Grid rejected: {:?}", e);
                    None
                }
            })
            .collect()
    }
}

impl<D: CodeDecoder + ?Sized> CodeDecoder for &D {
    fn decode_frame(&self, frame: &Frame) -> Vec<String> {
        (**self).decode_frame(frame)
    }
}
