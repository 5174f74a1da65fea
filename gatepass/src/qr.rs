// src/qr.rs

//! # QR generation
//!
//! Identity → payload text → black-on-white PNG. The caption
//! (`"Name: {name}"`) travels next to the image; drawing it onto the bitmap is
//! left to whoever presents the code.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ImageFormat, Rgb, RgbImage};
use log::Level;
use qrcode::{Color, EcLevel, QrCode};
use shared::{Identity, IdentityError, payload};
use std::{io::Cursor, path::Path};
use thiserror::Error;

use crate::config::GeneratorConfig;
use crate::gatepass_log;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("cannot generate code: {0}")]
    Identity(#[from] IdentityError),

    #[error("payload does not fit in a QR code: {0:?}")]
    Encode(qrcode::types::QrError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub trait QrRenderer {
    fn render(&self, payload: &str) -> Result<RgbImage, GenerateError>;
}

/// Renders with `qrcode` at error-correction level L.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngRenderer {
    pub module_px: u32,
    pub quiet_zone: u32,
    pub upscale: u32,
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self::from(&GeneratorConfig::default())
    }
}

impl From<&GeneratorConfig> for PngRenderer {
    fn from(cfg: &GeneratorConfig) -> Self {
        Self {
            module_px: cfg.module_px.max(1),
            quiet_zone: cfg.quiet_zone,
            upscale: cfg.upscale.max(1),
        }
    }
}

impl QrRenderer for PngRenderer {
    fn render(&self, payload: &str) -> Result<RgbImage, GenerateError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)
            .map_err(GenerateError::Encode)?;
        let modules = code.width() as u32;
        let colors = code.to_colors();

        let px = self.module_px * self.upscale;
        let side = (modules + 2 * self.quiet_zone) * px;
        let black = Rgb([0u8, 0, 0]);
        let white = Rgb([255u8, 255, 255]);

        let img = RgbImage::from_fn(side, side, |x, y| {
            let (mx, my) = (x / px, y / px);
            let inside = |m: u32| m >= self.quiet_zone && m < self.quiet_zone + modules;
            if !inside(mx) || !inside(my) {
                return white;
            }
            let idx = ((my - self.quiet_zone) * modules + (mx - self.quiet_zone)) as usize;
            match colors[idx] {
                Color::Dark => black,
                Color::Light => white,
            }
        });
        gatepass_log!(Level::Debug, "generate", "Rendered {}-module code at {}x{}", modules, side, side);
        Ok(img)
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedCode {
    pub payload: String,
    pub caption: String,
    pub image: RgbImage,
}

impl GeneratedCode {
    pub fn png_bytes(&self) -> Result<Vec<u8>, GenerateError> {
        let mut buf = Cursor::new(Vec::new());
        self.image.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    pub fn save_png(&self, path: &Path) -> Result<(), GenerateError> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        gatepass_log!(Level::Info, "generate", "QR code written to {}", path.display());
        Ok(())
    }

    /// `data:image/png;base64,...`, usable as a download link.
    pub fn data_uri(&self) -> Result<String, GenerateError> {
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(self.png_bytes()?)))
    }
}

/// Build the payload and image for one identity. Fields are trimmed first,
/// since decoding trims them too; what remains must be complete and free of
/// line breaks.
pub fn generate<R: QrRenderer + ?Sized>(
    identity: &Identity,
    renderer: &R,
) -> Result<GeneratedCode, GenerateError> {
    let identity = identity.trimmed();
    identity.validate()?;
    payload::check_encodable(&identity)?;

    let text = payload::encode(&identity);
    let image = renderer.render(&text)?;
    Ok(GeneratedCode {
        caption: format!("Name: {}", identity.name),
        payload: text,
        image,
    })
}
