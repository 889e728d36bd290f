use crate::domain::payload::BrCodePayload;
use crate::error::{PixError, Result};
use base64::{Engine as _, engine::general_purpose};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageBuffer, ImageEncoder, Luma};
use qrcode::{Color, EcLevel, QrCode};
use tracing::debug;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Largest raster `render_with` will allocate: 64 Mi pixels (one byte each).
pub const MAX_PIXELS: u64 = 64 * 1024 * 1024;

/// Knobs for the rasterized QR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub ec_level: EcLevel,
    /// Side of one QR module, in pixels.
    pub module_size: u32,
    /// Light border around the symbol, in modules.
    pub quiet_zone: u32,
}

impl Default for RenderOptions {
    /// Medium error correction, 10 px modules and a 5 module border: large
    /// enough to scan from a phone pointed at a checkout page.
    fn default() -> Self {
        Self {
            ec_level: EcLevel::M,
            module_size: 10,
            quiet_zone: 5,
        }
    }
}

/// A rendered QR code as PNG bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    png: Vec<u8>,
    side: u32,
}

impl QrImage {
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Width and height in pixels; the image is always square.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.side, self.side)
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.png)
    }

    /// The image as a `data:` URI for inline embedding in a page.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.to_base64())
    }
}

/// Renders `payload` with [`RenderOptions::default`].
pub fn render(payload: &BrCodePayload) -> Result<QrImage> {
    render_with(payload, &RenderOptions::default())
}

pub fn render_with(payload: &BrCodePayload, options: &RenderOptions) -> Result<QrImage> {
    if options.module_size == 0 {
        return Err(PixError::Render(
            "module size must be at least one pixel".to_string(),
        ));
    }

    let code = QrCode::with_error_correction_level(payload.as_str(), options.ec_level)
        .map_err(|e| PixError::Render(e.to_string()))?;
    let modules = u32::try_from(code.width())
        .map_err(|_| PixError::Render("QR symbol too wide".to_string()))?;
    let side = options
        .quiet_zone
        .checked_mul(2)
        .and_then(|border| border.checked_add(modules))
        .and_then(|total| total.checked_mul(options.module_size))
        .ok_or_else(|| PixError::Render("image dimensions overflow".to_string()))?;
    if u64::from(side) * u64::from(side) > MAX_PIXELS {
        return Err(PixError::Render(format!(
            "a {side}x{side} image exceeds the {MAX_PIXELS} pixel limit"
        )));
    }

    let colors = code.to_colors();
    let image = ImageBuffer::from_fn(side, side, |x, y| {
        let column = (x / options.module_size).checked_sub(options.quiet_zone);
        let row = (y / options.module_size).checked_sub(options.quiet_zone);
        match (column, row) {
            (Some(c), Some(r))
                if c < modules
                    && r < modules
                    && colors[(r * modules + c) as usize] == Color::Dark =>
            {
                DARK
            }
            _ => LIGHT,
        }
    });

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(image.as_raw(), side, side, ColorType::L8)
        .map_err(|e| PixError::Render(format!("cannot encode PNG: {e}")))?;

    debug!(modules, side, bytes = png.len(), "rendered QR code");
    Ok(QrImage { png, side })
}
