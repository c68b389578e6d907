//! QR-code rendering for the provisioning URI.
//!
//! Two renderings: a PNG for the enrollment web page, and a Unicode
//! half-block rendering printed to the operator terminal at startup.

use std::io::Cursor;

use image::{ImageBuffer, Luma};
use qrcode::QrCode;

/// QR code module size in pixels for PNG output.
const PNG_MODULE_SIZE: u32 = 8;

/// Quiet zone (border) size in modules for PNG output.
const PNG_QUIET_ZONE: u32 = 4;

/// Render `uri` as a PNG image and return the encoded bytes.
pub fn provisioning_png(uri: &str) -> anyhow::Result<Vec<u8>> {
    let code = QrCode::new(uri.as_bytes())?;
    let modules = code.to_colors();
    let qr_width = code.width();

    let quiet_zone_pixels = PNG_QUIET_ZONE * PNG_MODULE_SIZE;
    let qr_pixels = qr_width as u32 * PNG_MODULE_SIZE;
    let image_size = qr_pixels + 2 * quiet_zone_pixels;

    let mut img: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(image_size, image_size, Luma([255u8]));

    for (idx, color) in modules.iter().enumerate() {
        let row = (idx / qr_width) as u32;
        let col = (idx % qr_width) as u32;

        let pixel_color = if *color == qrcode::Color::Dark {
            Luma([0u8])
        } else {
            Luma([255u8])
        };

        let x_start = quiet_zone_pixels + col * PNG_MODULE_SIZE;
        let y_start = quiet_zone_pixels + row * PNG_MODULE_SIZE;

        for dy in 0..PNG_MODULE_SIZE {
            for dx in 0..PNG_MODULE_SIZE {
                img.put_pixel(x_start + dx, y_start + dy, pixel_color);
            }
        }
    }

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

/// Render `uri` as a terminal QR code using Unicode half-block characters,
/// two module rows per text line.
pub fn terminal_qr(uri: &str) -> anyhow::Result<String> {
    let code = QrCode::new(uri.as_bytes())?;
    let modules = code.to_colors();
    let width = code.width();
    let height = modules.len() / width;

    let mut output = String::new();
    let full_width = width + 8; // 4 modules quiet zone on each side

    for _ in 0..2 {
        output.push_str(&" ".repeat(full_width));
        output.push('\n');
    }

    let mut row = 0;
    while row < height {
        output.push_str("    ");
        for col in 0..width {
            let top_dark = modules[row * width + col] == qrcode::Color::Dark;
            let bottom_dark = if row + 1 < height {
                modules[(row + 1) * width + col] == qrcode::Color::Dark
            } else {
                false
            };
            let ch = match (top_dark, bottom_dark) {
                (true, true) => '\u{2588}',  // Full block
                (true, false) => '\u{2580}', // Upper half block
                (false, true) => '\u{2584}', // Lower half block
                (false, false) => ' ',
            };
            output.push(ch);
        }
        output.push_str("    ");
        output.push('\n');
        row += 2;
    }

    for _ in 0..2 {
        output.push_str(&" ".repeat(full_width));
        output.push('\n');
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_URI: &str = "otpauth://totp/dropgate:admin?secret=JBSWY3DPEHPK3PXP&issuer=dropgate";

    #[test]
    fn test_png_has_png_header() {
        let bytes = provisioning_png(TEST_URI).expect("Failed to render PNG");
        assert!(!bytes.is_empty());
        assert!(
            bytes.starts_with(&[137, 80, 78, 71, 13, 10, 26, 10]),
            "Bytes should have PNG header"
        );
    }

    #[test]
    fn test_terminal_qr_uses_block_characters() {
        let qr = terminal_qr(TEST_URI).expect("Failed to render terminal QR");
        assert!(qr.lines().count() > 10, "QR code should have multiple rows");
        assert!(
            qr.contains('\u{2588}') || qr.contains('\u{2580}') || qr.contains('\u{2584}'),
            "QR code should contain Unicode block characters"
        );
    }
}
