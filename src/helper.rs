use crate::error::QrError;
use crate::qrcode::{QrCode, QrCodeEcc};

use image::{ImageBuffer, Luma};

/*---- Utilities ----*/

// Returns a string of SVG code for an image depicting
// the given QR Code, with the given number of border modules.
// The string always uses Unix newlines (\n), regardless of the platform.
pub fn to_svg_string(qr: &QrCode, border: i32) -> String {
    assert!(border >= 0, "Border must be non-negative");
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    let dimension = qr.size() + border * 2;
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
        dimension
    );
    result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
    result += "\t<path d=\"";
    let mut first = true;
    for y in 0..qr.size() {
        for x in 0..qr.size() {
            if qr.get_module(x, y) {
                if !first {
                    result += " ";
                }
                first = false;
                result += &format!("M{},{}h1v1h-1z", x + border, y + border);
            }
        }
    }
    result += "\" fill=\"#000000\"/>\n";
    result += "</svg>\n";
    result
}

/// Returns the QR Code as text, two characters per module so the symbol looks square
/// in a terminal, surrounded by `border` light modules.
pub fn to_console_string(qr: &QrCode, border: i32) -> String {
    assert!(border >= 0, "Border must be non-negative");
    let mut result = String::new();
    for y in -border..qr.size() + border {
        for x in -border..qr.size() + border {
            let c: char = if qr.get_module(x, y) { '█' } else { ' ' };
            result.push(c);
            result.push(c);
        }
        result.push('\n');
    }
    result
}

/// Prints the given QrCode object to the console.
pub fn print_qr(qr: &QrCode) {
    println!("{}", to_console_string(qr, 4));
}

/// Renders the QR Code into a grayscale image held in memory.
///
/// Each module becomes a `scale` × `scale` block of pixels, and the symbol is surrounded
/// by `border` light modules.
///
/// # Arguments
///
/// * `qr` - The QR Code object to render.
/// * `scale` - Pixels per module, at least 1.
/// * `border` - Light modules around the symbol.
///
/// # Example
///
/// ```rust
/// use qirust_fast::helper::to_image_buffer;
/// use qirust_fast::qrcode::{QrCode, QrCodeEcc};
///
/// let qr = QrCode::encode_text("Hello, World!", QrCodeEcc::Low).unwrap();
/// let img = to_image_buffer(&qr, 2, 4);
/// assert_eq!(img.width(), (qr.size() as u32 + 8) * 2);
/// ```
pub fn to_image_buffer(qr: &QrCode, scale: u32, border: u32) -> ImageBuffer<Luma<u8>, Vec<u8>> {
    assert!(scale >= 1, "Scale must be positive");
    let size = (qr.size() as u32 + 2 * border) * scale;
    let mut img = ImageBuffer::new(size, size);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let qr_x = (x / scale) as i32 - border as i32;
        let qr_y = (y / scale) as i32 - border as i32;
        *pixel = if qr.get_module(qr_x, qr_y) {
            Luma([0u8]) // Black
        } else {
            Luma([255u8]) // White
        };
    }

    img
}

/// Generates a QR Code image buffer from the provided content, one pixel per module
/// with a border of 4.
///
/// # Arguments
///
/// * `content` - The content to encode into the QR Code.
/// * `ecl` - Optional. The error correction level, `Low` if not provided.
///
/// # Errors
///
/// Returns [`QrError::DataTooLong`] if the content does not fit in a QR Code.
///
/// # Example
///
/// ```
/// use qirust_fast::helper::generate_image_buffer;
///
/// let img_buffer = generate_image_buffer("Hello, World!", None).unwrap();
/// ```
pub fn generate_image_buffer(
    content: &str,
    ecl: Option<QrCodeEcc>,
) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>, QrError> {
    let qr = QrCode::encode_text(content, ecl.unwrap_or(QrCodeEcc::Low))?;
    Ok(to_image_buffer(&qr, 1, 4))
}

/// Generates a QR Code SVG from the provided content at error correction level `Low`.
///
/// # Example
///
/// ```
/// use qirust_fast::helper::generate_svg_string;
///
/// let svg_string = generate_svg_string("Hello, World!").unwrap();
/// assert!(svg_string.ends_with("</svg>\n"));
/// ```
pub fn generate_svg_string(content: &str) -> Result<String, QrError> {
    let qr = QrCode::encode_text(content, QrCodeEcc::Low)?;
    Ok(to_svg_string(&qr, 4))
}

/// Appearance of the dotted SVG rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct DotStyle {
    /// Pixels per module.
    pub scale: u32,
    /// Light modules around the symbol.
    pub border: u32,
    /// Dark modules within this distance of the symbol center are left out, making
    /// room for a logo. Relies on error correction to restore them.
    pub omit_radius: Option<f64>,
    pub dot_color: String,
    pub finder_color: String,
    pub finder_center_color: String,
}

impl Default for DotStyle {
    fn default() -> Self {
        Self {
            scale: 10,
            border: 4,
            omit_radius: None,
            dot_color: "#000000".to_string(),
            finder_color: "#000000".to_string(),
            finder_center_color: "#000000".to_string(),
        }
    }
}

/// Returns an SVG document drawing the dark data modules as circles and the three finder
/// patterns as rounded squares.
pub fn to_dotted_svg_string(qr: &QrCode, style: &DotStyle) -> String {
    assert!(style.scale >= 1, "Scale must be positive");
    let size = qr.size();
    let scale = f64::from(style.scale);
    let border = style.border as i32;
    let total = (size as u32 + 2 * style.border) * style.scale;
    let center = f64::from(size - 1) / 2.0;

    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\">\n",
        total
    );
    result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";

    for y in 0..size {
        for x in 0..size {
            if !qr.get_module(x, y) || in_finder_area(x, y, size) {
                continue;
            }
            if let Some(radius) = style.omit_radius {
                if (f64::from(x) - center).hypot(f64::from(y) - center) <= radius {
                    continue;
                }
            }
            result += &format!(
                "\t<circle cx=\"{}\" cy=\"{}\" r=\"{:.3}\" fill=\"{}\"/>\n",
                f64::from(x + border) * scale + scale / 2.0,
                f64::from(y + border) * scale + scale / 2.0,
                scale / 2.2,
                style.dot_color
            );
        }
    }

    for (fx, fy) in [(0, 0), (size - 7, 0), (0, size - 7)] {
        let left = (fx + border) as u32 * style.scale;
        let top = (fy + border) as u32 * style.scale;
        let s = style.scale;
        result += &format!(
            "\t<rect x=\"{}\" y=\"{}\" rx=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
            left, top, s, 7 * s, 7 * s, style.finder_color
        );
        result += &format!(
            "\t<rect x=\"{}\" y=\"{}\" rx=\"{}\" width=\"{}\" height=\"{}\" fill=\"#FFFFFF\"/>\n",
            left + s, top + s, s, 5 * s, 5 * s
        );
        result += &format!(
            "\t<rect x=\"{}\" y=\"{}\" rx=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
            left + 2 * s, top + 2 * s, s, 3 * s, 3 * s, style.finder_center_color
        );
    }
    result += "</svg>\n";
    result
}

fn in_finder_area(x: i32, y: i32, size: i32) -> bool {
    (x <= 6 && y <= 6) || (x >= size - 7 && y <= 6) || (x <= 6 && y >= size - 7)
}
