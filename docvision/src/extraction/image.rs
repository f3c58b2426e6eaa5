//! Image header metadata.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{ExtendedColorType, ImageDecoder, ImageFormat, ImageReader};
use serde::Serialize;
use tracing::warn;

use crate::error::{ImageError, format_error_chain};

/// Metadata of an image file, or the reason it could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ImageMetadata {
    Decoded {
        /// `"{width}x{height}"` in pixels
        dimensions: String,
        format: String,
        color_mode: String,
        has_transparency: bool,
    },
    Unreadable {
        error: String,
    },
}

/// Read dimensions, format, color mode and transparency of an image.
///
/// Only the header is decoded. Failures are returned as
/// [`ImageMetadata::Unreadable`], never as an error.
pub fn read_image_metadata(path: &Path) -> ImageMetadata {
    match inspect_image(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            let message = format_error_chain(&e);
            warn!(path = %path.display(), error = %message, "Could not read image metadata");
            ImageMetadata::Unreadable {
                error: format!("Could not read image metadata: {}", message),
            }
        }
    }
}

fn inspect_image(path: &Path) -> Result<ImageMetadata, ImageError> {
    let reader = ImageReader::open(path)
        .map_err(ImageError::Open)?
        .with_guessed_format()
        .map_err(ImageError::Open)?;

    let format = reader.format().ok_or(ImageError::UnknownFormat)?;
    let decoder = reader.into_decoder().map_err(ImageError::Decode)?;
    let (width, height) = decoder.dimensions();

    // The PNG and GIF decoders only report their expanded output type, so
    // palettes and transparency markers are read from the file header.
    let (color_mode, has_transparency) = match format {
        ImageFormat::Png => png_color_mode(path)?,
        ImageFormat::Gif => gif_color_mode(path)?,
        _ => {
            let (label, native_alpha) = color_mode(decoder.original_color_type());
            (label, native_alpha || decoder.color_type().has_alpha())
        }
    };

    Ok(ImageMetadata::Decoded {
        dimensions: format!("{}x{}", width, height),
        format: format_label(format),
        color_mode: color_mode.to_string(),
        has_transparency,
    })
}

fn format_label(format: ImageFormat) -> String {
    format!("{:?}", format).to_uppercase()
}

/// Color mode label and whether it carries an alpha channel
fn color_mode(color: ExtendedColorType) -> (&'static str, bool) {
    use ExtendedColorType::*;

    match color {
        L1 => ("1", false),
        L2 | L4 | L8 => ("L", false),
        La1 | La2 | La4 | La8 => ("LA", true),
        Rgb1 | Rgb2 | Rgb4 | Rgb8 => ("RGB", false),
        Rgba1 | Rgba2 | Rgba4 | Rgba8 => ("RGBA", true),
        L16 => ("I;16", false),
        La16 => ("LA;16", true),
        Rgb16 => ("RGB;16", false),
        Rgba16 => ("RGBA;16", true),
        Rgb32F => ("RGB;F", false),
        Rgba32F => ("RGBA;F", true),
        Cmyk8 => ("CMYK", false),
        // Decoders report indexed data they do not expand as unknown
        Unknown(_) => ("P", false),
        _ => ("UNKNOWN", false),
    }
}

/// Native PNG color mode. A tRNS chunk counts as transparency.
fn png_color_mode(path: &Path) -> Result<(&'static str, bool), ImageError> {
    use png::{BitDepth, ColorType};

    let file = File::open(path).map_err(ImageError::Open)?;
    let reader = png::Decoder::new(BufReader::new(file))
        .read_info()
        .map_err(ImageError::PngHeader)?;
    let info = reader.info();

    let (label, native_alpha) = match (info.color_type, info.bit_depth) {
        (ColorType::Indexed, _) => ("P", false),
        (ColorType::Grayscale, BitDepth::One) => ("1", false),
        (ColorType::Grayscale, BitDepth::Sixteen) => ("I;16", false),
        (ColorType::Grayscale, _) => ("L", false),
        (ColorType::GrayscaleAlpha, BitDepth::Sixteen) => ("LA;16", true),
        (ColorType::GrayscaleAlpha, _) => ("LA", true),
        (ColorType::Rgb, BitDepth::Sixteen) => ("RGB;16", false),
        (ColorType::Rgb, _) => ("RGB", false),
        (ColorType::Rgba, BitDepth::Sixteen) => ("RGBA;16", true),
        (ColorType::Rgba, _) => ("RGBA", true),
    };

    Ok((label, native_alpha || info.trns.is_some()))
}

/// GIFs are always palette based. Transparency comes from the first frame's
/// transparent color index.
fn gif_color_mode(path: &Path) -> Result<(&'static str, bool), ImageError> {
    let file = File::open(path).map_err(ImageError::Open)?;

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options
        .read_info(BufReader::new(file))
        .map_err(ImageError::GifHeader)?;

    let has_transparency = decoder
        .next_frame_info()
        .map_err(ImageError::GifHeader)?
        .is_some_and(|frame| frame.transparent.is_some());

    Ok(("P", has_transparency))
}
