//! Barcode decoding.
//!
//! Decoding itself is delegated to `rxing`; this module only adapts image bytes
//! into the luma buffer it expects and classifies the outcome.

use rxing::{DecodeHintType, DecodeHintValue, DecodingHintDictionary, Exceptions};
use thiserror::Error;

use ethiscan_core::Barcode;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The image was readable but contains no recognizable barcode.
    #[error("no barcode found in image")]
    NotFound,

    #[error("unreadable image: {0}")]
    Image(String),

    #[error("reader error: {0}")]
    Reader(String),
}

/// Image bytes -> barcode. Implementations are blocking.
pub trait ImageDecoder: Send + Sync + 'static {
    fn decode(&self, image: &[u8]) -> Result<Barcode, DecodeError>;
}

/// Production decoder: any format `rxing` supports, in try-harder mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct RxingDecoder;

impl ImageDecoder for RxingDecoder {
    fn decode(&self, image: &[u8]) -> Result<Barcode, DecodeError> {
        let img = image::load_from_memory(image).map_err(|e| DecodeError::Image(e.to_string()))?;
        let luma = img.to_luma8();
        let (width, height) = luma.dimensions();

        let mut hints = DecodingHintDictionary::new();
        hints.insert(DecodeHintType::TRY_HARDER, DecodeHintValue::TryHarder(true));

        // `helpers::detect_in_luma` passes height and width in the wrong order,
        // which breaks every non-square image. Call the hinted variant directly.
        let result =
            rxing::helpers::detect_in_luma_with_hints(luma.into_raw(), width, height, None, &mut hints)
                .map_err(|e| match e {
                    Exceptions::NotFoundException(_) => DecodeError::NotFound,
                    other => DecodeError::Reader(other.to_string()),
                })?;

        // A symbol that decodes to blank text is as good as no symbol.
        Barcode::parse(result.getText()).map_err(|_| DecodeError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use rxing::{BarcodeFormat, MultiFormatWriter, Writer};

    use super::*;

    fn png(img: GrayImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn blank_png() -> Vec<u8> {
        png(GrayImage::from_pixel(64, 64, Luma([255u8])))
    }

    /// Render `text` as a CODE 128 symbol filling a `width` x `height` PNG.
    fn code128_png(text: &str, width: u32, height: u32) -> Vec<u8> {
        let matrix = MultiFormatWriter
            .encode(text, &BarcodeFormat::CODE_128, width as i32, height as i32)
            .unwrap();
        let img = GrayImage::from_fn(matrix.getWidth(), matrix.getHeight(), |x, y| {
            if matrix.get(x, y) { Luma([0u8]) } else { Luma([255u8]) }
        });
        png(img)
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        let err = RxingDecoder.decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, DecodeError::Image(_)));
    }

    #[test]
    fn blank_image_has_no_barcode() {
        let err = RxingDecoder.decode(&blank_png()).unwrap_err();
        assert!(!matches!(err, DecodeError::Image(_)), "png should load: {err}");
    }

    #[test]
    fn decodes_landscape_and_portrait_photos() {
        for (width, height) in [(459, 120), (459, 700), (459, 459)] {
            let barcode = RxingDecoder
                .decode(&code128_png("0038000000305", width, height))
                .unwrap_or_else(|e| panic!("{width}x{height}: {e}"));
            assert_eq!(barcode.as_str(), "0038000000305", "{width}x{height}");
        }
    }
}
