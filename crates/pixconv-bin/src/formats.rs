/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsStr;
use std::path::Path;

use pixconv_core::options::{DecoderOptions, EncoderOptions};
use pixconv_core::raster::Raster;
use pixconv_jpeg::{JpegDecoder, JpegEncoder};
use pixconv_ppm::{ppm_header, PPMDecoder, PPMEncoder};

use crate::errors::CliErrors;

/// Image formats the converter reads and writes
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ImageFormat {
    Ppm,
    Jpeg
}

impl ImageFormat {
    /// Detect the format from the first bytes of a file
    pub fn guess_format(data: &[u8]) -> Option<ImageFormat> {
        match data {
            [0xFF, 0xD8, ..] => Some(ImageFormat::Jpeg),
            [b'P', b'6', ..] => Some(ImageFormat::Ppm),
            _ => None
        }
    }

    /// Pick the format from a file extension, case insensitive
    pub fn from_extension(path: &OsStr) -> Option<ImageFormat> {
        let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();

        match ext.as_str() {
            "ppm" => Some(ImageFormat::Ppm),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            _ => None
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ImageFormat::Ppm => "ppm",
            ImageFormat::Jpeg => "jpeg"
        }
    }

    /// Decode `data` which must be in this format
    pub fn decode(self, data: &[u8], options: DecoderOptions) -> Result<Raster, CliErrors> {
        let raster = match self {
            ImageFormat::Ppm => PPMDecoder::new_with_options(options, data).decode()?,
            ImageFormat::Jpeg => JpegDecoder::new_with_options(options, data).decode()?
        };
        Ok(raster)
    }

    /// Encode `raster` in this format
    pub fn encode(self, raster: &Raster, options: EncoderOptions) -> Result<Vec<u8>, CliErrors> {
        let data = match self {
            ImageFormat::Ppm => {
                let header = ppm_header(raster.width(), raster.height());
                let mut out = Vec::with_capacity(header.len() + raster.as_bytes().len());

                PPMEncoder::new(&mut out).encode(raster)?;
                out
            }
            ImageFormat::Jpeg => JpegEncoder::new(raster, options).encode()?
        };
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use pixconv_core::options::EncoderOptions;
    use pixconv_core::raster::Raster;

    use crate::formats::ImageFormat;

    #[test]
    fn ppm_output_is_header_then_pixels() {
        let raster = Raster::from_pixels(2, 1, &[[1, 2, 3], [4, 5, 6]]).unwrap();
        let data = ImageFormat::Ppm
            .encode(&raster, EncoderOptions::default())
            .unwrap();

        assert_eq!(data, b"P6\n2 1\n255\n\x01\x02\x03\x04\x05\x06");
        assert_eq!(data, pixconv_ppm::encode(&raster));
    }

    #[test]
    fn magic_bytes() {
        assert_eq!(ImageFormat::guess_format(&[0xFF, 0xD8, 0xFF]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::guess_format(b"P6\n1 1\n255\n"), Some(ImageFormat::Ppm));
        assert_eq!(ImageFormat::guess_format(b"P3"), None);
        assert_eq!(ImageFormat::guess_format(&[0xFF]), None);
    }

    #[test]
    fn extensions() {
        assert_eq!(ImageFormat::from_extension(OsStr::new("a.PPM")), Some(ImageFormat::Ppm));
        assert_eq!(ImageFormat::from_extension(OsStr::new("dir/a.jpeg")), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension(OsStr::new("a.jpg")), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension(OsStr::new("a.png")), None);
        assert_eq!(ImageFormat::from_extension(OsStr::new("jpg")), None);
    }
}
