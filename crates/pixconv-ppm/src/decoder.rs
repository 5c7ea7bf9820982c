/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use pixconv_core::bytestream::ZByteReader;
use pixconv_core::colorspace::ColorSpace;
use pixconv_core::log::{trace, warn};
use pixconv_core::options::DecoderOptions;
use pixconv_core::raster::Raster;

use crate::errors::PPMDecodeErrors;

/// The only maximum channel value understood by the decoder
pub const SUPPORTED_MAX_VALUE: usize = 255;

/// An instance of a PPM decoder
///
/// The decoder understands binary `P6` files with a maximum
/// value of 255, every other variant is rejected.
pub struct PPMDecoder<'a> {
    width:           usize,
    height:          usize,
    decoded_headers: bool,
    reader:          ZByteReader<'a>,
    options:         DecoderOptions
}

impl<'a> PPMDecoder<'a> {
    /// Create a new ppm decoder with default options
    ///
    /// # Arguments
    /// - data:PPM encoded pixels
    ///
    /// # Example
    /// ```
    /// use pixconv_ppm::PPMDecoder;
    /// let mut decoder = PPMDecoder::new(b"NOT VALID PPM");
    ///
    /// assert!(decoder.decode().is_err());
    /// ```
    pub fn new(data: &'a [u8]) -> PPMDecoder<'a> {
        PPMDecoder::new_with_options(DecoderOptions::default(), data)
    }

    /// Create a new PPM decoder with the specified options
    ///
    /// # Arguments
    /// - options: Modified options for the decoder
    /// - data: PPM encoded data.
    ///
    /// # Example
    /// ```
    /// use pixconv_core::options::DecoderOptions;
    /// use pixconv_ppm::PPMDecoder;
    ///
    /// let options = DecoderOptions::default().set_max_width(1);
    /// let mut decoder = PPMDecoder::new_with_options(options, b"P6\n2 1\n255\n\0\0\0\0\0\0");
    ///
    /// assert!(decoder.decode().is_err());
    /// ```
    pub fn new_with_options(options: DecoderOptions, data: &'a [u8]) -> PPMDecoder<'a> {
        PPMDecoder {
            width: 0,
            height: 0,
            decoded_headers: false,
            reader: ZByteReader::new(data),
            options
        }
    }

    /// Read PPM headers and store them in internal state
    ///
    /// Calling this more than once is a no-op.
    pub fn decode_headers(&mut self) -> Result<(), PPMDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        let magic = [self.reader.get_u8_err()?, self.reader.get_u8_err()?];

        if &magic != b"P6" {
            return Err(PPMDecodeErrors::InvalidMagic(magic));
        }
        // the magic must be a token of its own, `P61` is not P6
        match self.reader.peek_u8() {
            Some(byte) if byte.is_ascii_whitespace() || byte == b'#' => (),
            _ => return Err(PPMDecodeErrors::InvalidMagic(magic))
        }

        skip_spaces(&mut self.reader);
        self.width = self.get_integer("width")?;

        skip_spaces(&mut self.reader);
        self.height = self.get_integer("height")?;

        skip_spaces(&mut self.reader);
        let max_value = self.get_integer("max value")?;

        // exactly one whitespace byte before the raster
        let separator = self.reader.get_u8_err()?;

        if !separator.is_ascii_whitespace() {
            let msg = format!(
                "Expected a single whitespace after max value but found {:?}",
                separator as char
            );
            return Err(PPMDecodeErrors::InvalidHeader(msg));
        }

        trace!("Width: {}, height: {}", self.width, self.height);
        trace!("Max value: {}", max_value);

        if self.width == 0 || self.height == 0 {
            return Err(PPMDecodeErrors::ZeroDimensions);
        }
        if self.width > self.options.max_width() {
            return Err(PPMDecodeErrors::LargeDimensions(
                self.options.max_width(),
                self.width
            ));
        }
        if self.height > self.options.max_height() {
            return Err(PPMDecodeErrors::LargeDimensions(
                self.options.max_height(),
                self.height
            ));
        }
        if max_value != SUPPORTED_MAX_VALUE {
            return Err(PPMDecodeErrors::UnsupportedMaxValue(max_value));
        }
        self.decoded_headers = true;

        Ok(())
    }

    /// Read a non-negative decimal integer header token
    fn get_integer(&mut self, name: &str) -> Result<usize, PPMDecodeErrors> {
        let mut value = 0_usize;
        let mut digits = 0;

        while let Some(byte) = self.reader.peek_u8() {
            if !byte.is_ascii_digit() {
                break;
            }
            value = value
                .checked_mul(10)
                .and_then(|x| x.checked_add(usize::from(byte - b'0')))
                .ok_or_else(|| {
                    PPMDecodeErrors::InvalidHeader(format!("The {name} token overflows"))
                })?;
            digits += 1;
            self.reader.skip(1)?;
        }
        if digits == 0 {
            let msg = match self.reader.peek_u8() {
                Some(byte) => format!("Expected {name} but found {:?}", byte as char),
                None => format!("Expected {name} but reached end of data")
            };
            return Err(PPMDecodeErrors::InvalidHeader(msg));
        }
        Ok(value)
    }

    /// Return the image colorspace or none if
    /// headers aren't decoded
    pub const fn colorspace(&self) -> Option<ColorSpace> {
        if self.decoded_headers {
            Some(ColorSpace::RGB)
        } else {
            None
        }
    }

    /// Return image dimensions as `(width, height)` or none if headers
    /// aren't decoded
    pub const fn dimensions(&self) -> Option<(usize, usize)> {
        if self.decoded_headers {
            Some((self.width, self.height))
        } else {
            None
        }
    }

    /// Decode a ppm encoded file into a raster
    ///
    /// # Returns
    /// - `Ok(Raster)`: The decoded image
    /// - `Err(PPMDecodeErrors)`: The header was invalid or the pixel data was truncated
    pub fn decode(&mut self) -> Result<Raster, PPMDecodeErrors> {
        self.decode_headers()?;

        let width = u32::try_from(self.width)
            .map_err(|_| PPMDecodeErrors::LargeDimensions(u32::MAX as usize, self.width))?;
        let height = u32::try_from(self.height)
            .map_err(|_| PPMDecodeErrors::LargeDimensions(u32::MAX as usize, self.height))?;

        let size = Raster::byte_size(width, height)?;
        let remaining = self.reader.remaining();

        if remaining < size {
            return Err(PPMDecodeErrors::TruncatedData {
                expected: size,
                found:    remaining
            });
        }
        let pixels = self.reader.get_as_ref(size)?.to_vec();

        let trailing = self.reader.remaining();

        if trailing > 0 {
            if self.options.strict_mode() {
                return Err(PPMDecodeErrors::TrailingBytes(trailing));
            }
            warn!("Ignoring {} bytes after pixel data", trailing);
        }
        Ok(Raster::new(width, height, pixels)?)
    }
}

/// Skip all whitespace characters and comments
/// until one hits a character that isn't a space or
/// we reach eof
fn skip_spaces(byte_stream: &mut ZByteReader) {
    while let Some(byte) = byte_stream.peek_u8() {
        if byte == b'#' {
            // skip the whole comment, including its newline
            while !byte_stream.eof() && byte_stream.get_u8() != b'\n' {}
        } else if byte.is_ascii_whitespace() {
            byte_stream.get_u8();
        } else {
            break;
        }
    }
}
