/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Contains most common errors that may be encountered in decoding and encoding a JPEG image

use core::fmt::{Debug, Display, Formatter};

use pixconv_core::bytestream::ByteIoError;
use pixconv_core::raster::RasterError;

use crate::misc::{
    START_OF_FRAME_EXT_AR, START_OF_FRAME_EXT_SEQ, START_OF_FRAME_LOS_SEQ,
    START_OF_FRAME_LOS_SEQ_AR, START_OF_FRAME_PROG_DCT, START_OF_FRAME_PROG_DCT_AR
};

/// Common Decode errors
#[allow(clippy::module_name_repetitions)]
#[non_exhaustive]
pub enum DecodeErrors {
    /// Image does not start with the SOI marker, contains the first two bytes found
    IllegalMagicBytes(u16),
    /// Any other thing we do not know
    Format(String),
    /// Any other thing we do not know but we
    /// don't need to allocate space on the heap
    FormatStatic(&'static str),
    /// Problems with the Huffman Tables in a Decoder file
    HuffmanDecode(String),
    /// Image has zero width or height
    ZeroError,
    /// Discrete Quantization Tables error
    DqtError(String),
    /// Start of scan errors
    SosError(String),
    /// Start of frame errors
    SofError(String),
    /// UnsupportedImages
    Unsupported(UnsupportedSchemes),
    /// Image dimensions are larger than the configured limits
    ///
    /// limit, found
    LargeDimensions(usize, usize),
    /// The data ended before the image was complete, including a missing
    /// end of image marker
    Truncated,
    /// A `0xFF` byte in scan data was followed by a value that is neither
    /// stuffing nor a restart/end of image marker
    Bitstream(u8),
    /// No Huffman code matched within 16 bits
    InvalidCode,
    /// The decoded pixels could not form a raster
    Raster(RasterError)
}

impl From<ByteIoError> for DecodeErrors {
    fn from(value: ByteIoError) -> Self {
        match value {
            ByteIoError::NotEnoughBytes(..) => DecodeErrors::Truncated,
            ByteIoError::Generic(err) => DecodeErrors::FormatStatic(err)
        }
    }
}

impl From<RasterError> for DecodeErrors {
    fn from(value: RasterError) -> Self {
        DecodeErrors::Raster(value)
    }
}

impl Debug for DecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match &self {
            Self::Format(ref a) => write!(f, "{a:?}"),
            Self::FormatStatic(a) => write!(f, "{:?}", &a),

            Self::HuffmanDecode(ref reason) => {
                write!(f, "Error decoding huffman values: {reason}")
            }
            Self::ZeroError => write!(f, "Image width or height is set to zero, cannot continue"),
            Self::DqtError(ref reason) => write!(f, "Error parsing DQT segment. Reason:{reason}"),
            Self::SosError(ref reason) => write!(f, "Error parsing SOS Segment. Reason:{reason}"),
            Self::SofError(ref reason) => write!(f, "Error parsing SOF segment. Reason:{reason}"),
            Self::IllegalMagicBytes(bytes) => {
                write!(f, "Error parsing image. Illegal start bytes:{bytes:X}")
            }
            Self::Unsupported(ref image_type) => {
                write!(f, "{image_type:?}")
            }
            Self::LargeDimensions(limit, found) => {
                write!(
                    f,
                    "Too large dimensions, expected a value less than {limit} but found {found}"
                )
            }
            Self::Truncated => write!(f, "Image data ended before the end of image marker"),
            Self::Bitstream(byte) => {
                write!(f, "Unexpected marker 0xFF{byte:02X} inside scan data")
            }
            Self::InvalidCode => write!(f, "Bad Huffman code in scan data"),
            Self::Raster(err) => write!(f, "{err:?}")
        }
    }
}

impl Display for DecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for DecodeErrors {}

/// Contains Unsupported/Yet-to-be supported Decoder image encoding types.
#[derive(Eq, PartialEq, Copy, Clone)]
pub enum UnsupportedSchemes {
    /// SOF_1 Extended sequential DCT, Huffman coding with 12 bit samples
    ExtendedSequentialHuffman,
    /// SOF_2 Progressive DCT, Huffman coding
    ProgressiveDctHuffman,
    /// Lossless (sequential), huffman coding,
    LosslessHuffman,
    /// Extended sequential DEC, arithmetic coding
    ExtendedSequentialDctArithmetic,
    /// Progressive DCT, arithmetic coding,
    ProgressiveDctArithmetic,
    /// Lossless ( sequential), arithmetic coding
    LosslessArithmetic,
    /// Differential (hierarchical) frames, SOF 5,6,7,13,14,15
    Hierarchical,
    /// A DAC segment was found
    ArithmeticCoding,
    /// More than one scan in a single frame
    MultipleScans
}

impl Debug for UnsupportedSchemes {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match &self {
            Self::ExtendedSequentialHuffman => {
                write!(f, "The library cannot yet decode images encoded using Extended Sequential Huffman  encoding scheme with more than 8 bits of precision.")
            }
            Self::ProgressiveDctHuffman => {
                write!(f, "The library cannot decode images encoded using the Progressive DCT Huffman encoding scheme.")
            }
            Self::LosslessHuffman => {
                write!(f, "The library cannot yet decode images encoded with Lossless Huffman encoding scheme")
            }
            Self::ExtendedSequentialDctArithmetic => {
                write!(f,"The library cannot yet decode Images Encoded with Extended Sequential DCT Arithmetic scheme")
            }
            Self::ProgressiveDctArithmetic => {
                write!(f,"The library cannot yet decode images encoded with Progressive DCT Arithmetic scheme")
            }
            Self::LosslessArithmetic => {
                write!(f,"The library cannot yet decode images encoded with Lossless Arithmetic encoding scheme")
            }
            Self::Hierarchical => {
                write!(f, "The library cannot decode hierarchical (differential) images")
            }
            Self::ArithmeticCoding => {
                write!(f, "The library cannot decode arithmetic coded images")
            }
            Self::MultipleScans => {
                write!(f, "The library can only decode images stored in a single scan")
            }
        }
    }
}

impl UnsupportedSchemes {
    /// Create an unsupported scheme from an integer
    ///
    /// # Returns
    /// `Some(UnsupportedScheme)` if the int refers to a specific scheme,
    /// otherwise returns `None`
    #[must_use]
    pub fn from_int(int: u8) -> Option<UnsupportedSchemes> {
        let int = u16::from_be_bytes([0xff, int]);

        match int {
            START_OF_FRAME_PROG_DCT => Some(Self::ProgressiveDctHuffman),
            START_OF_FRAME_LOS_SEQ => Some(Self::LosslessHuffman),
            START_OF_FRAME_LOS_SEQ_AR => Some(Self::LosslessArithmetic),
            START_OF_FRAME_PROG_DCT_AR => Some(Self::ProgressiveDctArithmetic),
            START_OF_FRAME_EXT_AR => Some(Self::ExtendedSequentialDctArithmetic),
            START_OF_FRAME_EXT_SEQ => Some(Self::ExtendedSequentialHuffman),
            0xffc5..=0xffc7 | 0xffcd..=0xffcf => Some(Self::Hierarchical),
            _ => None
        }
    }
}

/// Errors possible during encoding
#[allow(clippy::module_name_repetitions)]
#[non_exhaustive]
pub enum EncodeErrors {
    /// Image width or height is zero
    ZeroDimensions,
    /// Width or height does not fit in the 16 bits of a frame header
    TooLargeDimensions(u32, u32),
    /// Quality outside 1..=100
    InvalidQuality(u8)
}

impl Debug for EncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroDimensions => write!(f, "Cannot encode an image with zero width or height"),
            Self::TooLargeDimensions(width, height) => {
                write!(
                    f,
                    "Image dimensions {width}x{height} exceed the JPEG limit of 65535 pixels"
                )
            }
            Self::InvalidQuality(quality) => {
                write!(f, "Invalid quality {quality}, expected a value between 1 and 100")
            }
        }
    }
}

impl Display for EncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for EncodeErrors {}
