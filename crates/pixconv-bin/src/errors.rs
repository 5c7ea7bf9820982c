/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsString;
use std::fmt::{Debug, Display, Formatter};
use std::io;

use pixconv_jpeg::{DecodeErrors, EncodeErrors};
use pixconv_ppm::{PPMDecodeErrors, PPMEncodeErrors};

/// Everything that can stop a conversion
pub enum CliErrors {
    Io(io::Error),
    /// The same path was given as input and output
    SamePath(OsString),
    /// Number of input and output files differ
    ///
    /// inputs, outputs
    MismatchedFiles(usize, usize),
    /// The input does not start with the magic bytes of a known format
    UnknownInputFormat(OsString),
    /// The output extension does not name a known format
    UnknownOutputFormat(OsString),
    JpegDecode(DecodeErrors),
    JpegEncode(EncodeErrors),
    PpmDecode(PPMDecodeErrors),
    PpmEncode(PPMEncodeErrors),
    Json(serde_json::Error)
}

impl Debug for CliErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::SamePath(path) => {
                write!(f, "Cannot use {path:?} as both input and output")
            }
            Self::MismatchedFiles(inputs, outputs) => {
                write!(
                    f,
                    "Expected one output per input, found {inputs} inputs and {outputs} outputs"
                )
            }
            Self::UnknownInputFormat(path) => {
                write!(f, "Could not detect the format of {path:?}, expected a PPM or JPEG file")
            }
            Self::UnknownOutputFormat(path) => {
                write!(
                    f,
                    "Unknown output format for {path:?}, use a .ppm, .jpg or .jpeg extension"
                )
            }
            Self::JpegDecode(err) => write!(f, "{err:?}"),
            Self::JpegEncode(err) => write!(f, "{err:?}"),
            Self::PpmDecode(err) => write!(f, "{err:?}"),
            Self::PpmEncode(err) => write!(f, "{err:?}"),
            Self::Json(err) => write!(f, "{err}")
        }
    }
}

impl Display for CliErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for CliErrors {}

impl From<io::Error> for CliErrors {
    fn from(value: io::Error) -> Self {
        CliErrors::Io(value)
    }
}

impl From<DecodeErrors> for CliErrors {
    fn from(value: DecodeErrors) -> Self {
        CliErrors::JpegDecode(value)
    }
}

impl From<EncodeErrors> for CliErrors {
    fn from(value: EncodeErrors) -> Self {
        CliErrors::JpegEncode(value)
    }
}

impl From<PPMDecodeErrors> for CliErrors {
    fn from(value: PPMDecodeErrors) -> Self {
        CliErrors::PpmDecode(value)
    }
}

impl From<PPMEncodeErrors> for CliErrors {
    fn from(value: PPMEncodeErrors) -> Self {
        CliErrors::PpmEncode(value)
    }
}

impl From<serde_json::Error> for CliErrors {
    fn from(value: serde_json::Error) -> Self {
        CliErrors::Json(value)
    }
}
