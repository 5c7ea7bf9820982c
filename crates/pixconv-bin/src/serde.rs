/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsString;

use pixconv_core::colorspace::ColorSpace;
use pixconv_jpeg::ImageInfo;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::formats::ImageFormat;

/// Header information of one input file
#[derive(Debug)]
pub struct Metadata {
    file:       OsString,
    size:       u64,
    format:     ImageFormat,
    width:      usize,
    height:     usize,
    colorspace: ColorSpace,
    jpeg:       Option<ImageInfo>
}

impl Metadata {
    pub fn new_ppm(
        file: OsString, size: u64, (width, height): (usize, usize), colorspace: ColorSpace
    ) -> Metadata {
        Metadata {
            file,
            size,
            format: ImageFormat::Ppm,
            width,
            height,
            colorspace,
            jpeg: None
        }
    }

    pub fn new_jpeg(file: OsString, size: u64, info: ImageInfo) -> Metadata {
        let colorspace = if info.components == 1 {
            ColorSpace::Luma
        } else {
            ColorSpace::YCbCr
        };
        Metadata {
            file,
            size,
            format: ImageFormat::Jpeg,
            width: usize::from(info.width),
            height: usize::from(info.height),
            colorspace,
            jpeg: Some(info)
        }
    }
}

/// JPEG specific fields
struct JpegFields<'a>(&'a ImageInfo);

impl<'a> Serialize for JpegFields<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let info = self.0;
        let mut state = serializer.serialize_struct("JpegInfo", 5)?;

        state.serialize_field("sof", &format!("{:?}", info.sof))?;
        state.serialize_field("jfif", &info.jfif)?;
        state.serialize_field("density_units", &info.density_units)?;
        state.serialize_field("x_density", &info.x_density)?;
        state.serialize_field("y_density", &info.y_density)?;

        state.end()
    }
}

impl Serialize for Metadata {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("ImageMetadata", 8)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("format", self.format.name())?;
        state.serialize_field("width", &self.width)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("colorspace", &self.colorspace)?;
        state.serialize_field("components", &self.colorspace.num_components())?;
        state.serialize_field("jpeg", &self.jpeg.as_ref().map(JpegFields))?;

        state.end()
    }
}
