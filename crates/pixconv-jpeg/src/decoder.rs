/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Main image logic.
#![allow(clippy::doc_markdown)]

use pixconv_core::bytestream::ZByteReader;
use pixconv_core::colorspace::ColorSpace;
use pixconv_core::log::{debug, info, trace, warn};
use pixconv_core::options::DecoderOptions;
use pixconv_core::raster::Raster;

use crate::color_convert::{luma_to_rgb, ycbcr_to_rgb};
use crate::components::Components;
use crate::errors::{DecodeErrors, UnsupportedSchemes};
use crate::headers::{parse_app0, parse_dqt, parse_dri, parse_huffman, parse_sos, parse_start_of_frame};
use crate::huffman::HuffmanDecodeTable;
use crate::marker::Marker;
use crate::misc::{ceil_div, SOFMarkers};
use crate::quant::QuantTable;
use crate::upsampler::upsample_plane;

/// Maximum components
pub(crate) const MAX_COMPONENTS: usize = 4;

/// Where the decoder is in the stream
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DecoderState {
    /// Nothing read yet, the next two bytes must be the SOI marker
    ExpectSoi,
    /// Reading table and frame segments up to the start of scan
    ReadingMarkers,
    /// The scan header was read, entropy coded data follows
    ReadingScanData,
    /// The end of image marker was reached
    Done
}

/// A JPEG Decoder Instance.
#[allow(clippy::upper_case_acronyms)]
pub struct JpegDecoder<'a> {
    /// Struct to hold image information from SOI
    pub(crate) info:              ImageInfo,
    /// Quantization tables, indexed by their DQT destination
    pub(crate) qt_tables:         [Option<QuantTable>; MAX_COMPONENTS],
    /// DC Huffman Tables with a maximum of 4 tables for each  component
    pub(crate) dc_huffman_tables: [Option<HuffmanDecodeTable>; MAX_COMPONENTS],
    /// AC Huffman Tables with a maximum of 4 tables for each component
    pub(crate) ac_huffman_tables: [Option<HuffmanDecodeTable>; MAX_COMPONENTS],
    /// Image components, holds information like DC prediction and quantization
    /// tables of a component
    pub(crate) components:        Vec<Components>,
    /// maximum horizontal component of all channels in the image
    pub(crate) h_max:             usize,
    // maximum vertical component of all channels in the image
    pub(crate) v_max:             usize,
    /// Number of MCU's in the x plane
    pub(crate) mcu_x:             usize,
    /// Number of MCU's in the y plane
    pub(crate) mcu_y:             usize,
    /// Image input colorspace, YCbCr or Luma
    pub(crate) input_colorspace:  ColorSpace,
    /// Number of components in the scan
    pub(crate) num_scans:         u8,
    /// Order of components in the scan, as indices into `components`
    pub(crate) z_order:           [usize; MAX_COMPONENTS],
    /// restart markers
    pub(crate) restart_interval:  usize,
    pub(crate) seen_sof:          bool,
    pub(crate) state:             DecoderState,
    // decoder options
    pub(crate) options:           DecoderOptions,
    // byte-stream
    pub(crate) stream:            ZByteReader<'a>,
    // Indicate whether headers have been decoded
    pub(crate) headers_decoded:   bool
}

impl<'a> JpegDecoder<'a> {
    fn default(options: DecoderOptions, buffer: &'a [u8]) -> Self {
        JpegDecoder {
            info: ImageInfo::default(),
            qt_tables: [None, None, None, None],
            dc_huffman_tables: [None, None, None, None],
            ac_huffman_tables: [None, None, None, None],
            components: vec![],
            h_max: 1,
            v_max: 1,
            mcu_x: 0,
            mcu_y: 0,
            input_colorspace: ColorSpace::YCbCr,
            num_scans: 0,
            z_order: [0; MAX_COMPONENTS],
            restart_interval: 0,
            seen_sof: false,
            state: DecoderState::ExpectSoi,
            options,
            stream: ZByteReader::new(buffer),
            headers_decoded: false
        }
    }

    /// Create a new Decoder instance
    #[must_use]
    pub fn new(stream: &'a [u8]) -> JpegDecoder<'a> {
        JpegDecoder::default(DecoderOptions::default(), stream)
    }

    /// Create a new decoder with the specified options to be used for decoding
    /// an image
    #[must_use]
    pub fn new_with_options(options: DecoderOptions, buf: &'a [u8]) -> JpegDecoder<'a> {
        JpegDecoder::default(options, buf)
    }

    /// Decode a buffer already in memory
    ///
    /// The buffer should be a valid baseline jpeg file, grayscale images
    /// are returned with the luma replicated into all three channels.
    ///
    /// # Errors
    /// See [`DecodeErrors`] for the possible errors, no partial image is returned
    pub fn decode(&mut self) -> Result<Raster, DecodeErrors> {
        self.decode_headers_internal()?;

        if self.state == DecoderState::Done {
            return Err(DecodeErrors::FormatStatic("Image was already decoded"));
        }
        self.decode_mcu_ycbcr_baseline()?;
        self.finish_after_scan()?;

        self.post_process()
    }

    /// Read only headers from a jpeg image buffer
    ///
    /// This allows you to extract important information like
    /// image width and height without decoding the full image
    ///
    /// # Examples
    /// ```no_run
    /// use pixconv_jpeg::JpegDecoder;
    ///
    /// let img_data = std::fs::read("a_valid.jpeg").unwrap();
    /// let mut decoder = JpegDecoder::new(&img_data);
    /// decoder.decode_headers().unwrap();
    ///
    /// let info = decoder.info().unwrap();
    /// println!("Image is {}x{} with {} components", info.width, info.height, info.components);
    /// ```
    /// # Errors
    /// See DecodeErrors enum for list of possible errors during decoding
    pub fn decode_headers(&mut self) -> Result<(), DecodeErrors> {
        self.decode_headers_internal()
    }

    /// Returns the image information
    ///
    /// This **must** be called after a call to `decode` or
    /// `decode_headers` otherwise it will return None
    #[must_use]
    pub fn info(&self) -> Option<ImageInfo> {
        if !self.headers_decoded {
            return None;
        }
        Some(self.info.clone())
    }

    /// Current position of the decoder in the stream
    #[must_use]
    pub const fn state(&self) -> DecoderState {
        self.state
    }

    /// Get the width of the image as a u16
    ///
    /// Zero until headers are decoded
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.info.width
    }

    /// Get the height of the image as a u16
    ///
    /// Zero until headers are decoded
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.info.height
    }

    /// Decode Decoder headers
    ///
    /// This routine takes care of parsing supported headers from a Decoder
    /// image up to and including the start of scan.
    ///
    /// # Supported Headers
    ///  - APP(0) -> JFIF density
    ///  - SOF(0), SOF(1) with 8 bit samples
    ///  - DQT -> Quantization tables
    ///  - DHT -> Huffman tables
    ///  - DRI -> Restart interval
    ///  - SOS -> Start of Scan
    /// # Unsupported Headers
    ///  - SOF(n) -> Decoder images which are not baseline
    ///  - DAC -> Images using Arithmetic tables
    ///  - DHP, EXP -> Hierarchical images
    fn decode_headers_internal(&mut self) -> Result<(), DecodeErrors> {
        if self.headers_decoded {
            trace!("Headers already decoded");
            return Ok(());
        }
        if self.state == DecoderState::ExpectSoi {
            // First two bytes should be jpeg soi marker
            let magic_bytes = self.stream.get_u16_be_err()?;

            if magic_bytes != 0xffd8 {
                return Err(DecodeErrors::IllegalMagicBytes(magic_bytes));
            }
            self.state = DecoderState::ReadingMarkers;
        }

        let mut last_byte = 0;
        let mut bytes_before_marker = 0;

        loop {
            // read a byte
            let m = self.stream.get_u8_err()?;
            // Last byte should be 0xFF to confirm existence of a marker since markers look
            // like OxFF(some marker data)
            if last_byte == 0xFF && m != 0xFF {
                if bytes_before_marker > 1 {
                    if self.options.strict_mode() {
                        return Err(DecodeErrors::FormatStatic(
                            "[strict-mode]: Extra bytes between headers"
                        ));
                    }
                    warn!(
                        "Extra bytes {} before marker 0xFF{:X}",
                        bytes_before_marker - 1,
                        m
                    );
                }
                bytes_before_marker = 0;

                if let Some(n) = Marker::from_u8(m) {
                    self.parse_marker_inner(n)?;

                    if n == Marker::SOS {
                        self.setup_frame()?;
                        self.headers_decoded = true;
                        self.state = DecoderState::ReadingScanData;
                        return Ok(());
                    }
                } else {
                    self.skip_unknown_marker(m)?;
                }
                last_byte = 0;
                continue;
            }
            if m != 0xFF {
                bytes_before_marker += 1;
            }
            last_byte = m;
        }
    }

    /// Skip the segment of a marker we know nothing about
    fn skip_unknown_marker(&mut self, m: u8) -> Result<(), DecodeErrors> {
        if self.options.strict_mode() {
            return Err(DecodeErrors::Format(format!(
                "[strict-mode]: Unknown marker 0xFF{m:X}"
            )));
        }
        warn!("Marker 0xFF{:X} not known", m);

        self.skip_segment()
    }

    /// Skip a segment using its length field
    fn skip_segment(&mut self) -> Result<(), DecodeErrors> {
        let length = self.stream.get_u16_be_err()?;

        if length < 2 {
            return Err(DecodeErrors::Format(format!(
                "Found a marker with invalid length : {length}"
            )));
        }
        trace!("Skipping {} bytes", length - 2);
        self.stream.skip(usize::from(length - 2))?;

        Ok(())
    }

    pub(crate) fn parse_marker_inner(&mut self, m: Marker) -> Result<(), DecodeErrors> {
        match m {
            Marker::SOF(0 | 1) => {
                let marker =
                    SOFMarkers::from_int(u16::from_be_bytes([0xFF, m.to_u8()])).unwrap_or_default();

                info!("Image encoding scheme =`{:?}`", marker);
                // get components
                parse_start_of_frame(marker, self)?;
            }
            // Start of Frame Segments not supported
            Marker::SOF(v) => {
                let feature = UnsupportedSchemes::from_int(v + 0xC0);

                if let Some(feature) = feature {
                    return Err(DecodeErrors::Unsupported(feature));
                }

                return Err(DecodeErrors::Format(format!(
                    "Unsupported start of frame marker 0xFF{:X}",
                    v + 0xC0
                )));
            }
            Marker::APP(0) => {
                parse_app0(self)?;
            }
            Marker::APP(_) | Marker::COM | Marker::JPG(_) => {
                debug!("Skipping {:?} segment", m);
                self.skip_segment()?;
            }
            // Quantization tables
            Marker::DQT => {
                parse_dqt(self)?;
            }
            // Huffman tables
            Marker::DHT => {
                parse_huffman(self)?;
            }
            // Start of Scan Data
            Marker::SOS => {
                parse_sos(self)?;
            }
            Marker::DRI => {
                parse_dri(self)?;
            }
            Marker::EOI => return Err(DecodeErrors::FormatStatic("Premature End of image")),

            Marker::DAC => {
                return Err(DecodeErrors::Unsupported(
                    UnsupportedSchemes::ArithmeticCoding
                ));
            }
            Marker::DHP | Marker::EXP => {
                return Err(DecodeErrors::Unsupported(UnsupportedSchemes::Hierarchical));
            }
            Marker::DNL => {
                return Err(DecodeErrors::FormatStatic(
                    "Define number of lines segments are not supported"
                ));
            }
            // markers without a segment
            Marker::SOI | Marker::RST(_) | Marker::TEM => {
                warn!("Ignoring stray {:?} marker in headers", m);
            }
        }
        Ok(())
    }

    /// Compute MCU geometry and allocate component planes
    fn setup_frame(&mut self) -> Result<(), DecodeErrors> {
        self.h_max = self
            .components
            .iter()
            .map(|c| c.horizontal_sample)
            .max()
            .unwrap_or(1);
        self.v_max = self
            .components
            .iter()
            .map(|c| c.vertical_sample)
            .max()
            .unwrap_or(1);

        for component in &self.components {
            let ratio_x = self.h_max / component.horizontal_sample;
            let ratio_y = self.v_max / component.vertical_sample;

            if self.h_max % component.horizontal_sample != 0
                || self.v_max % component.vertical_sample != 0
                || ratio_x > 2
                || ratio_y > 2
            {
                return Err(DecodeErrors::Format(format!(
                    "Unsupported sampling factors ({},{}) for component {}, maximum is ({},{})",
                    component.horizontal_sample,
                    component.vertical_sample,
                    component.id,
                    self.h_max,
                    self.v_max
                )));
            }
        }

        let mcu_width = 8 * self.h_max;
        let mcu_height = 8 * self.v_max;

        self.mcu_x = ceil_div(usize::from(self.info.width), mcu_width);
        self.mcu_y = ceil_div(usize::from(self.info.height), mcu_height);

        debug!(
            "MCU size {}x{}, {} MCUs per row, {} MCU rows",
            mcu_width,
            mcu_height,
            self.mcu_x,
            self.mcu_y
        );

        for component in &mut self.components {
            component.width_stride = self.mcu_x * component.horizontal_sample * 8;
            let rows = self.mcu_y * component.vertical_sample * 8;

            component.plane = vec![0; component.width_stride * rows];
            component.dc_pred = 0;
        }
        Ok(())
    }

    /// Find the end of image marker after the scan
    ///
    /// Table segments after the scan are skipped, another scan is not supported.
    fn finish_after_scan(&mut self) -> Result<(), DecodeErrors> {
        if self.state == DecoderState::Done {
            return Ok(());
        }
        loop {
            let byte = self.stream.get_u8_err()?;

            if byte != 0xFF {
                continue;
            }
            let mut m = self.stream.get_u8_err()?;

            while m == 0xFF {
                m = self.stream.get_u8_err()?;
            }
            match Marker::from_u8(m) {
                Some(Marker::EOI) => {
                    self.state = DecoderState::Done;

                    if !self.stream.eof() {
                        debug!("{} bytes after end of image", self.stream.remaining());
                    }
                    return Ok(());
                }
                Some(Marker::SOS) => {
                    return Err(DecodeErrors::Unsupported(UnsupportedSchemes::MultipleScans));
                }
                Some(Marker::RST(_) | Marker::TEM | Marker::SOI) => {}
                Some(marker) => {
                    warn!("Skipping {:?} segment after the scan", marker);
                    self.skip_segment()?;
                }
                None if m == 0x00 => {
                    // stuffed byte in trailing data
                }
                None => self.skip_unknown_marker(m)?
            }
        }
    }

    /// Upsample chroma, convert colors and crop into a raster
    fn post_process(&mut self) -> Result<Raster, DecodeErrors> {
        let width = usize::from(self.info.width);
        let height = usize::from(self.info.height);

        let full_width = self.mcu_x * self.h_max * 8;
        let full_height = self.mcu_y * self.v_max * 8;

        let mut pixels = vec![0_u8; width * height * 3];

        if self.input_colorspace.is_grayscale() {
            let plane = &self.components[0].plane;
            let stride = self.components[0].width_stride;

            for (row, out) in plane
                .chunks_exact(stride)
                .zip(pixels.chunks_exact_mut(width * 3))
            {
                luma_to_rgb(&row[..width], out);
            }
        } else {
            let mut planes = Vec::with_capacity(3);

            for component in &mut self.components {
                let ratio_x = self.h_max / component.horizontal_sample;
                let ratio_y = self.v_max / component.vertical_sample;
                let plane = core::mem::take(&mut component.plane);

                if (ratio_x, ratio_y) == (1, 1) {
                    planes.push(plane);
                } else {
                    trace!("Upsampling component {} by {}x{}", component.id, ratio_x, ratio_y);

                    planes.push(upsample_plane(
                        &plane,
                        component.width_stride,
                        plane.len() / component.width_stride,
                        ratio_x,
                        ratio_y
                    ));
                }
            }
            debug_assert!(planes.iter().all(|p| p.len() == full_width * full_height));

            for (y, out) in pixels.chunks_exact_mut(width * 3).enumerate() {
                let start = y * full_width;
                let end = start + width;

                ycbcr_to_rgb(
                    &planes[0][start..end],
                    &planes[1][start..end],
                    &planes[2][start..end],
                    out
                );
            }
        }
        Ok(Raster::new(
            u32::from(self.info.width),
            u32::from(self.info.height),
            pixels
        )?)
    }
}

/// A struct representing Image Information
#[derive(Default, Clone, Debug, Eq, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct ImageInfo {
    /// Width of the image
    pub width:         u16,
    /// Height of image
    pub height:        u16,
    /// Start of frame markers
    pub sof:           SOFMarkers,
    /// Number of components
    pub components:    u8,
    /// Whether a JFIF APP0 segment was found
    pub jfif:          bool,
    /// JFIF density units, 0 for an aspect ratio, 1 for dots per inch and
    /// 2 for dots per centimeter
    pub density_units: u8,
    /// Horizontal pixel density
    pub x_density:     u16,
    /// Vertical pixel density
    pub y_density:     u16
}
