/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decode Decoder markers/segments
//!
//! This file deals with decoding header information in a jpeg file
//!
use pixconv_core::colorspace::ColorSpace;
use pixconv_core::log::{debug, trace, warn};

use crate::components::Components;
use crate::decoder::{JpegDecoder, MAX_COMPONENTS};
use crate::errors::{DecodeErrors, UnsupportedSchemes};
use crate::huffman::{HuffmanDecodeTable, HuffmanSpec};
use crate::misc::SOFMarkers;
use crate::quant::QuantTable;

///**B.2.4.2 Huffman table-specification syntax**
pub(crate) fn parse_huffman(decoder: &mut JpegDecoder) -> Result<(), DecodeErrors> {
    // Read the length of the Huffman table
    let mut dht_length = usize::from(
        decoder
            .stream
            .get_u16_be_err()?
            .checked_sub(2)
            .ok_or(DecodeErrors::FormatStatic("Invalid Huffman length in image"))?
    );

    while dht_length > 16 {
        // HT information
        let ht_info = decoder.stream.get_u8_err()?;
        // upper nibble indicates whether the huffman encoding is DC or AC type
        let dc_or_ac = (ht_info >> 4) & 0xF;
        // Indicate the position of this table, should be less than 4;
        let index = usize::from(ht_info & 0xF);

        if index >= MAX_COMPONENTS {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Invalid DHT index {index}, expected between 0 and 3"
            )));
        }
        if dc_or_ac > 1 {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Invalid DHT position {dc_or_ac}, should be 0 or 1"
            )));
        }
        let mut num_symbols = [0_u8; 16];

        decoder.stream.read_exact_bytes(&mut num_symbols)?;

        dht_length -= 1 + 16;

        let symbols_sum: usize = num_symbols.iter().map(|f| usize::from(*f)).sum();

        if symbols_sum > dht_length {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Excessive Huffman table of length {symbols_sum} found when header length is {dht_length}"
            )));
        }
        dht_length -= symbols_sum;

        let symbols = decoder.stream.get_as_ref(symbols_sum)?;
        let table = HuffmanDecodeTable::new(&HuffmanSpec::new(num_symbols, symbols)?)?;

        trace!("Assigning {} Huffman table {index} with {symbols_sum} symbols",
            if dc_or_ac == 0 { "DC" } else { "AC" });

        if dc_or_ac == 0 {
            decoder.dc_huffman_tables[index] = Some(table);
        } else {
            decoder.ac_huffman_tables[index] = Some(table);
        }
    }

    if dht_length > 0 {
        return Err(DecodeErrors::FormatStatic("Bogus Huffman table definition"));
    }

    Ok(())
}

///**B.2.4.1 Quantization table-specification syntax**
pub(crate) fn parse_dqt(img: &mut JpegDecoder) -> Result<(), DecodeErrors> {
    let mut qt_length = usize::from(img.stream.get_u16_be_err()?.checked_sub(2).ok_or(
        DecodeErrors::FormatStatic("Invalid DQT length. Length should be greater than 2")
    )?);

    // A single DQT header may have multiple QT's
    while qt_length > 0 {
        let qt_info = img.stream.get_u8_err()?;
        // 0 = 8 bit otherwise 16 bit dqt
        let precision = usize::from(qt_info >> 4);
        // last 4 bits give us position
        let table_position = usize::from(qt_info & 0x0f);
        let precision_value = 64 * (precision + 1);

        if precision_value + 1 > qt_length {
            return Err(DecodeErrors::DqtError(format!("Invalid QT table bytes left :{}. Too small to construct a valid qt table which should be {} long", qt_length, precision_value + 1)));
        }

        let mut qt_values = [0_u16; 64];

        match precision {
            0 => {
                for value in &mut qt_values {
                    *value = u16::from(img.stream.get_u8_err()?);
                }
            }
            1 => {
                // 16 bit quantization tables
                for value in &mut qt_values {
                    *value = img.stream.get_u16_be_err()?;
                }
            }
            _ => {
                return Err(DecodeErrors::DqtError(format!(
                    "Expected QT precision value of either 0 or 1, found {precision:?}"
                )));
            }
        }
        qt_length -= precision_value + 1;

        if table_position >= MAX_COMPONENTS {
            return Err(DecodeErrors::DqtError(format!(
                "Too large table position for QT :{table_position}, expected between 0 and 3"
            )));
        }

        trace!("Assigning qt table {table_position} with precision {precision}");
        img.qt_tables[table_position] = Some(QuantTable::from_zigzag(&qt_values));
    }

    Ok(())
}

/// Section:`B.2.2 Frame header syntax`
pub(crate) fn parse_start_of_frame(
    sof: SOFMarkers, img: &mut JpegDecoder
) -> Result<(), DecodeErrors> {
    if img.seen_sof {
        return Err(DecodeErrors::SofError(
            "Two Start of Frame Markers".to_string()
        ));
    }
    // Get length of the frame header
    let length = img.stream.get_u16_be_err()?;
    // usually 8, but can be 12 and 16, we currently support only 8
    let dt_precision = img.stream.get_u8_err()?;

    if dt_precision != 8 {
        if sof == SOFMarkers::ExtendedSequentialHuffman {
            return Err(DecodeErrors::Unsupported(
                UnsupportedSchemes::ExtendedSequentialHuffman
            ));
        }
        return Err(DecodeErrors::SofError(format!(
            "The library can only parse 8-bit images, the image has {dt_precision} bits of precision"
        )));
    }

    let img_height = img.stream.get_u16_be_err()?;
    let img_width = img.stream.get_u16_be_err()?;

    trace!("Image width  :{}", img_width);
    trace!("Image height :{}", img_height);

    // Check image width or height is zero
    if img_width == 0 || img_height == 0 {
        return Err(DecodeErrors::ZeroError);
    }

    if usize::from(img_width) > img.options.max_width() {
        return Err(DecodeErrors::LargeDimensions(
            img.options.max_width(),
            usize::from(img_width)
        ));
    }
    if usize::from(img_height) > img.options.max_height() {
        return Err(DecodeErrors::LargeDimensions(
            img.options.max_height(),
            usize::from(img_height)
        ));
    }

    // Number of components for the image.
    let num_components = img.stream.get_u8_err()?;

    let expected = 8 + 3 * u16::from(num_components);
    // length should be equal to num components
    if length != expected {
        return Err(DecodeErrors::SofError(format!(
            "Length of start of frame differs from expected {expected},value is {length}"
        )));
    }

    img.input_colorspace = match num_components {
        1 => {
            debug!("Single component image, treating it as Luma");
            ColorSpace::Luma
        }
        3 => ColorSpace::YCbCr,
        _ => {
            return Err(DecodeErrors::SofError(format!(
                "Images with {num_components} components are not supported, expected 1 or 3"
            )));
        }
    };

    trace!("Image components : {}", num_components);

    let mut components = Vec::with_capacity(usize::from(num_components));
    let mut temp = [0; 3];

    for pos in 0..num_components {
        // read 3 bytes for each component
        img.stream.read_exact_bytes(&mut temp)?;

        let component = Components::from(temp, pos)?;

        if components.iter().any(|c: &Components| c.id == component.id) {
            return Err(DecodeErrors::SofError(format!(
                "Duplicate component id {} in start of frame",
                component.id
            )));
        }
        components.push(component);
    }
    if num_components == 1 {
        // a single component scan is never interleaved, one block is one MCU
        components[0].horizontal_sample = 1;
        components[0].vertical_sample = 1;
    }

    img.info.width = img_width;
    img.info.height = img_height;
    img.info.components = num_components;
    img.info.sof = sof;

    img.components = components;
    img.seen_sof = true;

    Ok(())
}

/// Parse a start of scan data
pub(crate) fn parse_sos(image: &mut JpegDecoder) -> Result<(), DecodeErrors> {
    if !image.seen_sof {
        return Err(DecodeErrors::SosError(
            "Start of scan found before a start of frame".to_string()
        ));
    }
    // Scan header length
    let ls = usize::from(image.stream.get_u16_be_err()?);
    // Number of image components in scan
    let ns = image.stream.get_u8_err()?;

    let smallest_size = 6 + 2 * usize::from(ns);

    if ls != smallest_size {
        return Err(DecodeErrors::SosError(format!(
            "Bad SOS length {ls},corrupt jpeg"
        )));
    }

    // Check number of components.
    if !(1..5).contains(&ns) {
        return Err(DecodeErrors::SosError(format!(
            "Invalid number of components in start of scan {ns}, expected in range 1..5"
        )));
    }
    if usize::from(ns) != image.components.len() {
        // the remaining components would follow in other scans
        return Err(DecodeErrors::Unsupported(UnsupportedSchemes::MultipleScans));
    }

    let mut seen = [false; MAX_COMPONENTS];

    for i in 0..usize::from(ns) {
        let id = image.stream.get_u8_err()?;
        // DC and AC huffman table position
        // top 4 bits contain dc huffman destination table
        // lower four bits contain ac huffman destination table
        let y = image.stream.get_u8_err()?;

        let j = image
            .components
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| {
                DecodeErrors::SosError(format!(
                    "Invalid component id {}, expected one of {:?}",
                    id,
                    image.components.iter().map(|c| c.id).collect::<Vec<_>>()
                ))
            })?;

        if seen[j] {
            return Err(DecodeErrors::SosError(format!(
                "Duplicate ID {id} seen twice in the same scan"
            )));
        }
        seen[j] = true;

        let dc_huff_table = usize::from((y >> 4) & 0xF);
        let ac_huff_table = usize::from(y & 0xF);

        if dc_huff_table >= MAX_COMPONENTS || ac_huff_table >= MAX_COMPONENTS {
            return Err(DecodeErrors::SosError(format!(
                "Invalid Huffman table selectors {dc_huff_table}/{ac_huff_table} for component {id}"
            )));
        }
        let component = &mut image.components[j];
        component.dc_huff_table = dc_huff_table;
        component.ac_huff_table = ac_huff_table;
        image.z_order[i] = j;

        trace!(
            "Assigned huffman tables {}/{} to component {j}, id={}",
            dc_huff_table,
            ac_huff_table,
            id
        );
    }
    image.num_scans = ns;

    // Start of spectral / predictor selection, end of spectral selection
    // and successive approximation, fixed for baseline images
    let spec_start = image.stream.get_u8_err()?;
    let spec_end = image.stream.get_u8_err()?;
    let bit_approx = image.stream.get_u8_err()?;

    trace!("Ss={}, Se={} Ah={} Al={}", spec_start, spec_end, bit_approx >> 4, bit_approx & 0xF);

    if spec_start != 0 || spec_end != 63 || bit_approx != 0 {
        if image.options.strict_mode() {
            return Err(DecodeErrors::SosError(format!(
                "Invalid spectral selection {spec_start}..={spec_end} / approximation {bit_approx:#04X} for a sequential image"
            )));
        }
        warn!("Ignoring spectral selection parameters of a sequential scan");
    }
    Ok(())
}

/// **B.2.4.4 Restart interval definition syntax**
pub(crate) fn parse_dri(image: &mut JpegDecoder) -> Result<(), DecodeErrors> {
    if image.stream.get_u16_be_err()? != 4 {
        return Err(DecodeErrors::FormatStatic("Bad DRI length, Corrupt JPEG"));
    }
    image.restart_interval = usize::from(image.stream.get_u16_be_err()?);

    debug!("Restart interval {}", image.restart_interval);

    Ok(())
}

/// Parse the JFIF APP0 segment, other APP0 segments are skipped
pub(crate) fn parse_app0(image: &mut JpegDecoder) -> Result<(), DecodeErrors> {
    let length = usize::from(image.stream.get_u16_be_err()?.checked_sub(2).ok_or(
        DecodeErrors::FormatStatic("Invalid APP0 length")
    )?);
    let segment = image.stream.get_as_ref(length)?;

    // identifier, version, units, x and y density
    if segment.len() >= 12 && segment.starts_with(b"JFIF\0") {
        let (major, minor) = (segment[5], segment[6]);

        image.info.density_units = segment[7];
        image.info.x_density = u16::from_be_bytes([segment[8], segment[9]]);
        image.info.y_density = u16::from_be_bytes([segment[10], segment[11]]);
        image.info.jfif = true;

        debug!("JFIF version {}.{:02}", major, minor);
        trace!(
            "Density {}x{}, units {}",
            image.info.x_density,
            image.info.y_density,
            image.info.density_units
        );
    } else {
        debug!("Skipping non JFIF APP0 segment of {} bytes", length);
    }
    Ok(())
}
