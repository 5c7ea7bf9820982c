/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Baseline JPEG encoder
//!
//! The encoder runs in two stages. The transform stage converts the raster to
//! YCbCr, subsamples and pads the planes, then transforms and quantizes every
//! block into a coefficient buffer. The entropy stage walks the MCUs in order
//! and Huffman codes the coefficients, optionally after a counting pass that
//! builds optimal tables for the image.
use pixconv_core::bytestream::ZByteWriter;
use pixconv_core::log::{debug, trace};
use pixconv_core::options::{EncoderOptions, Subsampling};
use pixconv_core::raster::Raster;

use crate::bitstream::BitWriter;
use crate::color_convert::rgb_to_ycbcr;
use crate::errors::EncodeErrors;
use crate::fdct::forward_dct;
use crate::huffman::{HuffmanEncodeTable, HuffmanSpec};
use crate::marker::Marker;
use crate::misc::{ceil_div, UN_ZIGZAG};
use crate::quant::{quantize, QuantTable};

/// Largest quantized AC magnitude the standard tables can code
const MAX_AC: i32 = 1023;
/// Quantized DC values are kept in this range so differences need at most 11 bits
const DC_RANGE: (i32, i32) = (-1024, 1023);

/// Indices of the four Huffman tables
const DC_LUMA: usize = 0;
const AC_LUMA: usize = 1;
const DC_CHROMA: usize = 2;
const AC_CHROMA: usize = 3;

/// One component after the transform stage
struct ComponentBlocks {
    id:           u8,
    h_samp:       usize,
    v_samp:       usize,
    /// number of blocks in a row
    blocks_wide:  usize,
    /// quantized coefficients in natural order, one entry per block, row-major
    coefficients: Vec<[i32; 64]>,
    dc_table:     usize,
    ac_table:     usize,
    quant_table:  u8
}

/// Receiver of the symbols produced while walking the scan
trait SymbolSink {
    /// A Huffman coded `symbol` from `table` followed by `extra_bits` raw bits of `extra`
    fn emit(&mut self, table: usize, symbol: u8, extra: u16, extra_bits: u8);

    /// A restart marker with number `n` (0..=7)
    fn restart(&mut self, n: u8);
}

/// Counts symbol frequencies for building optimal tables
struct FrequencyCounter {
    frequencies: [[u32; 256]; 4]
}

impl SymbolSink for FrequencyCounter {
    fn emit(&mut self, table: usize, symbol: u8, _: u16, _: u8) {
        self.frequencies[table][usize::from(symbol)] += 1;
    }

    fn restart(&mut self, _: u8) {}
}

/// Writes Huffman codes into the scan
struct HuffmanWriter<'a> {
    writer: BitWriter<'a>,
    tables: [HuffmanEncodeTable; 4]
}

impl<'a> SymbolSink for HuffmanWriter<'a> {
    #[inline]
    fn emit(&mut self, table: usize, symbol: u8, extra: u16, extra_bits: u8) {
        self.tables[table].encode_symbol(&mut self.writer, symbol);
        self.writer.put_bits(extra, extra_bits);
    }

    fn restart(&mut self, n: u8) {
        self.writer.write_marker(Marker::RST(n));
    }
}

/// Return the magnitude category of `value` and its additional bits
///
/// Negative values are stored as the one's complement of their magnitude.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn magnitude(value: i32) -> (u8, u16) {
    let size = (32 - value.unsigned_abs().leading_zeros()) as u8;

    let bits = if value < 0 {
        (value - 1) & ((1 << size) - 1)
    } else {
        value
    };
    (size, bits as u16)
}

/// Huffman code one block, updating the DC predictor
fn encode_block<S: SymbolSink>(
    sink: &mut S, block: &[i32; 64], dc_pred: &mut i32, dc_table: usize, ac_table: usize
) {
    let diff = block[0] - *dc_pred;
    *dc_pred = block[0];

    let (size, bits) = magnitude(diff);
    sink.emit(dc_table, size, bits, size);

    let mut run = 0_u8;

    for &pos in &UN_ZIGZAG[1..64] {
        let value = block[pos];

        if value == 0 {
            run += 1;
            continue;
        }
        while run > 15 {
            // ZRL
            sink.emit(ac_table, 0xF0, 0, 0);
            run -= 16;
        }
        let (size, bits) = magnitude(value);
        sink.emit(ac_table, (run << 4) | size, bits, size);
        run = 0;
    }
    if run > 0 {
        // EOB
        sink.emit(ac_table, 0x00, 0, 0);
    }
}

/// Baseline JPEG encoder
///
/// # Example
/// ```
/// use pixconv_core::options::EncoderOptions;
/// use pixconv_core::raster::Raster;
/// use pixconv_jpeg::JpegEncoder;
///
/// let raster = Raster::filled(16, 16, [200, 30, 30]).unwrap();
/// let encoder = JpegEncoder::new(&raster, EncoderOptions::default().set_quality(80));
/// let jpeg = encoder.encode().unwrap();
///
/// assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
/// ```
pub struct JpegEncoder<'a> {
    raster:  &'a Raster,
    options: EncoderOptions
}

impl<'a> JpegEncoder<'a> {
    /// Create a new encoder for `raster`
    pub const fn new(raster: &'a Raster, options: EncoderOptions) -> JpegEncoder<'a> {
        JpegEncoder { raster, options }
    }

    /// Encode the raster into a JFIF file
    ///
    /// # Errors
    /// - [`EncodeErrors::ZeroDimensions`] if the raster has no pixels
    /// - [`EncodeErrors::TooLargeDimensions`] if a dimension exceeds 65535
    /// - [`EncodeErrors::InvalidQuality`] if quality is outside `1..=100`
    pub fn encode(&self) -> Result<Vec<u8>, EncodeErrors> {
        let (width, height) = self.raster.dimensions();

        if width == 0 || height == 0 {
            return Err(EncodeErrors::ZeroDimensions);
        }
        let (Ok(width16), Ok(height16)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(EncodeErrors::TooLargeDimensions(width, height));
        };
        let quality = self.options.quality();

        if !(1..=100).contains(&quality) {
            return Err(EncodeErrors::InvalidQuality(quality));
        }
        let quant_tables = [QuantTable::luma(quality), QuantTable::chroma(quality)];

        let (h_max, v_max) = self.options.subsampling().luma_factors();
        let mcu_x = ceil_div(width as usize, 8 * h_max);
        let mcu_y = ceil_div(height as usize, 8 * v_max);

        debug!(
            "Encoding {}x{} image, quality {}, {:?}, {} MCUs",
            width,
            height,
            quality,
            self.options.subsampling(),
            mcu_x * mcu_y
        );

        let components = self.transform(mcu_x, mcu_y, &quant_tables);

        let specs = if self.options.optimize_huffman() {
            let mut counter = FrequencyCounter {
                frequencies: [[0; 256]; 4]
            };
            self.walk_scan(&components, mcu_x, mcu_y, &mut counter);

            counter.frequencies.map(|freq| HuffmanSpec::from_frequencies(&freq))
        } else {
            [
                HuffmanSpec::std_dc_luma(),
                HuffmanSpec::std_ac_luma(),
                HuffmanSpec::std_dc_chroma(),
                HuffmanSpec::std_ac_chroma()
            ]
        };

        let mut out = Vec::with_capacity(1024 + (width as usize * height as usize) / 2);

        self.write_headers(&mut out, width16, height16, &quant_tables, &specs, &components);

        let start = out.len();
        let mut sink = HuffmanWriter {
            writer: BitWriter::new(&mut out),
            tables: [
                HuffmanEncodeTable::new(&specs[0]),
                HuffmanEncodeTable::new(&specs[1]),
                HuffmanEncodeTable::new(&specs[2]),
                HuffmanEncodeTable::new(&specs[3])
            ]
        };
        self.walk_scan(&components, mcu_x, mcu_y, &mut sink);
        sink.writer.flush();

        trace!("Scan data is {} bytes", sink.writer.len() - start);

        out.extend_from_slice(&[0xFF, Marker::EOI.to_u8()]);

        Ok(out)
    }

    /// Color convert, subsample, pad, transform and quantize every block
    fn transform(
        &self, mcu_x: usize, mcu_y: usize, quant_tables: &[QuantTable; 2]
    ) -> Vec<ComponentBlocks> {
        let (h_max, v_max) = self.options.subsampling().luma_factors();

        let width = self.raster.width() as usize;
        let height = self.raster.height() as usize;

        let padded_width = mcu_x * h_max * 8;
        let padded_height = mcu_y * v_max * 8;

        let mut planes = [
            vec![0.0_f32; padded_width * padded_height],
            vec![0.0_f32; padded_width * padded_height],
            vec![0.0_f32; padded_width * padded_height]
        ];

        for y in 0..height {
            let start = y * padded_width;
            let [luma, cb, cr] = &mut planes;

            rgb_to_ycbcr(
                self.raster.row(y as u32),
                &mut luma[start..start + width],
                &mut cb[start..start + width],
                &mut cr[start..start + width]
            );
        }
        // replicate the last column and row into the padding
        for plane in &mut planes {
            for row in plane.chunks_exact_mut(padded_width).take(height) {
                let last = row[width - 1];
                row[width..].fill(last);
            }
            let (image, padding) = plane.split_at_mut(height * padded_width);
            let last_row = &image[(height - 1) * padded_width..];

            for row in padding.chunks_exact_mut(padded_width) {
                row.copy_from_slice(last_row);
            }
        }
        let [luma, cb, cr] = planes;

        let mut components = Vec::with_capacity(3);

        components.push(ComponentBlocks {
            id:           1,
            h_samp:       h_max,
            v_samp:       v_max,
            blocks_wide:  padded_width / 8,
            coefficients: plane_to_blocks(&luma, padded_width, &quant_tables[0]),
            dc_table:     DC_LUMA,
            ac_table:     AC_LUMA,
            quant_table:  0
        });

        for (id, plane) in [(2, cb), (3, cr)] {
            let (plane, chroma_width) = match self.options.subsampling() {
                Subsampling::Yuv444 => (plane, padded_width),
                Subsampling::Yuv420 => (downsample(&plane, padded_width), padded_width / 2)
            };
            components.push(ComponentBlocks {
                id,
                h_samp: 1,
                v_samp: 1,
                blocks_wide: chroma_width / 8,
                coefficients: plane_to_blocks(&plane, chroma_width, &quant_tables[1]),
                dc_table: DC_CHROMA,
                ac_table: AC_CHROMA,
                quant_table: 1
            });
        }
        components
    }

    /// Walk MCUs in scan order feeding every symbol to `sink`
    fn walk_scan<S: SymbolSink>(
        &self, components: &[ComponentBlocks], mcu_x: usize, mcu_y: usize, sink: &mut S
    ) {
        let restart_interval = usize::from(self.options.restart_interval());
        let mut dc_preds = [0_i32; 3];
        let mut next_rst = 0_u8;

        for mcu in 0..mcu_x * mcu_y {
            if restart_interval > 0 && mcu > 0 && mcu % restart_interval == 0 {
                sink.restart(next_rst);
                next_rst = (next_rst + 1) & 7;
                dc_preds = [0; 3];
            }
            let (mcu_col, mcu_row) = (mcu % mcu_x, mcu / mcu_x);

            for (component, dc_pred) in components.iter().zip(dc_preds.iter_mut()) {
                for v in 0..component.v_samp {
                    for h in 0..component.h_samp {
                        let row = mcu_row * component.v_samp + v;
                        let col = mcu_col * component.h_samp + h;
                        let block = &component.coefficients[row * component.blocks_wide + col];

                        encode_block(sink, block, dc_pred, component.dc_table, component.ac_table);
                    }
                }
            }
        }
    }

    /// Write everything before the entropy coded data
    #[allow(clippy::cast_possible_truncation, clippy::too_many_arguments)]
    fn write_headers(
        &self, out: &mut Vec<u8>, width: u16, height: u16, quant_tables: &[QuantTable; 2],
        specs: &[HuffmanSpec; 4], components: &[ComponentBlocks]
    ) {
        let mut writer = ZByteWriter::new(out);

        write_marker(&mut writer, Marker::SOI);

        // APP0, JFIF 1.01 with a 1:1 aspect ratio
        write_marker(&mut writer, Marker::APP(0));
        writer.write_u16_be(16);
        writer.write_all(b"JFIF\0");
        writer.write_all(&[1, 1, 0]);
        writer.write_u16_be(1);
        writer.write_u16_be(1);
        writer.write_all(&[0, 0]);

        // DQT
        let dqt_length: u16 = quant_tables
            .iter()
            .map(|table| 1 + 64 * (u16::from(table.precision()) + 1))
            .sum();

        write_marker(&mut writer, Marker::DQT);
        writer.write_u16_be(2 + dqt_length);

        for (position, table) in quant_tables.iter().enumerate() {
            let precision = table.precision();
            writer.write_u8((precision << 4) | position as u8);

            for value in table.zigzag() {
                if precision == 0 {
                    writer.write_u8(value as u8);
                } else {
                    writer.write_u16_be(value);
                }
            }
        }

        // SOF0
        write_marker(&mut writer, Marker::SOF(0));
        writer.write_u16_be(8 + 3 * components.len() as u16);
        writer.write_u8(8);
        writer.write_u16_be(height);
        writer.write_u16_be(width);
        writer.write_u8(components.len() as u8);

        for component in components {
            writer.write_u8(component.id);
            writer.write_u8(((component.h_samp as u8) << 4) | component.v_samp as u8);
            writer.write_u8(component.quant_table);
        }

        // DHT, class and destination of each table
        let table_ids = [0x00, 0x10, 0x01, 0x11];
        let dht_length: usize = specs.iter().map(|x| 1 + x.encoded_len()).sum();

        write_marker(&mut writer, Marker::DHT);
        writer.write_u16_be((2 + dht_length) as u16);

        for (spec, id) in specs.iter().zip(table_ids) {
            writer.write_u8(id);
            writer.write_all(spec.bits());
            writer.write_all(spec.values());
        }

        let restart_interval = self.options.restart_interval();

        if restart_interval > 0 {
            write_marker(&mut writer, Marker::DRI);
            writer.write_u16_be(4);
            writer.write_u16_be(restart_interval);
        }

        // SOS
        write_marker(&mut writer, Marker::SOS);
        writer.write_u16_be(6 + 2 * components.len() as u16);
        writer.write_u8(components.len() as u8);

        for component in components {
            let dc = table_ids[component.dc_table] & 0x0F;
            let ac = table_ids[component.ac_table] & 0x0F;

            writer.write_u8(component.id);
            writer.write_u8((dc << 4) | ac);
        }
        // spectral selection 0..=63, no successive approximation
        writer.write_all(&[0, 63, 0]);

        trace!("Headers are {} bytes", writer.position());
    }
}

fn write_marker(writer: &mut ZByteWriter<'_>, marker: Marker) {
    writer.write_u8(0xFF);
    writer.write_u8(marker.to_u8());
}

/// Average 2x2 groups of samples
fn downsample(plane: &[f32], width: usize) -> Vec<f32> {
    let out_width = width / 2;
    let mut out = Vec::with_capacity(plane.len() / 4);

    for rows in plane.chunks_exact(width * 2) {
        let (top, bottom) = rows.split_at(width);

        for x in 0..out_width {
            let sum = top[2 * x] + top[2 * x + 1] + bottom[2 * x] + bottom[2 * x + 1];
            out.push(sum * 0.25);
        }
    }
    out
}

/// Split a plane into blocks, level shift, transform and quantize each
#[allow(clippy::cast_possible_truncation)]
fn plane_to_blocks(plane: &[f32], width: usize, table: &QuantTable) -> Vec<[i32; 64]> {
    let blocks_wide = width / 8;
    let blocks_high = plane.len() / width / 8;

    let mut blocks = Vec::with_capacity(blocks_wide * blocks_high);
    let mut samples = [0_i32; 64];

    for block_row in plane.chunks_exact(width * 8) {
        for bx in 0..blocks_wide {
            for (y, out) in samples.chunks_exact_mut(8).enumerate() {
                let row = &block_row[y * width + bx * 8..][..8];

                for (sample, &value) in out.iter_mut().zip(row) {
                    *sample = (value.round() as i32).clamp(0, 255) - 128;
                }
            }
            let mut block = quantize(&forward_dct(&samples), table);

            block[0] = block[0].clamp(DC_RANGE.0, DC_RANGE.1);
            block[1..]
                .iter_mut()
                .for_each(|x| *x = (*x).clamp(-MAX_AC, MAX_AC));

            blocks.push(block);
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use crate::encoder::{downsample, magnitude};

    #[test]
    fn magnitude_categories() {
        assert_eq!(magnitude(0), (0, 0));
        assert_eq!(magnitude(1), (1, 1));
        assert_eq!(magnitude(-1), (1, 0));
        assert_eq!(magnitude(-3), (2, 0b00));
        assert_eq!(magnitude(5), (3, 0b101));
        assert_eq!(magnitude(-5), (3, 0b010));
        assert_eq!(magnitude(2047), (11, 2047));
    }

    #[test]
    fn downsample_averages() {
        let plane = [0.0, 4.0, 8.0, 8.0, 4.0, 0.0, 8.0, 8.0];
        assert_eq!(downsample(&plane, 4), [2.0, 8.0]);
    }
}
