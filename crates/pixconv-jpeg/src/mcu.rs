/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Baseline scan decoding
//!
//! Blocks are entropy decoded, dequantized and transformed straight into the
//! component planes, post processing happens once the whole scan is read.
use pixconv_core::log::{debug, trace};

use crate::bitstream::BitReader;
use crate::decoder::{DecoderState, JpegDecoder};
use crate::errors::DecodeErrors;
use crate::huffman::HuffmanDecodeTable;
use crate::idct::idct_int;
use crate::marker::Marker;
use crate::misc::UN_ZIGZAG;
use crate::quant::dequantize;

/// Decode the DC difference and AC coefficients of one block
///
/// `block` receives the quantized coefficients in natural order.
fn decode_block(
    reader: &mut BitReader, dc_table: &HuffmanDecodeTable, ac_table: &HuffmanDecodeTable,
    dc_pred: &mut i32, block: &mut [i32; 64]
) -> Result<(), DecodeErrors> {
    block.fill(0);

    let size = reader.decode_symbol(dc_table)?;

    if size > 11 {
        return Err(DecodeErrors::HuffmanDecode(format!(
            "Invalid DC difference size {size}, expected at most 11"
        )));
    }
    *dc_pred = dc_pred.wrapping_add(reader.receive_extend(size)?);
    block[0] = *dc_pred;

    let mut k = 1;

    while k < 64 {
        let rs = reader.decode_symbol(ac_table)?;

        let run = usize::from(rs >> 4);
        let size = rs & 0x0F;

        if size == 0 {
            if run == 15 {
                // ZRL, sixteen zeroes
                k += 16;
                continue;
            }
            // EOB
            break;
        }
        k += run;

        if k > 63 {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "AC coefficient index {k} is outside the block"
            )));
        }
        block[UN_ZIGZAG[k]] = reader.receive_extend(size)?;
        k += 1;
    }
    Ok(())
}

impl<'a> JpegDecoder<'a> {
    /// Check that every component in the scan has its tables
    pub(crate) fn check_tables(&self) -> Result<(), DecodeErrors> {
        for &index in &self.z_order[..usize::from(self.num_scans)] {
            let component = &self.components[index];

            if self.dc_huffman_tables[component.dc_huff_table].is_none() {
                return Err(DecodeErrors::HuffmanDecode(format!(
                    "No DC table {} for component {}",
                    component.dc_huff_table, component.id
                )));
            }
            if self.ac_huffman_tables[component.ac_huff_table].is_none() {
                return Err(DecodeErrors::HuffmanDecode(format!(
                    "No AC table {} for component {}",
                    component.ac_huff_table, component.id
                )));
            }
            if self.qt_tables[usize::from(component.quantization_table_number)].is_none() {
                return Err(DecodeErrors::DqtError(format!(
                    "No quantization table {} for component {}",
                    component.quantization_table_number, component.id
                )));
            }
        }
        Ok(())
    }

    /// Decode all MCUs of the scan into the component planes
    ///
    /// On return the byte stream is positioned after the entropy coded data.
    pub(crate) fn decode_mcu_ycbcr_baseline(&mut self) -> Result<(), DecodeErrors> {
        self.check_tables()?;

        let mut reader = BitReader::new(self.stream.remaining_bytes());
        let mut block = [0_i32; 64];
        let mut expected_rst = 0_u8;

        let total_mcus = self.mcu_x * self.mcu_y;
        let scan = &self.z_order[..usize::from(self.num_scans)];

        trace!("Decoding {} MCUs", total_mcus);

        for mcu in 0..total_mcus {
            if self.restart_interval > 0 && mcu > 0 && mcu % self.restart_interval == 0 {
                reader.reset_for_restart(expected_rst)?;
                expected_rst = (expected_rst + 1) & 7;

                self.components.iter_mut().for_each(|c| c.dc_pred = 0);
            }
            let (mcu_col, mcu_row) = (mcu % self.mcu_x, mcu / self.mcu_x);

            for &index in scan {
                let component = &mut self.components[index];

                let (Some(dc_table), Some(ac_table), Some(qt_table)) = (
                    self.dc_huffman_tables[component.dc_huff_table].as_ref(),
                    self.ac_huffman_tables[component.ac_huff_table].as_ref(),
                    self.qt_tables[usize::from(component.quantization_table_number)].as_ref()
                ) else {
                    return Err(DecodeErrors::FormatStatic("Missing tables for component"));
                };
                let stride = component.width_stride;

                for v in 0..component.vertical_sample {
                    for h in 0..component.horizontal_sample {
                        decode_block(
                            &mut reader,
                            dc_table,
                            ac_table,
                            &mut component.dc_pred,
                            &mut block
                        )?;
                        dequantize(&mut block, qt_table);

                        let row = (mcu_row * component.vertical_sample + v) * 8;
                        let col = (mcu_col * component.horizontal_sample + h) * 8;

                        idct_int(&mut block, &mut component.plane[row * stride + col..], stride);
                    }
                }
            }
        }

        if reader.marker() == Some(Marker::EOI.to_u8()) {
            self.state = DecoderState::Done;
        }
        debug!("Entropy coded data is {} bytes", reader.position());

        self.stream.skip(reader.position())?;

        Ok(())
    }
}
