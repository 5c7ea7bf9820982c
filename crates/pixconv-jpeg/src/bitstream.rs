/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Bit level reading and writing of entropy coded segments
//!
//! Both directions handle the JPEG byte stuffing rule, a `0xFF` byte
//! in scan data is always followed by a `0x00` byte which is not part of
//! the data.
//!
//! Bits are written and read MSB first.

use pixconv_core::log::warn;

use crate::errors::DecodeErrors;
use crate::huffman::{HuffmanDecodeTable, FAST_BITS};
use crate::marker::Marker;

/// Writes bits into a byte buffer, stuffing `0x00` after every `0xFF`
pub struct BitWriter<'a> {
    buffer:    &'a mut Vec<u8>,
    /// bits not yet emitted, right aligned
    bits:      u32,
    bits_used: u8
}

impl<'a> BitWriter<'a> {
    pub fn new(buffer: &'a mut Vec<u8>) -> BitWriter<'a> {
        BitWriter {
            buffer,
            bits: 0,
            bits_used: 0
        }
    }

    /// Append the low `nbits` bits of `value`, MSB first
    ///
    /// `nbits` may be zero, in which case nothing is written
    ///
    /// # Example
    /// ```
    /// use pixconv_jpeg::bitstream::BitWriter;
    ///
    /// let mut out = vec![];
    /// let mut writer = BitWriter::new(&mut out);
    /// writer.put_bits(0b1111_1111, 8);
    /// writer.put_bits(0b101, 3);
    /// writer.flush();
    ///
    /// assert_eq!(out, [0xFF, 0x00, 0b1011_1111]);
    /// ```
    #[inline]
    pub fn put_bits(&mut self, value: u16, nbits: u8) {
        debug_assert!(nbits <= 16);

        if nbits == 0 {
            return;
        }
        let mask = (1_u32 << nbits) - 1;

        self.bits = (self.bits << nbits) | (u32::from(value) & mask);
        self.bits_used += nbits;

        while self.bits_used >= 8 {
            self.bits_used -= 8;

            let byte = (self.bits >> self.bits_used) as u8;
            self.emit_byte(byte);
        }
        self.bits &= (1 << self.bits_used) - 1;
    }

    #[inline]
    fn emit_byte(&mut self, byte: u8) {
        self.buffer.push(byte);

        if byte == 0xFF {
            self.buffer.push(0x00);
        }
    }

    /// Pad a partially filled byte with 1-bits and emit it
    pub fn flush(&mut self) {
        if self.bits_used > 0 {
            let remaining = 8 - self.bits_used;

            self.put_bits((1 << remaining) - 1, remaining);
        }
    }

    /// Flush pending bits then write `marker` unstuffed
    ///
    /// Used for restart markers in the middle of a scan.
    pub fn write_marker(&mut self, marker: Marker) {
        self.flush();
        self.buffer.push(0xFF);
        self.buffer.push(marker.to_u8());
    }

    /// Number of bytes written so far, including stuffing
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Reads bits from an entropy coded segment
///
/// On `0xFF 0x00` the stuffed zero is discarded. On a restart or end of
/// image marker the reader stops consuming input and supplies zero bits,
/// the marker is kept for the decoder to inspect via [`BitReader::marker`].
/// Reading past any other marker is reported as
/// [`DecodeErrors::Bitstream`], and reading past RST/EOI or the end of data
/// as [`DecodeErrors::Truncated`], but only once those bits are actually needed.
pub struct BitReader<'a> {
    data:      &'a [u8],
    position:  usize,
    /// bit buffer, valid bits are the low `bits_left` bits
    buffer:    u64,
    bits_left: u8,
    /// number of low bits in `buffer` which are fill and may not be consumed
    padding:   u8,
    /// marker found while refilling
    marker:    Option<u8>
}

impl<'a> BitReader<'a> {
    /// Create a reader over `data`, the first byte must be the
    /// first byte of the entropy coded segment
    pub fn new(data: &'a [u8]) -> BitReader<'a> {
        BitReader {
            data,
            position: 0,
            buffer: 0,
            bits_left: 0,
            padding: 0,
            marker: None
        }
    }

    /// Number of bytes of `data` consumed
    ///
    /// If a marker other than RST/EOI stopped the reader,
    /// this points to the `0xFF` of that marker.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Marker byte that stopped the reader, if any
    pub const fn marker(&self) -> Option<u8> {
        self.marker
    }

    fn is_terminating_marker(marker: u8) -> bool {
        matches!(Marker::from_u8(marker), Some(Marker::RST(_) | Marker::EOI))
    }

    fn push_byte(&mut self, byte: u8, is_padding: bool) {
        self.buffer = (self.buffer << 8) | u64::from(byte);
        self.bits_left += 8;

        if is_padding {
            self.padding += 8;
        }
    }

    /// Fill the bit buffer so that it has more than 56 bits
    fn refill(&mut self) {
        while self.bits_left <= 56 {
            if self.marker.is_some() {
                // the segment ended, nothing after the marker belongs to it
                self.push_byte(0, true);
                continue;
            }
            let Some(&byte) = self.data.get(self.position) else {
                self.push_byte(0, true);
                continue;
            };
            if byte != 0xFF {
                self.position += 1;
                self.push_byte(byte, false);
                continue;
            }
            match self.data.get(self.position + 1) {
                Some(0x00) => {
                    self.position += 2;
                    self.push_byte(0xFF, false);
                }
                Some(0xFF) => {
                    // fill byte before a marker
                    self.position += 1;
                }
                Some(&marker) => {
                    self.marker = Some(marker);

                    if Self::is_terminating_marker(marker) {
                        self.position += 2;
                    }
                }
                None => {
                    // lone 0xFF at the end of data
                    self.position += 1;
                    self.push_byte(0, true);
                }
            }
        }
    }

    #[inline]
    fn ensure(&mut self, count: u8) {
        if self.bits_left < count {
            self.refill();
        }
    }

    /// Look at the next `count` bits without consuming them
    #[inline]
    fn peek_bits(&mut self, count: u8) -> u16 {
        self.ensure(count);
        ((self.buffer >> (self.bits_left - count)) & ((1 << count) - 1)) as u16
    }

    /// Drop `count` bits, failing if any of them are fill
    #[inline]
    fn consume(&mut self, count: u8) -> Result<(), DecodeErrors> {
        if count + self.padding > self.bits_left {
            return Err(match self.marker {
                Some(marker) if !Self::is_terminating_marker(marker) => {
                    DecodeErrors::Bitstream(marker)
                }
                _ => DecodeErrors::Truncated
            });
        }
        self.bits_left -= count;

        Ok(())
    }

    /// Read `count` bits (at most 16), MSB first
    pub fn get_bits(&mut self, count: u8) -> Result<u16, DecodeErrors> {
        debug_assert!(count <= 16);

        if count == 0 {
            return Ok(0);
        }
        let value = self.peek_bits(count);
        self.consume(count)?;

        Ok(value)
    }

    /// Read `size` bits and sign extend them into a coefficient
    ///
    /// See ITU T.81 Section F.2.2.1, `EXTEND`
    pub fn receive_extend(&mut self, size: u8) -> Result<i32, DecodeErrors> {
        if size == 0 {
            return Ok(0);
        }
        let value = i32::from(self.get_bits(size)?);

        if value < (1 << (size - 1)) {
            Ok(value - (1 << size) + 1)
        } else {
            Ok(value)
        }
    }

    /// Decode one Huffman coded symbol
    ///
    /// Codes of up to [`FAST_BITS`] bits are resolved with one table lookup,
    /// longer ones by walking the canonical `maxcode` table.
    pub fn decode_symbol(&mut self, table: &HuffmanDecodeTable) -> Result<u8, DecodeErrors> {
        self.ensure(16);

        let look = usize::from(self.peek_bits(FAST_BITS));
        let (symbol, length) = table.lookup[look];

        if length != 0 {
            self.consume(length)?;
            return Ok(symbol);
        }
        let code16 = i32::from(self.peek_bits(16));

        for length in (FAST_BITS + 1)..=16 {
            let code = code16 >> (16 - length);

            if code <= table.maxcode[usize::from(length)] {
                let index = table.valoffset[usize::from(length)] + code;
                let symbol = *table
                    .values
                    .get(index as usize)
                    .ok_or(DecodeErrors::InvalidCode)?;

                self.consume(length)?;
                return Ok(symbol);
            }
        }
        // unmatched bits running into fill mean the data ended early
        self.consume(16)?;

        Err(DecodeErrors::InvalidCode)
    }

    /// Prepare for the segment after a restart marker
    ///
    /// Discards the fill bits of the current byte and consumes the expected
    /// `RSTn` marker.
    pub fn reset_for_restart(&mut self, expected: u8) -> Result<(), DecodeErrors> {
        self.buffer = 0;
        self.bits_left = 0;
        self.padding = 0;

        let found = match self.marker.take() {
            Some(marker) => marker,
            None => {
                // the marker may not have been reached by the last refill
                while self.data.get(self.position) == Some(&0xFF)
                    && self.data.get(self.position + 1) == Some(&0xFF)
                {
                    self.position += 1;
                }
                match (self.data.get(self.position), self.data.get(self.position + 1)) {
                    (Some(0xFF), Some(&marker)) => {
                        self.position += 2;
                        marker
                    }
                    (None, _) | (Some(0xFF), None) => return Err(DecodeErrors::Truncated),
                    (Some(_), _) => {
                        return Err(DecodeErrors::FormatStatic(
                            "Expected a restart marker in scan data"
                        ));
                    }
                }
            }
        };
        match Marker::from_u8(found) {
            Some(Marker::RST(n)) => {
                if n != expected {
                    warn!("Expected RST{} marker but found RST{}", expected, n);
                }
                Ok(())
            }
            Some(Marker::EOI) => Err(DecodeErrors::FormatStatic(
                "Premature end of image, expected restart marker"
            )),
            _ => Err(DecodeErrors::Bitstream(found))
        }
    }
}
