/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Canonical Huffman tables
//!
//! A table travels through the codec in three forms
//!
//! - [`HuffmanSpec`]: the `BITS` / `HUFFVAL` pair stored in a DHT segment
//! - [`HuffmanEncodeTable`]: symbol to `(code, length)`, used by the encoder
//! - [`HuffmanDecodeTable`]: the canonical `maxcode` / `valoffset` arrays plus a
//!   [`FAST_BITS`] wide lookup table, used by the decoder
use core::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::bitstream::BitWriter;
use crate::errors::DecodeErrors;

/// Number of bits resolved by a single lookup when decoding
pub const FAST_BITS: u8 = 9;

/// Longest code length allowed by the standard
const MAX_CODE_LENGTH: usize = 16;

/// Standard DC luminance table, ITU T.81 Table K.3
const DC_LUMA_BITS: [u8; 16] = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
const DC_LUMA_VALUES: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

/// Standard DC chrominance table, ITU T.81 Table K.4
const DC_CHROMA_BITS: [u8; 16] = [0, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0];
const DC_CHROMA_VALUES: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

/// Standard AC luminance table, ITU T.81 Table K.5
const AC_LUMA_BITS: [u8; 16] = [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 125];
#[rustfmt::skip]
const AC_LUMA_VALUES: [u8; 162] = [
    0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07,
    0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xa1, 0x08, 0x23, 0x42, 0xb1, 0xc1, 0x15, 0x52, 0xd1, 0xf0,
    0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0a, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x25, 0x26, 0x27, 0x28,
    0x29, 0x2a, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3a, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5a, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69,
    0x6a, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7a, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89,
    0x8a, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9a, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7,
    0xa8, 0xa9, 0xaa, 0xb2, 0xb3, 0xb4, 0xb5, 0xb6, 0xb7, 0xb8, 0xb9, 0xba, 0xc2, 0xc3, 0xc4, 0xc5,
    0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xd2, 0xd3, 0xd4, 0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda, 0xe1, 0xe2,
    0xe3, 0xe4, 0xe5, 0xe6, 0xe7, 0xe8, 0xe9, 0xea, 0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8,
    0xf9, 0xfa,
];

/// Standard AC chrominance table, ITU T.81 Table K.6
const AC_CHROMA_BITS: [u8; 16] = [0, 2, 1, 2, 4, 4, 3, 4, 7, 5, 4, 4, 0, 1, 2, 119];
#[rustfmt::skip]
const AC_CHROMA_VALUES: [u8; 162] = [
    0x00, 0x01, 0x02, 0x03, 0x11, 0x04, 0x05, 0x21, 0x31, 0x06, 0x12, 0x41, 0x51, 0x07, 0x61, 0x71,
    0x13, 0x22, 0x32, 0x81, 0x08, 0x14, 0x42, 0x91, 0xa1, 0xb1, 0xc1, 0x09, 0x23, 0x33, 0x52, 0xf0,
    0x15, 0x62, 0x72, 0xd1, 0x0a, 0x16, 0x24, 0x34, 0xe1, 0x25, 0xf1, 0x17, 0x18, 0x19, 0x1a, 0x26,
    0x27, 0x28, 0x29, 0x2a, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3a, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48,
    0x49, 0x4a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5a, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68,
    0x69, 0x6a, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7a, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87,
    0x88, 0x89, 0x8a, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9a, 0xa2, 0xa3, 0xa4, 0xa5,
    0xa6, 0xa7, 0xa8, 0xa9, 0xaa, 0xb2, 0xb3, 0xb4, 0xb5, 0xb6, 0xb7, 0xb8, 0xb9, 0xba, 0xc2, 0xc3,
    0xc4, 0xc5, 0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xd2, 0xd3, 0xd4, 0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda,
    0xe2, 0xe3, 0xe4, 0xe5, 0xe6, 0xe7, 0xe8, 0xe9, 0xea, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8,
    0xf9, 0xfa,
];

/// Check that `bits` describes a prefix code, i.e. the code space is
/// not over-subscribed.
fn check_code_space(bits: &[u8; 16]) -> Result<(), DecodeErrors> {
    let mut code = 0_u32;

    for (length, &count) in (1..=16_u32).zip(bits.iter()) {
        code += u32::from(count);

        if code > (1 << length) {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Bad Huffman table, {count} codes of length {length} over-subscribe the code space"
            )));
        }
        code <<= 1;
    }
    Ok(())
}

/// A Huffman table in its DHT form
///
/// `bits[i]` is the number of codes of length `i + 1`, `values` lists the
/// symbols ordered by code length, then by code.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HuffmanSpec {
    bits:   [u8; 16],
    values: Vec<u8>
}

impl HuffmanSpec {
    /// Create a table from DHT data
    ///
    /// # Errors
    /// - More than 256 symbols, or a symbol count not matching `bits`
    /// - Code lengths that cannot form a prefix code
    pub fn new(bits: [u8; 16], values: &[u8]) -> Result<HuffmanSpec, DecodeErrors> {
        let total: usize = bits.iter().map(|x| usize::from(*x)).sum();

        if total > 256 {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Huffman table has {total} symbols, expected at most 256"
            )));
        }
        if total != values.len() {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Huffman table lengths describe {total} symbols but {} were given",
                values.len()
            )));
        }
        check_code_space(&bits)?;

        Ok(HuffmanSpec {
            bits,
            values: values.to_vec()
        })
    }

    /// Build an optimal table for the given symbol frequencies
    ///
    /// Follows ITU T.81 Annex K.2: the two lowest weight nodes are merged
    /// until one tree remains (ties go to the lower symbol), lengths over 16
    /// are folded back and symbols are ordered by `(length, symbol)`.
    ///
    /// A reserved symbol with weight 1 takes part in the construction and is
    /// removed afterwards so that no code consists of all 1-bits.
    /// Symbols with zero frequency get no code.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_frequencies(frequencies: &[u32; 256]) -> HuffmanSpec {
        const RESERVED: usize = 256;

        let mut code_size = [0_usize; 257];

        // nodes are (weight, tie breaker, node index), the tie breaker is the
        // smallest symbol below the node with the reserved symbol before all others
        let mut heap = BinaryHeap::new();
        let mut members: Vec<Vec<usize>> = Vec::with_capacity(2 * 257);

        for (symbol, &freq) in frequencies.iter().enumerate() {
            if freq > 0 {
                heap.push(Reverse((u64::from(freq), symbol + 1, members.len())));
                members.push(vec![symbol]);
            }
        }
        if heap.is_empty() {
            return HuffmanSpec {
                bits:   [0; 16],
                values: Vec::new()
            };
        }
        heap.push(Reverse((1, 0, members.len())));
        members.push(vec![RESERVED]);

        while let (Some(Reverse((w1, t1, a))), Some(Reverse((w2, t2, b)))) = (heap.pop(), heap.pop())
        {
            let mut merged = core::mem::take(&mut members[a]);
            merged.append(&mut members[b]);

            for &symbol in &merged {
                code_size[symbol] += 1;
            }
            heap.push(Reverse((w1 + w2, t1.min(t2), members.len())));
            members.push(merged);

            if heap.len() == 1 {
                break;
            }
        }

        let max_length = code_size.iter().copied().max().unwrap_or(0);
        let mut bits = vec![0_usize; max_length.max(MAX_CODE_LENGTH) + 1];

        for &size in &code_size {
            if size > 0 {
                bits[size] += 1;
            }
        }

        // Figure K.3, fold codes longer than 16 bits
        let mut i = max_length;

        while i > MAX_CODE_LENGTH {
            while bits[i] > 0 {
                let mut j = i - 2;

                while j > 0 && bits[j] == 0 {
                    j -= 1;
                }
                bits[i] -= 2;
                bits[i - 1] += 1;
                bits[j + 1] += 2;
                bits[j] -= 1;
            }
            i -= 1;
        }
        // drop the reserved code, it is the last code of the longest length
        while i > 0 && bits[i] == 0 {
            i -= 1;
        }
        bits[i] -= 1;

        let mut values: Vec<u8> = (0..RESERVED)
            .filter(|&symbol| code_size[symbol] > 0)
            .map(|symbol| symbol as u8)
            .collect();

        values.sort_by_key(|&symbol| (code_size[usize::from(symbol)], symbol));

        let mut counts = [0_u8; 16];

        for (count, &value) in counts.iter_mut().zip(&bits[1..=MAX_CODE_LENGTH]) {
            *count = value as u8;
        }
        HuffmanSpec {
            bits: counts,
            values
        }
    }

    /// Number of codes for each length from 1 to 16
    pub const fn bits(&self) -> &[u8; 16] {
        &self.bits
    }

    /// Symbols in code order
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Size of the table in a DHT segment, excluding the class/id byte
    pub fn encoded_len(&self) -> usize {
        16 + self.values.len()
    }

    /// Return the code length of every symbol with a code, as `(symbol, length)`
    pub fn code_lengths(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        let lengths = (1..=16_u8).flat_map(|len| {
            core::iter::repeat(len).take(usize::from(self.bits[usize::from(len) - 1]))
        });
        self.values.iter().copied().zip(lengths)
    }

    fn from_static(bits: [u8; 16], values: &[u8]) -> HuffmanSpec {
        HuffmanSpec {
            bits,
            values: values.to_vec()
        }
    }

    /// Standard DC luminance table
    pub fn std_dc_luma() -> HuffmanSpec {
        HuffmanSpec::from_static(DC_LUMA_BITS, &DC_LUMA_VALUES)
    }

    /// Standard DC chrominance table
    pub fn std_dc_chroma() -> HuffmanSpec {
        HuffmanSpec::from_static(DC_CHROMA_BITS, &DC_CHROMA_VALUES)
    }

    /// Standard AC luminance table
    pub fn std_ac_luma() -> HuffmanSpec {
        HuffmanSpec::from_static(AC_LUMA_BITS, &AC_LUMA_VALUES)
    }

    /// Standard AC chrominance table
    pub fn std_ac_chroma() -> HuffmanSpec {
        HuffmanSpec::from_static(AC_CHROMA_BITS, &AC_CHROMA_VALUES)
    }
}

/// Generate canonical codes, calling `f(index, code, length)` for each symbol
fn for_each_code(bits: &[u8; 16], mut f: impl FnMut(usize, u16, u8)) {
    let mut code = 0_u32;
    let mut k = 0;

    for (length, &count) in (1..=16_u8).zip(bits.iter()) {
        for _ in 0..count {
            f(k, code as u16, length);
            code += 1;
            k += 1;
        }
        code <<= 1;
    }
}

/// Symbol to code mapping used by the encoder
pub struct HuffmanEncodeTable {
    /// `(code, length)` per symbol, a length of zero means no code
    codes: [(u16, u8); 256]
}

impl HuffmanEncodeTable {
    pub fn new(spec: &HuffmanSpec) -> HuffmanEncodeTable {
        let mut codes = [(0, 0); 256];

        for_each_code(&spec.bits, |k, code, length| {
            if let Some(&symbol) = spec.values.get(k) {
                codes[usize::from(symbol)] = (code, length);
            }
        });

        HuffmanEncodeTable { codes }
    }

    /// Return `(code, length)` of `symbol`, length is zero if the symbol has no code
    pub const fn code(&self, symbol: u8) -> (u16, u8) {
        self.codes[symbol as usize]
    }

    /// Write the code for `symbol`
    ///
    /// The table must have been built from statistics which include `symbol`
    #[inline]
    pub fn encode_symbol(&self, writer: &mut BitWriter, symbol: u8) {
        let (code, length) = self.code(symbol);

        debug_assert!(length != 0, "No Huffman code for symbol {symbol:#04X}");
        writer.put_bits(code, length);
    }
}

/// Decoder side of a Huffman table
pub struct HuffmanDecodeTable {
    /// `(symbol, length)` indexed by the next [`FAST_BITS`] bits,
    /// a length of zero means the code is longer
    pub(crate) lookup:    [(u8, u8); 1 << FAST_BITS],
    /// largest code of each length, -1 if there are none
    pub(crate) maxcode:   [i32; 18],
    /// added to a code of a given length to find its index in `values`
    pub(crate) valoffset: [i32; 18],
    pub(crate) values:    Vec<u8>
}

impl HuffmanDecodeTable {
    /// Build the decoding tables for `spec`
    ///
    /// # Errors
    /// If the code lengths over-subscribe the code space
    pub fn new(spec: &HuffmanSpec) -> Result<HuffmanDecodeTable, DecodeErrors> {
        check_code_space(&spec.bits)?;

        let mut lookup = [(0, 0); 1 << FAST_BITS];
        let mut maxcode = [-1; 18];
        let mut valoffset = [0; 18];

        let mut code = 0_i32;
        let mut k = 0_i32;

        for (length, &count) in (1..=16_usize).zip(spec.bits.iter()) {
            valoffset[length] = k - code;
            code += i32::from(count);
            k += i32::from(count);

            if count > 0 {
                maxcode[length] = code - 1;
            }
            code <<= 1;
        }

        for_each_code(&spec.bits, |k, code, length| {
            if length > FAST_BITS {
                return;
            }
            let Some(&symbol) = spec.values.get(k) else {
                return;
            };
            let shift = FAST_BITS - length;
            let start = usize::from(code) << shift;

            for entry in &mut lookup[start..start + (1 << shift)] {
                *entry = (symbol, length);
            }
        });

        Ok(HuffmanDecodeTable {
            lookup,
            maxcode,
            valoffset,
            values: spec.values.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use nanorand::{Rng, WyRand};

    use crate::bitstream::{BitReader, BitWriter};
    use crate::errors::DecodeErrors;
    use crate::huffman::{HuffmanDecodeTable, HuffmanEncodeTable, HuffmanSpec};

    /// Encode `symbols` with `spec` and decode them back
    fn round_trip(spec: &HuffmanSpec, symbols: &[u8]) {
        let encoder = HuffmanEncodeTable::new(spec);
        let decoder = HuffmanDecodeTable::new(spec).unwrap();

        let mut out = vec![];
        let mut writer = BitWriter::new(&mut out);

        for &symbol in symbols {
            encoder.encode_symbol(&mut writer, symbol);
        }
        writer.flush();
        out.extend_from_slice(&[0xFF, 0xD9]);

        let mut reader = BitReader::new(&out);

        for &symbol in symbols {
            assert_eq!(reader.decode_symbol(&decoder).unwrap(), symbol);
        }
    }

    fn kraft_sum(spec: &HuffmanSpec) -> f64 {
        spec.code_lengths()
            .map(|(_, len)| 1.0 / f64::from(1_u32 << len))
            .sum()
    }

    #[test]
    fn standard_tables_round_trip() {
        for spec in [
            HuffmanSpec::std_dc_luma(),
            HuffmanSpec::std_dc_chroma(),
            HuffmanSpec::std_ac_luma(),
            HuffmanSpec::std_ac_chroma()
        ] {
            let symbols = spec.values().to_vec();
            round_trip(&spec, &symbols);
        }
    }

    #[test]
    fn frequencies_round_trip() {
        let mut rng = WyRand::new_seed(42);

        for _ in 0..20 {
            let mut freq = [0_u32; 256];

            for symbol in 0..256 {
                if rng.generate_range(0_u32..4) != 0 {
                    freq[symbol] = rng.generate_range(1_u32..10_000);
                }
            }
            let spec = HuffmanSpec::from_frequencies(&freq);
            let used: Vec<u8> = (0..=255).filter(|&x| freq[usize::from(x)] > 0).collect();

            assert_eq!(spec.values().len(), used.len());
            // rebuilding from the DHT form must succeed
            let rebuilt = HuffmanSpec::new(*spec.bits(), spec.values()).unwrap();
            assert_eq!(rebuilt, spec);

            assert!(kraft_sum(&spec) < 1.0, "all ones code must be unused");
            round_trip(&spec, &used);
        }
    }

    #[test]
    fn frequent_symbols_get_short_codes() {
        let mut freq = [0_u32; 256];
        freq[0] = 1000;
        freq[1] = 10;
        freq[2] = 10;

        let spec = HuffmanSpec::from_frequencies(&freq);
        let lengths: Vec<_> = spec.code_lengths().collect();

        assert_eq!(lengths[0], (0, 1));
        assert!(lengths.iter().all(|&(_, len)| len <= 3));
    }

    #[test]
    fn ties_prefer_lower_symbols() {
        let mut freq = [0_u32; 256];
        freq[7] = 5;
        freq[3] = 5;
        freq[9] = 5;

        let spec = HuffmanSpec::from_frequencies(&freq);
        // values are ordered by (length, symbol)
        let values = spec.values();
        let mut sorted = values.to_vec();
        sorted.sort_by_key(|&s| {
            spec.code_lengths()
                .find(|&(x, _)| x == s)
                .map(|(_, len)| (len, s))
        });
        assert_eq!(values, &sorted[..]);
    }

    #[test]
    fn lengths_are_limited_to_16_bits() {
        // Fibonacci weights produce a maximally skewed tree
        let mut freq = [0_u32; 256];
        let (mut a, mut b) = (1_u32, 1_u32);

        for item in freq.iter_mut().take(40) {
            *item = a;
            (a, b) = (b, a.saturating_add(b));
        }
        let spec = HuffmanSpec::from_frequencies(&freq);

        assert_eq!(spec.values().len(), 40);
        assert!(spec.code_lengths().all(|(_, len)| len <= 16));
        assert!(kraft_sum(&spec) <= 1.0);

        let symbols: Vec<u8> = (0..40).collect();
        round_trip(&spec, &symbols);
    }

    #[test]
    fn single_symbol() {
        let mut freq = [0_u32; 256];
        freq[0xF0] = 3;

        let spec = HuffmanSpec::from_frequencies(&freq);

        assert_eq!(spec.values(), &[0xF0]);
        assert_eq!(spec.code_lengths().next(), Some((0xF0, 1)));
        round_trip(&spec, &[0xF0, 0xF0, 0xF0]);
    }

    #[test]
    fn rejects_bad_tables() {
        // three codes of length one
        let mut bits = [0; 16];
        bits[0] = 3;
        assert!(matches!(
            HuffmanSpec::new(bits, &[1, 2, 3]),
            Err(DecodeErrors::HuffmanDecode(_))
        ));

        // count mismatch
        let mut bits = [0; 16];
        bits[1] = 2;
        assert!(HuffmanSpec::new(bits, &[1]).is_err());
    }

    #[test]
    fn invalid_code() {
        // a single code "0" of length 1, so a run of ones never matches
        let mut bits = [0; 16];
        bits[0] = 1;
        let spec = HuffmanSpec::new(bits, &[5]).unwrap();
        let table = HuffmanDecodeTable::new(&spec).unwrap();

        let data = [0xFF, 0x00, 0xFF, 0x00, 0xFF, 0xD9];
        let mut reader = BitReader::new(&data);

        assert!(matches!(
            reader.decode_symbol(&table),
            Err(DecodeErrors::InvalidCode)
        ));
    }
}
