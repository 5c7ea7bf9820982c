/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(clippy::upper_case_acronyms)]

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    /// Start Of Frame markers
    ///
    /// - SOF(0):  Baseline DCT (Huffman coding)
    /// - SOF(1):  Extended sequential DCT (Huffman coding)
    /// - SOF(2):  Progressive DCT (Huffman coding)
    /// - SOF(3):  Lossless (sequential) (Huffman coding)
    /// - SOF(5):  Differential sequential DCT (Huffman coding)
    /// - SOF(6):  Differential progressive DCT (Huffman coding)
    /// - SOF(7):  Differential lossless (Huffman coding)
    /// - SOF(9):  Extended sequential DCT (arithmetic coding)
    /// - SOF(10): Progressive DCT (arithmetic coding)
    /// - SOF(11): Lossless (sequential) (arithmetic coding)
    /// - SOF(13): Differential sequential DCT (arithmetic coding)
    /// - SOF(14): Differential progressive DCT (arithmetic coding)
    /// - SOF(15): Differential lossless (arithmetic coding)
    SOF(u8),
    /// Define Huffman table(s)
    DHT,
    /// Define arithmetic coding conditioning(s)
    DAC,
    /// Restart with modulo 8 count `m`
    RST(u8),
    /// Start of image
    SOI,
    /// End of image
    EOI,
    /// Start of scan
    SOS,
    /// Define quantization table(s)
    DQT,
    /// Define number of lines
    DNL,
    /// Define restart interval
    DRI,
    /// Define hierarchical progression
    DHP,
    /// Expand reference component(s)
    EXP,
    /// Reserved for application segments
    APP(u8),
    /// Reserved for JPEG extensions
    JPG(u8),
    /// Comment
    COM,
    /// For temporary private use in arithmetic coding
    TEM
}

impl Marker {
    #[must_use]
    pub fn from_u8(n: u8) -> Option<Marker> {
        use self::Marker::{
            APP, COM, DAC, DHP, DHT, DNL, DQT, DRI, EOI, EXP, JPG, RST, SOF, SOI, SOS, TEM
        };

        match n {
            0x01 => Some(TEM),
            0xC4 => Some(DHT),
            0xC8 => Some(JPG(0)),
            0xCC => Some(DAC),
            0xC0..=0xCF => Some(SOF(n - 0xC0)),
            0xD0..=0xD7 => Some(RST(n - 0xD0)),
            0xD8 => Some(SOI),
            0xD9 => Some(EOI),
            0xDA => Some(SOS),
            0xDB => Some(DQT),
            0xDC => Some(DNL),
            0xDD => Some(DRI),
            0xDE => Some(DHP),
            0xDF => Some(EXP),
            0xE0..=0xEF => Some(APP(n - 0xE0)),
            0xF0..=0xFD => Some(JPG(n - 0xF0 + 1)),
            0xFE => Some(COM),
            _ => None
        }
    }

    /// The byte following `0xFF` in the encoded stream
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Marker::SOF(n) => 0xC0 + n,
            Marker::DHT => 0xC4,
            Marker::DAC => 0xCC,
            Marker::RST(n) => 0xD0 + n,
            Marker::SOI => 0xD8,
            Marker::EOI => 0xD9,
            Marker::SOS => 0xDA,
            Marker::DQT => 0xDB,
            Marker::DNL => 0xDC,
            Marker::DRI => 0xDD,
            Marker::DHP => 0xDE,
            Marker::EXP => 0xDF,
            Marker::APP(n) => 0xE0 + n,
            Marker::JPG(0) => 0xC8,
            Marker::JPG(n) => 0xF0 + n - 1,
            Marker::COM => 0xFE,
            Marker::TEM => 0x01
        }
    }
}
