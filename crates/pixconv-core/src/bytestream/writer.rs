/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Encapsulates a simple Byte writer with
/// support for big endian writes
///
/// The writer appends to a borrowed `Vec<u8>`, so writes never fail.
pub struct ZByteWriter<'a> {
    buffer: &'a mut Vec<u8>
}

impl<'a> ZByteWriter<'a> {
    /// Create a new writer appending to `buffer`
    pub fn new(buffer: &'a mut Vec<u8>) -> ZByteWriter<'a> {
        ZByteWriter { buffer }
    }

    /// Return the number of bytes in the underlying buffer
    ///
    /// ```
    /// use pixconv_core::bytestream::ZByteWriter;
    /// let mut out = vec![];
    /// let mut stream = ZByteWriter::new(&mut out);
    /// stream.write_u16_be(0xFFD8);
    /// assert_eq!(stream.position(), 2);
    /// ```
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    /// Write a single byte
    #[inline]
    pub fn write_u8(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    /// Write a u16 as a big endian integer
    #[inline]
    pub fn write_u16_be(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Write all of `buf`
    #[inline]
    pub fn write_all(&mut self, buf: &[u8]) {
        self.buffer.extend_from_slice(buf);
    }
}
