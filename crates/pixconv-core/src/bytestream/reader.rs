/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

/// Errors raised when a read cannot be satisfied by the
/// underlying buffer
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum ByteIoError {
    // requested, remaining
    NotEnoughBytes(usize, usize),
    Generic(&'static str)
}

impl Debug for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ByteIoError::NotEnoughBytes(expected, found) => {
                writeln!(f, "Not enough bytes, expected {expected} but found {found}")
            }
            ByteIoError::Generic(err) => {
                writeln!(f, "Generic I/O error: {err}")
            }
        }
    }
}

impl Display for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for ByteIoError {}

impl From<&'static str> for ByteIoError {
    fn from(value: &'static str) -> Self {
        ByteIoError::Generic(value)
    }
}

/// An encapsulation of a byte stream reader
///
/// This provides an interface similar to [std::io::Cursor] but
/// with the exception of adding functions for endian aware reads
/// and peeks, and error returning reads for when the caller needs
/// to know that data ran out.
pub struct ZByteReader<'a> {
    /// Data stream
    stream:   &'a [u8],
    position: usize
}

impl<'a> ZByteReader<'a> {
    /// Create a new instance of the byte stream
    ///
    /// Bytes will be read from the start of `buf`.
    ///
    /// # Example
    /// ```
    /// use pixconv_core::bytestream::ZByteReader;
    /// let mut reader = ZByteReader::new(&[1, 2]);
    /// assert_eq!(reader.get_u16_be_err().unwrap(), 0x0102);
    /// ```
    pub const fn new(buf: &'a [u8]) -> ZByteReader<'a> {
        ZByteReader {
            stream:   buf,
            position: 0
        }
    }

    /// Skip `num` bytes ahead of the stream.
    ///
    /// Returns an error if the stream does not contain `num` more bytes,
    /// in which case the position is left unchanged
    pub fn skip(&mut self, num: usize) -> Result<(), ByteIoError> {
        if !self.has(num) {
            return Err(ByteIoError::NotEnoughBytes(num, self.remaining()));
        }
        self.position += num;
        Ok(())
    }

    /// Return whether the underlying buffer
    /// has `num` bytes available for reading
    ///
    /// # Example
    /// ```
    /// use pixconv_core::bytestream::ZByteReader;
    /// let data = [0_u8; 120];
    /// let reader = ZByteReader::new(&data);
    /// assert!(reader.has(3));
    /// assert!(!reader.has(121));
    /// ```
    #[inline]
    pub const fn has(&self, num: usize) -> bool {
        self.position.saturating_add(num) <= self.stream.len()
    }

    /// Return the number of bytes not yet read
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.stream.len().saturating_sub(self.position)
    }

    /// Return true if the whole stream has been consumed
    #[inline]
    pub const fn eof(&self) -> bool {
        self.position >= self.stream.len()
    }

    /// Current position in the stream
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Total length of the underlying buffer
    #[inline]
    pub const fn len(&self) -> usize {
        self.stream.len()
    }

    /// Whether the underlying buffer is empty
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    /// Read a single byte, returning `0` if the stream is exhausted
    ///
    /// Combine with [`has`](Self::has) or [`eof`](Self::eof) when the
    /// distinction matters.
    #[inline]
    pub fn get_u8(&mut self) -> u8 {
        match self.stream.get(self.position) {
            Some(byte) => {
                self.position += 1;
                *byte
            }
            None => 0
        }
    }

    /// Read a single byte or error out if the stream is exhausted
    #[inline]
    pub fn get_u8_err(&mut self) -> Result<u8, ByteIoError> {
        match self.stream.get(self.position) {
            Some(byte) => {
                self.position += 1;
                Ok(*byte)
            }
            None => Err(ByteIoError::NotEnoughBytes(1, 0))
        }
    }

    /// Look at the next byte without consuming it
    #[inline]
    pub fn peek_u8(&self) -> Option<u8> {
        self.stream.get(self.position).copied()
    }

    /// Read a big endian u16 or error out if fewer than two bytes remain
    #[inline]
    pub fn get_u16_be_err(&mut self) -> Result<u16, ByteIoError> {
        let mut space = [0; 2];
        self.read_exact_bytes(&mut space)?;
        Ok(u16::from_be_bytes(space))
    }

    /// Fill `buf` with bytes from the stream
    ///
    /// On error the stream position is not advanced.
    pub fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        let bytes = self.get_as_ref(buf.len())?;
        buf.copy_from_slice(bytes);
        Ok(())
    }

    /// Return a reference to the next `num` bytes and advance past them
    ///
    /// This does not copy, the slice borrows from the underlying buffer.
    pub fn get_as_ref(&mut self, num: usize) -> Result<&'a [u8], ByteIoError> {
        let end = self.position.saturating_add(num);

        match self.stream.get(self.position..end) {
            Some(bytes) => {
                self.position += num;
                Ok(bytes)
            }
            None => Err(ByteIoError::NotEnoughBytes(num, self.remaining()))
        }
    }

    /// Return every byte not yet read, without advancing
    pub fn remaining_bytes(&self) -> &'a [u8] {
        self.stream.get(self.position..).unwrap_or(&[])
    }
}
