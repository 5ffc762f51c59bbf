// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the acir-r1cs project.
// See the LICENSE file in the project root for full license information.

//! Streaming little-endian primitives for the ACIR bytecode format.
//!
//! Every multi-byte integer is little-endian; byte blobs and homogeneous
//! vectors are prefixed with a `u64` length. The reader is strictly
//! streaming: it never seeks and never buffers beyond the value being read.
use crate::errors::AcirError;
use std::io::{ErrorKind, Read};

/// A streaming reader over any byte source.
pub struct WireReader<R: Read> {
  inner: R,
}

impl<R: Read> WireReader<R> {
  /// Wrap a byte source.
  pub fn new(inner: R) -> Self {
    WireReader { inner }
  }

  fn fill(&mut self, buf: &mut [u8]) -> Result<(), AcirError> {
    self.inner.read_exact(buf).map_err(|e| match e.kind() {
      ErrorKind::UnexpectedEof => AcirError::TruncatedInput,
      _ => AcirError::Io(e),
    })
  }

  /// Read a single byte.
  pub fn read_u8(&mut self) -> Result<u8, AcirError> {
    let mut buf = [0u8; 1];
    self.fill(&mut buf)?;
    Ok(buf[0])
  }

  /// Read a little-endian `u32`.
  pub fn read_u32(&mut self) -> Result<u32, AcirError> {
    let mut buf = [0u8; 4];
    self.fill(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
  }

  /// Read a little-endian `u64`.
  pub fn read_u64(&mut self) -> Result<u64, AcirError> {
    let mut buf = [0u8; 8];
    self.fill(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
  }

  /// Read a little-endian `u64`, distinguishing a clean end of stream from a
  /// short read. Returns `None` only when the stream ends exactly at the
  /// boundary where the integer would begin.
  pub fn read_u64_or_eof(&mut self) -> Result<Option<u64>, AcirError> {
    let mut buf = [0u8; 8];
    let mut filled = 0;
    while filled < buf.len() {
      match self.inner.read(&mut buf[filled..]) {
        Ok(0) if filled == 0 => return Ok(None),
        Ok(0) => return Err(AcirError::TruncatedInput),
        Ok(n) => filled += n,
        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
        Err(e) => return Err(AcirError::Io(e)),
      }
    }
    Ok(Some(u64::from_le_bytes(buf)))
  }

  /// Read a fixed-length byte run.
  pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, AcirError> {
    let mut buf = vec![0u8; len];
    self.fill(&mut buf)?;
    Ok(buf)
  }

  /// Read a `u64`-length-prefixed byte run.
  pub fn read_blob(&mut self) -> Result<Vec<u8>, AcirError> {
    let len = self.read_u64()?;
    self.read_bytes(len as usize)
  }

  /// Read a `u64`-length-prefixed UTF-8 string.
  pub fn read_string(&mut self) -> Result<String, AcirError> {
    let bytes = self.read_blob()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
  }

  /// Read a `u64`-count-prefixed homogeneous vector, decoding each element
  /// with the supplied closure.
  pub fn read_vec<T, F>(&mut self, mut decode: F) -> Result<Vec<T>, AcirError>
  where
    F: FnMut(&mut Self) -> Result<T, AcirError>,
  {
    let count = self.read_u64()?;
    let mut items = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
      items.push(decode(self)?);
    }
    Ok(items)
  }
}

/// Append a byte.
pub fn put_u8(buf: &mut Vec<u8>, v: u8) {
  buf.push(v);
}

/// Append a little-endian `u32`.
pub fn put_u32(buf: &mut Vec<u8>, v: u32) {
  buf.extend_from_slice(&v.to_le_bytes());
}

/// Append a little-endian `u64`.
pub fn put_u64(buf: &mut Vec<u8>, v: u64) {
  buf.extend_from_slice(&v.to_le_bytes());
}

/// Append a `u64`-length-prefixed byte run.
pub fn put_blob(buf: &mut Vec<u8>, bytes: &[u8]) {
  put_u64(buf, bytes.len() as u64);
  buf.extend_from_slice(bytes);
}

/// Append a `u64`-length-prefixed UTF-8 string.
pub fn put_string(buf: &mut Vec<u8>, s: &str) {
  put_blob(buf, s.as_bytes());
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_primitives_round_trip() {
    let mut buf = Vec::new();
    put_u8(&mut buf, 7);
    put_u32(&mut buf, 0xdead_beef);
    put_u64(&mut buf, 0x0123_4567_89ab_cdef);
    put_blob(&mut buf, b"acir");
    put_string(&mut buf, "main");

    let mut r = WireReader::new(buf.as_slice());
    assert_eq!(r.read_u8().unwrap(), 7);
    assert_eq!(r.read_u32().unwrap(), 0xdead_beef);
    assert_eq!(r.read_u64().unwrap(), 0x0123_4567_89ab_cdef);
    assert_eq!(r.read_blob().unwrap(), b"acir");
    assert_eq!(r.read_string().unwrap(), "main");
  }

  #[test]
  fn test_short_read_is_truncated_input() {
    let mut r = WireReader::new(&[1u8, 2, 3][..]);
    assert!(matches!(r.read_u32(), Err(AcirError::TruncatedInput)));

    // A blob whose length prefix promises more bytes than the stream holds.
    let mut buf = Vec::new();
    put_u64(&mut buf, 100);
    buf.extend_from_slice(b"short");
    let mut r = WireReader::new(buf.as_slice());
    assert!(matches!(r.read_blob(), Err(AcirError::TruncatedInput)));
  }

  #[test]
  fn test_u64_or_eof() {
    let mut r = WireReader::new(&[][..]);
    assert!(r.read_u64_or_eof().unwrap().is_none());

    let bytes = 5u64.to_le_bytes();
    let mut r = WireReader::new(&bytes[..]);
    assert_eq!(r.read_u64_or_eof().unwrap(), Some(5));

    // A partial integer is a short read, not a clean end of stream.
    let mut r = WireReader::new(&[1u8, 2, 3][..]);
    assert!(matches!(r.read_u64_or_eof(), Err(AcirError::TruncatedInput)));
  }

  #[test]
  fn test_read_vec() {
    let mut buf = Vec::new();
    put_u64(&mut buf, 3);
    for v in [10u32, 20, 30] {
      put_u32(&mut buf, v);
    }
    let mut r = WireReader::new(buf.as_slice());
    let items = r.read_vec(|r| r.read_u32()).unwrap();
    assert_eq!(items, vec![10, 20, 30]);
  }
}
