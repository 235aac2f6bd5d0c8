//! Binary serialization helpers.
//!
//! `VarInt` length prefixes plus a cursor `ByteReader` and an appending
//! `ByteWriter`. Transactions, payload strings and stack-item encodings
//! are all written in this little-endian format.

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// A variable-length unsigned integer.
///
/// Values below 0xfd take a single byte; larger values are prefixed with
/// 0xfd (u16), 0xfe (u32) or 0xff (u64) followed by the little-endian value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Return the wire-format byte length of this VarInt.
    ///
    /// # Returns
    /// 1, 3, 5, or 9 depending on the value.
    pub fn length(&self) -> usize {
        if self.0 < 0xfd {
            1
        } else if self.0 <= u16::MAX as u64 {
            3
        } else if self.0 <= u32::MAX as u64 {
            5
        } else {
            9
        }
    }

    /// Encode the VarInt into a new byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let v = self.0;
        let mut buf = Vec::with_capacity(self.length());
        match self.length() {
            1 => buf.push(v as u8),
            3 => {
                buf.push(0xfd);
                buf.extend_from_slice(&(v as u16).to_le_bytes());
            }
            5 => {
                buf.push(0xfe);
                buf.extend_from_slice(&(v as u32).to_le_bytes());
            }
            _ => {
                buf.push(0xff);
                buf.extend_from_slice(&v.to_le_bytes());
            }
        }
        buf
    }

    /// Return the underlying u64 value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// A cursor over a byte slice.
///
/// Every read checks the remaining length first, so truncated or hostile
/// input surfaces as `UnexpectedEof` / `LengthOverflow` instead of a panic.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to read.
    ///
    /// # Returns
    /// A byte slice of length `n`, or `UnexpectedEof` if insufficient data remains.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        if n > self.remaining() {
            return Err(PrimitivesError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read exactly `N` bytes into a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, PrimitivesError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, PrimitivesError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a VarInt and advance the position accordingly.
    ///
    /// # Returns
    /// The decoded `VarInt`, `UnexpectedEof` when truncated, or
    /// `NonCanonicalVarInt` when a wider prefix encodes a value that fits
    /// a narrower one.
    pub fn read_varint(&mut self) -> Result<VarInt, PrimitivesError> {
        let (value, min) = match self.read_u8()? {
            0xff => (self.read_u64_le()?, u32::MAX as u64 + 1),
            0xfe => (self.read_u32_le()? as u64, u16::MAX as u64 + 1),
            0xfd => (self.read_u16_le()? as u64, 0xfd),
            b => (b as u64, 0),
        };
        if value < min {
            return Err(PrimitivesError::NonCanonicalVarInt(value));
        }
        Ok(VarInt(value))
    }

    /// Read a VarInt length prefix followed by that many bytes.
    ///
    /// The prefix is validated against the remaining input before any
    /// allocation happens.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], PrimitivesError> {
        let len = self.read_varint()?.value();
        if len > self.remaining() as u64 {
            return Err(PrimitivesError::LengthOverflow(len));
        }
        self.read_bytes(len as usize)
    }

    /// Read VarInt-prefixed UTF-8 text.
    pub fn read_var_string(&mut self) -> Result<String, PrimitivesError> {
        let bytes = self.read_var_bytes()?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| PrimitivesError::InvalidEncoding(e.to_string()))
    }

    /// Return the number of bytes remaining.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Return the current read offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

// ---------------------------------------------------------------------------
// ByteWriter
// ---------------------------------------------------------------------------

/// An appending writer producing little-endian binary data.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        ByteWriter { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ByteWriter { buf: Vec::with_capacity(capacity) }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    pub fn write_bool(&mut self, val: bool) {
        self.buf.push(val as u8);
    }

    pub fn write_u16_le(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u32_le(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u64_le(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a VarInt encoding of `val`.
    pub fn write_varint(&mut self, val: VarInt) {
        self.buf.extend_from_slice(&val.to_bytes());
    }

    /// Append a VarInt length prefix followed by `bytes`.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_varint(VarInt::from(bytes.len()));
        self.write_bytes(bytes);
    }

    /// Append VarInt-prefixed UTF-8 text.
    pub fn write_var_str(&mut self, s: &str) {
        self.write_var_bytes(s.as_bytes());
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer and return the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_boundaries() {
        let cases: &[(u64, &str)] = &[
            (0, "00"),
            (0xfc, "fc"),
            (0xfd, "fdfd00"),
            (0xffff, "fdffff"),
            (0x10000, "fe00000100"),
            (0xffff_ffff, "feffffffff"),
            (0x1_0000_0000, "ff0000000001000000"),
        ];
        for (value, expected) in cases {
            let v = VarInt(*value);
            assert_eq!(hex::encode(v.to_bytes()), *expected, "value {value:#x}");
            assert_eq!(v.length(), expected.len() / 2);
            let bytes = hex::decode(expected).unwrap();
            let mut r = ByteReader::new(&bytes);
            assert_eq!(r.read_varint().unwrap(), v);
            assert!(r.is_empty());
        }
    }

    #[test]
    fn test_varint_rejects_non_canonical() {
        let mut r = ByteReader::new(&[0xfd, 0x10, 0x00]);
        assert!(matches!(
            r.read_varint(),
            Err(PrimitivesError::NonCanonicalVarInt(0x10))
        ));
    }

    #[test]
    fn test_varint_truncated() {
        let mut r = ByteReader::new(&[0xfe, 0x01, 0x02]);
        assert!(matches!(r.read_varint(), Err(PrimitivesError::UnexpectedEof)));
    }

    #[test]
    fn test_reader_fixed_width() {
        let data = hex::decode("01d10200000003000000000000000400000000000000").unwrap();
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u8().unwrap(), 0x01);
        assert_eq!(r.read_u8().unwrap(), 0xd1);
        assert_eq!(r.read_u32_le().unwrap(), 2);
        assert_eq!(r.read_u64_le().unwrap(), 3);
        assert_eq!(r.read_u64_le().unwrap(), 4);
        assert!(r.is_empty());
        assert!(r.read_u8().is_err());
    }

    #[test]
    fn test_var_bytes_length_checked_before_read() {
        // Prefix claims 0xffff bytes with only two available.
        let mut r = ByteReader::new(&[0xfd, 0xff, 0xff, 0xaa, 0xbb]);
        assert!(matches!(
            r.read_var_bytes(),
            Err(PrimitivesError::LengthOverflow(0xffff))
        ));
    }

    #[test]
    fn test_var_string_roundtrip_and_invalid_utf8() {
        let mut w = ByteWriter::new();
        w.write_var_str("hello");
        w.write_var_bytes(&[0xff, 0xfe]);
        let bytes = w.into_bytes();
        assert_eq!(&bytes[..6], b"\x05hello");

        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_var_string().unwrap(), "hello");
        assert_eq!(r.position(), 6);
        assert!(matches!(
            r.read_var_string(),
            Err(PrimitivesError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_writer_layout() {
        let mut w = ByteWriter::with_capacity(16);
        w.write_u8(0);
        w.write_bool(true);
        w.write_u16_le(0x0102);
        w.write_u32_le(0x03040506);
        w.write_u64_le(7);
        assert_eq!(hex::encode(w.as_bytes()), "00010201060504030700000000000000");
        assert_eq!(w.len(), 16);
    }
}
