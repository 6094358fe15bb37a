//! Checked little-endian binary reader for the canonical wire format.

use abicodec_core::CodecError;

/// A cursor over an input slice. Every read is bounds-checked and reports
/// what it was reading when the input ran out.
#[derive(Debug)]
pub struct BinReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail with `TrailingBytes` unless the input is fully consumed.
    pub fn expect_end(&self) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(CodecError::TrailingBytes { count }),
        }
    }

    pub fn read_exact(&mut self, n: usize, what: &str) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::UnexpectedEnd {
                what: what.to_string(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self, what: &str) -> Result<u8, CodecError> {
        Ok(self.read_exact(1, what)?[0])
    }

    pub fn read_u16(&mut self, what: &str) -> Result<u16, CodecError> {
        let b = self.read_exact(2, what)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self, what: &str) -> Result<u32, CodecError> {
        let b = self.read_exact(4, what)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self, what: &str) -> Result<u64, CodecError> {
        let b = self.read_exact(8, what)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(b);
        Ok(u64::from_le_bytes(arr))
    }

    pub fn read_u128(&mut self, what: &str) -> Result<u128, CodecError> {
        let b = self.read_exact(16, what)?;
        let mut arr = [0u8; 16];
        arr.copy_from_slice(b);
        Ok(u128::from_le_bytes(arr))
    }

    pub fn read_i8(&mut self, what: &str) -> Result<i8, CodecError> {
        Ok(self.read_u8(what)? as i8)
    }

    pub fn read_i16(&mut self, what: &str) -> Result<i16, CodecError> {
        Ok(self.read_u16(what)? as i16)
    }

    pub fn read_i32(&mut self, what: &str) -> Result<i32, CodecError> {
        Ok(self.read_u32(what)? as i32)
    }

    pub fn read_i64(&mut self, what: &str) -> Result<i64, CodecError> {
        Ok(self.read_u64(what)? as i64)
    }

    pub fn read_i128(&mut self, what: &str) -> Result<i128, CodecError> {
        Ok(self.read_u128(what)? as i128)
    }

    pub fn read_f32(&mut self, what: &str) -> Result<f32, CodecError> {
        Ok(f32::from_bits(self.read_u32(what)?))
    }

    pub fn read_f64(&mut self, what: &str) -> Result<f64, CodecError> {
        Ok(f64::from_bits(self.read_u64(what)?))
    }

    /// LEB128 unsigned. Rejects encodings longer than five bytes or with
    /// significant bits beyond 32.
    pub fn read_varuint32(&mut self, what: &str) -> Result<u32, CodecError> {
        let mut value: u64 = 0;
        let mut shift = 0;
        loop {
            let byte = self.read_u8(what)?;
            value |= ((byte & 0x7f) as u64) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift >= 35 {
                return Err(CodecError::VaruintOverflow);
            }
        }
        u32::try_from(value).map_err(|_| CodecError::VaruintOverflow)
    }

    /// Zigzag-mapped LEB128 signed.
    pub fn read_varint32(&mut self, what: &str) -> Result<i32, CodecError> {
        let v = self.read_varuint32(what)?;
        Ok(((v >> 1) as i32) ^ -((v & 1) as i32))
    }

    /// varuint32 length prefix followed by the raw bytes.
    pub fn read_bytes(&mut self, what: &str) -> Result<&'a [u8], CodecError> {
        let len = self.read_varuint32(what)? as usize;
        self.read_exact(len, what)
    }

    pub fn read_str(&mut self, what: &str) -> Result<&'a str, CodecError> {
        let bytes = self.read_bytes(what)?;
        std::str::from_utf8(bytes).map_err(|_| CodecError::Utf8)
    }
}
