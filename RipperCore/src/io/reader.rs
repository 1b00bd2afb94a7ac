//! Sequential reader over one asset's serialized region

use glam::{Vec2, Vec3, Vec4};

use super::Endian;
use crate::error::{Error, Result};
use crate::version::{FormatVersion, TransferFlags};

macro_rules! read_scalar {
    ($name:ident, $ty:ty, $size:expr) => {
        pub fn $name(&mut self) -> Result<$ty> {
            let bytes = self.take($size)?;
            Ok(self.endian.$name(bytes))
        }
    };
}

/// Endian-aware cursor over a borrowed byte region.
///
/// Positions and alignment are relative to the start of the region, which is
/// the start of the asset being decoded. Reading past the end fails with
/// [`Error::TruncatedInput`]; nothing is ever zero-filled.
#[derive(Debug, Clone)]
pub struct AssetReader<'a> {
    data: &'a [u8],
    position: usize,
    endian: Endian,
    version: FormatVersion,
    flags: TransferFlags,
}

impl<'a> AssetReader<'a> {
    pub fn new(data: &'a [u8], endian: Endian, version: FormatVersion, flags: TransferFlags) -> Self {
        Self {
            data,
            position: 0,
            endian,
            version,
            flags,
        }
    }

    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn flags(&self) -> TransferFlags {
        self.flags
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the cursor and the end of the region.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Move the cursor to an absolute position inside the region.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(self.truncated(position - self.position));
        }
        self.position = position;
        Ok(())
    }

    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.take(count).map(|_| ())
    }

    fn truncated(&self, needed: usize) -> Error {
        Error::TruncatedInput {
            offset: self.position,
            needed,
            available: self.remaining(),
        }
    }

    /// Borrow the next `count` bytes and advance past them.
    pub fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(self.truncated(count));
        }
        let data: &'a [u8] = self.data;
        let bytes = &data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Any non-zero byte is `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    read_scalar!(read_u16, u16, 2);
    read_scalar!(read_i16, i16, 2);
    read_scalar!(read_u32, u32, 4);
    read_scalar!(read_i32, i32, 4);
    read_scalar!(read_i64, i64, 8);
    read_scalar!(read_f32, f32, 4);

    pub fn read_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::new(self.read_f32()?, self.read_f32()?))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    pub fn read_vec4(&mut self) -> Result<Vec4> {
        Ok(Vec4::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    /// Skip zero padding up to the next multiple of `alignment`.
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        let padding = (alignment - self.position % alignment) % alignment;
        self.skip(padding)
    }

    /// Read a 32-bit element count.
    fn read_count(&mut self) -> Result<usize> {
        let count = self.read_i32()?;
        usize::try_from(count)
            .map_err(|_| Error::InvalidFormat(format!("negative array length {count} at offset {}", self.position - 4)))
    }

    /// Read a length-prefixed array, decoding each element with `element`.
    ///
    /// Initial capacity is bounded by the bytes left in the region.
    pub fn read_array<T, F>(&mut self, mut element: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let count = self.read_count()?;
        let mut items = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            items.push(element(self)?);
        }
        Ok(items)
    }

    /// Read a length-prefixed byte blob.
    pub fn read_byte_array(&mut self) -> Result<Vec<u8>> {
        let count = self.read_count()?;
        Ok(self.take(count)?.to_vec())
    }

    pub fn read_u32_array(&mut self) -> Result<Vec<u32>> {
        self.read_array(Self::read_u32)
    }

    /// Read a length-prefixed UTF-8 string and the padding after it.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.position;
        let count = self.read_count()?;
        let text = String::from_utf8(self.take(count)?.to_vec())
            .map_err(|err| Error::InvalidFormat(format!("string at offset {start} is not UTF-8: {err}")))?;
        self.align(super::ALIGN)?;
        Ok(text)
    }
}
