//! Sequential writer producing one asset's serialized region

use glam::{Vec2, Vec3, Vec4};

use super::Endian;
use crate::version::{FormatVersion, TransferFlags};

macro_rules! write_scalar {
    ($name:ident, $codec:ident, $ty:ty, $size:expr) => {
        pub fn $name(&mut self, value: $ty) {
            let mut bytes = [0u8; $size];
            self.endian.$codec(&mut bytes, value);
            self.buffer.extend_from_slice(&bytes);
        }
    };
}

/// Endian-aware writer that mirrors [`super::AssetReader`].
#[derive(Debug, Clone)]
pub struct AssetWriter {
    buffer: Vec<u8>,
    endian: Endian,
    version: FormatVersion,
    flags: TransferFlags,
}

impl AssetWriter {
    pub fn new(endian: Endian, version: FormatVersion, flags: TransferFlags) -> Self {
        Self {
            buffer: Vec::new(),
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
        self.buffer.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buffer.push(value as u8);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buffer.push(u8::from(value));
    }

    write_scalar!(write_u16, write_u16, u16, 2);
    write_scalar!(write_i16, write_i16, i16, 2);
    write_scalar!(write_u32, write_u32, u32, 4);
    write_scalar!(write_i32, write_i32, i32, 4);
    write_scalar!(write_i64, write_i64, i64, 8);
    write_scalar!(write_f32, write_f32, f32, 4);

    pub fn write_vec2(&mut self, value: Vec2) {
        for component in value.to_array() {
            self.write_f32(component);
        }
    }

    pub fn write_vec3(&mut self, value: Vec3) {
        for component in value.to_array() {
            self.write_f32(component);
        }
    }

    pub fn write_vec4(&mut self, value: Vec4) {
        for component in value.to_array() {
            self.write_f32(component);
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Append zero bytes up to the next multiple of `alignment`.
    pub fn align(&mut self, alignment: usize) {
        let padding = (alignment - self.buffer.len() % alignment) % alignment;
        self.buffer.resize(self.buffer.len() + padding, 0);
    }

    /// Write a 32-bit count followed by each element.
    pub fn write_array<T, F>(&mut self, items: &[T], mut element: F)
    where
        F: FnMut(&mut Self, &T),
    {
        self.write_i32(items.len() as i32);
        for item in items {
            element(self, item);
        }
    }

    pub fn write_byte_array(&mut self, bytes: &[u8]) {
        self.write_i32(bytes.len() as i32);
        self.write_bytes(bytes);
    }

    pub fn write_u32_array(&mut self, values: &[u32]) {
        self.write_array(values, |w, value| w.write_u32(*value));
    }

    /// Write a length-prefixed string followed by its padding.
    pub fn write_string(&mut self, text: &str) {
        self.write_byte_array(text.as_bytes());
        self.align(super::ALIGN);
    }
}
