//! Runtime byte order selection

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Byte order of a serialized region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

macro_rules! endian_codec {
    ($read:ident, $write:ident, $ty:ty) => {
        /// Decode from the start of `buf`, which must hold enough bytes.
        pub fn $read(self, buf: &[u8]) -> $ty {
            match self {
                Endian::Little => LittleEndian::$read(buf),
                Endian::Big => BigEndian::$read(buf),
            }
        }

        /// Encode into the start of `buf`, which must hold enough bytes.
        pub fn $write(self, buf: &mut [u8], value: $ty) {
            match self {
                Endian::Little => LittleEndian::$write(buf, value),
                Endian::Big => BigEndian::$write(buf, value),
            }
        }
    };
}

impl Endian {
    endian_codec!(read_u16, write_u16, u16);
    endian_codec!(read_i16, write_i16, i16);
    endian_codec!(read_u32, write_u32, u32);
    endian_codec!(read_i32, write_i32, i32);
    endian_codec!(read_i64, write_i64, i64);
    endian_codec!(read_f32, write_f32, f32);
}
