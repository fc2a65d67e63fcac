//! Private utility module
use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Result as IoResult, Write};
use std::path::Path;

/// The two-byte magic number announcing a gzip stream.
pub const GZ_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Check whether the given byte stream starts with the gzip magic number.
pub fn is_gz_stream(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[..2] == GZ_MAGIC
}

/// Check whether the file at the given path should be gzip-encoded,
/// based on its extension.
pub fn is_gz_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|e| e.to_string_lossy() == "gz")
        .unwrap_or(false)
}

/// Apply the header-declared intensity scaling to a raw voxel value.
/// A zero slope means "no scaling declared" and leaves the value as is.
pub fn apply_scaling(value: f64, slope: f32, inter: f32) -> f64 {
    if slope != 0. {
        value * f64::from(slope) + f64::from(inter)
    } else {
        value
    }
}

/// Enumerate for the two kinds of endianness possible by the standard.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Endianness {
    /// Little Endian
    LE,
    /// Big Endian
    BE,
}

impl Endianness {
    /// Obtain this system's endianness
    #[cfg(target_endian = "little")]
    pub fn system() -> Endianness {
        Endianness::LE
    }

    /// Obtain this system's endianness
    #[cfg(target_endian = "big")]
    pub fn system() -> Endianness {
        Endianness::BE
    }

    /// The opposite endianness: Little Endian returns Big Endian and vice versa.
    pub fn opposite(&self) -> Endianness {
        if *self == Endianness::LE {
            Endianness::BE
        } else {
            Endianness::LE
        }
    }

    /// Read a primitive value with this endianness from the given source.
    pub fn read_i16<S>(&self, mut src: S) -> IoResult<i16>
    where
        S: Read,
    {
        match *self {
            Endianness::LE => src.read_i16::<LittleEndian>(),
            Endianness::BE => src.read_i16::<BigEndian>(),
        }
    }

    /// Read a primitive value with this endianness from the given source.
    pub fn read_u16<S>(&self, mut src: S) -> IoResult<u16>
    where
        S: Read,
    {
        match *self {
            Endianness::LE => src.read_u16::<LittleEndian>(),
            Endianness::BE => src.read_u16::<BigEndian>(),
        }
    }

    /// Read a primitive value with this endianness from the given source.
    pub fn read_i32<S>(&self, mut src: S) -> IoResult<i32>
    where
        S: Read,
    {
        match *self {
            Endianness::LE => src.read_i32::<LittleEndian>(),
            Endianness::BE => src.read_i32::<BigEndian>(),
        }
    }

    /// Read a primitive value with this endianness from the given source.
    pub fn read_u32<S>(&self, mut src: S) -> IoResult<u32>
    where
        S: Read,
    {
        match *self {
            Endianness::LE => src.read_u32::<LittleEndian>(),
            Endianness::BE => src.read_u32::<BigEndian>(),
        }
    }

    /// Read a primitive value with this endianness from the given source.
    pub fn read_f32<S>(&self, mut src: S) -> IoResult<f32>
    where
        S: Read,
    {
        match *self {
            Endianness::LE => src.read_f32::<LittleEndian>(),
            Endianness::BE => src.read_f32::<BigEndian>(),
        }
    }

    /// Read a primitive value with this endianness from the given source.
    pub fn read_f64<S>(&self, mut src: S) -> IoResult<f64>
    where
        S: Read,
    {
        match *self {
            Endianness::LE => src.read_f64::<LittleEndian>(),
            Endianness::BE => src.read_f64::<BigEndian>(),
        }
    }

    /// Write a primitive value with this endianness to the given sink.
    pub fn write_i16<W>(&self, mut dst: W, value: i16) -> IoResult<()>
    where
        W: Write,
    {
        match *self {
            Endianness::LE => dst.write_i16::<LittleEndian>(value),
            Endianness::BE => dst.write_i16::<BigEndian>(value),
        }
    }

    /// Write a primitive value with this endianness to the given sink.
    pub fn write_u16<W>(&self, mut dst: W, value: u16) -> IoResult<()>
    where
        W: Write,
    {
        match *self {
            Endianness::LE => dst.write_u16::<LittleEndian>(value),
            Endianness::BE => dst.write_u16::<BigEndian>(value),
        }
    }

    /// Write a primitive value with this endianness to the given sink.
    pub fn write_i32<W>(&self, mut dst: W, value: i32) -> IoResult<()>
    where
        W: Write,
    {
        match *self {
            Endianness::LE => dst.write_i32::<LittleEndian>(value),
            Endianness::BE => dst.write_i32::<BigEndian>(value),
        }
    }

    /// Write a primitive value with this endianness to the given sink.
    pub fn write_u32<W>(&self, mut dst: W, value: u32) -> IoResult<()>
    where
        W: Write,
    {
        match *self {
            Endianness::LE => dst.write_u32::<LittleEndian>(value),
            Endianness::BE => dst.write_u32::<BigEndian>(value),
        }
    }

    /// Write a primitive value with this endianness to the given sink.
    pub fn write_f32<W>(&self, mut dst: W, value: f32) -> IoResult<()>
    where
        W: Write,
    {
        match *self {
            Endianness::LE => dst.write_f32::<LittleEndian>(value),
            Endianness::BE => dst.write_f32::<BigEndian>(value),
        }
    }

    /// Write a primitive value with this endianness to the given sink.
    pub fn write_f64<W>(&self, mut dst: W, value: f64) -> IoResult<()>
    where
        W: Write,
    {
        match *self {
            Endianness::LE => dst.write_f64::<LittleEndian>(value),
            Endianness::BE => dst.write_f64::<BigEndian>(value),
        }
    }
}

/// Defines the serialization that is opposite to system native-endian.
/// This is `BigEndian` in a Little Endian system and `LittleEndian` in a Big Endian system.
///
/// Note that this type has no value constructor. It is used purely at the
/// type level.
#[cfg(target_endian = "little")]
pub type OppositeNativeEndian = BigEndian;

/// Defines the serialization that is opposite to system native-endian.
/// This is `BigEndian` in a Little Endian system and `LittleEndian` in a Big Endian system.
///
/// Note that this type has no value constructor. It is used purely at the
/// type level.
#[cfg(target_endian = "big")]
pub type OppositeNativeEndian = LittleEndian;
