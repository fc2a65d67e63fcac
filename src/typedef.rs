//! The closed set of voxel datatypes supported by the annotation core.
//! `NiftiType` is the single place where the per-datatype byte layout is
//! known; both the slice projector (reader) and the serializer (writer)
//! dispatch through it, so adding a datatype is a compile-checked change
//! in one module.

use crate::error::{NiftiError, Result};
use crate::util::Endianness;
use byteorder::{ReadBytesExt, WriteBytesExt};
use num_complex::Complex32;
use std::io::{Read, Write};

/// Data type for representing a NIfTI value type in a volume.
///
/// Only the codes the annotation core supports are listed; any other code
/// is rejected at decode time with `NiftiError::UnsupportedDataType`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum NiftiType {
    /// unsigned char.
    // NIFTI_TYPE_UINT8           2
    Uint8 = 2,
    /// signed short.
    // NIFTI_TYPE_INT16           4
    Int16 = 4,
    /// signed int.
    // NIFTI_TYPE_INT32           8
    Int32 = 8,
    /// 32 bit float.
    // NIFTI_TYPE_FLOAT32        16
    Float32 = 16,
    /// 64 bit complex = 2 32 bit floats, reduced to its magnitude.
    // NIFTI_TYPE_COMPLEX64      32
    Complex64 = 32,
    /// 64 bit float = double.
    // NIFTI_TYPE_FLOAT64        64
    Float64 = 64,
    /// unsigned short.
    // NIFTI_TYPE_UINT16        512
    Uint16 = 512,
    /// unsigned int.
    // NIFTI_TYPE_UINT32        768
    Uint32 = 768,
}

impl NiftiType {
    /// Validate a raw header datatype code.
    pub fn from_code(code: i16) -> Result<NiftiType> {
        num_traits::FromPrimitive::from_i16(code).ok_or(NiftiError::UnsupportedDataType(code))
    }

    /// Retrieve the size of an element of this data type, in bytes.
    pub fn size_of(self) -> usize {
        use NiftiType::*;
        match self {
            Uint8 => 1,
            Int16 | Uint16 => 2,
            Int32 | Uint32 | Float32 => 4,
            Complex64 | Float64 => 8,
        }
    }

    /// Read one voxel value of this type from the given source.
    ///
    /// Integer and single-precision values are widened to `f64`; a
    /// complex value is reduced to its magnitude. The header-declared
    /// scale slope/intercept is *not* applied here.
    pub fn read_value<S>(self, mut source: S, endianness: Endianness) -> Result<f64>
    where
        S: Read,
    {
        let value = match self {
            NiftiType::Uint8 => f64::from(source.read_u8()?),
            NiftiType::Int16 => f64::from(endianness.read_i16(source)?),
            NiftiType::Int32 => f64::from(endianness.read_i32(source)?),
            NiftiType::Float32 => f64::from(endianness.read_f32(source)?),
            NiftiType::Complex64 => {
                let re = endianness.read_f32(&mut source)?;
                let im = endianness.read_f32(&mut source)?;
                f64::from(Complex32::new(re, im).norm())
            }
            NiftiType::Float64 => endianness.read_f64(source)?,
            NiftiType::Uint16 => f64::from(endianness.read_u16(source)?),
            NiftiType::Uint32 => f64::from(endianness.read_u32(source)?),
        };
        Ok(value)
    }

    /// Write one voxel value of this type to the given sink, in the
    /// type's native encoding.
    ///
    /// Out-of-range values saturate at the integer type's bounds. A
    /// complex value is written as `value + 0i`.
    pub fn write_value<W>(self, mut sink: W, endianness: Endianness, value: f64) -> Result<()>
    where
        W: Write,
    {
        match self {
            NiftiType::Uint8 => sink.write_u8(value as u8)?,
            NiftiType::Int16 => endianness.write_i16(sink, value as i16)?,
            NiftiType::Int32 => endianness.write_i32(sink, value as i32)?,
            NiftiType::Float32 => endianness.write_f32(sink, value as f32)?,
            NiftiType::Complex64 => {
                endianness.write_f32(&mut sink, value as f32)?;
                endianness.write_f32(&mut sink, 0.)?;
            }
            NiftiType::Float64 => endianness.write_f64(sink, value)?,
            NiftiType::Uint16 => endianness.write_u16(sink, value as u16)?,
            NiftiType::Uint32 => endianness.write_u32(sink, value as u32)?,
        }
        Ok(())
    }
}
