//! Shared helpers for building synthetic NIfTI-1 byte streams in tests.
#![allow(dead_code)]

use byteorder::{ByteOrder, WriteBytesExt};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// The header fields the tests care about; everything else is zeroed.
pub struct VolumeSpec {
    pub dim: [u16; 8],
    pub datatype: i16,
    pub bitpix: i16,
    pub scl_slope: f32,
    pub scl_inter: f32,
    pub cal_min: f32,
    pub cal_max: f32,
    pub magic: [u8; 4],
}

impl Default for VolumeSpec {
    fn default() -> VolumeSpec {
        VolumeSpec {
            dim: [3, 4, 4, 4, 0, 0, 0, 0],
            datatype: 2,
            bitpix: 8,
            scl_slope: 0.,
            scl_inter: 0.,
            cal_min: 0.,
            cal_max: 0.,
            magic: *b"n+1\0",
        }
    }
}

/// Serialize a single-file NIfTI-1 stream in byte order `B`: the fixed
/// 348-byte header, the 4-byte extender, then the payload verbatim.
pub fn build_nii<B: ByteOrder>(spec: &VolumeSpec, payload: &[u8]) -> Vec<u8> {
    let mut w = Vec::with_capacity(352 + payload.len());
    w.write_i32::<B>(348).unwrap();
    w.write_all(&[0u8; 10]).unwrap(); // data_type
    w.write_all(&[0u8; 18]).unwrap(); // db_name
    w.write_i32::<B>(0).unwrap(); // extents
    w.write_i16::<B>(0).unwrap(); // session_error
    w.write_u8(0).unwrap(); // regular
    w.write_u8(0).unwrap(); // dim_info
    for d in &spec.dim {
        w.write_u16::<B>(*d).unwrap();
    }
    for _ in 0..3 {
        w.write_f32::<B>(0.).unwrap(); // intent_p1..p3
    }
    w.write_i16::<B>(0).unwrap(); // intent_code
    w.write_i16::<B>(spec.datatype).unwrap();
    w.write_i16::<B>(spec.bitpix).unwrap();
    w.write_i16::<B>(0).unwrap(); // slice_start
    for _ in 0..8 {
        w.write_f32::<B>(0.).unwrap(); // pixdim
    }
    w.write_f32::<B>(352.).unwrap(); // vox_offset
    w.write_f32::<B>(spec.scl_slope).unwrap();
    w.write_f32::<B>(spec.scl_inter).unwrap();
    w.write_i16::<B>(0).unwrap(); // slice_end
    w.write_u8(0).unwrap(); // slice_code
    w.write_u8(0).unwrap(); // xyzt_units
    w.write_f32::<B>(spec.cal_max).unwrap();
    w.write_f32::<B>(spec.cal_min).unwrap();
    w.write_f32::<B>(0.).unwrap(); // slice_duration
    w.write_f32::<B>(0.).unwrap(); // toffset
    w.write_i32::<B>(0).unwrap(); // glmax
    w.write_i32::<B>(0).unwrap(); // glmin
    w.write_all(&[0u8; 80]).unwrap(); // descrip
    w.write_all(&[0u8; 24]).unwrap(); // aux_file
    w.write_i16::<B>(0).unwrap(); // qform_code
    w.write_i16::<B>(0).unwrap(); // sform_code
    for _ in 0..6 {
        w.write_f32::<B>(0.).unwrap(); // quatern_b..z
    }
    for _ in 0..12 {
        w.write_f32::<B>(0.).unwrap(); // srow_x/y/z
    }
    w.write_all(&[0u8; 16]).unwrap(); // intent_name
    w.write_all(&spec.magic).unwrap();
    assert_eq!(w.len(), 348);

    w.write_all(&[0u8; 4]).unwrap(); // extender
    w.write_all(payload).unwrap();
    w
}

/// Gzip-compress a byte stream the way a `.nii.gz` file is stored.
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}
