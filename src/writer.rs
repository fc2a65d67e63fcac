//! Serialization of annotated volumes back into NIfTI byte streams.
//!
//! The output preserves the original bytes up to the voxel data offset
//! (header and extension records verbatim, so downstream tools see the
//! exact geometry and orientation of the source) and substitutes the
//! mask-painted voxels in the payload, re-compressing when asked.

use crate::error::{NiftiError, Result};
use crate::object::NiftiImage;
use crate::util::is_gz_file;
use crate::volume::mask::MaskVolume;
use crate::volume::VolumeLayout;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::Path;

/// Options for [`build_output`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputOptions {
    /// Whether to gzip the assembled stream. `None` follows the source:
    /// compressed input yields compressed output.
    pub compress: Option<bool>,
    /// Burn the mask into this phase only; `None` burns it into every
    /// phase (the mask is defined over the anatomical grid all phases
    /// share).
    pub phase: Option<usize>,
}

/// Assemble a complete NIfTI byte stream: the original bytes up to the
/// voxel data offset copied verbatim, then the voxel payload with `255`
/// written in the voxel's native datatype encoding wherever the mask is
/// set, all other bytes unchanged.
///
/// Pure with respect to its inputs: a new buffer is allocated and
/// neither the image nor the mask is mutated. An unallocated mask
/// reproduces the payload untouched.
///
/// # Errors
///
/// - `NiftiError::OutOfRange` if `opts.phase` exceeds the phase count.
/// - `NiftiError::Io` if gzip encoding fails to write (out of memory is
///   the only realistic cause for an in-memory sink).
pub fn build_output(image: &NiftiImage, mask: &MaskVolume, opts: &OutputOptions) -> Result<Vec<u8>> {
    let layout = VolumeLayout::from_header(image.header());
    let phases = phase_selection(&layout, opts.phase)?;

    let mut out = image.raw_bytes().to_vec();
    if let Some(mask_bytes) = mask.as_bytes() {
        if mask_bytes.len() != layout.phase_len() {
            return Err(NiftiError::OutOfRange("mask length", mask_bytes.len()));
        }
        let dtype = image.data_type();
        let endianness = image.endianness();
        let vox_offset = image.header().vox_offset_bytes();
        for phase in phases {
            for z in 0..layout.nz() {
                for y in 0..layout.ny() {
                    for x in 0..layout.nx() {
                        if mask_bytes[layout.voxel_index(x, y, z)] == 0 {
                            continue;
                        }
                        let offset = vox_offset + layout.byte_offset(x, y, z, phase);
                        dtype.write_value(&mut out[offset..], endianness, 255.)?;
                    }
                }
            }
        }
    }

    if opts.compress.unwrap_or_else(|| image.was_gzipped()) {
        deflate(&out)
    } else {
        Ok(out)
    }
}

/// Assemble and write an annotated volume to a file.
///
/// When `opts.compress` is `None`, the file extension decides: paths
/// ending in `.gz` are compressed.
pub fn write_file<P: AsRef<Path>>(
    path: P,
    image: &NiftiImage,
    mask: &MaskVolume,
    opts: &OutputOptions,
) -> Result<()> {
    let resolved = OutputOptions {
        compress: Some(opts.compress.unwrap_or_else(|| is_gz_file(&path))),
        phase: opts.phase,
    };
    let bytes = build_output(image, mask, &resolved)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    Ok(())
}

fn phase_selection(layout: &VolumeLayout, phase: Option<usize>) -> Result<Range<usize>> {
    match phase {
        Some(p) if p >= layout.phases() => Err(NiftiError::OutOfRange("phase", p)),
        Some(p) => Ok(p..p + 1),
        None => Ok(0..layout.phases()),
    }
}

fn deflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(
        Vec::with_capacity(bytes.len() / 2),
        Compression::default(),
    );
    encoder.write_all(bytes)?;
    encoder.finish().map_err(From::from)
}
