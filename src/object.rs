//! Module for handling complete in-memory NIfTI volumes.
//!
//! [`NiftiImage`] is the entry point of the crate: it owns the full
//! inflated byte stream of one `.nii`/`.nii.gz` file plus its parsed
//! header. Every other component (slice projector, mask engine,
//! serializer) borrows the voxel payload out of it.

use crate::error::{NiftiError, Result};
use crate::header::{NiftiHeader, HEADER_SIZE, MAGIC_CODE_NI1};
use crate::typedef::NiftiType;
use crate::util::{is_gz_stream, Endianness};
use either::Either;
use flate2::bufread::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A NIfTI-1 volume fully contained in memory.
///
/// Holds the inflated byte stream exactly as it would appear in an
/// uncompressed `.nii` file. The bytes in `[0, vox_offset)`, header and
/// any extension records included, are kept verbatim so that the
/// serializer can reproduce them untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct NiftiImage {
    header: NiftiHeader,
    datatype: NiftiType,
    data: Vec<u8>,
    was_gzipped: bool,
}

impl NiftiImage {
    /// Decode a NIfTI volume from the raw bytes of a `.nii` or `.nii.gz`
    /// file.
    ///
    /// Gzip input is detected by its magic number and inflated fully in
    /// memory before parsing. A pure function of the input bytes; no I/O.
    ///
    /// # Errors
    ///
    /// - `NiftiError::CorruptCompression` if the gzip stream is damaged.
    /// - `NiftiError::NotNifti` if the signature or fixed fields are invalid.
    /// - `NiftiError::NoVolumeData` for detached-header (`.hdr`) streams.
    /// - `NiftiError::UnsupportedDataType` for datatype codes outside the
    ///   supported set.
    /// - `NiftiError::Truncated` if the buffer ends before the declared
    ///   voxel data.
    pub fn decode(bytes: &[u8]) -> Result<NiftiImage> {
        let was_gzipped = is_gz_stream(bytes);

        let mut source = if was_gzipped {
            Either::Left(GzDecoder::new(bytes))
        } else {
            Either::Right(bytes)
        };
        let mut data = Vec::with_capacity(bytes.len());
        // only the gzip side can fail: reading from a plain slice is total
        let _ = source
            .read_to_end(&mut data)
            .map_err(NiftiError::CorruptCompression)?;

        if data.len() < HEADER_SIZE {
            return Err(NiftiError::Truncated);
        }
        let header = NiftiHeader::from_stream(&data[..])?;
        if &header.magic == MAGIC_CODE_NI1 {
            return Err(NiftiError::NoVolumeData);
        }

        let vox_offset = header.vox_offset_bytes();
        if !header.vox_offset.is_finite() || header.vox_offset < 0. || vox_offset > data.len() {
            return Err(NiftiError::Truncated);
        }
        header.validate(data.len() - vox_offset)?;
        let datatype = header.data_type()?;

        Ok(NiftiImage {
            header,
            datatype,
            data,
            was_gzipped,
        })
    }

    /// Read and decode a volume from a file in the file system.
    ///
    /// A thin convenience over [`decode`](Self::decode); compression is
    /// detected from the stream content, not the file name.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<NiftiImage> {
        let mut bytes = Vec::new();
        let _ = BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;
        Self::decode(&bytes)
    }

    /// Obtain a reference to the parsed header.
    pub fn header(&self) -> &NiftiHeader {
        &self.header
    }

    /// The validated voxel datatype.
    pub fn data_type(&self) -> NiftiType {
        self.datatype
    }

    /// The byte order the voxel data is stored in.
    pub fn endianness(&self) -> Endianness {
        self.header.endianness
    }

    /// Whether the source stream was gzip-compressed.
    pub fn was_gzipped(&self) -> bool {
        self.was_gzipped
    }

    /// The full inflated stream, header bytes included.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The voxel payload: everything from the header's declared data
    /// offset through the end of the stream.
    pub fn voxel_bytes(&self) -> &[u8] {
        &self.data[self.header.vox_offset_bytes()..]
    }
}
