//! Volumetric annotation core for NIfTI-1 neuroimaging volumes.
//!
//! This crate decodes (possibly gzip-compressed) `.nii` byte streams into a
//! typed header and voxel buffer, projects 2D slices along the three
//! anatomical viewing planes, paints a binary region-of-interest mask
//! through circular brush and eraser stamps, and re-serializes the volume
//! with the mask burned in, preserving the original header bytes exactly.
//!
//! The crate is a pure library: the host application hands in raw file
//! bytes and pointer gestures, and receives rasters and output byte
//! streams back. No I/O happens beyond the buffers given to it (plus thin
//! optional file-path conveniences).
//!
//! # Example
//!
//! ```no_run
//! use niimask::{MaskVolume, NiftiImage, SlicePlane, SliceOptions, Stroke, Tool, VolumeLayout};
//!
//! # fn run() -> niimask::Result<()> {
//! # let bytes: Vec<u8> = vec![];
//! let image = NiftiImage::decode(&bytes)?;
//! let raster = niimask::extract_slice(
//!     image.header(),
//!     image.voxel_bytes(),
//!     SlicePlane::Axial,
//!     12,
//!     &SliceOptions::default(),
//! )?;
//!
//! let layout = VolumeLayout::from_header(image.header());
//! let mut mask = MaskVolume::new(&layout);
//! mask.apply_stroke(SlicePlane::Axial, 12, &Stroke::new(Tool::Brush, (64, 48), 6));
//!
//! let out = niimask::build_output(&image, &mask, &Default::default())?;
//! # Ok(())
//! # }
//! ```
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate num_derive;

pub mod error;
pub mod header;
pub mod interact;
pub mod object;
pub mod typedef;
mod util;
pub mod volume;
pub mod writer;

pub use crate::error::{NiftiError, Result};
pub use crate::header::NiftiHeader;
pub use crate::interact::{Gesture, Interaction, PointerMode, PointerState};
pub use crate::object::NiftiImage;
pub use crate::typedef::NiftiType;
pub use crate::util::Endianness;
pub use crate::volume::mask::{interpolate_stamps, overlay_rgba, MaskVolume, Stroke, Tool};
pub use crate::volume::raster::{
    extract_slice, rgba_bytes, to_rgba, volume_min_max, DisplayAdjust, RasterSlice, SliceOptions,
};
pub use crate::volume::{slice_range, SlicePlane, VolumeLayout};
pub use crate::writer::{build_output, write_file, OutputOptions};
