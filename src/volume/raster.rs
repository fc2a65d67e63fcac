//! Slice projection: turning one plane of the voxel volume into an 8-bit
//! grayscale raster, plus the presentation helpers that map rasters to
//! RGBA pixels for the host's rendering sink.

use crate::error::{NiftiError, Result};
use crate::header::NiftiHeader;
use crate::util::apply_scaling;
use crate::volume::{SlicePlane, VolumeLayout};
use rgb::{ComponentBytes, RGBA8};

/// How many voxels the automatic window scan samples, independent of
/// volume size. The scan is intentionally inexact: it yields a stable,
/// reasonable contrast without an O(volume) pass on every navigation.
const WINDOW_SCAN_SAMPLES: usize = 10_000;

/// An ephemeral 2D grayscale view of one volume slice.
///
/// Recomputed on every navigation or edit; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSlice {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl RasterSlice {
    pub(crate) fn new(width: usize, height: usize, pixels: Vec<u8>) -> RasterSlice {
        debug_assert_eq!(pixels.len(), width * height);
        RasterSlice {
            width,
            height,
            pixels,
        }
    }

    /// Raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The row-major pixel buffer.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The pixel at `(u, v)`.
    pub fn pixel_at(&self, u: usize, v: usize) -> u8 {
        self.pixels[v * self.width + u]
    }
}

/// Options for [`extract_slice`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceOptions {
    /// Lower bound of the intensity window. Auto-computed when absent.
    pub min: Option<f32>,
    /// Upper bound of the intensity window. Auto-computed when absent.
    pub max: Option<f32>,
    /// Which phase of a 4D volume to read. Must be in range.
    pub phase: usize,
}

impl Default for SliceOptions {
    fn default() -> SliceOptions {
        SliceOptions {
            min: None,
            max: None,
            phase: 0,
        }
    }
}

/// Project one slice of the volume into an 8-bit grayscale raster.
///
/// Every output pixel is the voxel value read through the layout's index
/// function, scaled by the header's slope/intercept, then normalized into
/// `[0, 255]` with the effective intensity window: the caller's bounds if
/// given, else the header's calibration window, else a sampled scan of
/// the volume. A degenerate window (`max <= min`) maps every pixel to
/// 255 rather than dividing by zero.
///
/// The slice `index` is clamped into the valid range for the plane.
///
/// # Errors
///
/// - `NiftiError::UnsupportedDataType` if the header datatype is unknown.
/// - `NiftiError::OutOfRange` if `opts.phase` exceeds the phase count.
/// - `NiftiError::Truncated` if `voxels` is shorter than the header
///   declares.
pub fn extract_slice(
    header: &NiftiHeader,
    voxels: &[u8],
    plane: SlicePlane,
    index: u16,
    opts: &SliceOptions,
) -> Result<RasterSlice> {
    let layout = VolumeLayout::from_header(header);
    let dtype = header.data_type()?;
    if opts.phase >= layout.phases() {
        return Err(NiftiError::OutOfRange("phase", opts.phase));
    }
    if voxels.len() < (opts.phase + 1) * layout.phase_len() * layout.bytes_per_voxel() {
        return Err(NiftiError::Truncated);
    }

    let (min, max) = match (opts.min, opts.max) {
        (Some(min), Some(max)) => (min, max),
        (min, max) => {
            let (auto_min, auto_max) = auto_window(header, voxels, opts.phase)?;
            (min.unwrap_or(auto_min), max.unwrap_or(auto_max))
        }
    };
    let lo = f64::from(min);
    let span = f64::from(max) - lo;

    let index = layout.clamp_index(plane, index);
    let (width, height) = layout.slice_dims(plane);
    let mut pixels = vec![0u8; width * height];
    for v in 0..height {
        for u in 0..width {
            let (x, y, z) = layout.volume_coords(plane, u, v, index);
            let offset = layout.byte_offset(x, y, z, opts.phase);
            let raw = dtype.read_value(&voxels[offset..], header.endianness)?;
            let value = apply_scaling(raw, header.scl_slope, header.scl_inter);
            pixels[v * width + u] = if span > 0. {
                ((value - lo) / span * 255.).round().clamp(0., 255.) as u8
            } else {
                // flat volume: everything sits at the window ceiling
                255
            };
        }
    }
    Ok(RasterSlice::new(width, height, pixels))
}

/// Scan the selected phase of the volume for its scaled intensity range.
///
/// Sampling happens at a stride that visits roughly
/// [`WINDOW_SCAN_SAMPLES`] voxels, so the result is approximate for
/// large volumes; it is meant as a display window, not as exact extrema.
pub fn volume_min_max(header: &NiftiHeader, voxels: &[u8], phase: usize) -> Result<(f32, f32)> {
    let layout = VolumeLayout::from_header(header);
    let dtype = header.data_type()?;
    if phase >= layout.phases() {
        return Err(NiftiError::OutOfRange("phase", phase));
    }
    let phase_len = layout.phase_len();
    if voxels.len() < (phase + 1) * phase_len * layout.bytes_per_voxel() {
        return Err(NiftiError::Truncated);
    }

    let stride = (phase_len / WINDOW_SCAN_SAMPLES).max(1);
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for i in (0..phase_len).step_by(stride) {
        let offset = (phase * phase_len + i) * layout.bytes_per_voxel();
        let raw = dtype.read_value(&voxels[offset..], header.endianness)?;
        let value = apply_scaling(raw, header.scl_slope, header.scl_inter);
        if value.is_finite() {
            min = min.min(value);
            max = max.max(value);
        }
    }
    if min > max {
        // nothing finite in the scan
        return Ok((0., 0.));
    }
    Ok((min as f32, max as f32))
}

fn auto_window(header: &NiftiHeader, voxels: &[u8], phase: usize) -> Result<(f32, f32)> {
    if let Some(window) = header.cal_window() {
        return Ok(window);
    }
    volume_min_max(header, voxels, phase)
}

/// Brightness/contrast post-adjustment applied at presentation time.
///
/// The grayscale raster itself is left untouched; the adjustment only
/// shapes the RGBA pixels handed to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayAdjust {
    /// Contrast factor around the mid-gray pivot. 1.0 is neutral.
    pub contrast: f32,
    /// Brightness gain multiplied into the contrast term. 1.0 is neutral.
    pub brightness_gain: f32,
    /// Additive brightness offset. 0.0 is neutral.
    pub brightness_bias: f32,
}

impl Default for DisplayAdjust {
    fn default() -> DisplayAdjust {
        DisplayAdjust {
            contrast: 1.,
            brightness_gain: 1.,
            brightness_bias: 0.,
        }
    }
}

/// Expand a grayscale raster into opaque RGBA pixels with the given
/// brightness/contrast adjustment:
/// `out = clamp(128 + (in - 128)·contrast·gain + bias, 0, 255)`,
/// replicated over R/G/B with alpha fixed at 255.
pub fn to_rgba(raster: &RasterSlice, adjust: &DisplayAdjust) -> Vec<RGBA8> {
    let gain = adjust.contrast * adjust.brightness_gain;
    raster
        .pixels()
        .iter()
        .map(|&p| {
            let out = 128. + (f32::from(p) - 128.) * gain + adjust.brightness_bias;
            let g = out.round().clamp(0., 255.) as u8;
            RGBA8::new(g, g, g, 255)
        })
        .collect()
}

/// View an RGBA pixel buffer as raw bytes for the host's rendering sink.
pub fn rgba_bytes(pixels: &[RGBA8]) -> &[u8] {
    pixels.as_bytes()
}
