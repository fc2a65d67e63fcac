//! The paintable annotation mask: a dense binary volume over the
//! anatomical grid, edited through circular brush and eraser stamps and
//! projected into per-slice overlay rasters.

use crate::volume::raster::RasterSlice;
use crate::volume::{SlicePlane, VolumeLayout};
use rgb::{RGB8, RGBA8};

/// Mask byte for a painted voxel.
pub const MASKED: u8 = 255;
/// Mask byte for an untouched voxel.
pub const CLEAR: u8 = 0;

/// The two painting tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Sets voxels under the stamp to [`MASKED`].
    Brush,
    /// Resets voxels under the stamp to [`CLEAR`].
    Eraser,
}

/// One circular stamp: tool, center in slice coordinates, radius in
/// pixels. Strokes are transient; they are applied immediately and
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    /// Which tool the stamp applies.
    pub tool: Tool,
    /// Stamp center in slice pixel coordinates. May lie outside the
    /// slice; only the in-bounds part of the disc is written.
    pub center: (i32, i32),
    /// Stamp radius in slice pixels. Radius 0 paints a single pixel.
    pub radius: u32,
}

impl Stroke {
    /// Construct a stroke.
    pub fn new(tool: Tool, center: (i32, i32), radius: u32) -> Stroke {
        Stroke {
            tool,
            center,
            radius,
        }
    }
}

/// A binary region-of-interest mask over one volume's anatomical grid.
///
/// The mask ignores phases: all time points of a 4D volume share one
/// annotation. Storage is allocated lazily on the first brush stroke, so
/// an untouched mask costs nothing. The engine owns the storage
/// exclusively; the host may read a snapshot through
/// [`as_bytes`](Self::as_bytes) but never mutates it directly.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskVolume {
    layout: VolumeLayout,
    data: Option<Vec<u8>>,
}

impl MaskVolume {
    /// Create an empty (unallocated) mask matching the volume's
    /// anatomical grid.
    pub fn new(layout: &VolumeLayout) -> MaskVolume {
        MaskVolume {
            layout: layout.anatomical(),
            data: None,
        }
    }

    /// Whether any storage has been allocated yet.
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    /// Read-only snapshot of the dense mask bytes, in volume linear
    /// order. `None` until the first brush stroke.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// The mask value at a voxel coordinate; [`CLEAR`] while unallocated
    /// or out of bounds.
    pub fn value_at(&self, x: usize, y: usize, z: usize) -> u8 {
        if x >= self.layout.nx() || y >= self.layout.ny() || z >= self.layout.nz() {
            return CLEAR;
        }
        match &self.data {
            Some(data) => data[self.layout.voxel_index(x, y, z)],
            None => CLEAR,
        }
    }

    /// Apply one circular stamp to the slice at `index` in the given
    /// plane.
    ///
    /// Every integer offset `(du, dv)` with `du² + dv² ≤ r²` around the
    /// stamp center that lands inside the slice is written straight into
    /// the 3D mask through the layout's index function. There is no
    /// intermediate 2D buffer to merge back, so the edit is immediately
    /// durable in the canonical volume. Writes are idempotent;
    /// overlapping stamps are last-write-wins.
    ///
    /// An eraser stamp on a still-unallocated mask is a no-op.
    pub fn apply_stroke(&mut self, plane: SlicePlane, index: u16, stroke: &Stroke) {
        if self.data.is_none() && stroke.tool == Tool::Eraser {
            return;
        }
        let layout = self.layout;
        let index = layout.clamp_index(plane, index);
        let (width, height) = layout.slice_dims(plane);
        let value = match stroke.tool {
            Tool::Brush => MASKED,
            Tool::Eraser => CLEAR,
        };

        let volume_len = layout.volume_len();
        let data = self.data.get_or_insert_with(|| vec![CLEAR; volume_len]);

        let (cx, cy) = (i64::from(stroke.center.0), i64::from(stroke.center.1));
        let r = i64::from(stroke.radius);
        for dv in -r..=r {
            for du in -r..=r {
                if du * du + dv * dv > r * r {
                    continue;
                }
                let (u, v) = (cx + du, cy + dv);
                if u < 0 || v < 0 || u as usize >= width || v as usize >= height {
                    continue;
                }
                let (x, y, z) = layout.volume_coords(plane, u as usize, v as usize, index);
                data[layout.voxel_index(x, y, z)] = value;
            }
        }
    }

    /// Project the mask's cross-section at `index` in the given plane
    /// into an overlay alpha raster: 127 where masked, 0 elsewhere
    /// (half-opacity so the grayscale image stays visible underneath).
    ///
    /// The stored mask itself stays strictly binary; the alpha scaling
    /// exists only in this display raster.
    pub fn project_slice(&self, plane: SlicePlane, index: u16) -> RasterSlice {
        let layout = self.layout;
        let index = layout.clamp_index(plane, index);
        let (width, height) = layout.slice_dims(plane);
        let mut pixels = vec![0u8; width * height];
        if let Some(data) = &self.data {
            for v in 0..height {
                for u in 0..width {
                    let (x, y, z) = layout.volume_coords(plane, u, v, index);
                    pixels[v * width + u] = data[layout.voxel_index(x, y, z)] / 2;
                }
            }
        }
        RasterSlice::new(width, height, pixels)
    }
}

/// Rasterize the line segment between two consecutive pointer positions
/// into stamp centers, endpoints included, so that drag gestures leave no
/// gaps at high pointer velocity.
///
/// Pure function; the host (or the interaction machine) feeds each
/// returned center to [`MaskVolume::apply_stroke`] as one stamp.
pub fn interpolate_stamps(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x, mut y) = (from.0, from.1);
    let dx = (to.0 - from.0).abs();
    let dy = -(to.1 - from.1).abs();
    let sx = if from.0 < to.0 { 1 } else { -1 };
    let sy = if from.1 < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut centers = Vec::with_capacity((dx - dy) as usize + 1);
    loop {
        centers.push((x, y));
        if (x, y) == to {
            return centers;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Colorize an overlay alpha raster (as produced by
/// [`MaskVolume::project_slice`]) for the host's rendering sink.
pub fn overlay_rgba(raster: &RasterSlice, color: RGB8) -> Vec<RGBA8> {
    raster
        .pixels()
        .iter()
        .map(|&alpha| RGBA8::new(color.r, color.g, color.b, alpha))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::interpolate_stamps;

    #[test]
    fn interpolation_covers_endpoints() {
        let centers = interpolate_stamps((0, 0), (5, 3));
        assert_eq!(centers.first(), Some(&(0, 0)));
        assert_eq!(centers.last(), Some(&(5, 3)));
    }

    #[test]
    fn interpolation_leaves_no_gaps() {
        for &target in &[(7, 2), (-4, 9), (3, -8), (-5, -5), (0, 6), (6, 0)] {
            let centers = interpolate_stamps((0, 0), target);
            for pair in centers.windows(2) {
                assert!((pair[0].0 - pair[1].0).abs() <= 1);
                assert!((pair[0].1 - pair[1].1).abs() <= 1);
            }
        }
    }

    #[test]
    fn degenerate_segment_is_one_stamp() {
        assert_eq!(interpolate_stamps((3, 3), (3, 3)), vec![(3, 3)]);
    }
}
