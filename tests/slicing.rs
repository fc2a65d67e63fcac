//! Slice projector tests: axis mapping, intensity scaling, windowing.

mod util;

use byteorder::LittleEndian;
use niimask::{
    extract_slice, rgba_bytes, slice_range, to_rgba, volume_min_max, DisplayAdjust, NiftiImage,
    SliceOptions, SlicePlane,
};
use pretty_assertions::assert_eq;
use util::{build_nii, VolumeSpec};

fn graded_u8_image() -> NiftiImage {
    // value = x + 4y + 16z, so every voxel is unique
    let mut payload = vec![0u8; 64];
    for z in 0..4 {
        for y in 0..4 {
            for x in 0..4 {
                payload[x + y * 4 + z * 16] = (x + y * 4 + z * 16) as u8;
            }
        }
    }
    let bytes = build_nii::<LittleEndian>(&VolumeSpec::default(), &payload);
    NiftiImage::decode(&bytes).unwrap()
}

fn window(min: f32, max: f32) -> SliceOptions {
    SliceOptions {
        min: Some(min),
        max: Some(max),
        phase: 0,
    }
}

fn expected_px(value: f64, min: f64, max: f64) -> u8 {
    ((value - min) / (max - min) * 255.).round().clamp(0., 255.) as u8
}

#[test]
fn axis_consistency() {
    let image = graded_u8_image();
    let opts = window(0., 63.);

    for z in 0..4u16 {
        for y in 0..4u16 {
            for x in 0..4u16 {
                let axial = extract_slice(
                    image.header(),
                    image.voxel_bytes(),
                    SlicePlane::Axial,
                    z,
                    &opts,
                )
                .unwrap();
                let coronal = extract_slice(
                    image.header(),
                    image.voxel_bytes(),
                    SlicePlane::Coronal,
                    y,
                    &opts,
                )
                .unwrap();
                let sagittal = extract_slice(
                    image.header(),
                    image.voxel_bytes(),
                    SlicePlane::Sagittal,
                    x,
                    &opts,
                )
                .unwrap();

                let (x, y, z) = (x as usize, y as usize, z as usize);
                let from_axial = axial.pixel_at(x, y);
                assert_eq!(from_axial, coronal.pixel_at(x, z), "at ({},{},{})", x, y, z);
                assert_eq!(from_axial, sagittal.pixel_at(y, z), "at ({},{},{})", x, y, z);
            }
        }
    }
}

#[test]
fn slice_dimensions_follow_plane() {
    let image = graded_u8_image();
    let opts = window(0., 63.);
    let axial = extract_slice(image.header(), image.voxel_bytes(), SlicePlane::Axial, 0, &opts)
        .unwrap();
    assert_eq!((axial.width(), axial.height()), (4, 4));
    assert_eq!(slice_range(image.header(), SlicePlane::Axial), 0..4);
}

#[test]
fn flat_volume_normalizes_to_white() {
    // min == max must not divide by zero; the whole raster saturates
    let bytes = build_nii::<LittleEndian>(&VolumeSpec::default(), &[100u8; 64]);
    let image = NiftiImage::decode(&bytes).unwrap();
    let raster = extract_slice(
        image.header(),
        image.voxel_bytes(),
        SlicePlane::Axial,
        0,
        &SliceOptions::default(),
    )
    .unwrap();
    assert_eq!(raster.pixels(), &[255u8; 16][..]);
}

#[test]
fn auto_window_uses_sampled_extrema() {
    let spec = VolumeSpec {
        dim: [3, 4, 4, 1, 0, 0, 0, 0],
        ..VolumeSpec::default()
    };
    let payload: Vec<u8> = (0..16).collect();
    let image = NiftiImage::decode(&build_nii::<LittleEndian>(&spec, &payload)).unwrap();

    assert_eq!(
        volume_min_max(image.header(), image.voxel_bytes(), 0).unwrap(),
        (0., 15.)
    );
    let raster = extract_slice(
        image.header(),
        image.voxel_bytes(),
        SlicePlane::Axial,
        0,
        &SliceOptions::default(),
    )
    .unwrap();
    assert_eq!(raster.pixel_at(0, 0), 0);
    assert_eq!(raster.pixel_at(3, 3), 255);
    assert_eq!(raster.pixel_at(1, 1), expected_px(5., 0., 15.));
}

#[test]
fn calibration_window_beats_sampling() {
    let spec = VolumeSpec {
        dim: [3, 4, 4, 1, 0, 0, 0, 0],
        cal_min: 0.,
        cal_max: 30.,
        ..VolumeSpec::default()
    };
    let payload: Vec<u8> = (0..16).collect();
    let image = NiftiImage::decode(&build_nii::<LittleEndian>(&spec, &payload)).unwrap();
    let raster = extract_slice(
        image.header(),
        image.voxel_bytes(),
        SlicePlane::Axial,
        0,
        &SliceOptions::default(),
    )
    .unwrap();
    // 15 against the declared 0..30 window, not the data's own 0..15
    assert_eq!(raster.pixel_at(3, 3), expected_px(15., 0., 30.));
}

#[test]
fn scale_slope_and_intercept_are_applied() {
    let spec = VolumeSpec {
        dim: [3, 2, 2, 1, 0, 0, 0, 0],
        datatype: 4,
        bitpix: 16,
        scl_slope: 2.,
        scl_inter: -1024.,
        ..VolumeSpec::default()
    };
    let mut payload = Vec::new();
    for v in [0i16, 100, 500, 1000] {
        payload.extend_from_slice(&v.to_le_bytes());
    }
    let image = NiftiImage::decode(&build_nii::<LittleEndian>(&spec, &payload)).unwrap();
    let raster = extract_slice(
        image.header(),
        image.voxel_bytes(),
        SlicePlane::Axial,
        0,
        &window(-1024., 976.),
    )
    .unwrap();
    // raw 100 -> 2*100 - 1024 = -824
    assert_eq!(raster.pixel_at(1, 0), expected_px(-824., -1024., 976.));
    assert_eq!(raster.pixel_at(0, 0), 0);
    assert_eq!(raster.pixel_at(1, 1), 255);
}

#[test]
fn phases_are_independent() {
    let spec = VolumeSpec {
        dim: [4, 2, 2, 1, 2, 0, 0, 0],
        ..VolumeSpec::default()
    };
    let mut payload = vec![10u8; 4];
    payload.extend_from_slice(&[20u8; 4]);
    let image = NiftiImage::decode(&build_nii::<LittleEndian>(&spec, &payload)).unwrap();

    let opts0 = window(0., 20.);
    let opts1 = SliceOptions { phase: 1, ..opts0 };
    let first = extract_slice(image.header(), image.voxel_bytes(), SlicePlane::Axial, 0, &opts0)
        .unwrap();
    let second = extract_slice(image.header(), image.voxel_bytes(), SlicePlane::Axial, 0, &opts1)
        .unwrap();
    assert_eq!(first.pixel_at(0, 0), expected_px(10., 0., 20.));
    assert_eq!(second.pixel_at(0, 0), 255);

    let out_of_range = SliceOptions {
        phase: 2,
        ..SliceOptions::default()
    };
    assert!(extract_slice(
        image.header(),
        image.voxel_bytes(),
        SlicePlane::Axial,
        0,
        &out_of_range
    )
    .is_err());
}

#[test]
fn slice_index_clamps_instead_of_failing() {
    let image = graded_u8_image();
    let opts = window(0., 63.);
    let last = extract_slice(image.header(), image.voxel_bytes(), SlicePlane::Axial, 3, &opts)
        .unwrap();
    let clamped = extract_slice(
        image.header(),
        image.voxel_bytes(),
        SlicePlane::Axial,
        99,
        &opts,
    )
    .unwrap();
    assert_eq!(last, clamped);
}

#[test]
fn complex_voxels_project_as_magnitude() {
    let spec = VolumeSpec {
        dim: [3, 1, 1, 1, 0, 0, 0, 0],
        datatype: 32,
        bitpix: 64,
        ..VolumeSpec::default()
    };
    let mut payload = Vec::new();
    payload.extend_from_slice(&3.0f32.to_le_bytes());
    payload.extend_from_slice(&4.0f32.to_le_bytes());
    let image = NiftiImage::decode(&build_nii::<LittleEndian>(&spec, &payload)).unwrap();
    let raster = extract_slice(
        image.header(),
        image.voxel_bytes(),
        SlicePlane::Axial,
        0,
        &window(0., 10.),
    )
    .unwrap();
    assert_eq!(raster.pixel_at(0, 0), expected_px(5., 0., 10.));
}

#[test]
fn float_voxels_project_exactly() {
    let spec = VolumeSpec {
        dim: [3, 2, 2, 1, 0, 0, 0, 0],
        datatype: 16,
        bitpix: 32,
        ..VolumeSpec::default()
    };
    let mut payload = Vec::new();
    for v in [0.0f32, 0.25, 0.75, 1.0] {
        payload.extend_from_slice(&v.to_le_bytes());
    }
    let image = NiftiImage::decode(&build_nii::<LittleEndian>(&spec, &payload)).unwrap();
    let raster = extract_slice(
        image.header(),
        image.voxel_bytes(),
        SlicePlane::Axial,
        0,
        &SliceOptions::default(),
    )
    .unwrap();
    assert_eq!(raster.pixels(), &[0, 64, 191, 255][..]);
}

#[test]
fn rgba_expansion_matches_raster() {
    let image = graded_u8_image();
    let raster = extract_slice(
        image.header(),
        image.voxel_bytes(),
        SlicePlane::Axial,
        0,
        &window(0., 63.),
    )
    .unwrap();
    let rgba = to_rgba(&raster, &DisplayAdjust::default());
    assert_eq!(rgba.len(), 16);
    assert_eq!(rgba_bytes(&rgba).len(), 64);
    assert_eq!(rgba[5].r, raster.pixels()[5]);
    assert_eq!(rgba[5].a, 255);
}
