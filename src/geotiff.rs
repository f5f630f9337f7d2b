use std::fs::File;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::ColorType;

use crate::errors::ReliefError;
use crate::float_raster::FloatRaster;
use crate::validity_mask::ValidityMask;

/// Reads a single-band elevation TIFF into a floating-point block plus its
/// validity mask. Samples equal to `nodata` (when given) are marked
/// invalid and zeroed in the block.
///
/// Grayscale rasters of f32/f64 and 8/16-bit integer sample formats are
/// accepted; anything with more than one band violates the single-band
/// precondition of the pipeline.
pub fn read_elevation_tiff(
    path: &Path,
    nodata: Option<f32>,
) -> Result<(FloatRaster, ValidityMask), ReliefError> {
    let file = File::open(path).map_err(|error| {
        ReliefError::Dem(format!(
            "failed to open {}: {}",
            path.display(),
            error
        ))
    })?;

    let mut decoder = Decoder::new(file).map_err(|error| {
        ReliefError::Dem(format!(
            "failed to decode {}: {}",
            path.display(),
            error
        ))
    })?;

    let (width, height) = decoder.dimensions().map_err(|error| {
        ReliefError::Dem(format!(
            "failed to get dimensions of {}: {}",
            path.display(),
            error
        ))
    })?;

    let colortype = decoder.colortype().map_err(|error| {
        ReliefError::Dem(format!(
            "failed to get color type of {}: {}",
            path.display(),
            error
        ))
    })?;
    match colortype {
        ColorType::Gray(_) => {}
        other => {
            return Err(ReliefError::Config(format!(
                "elevation raster must have a single band, got {:?}",
                other
            )))
        }
    }

    let decoded = decoder.read_image().map_err(|error| {
        ReliefError::Dem(format!(
            "failed to read {}: {}",
            path.display(),
            error
        ))
    })?;

    let samples: Vec<f32> = match decoded {
        DecodingResult::F32(samples) => samples,
        DecodingResult::F64(samples) => {
            samples.iter().map(|&sample| sample as f32).collect()
        }
        DecodingResult::I16(samples) => {
            samples.iter().map(|&sample| sample as f32).collect()
        }
        DecodingResult::U16(samples) => {
            samples.iter().map(|&sample| sample as f32).collect()
        }
        DecodingResult::U8(samples) => {
            samples.iter().map(|&sample| sample as f32).collect()
        }
        _ => {
            return Err(ReliefError::Dem(format!(
                "unsupported sample format in {}",
                path.display()
            )))
        }
    };

    let width = width as usize;
    let height = height as usize;
    if samples.len() != width * height {
        return Err(ReliefError::Dem(format!(
            "{} decoded to {} samples for a {}x{} raster",
            path.display(),
            samples.len(),
            width,
            height
        )));
    }

    let mut elevation = Vec::with_capacity(samples.len());
    let mut flags = Vec::with_capacity(samples.len());
    for &sample in &samples {
        if nodata.is_some_and(|nodata| sample == nodata) {
            elevation.push(0.0);
            flags.push(0);
        } else {
            elevation.push(sample);
            flags.push(255);
        }
    }

    Ok((
        FloatRaster::from_data(width, height, elevation),
        ValidityMask::from_data(width, height, flags),
    ))
}
