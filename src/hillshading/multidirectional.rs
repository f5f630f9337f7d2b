use rayon::prelude::*;

use crate::errors::ReliefError;
use crate::float_raster::FloatRaster;
use crate::grayscale8_bitmap::Grayscale8Bitmap;
use crate::hillshading::directional::DirectionalShader;
use crate::hillshading::parameters::multidirectional_lights;
use crate::validity_mask::ValidityMask;

struct WeightedShader {
    shader: DirectionalShader,
    weight: f32,
}

/// Blends six independently-lit hillshade surfaces (five oblique lights
/// plus a near-vertical ambient one) into a single 8-bit relief shading.
///
/// The compositor is configured once per raster and is immutable
/// afterwards, so `process` can run concurrently on independent blocks.
pub struct MultidirectionalCompositor {
    lights: Vec<WeightedShader>,
}

impl MultidirectionalCompositor {
    /// Configures the six fixed lights for a raster with the given
    /// z-factor and cell size.
    ///
    /// The elevation input must be a single band; a multi-band raster is
    /// rejected here, at configuration time, before any block is
    /// processed.
    pub fn new(
        band_count: usize,
        z_factor: f32,
        cell_size_x: f32,
        cell_size_y: f32,
    ) -> Result<MultidirectionalCompositor, ReliefError> {
        if band_count != 1 {
            return Err(ReliefError::Config(format!(
                "input raster must have a single band, got {}",
                band_count
            )));
        }

        let lights = multidirectional_lights(
            z_factor,
            cell_size_x,
            cell_size_y,
        )
        .into_iter()
        .map(|(config, weight)| WeightedShader {
            shader: DirectionalShader::new(config),
            weight,
        })
        .collect();

        Ok(MultidirectionalCompositor { lights })
    }

    /// Shades one padded elevation block.
    ///
    /// The block and its validity mask must both be (H+2)x(W+2) for a
    /// requested HxW output; the returned bitmap and mask are the HxW
    /// interior, with the halo consumed by the gradient stencil stripped.
    /// An output cell is valid only if all nine input cells used to
    /// estimate its gradient were valid.
    pub fn process(
        &self,
        elevation: &FloatRaster,
        mask: &ValidityMask,
    ) -> Result<(Grayscale8Bitmap, ValidityMask), ReliefError> {
        if elevation.width != mask.width || elevation.height != mask.height {
            return Err(ReliefError::Shape(format!(
                "elevation block {}x{} and validity mask {}x{} disagree",
                elevation.width, elevation.height, mask.width, mask.height
            )));
        }

        // The gradients depend only on the z-factor and cell size, which
        // are identical across all six lights, so they are computed once
        // with the first shader and shared by all of them.
        let gradients =
            self.lights[0].shader.compute_gradients(elevation)?;

        // The six shade surfaces are independent of each other; the blend
        // below runs in fixed light order so repeated calls are
        // bit-identical.
        let shades: Vec<FloatRaster> = self
            .lights
            .par_iter()
            .map(|light| light.shader.compute_hillshade(&gradients))
            .collect();

        let width = elevation.width;
        let height = elevation.height;
        let mut blended = vec![0.0f32; width * height];
        for (light, shade) in self.lights.iter().zip(&shades) {
            for (accumulated, &value) in
                blended.iter_mut().zip(shade.data())
            {
                *accumulated += light.weight * value;
            }
        }

        // Clamp once after the weighted sum, truncate to the 8-bit output
        // type and strip the 1-cell halo.
        let mut output = Grayscale8Bitmap::new(width - 2, height - 2);
        for y in 0..height - 2 {
            for x in 0..width - 2 {
                let value =
                    blended[(y + 1) * width + (x + 1)].clamp(0.0, 255.0);
                output.set_pixel(x, y, value as u8);
            }
        }

        let output_mask = mask.and_3x3_neighborhood();

        Ok((output, output_mask))
    }
}
