use crate::errors::ReliefError;
use crate::float_raster::FloatRaster;
use crate::hillshading::parameters::DirectionConfig;
use crate::trig::deg_to_rad;

/// The two gradient surfaces of an elevation block: the rate of elevation
/// change along the x and y cell axes, scaled by the z-factor and divided
/// by 8x the cell size per axis. Same shape as the block they were derived
/// from; only cells with a full 3x3 neighborhood carry meaningful values.
#[derive(Debug)]
pub struct GradientPair {
    pub dzdx: FloatRaster,
    pub dzdy: FloatRaster,
}

/// Computes the shade surface of a single illumination direction.
///
/// The direction's trigonometry is cached at construction time; afterwards
/// the shader is immutable and both compute methods are pure functions of
/// their arguments, so one shader can serve any number of blocks, from any
/// number of threads.
pub struct DirectionalShader {
    config: DirectionConfig,
    azimuth_rad: f32,
    sin_zenith: f32,
    cos_zenith: f32,
}

impl DirectionalShader {
    pub fn new(config: DirectionConfig) -> DirectionalShader {
        // The zenith angle is measured from the vertical: a light at
        // elevation angle E sits at zenith 90 - E.
        let zenith_rad = deg_to_rad(90.0 - config.elevation);

        DirectionalShader {
            config,
            azimuth_rad: deg_to_rad(config.azimuth),
            sin_zenith: zenith_rad.sin(),
            cos_zenith: zenith_rad.cos(),
        }
    }

    pub fn config(&self) -> &DirectionConfig {
        &self.config
    }

    /// Estimates the surface gradients of an elevation block with the Horn
    /// 3x3 stencil: each interior cell gets the central difference of its
    /// eight neighbors, scaled by the z-factor and divided by 8x the cell
    /// size per axis.
    ///
    /// The block must carry a 1-cell halo; the returned rasters have the
    /// same shape as the input, with only the interior cells meaningful.
    /// The gradients depend on the z-factor and cell size only, not on the
    /// light direction, so they can be shared between shaders configured
    /// with the same factors.
    pub fn compute_gradients(
        &self,
        elevation: &FloatRaster,
    ) -> Result<GradientPair, ReliefError> {
        let width = elevation.width;
        let height = elevation.height;

        if width < 3 || height < 3 {
            return Err(ReliefError::Shape(format!(
                "elevation block {}x{} is smaller than the 3x3 gradient \
                 stencil",
                width, height
            )));
        }

        let mut dzdx = FloatRaster::new(width, height);
        let mut dzdy = FloatRaster::new(width, height);

        let x_spacing_mul8 = 8.0 * self.config.cell_size_x;
        let y_spacing_mul8 = 8.0 * self.config.cell_size_y;
        let z_factor = self.config.z_factor;

        let samples = elevation.data();
        let dzdx_data = dzdx.data_mut();
        let dzdy_data = dzdy.data_mut();

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let center = y * width + x;
                let above = center - width;
                let below = center + width;

                let height_tl = samples[above - 1];
                let height_tc = samples[above];
                let height_tr = samples[above + 1];
                let height_cl = samples[center - 1];
                let height_cr = samples[center + 1];
                let height_bl = samples[below - 1];
                let height_bc = samples[below];
                let height_br = samples[below + 1];

                dzdx_data[center] = ((height_tr
                    + 2.0 * height_cr
                    + height_br)
                    - (height_tl + 2.0 * height_cl + height_bl))
                    * z_factor
                    / x_spacing_mul8;

                dzdy_data[center] = ((height_bl
                    + 2.0 * height_bc
                    + height_br)
                    - (height_tl + 2.0 * height_tc + height_tr))
                    * z_factor
                    / y_spacing_mul8;
            }
        }

        Ok(GradientPair { dzdx, dzdy })
    }

    /// Computes this direction's shade surface from precomputed gradients.
    ///
    /// Per cell: slope = atan(hypot(dzdx, dzdy)), aspect =
    /// atan2(dzdy, -dzdx), shade = 255 * (cos(zenith) * cos(slope) +
    /// sin(zenith) * sin(slope) * cos(azimuth - aspect)).
    ///
    /// Flat cells (both gradients exactly zero) are pinned to aspect 0, so
    /// the platform-dependent value of atan2(0, 0) cannot leak into the
    /// output; a flat cell always shades to 255 * cos(zenith).
    ///
    /// The result is intentionally NOT clamped to [0, 255] here: the
    /// multidirectional blend clamps once, after the weighted sum.
    pub fn compute_hillshade(&self, gradients: &GradientPair) -> FloatRaster {
        let width = gradients.dzdx.width;
        let height = gradients.dzdx.height;
        let mut shade = FloatRaster::new(width, height);

        let dzdx = gradients.dzdx.data();
        let dzdy = gradients.dzdy.data();
        let shade_data = shade.data_mut();

        for index in 0..width * height {
            let p = dzdx[index];
            let q = dzdy[index];

            let slope = p.hypot(q).atan();
            let aspect = if p == 0.0 && q == 0.0 {
                0.0
            } else {
                q.atan2(-p)
            };

            shade_data[index] = 255.0
                * (self.cos_zenith * slope.cos()
                    + self.sin_zenith
                        * slope.sin()
                        * (self.azimuth_rad - aspect).cos());
        }

        shade
    }
}
