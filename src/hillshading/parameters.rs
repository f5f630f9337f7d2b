/// The parameters of a single illumination direction. Immutable once
/// constructed.
#[derive(Debug, Clone, Copy)]
pub struct DirectionConfig {
    /// Compass direction of the light source, degrees clockwise from north.
    pub azimuth: f32,
    /// Angle of the light source above the horizon, degrees.
    pub elevation: f32,
    /// Multiplicative factor that converts elevation values to the units of
    /// the horizontal coordinate system.
    pub z_factor: f32,
    pub cell_size_x: f32,
    pub cell_size_y: f32,
}

impl DirectionConfig {
    pub fn new(
        azimuth: f32,
        elevation: f32,
        z_factor: f32,
        cell_size_x: f32,
        cell_size_y: f32,
    ) -> DirectionConfig {
        DirectionConfig {
            azimuth,
            elevation,
            z_factor,
            cell_size_x,
            cell_size_y,
        }
    }
}

/// The six fixed lights of the multidirectional blend: five oblique
/// directions plus a near-vertical ambient one. Each entry is
/// (azimuth, elevation angle, blend weight); the weights sum to 1.0 up to
/// the rounding of the published values.
const LIGHTS: [(f32, f32, f32); 6] = [
    (315.0, 60.0, 0.167),
    (270.0, 60.0, 0.278),
    (225.0, 60.0, 0.167),
    (360.0, 60.0, 0.111),
    (180.0, 60.0, 0.056),
    (0.0, 90.0, 0.222),
];

/// Expands the fixed light table into an ordered sequence of direction
/// configurations sharing the given z-factor and cell size, each paired
/// with its blend weight.
pub fn multidirectional_lights(
    z_factor: f32,
    cell_size_x: f32,
    cell_size_y: f32,
) -> Vec<(DirectionConfig, f32)> {
    LIGHTS
        .iter()
        .map(|&(azimuth, elevation, weight)| {
            (
                DirectionConfig::new(
                    azimuth,
                    elevation,
                    z_factor,
                    cell_size_x,
                    cell_size_y,
                ),
                weight,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::multidirectional_lights;
    use crate::testing::assert_eq_approx;

    /// The blend weights of the six lights sum to 1.0 up to rounding.
    #[test]
    fn blend_weights_sum_to_one() {
        let total: f32 = multidirectional_lights(1.0, 1.0, 1.0)
            .iter()
            .map(|&(_, weight)| weight)
            .sum();
        assert_eq_approx(total, 1.0, 1e-3);
    }

    #[test]
    fn six_lights_share_z_factor_and_cell_size() {
        let lights = multidirectional_lights(2.0, 30.0, 25.0);
        assert_eq!(lights.len(), 6);
        for (config, _) in &lights {
            assert_eq!(config.z_factor, 2.0);
            assert_eq!(config.cell_size_x, 30.0);
            assert_eq!(config.cell_size_y, 25.0);
        }
    }

    /// The last light is the near-vertical ambient one.
    #[test]
    fn ambient_light_comes_last() {
        let lights = multidirectional_lights(1.0, 1.0, 1.0);
        let (config, _) = lights[lights.len() - 1];
        assert_eq!(config.elevation, 90.0);
        assert_eq!(config.azimuth, 0.0);
    }
}
