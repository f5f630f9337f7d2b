use std::f32::consts::PI;

pub const EARTH_RADIUS_METERS: f32 = 6378137.0;
pub const EARTH_CIRCUMFERENCE_METERS: f32 = 2.0 * PI * EARTH_RADIUS_METERS;
