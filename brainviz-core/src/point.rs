//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Convert a spherical head coordinate to a cartesian point.
///
/// `azimuth` is measured in the XY plane from +X (nose direction) towards +Y
/// (left ear), `elevation` from the XY plane towards +Z (vertex). Both are in
/// degrees, matching the way electrode montages are usually tabulated.
pub fn spherical_to_point(radius: f32, azimuth_deg: f32, elevation_deg: f32) -> Point3f {
    let az = azimuth_deg.to_radians();
    let el = elevation_deg.to_radians();
    Point3f::new(
        radius * el.cos() * az.cos(),
        radius * el.cos() * az.sin(),
        radius * el.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spherical_axes() {
        let nose = spherical_to_point(1.0, 0.0, 0.0);
        assert_relative_eq!(nose, Point3f::new(1.0, 0.0, 0.0), epsilon = 1e-6);

        let vertex = spherical_to_point(2.0, 45.0, 90.0);
        assert_relative_eq!(vertex, Point3f::new(0.0, 0.0, 2.0), epsilon = 1e-6);

        let left = spherical_to_point(1.0, 90.0, 0.0);
        assert_relative_eq!(left, Point3f::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }
}
