//! Elementary frame rotations and the ICRS frame bias.
//!
//! Sign conventions follow ERFA/SOFA: `rotation_x(θ)` carries `+sin θ` at
//! row 1, column 2, so composing `R1(ε)·N·P·B` takes an ICRS equatorial
//! vector to the ecliptic-and-equinox of date.

use crate::math::Mat3;

/// Rotation about the x axis by `angle` radians (ERFA `R1` convention).
pub fn rotation_x(angle: f64) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::from_rows([[1.0, 0.0, 0.0], [0.0, c, s], [0.0, -s, c]])
}

/// Rotation about the z axis by `angle` radians (ERFA `R3` convention).
pub fn rotation_z(angle: f64) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::from_rows([[c, s, 0.0], [-s, c, 0.0], [0.0, 0.0, 1.0]])
}

/// The constant frame-bias matrix taking ICRS coordinates to the dynamical
/// mean equator and equinox of J2000.0.
///
/// The offsets are tens of milliarcseconds, so the matrix is within 1e-7 of
/// the identity, but the solver tolerance is finer than that.
pub fn frame_bias() -> Mat3 {
    Mat3::from_rows([
        [
            0.999_999_999_999_994_2,
            -7.078_279_744_199_198e-8,
            8.056_148_940_257_979e-8,
        ],
        [
            7.078_279_477_857_338e-8,
            0.999_999_999_999_996_9,
            3.306_041_454_222_136e-8,
        ],
        [
            -8.056_149_173_973_727e-8,
            -3.306_040_883_980_552e-8,
            0.999_999_999_999_996_2,
        ],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn rotation_x_quarter_turn() {
        let r = rotation_x(FRAC_PI_2);
        let v = r * Vec3::new(0.0, 1.0, 0.0);
        // ERFA sign: +y maps toward -z... check against the matrix directly.
        assert!((v.x).abs() < 1e-15);
        assert!((v.y).abs() < 1e-15);
        assert!((v.z + 1.0).abs() < 1e-15);
        // Row [1][2] carries +sin θ.
        assert!((r.m[1][2] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn rotation_z_quarter_turn() {
        let r = rotation_z(FRAC_PI_2);
        let v = r * Vec3::new(1.0, 0.0, 0.0);
        assert!((v.x).abs() < 1e-15);
        assert!((v.y + 1.0).abs() < 1e-15);
        assert!((r.m[0][1] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn rotations_are_orthonormal() {
        for angle in [-2.1, -0.3, 0.0, 0.5, 1.9] {
            for r in [rotation_x(angle), rotation_z(angle)] {
                let p = r * r.transpose();
                for i in 0..3 {
                    for j in 0..3 {
                        let expect = if i == j { 1.0 } else { 0.0 };
                        assert!((p.m[i][j] - expect).abs() < 1e-14);
                    }
                }
            }
        }
    }

    #[test]
    fn bias_is_near_identity_rotation() {
        let b = frame_bias();
        let p = b * b.transpose();
        for i in 0..3 {
            for j in 0..3 {
                let expect = if i == j { 1.0 } else { 0.0 };
                assert!((p.m[i][j] - expect).abs() < 1e-12);
            }
            assert!((b.m[i][i] - 1.0).abs() < 1e-11);
        }
    }
}
