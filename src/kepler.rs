use crate::{
    constants::{Radian, DPI, KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE},
    orrery_errors::OrreryError,
};

/// Principal value of an angle, in [0, 2π).
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Solve Kepler's equation `E = M + e·sin(E)` by fixed-point iteration.
///
/// The iteration starts at `E0 = M` and stops once two successive iterates differ by less
/// than [`KEPLER_TOLERANCE`]. The contraction factor is `e·|cos E|`, so convergence slows
/// down as `e → 1`; the loop is capped at [`KEPLER_MAX_ITERATIONS`].
///
/// Arguments
/// ---------
/// * `mean_anomaly` – Mean anomaly `M` (radians).
/// * `eccentricity` – Eccentricity `e`, expected in `[0, 1)`.
///
/// Return
/// ------
/// * The eccentric anomaly `E` (radians), or [`OrreryError::KeplerNonConvergence`]
///   when the cap is reached.
pub fn solve_kepler_fixed_point(
    mean_anomaly: Radian,
    eccentricity: f64,
) -> Result<Radian, OrreryError> {
    let mut e0 = mean_anomaly;
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let e1 = mean_anomaly + eccentricity * e0.sin();
        let diff = (e1 - e0).abs();
        e0 = e1;
        if diff < KEPLER_TOLERANCE {
            return Ok(e0);
        }
    }

    Err(OrreryError::KeplerNonConvergence {
        mean_anomaly,
        eccentricity,
        iterations: KEPLER_MAX_ITERATIONS,
    })
}

/// True anomaly `v = 2·atan( sqrt((1+e)/(1-e)) · tan(E/2) )`.
pub fn true_anomaly(eccentric_anomaly: Radian, eccentricity: f64) -> Radian {
    let factor = ((1.0 + eccentricity) / (1.0 - eccentricity)).sqrt();
    2.0 * (factor * (eccentric_anomaly / 2.0).tan()).atan()
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_principal_angle() {
        assert_abs_diff_eq!(principal_angle(-0.5), DPI - 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(principal_angle(DPI + 1.0), 1.0, epsilon = 1e-12);
        assert_eq!(principal_angle(0.0), 0.0);
    }

    #[test]
    fn test_circular_orbit_is_identity() {
        let e = solve_kepler_fixed_point(1.0, 0.0).unwrap();
        assert_eq!(e, 1.0);
    }

    #[test]
    fn test_residual_is_small() {
        for &ecc in &[0.0167, 0.2056, 0.5, 0.85] {
            for k in 0..24 {
                let m = k as f64 * DPI / 24.0;
                let e = solve_kepler_fixed_point(m, ecc).unwrap();
                let residual = e - ecc * e.sin() - m;
                assert!(residual.abs() < 1e-6, "e={ecc} M={m} residual={residual}");
            }
        }
    }

    #[test]
    fn test_non_convergence_is_reported() {
        let res = solve_kepler_fixed_point(f64::NAN, 0.5);
        assert!(matches!(
            res,
            Err(OrreryError::KeplerNonConvergence {
                iterations: KEPLER_MAX_ITERATIONS,
                eccentricity,
                ..
            }) if eccentricity == 0.5
        ));
    }

    #[test]
    fn test_true_anomaly_at_apses() {
        assert_abs_diff_eq!(true_anomaly(0.0, 0.3), 0.0, epsilon = 1e-15);
        // E = π/2 on a circle gives v = π/2
        assert_abs_diff_eq!(
            true_anomaly(std::f64::consts::FRAC_PI_2, 0.0),
            std::f64::consts::FRAC_PI_2,
            epsilon = 1e-12
        );
    }
}
