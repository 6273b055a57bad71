//! Distances and bearings along geodesics on the WGS-84 ellipsoid, using
//! Vincenty's inverse formula.
//!
//! Vincenty's method is iterative and does not converge for some nearly
//! antipodal pairs of points. In that case every quantity is reported as
//! NaN. Coincident points have a distance and bearings of zero.

use crate::coord::Coordinate;
use crate::err::{DomainError, Result};
use std::f64::consts::PI;
use tracing::{debug, trace, warn};

/// Semi-major axis of the WGS-84 ellipsoid, in meters.
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
/// Semi-minor axis of the WGS-84 ellipsoid, in meters.
pub const WGS84_SEMI_MINOR_AXIS: f64 = 6_356_752.3142;
/// Flattening of the WGS-84 ellipsoid.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

const DEFAULT_MAX_ITERATIONS: u32 = 20;
const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Selects one of the quantities produced by the inverse geodesic
/// calculation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GeodesicQuantity {
    Distance,
    InitialBearing,
    FinalBearing,
}

/// The result of solving the inverse geodesic problem between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeodesicSolution {
    /// Length of the geodesic in meters.
    pub distance: f64,
    /// Bearing in degrees at the start point, in the range (-180, 180].
    pub initial_bearing: f64,
    /// Bearing in degrees at the end point, in the range (-180, 180].
    pub final_bearing: f64,
}

impl GeodesicSolution {
    const COINCIDENT: GeodesicSolution = GeodesicSolution {
        distance: 0.0,
        initial_bearing: 0.0,
        final_bearing: 0.0,
    };

    /// Return the requested quantity from this solution.
    pub fn get(&self, quantity: GeodesicQuantity) -> f64 {
        match quantity {
            GeodesicQuantity::Distance => self.distance,
            GeodesicQuantity::InitialBearing => self.initial_bearing,
            GeodesicQuantity::FinalBearing => self.final_bearing,
        }
    }
}

/// Solver for the inverse geodesic problem using Vincenty's formula.
///
/// The default solver allows 20 iterations and stops once successive
/// estimates of the longitude on the auxiliary sphere differ by no more
/// than 1e-12 radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vincenty {
    max_iterations: u32,
    tolerance: f64,
}

impl Default for Vincenty {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Vincenty {
    /// Create a solver with a custom iteration budget and convergence
    /// tolerance (in radians). The tolerance must be finite and not
    /// negative.
    pub fn new(max_iterations: u32, tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(DomainError::Tolerance(tolerance));
        }
        Ok(Self {
            max_iterations,
            tolerance,
        })
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Solve the inverse geodesic problem from `from` to `to`. Returns
    /// `None` if the iteration did not converge within the budget.
    /// # Example
    /// ```rust
    /// use geoloc::{Coordinate, TimeZone, Vincenty};
    ///
    /// let tz = TimeZone::utc();
    /// let flinders_peak = Coordinate::new("Flinders Peak", 50.06632, -5.71475, 0.0, tz).unwrap();
    /// let buninyong = Coordinate::new("Buninyong", 58.64402, -3.07009, 0.0, tz).unwrap();
    ///
    /// let solution = Vincenty::default().inverse(&flinders_peak, &buninyong).unwrap();
    /// assert!((solution.distance - 969_954.166).abs() < 1e-3);
    /// ```
    pub fn inverse(
        &self,
        from: &Coordinate,
        to: &Coordinate,
    ) -> Option<GeodesicSolution> {
        let a = WGS84_SEMI_MAJOR_AXIS;
        let b = WGS84_SEMI_MINOR_AXIS;
        let f = WGS84_FLATTENING;

        let mut l = (to.longitude() - from.longitude()).to_radians();
        // -180 to 180 is a full turn, which would match the initial
        // lambda_prev and skip the iteration.
        if l > PI {
            l -= 2.0 * PI;
        } else if l < -PI {
            l += 2.0 * PI;
        }
        let u1 = ((1.0 - f) * from.latitude().to_radians().tan()).atan();
        let u2 = ((1.0 - f) * to.latitude().to_radians().tan()).atan();
        let (sin_u1, cos_u1) = u1.sin_cos();
        let (sin_u2, cos_u2) = u2.sin_cos();

        let mut lambda = l;
        let mut lambda_prev = 2.0 * PI;
        let mut budget = self.max_iterations;

        let mut sin_lambda = 0.0;
        let mut cos_lambda = 0.0;
        let mut sin_sigma = 0.0;
        let mut cos_sigma = 0.0;
        let mut sigma = 0.0;
        let mut cos_sq_alpha = 0.0;
        let mut cos_2sigma_m = 0.0;

        while (lambda - lambda_prev).abs() > self.tolerance {
            budget = budget.saturating_sub(1);
            if budget == 0 {
                warn!(
                    from = %from.name(),
                    to = %to.name(),
                    "vincenty formula failed to converge"
                );
                return None;
            }

            sin_lambda = lambda.sin();
            cos_lambda = lambda.cos();
            sin_sigma = ((cos_u2 * sin_lambda) * (cos_u2 * sin_lambda)
                + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda)
                    * (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda))
                .sqrt();
            if sin_sigma == 0.0 {
                debug!(from = %from.name(), to = %to.name(), "coincident points");
                return Some(GeodesicSolution::COINCIDENT);
            }

            cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
            sigma = sin_sigma.atan2(cos_sigma);
            let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
            cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
            cos_2sigma_m = cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha;
            if cos_2sigma_m.is_nan() {
                // Equatorial line: cos_sq_alpha is zero.
                cos_2sigma_m = 0.0;
            }

            let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
            lambda_prev = lambda;
            lambda = l
                + (1.0 - c)
                    * f
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos_2sigma_m
                                + c * cos_sigma
                                    * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

            trace!(
                iterations_left = budget,
                lambda,
                delta = (lambda - lambda_prev).abs(),
                "vincenty iteration"
            );
        }

        let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
        let big_a = 1.0
            + u_sq / 16384.0
                * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let big_b =
            u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
        let delta_sigma = big_b
            * sin_sigma
            * (cos_2sigma_m
                + big_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                        - big_b / 6.0
                            * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

        let distance = b * big_a * (sigma - delta_sigma);
        let initial_bearing = (cos_u2 * sin_lambda)
            .atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda)
            .to_degrees();
        let final_bearing = (cos_u1 * sin_lambda)
            .atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda)
            .to_degrees();

        Some(GeodesicSolution {
            distance,
            initial_bearing,
            final_bearing,
        })
    }

    /// Return a single quantity of the geodesic from `from` to `to`, or NaN
    /// if the iteration did not converge.
    pub fn solve(
        &self,
        from: &Coordinate,
        to: &Coordinate,
        quantity: GeodesicQuantity,
    ) -> f64 {
        self.inverse(from, to)
            .map_or(f64::NAN, |solution| solution.get(quantity))
    }
}

/// Return the geodesic distance in meters between two coordinates, or NaN
/// if Vincenty's formula did not converge.
pub fn geodesic_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    Vincenty::default().solve(from, to, GeodesicQuantity::Distance)
}

/// Return the initial bearing in degrees of the geodesic between two
/// coordinates, or NaN if Vincenty's formula did not converge.
pub fn geodesic_initial_bearing(from: &Coordinate, to: &Coordinate) -> f64 {
    Vincenty::default().solve(from, to, GeodesicQuantity::InitialBearing)
}

/// Return the final bearing in degrees of the geodesic between two
/// coordinates, or NaN if Vincenty's formula did not converge.
pub fn geodesic_final_bearing(from: &Coordinate, to: &Coordinate) -> f64 {
    Vincenty::default().solve(from, to, GeodesicQuantity::FinalBearing)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tz::TimeZone;
    use approx::assert_abs_diff_eq;

    fn point(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new("", latitude, longitude, 0.0, TimeZone::utc()).unwrap()
    }

    fn flinders_peak() -> Coordinate {
        point(50.06632, -5.71475)
    }

    fn buninyong() -> Coordinate {
        point(58.64402, -3.07009)
    }

    fn normalized_degrees(degrees: f64) -> f64 {
        degrees.rem_euclid(360.0)
    }

    #[test]
    fn published_worked_example() {
        let from = flinders_peak();
        let to = buninyong();
        assert_abs_diff_eq!(geodesic_distance(&from, &to), 969_954.166, epsilon = 1e-3);
        assert_abs_diff_eq!(geodesic_initial_bearing(&from, &to), 9.1419, epsilon = 1e-4);
        assert_abs_diff_eq!(geodesic_final_bearing(&from, &to), 11.2972, epsilon = 1e-4);
    }

    #[test]
    fn distance_to_self_is_zero() {
        for &(latitude, longitude) in &[
            (0.0, 0.0),
            (50.06632, -5.71475),
            (-33.8688, 151.2093),
            (89.9, 179.9),
            (-90.0, -180.0),
        ] {
            let p = point(latitude, longitude);
            assert_eq!(geodesic_distance(&p, &p), 0.0);
            assert_eq!(geodesic_initial_bearing(&p, &p), 0.0);
            assert_eq!(geodesic_final_bearing(&p, &p), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (flinders_peak(), buninyong()),
            (point(40.7128, -74.006), point(51.5074, -0.1278)),
            (point(10.0, 170.0), point(-10.0, -170.0)),
            (point(31.778, 35.2354), point(40.0828, -74.2094)),
        ];
        for (a, b) in &pairs {
            assert_abs_diff_eq!(
                geodesic_distance(a, b),
                geodesic_distance(b, a),
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn reverse_final_bearing_is_opposite_initial_bearing() {
        let pairs = [
            (flinders_peak(), buninyong()),
            (point(40.7128, -74.006), point(51.5074, -0.1278)),
            (point(31.778, 35.2354), point(40.0828, -74.2094)),
        ];
        for (a, b) in &pairs {
            let forward = normalized_degrees(geodesic_initial_bearing(a, b));
            let back = normalized_degrees(geodesic_final_bearing(b, a) + 180.0);
            assert_abs_diff_eq!(forward, back, epsilon = 1e-8);
        }
    }

    #[test]
    fn equatorial_line() {
        let solution = Vincenty::default()
            .inverse(&point(0.0, 0.0), &point(0.0, 90.0))
            .unwrap();
        assert_abs_diff_eq!(solution.distance, 10_018_754.171, epsilon = 1e-3);
        assert_eq!(solution.initial_bearing, 90.0);
        assert_eq!(solution.final_bearing, 90.0);
    }

    #[test]
    fn quarter_meridian() {
        let from = point(0.0, 0.0);
        let to = point(90.0, 0.0);
        assert_abs_diff_eq!(geodesic_distance(&from, &to), 10_001_965.729, epsilon = 1e-3);
        assert_eq!(geodesic_initial_bearing(&from, &to), 0.0);
    }

    #[test]
    fn crosses_antimeridian() {
        let from = point(10.0, 170.0);
        let to = point(-10.0, -170.0);
        assert_abs_diff_eq!(geodesic_distance(&from, &to), 3_130_218.198, epsilon = 1e-3);
        assert_abs_diff_eq!(geodesic_initial_bearing(&from, &to), 134.3710, epsilon = 1e-4);
    }

    #[test]
    fn nearly_antipodal_points_fail_together() {
        let from = point(0.0, 0.0);
        let to = point(0.5, 179.7);
        assert_eq!(Vincenty::default().inverse(&from, &to), None);
        assert!(geodesic_distance(&from, &to).is_nan());
        assert!(geodesic_initial_bearing(&from, &to).is_nan());
        assert!(geodesic_final_bearing(&from, &to).is_nan());
    }

    #[test]
    fn small_budget_does_not_converge() {
        let solver = Vincenty::new(2, 1e-12).unwrap();
        assert_eq!(solver.inverse(&flinders_peak(), &buninyong()), None);
        assert!(solver
            .solve(&flinders_peak(), &buninyong(), GeodesicQuantity::Distance)
            .is_nan());
    }

    #[test]
    fn inverse_agrees_with_single_quantities() {
        let from = flinders_peak();
        let to = buninyong();
        let solution = Vincenty::default().inverse(&from, &to).unwrap();
        assert_eq!(solution.get(GeodesicQuantity::Distance), geodesic_distance(&from, &to));
        assert_eq!(
            solution.get(GeodesicQuantity::InitialBearing),
            from.geodesic_initial_bearing(&to)
        );
        assert_eq!(
            solution.get(GeodesicQuantity::FinalBearing),
            from.geodesic_final_bearing(&to)
        );
    }

    #[test]
    fn full_turn_of_longitude_is_not_coincident() {
        let across = Vincenty::default()
            .inverse(&point(0.0, -180.0), &point(10.0, 180.0))
            .unwrap();
        let along = Vincenty::default()
            .inverse(&point(0.0, 0.0), &point(10.0, 0.0))
            .unwrap();
        assert_abs_diff_eq!(across.distance, 1_105_854.833, epsilon = 1e-3);
        assert_abs_diff_eq!(across.distance, along.distance, epsilon = 1e-6);
        assert_abs_diff_eq!(across.initial_bearing, along.initial_bearing, epsilon = 1e-9);
    }

    #[test]
    fn antimeridian_endpoints_are_coincident() {
        let west = point(25.0, -180.0);
        let east = point(25.0, 180.0);
        assert_eq!(geodesic_distance(&west, &east), 0.0);
    }

    #[test]
    fn rejects_invalid_tolerance() {
        assert!(matches!(
            Vincenty::new(20, f64::NAN),
            Err(DomainError::Tolerance(tolerance)) if tolerance.is_nan()
        ));
        assert_eq!(Vincenty::new(20, -1e-12), Err(DomainError::Tolerance(-1e-12)));
        assert_eq!(
            Vincenty::new(20, f64::INFINITY),
            Err(DomainError::Tolerance(f64::INFINITY))
        );
        assert_eq!(Vincenty::new(20, 0.0).unwrap().tolerance(), 0.0);
    }
}
