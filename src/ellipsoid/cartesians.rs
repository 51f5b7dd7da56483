use super::*;

use std::f64::consts::FRAC_PI_2;

impl Ellipsoid {
    // ----- Cartesian <--> Geographic conversion ----------------------------------

    /// Geographic to cartesian (geocentric) conversion.
    ///
    /// The standard closed form, using the radius of curvature in the
    /// prime vertical. Angles in radians, lengths in meters.
    #[must_use]
    #[allow(non_snake_case)] // make it possible to mimic the conventional math notation
    pub fn cartesian(&self, longitude: f64, latitude: f64, height: f64) -> (f64, f64, f64) {
        let N = self.prime_vertical_radius_of_curvature(latitude);
        let (sinphi, cosphi) = latitude.sin_cos();
        let (sinlam, coslam) = longitude.sin_cos();

        let X = (N + height) * cosphi * coslam;
        let Y = (N + height) * cosphi * sinlam;
        let Z = (N * (1.0 - self.eccentricity_squared()) + height) * sinphi;

        (X, Y, Z)
    }

    /// Cartesian (geocentric) to geographic conversion.
    ///
    /// Fixed point iteration on the latitude, seeded with the closed form
    /// approximation given by Bowring (1976). Terminates when two successive
    /// latitude estimates agree to within 1e-11 rad (sub-tenth-of-a-mm), or
    /// after 15 rounds, whichever comes first. On exhaustion, the last
    /// estimate is returned and a warning logged.
    #[must_use]
    #[allow(non_snake_case)] // make it possible to mimic the conventional math notation
    pub fn geodetic(&self, X: f64, Y: f64, Z: f64) -> (f64, f64, f64) {
        let b = self.semiminor_axis();
        let es = self.eccentricity_squared();
        let eps = self.second_eccentricity_squared();

        // The perpendicular distance from the point to the polar axis
        let p = X.hypot(Y);

        // On (or numerically indistinguishable from) the polar axis, the
        // longitude is undefined, and conventionally returned as 0
        if p < 1.0e-12 {
            let phi = FRAC_PI_2.copysign(Z);
            let h = Z.abs() - b;
            return (0., phi, h);
        }

        let lam = Y.atan2(X);

        // Bowring's approximation as the starting guess
        let theta = (Z * self.a).atan2(p * b);
        let (sint, cost) = theta.sin_cos();
        let mut phi = (Z + eps * b * sint.powi(3)).atan2(p - es * self.a * cost.powi(3));

        let mut N = self.a;
        for i in 0..crate::math::MAX_ITERATIONS {
            let sinphi = phi.sin();
            N = self.a / (1.0 - es * sinphi * sinphi).sqrt();
            let next = (Z + es * N * sinphi).atan2(p);
            let delta = (next - phi).abs();
            phi = next;
            if delta < 1e-11 {
                break;
            }
            if i == crate::math::MAX_ITERATIONS - 1 {
                log::warn!("geodetic: iteration budget exhausted");
            }
        }

        // Close to the poles, p/cos(phi) degenerates - use the polar form there
        let (sinphi, cosphi) = phi.sin_cos();
        let h = if cosphi.abs() > 1e-6 {
            p / cosphi - N
        } else {
            Z / sinphi - N * (1.0 - es)
        };

        (lam, phi, h)
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_to_cart() -> Result<(), Error> {
        let ellps = Ellipsoid::named("GRS80")?;

        // Roundtrip geographic <-> cartesian
        let (lam, phi, h) = (12_f64.to_radians(), 55_f64.to_radians(), 100.);
        let (x, y, z) = ellps.cartesian(lam, phi, h);
        let (lam2, phi2, h2) = ellps.geodetic(x, y, z);
        assert!((lam - lam2).abs() < 1.0e-12);
        assert!((phi - phi2).abs() < 1.0e-12);
        assert!((h - h2).abs() < 1.0e-8);

        // A spot check against well known geocentric coordinates of the
        // zero-zero point on the WGS84 ellipsoid
        let wgs84 = Ellipsoid::named("WGS84")?;
        let (x, y, z) = wgs84.cartesian(0., 0., 0.);
        assert!((x - 6_378_137.0).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
        assert!(z.abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn polar_axis() -> Result<(), Error> {
        let ellps = Ellipsoid::named("GRS80")?;

        // On the polar axis, the longitude is conventionally 0
        let (lam, phi, h) = ellps.geodetic(0., 0., 6_400_000.);
        assert_eq!(lam, 0.);
        assert_eq!(phi, FRAC_PI_2);
        assert!((h - (6_400_000. - ellps.semiminor_axis())).abs() < 1e-9);

        let (lam, phi, _) = ellps.geodetic(0., 0., -6_400_000.);
        assert_eq!(lam, 0.);
        assert_eq!(phi, -FRAC_PI_2);
        Ok(())
    }
}
