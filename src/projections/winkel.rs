//! Winkel Tripel: the arithmetic mean of the equidistant cylindrical and
//! Aitoff projections, with Winkel's standard parallel (cos φ₁ = 2/π)
//! unless one is given. Spherical, on a sphere with the radius of the
//! semimajor axis.
//!
//! There is no closed inverse; it is solved by a two dimensional Newton
//! iteration on the forward mapping.
//!
//! Domain policy: total in the forward direction; inverse positions
//! outside the map frame fail to converge and are rejected.

use super::Parameters;
use crate::math::normalize_symmetric;
use crate::{Ellipsoid, Error};
use std::f64::consts::{FRAC_PI_2, PI};

const TOL: f64 = 1e-12;
// Convergence is linear with the differenced Jacobian, so this loop needs
// more rounds than the crate's analytic inversions
const MAX_ITER: usize = 25;

#[derive(Clone, Copy, Debug)]
pub struct Winkel {
    a: f64,
    cosphi1: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Winkel {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Winkel, Error> {
        let cosphi1 = match params.lat_1 {
            None => std::f64::consts::FRAC_2_PI,
            Some(lat_1) => {
                if !(0. ..90.).contains(&lat_1.abs()) {
                    return Err(Error::InvalidParameter("lat_1", format!("{lat_1}")));
                }
                lat_1.to_radians().cos()
            }
        };
        Ok(Winkel {
            a: ellps.semimajor_axis(),
            cosphi1,
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    // The mean of Aitoff and the equirectangular, in units of the radius,
    // for a longitude relative to the central meridian
    fn raw(&self, lam: f64, phi: f64) -> (f64, f64) {
        let c = 0.5 * lam;
        let d = (phi.cos() * c.cos()).acos();

        let (mut x, mut y) = (0., 0.);
        if d != 0. {
            let rd = d / d.sin();
            x = 2. * rd * phi.cos() * c.sin();
            y = rd * phi.sin();
        }
        (0.5 * (x + lam * self.cosphi1), 0.5 * (y + phi))
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = normalize_symmetric(lon - self.lon_0);
        let (x, y) = self.raw(lam, lat);
        Some((self.a * x + self.x_0, self.a * y + self.y_0))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = (x - self.x_0) / self.a;
        let y = (y - self.y_0) / self.a;

        // Seeded from the equirectangular half, which dominates the scale
        let mut lam = (x / (0.5 * (1. + self.cosphi1))).clamp(-PI, PI);
        let mut phi = y.clamp(-FRAC_PI_2, FRAC_PI_2);

        for _ in 0..MAX_ITER {
            let (fx, fy) = self.raw(lam, phi);
            let (ex, ey) = (fx - x, fy - y);
            if ex.hypot(ey) < TOL {
                return Some((normalize_symmetric(lam + self.lon_0), phi));
            }

            // Forward differenced Jacobian
            const H: f64 = 1e-7;
            let (fxl, fyl) = self.raw(lam + H, phi);
            let (fxp, fyp) = self.raw(lam, phi - H.copysign(phi));
            let j11 = (fxl - fx) / H;
            let j21 = (fyl - fy) / H;
            let j12 = (fxp - fx) / -H.copysign(phi);
            let j22 = (fyp - fy) / -H.copysign(phi);

            let det = j11 * j22 - j12 * j21;
            if det == 0. {
                break;
            }
            lam = (lam - (ex * j22 - ey * j12) / det).clamp(-PI, PI);
            phi = (phi - (ey * j11 - ex * j21) / det).clamp(-FRAC_PI_2, FRAC_PI_2);
        }
        None
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::tests::{roundtrip, WORLDWIDE};
    use crate::projections::{Method, Projection};
    use float_eq::assert_float_eq;

    #[test]
    fn winkel() -> Result<(), Error> {
        let proj = Winkel::new(&Ellipsoid::named("WGS84")?, &Parameters::default())?;
        let a = 6_378_137.;

        // On the equator both constituents are linear in λ: the mean of
        // true scale and cos φ₁ = 2/π
        let (x, y) = proj.fwd(10_f64.to_radians(), 0.).unwrap();
        let expected = 0.5 * (1. + std::f64::consts::FRAC_2_PI) * a * 10_f64.to_radians();
        assert_float_eq!(x, expected, abs <= 1e-6);
        assert_float_eq!(y, 0., abs <= 1e-9);

        // On the central meridian both constituents are equidistant
        let (x, y) = proj.fwd(0., 1.).unwrap();
        assert_float_eq!(x, 0., abs <= 1e-9);
        assert_float_eq!(y, a, abs <= 1e-6);
        Ok(())
    }

    #[test]
    fn winkel_roundtrip() -> Result<(), Error> {
        let proj = Projection::new(
            Method::WinkelTripel,
            &Ellipsoid::named("WGS84")?,
            &Parameters::default(),
        )?;
        roundtrip(&proj, &WORLDWIDE, 1e-9);

        // Far off the map there is nothing to converge to
        let raw = Winkel::new(&Ellipsoid::named("WGS84")?, &Parameters::default())?;
        assert!(raw.inv(4. * 6_378_137., 4. * 6_378_137.).is_none());
        Ok(())
    }
}
