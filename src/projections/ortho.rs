//! Orthographic: the view from infinity, one hemisphere on a disc.
//! Spherical, on a sphere with the radius of the semimajor axis.
//!
//! Domain policy: positions beyond the horizon (more than 90° from the
//! projection center) are rejected, as are inverse positions outside the
//! bounding disc.

use super::Parameters;
use crate::math::{aasin, normalize_symmetric};
use crate::{Ellipsoid, Error};

const EPS10: f64 = 1e-10;

#[derive(Clone, Copy, Debug)]
pub struct Ortho {
    a: f64,
    phi0: f64,
    sinph0: f64,
    cosph0: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Ortho {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Ortho, Error> {
        if params.lat_0.abs() > 90. {
            return Err(Error::InvalidParameter("lat_0", format!("{}", params.lat_0)));
        }
        let phi0 = params.lat_0.to_radians();
        let (sinph0, cosph0) = phi0.sin_cos();
        Ok(Ortho {
            a: ellps.semimajor_axis(),
            phi0,
            sinph0,
            cosph0,
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let dlam = normalize_symmetric(lon - self.lon_0);
        let (sinphi, cosphi) = lat.sin_cos();
        let (sin_dlam, cos_dlam) = dlam.sin_cos();

        // Behind the horizon?
        if self.sinph0 * sinphi + self.cosph0 * cosphi * cos_dlam < -EPS10 {
            return None;
        }

        let x = self.a * cosphi * sin_dlam + self.x_0;
        let y = self.a * (self.cosph0 * sinphi - self.sinph0 * cosphi * cos_dlam) + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = (x - self.x_0) / self.a;
        let y = (y - self.y_0) / self.a;
        let rho = x.hypot(y);

        if rho < EPS10 {
            return Some((self.lon_0, self.phi0));
        }
        // ρ = sin c: outside the disc there is nothing
        if rho > 1. + EPS10 {
            return None;
        }
        let sinc = rho.min(1.);
        let cosc = (1. - sinc * sinc).sqrt();

        let phi = aasin(cosc * self.sinph0 + y * sinc * self.cosph0 / rho);
        let lam = (x * sinc).atan2(rho * self.cosph0 * cosc - y * self.sinph0 * sinc);
        Some((normalize_symmetric(lam + self.lon_0), phi))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn ortho() -> Result<(), Error> {
        let params = Parameters {
            lat_0: 52.,
            lon_0: 5.,
            ..Default::default()
        };
        let proj = Ortho::new(&Ellipsoid::named("WGS84")?, &params)?;
        let a = 6_378_137.;

        // The horizon circle has radius a: a point 90° down the central
        // meridian lands on it
        let (x, y) = proj.fwd(5_f64.to_radians(), (52_f64 - 90.).to_radians()).unwrap();
        assert_float_eq!(x, 0., abs <= 1e-9);
        assert_float_eq!(y, -a, abs <= 1e-6);

        // The far hemisphere is invisible
        assert!(proj.fwd((5_f64 + 180.).to_radians(), -52_f64.to_radians()).is_none());
        // And the plane outside the disc is empty
        assert!(proj.inv(1.5 * a, 0.).is_none());
        Ok(())
    }

    #[test]
    fn ortho_roundtrip() -> Result<(), Error> {
        let params = Parameters {
            lat_0: 52.,
            lon_0: 5.,
            ..Default::default()
        };
        let proj = Ortho::new(&Ellipsoid::named("WGS84")?, &params)?;

        for (lon, lat) in [(5., 52.), (12., 55.), (-10., 35.), (40., 70.), (5., -20.)] {
            let (x, y) = proj.fwd((lon as f64).to_radians(), (lat as f64).to_radians()).unwrap();
            let (lon2, lat2) = proj.inv(x, y).unwrap();
            assert_float_eq!(lon2.to_degrees(), lon, abs <= 1e-9);
            assert_float_eq!(lat2.to_degrees(), lat, abs <= 1e-9);
        }
        Ok(())
    }
}
