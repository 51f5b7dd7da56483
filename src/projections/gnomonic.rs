//! Gnomonic: perspective from the center of the sphere, so every great
//! circle maps to a straight line. Spherical, on a sphere with the radius
//! of the semimajor axis.
//!
//! Domain policy: positions 90° or more from the projection center have
//! no image and are rejected.

use super::Parameters;
use crate::math::{aasin, normalize_symmetric};
use crate::{Ellipsoid, Error};

const EPS10: f64 = 1e-10;

#[derive(Clone, Copy, Debug)]
pub struct Gnomonic {
    a: f64,
    phi0: f64,
    sinph0: f64,
    cosph0: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Gnomonic {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Gnomonic, Error> {
        if params.lat_0.abs() > 90. {
            return Err(Error::InvalidParameter("lat_0", format!("{}", params.lat_0)));
        }
        let phi0 = params.lat_0.to_radians();
        let (sinph0, cosph0) = phi0.sin_cos();
        Ok(Gnomonic {
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

        // Cosine of the angular distance from the projection center
        let cosc = self.sinph0 * sinphi + self.cosph0 * cosphi * cos_dlam;
        if cosc <= EPS10 {
            return None;
        }

        let x = self.a * cosphi * sin_dlam / cosc + self.x_0;
        let y = self.a * (self.cosph0 * sinphi - self.sinph0 * cosphi * cos_dlam) / cosc + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = (x - self.x_0) / self.a;
        let y = (y - self.y_0) / self.a;
        let rho = x.hypot(y);

        if rho < EPS10 {
            return Some((self.lon_0, self.phi0));
        }

        // ρ = tan c
        let c = rho.atan();
        let (sinc, cosc) = c.sin_cos();

        let phi = aasin(cosc * self.sinph0 + y * sinc * self.cosph0 / rho);
        let lam = (x * sinc).atan2(rho * self.cosph0 * cosc - y * self.sinph0 * sinc);
        Some((normalize_symmetric(lam + self.lon_0), phi))
    }
}

// ----- T E S T S ---------------------------------------------------------------------
