//! Hammer-Aitoff: the Lambert azimuthal equal-area of a hemisphere,
//! doubled in longitude, so the whole world fills a 2:1 ellipse with
//! equal-area fidelity. Spherical, on a sphere with the radius of the
//! semimajor axis.
//!
//! Domain policy: total in the forward direction; inverse positions
//! outside the bounding ellipse are rejected.

use super::Parameters;
use crate::math::{aasin, normalize_symmetric};
use crate::{Ellipsoid, Error};

const EPS: f64 = 1e-10;

#[derive(Clone, Copy, Debug)]
pub struct Hammer {
    a: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Hammer {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Hammer, Error> {
        Ok(Hammer {
            a: ellps.semimajor_axis(),
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = 0.5 * normalize_symmetric(lon - self.lon_0);
        let cosphi = lat.cos();
        let d = (2. / (1. + cosphi * lam.cos())).sqrt();
        let x = self.a * 2. * d * cosphi * lam.sin() + self.x_0;
        let y = self.a * d * lat.sin() + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = (x - self.x_0) / self.a;
        let y = (y - self.y_0) / self.a;

        let z2 = 1. - x * x / 16. - y * y / 4.;
        if z2 < 0. {
            return None;
        }
        let z = z2.sqrt();
        // The rim of the ellipse is the antipodal point, blown up: reject
        if (2. * z * z - 1.).abs() < EPS {
            return None;
        }
        let lam = 2. * (0.5 * x * z).atan2(2. * z * z - 1.);
        let phi = aasin(z * y);
        Some((normalize_symmetric(lam + self.lon_0), phi))
    }
}

// ----- T E S T S ---------------------------------------------------------------------
