//! Miller's cylindrical: Mercator's spacing, compressed by 4/5 so the
//! poles fit on the map. Spherical, on a sphere with the radius of the
//! semimajor axis. Total domain.

use super::Parameters;
use crate::{Ellipsoid, Error};

#[derive(Clone, Copy, Debug)]
pub struct Miller {
    a: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Miller {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Miller, Error> {
        Ok(Miller {
            a: ellps.semimajor_axis(),
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let x = self.a * (lon - self.lon_0) + self.x_0;
        // ln tan(π/4 + 2φ/5) = asinh tan(4φ/5)
        let y = self.a * (0.8 * lat).tan().asinh() / 0.8 + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let lon = (x - self.x_0) / self.a + self.lon_0;
        let lat = (0.8 * (y - self.y_0) / self.a).sinh().atan() / 0.8;
        Some((lon, lat))
    }
}

// ----- T E S T S ---------------------------------------------------------------------
