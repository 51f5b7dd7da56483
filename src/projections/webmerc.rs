//! Web Mercator: the spherical Mercator formulas evaluated with the
//! semimajor axis of the (usually WGS84) ellipsoid.
//!
//! Domain policy as for the ellipsoidal Mercator: the poles are rejected.

use super::Parameters;
use crate::{Ellipsoid, Error};
use std::f64::consts::FRAC_PI_2;

const EPS10: f64 = 1e-10;

#[derive(Clone, Copy, Debug)]
pub struct WebMerc {
    a: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl WebMerc {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<WebMerc, Error> {
        Ok(WebMerc {
            a: ellps.semimajor_axis(),
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if lat.abs() >= FRAC_PI_2 - EPS10 {
            return None;
        }
        let x = self.a * (lon - self.lon_0) + self.x_0;
        let y = self.a * lat.tan().asinh() + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let lon = (x - self.x_0) / self.a + self.lon_0;
        let lat = ((y - self.y_0) / self.a).sinh().atan();
        Some((lon, lat))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn webmerc() -> Result<(), Error> {
        let ellps = Ellipsoid::named("WGS84")?;
        let proj = WebMerc::new(&ellps, &Parameters::default())?;

        // Validation value from PROJ: echo 12 55 0 0 | cct -d18 +proj=webmerc
        let (x, y) = proj.fwd(12_f64.to_radians(), 55_f64.to_radians()).unwrap();
        assert_float_eq!(x, 1_335_833.889_519_282_8, abs <= 1e-8);
        assert_float_eq!(y, 7_361_866.113_051_188, abs <= 1e-8);

        let (lon, lat) = proj.inv(x, y).unwrap();
        assert_float_eq!(lon.to_degrees(), 12., abs <= 1e-10);
        assert_float_eq!(lat.to_degrees(), 55., abs <= 1e-10);
        Ok(())
    }
}
