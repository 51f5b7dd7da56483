//! Equidistant cylindrical, with Plate Carrée as its equatorial special
//! case: the graticule drawn as a rectangular grid, true scale along all
//! meridians and along the latitude of true scale. Spherical, on a sphere
//! with the radius of the semimajor axis.
//!
//! Domain policy: total in the forward direction; inverse northings beyond
//! the pole are rejected.

use super::Parameters;
use crate::{Ellipsoid, Error};
use std::f64::consts::FRAC_PI_2;

const EPS10: f64 = 1e-10;

#[derive(Clone, Copy, Debug)]
pub struct Eqc {
    a: f64,
    // cos of the latitude of true scale
    rc: f64,
    phi0: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Eqc {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Eqc, Error> {
        if params.lat_ts.abs() >= 90. {
            return Err(Error::InvalidParameter("lat_ts", format!("{}", params.lat_ts)));
        }
        Ok(Eqc {
            a: ellps.semimajor_axis(),
            rc: params.lat_ts.to_radians().cos(),
            phi0: params.lat_0.to_radians(),
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let x = self.a * self.rc * (lon - self.lon_0) + self.x_0;
        let y = self.a * (lat - self.phi0) + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let lon = (x - self.x_0) / (self.a * self.rc) + self.lon_0;
        let lat = (y - self.y_0) / self.a + self.phi0;
        if lat.abs() > FRAC_PI_2 + EPS10 {
            return None;
        }
        Some((lon, lat))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn plate_carree() -> Result<(), Error> {
        let proj = Eqc::new(&Ellipsoid::named("WGS84")?, &Parameters::default())?;

        // The degree is the same length everywhere
        let (x, y) = proj.fwd(10_f64.to_radians(), 55_f64.to_radians()).unwrap();
        assert_float_eq!(x, 1_113_194.907_932_735_7, abs <= 1e-6);
        assert_float_eq!(y, 5.5 * 1_113_194.907_932_735_7, abs <= 1e-2);

        let (lon, lat) = proj.inv(x, y).unwrap();
        assert_float_eq!(lon.to_degrees(), 10., abs <= 1e-12);
        assert_float_eq!(lat.to_degrees(), 55., abs <= 1e-12);

        // Beyond the pole
        assert!(proj.inv(0., 1.1 * 90. * 111_194.9).is_none());
        Ok(())
    }

    #[test]
    fn latitude_of_true_scale() -> Result<(), Error> {
        let params = Parameters {
            lat_ts: 60.,
            ..Default::default()
        };
        let proj = Eqc::new(&Ellipsoid::named("WGS84")?, &params)?;

        // Parallels are compressed by cos(60°) = 1/2
        let (x, _) = proj.fwd(10_f64.to_radians(), 0.).unwrap();
        assert_float_eq!(x, 1_113_194.907_932_735_7 / 2., abs <= 1e-6);

        assert!(Eqc::new(&Ellipsoid::named("WGS84")?, &Parameters { lat_ts: 90., ..Default::default() }).is_err());
        Ok(())
    }
}
