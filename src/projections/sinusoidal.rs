//! Sinusoidal (Sanson-Flamsteed), ellipsoidal form: equally spaced
//! parallels, equal area, true scale along every parallel.
//!
//! Domain policy: total in the forward direction; the inverse rejects
//! northings beyond the pole.

use super::Parameters;
use crate::math::{enfn, inv_mlfn, mlfn, normalize_symmetric};
use crate::{Ellipsoid, Error};
use std::f64::consts::FRAC_PI_2;

const EPS10: f64 = 1e-10;

#[derive(Clone, Copy, Debug)]
pub struct Sinusoidal {
    a: f64,
    es: f64,
    en: [f64; 5],
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Sinusoidal {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Sinusoidal, Error> {
        Ok(Sinusoidal {
            a: ellps.semimajor_axis(),
            es: ellps.eccentricity_squared(),
            en: enfn(ellps.eccentricity_squared()),
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = normalize_symmetric(lon - self.lon_0);
        let (s, c) = lat.sin_cos();
        let x = self.a * lam * c / (1. - self.es * s * s).sqrt() + self.x_0;
        let y = self.a * mlfn(lat, s, c, &self.en) + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = (x - self.x_0) / self.a;
        let y = (y - self.y_0) / self.a;

        let phi = inv_mlfn(y, self.es, &self.en);
        let abs = phi.abs();
        if abs < FRAC_PI_2 {
            let s = phi.sin();
            let lam = x * (1. - self.es * s * s).sqrt() / phi.cos();
            return Some((normalize_symmetric(lam + self.lon_0), phi));
        }
        // At the poles the longitude degenerates
        if abs - EPS10 < FRAC_PI_2 {
            return Some((self.lon_0, phi));
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
    fn sinusoidal() -> Result<(), Error> {
        let proj = Sinusoidal::new(&Ellipsoid::default(), &Parameters::default())?;

        // True scale along the equator
        let (x, y) = proj.fwd(10_f64.to_radians(), 0.).unwrap();
        assert_float_eq!(x, 1_113_194.907_932_735_7, abs <= 1e-6);
        assert_float_eq!(y, 0., abs <= 1e-9);

        // The central meridian is the meridional arc: a quarter meridian
        // from equator to pole
        let (x, y) = proj.fwd(0., FRAC_PI_2).unwrap();
        assert_float_eq!(x, 0., abs <= 1e-9);
        assert_float_eq!(y, 10_001_965.729, abs <= 1e-3);
        Ok(())
    }

    #[test]
    fn sinusoidal_roundtrip() -> Result<(), Error> {
        let proj = Projection::new(
            Method::Sinusoidal,
            &Ellipsoid::default(),
            &Parameters::default(),
        )?;
        roundtrip(&proj, &WORLDWIDE, 1e-9);
        Ok(())
    }
}
