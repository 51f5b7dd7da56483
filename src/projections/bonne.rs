//! Bonne: the equal-area pseudoconic of centuries of atlas plates, true to
//! scale along the central meridian and along every parallel.
//!
//! Domain policy: total in the forward direction; the inverse rejects
//! positions whose latitude falls beyond the poles.

use super::Parameters;
use crate::math::{enfn, inv_mlfn, mlfn, normalize_symmetric};
use crate::{Ellipsoid, Error};
use std::f64::consts::FRAC_PI_2;

const EPS10: f64 = 1e-10;

#[derive(Clone, Copy, Debug)]
pub struct Bonne {
    a: f64,
    es: f64,
    en: [f64; 5],
    // cot of the standard parallel, scaled: m(φ1)/sin(φ1)
    am1: f64,
    // Meridional arc of the standard parallel
    m1: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Bonne {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Bonne, Error> {
        let Some(lat_1) = params.lat_1 else {
            return Err(Error::InvalidParameter("lat_1", "missing".to_string()));
        };
        // At lat_1 = 0 the cone degenerates to the sinusoidal cylinder
        if lat_1.abs() < 1e-9 || lat_1.abs() > 90. {
            return Err(Error::InvalidParameter("lat_1", format!("{lat_1}")));
        }
        let phi1 = lat_1.to_radians();

        let es = ellps.eccentricity_squared();
        let en = enfn(es);
        let (sp, cp) = phi1.sin_cos();
        let m1 = mlfn(phi1, sp, cp, &en);
        let am1 = cp / ((1. - es * sp * sp).sqrt() * sp);

        Ok(Bonne {
            a: ellps.semimajor_axis(),
            es,
            en,
            am1,
            m1,
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = normalize_symmetric(lon - self.lon_0);
        let (sp, cp) = lat.sin_cos();

        let rh = self.am1 + self.m1 - mlfn(lat, sp, cp, &self.en);
        let e = cp * lam / (rh * (1. - self.es * sp * sp).sqrt());
        let x = self.a * rh * e.sin() + self.x_0;
        let y = self.a * (self.am1 - rh * e.cos()) + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = (x - self.x_0) / self.a;
        let y = self.am1 - (y - self.y_0) / self.a;
        // The arc radius carries the sign of the standard parallel's
        // hemisphere
        let rh = x.hypot(y).copysign(self.am1);

        let phi = inv_mlfn(self.am1 + self.m1 - rh, self.es, &self.en);
        let abs = phi.abs();
        if abs < FRAC_PI_2 {
            let s = phi.sin();
            let lam = rh * x.atan2(y) * (1. - self.es * s * s).sqrt() / phi.cos();
            return Some((normalize_symmetric(lam + self.lon_0), phi));
        }
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
    use float_eq::assert_float_eq;

    fn atlas() -> Result<Bonne, Error> {
        Bonne::new(
            &Ellipsoid::default(),
            &Parameters {
                lat_1: Some(60.),
                ..Default::default()
            },
        )
    }

    #[test]
    fn parallels_true_to_scale() -> Result<(), Error> {
        let ellps = Ellipsoid::default();
        let proj = atlas()?;

        // Every parallel is true to scale, not just the standard one
        for lat in [0.0_f64, 30., 60., 85.] {
            let phi = lat.to_radians();
            let dlam = 1e-6;
            let (x1, y1) = proj.fwd(0., phi).unwrap();
            let (x2, y2) = proj.fwd(dlam, phi).unwrap();
            let mapped = (x2 - x1).hypot(y2 - y1);
            let true_arc = dlam * phi.cos() * ellps.prime_vertical_radius_of_curvature(phi);
            assert_float_eq!(mapped / true_arc, 1., abs <= 1e-6);
        }
        Ok(())
    }

    #[test]
    fn bonne_roundtrip() -> Result<(), Error> {
        let proj = atlas()?;
        for (lon, lat) in [(0., 60.), (12., 55.), (-96., 39.), (60., -33.), (-70., -50.), (10., 80.)]
        {
            let (x, y) = proj.fwd((lon as f64).to_radians(), (lat as f64).to_radians()).unwrap();
            let (lon2, lat2) = proj.inv(x, y).unwrap();
            assert_float_eq!(lon2.to_degrees(), lon, abs <= 1e-8);
            assert_float_eq!(lat2.to_degrees(), lat, abs <= 1e-8);
        }

        // The degenerate and the absent standard parallel are rejected
        assert!(Bonne::new(&Ellipsoid::default(), &Parameters { lat_1: Some(0.), ..Default::default() }).is_err());
        assert!(Bonne::new(&Ellipsoid::default(), &Parameters::default()).is_err());
        Ok(())
    }
}
