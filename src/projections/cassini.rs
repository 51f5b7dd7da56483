//! Cassini-Soldner: the transverse aspect of the equidistant cylindrical,
//! true scale along the central meridian and along lines perpendicular
//! to it. The series form, reliable within a few degrees of the central
//! meridian.
//!
//! Domain policy: total; accuracy degrades (but the mapping stays defined)
//! far from the central meridian.

use super::Parameters;
use crate::math::{enfn, inv_mlfn, mlfn, normalize_symmetric};
use crate::{Ellipsoid, Error};

const C1: f64 = 1. / 6.;
const C2: f64 = 1. / 120.;
const C3: f64 = 1. / 24.;
const C4: f64 = 1. / 3.;
const C5: f64 = 1. / 15.;

#[derive(Clone, Copy, Debug)]
pub struct Cassini {
    a: f64,
    es: f64,
    en: [f64; 5],
    m0: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Cassini {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Cassini, Error> {
        let es = ellps.eccentricity_squared();
        let en = enfn(es);
        let phi0 = params.lat_0.to_radians();
        Ok(Cassini {
            a: ellps.semimajor_axis(),
            es,
            en,
            m0: mlfn(phi0, phi0.sin(), phi0.cos(), &en),
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = normalize_symmetric(lon - self.lon_0);
        let (sp, cp) = lat.sin_cos();

        let n = 1. / (1. - self.es * sp * sp).sqrt();
        let tn = lat.tan();
        let t = tn * tn;
        let a1 = lam * cp;
        let c = cp * cp * self.es / (1. - self.es);
        let a2 = a1 * a1;

        let x = n * a1 * (1. - a2 * t * (C1 - (8. - t + 8. * c) * a2 * C2));
        let y = mlfn(lat, sp, cp, &self.en) - self.m0
            + n * tn * a2 * (0.5 + (5. - t + 6. * c) * a2 * C3);
        Some((self.a * x + self.x_0, self.a * y + self.y_0))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = (x - self.x_0) / self.a;
        let y = (y - self.y_0) / self.a;

        let ph1 = inv_mlfn(self.m0 + y, self.es, &self.en);
        let tn = ph1.tan();
        let t = tn * tn;

        let s = ph1.sin();
        let mut r = 1. / (1. - self.es * s * s);
        let n = r.sqrt();
        r *= (1. - self.es) * n;

        let dd = x / n;
        let d2 = dd * dd;
        let phi = ph1 - (n * tn / r) * d2 * (0.5 - (1. + 3. * t) * d2 * C3);
        let lam = dd * (1. + t * d2 * (-C4 + (1. + 3. * t) * d2 * C5)) / ph1.cos();
        Some((normalize_symmetric(lam + self.lon_0), phi))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn cassini() -> Result<(), Error> {
        let params = Parameters {
            lat_0: 49.,
            lon_0: -2.,
            ..Default::default()
        };
        let proj = Cassini::new(&Ellipsoid::named("airy")?, &params)?;

        // The central meridian maps to the meridional arc from the latitude
        // of origin
        let en = enfn(Ellipsoid::named("airy")?.eccentricity_squared());
        let phi = 52_f64.to_radians();
        let (x, y) = proj.fwd((-2_f64).to_radians(), phi).unwrap();
        assert_float_eq!(x, 0., abs <= 1e-9);
        let expected = Ellipsoid::named("airy")?.semimajor_axis()
            * (mlfn(phi, phi.sin(), phi.cos(), &en)
                - mlfn(49_f64.to_radians(), 49_f64.to_radians().sin(), 49_f64.to_radians().cos(), &en));
        assert_float_eq!(y, expected, abs <= 1e-6);
        Ok(())
    }

    #[test]
    fn cassini_roundtrip() -> Result<(), Error> {
        let params = Parameters {
            lat_0: 49.,
            lon_0: -2.,
            ..Default::default()
        };
        let proj = Cassini::new(&Ellipsoid::named("airy")?, &params)?;

        // The series form holds near the central meridian
        for (lon, lat) in [(-2., 49.), (1., 52.), (-5., 55.), (-0.5, 60.5), (-3.2, 45.1)] {
            let (x, y) = proj.fwd((lon as f64).to_radians(), (lat as f64).to_radians()).unwrap();
            let (lon2, lat2) = proj.inv(x, y).unwrap();
            assert_float_eq!(lon2.to_degrees(), lon, abs <= 1e-9);
            assert_float_eq!(lat2.to_degrees(), lat, abs <= 1e-9);
        }
        Ok(())
    }
}
