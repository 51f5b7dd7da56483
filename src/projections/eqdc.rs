//! Equidistant conic, with one or two standard parallels: parallels are
//! equally spaced concentric arcs, meridians true to scale.
//!
//! Domain policy: total - both poles map to arcs (or the cone point).

use super::Parameters;
use crate::math::{enfn, inv_mlfn, mlfn, msfn, normalize_symmetric};
use crate::{Ellipsoid, Error};
use std::f64::consts::FRAC_PI_2;

const EPS10: f64 = 1e-10;

#[derive(Clone, Copy, Debug)]
pub struct Eqdc {
    a: f64,
    es: f64,
    en: [f64; 5],
    n: f64,
    c: f64,
    rho0: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Eqdc {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Eqdc, Error> {
        let Some(lat_1) = params.lat_1 else {
            return Err(Error::InvalidParameter("lat_1", "missing".to_string()));
        };
        let phi1 = lat_1.to_radians();
        let phi2 = params.lat_2.unwrap_or(lat_1).to_radians();

        let es = ellps.eccentricity_squared();
        let en = enfn(es);

        let sc1 = phi1.sin_cos();
        let m1 = msfn(sc1, es);
        let ml1 = mlfn(phi1, sc1.0, sc1.1, &en);

        // Tangent cone unless two distinct standard parallels are given
        let mut n = sc1.0;
        if (phi1 - phi2).abs() >= EPS10 {
            let sc2 = phi2.sin_cos();
            let m2 = msfn(sc2, es);
            let ml2 = mlfn(phi2, sc2.0, sc2.1, &en);
            if (ml1 - ml2).abs() < EPS10 {
                return Err(Error::InvalidParameter("lat_1, lat_2", "degenerate cone".to_string()));
            }
            n = (m1 - m2) / (ml2 - ml1);
        }
        if n == 0. {
            return Err(Error::InvalidParameter("lat_1, lat_2", "degenerate cone".to_string()));
        }

        let c = ml1 + m1 / n;
        let phi0 = params.lat_0.to_radians();
        let rho0 = c - mlfn(phi0, phi0.sin(), phi0.cos(), &en);

        Ok(Eqdc {
            a: ellps.semimajor_axis(),
            es,
            en,
            n,
            c,
            rho0,
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = normalize_symmetric(lon - self.lon_0);

        let rho = self.c - mlfn(lat, lat.sin(), lat.cos(), &self.en);
        let (sin_nl, cos_nl) = (lam * self.n).sin_cos();
        let x = self.a * rho * sin_nl + self.x_0;
        let y = self.a * (self.rho0 - rho * cos_nl) + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let mut x = (x - self.x_0) / self.a;
        let mut y = self.rho0 - (y - self.y_0) / self.a;
        let mut rho = x.hypot(y);

        if rho == 0. {
            return Some((self.lon_0, FRAC_PI_2.copysign(self.n)));
        }
        if self.n < 0. {
            rho = -rho;
            x = -x;
            y = -y;
        }

        let phi = inv_mlfn(self.c - rho, self.es, &self.en);
        let lon = x.atan2(y) / self.n + self.lon_0;
        Some((normalize_symmetric(lon), phi))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::tests::{roundtrip, WORLDWIDE};
    use crate::projections::{Method, Projection};
    use float_eq::assert_float_eq;

    fn north_america() -> Parameters {
        Parameters {
            lat_1: Some(20.),
            lat_2: Some(60.),
            lat_0: 40.,
            lon_0: -96.,
            ..Default::default()
        }
    }

    #[test]
    fn eqdc_roundtrip() -> Result<(), Error> {
        let proj = Projection::new(
            Method::EquidistantConic,
            &Ellipsoid::default(),
            &north_america(),
        )?;
        roundtrip(&proj, &WORLDWIDE, 1e-8);
        Ok(())
    }

    #[test]
    fn meridians_true_to_scale() -> Result<(), Error> {
        let ellps = Ellipsoid::default();
        let proj = Eqdc::new(&ellps, &north_america())?;

        // The distance between two nearby points on a meridian must equal
        // the meridional arc between them
        let (phi, dphi) = (40_f64.to_radians(), 1e-6);
        let (x1, y1) = proj.fwd(-96_f64.to_radians(), phi).unwrap();
        let (x2, y2) = proj.fwd(-96_f64.to_radians(), phi + dphi).unwrap();
        let mapped = (x2 - x1).hypot(y2 - y1);
        let true_arc = dphi * ellps.meridian_radius_of_curvature(phi);
        assert_float_eq!(mapped / true_arc, 1., abs <= 1e-6);

        // Validation of the single parallel variant too
        let params = Parameters {
            lat_1: Some(40.),
            lat_0: 40.,
            lon_0: -96.,
            ..Default::default()
        };
        let proj = Projection::new(Method::EquidistantConic, &ellps, &params)?;
        roundtrip(&proj, &WORLDWIDE, 1e-8);
        Ok(())
    }
}
