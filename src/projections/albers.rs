//! Albers Equal Area Conic, with one or two standard parallels.
//!
//! Domain policy: total - every geodetic position has an image. The poles
//! map to points on the central meridian.

use super::Parameters;
use crate::math::{msfn, normalize_symmetric, phi_from_q, qsfn};
use crate::{Ellipsoid, Error};
use std::f64::consts::FRAC_PI_2;

const EPS10: f64 = 1e-10;

#[derive(Clone, Copy, Debug)]
pub struct Albers {
    a: f64,
    e: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
    n: f64,
    c: f64,
    // Cone radius of the latitude of origin, in units of a
    rho0: f64,
}

impl Albers {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Albers, Error> {
        let Some(lat_1) = params.lat_1 else {
            return Err(Error::InvalidParameter("lat_1", "missing".to_string()));
        };
        let phi1 = lat_1.to_radians();
        let phi2 = params.lat_2.unwrap_or(lat_1).to_radians();

        if (phi1 + phi2).abs() < EPS10 {
            return Err(Error::InvalidParameter(
                "lat_1, lat_2",
                "|lat_1 + lat_2| should be > 0".to_string(),
            ));
        }

        let e = ellps.eccentricity();
        let es = ellps.eccentricity_squared();

        let sc1 = phi1.sin_cos();
        let m1 = msfn(sc1, es);
        let q1 = qsfn(sc1.0, e);

        // Tangent cone unless two distinct standard parallels are given
        let mut n = sc1.0;
        if (phi1 - phi2).abs() >= EPS10 {
            let sc2 = phi2.sin_cos();
            let m2 = msfn(sc2, es);
            let q2 = qsfn(sc2.0, e);
            n = (m1 * m1 - m2 * m2) / (q2 - q1);
        }
        if n == 0. {
            return Err(Error::InvalidParameter("lat_1, lat_2", "degenerate cone".to_string()));
        }

        let c = m1 * m1 + n * q1;
        let q0 = qsfn(params.lat_0.to_radians().sin(), e);
        let rho0 = (c - n * q0).sqrt() / n;

        Ok(Albers {
            a: ellps.semimajor_axis(),
            e,
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
            n,
            c,
            rho0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = normalize_symmetric(lon - self.lon_0);

        let rr = self.c - self.n * qsfn(lat.sin(), self.e);
        if rr < 0. {
            return None;
        }
        let rho = rr.sqrt() / self.n;

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

        let q = (self.c - rho * rho * self.n * self.n) / self.n;
        let phi = phi_from_q(q, self.e);
        let lon = x.atan2(y) / self.n + self.lon_0;
        Some((lon, phi))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::tests::{roundtrip, WORLDWIDE};
    use crate::projections::{Method, Projection};

    fn conus() -> Result<Albers, Error> {
        // The familiar conterminous-US parameter set
        let params = Parameters {
            lat_1: Some(29.5),
            lat_2: Some(45.5),
            lat_0: 23.,
            lon_0: -96.,
            ..Default::default()
        };
        Albers::new(&Ellipsoid::named("clrk66")?, &params)
    }

    #[test]
    fn albers_roundtrip() -> Result<(), Error> {
        let params = Parameters {
            lat_1: Some(29.5),
            lat_2: Some(45.5),
            lat_0: 23.,
            lon_0: -96.,
            ..Default::default()
        };
        let proj = Projection::new(Method::AlbersEqualArea, &Ellipsoid::named("clrk66")?, &params)?;
        roundtrip(&proj, &WORLDWIDE, 1e-8);

        // The poles map and come back
        let proj = conus()?;
        for pole in [FRAC_PI_2, -FRAC_PI_2] {
            let (x, y) = proj.fwd(-96_f64.to_radians(), pole).unwrap();
            let (_, lat) = proj.inv(x, y).unwrap();
            assert!((lat - pole).abs() < 1e-9);
        }
        Ok(())
    }

    #[test]
    fn true_scale_along_standard_parallel() -> Result<(), Error> {
        let ellps = Ellipsoid::named("clrk66")?;
        let proj = conus()?;

        // Along a standard parallel the scale is true: a small eastward step
        // measures the same on the map as on the ellipsoid
        let phi = 29.5_f64.to_radians();
        let dlam = 1e-6;
        let (x1, y1) = proj.fwd(-96_f64.to_radians(), phi).unwrap();
        let (x2, y2) = proj.fwd(-96_f64.to_radians() + dlam, phi).unwrap();
        let mapped = (x2 - x1).hypot(y2 - y1);
        let true_arc = dlam * phi.cos() * ellps.prime_vertical_radius_of_curvature(phi);
        assert!((mapped / true_arc - 1.).abs() < 1e-6);
        Ok(())
    }
}
