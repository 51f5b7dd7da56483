//! Lambert Conformal Conic, with one or two standard parallels.
//!
//! Domain policy: the pole opposite the cone apex has no image and is
//! rejected (`None`); the apex pole itself maps to the cone point.

use super::Parameters;
use crate::math::{msfn, normalize_symmetric, phi2, ts};
use crate::{Ellipsoid, Error};
use std::f64::consts::FRAC_PI_2;

const EPS10: f64 = 1e-10;

#[derive(Clone, Copy, Debug)]
pub struct Lcc {
    a: f64,
    e: f64,
    k_0: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
    n: f64,
    c: f64,
    rho0: f64,
}

impl Lcc {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Lcc, Error> {
        let Some(lat_1) = params.lat_1 else {
            return Err(Error::InvalidParameter("lat_1", "missing".to_string()));
        };
        let phi1 = lat_1.to_radians();
        let phi2_ = params.lat_2.unwrap_or(lat_1).to_radians();
        let lat_0 = params.lat_0.to_radians();

        let e = ellps.eccentricity();
        let es = ellps.eccentricity_squared();

        if (phi1 + phi2_).abs() < EPS10 {
            return Err(Error::InvalidParameter(
                "lat_1, lat_2",
                "|lat_1 + lat_2| should be > 0".to_string(),
            ));
        }
        let sc = phi1.sin_cos();
        if sc.1.abs() < EPS10 || phi1.abs() >= FRAC_PI_2 {
            return Err(Error::InvalidParameter(
                "lat_1",
                "|lat_1| should be < 90°".to_string(),
            ));
        }
        if phi2_.cos().abs() < EPS10 || phi2_.abs() >= FRAC_PI_2 {
            return Err(Error::InvalidParameter(
                "lat_2",
                "|lat_2| should be < 90°".to_string(),
            ));
        }

        let mut n = sc.0;

        // Snyder (1982) eq. 12-15
        let m1 = msfn(sc, es);
        // Snyder (1982) eq. 7-10: exp(-𝜓)
        let ml1 = ts(sc, e);

        // Secant case?
        if (phi1 - phi2_).abs() >= EPS10 {
            let sc = phi2_.sin_cos();
            n = (m1 / msfn(sc, es)).ln();
            if n == 0. {
                return Err(Error::InvalidParameter("lat_1, lat_2", "degenerate cone".to_string()));
            }
            let ml2 = ts(sc, e);
            let denom = (ml1 / ml2).ln();
            if denom == 0. {
                return Err(Error::InvalidParameter("lat_1, lat_2", "degenerate cone".to_string()));
            }
            n /= denom;
        }

        let c = m1 * ml1.powf(-n) / n;
        let mut rho0 = 0.;
        if (lat_0.abs() - FRAC_PI_2).abs() > EPS10 {
            rho0 = c * ts(lat_0.sin_cos(), e).powf(n);
        }

        Ok(Lcc {
            a: ellps.semimajor_axis(),
            e,
            k_0: params.k_0,
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

        let mut rho = 0.;
        // Close to one of the poles?
        if (lat.abs() - FRAC_PI_2).abs() < EPS10 {
            if lat * self.n <= 0. {
                return None;
            }
        } else {
            rho = self.c * ts(lat.sin_cos(), self.e).powf(self.n);
        }

        let (sin_nl, cos_nl) = (lam * self.n).sin_cos();
        let x = self.a * self.k_0 * rho * sin_nl + self.x_0;
        let y = self.a * self.k_0 * (self.rho0 - rho * cos_nl) + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let mut x = (x - self.x_0) / (self.a * self.k_0);
        let mut y = self.rho0 - (y - self.y_0) / (self.a * self.k_0);
        let mut rho = x.hypot(y);

        // On the cone point
        if rho == 0. {
            return Some((self.lon_0, FRAC_PI_2.copysign(self.n)));
        }

        // Standard parallels on the southern hemisphere?
        if self.n < 0. {
            rho = -rho;
            x = -x;
            y = -y;
        }

        let ts0 = (rho / self.c).powf(1. / self.n);
        let phi = phi2(ts0, self.e);
        if phi.is_infinite() || phi.is_nan() {
            return None;
        }
        let lon = x.atan2(y) / self.n + self.lon_0;
        Some((lon, phi))
    }
}

// ----- T E S T S ---------------------------------------------------------------------
