//! Mercator, ellipsoidal and spherical.
//!
//! Domain policy: the poles have no Mercator image, so latitudes within
//! 1e-10 rad of ±90° are rejected (`None`), never clamped.

use super::Parameters;
use crate::math::{phi2, ts};
use crate::{Ellipsoid, Error};
use std::f64::consts::FRAC_PI_2;

const EPS10: f64 = 1e-10;

#[derive(Clone, Copy, Debug)]
pub struct Merc {
    a: f64,
    e: f64,
    k_0: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Merc {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Merc, Error> {
        let mut k_0 = params.k_0;

        // A latitude of true scale trumps an explicit scale factor
        if params.lat_ts != 0. {
            if params.lat_ts.abs() > 90. {
                return Err(Error::InvalidParameter("lat_ts", format!("{}", params.lat_ts)));
            }
            let sc = params.lat_ts.to_radians().sin_cos();
            k_0 = sc.1 / (1. - ellps.eccentricity_squared() * sc.0 * sc.0).sqrt();
        }

        Ok(Merc {
            a: ellps.semimajor_axis(),
            e: ellps.eccentricity(),
            k_0,
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if lat.abs() >= FRAC_PI_2 - EPS10 {
            return None;
        }
        let x = self.a * self.k_0 * (lon - self.lon_0) + self.x_0;
        // The northing is the (scaled) isometric latitude
        let y = -self.a * self.k_0 * ts(lat.sin_cos(), self.e).ln() + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let lon = (x - self.x_0) / (self.a * self.k_0) + self.lon_0;
        let ts0 = (-(y - self.y_0) / (self.a * self.k_0)).exp();
        let lat = phi2(ts0, self.e);
        if lat.is_nan() {
            return None;
        }
        Some((lon, lat))
    }
}

// ----- T E S T S ---------------------------------------------------------------------
