//! Mollweide's equal-area world projection: the full Earth in an ellipse
//! twice as wide as high. Spherical, on a sphere with the radius of the
//! semimajor axis.
//!
//! Domain policy: total in the forward direction; inverse positions
//! outside the bounding ellipse are rejected, and the poles come back
//! with the central meridian's longitude.

use super::Parameters;
use crate::math::{aasin, normalize_symmetric, MAX_ITERATIONS};
use crate::{Ellipsoid, Error};
use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};

const EPS10: f64 = 1e-10;

// x = C_X λ cos θ,  y = C_Y sin θ,  with 2θ + sin 2θ = π sin φ
const C_X: f64 = 2. * SQRT_2 / PI;
const C_Y: f64 = SQRT_2;
const C_P: f64 = PI;

#[derive(Clone, Copy, Debug)]
pub struct Mollweide {
    a: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Mollweide {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Mollweide, Error> {
        Ok(Mollweide {
            a: ellps.semimajor_axis(),
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = normalize_symmetric(lon - self.lon_0);

        // Newton for the auxiliary angle 2θ
        let k = C_P * lat.sin();
        let mut theta2 = lat;
        let mut converged = false;
        for _ in 0..MAX_ITERATIONS {
            let v = (theta2 + theta2.sin() - k) / (1. + theta2.cos());
            theta2 -= v;
            if v.abs() < EPS10 {
                converged = true;
                break;
            }
        }
        // The iteration stalls only hard against the poles, where θ is known
        let theta = if converged {
            0.5 * theta2
        } else {
            FRAC_PI_2.copysign(lat)
        };

        let x = self.a * C_X * lam * theta.cos() + self.x_0;
        let y = self.a * C_Y * theta.sin() + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = (x - self.x_0) / self.a;
        let y = (y - self.y_0) / self.a;

        let s = y / C_Y;
        if s.abs() > 1. + EPS10 {
            return None;
        }
        let theta = aasin(s);

        // At the poles the longitude degenerates
        if theta.cos().abs() < EPS10 {
            return Some((self.lon_0, FRAC_PI_2.copysign(y)));
        }

        let lam = x / (C_X * theta.cos());
        if lam.abs() > PI + EPS10 {
            return None;
        }
        let phi = aasin((2. * theta + (2. * theta).sin()) / C_P);
        Some((normalize_symmetric(lam + self.lon_0), phi))
    }
}

// ----- T E S T S ---------------------------------------------------------------------
