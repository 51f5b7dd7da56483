//! Robinson's compromise projection for world maps, evaluated - like every
//! other implementation in circulation - by cubic interpolation in
//! Robinson's original table of parallel lengths and spacings, given at
//! 5° intervals of latitude. Spherical: computed on a sphere with the
//! radius of the semimajor axis.
//!
//! Domain policy: total; northings beyond the pole line (plus a small
//! grace) are rejected on the inverse side.

use super::Parameters;
use crate::math::{normalize_symmetric, MAX_ITERATIONS};
use crate::{Ellipsoid, Error};
use std::f64::consts::FRAC_PI_2;

// Length of a parallel, relative to the equator, and its distance from the
// equator, relative to 0.5072 of the map height: both scaled to the final
// plane by these two factors
const FXC: f64 = 0.8487;
const FYC: f64 = 1.3523;

// 5° of latitude: one table interval, and its reciprocal
const RC1: f64 = 0.087_266_462_599_716_478_84;
const C1: f64 = 11.459_155_902_616_464_175_44;

const NODES: usize = 18;
const ONEEPS: f64 = 1.000001;
const EPS: f64 = 1e-8;

#[derive(Clone, Copy, Debug)]
struct Coefs {
    c0: f64,
    c1: f64,
    c2: f64,
    c3: f64,
}

impl Coefs {
    // Horner evaluation of the interpolating cubic and its derivative; z in
    // degrees from the table node
    fn v(&self, z: f64) -> f64 {
        self.c0 + z * (self.c1 + z * (self.c2 + z * self.c3))
    }
    fn dv(&self, z: f64) -> f64 {
        self.c1 + z * (2. * self.c2 + z * 3. * self.c3)
    }
}

macro_rules! coefs {
    ($(($c0:expr, $c1:expr, $c2:expr, $c3:expr)),+ $(,)?) => {
        [$(Coefs { c0: $c0, c1: $c1, c2: $c2, c3: $c3 }),+]
    };
}

// Parallel lengths: Robinson's X column and the splined derivatives
#[rustfmt::skip]
const X: [Coefs; 19] = coefs![
    (1.,     2.2199e-17,    -7.15515e-05,  3.1103e-06),
    (0.9986, -0.000482243,  -2.4897e-05,  -1.3309e-06),
    (0.9954, -0.00083103,   -4.48605e-05, -9.86701e-07),
    (0.99,   -0.00135364,   -5.9661e-05,   3.6777e-06),
    (0.9822, -0.00167442,   -4.49547e-06, -5.72411e-06),
    (0.973,  -0.00214868,   -9.03571e-05,  1.8736e-08),
    (0.96,   -0.00305085,   -9.00761e-05,  1.64917e-06),
    (0.9427, -0.00382792,   -6.53386e-05, -2.6154e-06),
    (0.9216, -0.00467746,   -0.00010457,   4.81243e-06),
    (0.8962, -0.00536223,   -3.23831e-05, -5.43432e-06),
    (0.8679, -0.00609363,   -0.000113898,  3.32484e-06),
    (0.835,  -0.00698325,   -6.40253e-05,  9.34959e-07),
    (0.7986, -0.00755338,   -5.00009e-05,  9.35324e-07),
    (0.7597, -0.00798324,   -3.5971e-05,  -2.27626e-06),
    (0.7186, -0.00851367,   -7.01149e-05, -8.6303e-06),
    (0.6732, -0.00986209,   -0.000199569,  1.91974e-05),
    (0.6213, -0.010418,      8.83923e-05,  6.24051e-06),
    (0.5722, -0.00906601,    0.000182,     6.24051e-06),
    (0.5322, -0.00677797,    0.000275608,  6.24051e-06),
];

// Parallel distances from the equator: Robinson's Y column
#[rustfmt::skip]
const Y: [Coefs; 19] = coefs![
    (-5.20417e-18, 0.0124,     1.21431e-18, -8.45284e-11),
    (0.062,        0.0124,    -1.26793e-09,  4.22642e-10),
    (0.124,        0.0124,     5.07171e-09, -1.60604e-09),
    (0.186,        0.0123999, -1.90189e-08,  6.00152e-09),
    (0.248,        0.0124002,  7.10039e-08, -2.24e-08),
    (0.31,         0.0123992, -2.64997e-07,  8.35986e-08),
    (0.372,        0.0124029,  9.88983e-07, -3.11994e-07),
    (0.434,        0.0123893, -3.69093e-06, -4.35621e-07),
    (0.4958,       0.0123198, -1.02252e-05, -3.45523e-07),
    (0.5571,       0.0121916, -1.54081e-05, -5.82288e-07),
    (0.6176,       0.0119938, -2.41424e-05, -5.25327e-07),
    (0.6769,       0.011713,  -3.20223e-05, -5.16405e-07),
    (0.7346,       0.0113541, -3.97684e-05, -6.09052e-07),
    (0.7903,       0.0109107, -4.89042e-05, -1.04739e-06),
    (0.8435,       0.0103431, -6.4615e-05,  -1.40374e-09),
    (0.8936,       0.00969686, -6.4636e-05, -8.547e-06),
    (0.9394,       0.00840947, -0.000192841, -4.2106e-06),
    (0.9761,       0.00616527, -0.000256,    -4.2106e-06),
    (1.,           0.00328947, -0.000319159, -4.2106e-06),
];

#[derive(Clone, Copy, Debug)]
pub struct Robinson {
    a: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Robinson {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Robinson, Error> {
        Ok(Robinson {
            a: ellps.semimajor_axis(),
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = normalize_symmetric(lon - self.lon_0);

        let dphi = lat.abs();
        let i = ((dphi * C1).floor() as usize).min(NODES - 1);
        // Degrees into the table interval
        let z = (dphi - RC1 * i as f64).to_degrees();

        let x = self.a * X[i].v(z) * FXC * lam + self.x_0;
        let mut y = self.a * Y[i].v(z) * FYC;
        if lat < 0. {
            y = -y;
        }
        Some((x, y + self.y_0))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = (x - self.x_0) / self.a;
        let y = (y - self.y_0) / self.a;

        let mut lam = x / FXC;
        let mut phi = (y / FYC).abs();

        if phi >= 1. {
            // On (or numerically beyond) the pole line
            if phi > ONEEPS {
                return None;
            }
            phi = FRAC_PI_2.copysign(y);
            lam /= X[NODES].c0;
            return Some((normalize_symmetric(lam + self.lon_0), phi));
        }

        // Locate the table interval containing this northing
        let mut i = ((phi * NODES as f64).floor() as usize).min(NODES - 1);
        loop {
            if Y[i].c0 > phi {
                i -= 1;
            } else if Y[i + 1].c0 <= phi {
                i += 1;
            } else {
                break;
            }
        }

        // Linear first guess, refined into a root of the interval cubic by
        // Newton-Raphson
        let mut t = 5. * (phi - Y[i].c0) / (Y[i + 1].c0 - Y[i].c0);
        let root = Coefs {
            c0: Y[i].c0 - phi,
            ..Y[i]
        };
        let mut converged = false;
        for _ in 0..MAX_ITERATIONS {
            let t1 = root.v(t) / root.dv(t);
            t -= t1;
            if t1.abs() < EPS {
                converged = true;
                break;
            }
        }
        if !converged {
            log::warn!("robinson: iteration budget exhausted");
        }

        phi = (5. * i as f64 + t).to_radians();
        if y < 0. {
            phi = -phi;
        }
        lam /= X[i].v(t);
        Some((normalize_symmetric(lam + self.lon_0), phi))
    }
}

// ----- T E S T S ---------------------------------------------------------------------
