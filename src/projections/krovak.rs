//! Krovak's oblique conformal conic (EPSG method 9819), the projection of
//! the Czechoslovak S-JTSK system: a conformal (Gaussian) sphere, rotated
//! so the cone's axis passes through a point near Prague, then a conic
//! projection on a pseudo standard parallel.
//!
//! Axes follow the east-north GIS convention (EPSG:5514): coordinates in
//! the Czech and Slovak republics come out negative.
//!
//! Domain policy: the neighbourhood of the rotated pole's antipode is
//! rejected.

use super::Parameters;
use crate::math::{aasin, normalize_symmetric, MAX_ITERATIONS};
use crate::{Ellipsoid, Error};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

// Latitude of the pseudo standard parallel, 78°30' on the Gaussian sphere,
// and the u coordinate of the cone's axis point
const S0: f64 = 1.370_083_462_815_55;
const UQ: f64 = 1.042_168_563_804_74;

#[derive(Clone, Copy, Debug)]
pub struct Krovak {
    a: f64,
    e: f64,
    alpha: f64,
    // Constant of the conformal sphere mapping
    k1: f64,
    n: f64,
    ro0: f64,
    // Angular distance from the rotated pole to the cone's axis point
    ad: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Krovak {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Krovak, Error> {
        // The unset defaults are the canonical S-JTSK values: origin at
        // 49°30'N, 42°30' east of Ferro, scale 0.9999 at the pseudo
        // standard parallel
        let lat_0 = if params.lat_0 == 0. { 49.5 } else { params.lat_0 };
        let lon_0 = if params.lon_0 == 0. {
            24.833_333_333_333_332
        } else {
            params.lon_0
        };
        let k_0 = if params.k_0 == 1. { 0.9999 } else { params.k_0 };

        if lat_0.abs() >= 90. {
            return Err(Error::InvalidParameter("lat_0", format!("{lat_0}")));
        }

        let phi0 = lat_0.to_radians();
        let e = ellps.eccentricity();
        let es = ellps.eccentricity_squared();
        let (s0, c0) = phi0.sin_cos();

        let alpha = (1. + es * c0.powi(4) / (1. - es)).sqrt();
        let u0 = aasin(s0 / alpha);
        let g = ((1. + e * s0) / (1. - e * s0)).powf(alpha * e / 2.);
        let k1 = (u0 / 2. + FRAC_PI_4).tan() / (phi0 / 2. + FRAC_PI_4).tan().powf(alpha) * g;
        let n0 = (1. - es).sqrt() / (1. - es * s0 * s0);
        let n = S0.sin();
        let ro0 = k_0 * n0 / S0.tan();

        Ok(Krovak {
            a: ellps.semimajor_axis(),
            e,
            alpha,
            k1,
            n,
            ro0,
            ad: FRAC_PI_2 - UQ,
            lon_0: lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = normalize_symmetric(lon - self.lon_0);

        // Geographic -> conformal sphere
        let gfi = ((1. + self.e * lat.sin()) / (1. - self.e * lat.sin()))
            .powf(self.alpha * self.e / 2.);
        let u = 2. * ((self.k1 * (lat / 2. + FRAC_PI_4).tan().powf(self.alpha) / gfi).atan()
            - FRAC_PI_4);
        let deltav = -lam * self.alpha;

        // Rotate so the cone's axis becomes the pole
        let (sin_ad, cos_ad) = self.ad.sin_cos();
        let (sin_u, cos_u) = u.sin_cos();
        let s = aasin(cos_ad * sin_u + sin_ad * cos_u * deltav.cos());
        let cos_s = s.cos();
        if cos_s < 1e-12 {
            return None;
        }
        let d = aasin(cos_u * deltav.sin() / cos_s);

        // Conic on the pseudo standard parallel
        let eps = self.n * d;
        let ro = self.ro0 * (S0 / 2. + FRAC_PI_4).tan().powf(self.n)
            / (s / 2. + FRAC_PI_4).tan().powf(self.n);

        let x = -self.a * ro * eps.sin() + self.x_0;
        let y = -self.a * ro * eps.cos() + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        // Swap back into the conic's southing/westing frame
        let px = -(y - self.y_0) / self.a;
        let py = -(x - self.x_0) / self.a;

        let ro = px.hypot(py);
        let eps = py.atan2(px);
        let d = eps / S0.sin();

        let s = if ro == 0. {
            FRAC_PI_2
        } else {
            2. * (((self.ro0 / ro).powf(1. / self.n) * (S0 / 2. + FRAC_PI_4).tan()).atan()
                - FRAC_PI_4)
        };

        // Unrotate
        let (sin_ad, cos_ad) = self.ad.sin_cos();
        let (sin_s, cos_s) = s.sin_cos();
        let u = aasin(cos_ad * sin_s - sin_ad * cos_s * d.cos());
        let cos_u = u.cos();
        if cos_u.abs() < 1e-12 {
            return None;
        }
        let deltav = aasin(cos_s * d.sin() / cos_u);
        let lon = self.lon_0 - deltav / self.alpha;

        // Conformal sphere -> geographic, by fixed point iteration
        let mut fi1 = u;
        let mut phi = u;
        for i in 0..MAX_ITERATIONS {
            let gfi = ((1. + self.e * fi1.sin()) / (1. - self.e * fi1.sin())).powf(self.e / 2.);
            phi = 2.
                * ((self.k1.powf(-1. / self.alpha)
                    * (u / 2. + FRAC_PI_4).tan().powf(1. / self.alpha)
                    * gfi)
                    .atan()
                    - FRAC_PI_4);
            if (fi1 - phi).abs() < 1e-12 {
                break;
            }
            fi1 = phi;
            if i == MAX_ITERATIONS - 1 {
                log::warn!("krovak: iteration budget exhausted");
            }
        }

        Some((normalize_symmetric(lon), phi))
    }
}

// ----- T E S T S ---------------------------------------------------------------------
