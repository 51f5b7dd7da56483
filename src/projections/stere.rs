//! Stereographic projections: the polar aspect, and the oblique
//! (double/conformal-sphere) aspect of EPSG method 9809, used a.o. by the
//! Dutch RD system.
//!
//! Domain policy: polar aspect rejects the antipodal pole; the oblique
//! aspect rejects the antipode of the projection origin.

use super::Parameters;
use crate::math::{msfn, normalize_symmetric, phi2, ts, MAX_ITERATIONS};
use crate::{Ellipsoid, Error};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

const EPS10: f64 = 1e-10;

// ----- P O L A R ---------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
pub struct PolarStere {
    e: f64,
    south: bool,
    // Precomputed rho/ts ratio: a k_0 m(lat_ts) / ts(lat_ts), or its
    // pole-limit form when the scale is given at the pole itself
    akm1: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl PolarStere {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<PolarStere, Error> {
        if (params.lat_0.abs() - 90.).abs() > 1e-9 {
            return Err(Error::InvalidParameter(
                "lat_0",
                format!("polar aspect needs lat_0 = ±90°, got {}", params.lat_0),
            ));
        }
        let south = params.lat_0 < 0.;
        let a = ellps.semimajor_axis();
        let e = ellps.eccentricity();
        let es = ellps.eccentricity_squared();

        // A latitude of true scale away from the pole trumps k_0
        let lat_ts = params.lat_ts.abs();
        let akm1 = if lat_ts == 0. || (lat_ts - 90.).abs() < 1e-9 {
            2. * a * params.k_0 / ((1. + e).powf(1. + e) * (1. - e).powf(1. - e)).sqrt()
        } else {
            if lat_ts > 90. {
                return Err(Error::InvalidParameter("lat_ts", format!("{}", params.lat_ts)));
            }
            let sc = lat_ts.to_radians().sin_cos();
            a * msfn(sc, es) / ts(sc, e)
        };

        Ok(PolarStere {
            e,
            south,
            akm1,
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = normalize_symmetric(lon - self.lon_0);
        let phi = if self.south { -lat } else { lat };

        // The antipodal pole is infinitely far away
        if phi < -FRAC_PI_2 + EPS10 {
            return None;
        }

        let rho = self.akm1 * ts(phi.sin_cos(), self.e);
        let (sin_lam, cos_lam) = lam.sin_cos();
        let x = rho * sin_lam + self.x_0;
        let y = if self.south {
            rho * cos_lam + self.y_0
        } else {
            -rho * cos_lam + self.y_0
        };
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = x - self.x_0;
        let y = y - self.y_0;
        let rho = x.hypot(y);

        if rho == 0. {
            return Some((self.lon_0, FRAC_PI_2.copysign(if self.south { -1. } else { 1. })));
        }

        let phi = phi2(rho / self.akm1, self.e);
        if phi.is_nan() {
            return None;
        }
        if self.south {
            Some((normalize_symmetric(self.lon_0 + x.atan2(y)), -phi))
        } else {
            Some((normalize_symmetric(self.lon_0 + x.atan2(-y)), phi))
        }
    }
}

// ----- O B L I Q U E -----------------------------------------------------------------

/// The double stereographic: conformal mapping onto a sphere, followed by
/// the spherical stereographic projection (EPSG method 9809).
#[derive(Clone, Copy, Debug)]
pub struct ObliqueStere {
    e: f64,
    es: f64,
    // Conformal sphere constants
    n: f64,
    c: f64,
    chi0: f64,
    // 2 R k_0
    rk2: f64,
    // Inverse helpers: g and h of the EPSG guidance note
    g: f64,
    h: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl ObliqueStere {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<ObliqueStere, Error> {
        if params.lat_0.abs() > 90. {
            return Err(Error::InvalidParameter("lat_0", format!("{}", params.lat_0)));
        }
        let phi0 = params.lat_0.to_radians();
        let a = ellps.semimajor_axis();
        let e = ellps.eccentricity();
        let es = ellps.eccentricity_squared();

        let (s0, c0) = phi0.sin_cos();
        let radius = a * (1. - es).sqrt() / (1. - es * s0 * s0);
        let n = (1. + es * c0.powi(4) / (1. - es)).sqrt();

        let s1 = (1. + s0) / (1. - s0);
        let s2 = (1. - e * s0) / (1. + e * s0);
        let w1 = (s1 * s2.powf(e)).powf(n);
        let sin_chi00 = (w1 - 1.) / (w1 + 1.);
        let c = (n + s0) * (1. - sin_chi00) / ((n - s0) * (1. + sin_chi00));
        let w2 = c * w1;
        let chi0 = ((w2 - 1.) / (w2 + 1.)).asin();

        let rk2 = 2. * radius * params.k_0;
        let g = rk2 * (FRAC_PI_4 - chi0 / 2.).tan();
        let h = 2. * rk2 * chi0.tan() + g;

        Ok(ObliqueStere {
            e,
            es,
            n,
            c,
            chi0,
            rk2,
            g,
            h,
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let dlam = self.n * normalize_symmetric(lon - self.lon_0);

        // Conformal latitude on the sphere
        let s = lat.sin();
        let w = self.c * ((1. + s) / (1. - s) * ((1. - self.e * s) / (1. + self.e * s)).powf(self.e)).powf(self.n);
        let chi = if w.is_infinite() {
            FRAC_PI_2
        } else if w == 0. {
            -FRAC_PI_2
        } else {
            ((w - 1.) / (w + 1.)).asin()
        };

        let (sin_chi, cos_chi) = chi.sin_cos();
        let (sin_chi0, cos_chi0) = self.chi0.sin_cos();
        let (sin_dlam, cos_dlam) = dlam.sin_cos();

        let b = 1. + sin_chi * sin_chi0 + cos_chi * cos_chi0 * cos_dlam;
        // The antipode of the origin
        if b < EPS10 {
            return None;
        }

        let x = self.rk2 * cos_chi * sin_dlam / b + self.x_0;
        let y = self.rk2 * (sin_chi * cos_chi0 - cos_chi * sin_chi0 * cos_dlam) / b + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = x - self.x_0;
        let y = y - self.y_0;

        let i = x.atan2(self.h + y);
        let j = x.atan2(self.g - y) - i;
        let chi = self.chi0 + 2. * ((y - x * (j / 2.).tan()) / self.rk2).atan();
        let dlam = j + 2. * i;

        let lon = normalize_symmetric(dlam / self.n + self.lon_0);

        // Conformal sphere -> ellipsoid: fixed point iteration on the
        // isometric latitude
        let sin_chi = chi.sin();
        let psi = 0.5 * ((1. + sin_chi) / (self.c * (1. - sin_chi))).ln() / self.n;
        let mut phi = 2. * psi.exp().atan() - FRAC_PI_2;
        for i in 0..MAX_ITERATIONS {
            let s = phi.sin();
            let psi_i = ((phi / 2. + FRAC_PI_4).tan()
                * ((1. - self.e * s) / (1. + self.e * s)).powf(self.e / 2.))
            .ln();
            let delta = (psi_i - psi) * phi.cos() * (1. - self.es * s * s) / (1. - self.es);
            phi -= delta;
            if delta.abs() < 1e-12 {
                break;
            }
            if i == MAX_ITERATIONS - 1 {
                log::warn!("oblique stereographic: iteration budget exhausted");
            }
        }
        Some((lon, phi))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn polar() -> Result<(), Error> {
        // EPSG Guidance Note 7-2, Polar Stereographic variant A example:
        // WGS84, k_0=0.994, FE=FN=2000000, north aspect
        let params = Parameters {
            lat_0: 90.,
            k_0: 0.994,
            x_0: 2_000_000.,
            y_0: 2_000_000.,
            ..Default::default()
        };
        let proj = PolarStere::new(&Ellipsoid::named("WGS84")?, &params)?;

        let (x, y) = proj.fwd(44_f64.to_radians(), 73_f64.to_radians()).unwrap();
        assert_float_eq!(x, 3_320_416.75, abs <= 0.05);
        assert_float_eq!(y, 632_668.43, abs <= 0.05);

        let (lon, lat) = proj.inv(x, y).unwrap();
        assert_float_eq!(lon.to_degrees(), 44., abs <= 1e-9);
        assert_float_eq!(lat.to_degrees(), 73., abs <= 1e-9);

        // The pole is the origin of the unshifted plane
        let (x, y) = proj.fwd(0., FRAC_PI_2).unwrap();
        assert_float_eq!(x, 2_000_000., abs <= 1e-6);
        assert_float_eq!(y, 2_000_000., abs <= 1e-6);

        // The antipodal pole has no image
        assert!(proj.fwd(0., -FRAC_PI_2).is_none());
        Ok(())
    }

    #[test]
    fn polar_south_with_lat_ts() -> Result<(), Error> {
        let params = Parameters {
            lat_0: -90.,
            lat_ts: -71.,
            ..Default::default()
        };
        let proj = PolarStere::new(&Ellipsoid::named("WGS84")?, &params)?;

        // At the latitude of true scale, an eastward step is true to scale
        let phi = (-71_f64).to_radians();
        let dlam = 1e-6;
        let (x1, y1) = proj.fwd(0., phi).unwrap();
        let (x2, y2) = proj.fwd(dlam, phi).unwrap();
        let ellps = Ellipsoid::named("WGS84")?;
        let true_arc = dlam * phi.cos() * ellps.prime_vertical_radius_of_curvature(phi);
        assert!(((x2 - x1).hypot(y2 - y1) / true_arc - 1.).abs() < 1e-6);

        // Roundtrip
        let (lon, lat) = proj.inv(x1, y1).unwrap();
        assert_float_eq!(lon.to_degrees(), 0., abs <= 1e-9);
        assert_float_eq!(lat.to_degrees(), -71., abs <= 1e-9);
        Ok(())
    }

    #[test]
    fn oblique() -> Result<(), Error> {
        // The RD New parameter set (EPSG:28992)
        let params = Parameters {
            lat_0: 52.15616055555555,
            lon_0: 5.38763888888889,
            k_0: 0.9999079,
            x_0: 155_000.,
            y_0: 463_000.,
            ..Default::default()
        };
        let proj = ObliqueStere::new(&Ellipsoid::named("bessel")?, &params)?;

        // The origin maps to the false origin, exactly
        let (x, y) = proj
            .fwd(params.lon_0.to_radians(), params.lat_0.to_radians())
            .unwrap();
        assert_float_eq!(x, 155_000., abs <= 1e-6);
        assert_float_eq!(y, 463_000., abs <= 1e-6);

        // EPSG Guidance Note 7-2 example for method 9809
        let (x, y) = proj.fwd(6_f64.to_radians(), 53_f64.to_radians()).unwrap();
        assert_float_eq!(x, 196_105.283, abs <= 0.05);
        assert_float_eq!(y, 557_057.739, abs <= 0.05);

        // Roundtrips, across the gamut of the projection
        for (lon, lat) in [(6., 53.), (3.95, 51.25), (6.88, 53.04), (5.39, 52.16)] {
            let (x, y) = proj.fwd((lon as f64).to_radians(), (lat as f64).to_radians()).unwrap();
            let (lon2, lat2) = proj.inv(x, y).unwrap();
            assert_float_eq!(lon2.to_degrees(), lon, abs <= 1e-10);
            assert_float_eq!(lat2.to_degrees(), lat, abs <= 1e-10);
        }
        Ok(())
    }
}
