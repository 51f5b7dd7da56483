//! The American Polyconic: every parallel is the arc of a circle with its
//! true radius, touching the central meridian at true scale.
//!
//! Domain policy: the forward mapping is total; the inverse rejects
//! positions whose latitude iteration wanders onto a pole.

use super::Parameters;
use crate::math::{enfn, mlfn, msfn, normalize_symmetric, MAX_ITERATIONS};
use crate::{Ellipsoid, Error};

const TOL: f64 = 1e-10;
const ITOL: f64 = 1e-12;

#[derive(Clone, Copy, Debug)]
pub struct Polyconic {
    a: f64,
    es: f64,
    en: [f64; 5],
    // Meridional arc of the latitude of origin, in units of a
    ml0: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Polyconic {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Polyconic, Error> {
        let es = ellps.eccentricity_squared();
        let en = enfn(es);
        let phi0 = params.lat_0.to_radians();
        Ok(Polyconic {
            a: ellps.semimajor_axis(),
            es,
            en,
            ml0: mlfn(phi0, phi0.sin(), phi0.cos(), &en),
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = normalize_symmetric(lon - self.lon_0);

        // The equator is its own degenerate parallel circle
        if lat.abs() <= TOL {
            return Some((self.a * lam + self.x_0, -self.a * self.ml0 + self.y_0));
        }

        let (sp, cp) = lat.sin_cos();
        // Radius of the parallel's arc, in units of a
        let ms = if cp.abs() > TOL {
            msfn((sp, cp), self.es) / sp
        } else {
            0.
        };
        let e = lam * sp;
        let x = self.a * ms * e.sin() + self.x_0;
        let y = self.a * (mlfn(lat, sp, cp, &self.en) - self.ml0 + ms * (1. - e.cos())) + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = (x - self.x_0) / self.a;
        let y = (y - self.y_0) / self.a + self.ml0;

        if y.abs() <= TOL {
            return Some((normalize_symmetric(x + self.lon_0), 0.));
        }

        // Newton iteration on the latitude, as in the classic USGS/PROJ
        // formulation
        let r = y * y + x * x;
        let mut phi = y;
        let mut converged = false;
        for _ in 0..MAX_ITERATIONS {
            let (sp, cp) = phi.sin_cos();
            if cp.abs() < ITOL {
                return None;
            }
            let s2ph = sp * cp;
            let mut mlp = (1. - self.es * sp * sp).sqrt();
            let c = sp * mlp / cp;
            let ml = mlfn(phi, sp, cp, &self.en);
            let mlb = ml * ml + r;
            mlp = (1. - self.es) / (mlp * mlp * mlp);
            let dphi = (ml + ml + c * mlb - 2. * y * (c * ml + 1.))
                / (self.es * s2ph * (mlb - 2. * y * ml) / c
                    + 2. * (y - ml) * (c * mlp - 1. / s2ph)
                    - mlp
                    - mlp);
            phi += dphi;
            if dphi.abs() <= ITOL {
                converged = true;
                break;
            }
        }
        if !converged {
            log::warn!("polyconic: iteration budget exhausted");
        }

        let s = phi.sin();
        let arg = x * phi.tan() * (1. - self.es * s * s).sqrt();
        if arg.abs() > 1. + TOL {
            return None;
        }
        let lam = crate::math::aasin(arg) / s;
        Some((normalize_symmetric(lam + self.lon_0), phi))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn polyconic() -> Result<(), Error> {
        let proj = Polyconic::new(&Ellipsoid::default(), &Parameters::default())?;

        // On the equator the projection degenerates to x = a·λ
        let (x, y) = proj.fwd(10_f64.to_radians(), 0.).unwrap();
        assert_float_eq!(x, 1_113_194.907_932_735_7, abs <= 1e-6);
        assert_float_eq!(y, 0., abs <= 1e-9);

        // On the central meridian it degenerates to the meridional arc
        let en = enfn(Ellipsoid::default().eccentricity_squared());
        let phi = 55_f64.to_radians();
        let (x, y) = proj.fwd(0., phi).unwrap();
        assert_float_eq!(x, 0., abs <= 1e-9);
        assert_float_eq!(y, 6_378_137. * mlfn(phi, phi.sin(), phi.cos(), &en), abs <= 1e-6);
        Ok(())
    }

    #[test]
    fn polyconic_roundtrip() -> Result<(), Error> {
        let proj = Polyconic::new(&Ellipsoid::default(), &Parameters::default())?;

        // The Newton inversion is reliable over the customary gamut, though
        // not at extreme longitudes
        for (lon, lat) in [(0., 0.), (12., 55.), (-96., 39.), (60., -33.), (-70., -50.), (10., 80.)]
        {
            let (x, y) = proj.fwd((lon as f64).to_radians(), (lat as f64).to_radians()).unwrap();
            let (lon2, lat2) = proj.inv(x, y).unwrap();
            assert_float_eq!(lon2.to_degrees(), lon, abs <= 1e-8);
            assert_float_eq!(lat2.to_degrees(), lat, abs <= 1e-8);
        }
        Ok(())
    }
}
