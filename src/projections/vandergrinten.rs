//! Van der Grinten (I): the whole world in a circle, meridians and
//! parallels all circular arcs. Spherical, on a sphere with the radius of
//! the semimajor axis.
//!
//! Domain policy: total in the forward direction (latitudes a hair beyond
//! ±90° are clamped); inverse positions whose latitude cubic has no root
//! in range are rejected.

use super::Parameters;
use crate::math::normalize_symmetric;
use crate::{Ellipsoid, Error};
use std::f64::consts::{FRAC_PI_2, PI};

const TOL: f64 = 1e-10;
const THIRD: f64 = 1. / 3.;
const C2_27: f64 = 2. / 27.;
const PI4_3: f64 = 4. * PI / 3.;
const PISQ: f64 = PI * PI;
const TPISQ: f64 = 2. * PI * PI;
const HPISQ: f64 = PI * PI / 2.;

#[derive(Clone, Copy, Debug)]
pub struct Vandg {
    a: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Vandg {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Vandg, Error> {
        Ok(Vandg {
            a: ellps.semimajor_axis(),
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = normalize_symmetric(lon - self.lon_0);

        let mut p2 = (lat / FRAC_PI_2).abs();
        if p2 - TOL > 1. {
            return None;
        }
        p2 = p2.min(1.);

        let (x, y);
        if lat.abs() <= TOL {
            // The equator maps to the horizontal diameter at true scale
            x = lam;
            y = 0.;
        } else if lam.abs() <= TOL || (p2 - 1.).abs() < TOL {
            // The central meridian, and the poles
            x = 0.;
            y = (PI * (0.5 * p2.asin()).tan()).copysign(lat);
        } else {
            let al = 0.5 * (PI / lam - lam / PI).abs();
            let al2 = al * al;
            let mut g = (1. - p2 * p2).sqrt();
            g /= p2 + g - 1.;
            let g2 = g * g;
            p2 = g * (2. / p2 - 1.);
            p2 *= p2;

            let x1 = g - p2;
            let gg = p2 + al2;
            let mut xx = PI * (al * x1 + (al2 * x1 * x1 - gg * (g2 - p2)).sqrt()) / gg;
            if lam < 0. {
                xx = -xx;
            }

            let mut yy = (xx / PI).abs();
            yy = 1. - yy * (yy + 2. * al);
            if yy < -TOL {
                return None;
            }
            y = yy.max(0.).sqrt() * PI.copysign(lat);
            x = xx;
        }
        Some((self.a * x + self.x_0, self.a * y + self.y_0))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = (x - self.x_0) / self.a;
        let y = (y - self.y_0) / self.a;

        let x2 = x * x;
        let ay = y.abs();
        if ay < TOL {
            let t = x2 * x2 + TPISQ * (x2 + HPISQ);
            let lam = if x.abs() <= TOL {
                0.
            } else {
                0.5 * (x2 - PISQ + t.sqrt()) / x
            };
            return Some((normalize_symmetric(lam + self.lon_0), 0.));
        }

        // The latitude is a root of a cubic, solved trigonometrically
        let y2 = y * y;
        let r = x2 + y2;
        let r2 = r * r;
        let c1 = -PI * ay * (r + PISQ);
        let c3 = r2 + 2. * PI * (ay * r + PI * (y2 + PI * (ay + FRAC_PI_2)));
        let mut c2 = c1 + PISQ * (r - 3. * y2);
        let c0 = PI * ay;
        c2 /= c3;
        let al = c1 / c3 - THIRD * c2 * c2;
        let m = 2. * (-THIRD * al).sqrt();
        let mut d = C2_27 * c2 * c2 * c2 + (c0 * c0 - THIRD * c2 * c1) / c3;
        d = 3. * d / (al * m);
        let t = d.abs();
        if t - TOL > 1. {
            return None;
        }

        d = if t > 1. {
            if d > 0. {
                0.
            } else {
                PI
            }
        } else {
            d.acos()
        };
        let mut phi = PI * (m * (d * THIRD + PI4_3).cos() - THIRD * c2);
        if y < 0. {
            phi = -phi;
        }

        let t = r2 + TPISQ * (x2 - y2 + HPISQ);
        let lam = if x.abs() <= TOL {
            0.
        } else {
            0.5 * (r - PISQ + if t <= 0. { 0. } else { t.sqrt() }) / x
        };
        Some((normalize_symmetric(lam + self.lon_0), phi))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::tests::{roundtrip, WORLDWIDE};
    use crate::projections::{Method, Projection};
    use float_eq::assert_float_eq;

    #[test]
    fn vandergrinten() -> Result<(), Error> {
        let proj = Vandg::new(&Ellipsoid::named("WGS84")?, &Parameters::default())?;
        let a = 6_378_137.;

        // The equator is true to scale
        let (x, y) = proj.fwd(10_f64.to_radians(), 0.).unwrap();
        assert_float_eq!(x, 1_113_194.907_932_735_7, abs <= 1e-6);
        assert_float_eq!(y, 0., abs <= 1e-9);

        // The world circle has radius πa: the poles sit on it
        let (x, y) = proj.fwd(0., FRAC_PI_2).unwrap();
        assert_float_eq!(x, 0., abs <= 1e-9);
        assert_float_eq!(y, PI * a, abs <= 1e-3);

        // And the antimeridian closes it at the equator
        let (x, _) = proj.fwd(PI - 1e-12, 0.).unwrap();
        assert_float_eq!(x, PI * a, abs <= 1e-3);
        Ok(())
    }

    #[test]
    fn vandergrinten_roundtrip() -> Result<(), Error> {
        let proj = Projection::new(
            Method::VanDerGrinten,
            &Ellipsoid::named("WGS84")?,
            &Parameters::default(),
        )?;
        roundtrip(&proj, &WORLDWIDE, 1e-8);
        Ok(())
    }
}
