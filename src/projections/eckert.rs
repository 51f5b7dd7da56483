//! The six Eckert pseudocylindricals, pairwise rectilinear/sinusoidal/
//! elliptical with equally spaced (I, III, V) or equal-area (II, IV, VI)
//! parallels. All spherical, on a sphere with the radius of the semimajor
//! axis; all share the pole line at half the equator's length.
//!
//! Domain policy: total in the forward direction; inverse positions beyond
//! the map frame are rejected.

use super::{Method, Parameters};
use crate::math::{aasin, normalize_symmetric, MAX_ITERATIONS};
use crate::{Ellipsoid, Error};
use std::f64::consts::{FRAC_PI_2, PI};

const EPS10: f64 = 1e-10;
const ONEEPS: f64 = 1.0000001;

// Eckert I:   x, y = √(8/3π) (λ(1 - |φ|/π), φ)
const FC1: f64 = 0.921_317_731_923_561_278_02;
const RP: f64 = 0.318_309_886_183_790_671_54;

// Eckert II:  x = 2λ √((4 - 3 sin|φ|)/6π)
const FXC2: f64 = 0.460_658_865_961_780_639_02;
const FYC2: f64 = 1.447_202_509_116_535_318_71;

// Eckert III: x = C λ (1 + √(1 - 4φ²/π²)),  y = 2 C φ
const CX3: f64 = 0.422_238_200_315_771_201_49;
const CY3: f64 = 0.844_476_400_631_542_402_98;
const B3: f64 = 0.405_284_734_569_351_085_775;

// Eckert IV:  θ + sin θ cos θ + 2 sin θ = (2 + π/2) sin φ
const CX4: f64 = 0.422_238_200_315_771_201_49;
const CY4: f64 = 1.326_500_428_177_002_322_18;
const CP4: f64 = 3.570_796_326_794_896_619_22;

// Eckert V:   x, y = (λ (1 + cos φ), 2φ) / √(2 + π)
const XF5: f64 = 0.441_012_771_724_551_482_19;
const YF5: f64 = 0.882_025_543_449_102_964_38;

// Eckert VI:  θ + sin θ = (1 + π/2) sin φ
const C6: f64 = 0.441_012_771_724_551_482_19;
const CP6: f64 = 2.570_796_326_794_896_619_23;

#[derive(Clone, Copy, Debug)]
pub struct Eckert {
    method: Method,
    a: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Eckert {
    pub fn new(method: Method, ellps: &Ellipsoid, params: &Parameters) -> Result<Eckert, Error> {
        Ok(Eckert {
            method,
            a: ellps.semimajor_axis(),
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = normalize_symmetric(lon - self.lon_0);
        let (x, y) = match self.method {
            Method::EckertI => (FC1 * lam * (1. - RP * lat.abs()), FC1 * lat),
            Method::EckertII => {
                let root = (4. - 3. * lat.abs().sin()).sqrt();
                let y = FYC2 * (2. - root);
                (FXC2 * lam * root, y.copysign(lat))
            }
            Method::EckertIII => (
                CX3 * lam * (1. + (1. - B3 * lat * lat).max(0.).sqrt()),
                CY3 * lat,
            ),
            Method::EckertIV => {
                let theta = theta_eck4(lat);
                (CX4 * lam * (1. + theta.cos()), CY4 * theta.sin())
            }
            Method::EckertV => (XF5 * lam * (1. + lat.cos()), YF5 * lat),
            Method::EckertVI => {
                let theta = theta_eck6(lat);
                (C6 * lam * (1. + theta.cos()), 2. * C6 * theta)
            }
            _ => unreachable!("not an Eckert method"),
        };
        Some((self.a * x + self.x_0, self.a * y + self.y_0))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = (x - self.x_0) / self.a;
        let y = (y - self.y_0) / self.a;

        let (lam, phi) = match self.method {
            Method::EckertI => {
                let phi = y / FC1;
                if phi.abs() > FRAC_PI_2 + EPS10 {
                    return None;
                }
                (x / (FC1 * (1. - RP * phi.abs())), phi)
            }
            Method::EckertII => {
                let root = 2. - y.abs() / FYC2;
                let lam = x / (FXC2 * root);
                let s = (4. - root * root) / 3.;
                if s.abs() >= 1. {
                    if s.abs() > ONEEPS {
                        return None;
                    }
                    (lam, FRAC_PI_2.copysign(y))
                } else {
                    (lam, s.asin().copysign(y))
                }
            }
            Method::EckertIII => {
                let phi = y / CY3;
                if phi.abs() > FRAC_PI_2 + EPS10 {
                    return None;
                }
                (x / (CX3 * (1. + (1. - B3 * phi * phi).max(0.).sqrt())), phi)
            }
            Method::EckertIV => {
                let s = y / CY4;
                if s.abs() > 1. + EPS10 {
                    return None;
                }
                let theta = aasin(s);
                let lam = x / (CX4 * (1. + theta.cos()));
                let phi = aasin((theta + theta.sin() * (theta.cos() + 2.)) / CP4);
                (lam, phi)
            }
            Method::EckertV => {
                let phi = y / YF5;
                if phi.abs() > FRAC_PI_2 + EPS10 {
                    return None;
                }
                (x / (XF5 * (1. + phi.cos())), phi)
            }
            Method::EckertVI => {
                let theta = y / (2. * C6);
                if theta.abs() > FRAC_PI_2 + EPS10 {
                    return None;
                }
                let lam = x / (C6 * (1. + theta.cos()));
                let phi = aasin((theta + theta.sin()) / CP6);
                (lam, phi)
            }
            _ => unreachable!("not an Eckert method"),
        };

        if lam.abs() > PI + EPS10 {
            return None;
        }
        Some((normalize_symmetric(lam + self.lon_0), phi))
    }
}

// Newton for the Eckert IV auxiliary angle, seeded with the cubic fit the
// PROJ implementation popularized
fn theta_eck4(phi: f64) -> f64 {
    let p = CP4 * phi.sin();
    let v2 = phi * phi;
    let mut theta = phi * (0.895168 + v2 * (0.0218849 + v2 * 0.00826809));
    for _ in 0..MAX_ITERATIONS {
        let (s, c) = theta.sin_cos();
        let v = (theta + s * (c + 2.) - p) / (1. + c * (c + 2.) - s * s);
        theta -= v;
        if v.abs() < EPS10 {
            return theta;
        }
    }
    // Stalls only against the poles
    FRAC_PI_2.copysign(phi)
}

// And for the Eckert VI auxiliary angle
fn theta_eck6(phi: f64) -> f64 {
    let p = CP6 * phi.sin();
    let mut theta = phi;
    for _ in 0..MAX_ITERATIONS {
        let v = (theta + theta.sin() - p) / (1. + theta.cos());
        theta -= v;
        if v.abs() < EPS10 {
            return theta;
        }
    }
    FRAC_PI_2.copysign(phi)
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::tests::{roundtrip, WORLDWIDE};
    use crate::projections::Projection;
    use float_eq::assert_float_eq;

    const ALL: [Method; 6] = [
        Method::EckertI,
        Method::EckertII,
        Method::EckertIII,
        Method::EckertIV,
        Method::EckertV,
        Method::EckertVI,
    ];

    #[test]
    fn eckert_roundtrips() -> Result<(), Error> {
        for method in ALL {
            let proj = Projection::new(method, &Ellipsoid::named("WGS84")?, &Parameters::default())?;
            roundtrip(&proj, &WORLDWIDE, 1e-8);
        }
        Ok(())
    }

    #[test]
    fn pole_lines() -> Result<(), Error> {
        // The family signature: every Eckert has a pole line half the
        // length of the equator
        for method in ALL {
            let proj = Eckert::new(method, &Ellipsoid::named("WGS84")?, &Parameters::default())?;
            let (equator, _) = proj.fwd(3_f64.to_radians(), 0.).unwrap();
            let (pole, _) = proj.fwd(3_f64.to_radians(), FRAC_PI_2).unwrap();
            assert_float_eq!(pole, equator / 2., abs <= 1e-3);
        }
        Ok(())
    }

    #[test]
    fn equal_area_pairs() -> Result<(), Error> {
        // II, IV and VI are equal-area: the quad between two graticule
        // lines keeps its area when shuffled along the parallel. Spot-check
        // IV against its closed form at the equator: dx·dy there must equal
        // the sphere's cos(0) patch scaled by the area factor 1
        let proj = Eckert::new(Method::EckertIV, &Ellipsoid::named("WGS84")?, &Parameters::default())?;
        let a = 6_378_137.;
        let d = 1e-6;

        let (x0, y0) = proj.fwd(0., 0.).unwrap();
        let (x1, _) = proj.fwd(d, 0.).unwrap();
        let (_, y1) = proj.fwd(0., d).unwrap();
        let patch = (x1 - x0) * (y1 - y0);
        assert_float_eq!(patch, a * a * d * d, rel <= 1e-5);
        Ok(())
    }
}
