//! Gall's stereographic cylindrical: perspective from the antipode of
//! each meridian's intersection with the 45° parallel. Spherical, total
//! domain.

use super::Parameters;
use crate::{Ellipsoid, Error};

// x = λ/√2,  y = (1 + √2/2) tan(φ/2)
const XF: f64 = std::f64::consts::FRAC_1_SQRT_2;
const YF: f64 = 1.707_106_781_186_547_524_40;

#[derive(Clone, Copy, Debug)]
pub struct Gall {
    a: f64,
    lon_0: f64,
    x_0: f64,
    y_0: f64,
}

impl Gall {
    pub fn new(ellps: &Ellipsoid, params: &Parameters) -> Result<Gall, Error> {
        Ok(Gall {
            a: ellps.semimajor_axis(),
            lon_0: params.lon_0.to_radians(),
            x_0: params.x_0,
            y_0: params.y_0,
        })
    }

    pub fn fwd(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let x = self.a * XF * (lon - self.lon_0) + self.x_0;
        let y = self.a * YF * (0.5 * lat).tan() + self.y_0;
        Some((x, y))
    }

    pub fn inv(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let lon = (x - self.x_0) / (self.a * XF) + self.lon_0;
        let lat = 2. * ((y - self.y_0) / (self.a * YF)).atan();
        Some((lon, lat))
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::tests::{roundtrip, WORLDWIDE};
    use crate::projections::{Method, Projection};
    use float_eq::assert_float_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn gall() -> Result<(), Error> {
        let proj = Gall::new(&Ellipsoid::named("WGS84")?, &Parameters::default())?;
        let a = 6_378_137.;

        // True scale along the 45° parallels: an eastward degree there is
        // a/√2 per radian, which is exactly the x scale
        let (x, y) = proj.fwd(10_f64.to_radians(), 0.).unwrap();
        assert_float_eq!(x, a * 10_f64.to_radians() / 2_f64.sqrt(), abs <= 1e-6);
        assert_float_eq!(y, 0., abs <= 1e-9);

        // The poles are at (1 + √2/2) tan(45°) = 1.7071 a
        let (_, y) = proj.fwd(0., FRAC_PI_2).unwrap();
        assert_float_eq!(y, YF * a, abs <= 1e-3);
        Ok(())
    }

    #[test]
    fn gall_roundtrip() -> Result<(), Error> {
        let proj = Projection::new(
            Method::GallStereographic,
            &Ellipsoid::named("WGS84")?,
            &Parameters::default(),
        )?;
        roundtrip(&proj, &WORLDWIDE, 1e-10);
        Ok(())
    }
}
