mod cartesians;

use crate::Error;

/// Representation of a biaxial reference ellipsoid.
///
/// Immutable once constructed. The many datums sharing a reference
/// ellipsoid simply hold copies: the type is two f64s and `Copy`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    a: f64,
    f: f64,
}

/// GRS80 is the default ellipsoid.
impl Default for Ellipsoid {
    fn default() -> Ellipsoid {
        Ellipsoid {
            a: 6_378_137.0,
            f: 1. / 298.257_222_100_882_7,
        }
    }
}

impl Ellipsoid {
    /// User defined ellipsoid, from semimajor axis and flattening.
    /// A flattening of 0 gives a sphere.
    pub fn new(semimajor_axis: f64, flattening: f64) -> Result<Ellipsoid, Error> {
        if !(semimajor_axis > 0.) {
            return Err(Error::InvalidParameter(
                "semimajor axis",
                format!("{semimajor_axis}"),
            ));
        }
        // The flattening bound keeps the squared eccentricity inside [0, 1)
        if !(0. ..1.).contains(&flattening) {
            return Err(Error::InvalidParameter("flattening", format!("{flattening}")));
        }
        Ok(Ellipsoid {
            a: semimajor_axis,
            f: flattening,
        })
    }

    /// User defined ellipsoid, from semimajor axis and squared eccentricity.
    pub fn from_eccentricity_squared(
        semimajor_axis: f64,
        eccentricity_squared: f64,
    ) -> Result<Ellipsoid, Error> {
        if !(0. ..1.).contains(&eccentricity_squared) {
            return Err(Error::InvalidParameter(
                "eccentricity squared",
                format!("{eccentricity_squared}"),
            ));
        }
        Ellipsoid::new(semimajor_axis, 1. - (1. - eccentricity_squared).sqrt())
    }

    /// The WGS84 ellipsoid, the pivot of all datum shifts.
    pub(crate) fn wgs84() -> Ellipsoid {
        Ellipsoid {
            a: 6_378_137.0,
            f: 1. / 298.257_223_563,
        }
    }

    /// Predefined ellipsoid, by conventional short name.
    pub fn named(name: &str) -> Result<Ellipsoid, Error> {
        #[rustfmt::skip]
        let (a, rf) = match name {
            "GRS80"   => (6_378_137.0,   298.257_222_100_882_7),
            "WGS84"   => (6_378_137.0,   298.257_223_563),
            "WGS72"   => (6_378_135.0,   298.26),
            "intl"    => (6_378_388.0,   297.0),
            "Helmert" => (6_378_200.0,   298.3),
            "clrk66"  => (6_378_206.4,   294.978_698_2),
            "clrk80"  => (6_378_249.145, 293.465),
            "bessel"  => (6_377_397.155, 299.152_812_8),
            "airy"    => (6_377_563.396, 299.324_964_6),
            "krass"   => (6_378_245.0,   298.3),
            "sphere"  => return Ellipsoid::new(6_370_997.0, 0.),
            _ => return Err(Error::NotFound(String::from(name), String::default())),
        };
        Ellipsoid::new(a, 1. / rf)
    }

    // ----- Eccentricities --------------------------------------------------------

    /// The squared eccentricity *e² = (a² - b²) / a²*.
    #[must_use]
    pub fn eccentricity_squared(&self) -> f64 {
        self.f * (2_f64 - self.f)
    }

    /// The eccentricity *e*
    #[must_use]
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_squared().sqrt()
    }

    /// The squared second eccentricity *e'² = (a² - b²) / b² = e² / (1 - e²)*
    #[must_use]
    pub fn second_eccentricity_squared(&self) -> f64 {
        let es = self.eccentricity_squared();
        es / (1.0 - es)
    }

    // ----- Axes ------------------------------------------------------------------

    /// The semimajor axis, *a*
    #[must_use]
    pub fn semimajor_axis(&self) -> f64 {
        self.a
    }

    /// The semiminor axis, *b*
    #[must_use]
    pub fn semiminor_axis(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    // ----- Flattenings -----------------------------------------------------------

    /// The flattening, *f = (a - b)/a*
    #[must_use]
    pub fn flattening(&self) -> f64 {
        self.f
    }

    /// The third flattening, *n = (a - b) / (a + b) = f / (2 - f)*
    #[must_use]
    pub fn third_flattening(&self) -> f64 {
        self.f / (2.0 - self.f)
    }

    // ----- Curvatures ------------------------------------------------------------

    /// The radius of curvature in the prime vertical, *N*
    #[must_use]
    pub fn prime_vertical_radius_of_curvature(&self, latitude: f64) -> f64 {
        if self.f == 0.0 {
            return self.a;
        }
        self.a / (1.0 - latitude.sin().powi(2) * self.eccentricity_squared()).sqrt()
    }

    /// The meridian radius of curvature, *M*
    #[must_use]
    pub fn meridian_radius_of_curvature(&self, latitude: f64) -> f64 {
        if self.f == 0.0 {
            return self.a;
        }
        let num = self.a * (1.0 - self.eccentricity_squared());
        let denom = (1.0 - latitude.sin().powi(2) * self.eccentricity_squared()).powf(1.5);
        num / denom
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_and_size() -> Result<(), Error> {
        let ellps = Ellipsoid::named("GRS80")?;
        assert_eq!(ellps.semimajor_axis(), 6378137.0);
        assert_eq!(ellps.flattening(), 1. / 298.25722_21008_827);

        assert!((ellps.eccentricity() - 0.081819191).abs() < 1.0e-10);
        assert!((ellps.eccentricity_squared() - 0.00669_43800_22903_41574).abs() < 1.0e-10);
        assert!((ellps.semiminor_axis() - 6_356_752.31414_0347).abs() < 1e-9);

        // Reconstruction via the squared eccentricity
        let same = Ellipsoid::from_eccentricity_squared(ellps.a, ellps.eccentricity_squared())?;
        assert!((same.flattening() - ellps.flattening()).abs() < 1e-15);

        // A sphere has no eccentricity
        let sphere = Ellipsoid::named("sphere")?;
        assert_eq!(sphere.eccentricity_squared(), 0.);
        assert_eq!(sphere.semiminor_axis(), sphere.semimajor_axis());
        Ok(())
    }

    #[test]
    fn validation() {
        assert!(matches!(
            Ellipsoid::new(-1., 0.5),
            Err(Error::InvalidParameter("semimajor axis", _))
        ));
        assert!(matches!(
            Ellipsoid::new(6378137., 1.5),
            Err(Error::InvalidParameter("flattening", _))
        ));
        assert!(matches!(
            Ellipsoid::from_eccentricity_squared(6378137., 1.0),
            Err(Error::InvalidParameter("eccentricity squared", _))
        ));
        assert!(matches!(
            Ellipsoid::named("pancake"),
            Err(Error::NotFound(_, _))
        ));
    }

    #[test]
    fn curvatures() -> Result<(), Error> {
        let ellps = Ellipsoid::named("GRS80")?;
        // The curvatures at the North Pole
        assert!(
            (ellps.meridian_radius_of_curvature(90_f64.to_radians()) - 6_399_593.6259).abs() < 1e-4
        );
        assert!(
            (ellps.prime_vertical_radius_of_curvature(90_f64.to_radians()) - 6_399_593.6259).abs()
                < 1e-4
        );

        // The curvatures at the Equator
        assert!((ellps.meridian_radius_of_curvature(0.0) - 6_335_439.3271).abs() < 1.0e-4);
        assert!(
            (ellps.prime_vertical_radius_of_curvature(0.0) - ellps.semimajor_axis()).abs() < 1.0e-4
        );
        Ok(())
    }
}
