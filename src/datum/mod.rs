//! Geodetic datums and the shifts between them.
//!
//! A [`Datum`] is a reference ellipsoid plus a description of how to shift
//! coordinates from the datum to WGS84. Shifting between two arbitrary
//! datums pivots through WGS84: apply the source shift forward, then the
//! destination shift inverted.

use crate::grid::{GridCollection, ShiftGrid};
use crate::{Direction, Ellipsoid, Error, Fwd};
use std::sync::Arc;

/// How a datum relates to WGS84. The parameter arity of each method is
/// enforced by the variant type.
#[derive(Clone, Debug, PartialEq)]
pub enum DatumShift {
    /// No shift: the datum is WGS84, or indistinguishable from it at the
    /// accuracy of the catalog.
    None,
    /// 3-parameter geocentric translation (meters), applied in cartesian
    /// space.
    Geocentric([f64; 3]),
    /// 7-parameter similarity transform: 3 translations (meters), 3
    /// position-vector rotations (seconds of arc), scale correction (ppm).
    Geocentric7([f64; 7]),
    /// 3 translations (meters), applied directly on geodetic coordinates by
    /// the standard (non-abridged) Molodensky formula. Avoids the cartesian
    /// round trip for datums where translation-grade accuracy suffices.
    Molodensky([f64; 3]),
    /// Correction looked up in a named shift grid, registered with the
    /// [`GridCollection`] before first use.
    Grid(String),
}

/// An ellipsoid anchored to the Earth: the reference surface of a set of
/// geodetic coordinates. Compared by value - two datums are the same when
/// their ellipsoid parameters and shift descriptions coincide.
#[derive(Clone, Debug, PartialEq)]
pub struct Datum {
    pub ellipsoid: Ellipsoid,
    pub shift: DatumShift,
}

impl Default for Datum {
    fn default() -> Datum {
        Datum {
            ellipsoid: Ellipsoid::wgs84(),
            shift: DatumShift::None,
        }
    }
}

impl Datum {
    pub fn new(ellipsoid: Ellipsoid, shift: DatumShift) -> Datum {
        Datum { ellipsoid, shift }
    }

    /// Predefined datum, by conventional short name.
    pub fn named(name: &str) -> Result<Datum, Error> {
        use DatumShift::*;
        let datum = match name {
            "WGS84" => Datum::default(),
            "ETRS89" | "NAD83" => Datum::new(Ellipsoid::named("GRS80")?, None),
            "ED50" => Datum::new(Ellipsoid::named("intl")?, Geocentric([-87., -96., -120.])),
            "Amersfoort" => Datum::new(
                Ellipsoid::named("bessel")?,
                Geocentric7([565.237, 50.0087, 465.658, -0.406857, 0.350733, -1.87035, 4.0812]),
            ),
            "OSGB36" => Datum::new(
                Ellipsoid::named("airy")?,
                Geocentric7([446.448, -125.157, 542.06, 0.15, 0.247, 0.842, -20.489]),
            ),
            "Pulkovo1942" => Datum::new(Ellipsoid::named("krass")?, Geocentric([28., -130., -95.])),
            "WGS72" => Datum::new(
                Ellipsoid::named("WGS72")?,
                Geocentric7([0., 0., 4.5, 0., 0., 0.554, 0.2263]),
            ),
            "NAD27" => Datum::new(Ellipsoid::named("clrk66")?, Grid("conus".to_string())),
            _ => return Err(Error::NotFound(String::from(name), String::default())),
        };
        Ok(datum)
    }

    /// Resolve the shift into its directly applicable form. For grid shifted
    /// datums this is where the grid is located and loaded - before any
    /// coordinate has been touched.
    pub(crate) fn prepare(&self, grids: &GridCollection) -> Result<PreparedShift, Error> {
        let inner = match &self.shift {
            DatumShift::None => Inner::Helmert {
                t: [0.; 3],
                r: [0.; 3],
                scale: 1.,
                rotated: false,
            },
            DatumShift::Geocentric(t) => Inner::Helmert {
                t: *t,
                r: [0.; 3],
                scale: 1.,
                rotated: false,
            },
            DatumShift::Geocentric7(p) => {
                const ARCSEC: f64 = std::f64::consts::PI / (180.0 * 3600.0);
                Inner::Helmert {
                    t: [p[0], p[1], p[2]],
                    r: [p[3] * ARCSEC, p[4] * ARCSEC, p[5] * ARCSEC],
                    scale: 1.0 + p[6] * 1e-6,
                    rotated: p[3] != 0. || p[4] != 0. || p[5] != 0.,
                }
            }
            DatumShift::Molodensky(t) => {
                let wgs84 = Ellipsoid::wgs84();
                Inner::Molodensky {
                    t: *t,
                    da: wgs84.semimajor_axis() - self.ellipsoid.semimajor_axis(),
                    df: wgs84.flattening() - self.ellipsoid.flattening(),
                }
            }
            DatumShift::Grid(name) => Inner::Grid(grids.get(name)?),
        };
        Ok(PreparedShift {
            ellipsoid: self.ellipsoid,
            inner,
        })
    }
}

// ----- S H I F T   A P P L I C A T I O N ---------------------------------------------

#[derive(Clone, Debug)]
enum Inner {
    Helmert {
        t: [f64; 3],
        r: [f64; 3],
        scale: f64,
        rotated: bool,
    },
    Molodensky {
        t: [f64; 3],
        da: f64,
        df: f64,
    },
    Grid(Arc<ShiftGrid>),
}

/// A datum shift with all external resources resolved, ready for per-point
/// application. `Fwd` shifts from the datum to WGS84, `Inv` the other way.
#[derive(Clone, Debug)]
pub(crate) struct PreparedShift {
    ellipsoid: Ellipsoid,
    inner: Inner,
}

impl PreparedShift {
    /// Shift one geodetic coordinate (radians, meters). Infallible: grid
    /// points outside the grid coverage pass through unshifted, which is the
    /// conventional behavior at the fringe of a gridded correction.
    pub(crate) fn apply(&self, direction: Direction, lon: f64, lat: f64, h: f64) -> (f64, f64, f64) {
        match &self.inner {
            Inner::Helmert {
                t,
                r,
                scale,
                rotated,
            } => self.helmert(direction, lon, lat, h, t, r, *scale, *rotated),
            Inner::Molodensky { t, da, df } => self.molodensky(direction, lon, lat, h, t, *da, *df),
            Inner::Grid(grid) => grid_shift(direction, lon, lat, h, grid),
        }
    }

    // Cartesian similarity transform, pivoting through geocentric space.
    // Rotations follow the position vector convention.
    #[allow(clippy::too_many_arguments)]
    fn helmert(
        &self,
        direction: Direction,
        lon: f64,
        lat: f64,
        h: f64,
        t: &[f64; 3],
        r: &[f64; 3],
        scale: f64,
        rotated: bool,
    ) -> (f64, f64, f64) {
        let wgs84 = Ellipsoid::wgs84();
        let (from, to) = match direction {
            Direction::Fwd => (self.ellipsoid, wgs84),
            Direction::Inv => (wgs84, self.ellipsoid),
        };

        let (x, y, z) = from.cartesian(lon, lat, h);

        let (x, y, z) = if direction == Fwd {
            let (x, y, z) = if rotated {
                (
                    x - r[2] * y + r[1] * z,
                    r[2] * x + y - r[0] * z,
                    -r[1] * x + r[0] * y + z,
                )
            } else {
                (x, y, z)
            };
            (scale * x + t[0], scale * y + t[1], scale * z + t[2])
        } else {
            // Deoffset and unscale, then rotate back by the transposed matrix
            let (u, v, w) = ((x - t[0]) / scale, (y - t[1]) / scale, (z - t[2]) / scale);
            if rotated {
                (
                    u + r[2] * v - r[1] * w,
                    -r[2] * u + v + r[0] * w,
                    r[1] * u - r[0] * v + w,
                )
            } else {
                (u, v, w)
            }
        };

        to.geodetic(x, y, z)
    }

    // The standard (non-abridged) Molodensky transformation, applied
    // directly in ellipsoidal space.
    #[allow(clippy::too_many_arguments)]
    fn molodensky(
        &self,
        direction: Direction,
        lon: f64,
        lat: f64,
        h: f64,
        t: &[f64; 3],
        da: f64,
        df: f64,
    ) -> (f64, f64, f64) {
        let ellps = self.ellipsoid;
        let a = ellps.semimajor_axis();
        let f = ellps.flattening();
        let es = ellps.eccentricity_squared();

        let (slam, clam) = lon.sin_cos();
        let (sphi, cphi) = lat.sin_cos();

        // We also need the radii of curvature
        let big_n = ellps.prime_vertical_radius_of_curvature(lat);
        let big_m = ellps.meridian_radius_of_curvature(lat);

        let fac = t[0] * clam + t[1] * slam;

        let mut dphi = (t[2] + big_n * es * sphi * da / a) * cphi - fac * sphi
            + (big_m / (1.0 - f) + big_n * (1.0 - f)) * df * sphi * cphi;
        dphi /= big_m + h;

        // At the poles the longitude offset is indeterminate - pass zero
        let dlam_denom = (big_n + h) * cphi;
        let dlam = if dlam_denom == 0.0 {
            0.0
        } else {
            (t[1] * clam - t[0] * slam) / dlam_denom
        };

        let dh =
            fac * cphi + t[2] * sphi - (a / big_n) * da + big_n * (1.0 - f) * df * sphi * sphi;

        if direction == Fwd {
            (lon + dlam, lat + dphi, h + dh)
        } else {
            (lon - dlam, lat - dphi, h - dh)
        }
    }
}

// Datum shift by grid interpolation. The forward direction is a plain
// lookup-and-add; the inverse has to iterate, since the grid is indexed by
// source coordinates.
fn grid_shift(direction: Direction, lon: f64, lat: f64, h: f64, grid: &ShiftGrid) -> (f64, f64, f64) {
    if direction == Fwd {
        let Some((dlon, dlat)) = grid.at(lon, lat) else {
            return (lon, lat, h);
        };
        return (lon + dlon, lat + dlat, h);
    }

    let Some((dlon, dlat)) = grid.at(lon, lat) else {
        return (lon, lat, h);
    };
    let (mut tlon, mut tlat) = (lon - dlon, lat - dlat);
    for _ in 0..10 {
        let Some((dlon, dlat)) = grid.at(tlon, tlat) else {
            break;
        };
        let (elon, elat) = (tlon + dlon - lon, tlat + dlat - lat);
        tlon -= elon;
        tlat -= elat;
        // i.e. the residual is below 1e-12 rad
        if elon.hypot(elat) < 1e-12 {
            break;
        }
    }
    (tlon, tlat, h)
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::dms_to_dd;
    use crate::Inv;

    // Transformation from WGS84 to ED50, with the translations of EPSG:1134
    // mirrored (they are published for the ED50 -> WGS84 direction).
    fn ed50_helmert() -> Datum {
        Datum::new(
            Ellipsoid::named("intl").unwrap(),
            DatumShift::Geocentric([-84.87, -96.49, -116.95]),
        )
    }

    #[test]
    fn helmert_translation() -> Result<(), Error> {
        let grids = GridCollection::new();
        let shift = ed50_helmert().prepare(&grids)?;

        // Test point off the Dutch coast, from OGP Publication 373-7-2:
        // Geomatics Guidance Note number 7, part 2
        let lat = dms_to_dd(53, 48, 33.82).to_radians();
        let lon = dms_to_dd(2, 7, 46.38).to_radians();

        // Reference values computed with the equivalent cartesian pipeline
        //   geo | cart WGS84 | helmert x:84.87 y:96.49 z:116.95 | cart inv ellps:intl | geo inv
        let expected_lat = 53.8101570592_f64;
        let expected_lon = 2.1309658097_f64;
        let expected_h = 28.02470;

        let (lon_ed50, lat_ed50, h_ed50) = shift.apply(Inv, lon, lat, 73.);
        assert!((lat_ed50.to_degrees() - expected_lat).abs() < 1e-9);
        assert!((lon_ed50.to_degrees() - expected_lon).abs() < 1e-9);
        assert!((h_ed50 - expected_h).abs() < 1e-3);

        // And back
        let (lon2, lat2, h2) = shift.apply(Fwd, lon_ed50, lat_ed50, h_ed50);
        assert!((lon2 - lon).abs() < 1e-12);
        assert!((lat2 - lat).abs() < 1e-12);
        assert!((h2 - 73.).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn molodensky_matches_helmert() -> Result<(), Error> {
        let grids = GridCollection::new();
        let helmert = ed50_helmert().prepare(&grids)?;
        let molodensky = Datum::new(
            Ellipsoid::named("intl")?,
            DatumShift::Molodensky([-84.87, -96.49, -116.95]),
        )
        .prepare(&grids)?;

        let lat = dms_to_dd(53, 48, 33.82).to_radians();
        let lon = dms_to_dd(2, 7, 46.38).to_radians();

        // Molodensky replicates the cartesian route to within 5 mm in the
        // plane, and a few cm in the elevation
        let (hlon, hlat, hh) = helmert.apply(Inv, lon, lat, 73.);
        let (mlon, mlat, mh) = molodensky.apply(Inv, lon, lat, 73.);
        assert!((hlat - mlat).abs().to_degrees() < 5e-8);
        assert!((hlon - mlon).abs().to_degrees() < 5e-8);
        assert!((hh - mh).abs() < 0.05);
        Ok(())
    }

    #[test]
    fn rotated_helmert_roundtrip() -> Result<(), Error> {
        let grids = GridCollection::new();
        let shift = Datum::named("Amersfoort")?.prepare(&grids)?;

        let (lon, lat) = (5.4_f64.to_radians(), 52.2_f64.to_radians());
        let (wlon, wlat, wh) = shift.apply(Fwd, lon, lat, 0.);
        // The shift is of the order of 100 m
        assert!((wlon - lon).abs().to_degrees() < 0.01);
        assert!((wlat - lat).abs().to_degrees() < 0.01);

        let (blon, blat, bh) = shift.apply(Inv, wlon, wlat, wh);
        assert!((blon - lon).abs() < 1e-11);
        assert!((blat - lat).abs() < 1e-11);
        assert!(bh.abs() < 1e-4);
        Ok(())
    }

    #[test]
    fn gridded_shift() -> Result<(), Error> {
        let grids = GridCollection::new();
        grids.register("test.datum", crate::grid::tests::test_grid());

        let datum = Datum::new(
            Ellipsoid::named("clrk66")?,
            DatumShift::Grid("test.datum".to_string()),
        );
        let shift = datum.prepare(&grids)?;

        let (lon, lat) = (12_f64.to_radians(), 55_f64.to_radians());
        let (wlon, wlat, _) = shift.apply(Fwd, lon, lat, 0.);
        // The synthetic grid stores (12.055, 55.012) arcsec at this node
        assert!((wlon.to_degrees() - (12. + 12.055 / 3600.)).abs() < 1e-9);
        assert!((wlat.to_degrees() - (55. + 55.012 / 3600.)).abs() < 1e-9);

        // The iterative inverse recovers the source position
        let (blon, blat, _) = shift.apply(Inv, wlon, wlat, 0.);
        assert!((blon - lon).abs() < 1e-11);
        assert!((blat - lat).abs() < 1e-11);

        // A datum whose grid was never registered fails at preparation,
        // not at application
        let missing = Datum::new(
            Ellipsoid::named("clrk66")?,
            DatumShift::Grid("atlantis".to_string()),
        );
        assert!(matches!(
            missing.prepare(&grids),
            Err(Error::GridShiftMissing(_))
        ));
        Ok(())
    }

    #[test]
    fn value_equality() -> Result<(), Error> {
        assert_eq!(Datum::named("WGS84")?, Datum::default());
        assert_eq!(Datum::named("NAD83")?, Datum::named("ETRS89")?);
        assert_ne!(Datum::named("WGS84")?, Datum::named("NAD83")?);
        assert_ne!(Datum::named("ED50")?, Datum::named("WGS84")?);
        Ok(())
    }
}
