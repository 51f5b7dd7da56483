//! The reprojection orchestrator: batched, in-place conversion between two
//! coordinate systems, through the chain
//!
//! > source projected -> source geodetic -> WGS84 -> destination geodetic
//! > -> destination projected
//!
//! with every optional step skipped when the two descriptors agree on it.
//! Stateless and reentrant: concurrent calls on disjoint batches are
//! race-free, the only shared state being the load-once grid cache.

use crate::datum::PreparedShift;
use crate::grid::external_grids;
use crate::{Error, Fwd, Inv, ProjectionInfo};

/// Reproject `num_points` interleaved x/y pairs, starting at `start_index`,
/// from `source` to `dest`, **in place**.
///
/// `xy` holds interleaved pairs - longitude/latitude in degrees for
/// geographic systems, easting/northing in the descriptor's linear unit
/// for projected ones. `z` optionally holds ellipsoidal heights in meters,
/// parallel to the pairs; heights take part in (and are changed by) the
/// datum shift. Without `z`, heights count as zero.
///
/// This is a destructive transform by design - the zero-allocation batch
/// contract. Callers needing the originals copy first, or use
/// [`reprojected`].
///
/// Returns the number of fully converted points. A point outside the
/// domain of either projection gets NaN written to its slot and is
/// excluded from the count; it never aborts the batch. The only hard
/// transform-time failure is a datum shift grid that was never registered
/// ([`Error::GridShiftMissing`]), raised before any point is touched.
pub fn reproject_points(
    xy: &mut [f64],
    mut z: Option<&mut [f64]>,
    source: &ProjectionInfo,
    dest: &ProjectionInfo,
    start_index: usize,
    num_points: usize,
) -> Result<usize, Error> {
    let end = start_index
        .checked_add(num_points)
        .ok_or(Error::General("point range overflows"))?;
    if xy.len() < 2 * end {
        return Err(Error::InvalidParameter(
            "xy",
            format!("length {} cannot hold {end} points", xy.len()),
        ));
    }
    if let Some(z) = &z {
        if z.len() < end {
            return Err(Error::InvalidParameter(
                "z",
                format!("length {} cannot hold {end} points", z.len()),
            ));
        }
    }

    let shifts = prepared_shifts(source, dest)?;

    let src_to_meter = source.unit().to_meter;
    let dst_to_meter = dest.unit().to_meter;

    let mut converted = 0;
    for i in start_index..end {
        let h = z.as_deref().map_or(0., |z| z[i]);

        // To geodetic radians on the source datum
        let geodetic = match source.projection() {
            Some(projection) => {
                projection.inverse(xy[2 * i] * src_to_meter, xy[2 * i + 1] * src_to_meter)
            }
            None => Some((xy[2 * i].to_radians(), xy[2 * i + 1].to_radians())),
        };

        let result = geodetic.and_then(|(lon, lat)| {
            // Through the WGS84 pivot, when the datums differ
            let (lon, lat, h) = match &shifts {
                Some((src, dst)) => {
                    let (lon, lat, h) = src.apply(Fwd, lon, lat, h);
                    dst.apply(Inv, lon, lat, h)
                }
                None => (lon, lat, h),
            };

            // And out through the destination projection
            match dest.projection() {
                Some(projection) => projection
                    .forward(lon, lat)
                    .map(|(x, y)| (x / dst_to_meter, y / dst_to_meter, h)),
                None => Some((lon.to_degrees(), lat.to_degrees(), h)),
            }
        });

        match result {
            Some((x, y, h)) => {
                xy[2 * i] = x;
                xy[2 * i + 1] = y;
                if let Some(z) = z.as_deref_mut() {
                    z[i] = h;
                }
                converted += 1;
            }
            // Out of domain: flagged, counted out, never silent
            None => {
                xy[2 * i] = f64::NAN;
                xy[2 * i + 1] = f64::NAN;
            }
        }
    }
    Ok(converted)
}

/// Reproject a single coordinate tuple (x, y, ellipsoidal height).
///
/// The convenience sibling of [`reproject_points`] for one-at-a-time
/// callers: where the batch call would write NaN and drop the point from
/// its count, this raises [`Error::OutOfDomain`] naming the offending
/// projection method.
pub fn reproject_point(
    x: f64,
    y: f64,
    z: f64,
    source: &ProjectionInfo,
    dest: &ProjectionInfo,
) -> Result<(f64, f64, f64), Error> {
    let shifts = prepared_shifts(source, dest)?;

    let (lon, lat) = match source.projection() {
        Some(projection) => projection
            .inverse(x * source.unit().to_meter, y * source.unit().to_meter)
            .ok_or(Error::OutOfDomain(projection.method().name()))?,
        None => (x.to_radians(), y.to_radians()),
    };

    let (lon, lat, h) = match &shifts {
        Some((src, dst)) => {
            let (lon, lat, h) = src.apply(Fwd, lon, lat, z);
            dst.apply(Inv, lon, lat, h)
        }
        None => (lon, lat, z),
    };

    match dest.projection() {
        Some(projection) => {
            let (x, y) = projection
                .forward(lon, lat)
                .ok_or(Error::OutOfDomain(projection.method().name()))?;
            Ok((x / dest.unit().to_meter, y / dest.unit().to_meter, h))
        }
        None => Ok((lon.to_degrees(), lat.to_degrees(), h)),
    }
}

// Datums equal by value: the shift steps vanish. Otherwise resolve both
// shifts up front - a missing grid must surface before any mutation.
fn prepared_shifts(
    source: &ProjectionInfo,
    dest: &ProjectionInfo,
) -> Result<Option<(PreparedShift, PreparedShift)>, Error> {
    if source.datum() == dest.datum() {
        return Ok(None);
    }
    let grids = external_grids();
    Ok(Some((
        source.datum().prepare(grids)?,
        dest.datum().prepare(grids)?,
    )))
}

/// The non-mutating companion of [`reproject_points`]: copies the inputs,
/// transforms the copies, and hands them back, leaving the originals
/// untouched. `xy` must consist of whole interleaved pairs, and `z`, if
/// given, must supply a height for each pair.
pub fn reprojected(
    xy: &[f64],
    z: Option<&[f64]>,
    source: &ProjectionInfo,
    dest: &ProjectionInfo,
) -> Result<(Vec<f64>, Option<Vec<f64>>), Error> {
    if xy.len() % 2 != 0 {
        return Err(Error::InvalidParameter(
            "xy",
            format!("odd length {}", xy.len()),
        ));
    }
    let count = xy.len() / 2;
    if let Some(z) = z {
        if z.len() != count {
            return Err(Error::InvalidParameter(
                "z",
                format!("{} heights for {count} points", z.len()),
            ));
        }
    }

    let mut xy = xy.to_vec();
    let mut z = z.map(|z| z.to_vec());
    reproject_points(&mut xy, z.as_deref_mut(), source, dest, 0, count)?;
    Ok((xy, z))
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn geographic_to_projected() -> Result<(), Error> {
        let from = ProjectionInfo::named("WGS1984")?;
        let to = ProjectionInfo::named("WGS1984UTMZone32N")?;

        let mut xy = [12., 55.];
        assert_eq!(reproject_points(&mut xy, None, &from, &to, 0, 1)?, 1);
        assert_float_eq!(xy[0], 691_875.632_139_661, abs <= 1e-3);
        assert_float_eq!(xy[1], 6_098_907.825_005_012, abs <= 1e-3);

        // And back
        assert_eq!(reproject_points(&mut xy, None, &to, &from, 0, 1)?, 1);
        assert_float_eq!(xy[0], 12., abs <= 1e-9);
        assert_float_eq!(xy[1], 55., abs <= 1e-9);
        Ok(())
    }

    #[test]
    fn slices_and_validation() -> Result<(), Error> {
        let from = ProjectionInfo::named("WGS1984")?;
        let to = ProjectionInfo::named("WGS1984WebMercator")?;

        // Only the middle point of three is transformed
        let mut xy = [12., 55., 12., 55., 12., 55.];
        assert_eq!(reproject_points(&mut xy, None, &from, &to, 1, 1)?, 1);
        assert_eq!(xy[0], 12.);
        assert_float_eq!(xy[2], 1_335_833.889_519_282_8, abs <= 1e-6);
        assert_eq!(xy[5], 55.);

        // Too small an array is rejected up front, untouched
        let mut short = [12., 55.];
        assert!(matches!(
            reproject_points(&mut short, None, &from, &to, 0, 2),
            Err(Error::InvalidParameter("xy", _))
        ));
        assert_eq!(short, [12., 55.]);

        let mut z = [0.];
        assert!(matches!(
            reproject_points(&mut xy, Some(&mut z), &from, &to, 0, 3),
            Err(Error::InvalidParameter("z", _))
        ));
        Ok(())
    }

    #[test]
    fn out_of_domain_flags() -> Result<(), Error> {
        let from = ProjectionInfo::named("WGS1984")?;
        let to = ProjectionInfo::named("WorldMercator")?;

        // The pole has no Mercator image: NaN, dropped from the count,
        // the rest of the batch unharmed
        let mut xy = [12., 55., 0., 90., 12., -55.];
        assert_eq!(reproject_points(&mut xy, None, &from, &to, 0, 3)?, 2);
        assert!(xy[2].is_nan() && xy[3].is_nan());
        assert!(xy[0].is_finite() && xy[5].is_finite());
        Ok(())
    }

    #[test]
    fn single_point() -> Result<(), Error> {
        let from = ProjectionInfo::named("WGS1984")?;
        let to = ProjectionInfo::named("WorldMercator")?;

        let (x, y, h) = reproject_point(12., 55., 0., &from, &to)?;
        assert_float_eq!(x, 1_335_833.889_519_282_8, abs <= 1e-6);
        assert_float_eq!(y, 7_326_837.714_873_877, abs <= 1e-3);
        assert_eq!(h, 0.);

        // Where the batch call flags with NaN, the point call names the
        // offender
        assert!(matches!(
            reproject_point(0., 90., 0., &from, &to),
            Err(Error::OutOfDomain("merc"))
        ));
        Ok(())
    }

    #[test]
    fn nonmutating_wrapper() -> Result<(), Error> {
        let from = ProjectionInfo::named("WGS1984")?;
        let to = ProjectionInfo::named("WGS1984WebMercator")?;

        let xy = [12., 55.];
        let (out, z) = reprojected(&xy, None, &from, &to)?;
        assert_eq!(xy, [12., 55.]);
        assert_float_eq!(out[0], 1_335_833.889_519_282_8, abs <= 1e-6);
        assert!(z.is_none());

        assert!(reprojected(&[1., 2., 3.], None, &from, &to).is_err());
        assert!(reprojected(&[1., 2.], Some(&[0., 0.]), &from, &to).is_err());
        Ok(())
    }
}
