//! proj4-style descriptor strings: whitespace separated `+key=value`
//! tokens, e.g. `+proj=utm +zone=32 +ellps=GRS80`.

use crate::projections::{Method, Parameters};
use crate::{Datum, DatumShift, Ellipsoid, Error, ProjectionInfo, Unit};
use std::collections::BTreeMap;

pub(crate) fn proj4(text: &str) -> Result<ProjectionInfo, Error> {
    let fields = split_into_fields(text)?;

    let Some(proj) = fields.get("proj") else {
        return Err(Error::Parse(format!("missing +proj in '{text}'")));
    };

    let datum = datum(&fields)?;
    if matches!(proj.as_str(), "longlat" | "latlong" | "lonlat" | "latlon") {
        return Ok(ProjectionInfo::geographic(datum));
    }

    let parameters = parameters(proj, &fields)?;
    let method = method(proj, &parameters)?;
    let unit = unit(&fields)?;
    ProjectionInfo::projected(datum, method, parameters, unit)
}

// The leading '+' is conventional, not mandatory. A token without '=' is a
// flag and gets an empty value.
fn split_into_fields(text: &str) -> Result<BTreeMap<String, String>, Error> {
    let mut fields = BTreeMap::new();
    for token in text.split_whitespace() {
        let body = token.strip_prefix('+').unwrap_or(token);
        let (key, value) = match body.split_once('=') {
            Some((key, value)) => (key, value),
            None => (body, ""),
        };
        if key.is_empty() {
            return Err(Error::Parse(token.to_string()));
        }
        fields.insert(key.to_string(), value.to_string());
    }
    Ok(fields)
}

fn number(fields: &BTreeMap<String, String>, key: &str) -> Result<Option<f64>, Error> {
    match fields.get(key) {
        None => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(|_| Error::Parse(format!("{key}={value}"))),
    }
}

fn datum(fields: &BTreeMap<String, String>) -> Result<Datum, Error> {
    // A named datum settles both ellipsoid and shift
    if let Some(name) = fields.get("datum") {
        return match name.as_str() {
            "WGS84" | "NAD83" | "NAD27" | "OSGB36" => Datum::named(name),
            _ => Err(Error::NotFound(format!("+datum={name}"), String::default())),
        };
    }

    let ellipsoid = match fields.get("ellps") {
        Some(name) => Ellipsoid::named(name)?,
        None => {
            if let Some(a) = number(fields, "a")? {
                if let Some(rf) = number(fields, "rf")? {
                    Ellipsoid::new(a, if rf == 0. { 0. } else { 1. / rf })?
                } else if let Some(b) = number(fields, "b")? {
                    Ellipsoid::new(a, (a - b) / a)?
                } else if let Some(f) = number(fields, "f")? {
                    Ellipsoid::new(a, f)?
                } else if let Some(es) = number(fields, "es")? {
                    Ellipsoid::from_eccentricity_squared(a, es)?
                } else {
                    Ellipsoid::new(a, 0.)?
                }
            } else {
                Ellipsoid::named("WGS84")?
            }
        }
    };

    let shift = if let Some(list) = fields.get("towgs84") {
        let values: Vec<f64> = list
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| Error::Parse(format!("towgs84={list}")))?;
        match values.len() {
            3 => DatumShift::Geocentric([values[0], values[1], values[2]]),
            7 => DatumShift::Geocentric7([
                values[0], values[1], values[2], values[3], values[4], values[5], values[6],
            ]),
            _ => return Err(Error::Parse(format!("towgs84={list}"))),
        }
    } else if let Some(grids) = fields.get("nadgrids") {
        // Only the first grid of a comma list; '@' marks optional grids in
        // proj4, which we treat like any other
        let name = grids
            .split(',')
            .next()
            .unwrap_or(grids)
            .trim_start_matches('@');
        if name.is_empty() {
            return Err(Error::Parse(format!("nadgrids={grids}")));
        }
        DatumShift::Grid(name.to_string())
    } else {
        DatumShift::None
    };

    Ok(Datum::new(ellipsoid, shift))
}

fn parameters(proj: &str, fields: &BTreeMap<String, String>) -> Result<Parameters, Error> {
    let mut parameters = Parameters::default();

    if let Some(v) = number(fields, "lon_0")? {
        parameters.lon_0 = v;
    }
    if let Some(v) = number(fields, "lat_0")? {
        parameters.lat_0 = v;
    }
    parameters.lat_1 = number(fields, "lat_1")?;
    parameters.lat_2 = number(fields, "lat_2")?;
    if let Some(v) = number(fields, "lat_ts")? {
        parameters.lat_ts = v;
    }
    if let Some(v) = number(fields, "x_0")? {
        parameters.x_0 = v;
    }
    if let Some(v) = number(fields, "y_0")? {
        parameters.y_0 = v;
    }
    // Both spellings of the scale factor occur in the wild
    if let Some(v) = number(fields, "k_0")? {
        parameters.k_0 = v;
    } else if let Some(v) = number(fields, "k")? {
        parameters.k_0 = v;
    }
    if let Some(zone) = fields.get("zone") {
        let zone = zone
            .parse::<i32>()
            .map_err(|_| Error::Parse(format!("zone={zone}")))?;
        parameters.zone = Some(zone);
    }
    parameters.south = fields.contains_key("south");

    if proj == "utm" && parameters.zone.is_none() {
        return Err(Error::Parse("utm without zone".to_string()));
    }
    Ok(parameters)
}

fn method(proj: &str, parameters: &Parameters) -> Result<Method, Error> {
    use Method::*;
    Ok(match proj {
        "merc" => Mercator,
        "webmerc" => WebMercator,
        "tmerc" | "utm" => TransverseMercator,
        "lcc" => LambertConformalConic,
        "aea" => AlbersEqualArea,
        // A polar latitude of origin selects the polar aspect; anything
        // else is served by the double stereographic
        "stere" | "sterea" => {
            if proj == "stere" && (parameters.lat_0.abs() - 90.).abs() < 1e-9 {
                PolarStereographic
            } else {
                ObliqueStereographic
            }
        }
        "poly" => Polyconic,
        "sinu" => Sinusoidal,
        "robin" => Robinson,
        "moll" => Mollweide,
        "eck1" => EckertI,
        "eck2" => EckertII,
        "eck3" => EckertIII,
        "eck4" => EckertIV,
        "eck5" => EckertV,
        "eck6" => EckertVI,
        "mill" => MillerCylindrical,
        "eqc" => EquidistantCylindrical,
        "eqdc" => EquidistantConic,
        "gnom" => Gnomonic,
        "ortho" => Orthographic,
        "krovak" => Krovak,
        "cass" => Cassini,
        "vandg" => VanDerGrinten,
        "bonne" => Bonne,
        "gall" => GallStereographic,
        "wintri" => WinkelTripel,
        "hammer" => HammerAitoff,
        _ => return Err(Error::NotFound(format!("+proj={proj}"), String::default())),
    })
}

fn unit(fields: &BTreeMap<String, String>) -> Result<Unit, Error> {
    if let Some(v) = number(fields, "to_meter")? {
        return Unit::new("custom", v);
    }
    match fields.get("units") {
        Some(name) => Unit::named(name),
        None => Ok(Unit::meter()),
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geographic() -> Result<(), Error> {
        let info = proj4("+proj=longlat +datum=WGS84")?;
        assert!(info.is_latlon());
        assert_eq!(*info.datum(), Datum::named("WGS84")?);

        let info = proj4("+proj=longlat +ellps=intl +towgs84=-87,-96,-120")?;
        assert_eq!(
            info.datum().shift,
            DatumShift::Geocentric([-87., -96., -120.])
        );
        Ok(())
    }

    #[test]
    fn projected() -> Result<(), Error> {
        let info = proj4("+proj=utm +zone=32 +ellps=GRS80")?;
        assert!(!info.is_latlon());
        assert_eq!(info.parameters().lon_0, 9.);
        assert_eq!(info.parameters().x_0, 500_000.);

        let info = proj4("+proj=lcc +lat_1=33 +lat_2=45 +lat_0=39 +lon_0=-96 +datum=WGS84")?;
        assert_eq!(info.parameters().lat_1, Some(33.));
        assert_eq!(info.parameters().lat_2, Some(45.));

        // The leading '+' is optional, spacing is free
        let info = proj4("proj=merc   lat_ts=56")?;
        assert_eq!(info.parameters().lat_ts, 56.);
        Ok(())
    }

    #[test]
    fn shifts_and_units() -> Result<(), Error> {
        let info = proj4("+proj=utm +zone=14 +ellps=clrk66 +nadgrids=@conus,alaska")?;
        assert_eq!(info.datum().shift, DatumShift::Grid("conus".to_string()));

        let info = proj4("+proj=tmerc +lon_0=-90 +datum=NAD27 +units=us-ft")?;
        assert!((info.unit().to_meter - 1200. / 3937.).abs() < 1e-15);
        Ok(())
    }

    #[test]
    fn malformed() {
        assert!(matches!(proj4("+zone=32"), Err(Error::Parse(_))));
        assert!(matches!(proj4("+proj=utm +ellps=GRS80"), Err(Error::Parse(_))));
        assert!(matches!(
            proj4("+proj=utm +zone=banana +ellps=GRS80"),
            Err(Error::Parse(f)) if f.contains("banana")
        ));
        assert!(matches!(
            proj4("+proj=merc +lat_ts=low +ellps=GRS80"),
            Err(Error::Parse(f)) if f.contains("lat_ts")
        ));
        assert!(matches!(
            proj4("+proj=longlat +towgs84=1,2"),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            proj4("+proj=unicorn"),
            Err(Error::NotFound(_, _))
        ));
    }
}
