//! The coordinate system descriptor: everything [`reproject_points`]
//! (crate::reproject_points) needs to know about one side of a
//! transformation, validated and prepared at construction time.

use crate::projections::{Method, Parameters, Projection};
use crate::{catalog, parse, Datum, Error};

/// The linear unit of a projected coordinate system. Coordinates in the
/// caller's arrays are in this unit; the projection formulas work in meters.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub name: String,
    pub to_meter: f64,
}

impl Unit {
    /// The meter, the unit of the overwhelming majority of projected
    /// systems.
    pub fn meter() -> Unit {
        Unit {
            name: "meter".to_string(),
            to_meter: 1.,
        }
    }

    /// A unit given directly by its conversion factor to meters.
    pub fn new(name: &str, to_meter: f64) -> Result<Unit, Error> {
        if !(to_meter > 0. && to_meter.is_finite()) {
            return Err(Error::InvalidParameter("to_meter", format!("{to_meter}")));
        }
        Ok(Unit {
            name: name.to_string(),
            to_meter,
        })
    }

    /// Predefined linear unit, by conventional name.
    pub fn named(name: &str) -> Result<Unit, Error> {
        let to_meter = match name.to_ascii_lowercase().as_str() {
            "m" | "meter" | "metre" => 1.,
            "km" | "kilometer" | "kilometre" => 1000.,
            "ft" | "foot" | "international foot" => 0.3048,
            "us-ft" | "foot_us" | "us survey foot" => 1200. / 3937.,
            _ => return Err(Error::NotFound(name.to_string(), String::default())),
        };
        Unit::new(name, to_meter)
    }
}

impl Default for Unit {
    fn default() -> Unit {
        Unit::meter()
    }
}

/// The full description of a coordinate system: a datum, and - for
/// projected systems - a prepared projection method with its parameters
/// and linear unit.
///
/// Immutable after construction; reprojection never mutates it, so shared
/// references can be used freely across threads. All parameter validation
/// happens in the constructors - a successfully built descriptor cannot
/// fail with a parameter error at transform time.
#[derive(Clone, Debug)]
pub struct ProjectionInfo {
    datum: Datum,
    projection: Option<Projection>,
    parameters: Parameters,
    unit: Unit,
}

impl ProjectionInfo {
    /// A geographic (latitude/longitude) system on `datum`. Coordinates
    /// are degrees, longitude first.
    pub fn geographic(datum: Datum) -> ProjectionInfo {
        ProjectionInfo {
            datum,
            projection: None,
            parameters: Parameters::default(),
            unit: Unit::meter(),
        }
    }

    /// A projected system: `method` applied to the datum's ellipsoid with
    /// the given parameters, coordinates expressed in `unit`.
    ///
    /// A `zone` in the parameters of a transverse Mercator expands into
    /// the UTM parameterization: central meridian `6·zone - 183`, scale
    /// 0.9996, false easting 500 000, and 10 000 000 of false northing on
    /// the southern aspect.
    pub fn projected(
        datum: Datum,
        method: Method,
        parameters: Parameters,
        unit: Unit,
    ) -> Result<ProjectionInfo, Error> {
        let mut parameters = parameters;
        if method == Method::TransverseMercator {
            if let Some(zone) = parameters.zone {
                if !(1..=60).contains(&zone) {
                    return Err(Error::InvalidParameter("zone", format!("{zone}")));
                }
                parameters.lon_0 = (6 * zone - 183) as f64;
                parameters.k_0 = 0.9996;
                parameters.x_0 = 500_000.;
                parameters.y_0 = if parameters.south { 10_000_000. } else { 0. };
            }
        }

        let projection = Projection::new(method, &datum.ellipsoid, &parameters)?;
        Ok(ProjectionInfo {
            datum,
            projection: Some(projection),
            parameters,
            unit,
        })
    }

    /// The UTM shorthand: `zone` on `datum`, southern aspect if `south`.
    pub fn utm(datum: Datum, zone: i32, south: bool) -> Result<ProjectionInfo, Error> {
        let parameters = Parameters {
            zone: Some(zone),
            south,
            ..Default::default()
        };
        ProjectionInfo::projected(datum, Method::TransverseMercator, parameters, Unit::meter())
    }

    /// A well known system from the built-in [catalog](crate::catalog).
    pub fn named(name: &str) -> Result<ProjectionInfo, Error> {
        catalog::named(name)
    }

    /// Parse a proj4-style `+key=value` descriptor string.
    pub fn from_proj4(text: &str) -> Result<ProjectionInfo, Error> {
        parse::proj4(text)
    }

    /// Parse an ESRI WKT descriptor string (`PROJCS[...]` / `GEOGCS[...]`).
    pub fn from_esri_wkt(text: &str) -> Result<ProjectionInfo, Error> {
        parse::esri_wkt(text)
    }

    /// Is this a geographic (latitude/longitude) system? Exactly the
    /// descriptors without a projection method.
    pub fn is_latlon(&self) -> bool {
        self.projection.is_none()
    }

    pub fn datum(&self) -> &Datum {
        &self.datum
    }

    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }
}

// ----- T E S T S ---------------------------------------------------------------------
