//! The built-in catalog of well known coordinate systems: an embedded
//! name -> definition table, parsed on demand through the same machinery
//! as a user supplied descriptor string. The catalog scales by adding
//! rows, not code; the engine never treats a catalog system differently
//! from a hand built one.
//!
//! UTM zones are served parametrically: any `<datum>UTMZone<zone><N|S>`
//! name resolves without a table row.

use crate::projections::{Method, Parameters};
use crate::{parse, Datum, DatumShift, Ellipsoid, Error, ProjectionInfo, Unit};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

// Geographic systems first, then the projected ones. Definitions are
// ordinary proj4 strings, so a row is testable with any proj-speaking
// tool.
#[rustfmt::skip]
const DEFINITIONS: &[(&str, &str)] = &[
    // Geographic
    ("WGS1984",          "+proj=longlat +datum=WGS84"),
    ("NAD1983",          "+proj=longlat +datum=NAD83"),
    ("NAD1927",          "+proj=longlat +datum=NAD27"),
    ("ETRS1989",         "+proj=longlat +ellps=GRS80"),
    ("ED1950",           "+proj=longlat +ellps=intl +towgs84=-87,-96,-120"),
    ("OSGB1936",         "+proj=longlat +ellps=airy +towgs84=446.448,-125.157,542.06,0.15,0.247,0.842,-20.489"),
    ("Amersfoort",       "+proj=longlat +ellps=bessel +towgs84=565.237,50.0087,465.658,-0.406857,0.350733,-1.87035,4.0812"),
    ("Pulkovo1942",      "+proj=longlat +ellps=krass +towgs84=28,-130,-95"),

    // Projected
    ("WGS1984WebMercator",                  "+proj=webmerc +datum=WGS84"),
    ("DutchRD",                             "+proj=sterea +lat_0=52.15616055555555 +lon_0=5.38763888888889 +k=0.9999079 +x_0=155000 +y_0=463000 +ellps=bessel +towgs84=565.237,50.0087,465.658,-0.406857,0.350733,-1.87035,4.0812"),
    ("BritishNationalGrid",                 "+proj=tmerc +lat_0=49 +lon_0=-2 +k=0.9996012717 +x_0=400000 +y_0=-100000 +ellps=airy +towgs84=446.448,-125.157,542.06,0.15,0.247,0.842,-20.489"),
    ("USAContiguousLambertConformalConic",  "+proj=lcc +lat_1=33 +lat_2=45 +lat_0=39 +lon_0=-96 +datum=WGS84"),
    ("USAContiguousAlbersEqualAreaConic",   "+proj=aea +lat_1=29.5 +lat_2=45.5 +lat_0=23 +lon_0=-96 +datum=NAD83"),
    ("USAContiguousEquidistantConic",       "+proj=eqdc +lat_1=33 +lat_2=45 +lat_0=39 +lon_0=-96 +datum=NAD83"),
    ("NorthPoleStereographic",              "+proj=stere +lat_0=90 +datum=WGS84"),
    ("SouthPoleStereographic",              "+proj=stere +lat_0=-90 +datum=WGS84"),
    ("NorthPoleGnomonic",                   "+proj=gnom +lat_0=90 +datum=WGS84"),
    ("NorthPoleOrthographic",               "+proj=ortho +lat_0=90 +datum=WGS84"),
    ("SJTSKKrovakEastNorth",                "+proj=krovak +lat_0=49.5 +lon_0=24.833333333333332 +k=0.9999 +ellps=bessel +towgs84=589,76,480"),
    ("NAD1927CubaNorte",                    "+proj=lcc +lat_1=22.35 +lat_0=22.08333333333333 +lon_0=-81 +k=0.99993602 +x_0=500000 +y_0=280296.016 +ellps=clrk66 +nadgrids=cuba_norte"),
    ("WorldMercator",                       "+proj=merc +datum=WGS84"),
    ("WorldRobinson",                       "+proj=robin +datum=WGS84"),
    ("WorldMollweide",                      "+proj=moll +datum=WGS84"),
    ("WorldSinusoidal",                     "+proj=sinu +datum=WGS84"),
    ("WorldPolyconic",                      "+proj=poly +datum=WGS84"),
    ("WorldMillerCylindrical",              "+proj=mill +datum=WGS84"),
    ("WorldVanDerGrintenI",                 "+proj=vandg +datum=WGS84"),
    ("WorldPlateCarree",                    "+proj=eqc +datum=WGS84"),
    ("WorldEquidistantCylindrical",         "+proj=eqc +lat_ts=60 +datum=WGS84"),
    ("WorldCassini",                        "+proj=cass +datum=WGS84"),
    ("WorldBonne",                          "+proj=bonne +lat_1=60 +datum=WGS84"),
    ("WorldGallStereographic",              "+proj=gall +datum=WGS84"),
    ("WorldWinkelTripel",                   "+proj=wintri +datum=WGS84"),
    ("WorldHammerAitoff",                   "+proj=hammer +datum=WGS84"),
    ("WorldEckertI",                        "+proj=eck1 +datum=WGS84"),
    ("WorldEckertII",                       "+proj=eck2 +datum=WGS84"),
    ("WorldEckertIII",                      "+proj=eck3 +datum=WGS84"),
    ("WorldEckertIV",                       "+proj=eck4 +datum=WGS84"),
    ("WorldEckertV",                        "+proj=eck5 +datum=WGS84"),
    ("WorldEckertVI",                       "+proj=eck6 +datum=WGS84"),
];

static INDEX: Lazy<BTreeMap<&'static str, &'static str>> =
    Lazy::new(|| DEFINITIONS.iter().copied().collect());

/// The well known system registered under `name`.
///
/// Fails with [`Error::NotFound`] for names outside the catalog; a
/// malformed catalog row would fail like the equivalent user supplied
/// string, which is what the catalog tests guard against.
pub fn named(name: &str) -> Result<ProjectionInfo, Error> {
    if let Some(info) = utm_zone(name)? {
        return Ok(info);
    }
    // Tokyo carries the classic Molodensky shift, which has no proj4
    // spelling
    if name == "Tokyo" {
        return Ok(ProjectionInfo::geographic(Datum::new(
            Ellipsoid::named("bessel")?,
            DatumShift::Molodensky([-148., 507., 685.]),
        )));
    }

    let Some(definition) = INDEX.get(name) else {
        return Err(Error::NotFound(
            name.to_string(),
            " in the coordinate system catalog".to_string(),
        ));
    };
    parse::proj4(definition)
}

/// The names the catalog serves from its table (the parameterized UTM
/// families come on top of these).
pub fn names() -> impl Iterator<Item = &'static str> {
    DEFINITIONS.iter().map(|(name, _)| *name)
}

/// The definition string behind a catalog row.
pub fn definition(name: &str) -> Option<&'static str> {
    INDEX.get(name).copied()
}

// <datum>UTMZone<zone><N|S>, e.g. WGS1984UTMZone32N
fn utm_zone(name: &str) -> Result<Option<ProjectionInfo>, Error> {
    let Some(at) = name.find("UTMZone") else {
        return Ok(None);
    };
    let datum = match &name[..at] {
        "WGS1984" => Datum::named("WGS84")?,
        "NAD1983" => Datum::named("NAD83")?,
        "NAD1927" => Datum::named("NAD27")?,
        "ETRS1989" => Datum::named("ETRS89")?,
        "ED1950" | "ED50" => Datum::named("ED50")?,
        "Pulkovo1942" => Datum::named("Pulkovo1942")?,
        _ => return Ok(None),
    };

    let zone_part = &name[at + "UTMZone".len()..];
    let south = match zone_part.chars().last() {
        Some('N') => false,
        Some('S') => true,
        _ => return Ok(None),
    };
    let Ok(zone) = zone_part[..zone_part.len() - 1].parse::<i32>() else {
        return Ok(None);
    };

    let parameters = Parameters {
        zone: Some(zone),
        south,
        ..Default::default()
    };
    ProjectionInfo::projected(datum, Method::TransverseMercator, parameters, Unit::meter())
        .map(Some)
}

// ----- T E S T S ---------------------------------------------------------------------
