//! The projection method registry: per-method forward/inverse formulas,
//! dispatched over a closed enum of prepared projections.
//!
//! Preparation (the `new` constructor of each method module) happens once,
//! at descriptor construction time: parameter validation, degree-to-radian
//! conversion, and the precomputation of the per-method constants. The
//! per-point `forward`/`inverse` calls are pure.

use crate::{Ellipsoid, Error};

mod albers;
mod bonne;
mod cassini;
mod eckert;
mod eqc;
mod eqdc;
mod gall;
mod gnomonic;
mod hammer;
mod krovak;
mod lcc;
mod merc;
mod miller;
mod mollweide;
mod ortho;
mod polyconic;
mod robinson;
mod stere;
mod sinusoidal;
mod tmerc;
mod vandergrinten;
mod webmerc;
mod winkel;

/// The identifiers of the supported projection methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Mercator,
    WebMercator,
    TransverseMercator,
    LambertConformalConic,
    AlbersEqualArea,
    PolarStereographic,
    ObliqueStereographic,
    Polyconic,
    Sinusoidal,
    Robinson,
    Mollweide,
    EckertI,
    EckertII,
    EckertIII,
    EckertIV,
    EckertV,
    EckertVI,
    MillerCylindrical,
    EquidistantCylindrical,
    EquidistantConic,
    Gnomonic,
    Orthographic,
    Krovak,
    Cassini,
    VanDerGrinten,
    Bonne,
    GallStereographic,
    WinkelTripel,
    HammerAitoff,
}

/// The sparse, named parameter set of a projection method. Only the subset
/// relevant to the chosen method is consulted; the rest is ignored.
///
/// Angles are in degrees here. This descriptor boundary is the one and only
/// place degrees occur - every prepared projection works in radians,
/// converted once by the method constructors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parameters {
    /// Central meridian
    pub lon_0: f64,
    /// Latitude of origin
    pub lat_0: f64,
    /// First standard parallel
    pub lat_1: Option<f64>,
    /// Second standard parallel
    pub lat_2: Option<f64>,
    /// Latitude of true scale
    pub lat_ts: f64,
    /// False easting, meters
    pub x_0: f64,
    /// False northing, meters
    pub y_0: f64,
    /// Scale factor at the natural origin
    pub k_0: f64,
    /// UTM zone; expanded into lon_0/k_0/x_0/y_0 at descriptor construction
    pub zone: Option<i32>,
    /// Southern UTM aspect
    pub south: bool,
}

impl Default for Parameters {
    fn default() -> Parameters {
        Parameters {
            lon_0: 0.,
            lat_0: 0.,
            lat_1: None,
            lat_2: None,
            lat_ts: 0.,
            x_0: 0.,
            y_0: 0.,
            k_0: 1.,
            zone: None,
            south: false,
        }
    }
}

/// A fully prepared projection: method id plus precomputed constants.
///
/// `forward` maps geodetic (radians) to projected (meters); `inverse` maps
/// back. A `None` marks a coordinate outside the method's domain - the
/// per-method policy (clamp or reject) is documented at each method module.
#[derive(Clone, Debug)]
pub enum Projection {
    Merc(merc::Merc),
    WebMerc(webmerc::WebMerc),
    Tmerc(tmerc::Tmerc),
    Lcc(lcc::Lcc),
    Albers(albers::Albers),
    PolarStere(stere::PolarStere),
    ObliqueStere(stere::ObliqueStere),
    Polyconic(polyconic::Polyconic),
    Sinusoidal(sinusoidal::Sinusoidal),
    Robinson(robinson::Robinson),
    Mollweide(mollweide::Mollweide),
    Eckert(eckert::Eckert),
    Miller(miller::Miller),
    Eqc(eqc::Eqc),
    Eqdc(eqdc::Eqdc),
    Gnomonic(gnomonic::Gnomonic),
    Ortho(ortho::Ortho),
    Krovak(krovak::Krovak),
    Cassini(cassini::Cassini),
    Vandg(vandergrinten::Vandg),
    Bonne(bonne::Bonne),
    Gall(gall::Gall),
    Winkel(winkel::Winkel),
    Hammer(hammer::Hammer),
}

impl Method {
    /// The conventional short name, as it appears in proj4-style
    /// descriptor strings.
    pub fn name(self) -> &'static str {
        use Method::*;
        match self {
            Mercator => "merc",
            WebMercator => "webmerc",
            TransverseMercator => "tmerc",
            LambertConformalConic => "lcc",
            AlbersEqualArea => "aea",
            PolarStereographic => "stere",
            ObliqueStereographic => "sterea",
            Polyconic => "poly",
            Sinusoidal => "sinu",
            Robinson => "robin",
            Mollweide => "moll",
            EckertI => "eck1",
            EckertII => "eck2",
            EckertIII => "eck3",
            EckertIV => "eck4",
            EckertV => "eck5",
            EckertVI => "eck6",
            MillerCylindrical => "mill",
            EquidistantCylindrical => "eqc",
            EquidistantConic => "eqdc",
            Gnomonic => "gnom",
            Orthographic => "ortho",
            Krovak => "krovak",
            Cassini => "cass",
            VanDerGrinten => "vandg",
            Bonne => "bonne",
            GallStereographic => "gall",
            WinkelTripel => "wintri",
            HammerAitoff => "hammer",
        }
    }
}

impl Projection {
    /// Prepare `method` for the given ellipsoid and parameters. All
    /// parameter validation happens here; the per-point calls cannot fail
    /// with a parameter error.
    pub fn new(method: Method, ellps: &Ellipsoid, params: &Parameters) -> Result<Projection, Error> {
        use Method::*;
        Ok(match method {
            Mercator => Projection::Merc(merc::Merc::new(ellps, params)?),
            WebMercator => Projection::WebMerc(webmerc::WebMerc::new(ellps, params)?),
            TransverseMercator => Projection::Tmerc(tmerc::Tmerc::new(ellps, params)?),
            LambertConformalConic => Projection::Lcc(lcc::Lcc::new(ellps, params)?),
            AlbersEqualArea => Projection::Albers(albers::Albers::new(ellps, params)?),
            PolarStereographic => Projection::PolarStere(stere::PolarStere::new(ellps, params)?),
            ObliqueStereographic => {
                Projection::ObliqueStere(stere::ObliqueStere::new(ellps, params)?)
            }
            Polyconic => Projection::Polyconic(polyconic::Polyconic::new(ellps, params)?),
            Sinusoidal => Projection::Sinusoidal(sinusoidal::Sinusoidal::new(ellps, params)?),
            Robinson => Projection::Robinson(robinson::Robinson::new(ellps, params)?),
            Mollweide => Projection::Mollweide(mollweide::Mollweide::new(ellps, params)?),
            EckertI | EckertII | EckertIII | EckertIV | EckertV | EckertVI => {
                Projection::Eckert(eckert::Eckert::new(method, ellps, params)?)
            }
            MillerCylindrical => Projection::Miller(miller::Miller::new(ellps, params)?),
            EquidistantCylindrical => Projection::Eqc(eqc::Eqc::new(ellps, params)?),
            EquidistantConic => Projection::Eqdc(eqdc::Eqdc::new(ellps, params)?),
            Gnomonic => Projection::Gnomonic(gnomonic::Gnomonic::new(ellps, params)?),
            Orthographic => Projection::Ortho(ortho::Ortho::new(ellps, params)?),
            Krovak => Projection::Krovak(krovak::Krovak::new(ellps, params)?),
            Cassini => Projection::Cassini(cassini::Cassini::new(ellps, params)?),
            VanDerGrinten => Projection::Vandg(vandergrinten::Vandg::new(ellps, params)?),
            Bonne => Projection::Bonne(bonne::Bonne::new(ellps, params)?),
            GallStereographic => Projection::Gall(gall::Gall::new(ellps, params)?),
            WinkelTripel => Projection::Winkel(winkel::Winkel::new(ellps, params)?),
            HammerAitoff => Projection::Hammer(hammer::Hammer::new(ellps, params)?),
        })
    }

    /// The method this projection prepares.
    pub fn method(&self) -> Method {
        use Projection::*;
        match self {
            Merc(_) => Method::Mercator,
            WebMerc(_) => Method::WebMercator,
            Tmerc(_) => Method::TransverseMercator,
            Lcc(_) => Method::LambertConformalConic,
            Albers(_) => Method::AlbersEqualArea,
            PolarStere(_) => Method::PolarStereographic,
            ObliqueStere(_) => Method::ObliqueStereographic,
            Polyconic(_) => Method::Polyconic,
            Sinusoidal(_) => Method::Sinusoidal,
            Robinson(_) => Method::Robinson,
            Mollweide(_) => Method::Mollweide,
            Eckert(p) => p.method(),
            Miller(_) => Method::MillerCylindrical,
            Eqc(_) => Method::EquidistantCylindrical,
            Eqdc(_) => Method::EquidistantConic,
            Gnomonic(_) => Method::Gnomonic,
            Ortho(_) => Method::Orthographic,
            Krovak(_) => Method::Krovak,
            Cassini(_) => Method::Cassini,
            Vandg(_) => Method::VanDerGrinten,
            Bonne(_) => Method::Bonne,
            Gall(_) => Method::GallStereographic,
            Winkel(_) => Method::WinkelTripel,
            Hammer(_) => Method::HammerAitoff,
        }
    }

    /// Geodetic (radians) to projected (meters). `None` flags a coordinate
    /// outside the method's domain.
    pub fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        use Projection::*;
        match self {
            Merc(p) => p.fwd(lon, lat),
            WebMerc(p) => p.fwd(lon, lat),
            Tmerc(p) => p.fwd(lon, lat),
            Lcc(p) => p.fwd(lon, lat),
            Albers(p) => p.fwd(lon, lat),
            PolarStere(p) => p.fwd(lon, lat),
            ObliqueStere(p) => p.fwd(lon, lat),
            Polyconic(p) => p.fwd(lon, lat),
            Sinusoidal(p) => p.fwd(lon, lat),
            Robinson(p) => p.fwd(lon, lat),
            Mollweide(p) => p.fwd(lon, lat),
            Eckert(p) => p.fwd(lon, lat),
            Miller(p) => p.fwd(lon, lat),
            Eqc(p) => p.fwd(lon, lat),
            Eqdc(p) => p.fwd(lon, lat),
            Gnomonic(p) => p.fwd(lon, lat),
            Ortho(p) => p.fwd(lon, lat),
            Krovak(p) => p.fwd(lon, lat),
            Cassini(p) => p.fwd(lon, lat),
            Vandg(p) => p.fwd(lon, lat),
            Bonne(p) => p.fwd(lon, lat),
            Gall(p) => p.fwd(lon, lat),
            Winkel(p) => p.fwd(lon, lat),
            Hammer(p) => p.fwd(lon, lat),
        }
    }

    /// Projected (meters) to geodetic (radians). `None` flags a coordinate
    /// outside the method's range.
    pub fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        use Projection::*;
        match self {
            Merc(p) => p.inv(x, y),
            WebMerc(p) => p.inv(x, y),
            Tmerc(p) => p.inv(x, y),
            Lcc(p) => p.inv(x, y),
            Albers(p) => p.inv(x, y),
            PolarStere(p) => p.inv(x, y),
            ObliqueStere(p) => p.inv(x, y),
            Polyconic(p) => p.inv(x, y),
            Sinusoidal(p) => p.inv(x, y),
            Robinson(p) => p.inv(x, y),
            Mollweide(p) => p.inv(x, y),
            Eckert(p) => p.inv(x, y),
            Miller(p) => p.inv(x, y),
            Eqc(p) => p.inv(x, y),
            Eqdc(p) => p.inv(x, y),
            Gnomonic(p) => p.inv(x, y),
            Ortho(p) => p.inv(x, y),
            Krovak(p) => p.inv(x, y),
            Cassini(p) => p.inv(x, y),
            Vandg(p) => p.inv(x, y),
            Bonne(p) => p.inv(x, y),
            Gall(p) => p.inv(x, y),
            Winkel(p) => p.inv(x, y),
            Hammer(p) => p.inv(x, y),
        }
    }
}

// ----- T E S T S ---------------------------------------------------------------------
