//! *A geodetic reprojection engine*.
//!
//! Converts batches of coordinates between projected (planar easting/northing)
//! and geographic (longitude/latitude) coordinate systems, through a chain of
//! map projection formulas and datum shifts, each driven by a declarative
//! [`ProjectionInfo`] descriptor.
//!
//! The operational entry point is [`reproject_points`], which transforms a
//! caller-owned batch of interleaved x/y pairs in place:
//!
//! ```
//! use geoproj::{reproject_points, ProjectionInfo};
//!
//! fn main() -> Result<(), geoproj::Error> {
//!     let from = ProjectionInfo::named("WGS1984")?;
//!     let to = ProjectionInfo::named("WGS1984UTMZone32N")?;
//!
//!     // Copenhagen, roughly
//!     let mut xy = [12.0, 55.0];
//!     reproject_points(&mut xy, None, &from, &to, 0, 1)?;
//!     assert!((xy[0] - 691_875.632).abs() < 1e-3);
//!     assert!((xy[1] - 6_098_907.825).abs() < 1e-3);
//!     Ok(())
//! }
//! ```
//!
//! Descriptors come from the built-in [`catalog`], from proj4-style strings,
//! or from ESRI WKT strings - see [`ProjectionInfo`].

pub mod catalog;
mod datum;
mod ellipsoid;
mod grid;
mod info;
pub mod math;
mod parse;
mod projections;
mod reproject;

pub use datum::{Datum, DatumShift};
pub use ellipsoid::Ellipsoid;
pub use grid::{external_grids, initialize_external_grids, GridCollection, ShiftGrid};
pub use info::{ProjectionInfo, Unit};
pub use projections::{Method, Parameters, Projection};
pub use reproject::{reproject_point, reproject_points, reprojected};

/// The crate-wide error type.
///
/// Construction-time problems (bad ellipsoid parameters, malformed descriptor
/// strings) are always raised synchronously, from the constructor. The only
/// transform-time failures are [`Error::GridShiftMissing`], raised before any
/// point of the batch has been touched, and [`Error::OutOfDomain`], raised by
/// the single-point conversion helpers. See [`reproject_points`] for how
/// per-point domain failures are reported in batch mode.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error")]
    Io(#[from] std::io::Error),

    #[error("error: {0}")]
    General(&'static str),

    #[error("invalid value for {0}: {1}")]
    InvalidParameter(&'static str, String),

    #[error("parse error at '{0}'")]
    Parse(String),

    #[error("coordinate out of domain for {0}")]
    OutOfDomain(&'static str),

    #[error("datum shift grid '{0}' has not been registered")]
    GridShiftMissing(String),

    #[error("{0} not found{1}")]
    NotFound(String, String),
}

/// `Fwd`: run a two-way transformation in the *forward* direction.
/// `Inv`: run it in the *inverse* direction.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Direction {
    Fwd,
    Inv,
}

pub use Direction::Fwd;
pub use Direction::Inv;
