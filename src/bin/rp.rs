//! rp: pipe-friendly coordinate reprojection.
//!
//! Coordinates go in on stdin, one point per line, x y [z], and come out
//! the same way, reprojected from `--from` to `--to`:
//!
//! ```console
//! $ echo 12 55 | rp --from WGS1984 --to WGS1984UTMZone32N
//! 691875.632 6098907.825
//! ```
//!
//! The coordinate system arguments take a catalog name, a proj4-style
//! string, or an ESRI WKT string.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use geoproj::{initialize_external_grids, reproject_point, Error, ProjectionInfo};
use log::warn;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rp", author, version, about)]
struct Cli {
    /// Source coordinate system: catalog name, proj4 string, or ESRI WKT
    #[arg(short, long)]
    from: String,

    /// Destination coordinate system: catalog name, proj4 string, or ESRI WKT
    #[arg(short, long)]
    to: String,

    /// Directory holding Gravsoft datum shift grids
    #[arg(short, long)]
    grids: Option<PathBuf>,

    /// Number of decimals in the output
    #[arg(short, long, default_value_t = 4)]
    decimals: usize,

    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn main() -> Result<()> {
    let options = Cli::parse();
    env_logger::Builder::new()
        .filter_level(options.verbose.log_level_filter())
        .init();

    // Grid shifted datums read their grids from an explicitly given
    // directory, or from the platform's data dir
    if let Some(directory) = options
        .grids
        .clone()
        .or_else(|| dirs::data_local_dir().map(|d| d.join("geoproj")))
    {
        initialize_external_grids(&directory);
    }

    let from = descriptor(&options.from).context("cannot interpret --from")?;
    let to = descriptor(&options.to).context("cannot interpret --to")?;

    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    for line in stdin.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<f64> = trimmed
            .split_whitespace()
            .map(|field| field.parse::<f64>())
            .collect::<Result<_, _>>()
            .with_context(|| format!("bad coordinate line '{trimmed}'"))?;
        if fields.len() < 2 {
            return Err(anyhow!("bad coordinate line '{trimmed}'"));
        }

        let z = *fields.get(2).unwrap_or(&0.);
        let (x, y, h) = match reproject_point(fields[0], fields[1], z, &from, &to) {
            Ok(result) => result,
            Err(Error::OutOfDomain(method)) => {
                warn!("point '{trimmed}' is out of domain for {method}");
                (f64::NAN, f64::NAN, z)
            }
            Err(other) => return Err(other.into()),
        };

        let d = options.decimals;
        if fields.len() > 2 {
            writeln!(stdout, "{x:.d$} {y:.d$} {h:.d$}")?;
        } else {
            writeln!(stdout, "{x:.d$} {y:.d$}")?;
        }
    }
    Ok(())
}

// A WKT string is bracketed, a proj4 string carries +proj; everything
// else goes to the catalog
fn descriptor(text: &str) -> Result<ProjectionInfo> {
    let info = if text.contains('[') {
        ProjectionInfo::from_esri_wkt(text)?
    } else if text.contains("proj=") {
        ProjectionInfo::from_proj4(text)?
    } else {
        ProjectionInfo::named(text)?
    };
    Ok(info)
}
