//! Datum shift grids: characteristics, interpolation, and the process wide,
//! load-once grid cache.

use crate::Error;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A tabulated, spatially varying datum correction: longitude/latitude offset
/// pairs on a regular graticule, bilinearly interpolated at lookup time.
///
/// Internally everything is in radians; the Gravsoft interchange format has
/// its graticule in decimal degrees and its corrections in seconds of arc,
/// both converted once at parse time.
#[derive(Debug, Default, Clone)]
pub struct ShiftGrid {
    lat_n: f64, // Latitude of the first (northernmost) row of the grid
    lat_s: f64, // Latitude of the last (southernmost) row of the grid
    lon_w: f64, // Longitude of the first (westernmost) column of each row
    lon_e: f64, // Longitude of the last (easternmost) column of each row
    dlat: f64,  // Row distance. Positive, since rows scan from the north
    dlon: f64,  // Column distance. Positive, since columns scan from the west
    rows: usize,
    cols: usize,
    grid: Vec<f32>, // Interleaved (dlon, dlat) pairs, in radians
}

impl ShiftGrid {
    /// Read a 2-band Gravsoft datum shift grid. Discards '#'-style comments.
    ///
    /// The Gravsoft header is `lat_s lat_n lon_w lon_e dlat dlon` in decimal
    /// degrees, followed by row-major (latitude, longitude) correction pairs
    /// in seconds of arc, scanning from the northwest corner.
    pub fn gravsoft(buf: &[u8]) -> Result<ShiftGrid, Error> {
        let all = std::io::BufReader::new(buf);
        let mut header = Vec::<f64>::new();
        let mut grid = Vec::<f64>::new();

        for line in all.lines() {
            // Remove comments
            let line = line?;
            let line = line.split('#').collect::<Vec<_>>()[0];
            for item in line.split_whitespace() {
                let value = item.parse::<f64>().unwrap_or(f64::NAN);
                // The header is the first 6 numbers of the file
                if header.len() < 6 {
                    header.push(value);
                } else {
                    grid.push(value);
                }
            }
        }

        if header.len() < 6 || header.iter().any(|h| h.is_nan()) {
            return Err(Error::General("Malformed Gravsoft header"));
        }

        let lat_s = header[0].to_radians();
        let lat_n = header[1].to_radians();
        let lon_w = header[2].to_radians();
        let lon_e = header[3].to_radians();
        let dlat = header[4].abs().to_radians();
        let dlon = header[5].abs().to_radians();

        let rows = ((lat_n - lat_s) / dlat + 1.5).floor() as usize;
        let cols = ((lon_e - lon_w) / dlon + 1.5).floor() as usize;
        if rows < 2 || cols < 2 || grid.len() != 2 * rows * cols {
            return Err(Error::General("Malformed Gravsoft grid"));
        }

        // Correction pairs arrive as (lat, lon) in seconds of arc.
        // Store them as (lon, lat) in radians.
        let grid = grid
            .chunks_exact(2)
            .flat_map(|pair| {
                [
                    (pair[1] / 3600.0).to_radians() as f32,
                    (pair[0] / 3600.0).to_radians() as f32,
                ]
            })
            .collect();

        Ok(ShiftGrid {
            lat_n,
            lat_s,
            lon_w,
            lon_e,
            dlat,
            dlon,
            rows,
            cols,
            grid,
        })
    }

    /// Determine whether a coordinate falls within the grid boundaries,
    /// plus a `margin` expressed in grid cell units.
    pub fn contains(&self, lon: f64, lat: f64, margin: f64) -> bool {
        let lat_grace = margin * self.dlat;
        if lat < self.lat_s - lat_grace || lat > self.lat_n + lat_grace {
            return false;
        }
        let lon_grace = margin * self.dlon;
        lon >= self.lon_w - lon_grace && lon <= self.lon_e + lon_grace
    }

    /// Bilinearly interpolated (dlon, dlat) correction at `(lon, lat)`, both
    /// in radians. `None` if the position is outside the grid plus a half-cell
    /// margin; positions in the margin are extrapolated from the border cells.
    pub fn at(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !self.contains(lon, lat, 0.5) {
            return None;
        }

        // The (row, column) of the southwest node of the grid cell containing
        // the point - or, when extrapolating, of the nearest interior cell
        let row = ((self.lat_n - lat) / self.dlat).ceil() as i64;
        let col = ((lon - self.lon_w) / self.dlon).floor() as i64;
        let row = row.clamp(1, (self.rows - 1) as i64) as usize;
        let col = col.clamp(0, (self.cols - 2) as i64) as usize;

        // First element of each corner pair
        #[rustfmt::skip]
        let (sw, se, nw, ne) = (
            2 * (self.cols *  row      + col),
            2 * (self.cols *  row      + col + 1),
            2 * (self.cols * (row - 1) + col),
            2 * (self.cols * (row - 1) + col + 1),
        );

        // Cell relative, cell unit coordinates
        let rlon = (lon - (self.lon_w + col as f64 * self.dlon)) / self.dlon;
        let rlat = (lat - (self.lat_n - row as f64 * self.dlat)) / self.dlat;

        let mut result = [0.; 2];
        for (i, v) in result.iter_mut().enumerate() {
            let west = (1. - rlat) * self.grid[sw + i] as f64 + rlat * self.grid[nw + i] as f64;
            let east = (1. - rlat) * self.grid[se + i] as f64 + rlat * self.grid[ne + i] as f64;
            *v = (1. - rlon) * west + rlon * east;
        }
        Some((result[0], result[1]))
    }
}

// ----- T H E   G R I D   C A C H E ---------------------------------------------------

/// A load-once cache of named shift grids.
///
/// Grids enter the collection either through explicit registration (tests,
/// embedded data) or lazily, read from the collection's directory on the
/// first request for a given name. The check-if-loaded-else-load sequence is
/// serialized by a mutex, so concurrent first use from several threads loads
/// each grid exactly once. A loaded grid is immutable and shared.
#[derive(Debug, Default)]
pub struct GridCollection {
    directory: Mutex<Option<PathBuf>>,
    loaded: Mutex<BTreeMap<String, Arc<ShiftGrid>>>,
}

impl GridCollection {
    pub fn new() -> GridCollection {
        GridCollection::default()
    }

    /// Point the collection at a directory of Gravsoft grid files, enabling
    /// on-demand loads. Idempotent; a later call replaces the directory but
    /// leaves already-loaded grids in place.
    pub fn set_directory(&self, directory: &Path) {
        if let Ok(mut dir) = self.directory.lock() {
            *dir = Some(directory.to_path_buf());
        }
    }

    /// Register an in-memory grid under `name`.
    pub fn register(&self, name: &str, grid: ShiftGrid) {
        if let Ok(mut loaded) = self.loaded.lock() {
            loaded.insert(name.to_string(), Arc::new(grid));
        }
    }

    /// The grid registered (or loadable) as `name`.
    ///
    /// Fails with [`Error::GridShiftMissing`] if the grid is neither
    /// registered nor readable from the collection's directory.
    pub fn get(&self, name: &str) -> Result<Arc<ShiftGrid>, Error> {
        let Ok(mut loaded) = self.loaded.lock() else {
            return Err(Error::General("grid cache mutex poisoned"));
        };
        if let Some(grid) = loaded.get(name) {
            return Ok(grid.clone());
        }

        let directory = match self.directory.lock() {
            Ok(dir) => dir.clone(),
            Err(_) => None,
        };
        let Some(directory) = directory else {
            return Err(Error::GridShiftMissing(name.to_string()));
        };

        let Ok(buf) = std::fs::read(directory.join(name)) else {
            return Err(Error::GridShiftMissing(name.to_string()));
        };
        let grid = Arc::new(ShiftGrid::gravsoft(&buf)?);
        loaded.insert(name.to_string(), grid.clone());
        Ok(grid)
    }
}

/// The process wide grid collection consulted by
/// [`reproject_points`](crate::reproject_points).
pub fn external_grids() -> &'static GridCollection {
    static GRIDS: Lazy<GridCollection> = Lazy::new(GridCollection::new);
    &GRIDS
}

/// Register a directory of Gravsoft grid files with the process wide grid
/// collection. Call once, before the first reprojection involving a grid
/// shifted datum; grids are then read on demand, each at most once.
pub fn initialize_external_grids(directory: &Path) {
    external_grids().set_directory(directory);
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    // A small synthetic 5 x 9 grid, with the correction in arcsec numerically
    // mirroring the node position in degrees: trivial to predict interpolated
    // values from
    pub(crate) fn test_grid() -> ShiftGrid {
        let mut text = String::from("54 58 8 16 1 1\n");
        for lat in (54..59).rev() {
            for lon in 8..17 {
                text += &format!("{}.0{:02} {}.0{:02} ", lat, lon, lon, lat);
            }
            text += "\n";
        }
        ShiftGrid::gravsoft(text.as_bytes()).unwrap()
    }

    #[test]
    fn interpolation() {
        let grid = test_grid();
        assert_eq!(grid.rows, 5);
        assert_eq!(grid.cols, 9);

        // At a node, interpolation is exact
        let (dlon, dlat) = grid
            .at(12_f64.to_radians(), 55_f64.to_radians())
            .unwrap();
        assert!((dlon.to_degrees() * 3600. - 12.055).abs() < 1e-4);
        assert!((dlat.to_degrees() * 3600. - 55.012).abs() < 1e-4);

        // Between nodes, the construction keeps the values predictable
        let (dlon, dlat) = grid
            .at(12.5_f64.to_radians(), 55.25_f64.to_radians())
            .unwrap();
        assert!((dlon.to_degrees() * 3600. - 12.55525).abs() < 1e-3);
        assert!((dlat.to_degrees() * 3600. - 55.2625).abs() < 1e-2);

        // Far outside the grid
        assert!(grid.at(0., 0.).is_none());
    }

    #[test]
    fn cache() {
        let grids = GridCollection::new();
        assert!(matches!(
            grids.get("nowhere"),
            Err(Error::GridShiftMissing(_))
        ));

        grids.register("somewhere", test_grid());
        assert!(grids.get("somewhere").is_ok());
        // Second lookup hits the cache and yields the same allocation
        let first = grids.get("somewhere").unwrap();
        let second = grids.get("somewhere").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
