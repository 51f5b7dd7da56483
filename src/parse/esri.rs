//! ESRI WKT descriptor strings: the bracketed `PROJCS[...]`/`GEOGCS[...]`
//! grammar of `.prj` files, with `DATUM`, `SPHEROID`, `PROJECTION`,
//! `PARAMETER` and `UNIT` members.

use crate::projections::{Method, Parameters};
use crate::{Datum, DatumShift, Ellipsoid, Error, ProjectionInfo, Unit};

pub(crate) fn esri_wkt(text: &str) -> Result<ProjectionInfo, Error> {
    let mut cursor = Cursor { text, pos: 0 };
    let node = cursor.node()?;
    cursor.skip_whitespace();
    if cursor.pos != text.len() {
        return Err(cursor.error());
    }

    match node.keyword.as_str() {
        "GEOGCS" => Ok(ProjectionInfo::geographic(geogcs_datum(&node)?)),
        "PROJCS" => projcs(&node),
        _ => Err(Error::Parse(node.keyword)),
    }
}

// ----- T H E   G R A M M A R ---------------------------------------------------------

#[derive(Clone, Debug)]
enum Value {
    Text(String),
    Number(f64),
    Object(Node),
}

#[derive(Clone, Debug)]
struct Node {
    keyword: String,
    values: Vec<Value>,
}

impl Node {
    fn child(&self, keyword: &str) -> Option<&Node> {
        self.values.iter().find_map(|v| match v {
            Value::Object(node) if node.keyword == keyword => Some(node),
            _ => None,
        })
    }

    fn required(&self, keyword: &str) -> Result<&Node, Error> {
        self.child(keyword)
            .ok_or_else(|| Error::Parse(format!("{} without {keyword}", self.keyword)))
    }

    fn text(&self, index: usize) -> Result<&str, Error> {
        match self.values.get(index) {
            Some(Value::Text(text)) => Ok(text),
            _ => Err(Error::Parse(self.keyword.clone())),
        }
    }

    fn number(&self, index: usize) -> Result<f64, Error> {
        match self.values.get(index) {
            Some(Value::Number(number)) => Ok(*number),
            _ => Err(Error::Parse(self.keyword.clone())),
        }
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    // A parse error carries the offending fragment
    fn error(&self) -> Error {
        let rest: String = self.text[self.pos..].chars().take(24).collect();
        Error::Parse(rest)
    }

    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.text.len() - trimmed.len();
    }

    fn eat(&mut self, c: char) -> Result<(), Error> {
        self.skip_whitespace();
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            return Ok(());
        }
        Err(self.error())
    }

    // KEYWORD[value, value, ...]
    fn node(&mut self) -> Result<Node, Error> {
        self.skip_whitespace();
        let start = self.pos;
        let keyword: String = self
            .rest()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if keyword.is_empty() {
            return Err(self.error());
        }
        self.pos += keyword.len();
        if self.eat('[').is_err() {
            // Point the error at the whole malformed construct
            self.pos = start;
            return Err(self.error());
        }

        let mut values = Vec::new();
        loop {
            values.push(self.value()?);
            self.skip_whitespace();
            if self.rest().starts_with(',') {
                self.pos += 1;
                continue;
            }
            self.eat(']')?;
            return Ok(Node { keyword, values });
        }
    }

    fn value(&mut self) -> Result<Value, Error> {
        self.skip_whitespace();
        let Some(first) = self.rest().chars().next() else {
            return Err(self.error());
        };

        if first == '"' {
            self.pos += 1;
            let Some(end) = self.rest().find('"') else {
                return Err(self.error());
            };
            let text = self.rest()[..end].to_string();
            self.pos += end + 1;
            return Ok(Value::Text(text));
        }

        if first.is_ascii_digit() || matches!(first, '-' | '+' | '.') {
            let len = self
                .rest()
                .chars()
                .take_while(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
                .count();
            let number = self.rest()[..len]
                .parse::<f64>()
                .map_err(|_| self.error())?;
            self.pos += len;
            return Ok(Value::Number(number));
        }

        Ok(Value::Object(self.node()?))
    }
}

// ----- I N T E R P R E T A T I O N ---------------------------------------------------

fn geogcs_datum(geogcs: &Node) -> Result<Datum, Error> {
    let datum = geogcs.required("DATUM")?;
    let spheroid = datum.required("SPHEROID")?;

    let a = spheroid.number(1)?;
    let rf = spheroid.number(2)?;
    let ellipsoid = Ellipsoid::new(a, if rf == 0. { 0. } else { 1. / rf })?;

    // An explicit TOWGS84 trumps the name lookup
    let shift = if let Some(towgs84) = datum.child("TOWGS84") {
        let values: Vec<f64> = (0..towgs84.values.len())
            .map(|i| towgs84.number(i))
            .collect::<Result<_, _>>()?;
        match values.len() {
            3 => DatumShift::Geocentric([values[0], values[1], values[2]]),
            7 => DatumShift::Geocentric7([
                values[0], values[1], values[2], values[3], values[4], values[5], values[6],
            ]),
            _ => return Err(Error::Parse("TOWGS84".to_string())),
        }
    } else {
        well_known_shift(datum.text(0)?)
    };

    Ok(Datum::new(ellipsoid, shift))
}

// The shifts of the datum names that occur without TOWGS84 in circulating
// .prj files. An unknown name gets a null shift: the WKT carries no better
// information, and failing hard would reject every obscure local datum.
fn well_known_shift(name: &str) -> DatumShift {
    match name {
        "D_North_American_1927" => DatumShift::Grid("conus".to_string()),
        "D_European_1950" => DatumShift::Geocentric([-87., -96., -120.]),
        "D_OSGB_1936" => {
            DatumShift::Geocentric7([446.448, -125.157, 542.06, 0.15, 0.247, 0.842, -20.489])
        }
        "D_Amersfoort" => DatumShift::Geocentric7([
            565.237, 50.0087, 465.658, -0.406857, 0.350733, -1.87035, 4.0812,
        ]),
        "D_Pulkovo_1942" => DatumShift::Geocentric([28., -130., -95.]),
        _ => DatumShift::None,
    }
}

fn projcs(node: &Node) -> Result<ProjectionInfo, Error> {
    let datum = geogcs_datum(node.required("GEOGCS")?)?;

    let projection = node.required("PROJECTION")?.text(0)?.to_ascii_lowercase();
    let unit_node = node.required("UNIT")?;
    let unit = Unit::new(unit_node.text(0)?, unit_node.number(1)?)?;

    let mut parameters = Parameters::default();
    // Mercator and the polar stereographic read Standard_Parallel_1 as a
    // latitude of true scale, everything else as a standard parallel
    let sp1_is_lat_ts = matches!(projection.as_str(), "mercator" | "polar_stereographic");

    for value in &node.values {
        let Value::Object(child) = value else {
            continue;
        };
        if child.keyword != "PARAMETER" {
            continue;
        }
        let name = child.text(0)?.to_ascii_lowercase();
        let v = child.number(1)?;
        match name.as_str() {
            "central_meridian" | "longitude_of_center" => parameters.lon_0 = v,
            "latitude_of_origin" | "latitude_of_center" => parameters.lat_0 = v,
            "standard_parallel_1" if sp1_is_lat_ts => parameters.lat_ts = v,
            "standard_parallel_1" => parameters.lat_1 = Some(v),
            "standard_parallel_2" => parameters.lat_2 = Some(v),
            "scale_factor" => parameters.k_0 = v,
            // False origins arrive in the unit of the PROJCS
            "false_easting" => parameters.x_0 = v * unit.to_meter,
            "false_northing" => parameters.y_0 = v * unit.to_meter,
            // Auxiliary decorations (sphere type, Krovak's spelled-out
            // azimuth and pseudo parallel) carry no information we need
            _ => {}
        }
    }

    use Method::*;
    let method = match projection.as_str() {
        "transverse_mercator" | "gauss_kruger" => TransverseMercator,
        "mercator" => Mercator,
        "mercator_auxiliary_sphere" => WebMercator,
        "lambert_conformal_conic" => LambertConformalConic,
        "albers" => AlbersEqualArea,
        "polar_stereographic" => {
            // The aspect pole follows the sign of the latitude of true scale
            parameters.lat_0 = if parameters.lat_ts < 0. { -90. } else { 90. };
            PolarStereographic
        }
        "stereographic" | "double_stereographic" => ObliqueStereographic,
        "polyconic" => Polyconic,
        "sinusoidal" => Sinusoidal,
        "robinson" => Robinson,
        "mollweide" => Mollweide,
        "eckert_i" => EckertI,
        "eckert_ii" => EckertII,
        "eckert_iii" => EckertIII,
        "eckert_iv" => EckertIV,
        "eckert_v" => EckertV,
        "eckert_vi" => EckertVI,
        "miller_cylindrical" => MillerCylindrical,
        "plate_carree" | "equidistant_cylindrical" => EquidistantCylindrical,
        "equidistant_conic" => EquidistantConic,
        "gnomonic" => Gnomonic,
        "orthographic" => Orthographic,
        "krovak" => Krovak,
        "cassini" => Cassini,
        "van_der_grinten_i" => VanDerGrinten,
        "bonne" => Bonne,
        "gall_stereographic" => GallStereographic,
        "winkel_tripel" => WinkelTripel,
        "hammer_aitoff" => HammerAitoff,
        _ => return Err(Error::NotFound(format!("PROJECTION {projection}"), String::default())),
    };

    ProjectionInfo::projected(datum, method, parameters, unit)
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const WGS84: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;

    #[test]
    fn geographic() -> Result<(), Error> {
        let info = esri_wkt(WGS84)?;
        assert!(info.is_latlon());
        assert_eq!(info.datum().ellipsoid.semimajor_axis(), 6_378_137.);
        assert_eq!(info.datum().shift, DatumShift::None);
        Ok(())
    }

    #[test]
    fn projected() -> Result<(), Error> {
        let text = format!(
            r#"PROJCS["WGS_1984_UTM_Zone_32N",{WGS84},PROJECTION["Transverse_Mercator"],PARAMETER["False_Easting",500000.0],PARAMETER["False_Northing",0.0],PARAMETER["Central_Meridian",9.0],PARAMETER["Scale_Factor",0.9996],PARAMETER["Latitude_Of_Origin",0.0],UNIT["Meter",1.0]]"#
        );
        let info = esri_wkt(&text)?;
        assert!(!info.is_latlon());
        assert_eq!(info.parameters().lon_0, 9.);
        assert_eq!(info.parameters().k_0, 0.9996);
        assert_eq!(info.parameters().x_0, 500_000.);
        Ok(())
    }

    #[test]
    fn feet_and_towgs84() -> Result<(), Error> {
        // False origins are in the PROJCS unit; the datum carries an
        // explicit transformation
        let text = r#"PROJCS["Local",GEOGCS["GCS_European_1950",DATUM["D_European_1950",SPHEROID["International_1924",6378388.0,297.0],TOWGS84[-87,-96,-120,0,0,0,0]],PRIMEM["Greenwich",0],UNIT["Degree",0.0174532925199433]],PROJECTION["Transverse_Mercator"],PARAMETER["False_Easting",1000.0],PARAMETER["Central_Meridian",3.0],UNIT["Foot",0.3048]]"#;
        let info = esri_wkt(text)?;
        assert_eq!(info.unit().to_meter, 0.3048);
        assert!((info.parameters().x_0 - 304.8).abs() < 1e-9);
        assert_eq!(
            info.datum().shift,
            DatumShift::Geocentric7([-87., -96., -120., 0., 0., 0., 0.])
        );
        Ok(())
    }

    #[test]
    fn named_datum_shift() -> Result<(), Error> {
        let text = r#"GEOGCS["GCS_North_American_1927",DATUM["D_North_American_1927",SPHEROID["Clarke_1866",6378206.4,294.9786982]],PRIMEM["Greenwich",0],UNIT["Degree",0.0174532925199433]]"#;
        let info = esri_wkt(text)?;
        assert_eq!(info.datum().shift, DatumShift::Grid("conus".to_string()));
        Ok(())
    }

    #[test]
    fn malformed() {
        // The offending fragment is carried in the error
        assert!(matches!(
            esri_wkt("PROJCS[oops]"),
            Err(Error::Parse(f)) if f.contains("oops")
        ));
        assert!(matches!(
            esri_wkt(r#"GEOGCS["No_Datum",PRIMEM["Greenwich",0]]"#),
            Err(Error::Parse(f)) if f.contains("DATUM")
        ));
        assert!(matches!(esri_wkt(""), Err(Error::Parse(_))));
        // Trailing garbage is not tolerated
        assert!(esri_wkt(&format!("{WGS84} nonsense")).is_err());
    }
}
