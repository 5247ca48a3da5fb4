//! Validation of tile request parameters.
//!
//! Pure parsing, no I/O: path segments and the raw query string become a
//! [`TileQuery`] or a [`ParamError`] describing the first problem found.

use crate::coord::{CoordError, Srs, TileAddress};
use crate::filter::{FilterSpec, YearRange};
use crate::pipeline::ComposeRequest;
use crate::service::TileRequest;
use std::str::FromStr;
use thiserror::Error;

/// Dataset key used when no dataset selector is given.
pub const ALL_DATA_KEY: &str = "0:0";

/// Query parameters selecting a dataset, with their storage type codes.
const DATASET_SELECTORS: [(&str, u8); 5] = [
    ("taxonKey", 1),
    ("datasetKey", 2),
    ("publishingOrg", 3),
    ("country", 4),
    ("publishingCountry", 5),
];

/// Invalid request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("{0}")]
    Address(#[from] CoordError),

    #[error("Invalid {name} '{value}': expected a non-negative integer")]
    NotANumber { name: &'static str, value: String },

    #[error("Invalid year '{0}': expected YYYY or YYYY,YYYY")]
    InvalidYear(String),

    #[error("Unsupported bin mode '{0}'")]
    UnsupportedBinMode(String),

    #[error("Invalid hexPerTile '{0}': expected a positive integer")]
    InvalidHexPerTile(String),

    #[error("Only one of taxonKey, datasetKey, publishingOrg, country, publishingCountry may be given")]
    ConflictingDatasetKeys,

    #[error("Empty value for {0}")]
    EmptyDatasetKey(&'static str),
}

/// Aggregation applied to a composed tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinMode {
    Hex,
}

impl FromStr for BinMode {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("hex") {
            Ok(BinMode::Hex)
        } else {
            Err(ParamError::UnsupportedBinMode(s.to_string()))
        }
    }
}

/// A validated tile request.
#[derive(Debug, Clone, PartialEq)]
pub struct TileQuery {
    pub dataset_key: String,
    pub address: TileAddress,
    pub filter: FilterSpec,
    pub verbose: bool,
    pub bin: Option<BinMode>,
    pub hex_per_tile: u32,
}

impl TileQuery {
    pub fn into_request(self) -> TileRequest {
        TileRequest {
            dataset_key: self.dataset_key,
            compose: ComposeRequest::new(self.address)
                .with_filter(self.filter)
                .with_verbose(self.verbose),
            hex_per_tile: self.bin.map(|BinMode::Hex| self.hex_per_tile),
        }
    }
}

/// Decoded query string, keeping repeated keys in order.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// Last value given for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value given for `key`, in order.
    pub fn all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Validates a tile request.
///
/// `z`, `x` and `y` are the path segments with the file extension already
/// removed from `y`.
pub fn parse_tile_query(
    z: &str,
    x: &str,
    y: &str,
    params: &QueryParams,
    default_hex_per_tile: u32,
) -> Result<TileQuery, ParamError> {
    let srs = match params.get("srs") {
        Some(s) if !s.trim().is_empty() => s.parse::<Srs>()?,
        _ => Srs::default(),
    };
    let address = TileAddress::new(
        parse_number("z", z)?,
        parse_number("x", x)?,
        parse_number("y", y)?,
        srs,
    )?;

    let categories: Vec<&str> = params
        .all("basisOfRecord")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    let filter = FilterSpec::all()
        .with_years(parse_years(params.get("year"))?)
        .with_categories(categories);

    let bin = params.get("bin").map(str::parse::<BinMode>).transpose()?;
    let hex_per_tile = match params.get("hexPerTile") {
        Some(v) => match v.trim().parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => return Err(ParamError::InvalidHexPerTile(v.to_string())),
        },
        None => default_hex_per_tile,
    };

    Ok(TileQuery {
        dataset_key: dataset_key(params)?,
        address,
        filter,
        verbose: parse_flag(params.get("verbose")),
        bin,
        hex_per_tile,
    })
}

/// Parses a year expression: absent, `YYYY`, or an inclusive `YYYY,YYYY`.
pub fn parse_years(value: Option<&str>) -> Result<YearRange, ParamError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(YearRange::unbounded());
    };
    let invalid = || ParamError::InvalidYear(value.to_string());

    match value.split_once(',') {
        None => Ok(YearRange::exact(parse_year(value).ok_or_else(invalid)?)),
        Some((min, max)) => {
            let min = parse_year(min.trim()).ok_or_else(invalid)?;
            let max = parse_year(max.trim()).ok_or_else(invalid)?;
            YearRange::new(Some(min), Some(max)).map_err(|_| invalid())
        }
    }
}

fn parse_year(s: &str) -> Option<i32> {
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// Derives the storage dataset key from the dataset selector parameters.
///
/// At most one selector may be present; none selects all data.
pub fn dataset_key(params: &QueryParams) -> Result<String, ParamError> {
    let mut selected = None;
    for (name, code) in DATASET_SELECTORS {
        let Some(value) = params.get(name) else {
            continue;
        };
        if selected.is_some() {
            return Err(ParamError::ConflictingDatasetKeys);
        }
        let value = value.trim();
        if value.is_empty() {
            return Err(ParamError::EmptyDatasetKey(name));
        }
        selected = Some(format!("{}:{}", code, value));
    }
    Ok(selected.unwrap_or_else(|| ALL_DATA_KEY.to_string()))
}

fn parse_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

fn parse_number<T: FromStr>(name: &'static str, value: &str) -> Result<T, ParamError> {
    value.parse().map_err(|_| ParamError::NotANumber {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(q: &str) -> Result<TileQuery, ParamError> {
        parse_tile_query("1", "0", "1", &QueryParams::parse(Some(q)), 51)
    }

    #[test]
    fn test_defaults() {
        let q = query("").unwrap();
        assert_eq!(q.dataset_key, ALL_DATA_KEY);
        assert_eq!(q.address, TileAddress::new(1, 0, 1, Srs::WebMercator).unwrap());
        assert_eq!(q.filter, FilterSpec::all());
        assert!(!q.verbose);
        assert_eq!(q.bin, None);
        assert_eq!(q.hex_per_tile, 51);
    }

    #[test]
    fn test_params_from_pairs() {
        let params: QueryParams = [("basisOfRecord", "A"), ("basisOfRecord", "B"), ("year", "2001")]
            .into_iter()
            .collect();
        assert_eq!(params.all("basisOfRecord").collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(params.get("year"), Some("2001"));
    }

    #[test]
    fn test_srs_selection() {
        let q = query("srs=epsg:4326").unwrap();
        assert_eq!(q.address.srs, Srs::Wgs84);
        assert!(matches!(
            query("srs=EPSG:27700"),
            Err(ParamError::Address(CoordError::UnsupportedSrs(_)))
        ));
    }

    #[test]
    fn test_address_validation() {
        let params = QueryParams::default();
        assert!(matches!(
            parse_tile_query("0", "1", "0", &params, 51),
            Err(ParamError::Address(CoordError::OutOfRange { .. }))
        ));
        assert!(matches!(
            parse_tile_query("a", "0", "0", &params, 51),
            Err(ParamError::NotANumber { name: "z", .. })
        ));
        assert!(matches!(
            parse_tile_query("0", "-1", "0", &params, 51),
            Err(ParamError::NotANumber { name: "x", .. })
        ));
    }

    #[test]
    fn test_repeated_basis_of_record() {
        let q = query("basisOfRecord=OBSERVATION&basisOfRecord=FOSSIL_SPECIMEN").unwrap();
        let categories = q.filter.categories().unwrap();
        assert_eq!(categories.len(), 2);
        assert!(categories.contains("FOSSIL_SPECIMEN"));
    }

    #[test]
    fn test_empty_basis_of_record_matches_all() {
        let q = query("basisOfRecord=").unwrap();
        assert!(q.filter.categories().is_none());
    }

    #[test]
    fn test_year_expressions() {
        assert_eq!(parse_years(None).unwrap(), YearRange::unbounded());
        assert_eq!(parse_years(Some("")).unwrap(), YearRange::unbounded());
        assert_eq!(parse_years(Some("1999")).unwrap(), YearRange::exact(1999));
        assert_eq!(
            parse_years(Some("1990,2000")).unwrap(),
            YearRange::new(Some(1990), Some(2000)).unwrap()
        );
    }

    #[test]
    fn test_malformed_years_rejected() {
        for bad in ["99", "19999", "abcd", "1990-2000", "1990,", "2000,1990", "1990,2000,2010"] {
            assert!(
                matches!(parse_years(Some(bad)), Err(ParamError::InvalidYear(_))),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_year_in_query() {
        let q = query("year=2000%2C2010").unwrap();
        assert_eq!(q.filter.years().min(), Some(2000));
        assert!(matches!(query("year=last"), Err(ParamError::InvalidYear(_))));
    }

    #[test]
    fn test_bin_mode_case_insensitive() {
        assert_eq!(query("bin=HEX").unwrap().bin, Some(BinMode::Hex));
        assert_eq!(query("bin=hex").unwrap().bin, Some(BinMode::Hex));
    }

    #[test]
    fn test_unknown_bin_mode_rejected() {
        assert_eq!(
            query("bin=square").unwrap_err(),
            ParamError::UnsupportedBinMode("square".to_string())
        );
        assert!(query("bin=").is_err());
    }

    #[test]
    fn test_hex_per_tile() {
        assert_eq!(query("bin=hex&hexPerTile=20").unwrap().hex_per_tile, 20);
        assert!(matches!(query("hexPerTile=0"), Err(ParamError::InvalidHexPerTile(_))));
        assert!(matches!(query("hexPerTile=many"), Err(ParamError::InvalidHexPerTile(_))));
    }

    #[test]
    fn test_verbose_flag() {
        assert!(query("verbose=true").unwrap().verbose);
        assert!(query("verbose=TRUE").unwrap().verbose);
        assert!(!query("verbose=yes").unwrap().verbose);
    }

    #[test]
    fn test_dataset_keys() {
        assert_eq!(query("taxonKey=212").unwrap().dataset_key, "1:212");
        assert_eq!(
            query("datasetKey=50c9509d-22c7-4a22-a47d-8c48425ef4a7")
                .unwrap()
                .dataset_key,
            "2:50c9509d-22c7-4a22-a47d-8c48425ef4a7"
        );
        assert_eq!(query("country=DK").unwrap().dataset_key, "4:DK");
        assert_eq!(query("publishingCountry=GB").unwrap().dataset_key, "5:GB");
        assert_eq!(
            query("taxonKey=1&country=DK").unwrap_err(),
            ParamError::ConflictingDatasetKeys
        );
        assert_eq!(
            query("publishingOrg=").unwrap_err(),
            ParamError::EmptyDatasetKey("publishingOrg")
        );
    }

    #[test]
    fn test_into_request_only_bins_when_asked() {
        let plain = query("hexPerTile=20").unwrap().into_request();
        assert_eq!(plain.hex_per_tile, None);

        let binned = query("bin=hex&hexPerTile=20&verbose=true").unwrap().into_request();
        assert_eq!(binned.hex_per_tile, Some(20));
        assert!(binned.compose.verbose);
    }
}
