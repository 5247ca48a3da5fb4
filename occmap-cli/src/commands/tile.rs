//! `occmap tile`: compose one tile and write it to a file.
//!
//! Arguments go through the same validation as the HTTP query string, so a
//! tile written here is byte-identical to the one the server would return.

use clap::Args;
use occmap::server::params::{parse_tile_query, QueryParams};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::dataset::DatasetArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

#[derive(Debug, Args)]
pub struct TileArgs {
    /// Zoom level
    #[arg(long)]
    pub z: String,

    /// Tile column
    #[arg(long)]
    pub x: String,

    /// Tile row
    #[arg(long)]
    pub y: String,

    /// Spatial reference, EPSG:3857 (default) or EPSG:4326
    #[arg(long)]
    pub srs: Option<String>,

    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Year or inclusive range, e.g. 1990 or 1990,2000
    #[arg(long)]
    pub year: Option<String>,

    /// Basis of record to include (repeatable)
    #[arg(long = "basis-of-record")]
    pub basis_of_record: Vec<String>,

    /// Keep per-category and per-year properties
    #[arg(long)]
    pub verbose: bool,

    /// Aggregate points into bins (only "hex" is supported)
    #[arg(long)]
    pub bin: Option<String>,

    /// Hexagons across one tile when binning
    #[arg(long)]
    pub hex_per_tile: Option<String>,

    /// Output file
    #[arg(long, short)]
    pub output: PathBuf,
}

impl TileArgs {
    /// The arguments as request query parameters.
    pub fn query_params(&self) -> QueryParams {
        let mut pairs = self.dataset.query_pairs();
        let optional = [
            ("srs", &self.srs),
            ("year", &self.year),
            ("bin", &self.bin),
            ("hexPerTile", &self.hex_per_tile),
        ];
        pairs.extend(
            optional
                .into_iter()
                .filter_map(|(name, value)| value.clone().map(|v| (name, v))),
        );
        pairs.extend(
            self.basis_of_record
                .iter()
                .map(|c| ("basisOfRecord", c.clone())),
        );
        if self.verbose {
            pairs.push(("verbose", "true".to_string()));
        }
        pairs.into_iter().collect()
    }
}

/// Run the tile command.
pub async fn run(runner: &CliRunner, args: TileArgs) -> Result<(), CliError> {
    runner.log_startup("tile");

    let default_hex = runner.config().hex.default_hex_per_tile;
    let request = parse_tile_query(&args.z, &args.x, &args.y, &args.query_params(), default_hex)?
        .into_request();

    let service = runner.create_service()?;
    let tile = service.tile(&request, &CancellationToken::new()).await?;
    info!(
        dataset_key = %request.dataset_key,
        address = %request.compose.address,
        features = tile.feature_count(),
        "Composed tile"
    );

    runner.save(&args.output, tile.bytes())?;
    println!(
        "Wrote {} ({} features, {} bytes)",
        args.output.display(),
        tile.feature_count(),
        tile.bytes().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use occmap::coord::Srs;
    use occmap::server::params::BinMode;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        tile: TileArgs,
    }

    fn parse(args: &[&str]) -> TileArgs {
        let mut argv = vec!["occmap", "--z", "2", "--x", "1", "--y", "1", "-o", "t.mvt"];
        argv.extend_from_slice(args);
        Harness::parse_from(argv).tile
    }

    #[test]
    fn test_arguments_become_query() {
        let args = parse(&[
            "--srs",
            "EPSG:4326",
            "--taxon-key",
            "212",
            "--year",
            "1990,2000",
            "--basis-of-record",
            "PRESERVED_SPECIMEN",
            "--basis-of-record",
            "HUMAN_OBSERVATION",
            "--verbose",
            "--bin",
            "hex",
            "--hex-per-tile",
            "30",
        ]);
        let query = parse_tile_query(&args.z, &args.x, &args.y, &args.query_params(), 51).unwrap();

        assert_eq!(query.dataset_key, "1:212");
        assert_eq!(query.address.srs, Srs::Wgs84);
        assert_eq!(query.filter.years().min(), Some(1990));
        assert_eq!(query.filter.categories().map(|c| c.len()), Some(2));
        assert!(query.verbose);
        assert_eq!(query.bin, Some(BinMode::Hex));
        assert_eq!(query.hex_per_tile, 30);
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        let query = parse_tile_query(&args.z, &args.x, &args.y, &args.query_params(), 51).unwrap();
        assert_eq!(query.address.srs, Srs::WebMercator);
        assert!(!query.verbose);
        assert_eq!(query.bin, None);
        assert_eq!(query.hex_per_tile, 51);
    }

    #[test]
    fn test_invalid_year_rejected() {
        let args = parse(&["--year", "90"]);
        assert!(parse_tile_query(&args.z, &args.x, &args.y, &args.query_params(), 51).is_err());
    }
}
