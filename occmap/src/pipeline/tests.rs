//! Tests for tile composition

use super::*;
use crate::config::TileConfig;
use crate::coord::{Srs, TileAddress};
use crate::filter::{FilterSpec, YearRange};
use crate::storage::{PointFeature, PointFeatures, StoredRepresentation};
use crate::tile::{
    decode_tile, encode_tile, geometry, DecodedLayer, GeomType, LayerBuilder, PropertyValue,
    ATTR_BASIS_OF_RECORD, ATTR_TOTAL, ATTR_YEAR, LAYER_OCCURRENCE,
};
use proptest::prelude::*;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn composer() -> FeatureComposer {
    FeatureComposer::new(Arc::new(TileConfig::default()))
}

fn world_mercator() -> TileAddress {
    TileAddress::new(0, 0, 0, Srs::WebMercator).unwrap()
}

fn points(features: Vec<PointFeature>) -> StoredRepresentation {
    StoredRepresentation::Points(PointFeatures { features })
}

fn compose(stored: &StoredRepresentation, request: &ComposeRequest) -> crate::tile::ComposedTile {
    composer()
        .compose(stored, request, &CancellationToken::new())
        .unwrap()
}

fn single_layer(bytes: &[u8]) -> DecodedLayer {
    let mut layers = decode_tile(bytes).unwrap();
    assert_eq!(layers.len(), 1);
    layers.remove(0)
}

/// A stored tile with one layer per category, each holding point features
/// tagged with a year and a total.
fn pretiled(layers: &[(&str, &[(i32, i32, Option<i64>)])]) -> StoredRepresentation {
    let built = layers.iter().filter_map(|(name, features)| {
        let mut builder = LayerBuilder::new(*name, 512, 64);
        for &(x, y, year) in features.iter() {
            let total = PropertyValue::Int(3);
            let category = PropertyValue::from(*name);
            let year = year.map(PropertyValue::Int);
            let mut properties = vec![(ATTR_TOTAL, &total), (ATTR_BASIS_OF_RECORD, &category)];
            if let Some(year) = &year {
                properties.push((ATTR_YEAR, year));
            }
            builder.add_point(x, y, properties);
        }
        builder.build()
    });
    StoredRepresentation::PreTiled(encode_tile(built))
}

#[test]
fn test_absent_dataset_gives_empty_tile() {
    let tile = compose(&StoredRepresentation::Absent, &ComposeRequest::new(world_mercator()));
    assert!(tile.is_empty());
    assert!(tile.bytes().is_empty());
    assert!(decode_tile(tile.bytes()).unwrap().is_empty());
}

#[test]
fn test_filtered_out_points_give_valid_empty_tile() {
    let stored = points(vec![PointFeature::new(10.0, 10.0, Some(1990), "OBSERVATION")]);
    let request = ComposeRequest::new(world_mercator())
        .with_filter(FilterSpec::all().with_years(YearRange::exact(2000)));

    let tile = compose(&stored, &request);
    assert_eq!(tile.feature_count(), 0);
    assert!(decode_tile(tile.bytes()).unwrap().is_empty());
}

#[test]
fn test_points_written_individually_at_high_resolution() {
    let stored = points(vec![
        PointFeature::new(0.0, 0.0, Some(2001), "OBSERVATION"),
        PointFeature::new(0.0, 0.0, Some(2001), "OBSERVATION"),
    ]);

    let tile = compose(&stored, &ComposeRequest::new(world_mercator()));
    let layer = single_layer(tile.bytes());

    assert_eq!(layer.name, LAYER_OCCURRENCE);
    assert_eq!(layer.extent, 4096);
    assert_eq!(layer.features.len(), 2);
    assert_eq!(layer.features[0].points().unwrap(), vec![(2048, 2048)]);
}

#[test]
fn test_non_verbose_keeps_only_total() {
    let stored = points(vec![PointFeature::new(51.5, -0.1, Some(2015), "HUMAN_OBSERVATION")]);

    let tile = compose(&stored, &ComposeRequest::new(world_mercator()));
    let feature = &single_layer(tile.bytes()).features[0];

    assert_eq!(feature.properties, vec![(ATTR_TOTAL.to_string(), PropertyValue::Int(1))]);
}

#[test]
fn test_verbose_keeps_full_attributes() {
    let stored = points(vec![PointFeature::new(51.5, -0.1, Some(2015), "HUMAN_OBSERVATION")]);
    let request = ComposeRequest::new(world_mercator()).with_verbose(true);

    let tile = compose(&stored, &request);
    let feature = &single_layer(tile.bytes()).features[0];

    assert_eq!(feature.property(ATTR_TOTAL), Some(&PropertyValue::Int(1)));
    assert_eq!(
        feature.property(ATTR_BASIS_OF_RECORD),
        Some(&PropertyValue::from("HUMAN_OBSERVATION"))
    );
    assert_eq!(feature.property(ATTR_YEAR), Some(&PropertyValue::Int(2015)));
}

#[test]
fn test_points_beyond_mercator_limit_skipped() {
    let stored = points(vec![
        PointFeature::new(89.0, 0.0, None, "OBSERVATION"),
        PointFeature::new(-88.0, 0.0, None, "OBSERVATION"),
        PointFeature::new(85.0, 0.0, None, "OBSERVATION"),
    ]);

    let tile = compose(&stored, &ComposeRequest::new(world_mercator()));
    assert_eq!(tile.feature_count(), 1);
}

#[test]
fn test_points_outside_tile_and_buffer_dropped() {
    // Zoom 1, north-west quadrant: only the first point falls inside.
    let address = TileAddress::new(1, 0, 0, Srs::WebMercator).unwrap();
    let stored = points(vec![
        PointFeature::new(45.0, -90.0, None, "OBSERVATION"),
        PointFeature::new(-45.0, 90.0, None, "OBSERVATION"),
    ]);

    let tile = compose(&stored, &ComposeRequest::new(address));
    assert_eq!(tile.feature_count(), 1);
}

#[test]
fn test_buffer_includes_neighbouring_points() {
    // Just east of the tile edge, inside the quarter-tile buffer.
    let address = TileAddress::new(1, 0, 0, Srs::WebMercator).unwrap();
    let stored = points(vec![PointFeature::new(45.0, 5.0, None, "OBSERVATION")]);

    let tile = compose(&stored, &ComposeRequest::new(address));
    let layer = single_layer(tile.bytes());
    let (x, _) = layer.features[0].points().unwrap()[0];
    assert!(x > 4096 && x < 4096 + 1024);
}

#[test]
fn test_wgs84_halves_split_at_antimeridian() {
    let west = TileAddress::new(0, 0, 0, Srs::Wgs84).unwrap();
    let east = TileAddress::new(0, 1, 0, Srs::Wgs84).unwrap();
    let stored = points(vec![
        PointFeature::new(0.0, -90.0, None, "OBSERVATION"),
        PointFeature::new(0.0, 90.0, None, "OBSERVATION"),
        PointFeature::new(0.0, 120.0, None, "OBSERVATION"),
    ]);

    assert_eq!(compose(&stored, &ComposeRequest::new(west)).feature_count(), 1);
    assert_eq!(compose(&stored, &ComposeRequest::new(east)).feature_count(), 2);

    let layer = single_layer(compose(&stored, &ComposeRequest::new(east)).bytes());
    assert_eq!(layer.features[0].points().unwrap(), vec![(2048, 2048)]);
}

#[test]
fn test_antimeridian_wrap_into_buffer() {
    // A point at 179.9 E shows in the buffer west of the tile at 180 W.
    let west = TileAddress::new(0, 0, 0, Srs::Wgs84).unwrap();
    let stored = points(vec![PointFeature::new(0.0, 179.9, None, "OBSERVATION")]);

    let layer = single_layer(compose(&stored, &ComposeRequest::new(west)).bytes());
    let (x, _) = layer.features[0].points().unwrap()[0];
    assert!(x < 0 && x >= -1024);
}

#[test]
fn test_category_filter_on_points() {
    let stored = points(vec![
        PointFeature::new(0.0, 0.0, None, "OBSERVATION"),
        PointFeature::new(0.0, 0.0, None, "PRESERVED_SPECIMEN"),
        PointFeature::new(0.0, 0.0, None, "FOSSIL_SPECIMEN"),
    ]);
    let request = ComposeRequest::new(world_mercator()).with_filter(
        FilterSpec::all().with_categories(["PRESERVED_SPECIMEN", "FOSSIL_SPECIMEN"]),
    );

    assert_eq!(compose(&stored, &request).feature_count(), 2);
}

#[test]
fn test_composition_is_deterministic() {
    let stored = points(
        (0..200)
            .map(|i| {
                PointFeature::new(
                    (i as f64 * 0.7) % 80.0,
                    (i as f64 * 1.3) % 170.0,
                    Some(1900 + i % 100),
                    if i % 2 == 0 { "OBSERVATION" } else { "LIVING_SPECIMEN" },
                )
            })
            .collect(),
    );
    let request = ComposeRequest::new(world_mercator()).with_verbose(true);

    let first = compose(&stored, &request);
    let second = compose(&stored, &request);
    assert_eq!(first, second);
    assert_eq!(first.feature_count(), 200);
}

#[test]
fn test_pretiled_category_selects_layers() {
    let stored = pretiled(&[
        ("OBSERVATION", &[(10, 10, Some(2000))]),
        ("PRESERVED_SPECIMEN", &[(20, 20, Some(2001)), (30, 30, Some(2002))]),
    ]);
    let request = ComposeRequest::new(world_mercator())
        .with_filter(FilterSpec::all().with_categories(["PRESERVED_SPECIMEN"]))
        .with_verbose(true);

    let layer = single_layer(compose(&stored, &request).bytes());
    assert_eq!(layer.name, LAYER_OCCURRENCE);
    assert_eq!(layer.extent, 512);
    assert_eq!(layer.features.len(), 2);
    for feature in &layer.features {
        assert_eq!(
            feature.property(ATTR_BASIS_OF_RECORD),
            Some(&PropertyValue::from("PRESERVED_SPECIMEN"))
        );
    }
}

#[test]
fn test_pretiled_without_category_filter_merges_all_layers() {
    let stored = pretiled(&[
        ("OBSERVATION", &[(10, 10, None)]),
        ("PRESERVED_SPECIMEN", &[(20, 20, None)]),
    ]);

    let tile = compose(&stored, &ComposeRequest::new(world_mercator()));
    let layer = single_layer(tile.bytes());
    assert_eq!(layer.features.len(), 2);
    // Stored layer order is kept.
    assert_eq!(layer.features[0].points().unwrap(), vec![(10, 10)]);
    assert_eq!(layer.features[1].points().unwrap(), vec![(20, 20)]);
}

#[test]
fn test_pretiled_year_filter() {
    let stored = pretiled(&[(
        "OBSERVATION",
        &[(1, 1, Some(1999)), (2, 2, Some(2005)), (3, 3, None), (4, 4, Some(2010))],
    )]);
    let years = YearRange::new(Some(2000), Some(2010)).unwrap();
    let request =
        ComposeRequest::new(world_mercator()).with_filter(FilterSpec::all().with_years(years));

    let layer = single_layer(compose(&stored, &request).bytes());
    let kept: Vec<_> = layer
        .features
        .iter()
        .map(|f| f.points().unwrap()[0])
        .collect();
    assert_eq!(kept, vec![(2, 2), (4, 4)]);
}

#[test]
fn test_pretiled_non_verbose_keeps_only_total() {
    let stored = pretiled(&[("OBSERVATION", &[(5, 5, Some(2000))])]);

    let layer = single_layer(compose(&stored, &ComposeRequest::new(world_mercator())).bytes());
    assert_eq!(
        layer.features[0].properties,
        vec![(ATTR_TOTAL.to_string(), PropertyValue::Int(3))]
    );
}

#[test]
fn test_pretiled_keeps_polygons() {
    let mut builder = LayerBuilder::new("OBSERVATION", 512, 64);
    let total = PropertyValue::Int(7);
    builder.add_feature(
        GeomType::Polygon,
        geometry::polygon(&[(0, 0), (10, 0), (10, 10)]),
        [(ATTR_TOTAL, &total)],
    );
    let stored = StoredRepresentation::PreTiled(encode_tile(builder.build()));

    let layer = single_layer(compose(&stored, &ComposeRequest::new(world_mercator())).bytes());
    assert_eq!(layer.features[0].geom_type, GeomType::Polygon);
}

#[test]
fn test_pretiled_unknown_category_matches_nothing() {
    let stored = pretiled(&[("OBSERVATION", &[(5, 5, None)])]);
    let request = ComposeRequest::new(world_mercator())
        .with_filter(FilterSpec::all().with_categories(["NOT_A_CATEGORY"]));

    assert!(compose(&stored, &request).is_empty());
}

#[test]
fn test_corrupt_pretiled_payload() {
    let stored = StoredRepresentation::PreTiled(vec![0xff, 0xff, 0xff]);

    let result =
        composer().compose(&stored, &ComposeRequest::new(world_mercator()), &CancellationToken::new());
    assert!(matches!(result, Err(ComposeError::CorruptTile { .. })));
}

#[test]
fn test_overflowing_pretiled_geometry_is_corruption() {
    let mut builder = LayerBuilder::new("PRESERVED_SPECIMEN", 512, 64);
    let total = PropertyValue::Int(1);
    builder.add_feature(
        GeomType::Point,
        vec![17, geometry::zigzag(i32::MAX), 0, geometry::zigzag(1), 0],
        [(ATTR_TOTAL, &total)],
    );
    let stored = StoredRepresentation::PreTiled(encode_tile(builder.build()));

    let result =
        composer().compose(&stored, &ComposeRequest::new(world_mercator()), &CancellationToken::new());
    assert!(matches!(result, Err(ComposeError::CorruptTile { .. })));
}

#[test]
fn test_cancelled_token_stops_composition() {
    let token = CancellationToken::new();
    token.cancel();
    let stored = points(vec![PointFeature::new(0.0, 0.0, None, "OBSERVATION")]);

    let result = composer().compose(&stored, &ComposeRequest::new(world_mercator()), &token);
    assert!(matches!(result, Err(ComposeError::Cancelled)));

    let stored = pretiled(&[("OBSERVATION", &[(5, 5, None)])]);
    let result = composer().compose(&stored, &ComposeRequest::new(world_mercator()), &token);
    assert!(matches!(result, Err(ComposeError::Cancelled)));
}

fn arb_point() -> impl Strategy<Value = PointFeature> {
    (
        -85.0f64..85.0,
        -180.0f64..180.0,
        proptest::option::of(1800i32..2030),
        prop::sample::select(vec!["OBSERVATION", "PRESERVED_SPECIMEN", "MACHINE_OBSERVATION"]),
    )
        .prop_map(|(lat, lng, year, category)| PointFeature::new(lat, lng, year, category))
}

proptest! {
    /// With no filter, every plottable point appears at zoom 0.
    #[test]
    fn identity_filter_keeps_every_point(features in prop::collection::vec(arb_point(), 0..200)) {
        let expected = features.len();
        let tile = compose(&points(features), &ComposeRequest::new(world_mercator()));
        prop_assert_eq!(tile.feature_count(), expected);
    }

    /// Every feature in the output carries a year inside the requested range.
    #[test]
    fn output_years_lie_in_range(
        features in prop::collection::vec(arb_point(), 0..200),
        start in 1800i32..2030,
        span in 0i32..50,
    ) {
        let years = YearRange::new(Some(start), Some(start + span)).unwrap();
        let expected = features.iter().filter(|f| years.contains(f.year)).count();
        let request = ComposeRequest::new(world_mercator())
            .with_filter(FilterSpec::all().with_years(years))
            .with_verbose(true);

        let tile = compose(&points(features), &request);
        prop_assert_eq!(tile.feature_count(), expected);

        for layer in decode_tile(tile.bytes()).unwrap() {
            for feature in layer.features {
                let year = feature.property(ATTR_YEAR).and_then(PropertyValue::as_i64);
                prop_assert!(year.is_some());
                let year = year.unwrap();
                prop_assert!(year >= start as i64 && year <= (start + span) as i64);
            }
        }
    }
}
