use chw_viz::dataset::{CountryShape, WorldMap};
use chw_viz::models::{Attribute, Record};
use chw_viz::selection::{Brush, BrushCoordinator, BrushSource, Range, Selection};
use chw_viz::viz::{self, ChartConfig, ChartKind, Theme};
use std::fs;
use tempfile::tempdir;

fn sample_world() -> WorldMap {
    let square = |x0: f64, y0: f64| vec![(x0, y0), (x0 + 8.0, y0), (x0 + 8.0, y0 + 8.0), (x0, y0 + 8.0)];
    WorldMap {
        shapes: vec![
            CountryShape {
                code: "CAN".into(),
                name: Some("Canada".into()),
                rings: vec![square(-110.0, 50.0)],
            },
            CountryShape {
                code: "DEU".into(),
                name: Some("Germany".into()),
                rings: vec![square(6.0, 47.0)],
            },
            CountryShape {
                code: "XXX".into(),
                name: Some("Terra Incognita".into()),
                rings: vec![square(30.0, -20.0)],
            },
        ],
    }
}

fn sample_records() -> Vec<Record> {
    vec![
        Record {
            country: "Canada".into(),
            code: "CAN".into(),
            year: 2023,
            gdp: 44_000.0,
            life_expectancy: 82.6,
            population: Some(39_000_000),
        },
        Record {
            country: "Germany".into(),
            code: "DEU".into(),
            year: 2023,
            gdp: 54_000.0,
            life_expectancy: 81.2,
            population: Some(83_100_000),
        },
    ]
}

fn attr_values(svg: &str, attr: &str) -> Vec<String> {
    let needle = format!("{attr}=\"");
    svg.match_indices(&needle)
        .map(|(i, _)| {
            let rest = &svg[i + needle.len()..];
            rest[..rest.find('"').unwrap()].to_string()
        })
        .collect()
}

fn cfg() -> ChartConfig {
    ChartConfig::for_kind(ChartKind::Choropleth, Theme::Light)
}

#[test]
fn choropleth_renders_with_no_data_fill_for_unknown_codes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("map.svg");
    viz::choropleth::render(
        &sample_world(),
        &sample_records(),
        Attribute::Gdp,
        &Selection::All,
        &cfg(),
        &path,
    )
    .unwrap();
    let svg = fs::read_to_string(&path).unwrap();

    // One filled polygon per ring; XXX has no record so it keeps the neutral
    // fill, distinct from both ramp fills.
    let polygons = attr_values(&svg, "points");
    assert!(polygons.len() >= 3);
    let fills: Vec<String> = attr_values(&svg, "fill");
    let unique: std::collections::BTreeSet<&String> = fills.iter().collect();
    assert!(unique.len() >= 3, "expected ramp fills plus a no-data fill");
}

#[test]
fn toggling_the_attribute_keeps_the_geometry() {
    let dir = tempdir().unwrap();
    let world = sample_world();
    let records = sample_records();

    let gdp_path = dir.path().join("gdp.svg");
    let life_path = dir.path().join("life.svg");
    viz::choropleth::render(&world, &records, Attribute::Gdp, &Selection::All, &cfg(), &gdp_path)
        .unwrap();
    viz::choropleth::render(
        &world,
        &records,
        Attribute::LifeExpectancy,
        &Selection::All,
        &cfg(),
        &life_path,
    )
    .unwrap();

    let gdp_svg = fs::read_to_string(&gdp_path).unwrap();
    let life_svg = fs::read_to_string(&life_path).unwrap();

    // Same projection, same outlines: every positioned point is identical.
    assert_eq!(
        attr_values(&gdp_svg, "points"),
        attr_values(&life_svg, "points")
    );
    // Only the color encoding (and legend labels) changed.
    assert_ne!(
        attr_values(&gdp_svg, "fill"),
        attr_values(&life_svg, "fill")
    );
}

#[test]
fn brushed_selection_dims_without_moving_countries() {
    let dir = tempdir().unwrap();
    let world = sample_world();
    let records = sample_records();

    let mut brushes = BrushCoordinator::new();
    brushes.update(
        BrushSource::GdpHistogram,
        Some(Brush::Interval(
            Attribute::Gdp,
            Range::new(50_000.0, 60_000.0),
        )),
    );
    let selection = brushes.selection(&records);
    assert!(selection.contains("DEU"));
    assert!(!selection.contains("CAN"));

    let all_path = dir.path().join("all.svg");
    let sel_path = dir.path().join("sel.svg");
    viz::choropleth::render(&world, &records, Attribute::Gdp, &Selection::All, &cfg(), &all_path)
        .unwrap();
    viz::choropleth::render(&world, &records, Attribute::Gdp, &selection, &cfg(), &sel_path)
        .unwrap();

    let all_svg = fs::read_to_string(&all_path).unwrap();
    let sel_svg = fs::read_to_string(&sel_path).unwrap();
    assert_ne!(all_svg, sel_svg);
    assert_eq!(
        attr_values(&all_svg, "points"),
        attr_values(&sel_svg, "points")
    );
}

#[test]
fn choropleth_is_idempotent() {
    let dir = tempdir().unwrap();
    let world = sample_world();
    let records = sample_records();
    let a = dir.path().join("a.svg");
    let b = dir.path().join("b.svg");
    viz::choropleth::render(&world, &records, Attribute::Gdp, &Selection::All, &cfg(), &a).unwrap();
    viz::choropleth::render(&world, &records, Attribute::Gdp, &Selection::All, &cfg(), &b).unwrap();
    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn empty_world_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.svg");
    let world = WorldMap { shapes: vec![] };
    assert!(
        viz::choropleth::render(
            &world,
            &sample_records(),
            Attribute::Gdp,
            &Selection::All,
            &cfg(),
            &path
        )
        .is_err()
    );
}
