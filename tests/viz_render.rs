use chw_viz::models::{Attribute, Record};
use chw_viz::selection::{Brush, BrushCoordinator, BrushSource, Range, Selection};
use chw_viz::viz::{self, ChartConfig, ChartKind, Theme};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn sample_records() -> Vec<Record> {
    let rows = [
        ("Canada", "CAN", 44_000.0, 82.6, Some(39_000_000)),
        ("Germany", "DEU", 54_000.0, 81.2, Some(83_100_000)),
        ("Nigeria", "NGA", 2_200.0, 54.5, Some(218_000_000)),
        ("Japan", "JPN", 34_000.0, 84.8, Some(125_000_000)),
        ("Brazil", "BRA", 9_600.0, 73.4, None),
    ];
    rows.iter()
        .map(|(country, code, gdp, life, population)| Record {
            country: country.to_string(),
            code: code.to_string(),
            year: 2023,
            gdp: *gdp,
            life_expectancy: *life,
            population: *population,
        })
        .collect()
}

fn cfg(kind: ChartKind) -> ChartConfig {
    ChartConfig::for_kind(kind, Theme::Light)
}

#[test]
fn histogram_renders_for_each_attribute() {
    let dir = tempdir().unwrap();
    let records = sample_records();
    for (i, attr) in Attribute::ALL.iter().enumerate() {
        let path = dir.path().join(format!("hist{i}.svg"));
        viz::histogram::render(
            &records,
            *attr,
            &Selection::All,
            &cfg(ChartKind::GdpHistogram),
            &path,
        )
        .unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0, "svg has content");
    }
}

#[test]
fn scatter_and_trend_render_files() {
    let dir = tempdir().unwrap();
    let records = sample_records();

    let scatter = dir.path().join("scatter.svg");
    viz::scatter::render(&records, &Selection::All, &cfg(ChartKind::Scatter), &scatter).unwrap();
    assert!(fs::metadata(&scatter).unwrap().len() > 0);

    let year = dir.path().join("year.svg");
    viz::scatter::render_year(
        &records,
        2023,
        Some("Canada"),
        &cfg(ChartKind::YearScatter),
        &year,
    )
    .unwrap();
    assert!(fs::metadata(&year).unwrap().len() > 0);

    let trend = dir.path().join("trend.svg");
    viz::trend::render(
        &records,
        "Canada",
        Some(2023),
        &cfg(ChartKind::Trend),
        &trend,
    )
    .unwrap();
    assert!(fs::metadata(&trend).unwrap().len() > 0);
}

#[test]
fn all_themes_render() {
    let dir = tempdir().unwrap();
    let records = sample_records();
    for (i, theme) in [Theme::Light, Theme::Dark, Theme::Muted].iter().enumerate() {
        let path = dir.path().join(format!("theme{i}.svg"));
        let cfg = ChartConfig::for_kind(ChartKind::Scatter, *theme);
        viz::scatter::render(&records, &Selection::All, &cfg, &path).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }
}

#[test]
fn rendering_twice_is_byte_identical() {
    let dir = tempdir().unwrap();
    let records = sample_records();

    let mut brushes = BrushCoordinator::new();
    brushes.update(
        BrushSource::GdpHistogram,
        Some(Brush::Interval(
            Attribute::Gdp,
            Range::new(5_000.0, 50_000.0),
        )),
    );
    let selection = brushes.selection(&records);

    let a = dir.path().join("a.svg");
    let b = dir.path().join("b.svg");
    viz::scatter::render(&records, &selection, &cfg(ChartKind::Scatter), &a).unwrap();
    viz::scatter::render(&records, &selection, &cfg(ChartKind::Scatter), &b).unwrap();
    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());

    let c = dir.path().join("c.svg");
    let d = dir.path().join("d.svg");
    viz::histogram::render(&records, Attribute::Gdp, &selection, &cfg(ChartKind::GdpHistogram), &c)
        .unwrap();
    viz::histogram::render(&records, Attribute::Gdp, &selection, &cfg(ChartKind::GdpHistogram), &d)
        .unwrap();
    assert_eq!(fs::read(&c).unwrap(), fs::read(&d).unwrap());
}

#[test]
fn selection_changes_emphasis_but_not_structure() {
    let dir = tempdir().unwrap();
    let records = sample_records();

    let mut brushes = BrushCoordinator::new();
    brushes.update(
        BrushSource::LifeHistogram,
        Some(Brush::Interval(
            Attribute::LifeExpectancy,
            Range::new(80.0, 90.0),
        )),
    );
    let selection = brushes.selection(&records);
    assert_eq!(selection.count(records.len()), 3);

    let all = dir.path().join("all.svg");
    let brushed = dir.path().join("brushed.svg");
    viz::scatter::render(&records, &Selection::All, &cfg(ChartKind::Scatter), &all).unwrap();
    viz::scatter::render(&records, &selection, &cfg(ChartKind::Scatter), &brushed).unwrap();

    let all_svg = fs::read_to_string(&all).unwrap();
    let brushed_svg = fs::read_to_string(&brushed).unwrap();
    // Dimming changes the picture...
    assert_ne!(all_svg, brushed_svg);
    // ...but not the mark count: one circle per record either way.
    assert_eq!(
        all_svg.matches("<circle").count(),
        brushed_svg.matches("<circle").count()
    );
}

#[test]
fn empty_input_is_an_error() {
    let dir = tempdir().unwrap();
    let records: Vec<Record> = vec![];
    let path: PathBuf = dir.path().join("empty.svg");
    assert!(
        viz::histogram::render(
            &records,
            Attribute::Gdp,
            &Selection::All,
            &cfg(ChartKind::GdpHistogram),
            &path
        )
        .is_err()
    );
    assert!(
        viz::scatter::render(&records, &Selection::All, &cfg(ChartKind::Scatter), &path).is_err()
    );
}

#[test]
fn year_without_data_renders_placeholder() {
    let dir = tempdir().unwrap();
    let records = sample_records();
    let path = dir.path().join("missing_year.svg");
    viz::scatter::render_year(&records, 1888, None, &cfg(ChartKind::YearScatter), &path).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("No data for selected year."));
}

#[test]
fn unknown_country_renders_placeholder() {
    let dir = tempdir().unwrap();
    let records = sample_records();
    let path = dir.path().join("missing_country.svg");
    viz::trend::render(&records, "Atlantis", None, &cfg(ChartKind::Trend), &path).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("No data for selected country."));
}
