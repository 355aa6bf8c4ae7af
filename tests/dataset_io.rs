use chw_viz::dataset::{self, Dataset};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

const MAIN_CSV: &str = "\
country,code,year,gdp,life_expectancy
Canada,CAN,2022,43000,82.2
Canada,CAN,2023,44000,82.6
Germany,DEU,2023,54000,81.2
Nigeria,NGA,2023,2200,54.5
No Code,,2023,1000,50.0
Bad Year,BAD,,1000,50.0
Missing GDP,MGD,2023,,70.0
";

const POP_CSV: &str = "\
country,code,year,population
Canada,CAN,2023,39000000
Germany,DEU,2023,83100000
Atlantis,ATL,2023,1
";

const WORLD_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "id": "CAN",
      "properties": {"name": "Canada"},
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-120.0, 50.0], [-100.0, 50.0], [-100.0, 60.0], [-120.0, 60.0], [-120.0, 50.0]]]
      }
    },
    {
      "type": "Feature",
      "id": "DEU",
      "properties": {"name": "Germany"},
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [
          [[[6.0, 47.0], [15.0, 47.0], [15.0, 55.0], [6.0, 55.0], [6.0, 47.0]]]
        ]
      }
    },
    {
      "type": "Feature",
      "id": "PNT",
      "properties": {"name": "Pointland"},
      "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}
    }
  ]
}"#;

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn load_records_skips_incomplete_rows() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "main.csv", MAIN_CSV);
    let records = dataset::load_records(&path).unwrap();

    // Only the four complete rows survive.
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| !r.code.is_empty()));
    assert!(records.iter().all(|r| r.gdp >= 0.0 && r.life_expectancy > 0.0));
}

#[test]
fn duplicate_code_year_rows_collapse_to_the_last() {
    let dir = tempdir().unwrap();
    let csv = "country,code,year,gdp,life_expectancy\nA,AAA,2023,1,50\nA,AAA,2023,2,51\n";
    let path = write_file(&dir, "dup.csv", csv);
    let records = dataset::load_records(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].gdp, 2.0);
}

#[test]
fn empty_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "empty.csv", "country,code,year,gdp,life_expectancy\n");
    assert!(dataset::load_records(&path).is_err());
}

#[test]
fn population_merge_is_a_left_join() {
    let dir = tempdir().unwrap();
    let main = write_file(&dir, "main.csv", MAIN_CSV);
    let pop = write_file(&dir, "pop.csv", POP_CSV);

    let mut records = dataset::load_records(&main).unwrap();
    let matched = dataset::merge_population(&mut records, &pop).unwrap();
    assert_eq!(matched, 2);

    let by_code = |code: &str, year: i32| {
        records
            .iter()
            .find(|r| r.code == code && r.year == year)
            .unwrap()
            .clone()
    };
    assert_eq!(by_code("CAN", 2023).population, Some(39_000_000));
    assert_eq!(by_code("DEU", 2023).population, Some(83_100_000));
    // No 2022 population row: stays None rather than borrowing 2023's value.
    assert_eq!(by_code("CAN", 2022).population, None);
    assert_eq!(by_code("NGA", 2023).population, None);
}

#[test]
fn world_loader_accepts_polygons_and_skips_other_geometries() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "world.geojson", WORLD_GEOJSON);
    let world = dataset::load_world(&path).unwrap();

    assert_eq!(world.shapes.len(), 2);
    assert_eq!(world.shapes[0].code, "CAN");
    assert_eq!(world.shapes[0].name.as_deref(), Some("Canada"));
    assert_eq!(world.shapes[0].rings.len(), 1);
    assert_eq!(world.shapes[1].code, "DEU");
}

#[test]
fn world_loader_rejects_non_collections() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "notfc.json", r#"{"type": "Feature", "features": []}"#);
    assert!(dataset::load_world(&path).is_err());
}

#[test]
fn dataset_lookups() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "main.csv", MAIN_CSV);
    let data = Dataset::new(dataset::load_records(&path).unwrap());

    assert_eq!(data.countries(), vec!["Canada", "Germany", "Nigeria"]);
    assert_eq!(data.years(), vec![2022, 2023]);
    assert_eq!(data.latest_year(), Some(2023));
    assert_eq!(data.for_year(2023).len(), 3);

    let canada = data.for_country("Canada");
    assert_eq!(canada.len(), 2);
    assert!(canada[0].year < canada[1].year);
}
