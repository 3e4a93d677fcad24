// Integration tests for the coverage pipeline:
//   area scoping, catchment matching with deduplication, per-axis tables,
//   zero-population placeholders, area selection, parallel determinism and
//   error context for malformed geometry and counts.

use geo::{polygon, MultiPolygon};
use polars::prelude::*;

use transitcover::{
    compute_coverage, compute_records, AreaTable, Axis, CoverageConfig, CoverageInputs, DisabilityTable,
    PopulationTable, Series, ServedMetrics, StopTable, UnitMeasure,
};

const EPSG: u32 = 27700;

fn square(x0: f64, y0: f64, size: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![polygon![
        (x: x0, y: y0),
        (x: x0 + size, y: y0),
        (x: x0 + size, y: y0 + size),
        (x: x0, y: y0 + size),
        (x: x0, y: y0),
    ]])
}

fn config() -> CoverageConfig {
    CoverageConfig { radius_m: 250.0, age_boundaries: vec![0, 18, 65], ..CoverageConfig::default() }
}

/// Units A (100, in), B (50, out) and C (30, inside two catchments) in area "Exeter";
/// unit D (40, in) in area "Rutland".
fn population_frame() -> DataFrame {
    df!(
        "area_code" => ["A", "B", "C", "D"],
        "total_pop" => [100i64, 50, 30, 40],
        "male" => [40i64, 25, 10, 20],
        "female" => [60i64, 25, 20, 20],
        "0-17" => [20i64, 10, 5, 10],
        "18-64" => [60i64, 30, 20, 20],
        "65+" => [20i64, 10, 5, 10],
        "urban_rural" => ["Urban city and town", "Rural village", "Urban major conurbation", "Urban city and town"],
        "easting" => [100.0, 900.0, 300.0, 1500.0],
        "northing" => [100.0, 900.0, 100.0, 1500.0],
    ).unwrap()
}

fn inputs() -> CoverageInputs {
    let population = population_frame();

    let stops = df!(
        "stop_id" => ["s1", "s2", "s3", "s4"],
        "capacity" => ["low", "low", "high", "low"],
        "highly_serviced" => [true, true, true, false],
        "easting" => [100.0, 300.0, 1500.0, 900.0],
        "northing" => [100.0, 300.0, 1500.0, 900.0],
    ).unwrap();

    let disability = df!(
        "area_code" => ["A", "B", "C", "D"],
        "disabled" => [0.2, 0.1, 0.5, 0.25],
        "non_disabled" => [0.8, 0.9, 0.5, 0.75],
    ).unwrap();

    CoverageInputs {
        population: PopulationTable::from_coordinates(population, "easting", "northing", EPSG).unwrap(),
        stops: StopTable::from_coordinates(stops, "easting", "northing", EPSG).unwrap(),
        areas: AreaTable::new(
            vec!["Exeter".into(), "Rutland".into()],
            vec![square(0.0, 0.0, 1000.0), square(1000.0, 1000.0, 1000.0)],
            EPSG,
        ).unwrap(),
        disability: DisabilityTable::from_dataframe(disability).unwrap(),
    }
}

fn metrics(coverage: &transitcover::AreaCoverage, axis: Axis, label: &str) -> ServedMetrics {
    *coverage.table(axis).unwrap().get(label).unwrap()
}

#[test]
fn units_in_several_catchments_are_counted_once() {
    let coverages = compute_coverage(inputs(), &config()).unwrap();
    let exeter = &coverages[0];

    let total = metrics(exeter, Axis::Total, "Total");
    assert_eq!((total.total, total.served, total.unserved), (180, 130, 50));
    assert_eq!(total.pct_served, Some(72.22));
    assert_eq!(total.pct_unserved, Some(27.78));
}

#[test]
fn every_axis_conserves_population() {
    let coverages = compute_coverage(inputs(), &config()).unwrap();
    for coverage in &coverages {
        for (_, table) in &coverage.tables {
            for (label, m) in table.iter() {
                assert_eq!(m.served + m.unserved, m.total, "{} {label}", coverage.area);
                if let (Some(s), Some(u)) = (m.pct_served, m.pct_unserved) {
                    assert!((s + u - 100.0).abs() < 0.011, "{} {label}: {s} + {u}", coverage.area);
                }
            }
        }
    }
}

#[test]
fn sub_population_axes() {
    let coverages = compute_coverage(inputs(), &config()).unwrap();
    let exeter = &coverages[0];

    let male = metrics(exeter, Axis::Sex, "Male");
    assert_eq!((male.total, male.served), (75, 50));

    let ages = exeter.table(Axis::Age).unwrap().labels().collect::<Vec<_>>();
    assert_eq!(ages, vec!["0-17", "18-64", "65+"]);
    assert_eq!(metrics(exeter, Axis::Age, "65+").served, 25);

    // 20 + 5 + 15 disabled, of whom A and C are served
    let disabled = metrics(exeter, Axis::Disability, "Disabled");
    assert_eq!((disabled.total, disabled.served), (40, 35));
    assert_eq!(disabled.pct_served, Some(87.5));
    let non_disabled = metrics(exeter, Axis::Disability, "Non-disabled");
    assert_eq!((non_disabled.total, non_disabled.served), (140, 95));
    assert_eq!(non_disabled.pct_served, Some(67.86));
}

#[test]
fn urban_rural_split() {
    let coverages = compute_coverage(inputs(), &config()).unwrap();
    let exeter = &coverages[0];

    let urban = metrics(exeter, Axis::UrbanRural, "Urban");
    assert_eq!((urban.total, urban.served, urban.pct_served), (130, 130, Some(100.0)));
    let rural = metrics(exeter, Axis::UrbanRural, "Rural");
    assert_eq!((rural.total, rural.served, rural.pct_served), (50, 0, Some(0.0)));

    // Rutland has no rural units at all
    let rural = metrics(&coverages[1], Axis::UrbanRural, "Rural");
    assert_eq!((rural.total, rural.pct_served, rural.pct_unserved), (0, None, None));
}

#[test]
fn unserviced_stops_do_not_serve() {
    // s4 sits on unit B but is not highly serviced
    let coverages = compute_coverage(inputs(), &config()).unwrap();
    assert_eq!(metrics(&coverages[0], Axis::Total, "Total").served, 130);
    assert_eq!(metrics(&coverages[1], Axis::Total, "Total").served, 40);
}

#[test]
fn high_capacity_radius_extends_catchments() {
    let mut inputs = inputs();
    let stops = df!(
        "stop_id" => ["s1"],
        "capacity" => ["high"],
        "highly_serviced" => [true],
        "easting" => [100.0],
        "northing" => [100.0],
    ).unwrap();
    inputs.stops = StopTable::from_coordinates(stops, "easting", "northing", EPSG).unwrap();

    let low = compute_coverage(inputs.clone(), &config()).unwrap();
    assert_eq!(metrics(&low[0], Axis::Total, "Total").served, 130);

    let config = CoverageConfig { high_capacity_radius_m: Some(1500.0), ..config() };
    let high = compute_coverage(inputs, &config).unwrap();
    assert_eq!(metrics(&high[0], Axis::Total, "Total").served, 180);
}

#[test]
fn missing_disability_proportions_give_placeholder_percentages() {
    let mut inputs = inputs();
    inputs.disability = DisabilityTable::default();

    let records = compute_records(inputs, &config()).unwrap();
    let disabled = records.iter()
        .filter(|r| r.area == "Exeter" && r.axis == Axis::Disability && r.unit_measure == UnitMeasure::Percent)
        .map(|r| r.value.as_str())
        .collect::<Vec<_>>();
    assert_eq!(disabled, vec!["None"; 4]);
}

#[test]
fn records_are_in_area_then_axis_order() {
    let records = compute_records(inputs(), &config()).unwrap();

    // Total 1 + 4, age 3 x 4, sex 2 x 4, disability 2 x 4, urban/rural 2 x 4
    assert_eq!(records.len(), 2 * 41);
    assert!(records[..41].iter().all(|r| r.area == "Exeter"));
    assert!(records[41..].iter().all(|r| r.area == "Rutland"));

    let first = &records[0];
    assert_eq!((first.axis, first.series, first.value.as_str()), (Axis::Total, Series::Blank, "180"));
    assert_eq!(records[40].axis, Axis::UrbanRural);
}

#[test]
fn area_selection() {
    let config = CoverageConfig { areas: vec!["Rutland".into()], ..config() };
    let coverages = compute_coverage(inputs(), &config).unwrap();
    assert_eq!(coverages.len(), 1);
    assert_eq!(coverages[0].area, "Rutland");

    let config = CoverageConfig { areas: vec!["Atlantis".into()], ..config };
    let err = compute_coverage(inputs(), &config).unwrap_err();
    assert!(format!("{err:#}").contains("Atlantis"));
}

#[test]
fn parallel_runs_are_deterministic() {
    let first = compute_records(inputs(), &config()).unwrap();
    for _ in 0..4 {
        assert_eq!(compute_records(inputs(), &config()).unwrap(), first);
    }
}

#[test]
fn failing_area_is_reported_with_context() {
    let mut inputs = inputs();
    let population = df!(
        "area_code" => ["A", "B"],
        "total_pop" => [100i64, 50],
        "male" => [50i64, 25],
        "female" => [50i64, 25],
        "0-17" => [20i64, 10],
        "18-64" => [60i64, 30],
        "65+" => [20i64, 10],
        "urban_rural" => ["Urban city and town", "Suburban"],
        "easting" => [100.0, 1500.0],
        "northing" => [100.0, 1500.0],
    ).unwrap();
    inputs.population = PopulationTable::from_coordinates(population, "easting", "northing", EPSG).unwrap();

    let err = compute_coverage(inputs, &config()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("area `Rutland`: axis `Urban/Rural`"), "{message}");
    assert!(message.contains("Suburban"), "{message}");
}

#[test]
fn malformed_counts_fail_with_axis_and_category() {
    let mut inputs = inputs();
    let mut population = population_frame();
    population.with_column(Column::new("male".into(), ["40", "25", "x", "20"])).unwrap();
    inputs.population = PopulationTable::from_coordinates(population, "easting", "northing", EPSG).unwrap();

    let err = compute_coverage(inputs, &config()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("area `Exeter`: axis `Sex`: category `Male`"), "{message}");
    assert!(message.contains("row 2"), "{message}");
}

#[test]
fn null_centroid_fails_the_area() {
    let mut inputs = inputs();
    let mut centroids = inputs.population.centroids().to_vec();
    centroids[1] = None;
    inputs.population = PopulationTable::new(inputs.population.data().clone(), centroids, EPSG).unwrap();

    let err = compute_coverage(inputs, &config()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("area `Exeter`"), "{message}");
    assert!(message.contains("invalid geometry in population table at row 1"), "{message}");
}

#[test]
fn nan_stop_fails_the_area() {
    let mut inputs = inputs();
    let stops = df!(
        "stop_id" => ["s1", "s2"],
        "capacity" => ["low", "low"],
        "highly_serviced" => [true, true],
        "easting" => [100.0, f64::NAN],
        "northing" => [100.0, 300.0],
    ).unwrap();
    inputs.stops = StopTable::from_coordinates(stops, "easting", "northing", EPSG).unwrap();

    let err = compute_coverage(inputs, &config()).unwrap_err();
    assert!(format!("{err:#}").contains("invalid geometry in stops table"), "{err:#}");
}

#[test]
fn repeated_area_names_are_computed_once() {
    let config = CoverageConfig {
        areas: vec!["Rutland".into(), "Exeter".into(), "Rutland".into()],
        ..config()
    };
    let coverages = compute_coverage(inputs(), &config).unwrap();
    let areas = coverages.iter().map(|c| c.area.as_str()).collect::<Vec<_>>();
    assert_eq!(areas, vec!["Rutland", "Exeter"]);
}
