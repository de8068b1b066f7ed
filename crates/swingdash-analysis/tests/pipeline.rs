use swingdash_analysis::{
    balance::BalanceMode,
    catalogue::{MetricCatalogue, columns},
    config::PipelineConfig,
    dataset::{Dataset, Value},
    pipeline::{self, SessionLabels, Stage},
};

const HEADERS: [&str; 7] = [
    "Date",
    "Club Type",
    "Club Speed",
    "Ball Speed",
    "Carry Distance",
    "Carry Deviation Angle",
    "Carry Deviation Distance",
];

/// Builds an export the way a launch monitor writes it: every cell is text,
/// the first row carries the units.
fn export(shots: &[(&str, f64, f64, f64, f64, f64)]) -> Dataset {
    let mut records = vec![
        ["", "", "[mph]", "[mph]", "[yds]", "[deg]", "[yds]"]
            .map(Value::text)
            .to_vec(),
    ];
    for (i, &(club, club_speed, ball_speed, carry, angle, deviation)) in shots.iter().enumerate() {
        records.push(vec![
            Value::text(format!("2024-06-0{} 09:{:02}:00", 1 + i % 3, i % 60)),
            Value::text(club),
            Value::text(format!("{club_speed:.1} mph")),
            Value::text(format!("{ball_speed:.1} mph")),
            Value::text(format!("{carry:.1} yds")),
            Value::text(format!("{angle:.1}°")),
            Value::text(format!("{deviation:.1}")),
        ]);
    }
    Dataset::from_records(HEADERS, records).unwrap()
}

fn baseline() -> Dataset {
    export(&[
        ("7i", 80.0, 110.0, 150.0, -4.0, -10.0),
        ("7i", 81.0, 111.0, 152.0, 3.0, 8.0),
        ("7i", 79.0, 109.0, 149.0, 0.5, 1.0),
        ("7i", 80.5, 110.5, 151.0, -3.5, -9.0),
        ("Driver", 100.0, 145.0, 230.0, 6.0, 25.0),
        ("Driver", 101.0, 146.0, 232.0, -5.0, -20.0),
        ("Driver", 99.0, 144.0, 228.0, 1.0, 3.0),
        ("Driver", 100.5, 145.5, 231.0, 7.0, 30.0),
    ])
}

fn comparison() -> Dataset {
    export(&[
        ("7i", 83.0, 114.0, 158.0, 1.0, 2.0),
        ("7i", 84.0, 115.0, 160.0, -1.5, -3.0),
        ("7i", 82.0, 113.0, 157.0, 2.5, 6.0),
        ("Driver", 103.0, 149.0, 240.0, -1.0, -4.0),
        ("Driver", 104.0, 150.0, 242.0, 4.0, 12.0),
    ])
}

fn labels() -> SessionLabels {
    SessionLabels {
        baseline: "June range".to_owned(),
        comparison: "July range".to_owned(),
    }
}

#[test]
fn improved_session_ranks_speed_and_distance_gains_first() {
    let report = pipeline::run_comparison(
        &baseline(),
        &comparison(),
        &labels(),
        &PipelineConfig::default(),
        &MetricCatalogue::default(),
    )
    .unwrap();

    let raw = &report.stage_counts[0];
    assert_eq!(raw.stage, Stage::Raw);
    assert_eq!((raw.baseline, raw.comparison), (8, 5));

    for row in &report.comparison.rows {
        let gains = [columns::CLUB_SPEED, columns::BALL_SPEED, columns::CARRY_DISTANCE];
        if gains.contains(&row.metric.as_str()) {
            assert!(row.delta.unwrap() > 0.0, "{}", row.metric);
            assert_eq!(row.improvement_sign, Some(1), "{}", row.metric);
        }
    }
    let signs = report
        .comparison
        .rows
        .iter()
        .map(|r| r.improvement_sign)
        .collect::<Vec<_>>();
    let defined = signs.iter().take_while(|s| s.is_some()).count();
    assert!(signs[defined..].iter().all(Option::is_none));
    assert!(signs[..defined].windows(2).all(|w| w[0] >= w[1]));

    assert_eq!(
        report.kpis.iter().map(|k| k.metric.as_str()).collect::<Vec<_>>(),
        vec![
            columns::CLUB_SPEED,
            columns::BALL_SPEED,
            columns::CARRY_DISTANCE,
            columns::CARRY_DEVIATION_DISTANCE,
        ]
    );
    assert_eq!(report.shots.total_rows, 13);
    assert!(!report.shots.truncated);
    assert_eq!(report.shots.rows[0][0], Value::text("June range"));
    assert_eq!(report.shots.rows[12][0], Value::text("July range"));
}

#[test]
fn stratified_balancing_is_reproducible() {
    let config = PipelineConfig {
        balance: true,
        balance_mode: BalanceMode::parse("Stratified: Club Type + Side"),
        balance_seed: 7,
        ..PipelineConfig::default()
    };
    let catalogue = MetricCatalogue::default();
    let run = || {
        pipeline::run_comparison(&baseline(), &comparison(), &labels(), &config, &catalogue)
            .unwrap()
    };
    let first = run();
    let second = run();
    assert_eq!(first, second);

    let balanced = first
        .stage_counts
        .iter()
        .find(|c| c.stage == Stage::Balanced)
        .unwrap();
    assert_eq!(balanced.baseline, balanced.comparison);
    assert!(balanced.baseline <= 5);
}

#[test]
fn report_serializes_missing_values_as_null() {
    let old = baseline();
    let new = old.empty_like();
    let report = pipeline::run_comparison(
        &old,
        &new,
        &labels(),
        &PipelineConfig::default(),
        &MetricCatalogue::default(),
    )
    .unwrap();
    assert!(report.comparison_empty);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["comparison_empty"], serde_json::json!(true));
    assert_eq!(json["labels"]["baseline"], serde_json::json!("June range"));
    let speed = &json["comparison_summary"]["rows"][0];
    assert_eq!(speed["metric"], serde_json::json!("Club Speed"));
    assert_eq!(speed["count"], serde_json::json!(0));
    assert!(speed["mean"].is_null());
}
