use chrono::{NaiveDate, NaiveDateTime};
use tsdecomp::{
    decompose, decomposition_strength, Column, ColumnSpec, DecompositionModel, Error,
    PanelFrame, SeasonalDecompose,
};

fn month_start(year: i32, month: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Panel with one row per month per identifier, starting January 2020.
/// Values carry a linear trend plus a 12-month seasonal swing.
fn monthly_panel(series: &[(&str, usize)]) -> PanelFrame {
    let mut ids = Vec::new();
    let mut times = Vec::new();
    let mut values = Vec::new();
    for (id, months) in series {
        for i in 0..*months {
            ids.push(id.to_string());
            times.push(month_start(2020 + (i / 12) as i32, (i % 12) as u32 + 1));
            values.push(100.0 + 0.5 * i as f64 + 10.0 * ((i % 12) as f64 / 11.0));
        }
    }
    let mut frame = PanelFrame::new();
    frame.add_column("unique_id", Column::Str(ids)).unwrap();
    frame.add_column("ds", Column::DateTime(times)).unwrap();
    frame.add_column("y", Column::Float64(values)).unwrap();
    frame
}

#[test]
fn test_decompose_appends_components_and_keeps_row_count() {
    let frame = monthly_panel(&[("a", 36), ("b", 24)]);
    let decomposed = decompose(&frame, DecompositionModel::Additive, 12).unwrap();

    assert_eq!(decomposed.row_count(), frame.row_count());
    assert_eq!(
        decomposed.column_names(),
        &["unique_id", "ds", "y", "trend", "seasonal", "residual"]
    );
}

#[test]
fn test_additive_components_reconstruct_target() {
    let frame = monthly_panel(&[("a", 36), ("b", 24)]);
    let decomposed = decompose(&frame, DecompositionModel::Additive, 12).unwrap();

    let y = decomposed.float_column("y").unwrap();
    let trend = decomposed.float_column("trend").unwrap();
    let seasonal = decomposed.float_column("seasonal").unwrap();
    let residual = decomposed.float_column("residual").unwrap();
    for row in 0..decomposed.row_count() {
        let rebuilt = trend[row] + seasonal[row] + residual[row];
        assert!((rebuilt - y[row]).abs() < 1e-9, "row {}", row);
    }
}

#[test]
fn test_multiplicative_components_reconstruct_target() {
    let frame = monthly_panel(&[("a", 48)]);
    let decomposed = decompose(&frame, DecompositionModel::Multiplicative, 12).unwrap();

    let y = decomposed.float_column("y").unwrap();
    let trend = decomposed.float_column("trend").unwrap();
    let seasonal = decomposed.float_column("seasonal").unwrap();
    let residual = decomposed.float_column("residual").unwrap();
    for row in 0..decomposed.row_count() {
        let rebuilt = trend[row] * seasonal[row] * residual[row];
        assert!((rebuilt - y[row]).abs() < 1e-9, "row {}", row);
    }
}

#[test]
fn test_group_values_survive_the_global_sort() {
    let frame = monthly_panel(&[("a", 30), ("b", 30), ("c", 24)]);
    let decomposed = decompose(&frame, DecompositionModel::Additive, 12).unwrap();

    for id in ["a", "b", "c"] {
        let mut before: Vec<f64> = frame
            .filter_eq("unique_id", id)
            .unwrap()
            .float_column("y")
            .unwrap()
            .to_vec();
        let mut after: Vec<f64> = decomposed
            .filter_eq("unique_id", id)
            .unwrap()
            .float_column("y")
            .unwrap()
            .to_vec();
        before.sort_by(|a, b| a.partial_cmp(b).unwrap());
        after.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(before, after);
    }
}

#[test]
fn test_output_is_sorted_by_time() {
    let frame = monthly_panel(&[("a", 24), ("b", 24)]);
    let decomposed = decompose(&frame, DecompositionModel::Additive, 12).unwrap();
    let times = decomposed.datetime_column("ds").unwrap();
    for pair in times.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[test]
fn test_two_cycles_fill_every_edge() {
    // Exactly two full periods: trend extrapolation must leave no holes.
    let frame = monthly_panel(&[("a", 24)]);
    let decomposed = decompose(&frame, DecompositionModel::Additive, 12).unwrap();

    assert_eq!(decomposed.row_count(), 24);
    for name in ["trend", "seasonal", "residual"] {
        let column = decomposed.float_column(name).unwrap();
        assert!(
            column.iter().all(|v| v.is_finite()),
            "{} has non-finite values",
            name
        );
    }
}

#[test]
fn test_short_series_fails() {
    let frame = monthly_panel(&[("a", 36), ("short", 20)]);
    let err = decompose(&frame, DecompositionModel::Additive, 12).unwrap_err();
    match err {
        Error::InsufficientData { needed, got } => {
            assert_eq!(needed, 24);
            assert_eq!(got, 20);
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }
}

#[test]
fn test_zero_period_is_invalid() {
    let frame = monthly_panel(&[("a", 24)]);
    let err = decompose(&frame, DecompositionModel::Additive, 0).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn test_missing_target_column_fails() {
    let mut frame = PanelFrame::new();
    frame
        .add_column("unique_id", Column::Str(vec!["a".to_string()]))
        .unwrap();
    frame
        .add_column("ds", Column::DateTime(vec![month_start(2020, 1)]))
        .unwrap();
    let err = decompose(&frame, DecompositionModel::Additive, 12).unwrap_err();
    match err {
        Error::ColumnNotFound(name) => assert_eq!(name, "y"),
        other => panic!("expected ColumnNotFound, got {:?}", other),
    }
}

#[test]
fn test_non_finite_target_fails() {
    let source = monthly_panel(&[("a", 24)]);
    let mut broken = source.float_column("y").unwrap().to_vec();
    broken[3] = f64::NAN;

    let mut frame = PanelFrame::new();
    frame
        .add_column(
            "unique_id",
            Column::Str(source.str_column("unique_id").unwrap().to_vec()),
        )
        .unwrap();
    frame
        .add_column(
            "ds",
            Column::DateTime(source.datetime_column("ds").unwrap().to_vec()),
        )
        .unwrap();
    frame.add_column("y", Column::Float64(broken)).unwrap();

    let err = decompose(&frame, DecompositionModel::Additive, 12).unwrap_err();
    assert!(matches!(err, Error::MissingValues(_)));
}

#[test]
fn test_builder_with_custom_columns() {
    let mut frame = PanelFrame::new();
    let source = monthly_panel(&[("store-1", 24)]);
    frame
        .add_column(
            "store",
            Column::Str(source.str_column("unique_id").unwrap().to_vec()),
        )
        .unwrap();
    frame
        .add_column(
            "date",
            Column::DateTime(source.datetime_column("ds").unwrap().to_vec()),
        )
        .unwrap();
    frame
        .add_column(
            "sales",
            Column::Float64(source.float_column("y").unwrap().to_vec()),
        )
        .unwrap();

    let decomposed = SeasonalDecompose::new(DecompositionModel::Additive)
        .with_period(12)
        .with_columns(ColumnSpec::new("store", "date", "sales"))
        .run(&frame)
        .unwrap();
    assert_eq!(decomposed.row_count(), 24);
    assert!(decomposed.contains_column("trend"));
}

#[test]
fn test_strength_of_a_strongly_seasonal_series() {
    let frame = monthly_panel(&[("a", 48)]);
    let decomposed = decompose(&frame, DecompositionModel::Additive, 12).unwrap();

    let strength =
        decomposition_strength(&decomposed, "a", &ColumnSpec::default()).unwrap();
    assert!(strength.trend > 0.9, "trend strength {}", strength.trend);
    assert!(
        strength.seasonality > 0.9,
        "seasonality strength {}",
        strength.seasonality
    );
    assert!(strength.trend <= 1.0 && strength.seasonality <= 1.0);
}

#[test]
fn test_strength_of_unknown_identifier_fails() {
    let frame = monthly_panel(&[("a", 24)]);
    let decomposed = decompose(&frame, DecompositionModel::Additive, 12).unwrap();
    let err = decomposition_strength(&decomposed, "zzz", &ColumnSpec::default()).unwrap_err();
    assert!(matches!(err, Error::Empty(_)));
}
