//! End-to-end runs from raw measurements to exported statistics.

use spotfield_stats::{Data, DataStatistics, Datapoint, Error, Measurepoint, Position};

fn mp(spot: u32, row: u32, col: u32, min: f64, max: f64, mean: f64) -> Measurepoint {
    Measurepoint::new(spot, row, col, min, max, mean, 1.0).unwrap()
}

#[test]
fn two_spotfields_two_spots() {
    let values = vec![
        // Spotfield A
        Datapoint::new(mp(0, 0, 0, 1.0, 15.0, 10.0), 10.0, 1.0),
        Datapoint::new(mp(0, 0, 1, 2.0, 10.0, 5.0), 5.0, 0.5),
        // Spotfield B
        Datapoint::new(mp(1, 0, 0, 2.0, 16.0, 12.0), 10.0, 1.0),
        Datapoint::new(mp(1, 0, 1, 2.0, 10.0, 8.0), 6.0, 0.6),
    ];
    let stats = DataStatistics::analyze(&Data::of(values).unwrap());
    let allowed = 0.001;

    let spot = &stats.values()[0];
    assert!((spot.raw_avg() - 10.0).abs() < allowed);
    assert!((spot.norm_avg() - 1.0).abs() < allowed);
    // Both spotfields measured 10 here
    assert!(spot.std_dev_raw_avg().abs() < allowed);
    assert!(spot.rel_std_dev_raw_avg().abs() < allowed);
    assert!(spot.std_dev_norm_avg().abs() < allowed);
    assert!(spot.rel_std_dev_norm_avg().abs() < allowed);

    let spot = &stats.values()[1];
    assert!((spot.raw_avg() - 5.5).abs() < allowed);
    assert!((spot.norm_avg() - 0.55).abs() < allowed);
    assert!((spot.std_dev_raw_avg() - 0.5).abs() < allowed);
    assert!((spot.rel_std_dev_raw_avg() - 9.090_909_090_909).abs() < allowed);
    assert!((spot.std_dev_norm_avg() - 0.05).abs() < allowed);
    assert!((spot.rel_std_dev_norm_avg() - 9.090_909_090_909).abs() < allowed);
}

#[test]
fn measurepoints_to_statistics_and_back() {
    let points = vec![
        mp(0, 0, 0, 0.0, 10.0, 1.0),
        mp(0, 0, 1, 0.0, 10.0, 2.0),
        mp(0, 1, 0, 0.0, 10.0, 3.0),
        mp(1, 0, 0, 0.0, 10.0, 2.0),
        mp(1, 0, 1, 0.0, 10.0, 3.0),
        mp(1, 1, 0, 0.0, 10.0, 4.0),
    ];
    let data = Data::from_measurepoints(points).unwrap();

    let adjusted: Vec<f64> = data.values().iter().map(Datapoint::mean_minus_min).collect();
    let normalized: Vec<f64> = data.values().iter().map(Datapoint::normalized_mean).collect();
    assert_eq!(adjusted, [0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
    assert_eq!(normalized, [0.0, 0.5, 1.0, 0.0, 0.5, 1.0]);

    // Both spotfields scale identically, so there is no spread at all
    let stats = DataStatistics::analyze(&data);
    assert_eq!(stats.len(), 3);
    for s in stats.values() {
        assert_eq!(s.std_dev_raw_avg(), 0.0);
        assert_eq!(s.rel_std_dev_raw_avg(), 0.0);
        assert_eq!(s.std_dev_norm_avg(), 0.0);
        assert_eq!(s.rel_std_dev_norm_avg(), 0.0);
    }
    assert_eq!(stats.get(1, 0).map(|s| s.raw_avg()), Some(2.0));

    assert_eq!(Data::from_tsv(&data.to_tsv()).unwrap(), data);
    assert_eq!(DataStatistics::from_tsv(&stats.to_tsv()).unwrap(), stats);
    assert_eq!(Data::from_json(&data.to_json().unwrap()).unwrap(), data);
    assert_eq!(
        DataStatistics::from_json(&stats.to_json().unwrap()).unwrap(),
        stats
    );
}

#[test]
fn zero_spotfield_stays_finite() {
    let data = Data::from_measurepoints(vec![
        mp(0, 0, 0, 0.0, 0.0, 0.0),
        mp(0, 0, 1, 0.0, 0.0, 0.0),
    ])
    .unwrap();
    for dp in data.values() {
        assert!(!dp.mean_minus_min().is_nan());
        assert_eq!(dp.normalized_mean(), 0.0);
    }

    let stats = DataStatistics::analyze(&data);
    for s in stats.values() {
        assert_eq!(s.rel_std_dev_raw_avg(), 0.0);
        assert_eq!(s.rel_std_dev_norm_avg(), 0.0);
    }
}

#[test]
fn ragged_slide_is_rejected_with_position() {
    let err = Data::from_measurepoints(vec![
        mp(0, 0, 0, 0.0, 1.0, 0.5),
        mp(0, 0, 1, 0.0, 1.0, 0.5),
        mp(1, 0, 0, 0.0, 1.0, 0.5),
    ])
    .unwrap_err();
    match err {
        Error::IrregularShape { position, .. } => assert_eq!(position, Position::new(0, 1)),
        other => panic!("unexpected error: {other}"),
    }
}
