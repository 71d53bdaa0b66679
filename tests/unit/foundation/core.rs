use super::*;

#[test]
fn oversample_rejects_zero() {
    assert!(Oversample::new(0).is_err());
    assert_eq!(Oversample::new(4).unwrap(), Oversample::DEFAULT);
    assert_eq!(Oversample::default().get(), 4);
}

#[test]
fn plan_counts_four_samples_per_frame() {
    let plan = SamplePlan::new(0.0, 5.0, Oversample::DEFAULT).unwrap();
    assert_eq!(plan.total_samples(), 20);
    assert_eq!(plan.time_at(SampleIndex(0)), SampleTime(0.0));
    assert_eq!(plan.time_at(SampleIndex(19)), SampleTime(4.75));
}

#[test]
fn plan_offsets_times_by_in_point() {
    let plan = SamplePlan::new(2.0, 4.0, Oversample::DEFAULT).unwrap();
    assert_eq!(plan.total_samples(), 8);
    assert_eq!(plan.time_at(SampleIndex(0)), SampleTime(2.0));
    assert_eq!(plan.time_at(SampleIndex(7)), SampleTime(3.75));
}

#[test]
fn plan_indices_are_dense_and_increasing() {
    let plan = SamplePlan::new(0.0, 3.0, Oversample::DEFAULT).unwrap();
    let idx: Vec<u64> = plan.indices().map(|i| i.0).collect();
    assert_eq!(idx, (0..12).collect::<Vec<_>>());
}

#[test]
fn plan_rounds_fractional_span_up() {
    let plan = SamplePlan::new(0.0, 2.5, Oversample::new(3).unwrap()).unwrap();
    assert_eq!(plan.total_samples(), 8);
}

#[test]
fn plan_rejects_empty_or_inverted_range() {
    for (ip, op) in [(0.0, 0.0), (5.0, 2.0), (3.0, 3.0)] {
        let err = SamplePlan::new(ip, op, Oversample::DEFAULT).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedDocument(_)));
    }
}

#[test]
fn plan_rejects_non_finite_points() {
    assert!(SamplePlan::new(f64::NAN, 4.0, Oversample::DEFAULT).is_err());
    assert!(SamplePlan::new(0.0, f64::INFINITY, Oversample::DEFAULT).is_err());
}
