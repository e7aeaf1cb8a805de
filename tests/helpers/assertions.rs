//! Assertion functions for numerical comparisons with tolerance

/// Compare scalar values with tolerance
pub fn assert_scalar_close(actual: f64, expected: f64, tolerance: f64, field_name: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {}, got {} (diff: {}, tolerance: {})",
        field_name,
        expected,
        actual,
        diff,
        tolerance
    );
}

/// Compare slices element-wise with tolerance
pub fn assert_vec_close(actual: &[f64], expected: &[f64], tolerance: f64, field_name: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{}: length mismatch (actual: {}, expected: {})",
        field_name,
        actual.len(),
        expected.len()
    );

    for (i, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        let diff = (a - e).abs();
        assert!(
            diff <= tolerance,
            "{}[{}]: expected {}, got {} (diff: {}, tolerance: {})",
            field_name,
            i,
            e,
            a,
            diff,
            tolerance
        );
    }
}

/// Check that a distribution sums to one
pub fn assert_normalized(distribution: &[f64], field_name: &str) {
    let sum: f64 = distribution.iter().sum();
    assert_scalar_close(sum, 1.0, 1e-9, &format!("{} sum", field_name));
    assert!(
        distribution.iter().all(|p| p.is_finite() && *p >= 0.0),
        "{}: contains a negative or non-finite entry: {:?}",
        field_name,
        distribution
    );
}
