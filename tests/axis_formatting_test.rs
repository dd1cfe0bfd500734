// tests/axis_formatting_test.rs

use KC_Report_Render::plot_framework::{calculate_range, format_axis_value};

#[test]
fn test_force_axis_uses_k_notation() {
    assert_eq!(format_axis_value(1500.0), "1.5k");
    assert_eq!(format_axis_value(-500.0), "-500");
    assert_eq!(format_axis_value(2_500_000.0), "2.5M");
}

#[test]
fn test_small_angles_keep_decimals() {
    assert_eq!(format_axis_value(0.25), "0.25");
    assert_eq!(format_axis_value(-1.5), "-1.50");
    assert_eq!(format_axis_value(5.0), "5");
}

#[test]
fn test_travel_axis_integers() {
    for (value, expected) in [(-25.0, "-25"), (0.0, "0"), (10.0, "10"), (12.4, "12")] {
        assert_eq!(format_axis_value(value), expected, "value {}", value);
    }
}

#[test]
fn test_range_padding_around_window() {
    let (low, high) = calculate_range(-10.0, 10.0);
    assert!((low + 13.0).abs() < 1e-12);
    assert!((high - 13.0).abs() < 1e-12);
}

// tests/axis_formatting_test.rs
