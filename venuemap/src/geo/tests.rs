//! Tests for geographic primitives

use super::*;

#[test]
fn test_region_new_accepts_valid_values() {
    let region = Region::new(40.179, 44.499, 1.5, 1.5);
    assert!(region.is_ok(), "Valid region should not error");

    let region = region.unwrap();
    assert_eq!(region.center(), GeoPoint::new(40.179, 44.499));
}

#[test]
fn test_region_new_rejects_latitude_out_of_range() {
    let result = Region::new(91.0, 0.0, 0.1, 0.1);
    assert!(matches!(result.unwrap_err(), GeoError::InvalidLatitude(_)));
}

#[test]
fn test_region_new_rejects_longitude_out_of_range() {
    let result = Region::new(0.0, -181.0, 0.1, 0.1);
    assert!(matches!(result.unwrap_err(), GeoError::InvalidLongitude(_)));
}

#[test]
fn test_region_new_rejects_non_positive_delta() {
    let result = Region::new(0.0, 0.0, 0.0, 0.1);
    assert!(matches!(result.unwrap_err(), GeoError::InvalidDelta(_)));

    let result = Region::new(0.0, 0.0, 0.1, f64::NAN);
    assert!(matches!(result.unwrap_err(), GeoError::InvalidDelta(_)));
}

#[test]
fn test_region_contains_with_buffer() {
    let region = Region::around(GeoPoint::new(10.0, 20.0), 1.0);

    assert!(region.contains(&GeoPoint::new(10.0, 20.0), 0.0));
    // 1.4 degrees away is outside the bare span but inside the 0.5 buffer
    assert!(!region.contains(&GeoPoint::new(11.4, 20.0), 0.0));
    assert!(region.contains(&GeoPoint::new(11.4, 20.0), 0.5));
    assert!(!region.contains(&GeoPoint::new(10.0, 21.6), 0.5));
}

#[test]
fn test_region_recentered_keeps_span() {
    let region = Region::around(GeoPoint::new(0.0, 0.0), 0.02);
    let moved = region.recentered(GeoPoint::new(5.0, 6.0));

    assert_eq!(moved.latitude, 5.0);
    assert_eq!(moved.longitude, 6.0);
    assert_eq!(moved.latitude_delta, 0.02);
    assert_eq!(moved.longitude_delta, 0.02);
}

#[test]
fn test_grid_cell_floors_negative_coordinates() {
    let cell = GridCell::of(&GeoPoint::new(-0.0001, 0.0001), 0.0005);
    assert_eq!(cell.lat_cell, -1);
    assert_eq!(cell.lng_cell, 0);
}

#[test]
fn test_nearby_points_share_grid_cell() {
    let a = GridCell::of(&GeoPoint::new(40.17901, 44.49901), 0.0005);
    let b = GridCell::of(&GeoPoint::new(40.17919, 44.49919), 0.0005);
    assert_eq!(a, b);
}

#[test]
fn test_from_lng_lat_swaps_order() {
    let point = GeoPoint::from_lng_lat([10.0, 20.0]);
    assert_eq!(point.latitude, 20.0);
    assert_eq!(point.longitude, 10.0);
}

#[test]
fn test_longitude_span_meters_one_degree() {
    let meters = longitude_span_meters(1.0);
    assert!((meters - 111_319.444).abs() < 0.01);
}

#[test]
fn test_region_serializes_camel_case() {
    let region = Region::around(GeoPoint::new(1.0, 2.0), 0.5);
    let json = serde_json::to_string(&region).unwrap();
    assert!(json.contains("\"latitudeDelta\":0.5"));
    assert!(json.contains("\"longitudeDelta\":0.5"));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        GeoError::InvalidLatitude(91.0).to_string(),
        "Invalid latitude: 91 (must be between -90 and 90)"
    );
    assert_eq!(
        GeoError::InvalidDelta(0.0).to_string(),
        "Invalid region span: 0 (must be > 0)"
    );
}
