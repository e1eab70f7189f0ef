//! Spherical geometry helpers for bounding boxes and tower positions.

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Axis-aligned latitude/longitude rectangle in WGS-84 degrees.
///
/// Boxes crossing the anti-meridian must be split by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lon_min: f64,
    pub lat_max: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn new(lat_min: f64, lon_min: f64, lat_max: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lon_min,
            lat_max,
            lon_max,
        }
    }

    /// Checks that every bound is a finite coordinate and that both spans are
    /// strictly increasing.
    pub fn validate(&self) -> Result<()> {
        check_range("latMin", self.lat_min, 90.0)?;
        check_range("latMax", self.lat_max, 90.0)?;
        check_range("lonMin", self.lon_min, 180.0)?;
        check_range("lonMax", self.lon_max, 180.0)?;

        if self.lat_min >= self.lat_max {
            return Err(Error::InvalidGeometry {
                bound: "lat",
                reason: format!(
                    "latMin ({}) must be less than latMax ({})",
                    self.lat_min, self.lat_max
                ),
            });
        }
        if self.lon_min >= self.lon_max {
            return Err(Error::InvalidGeometry {
                bound: "lon",
                reason: format!(
                    "lonMin ({}) must be less than lonMax ({})",
                    self.lon_min, self.lon_max
                ),
            });
        }

        Ok(())
    }

    /// Whether a point lies inside the box, edges included.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&latitude)
            && (self.lon_min..=self.lon_max).contains(&longitude)
    }

    pub fn area_km2(&self) -> Result<f64> {
        bounding_box_area_km2(self)
    }
}

fn check_range(bound: &'static str, value: f64, limit: f64) -> Result<()> {
    if !value.is_finite() || value.abs() > limit {
        return Err(Error::InvalidGeometry {
            bound,
            reason: format!("must be within [-{limit}, {limit}], got {value}"),
        });
    }
    Ok(())
}

/// Area of a latitude/longitude rectangle on a spherical earth, in km².
///
/// The width of a longitude degree shrinks with the cosine of the latitude, so
/// the east-west span is weighted by the cosine of the box's mean latitude.
/// The north-south factor uses the chord `2 sin(Δφ/2)` rather than `Δφ`, which
/// makes the result the exact area of the spherical rectangle
/// (`R² Δλ (sin φmax - sin φmin)`).
pub fn bounding_box_area_km2(bbox: &BoundingBox) -> Result<f64> {
    bbox.validate()?;

    let lat_span = (bbox.lat_max - bbox.lat_min).to_radians();
    let lon_span = (bbox.lon_max - bbox.lon_min).to_radians();
    let mean_lat = ((bbox.lat_max + bbox.lat_min) / 2.0).to_radians();

    let area = EARTH_RADIUS_KM.powi(2) * lon_span * 2.0 * mean_lat.cos() * (lat_span / 2.0).sin();
    Ok(area.max(0.0))
}

/// Great-circle distance between two points (`x` = longitude, `y` = latitude).
pub fn haversine_distance_km(a: Point, b: Point) -> f64 {
    Haversine::distance(a, b) / 1000.0
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn one_degree_at_equator() {
        let b = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let degree = EARTH_RADIUS_KM.to_radians();
        assert_relative_eq!(b.area_km2().unwrap(), degree * degree, max_relative = 1e-4);
    }

    #[test]
    fn shrinks_towards_poles() {
        let equator = BoundingBox::new(0.0, 0.0, 1.0, 1.0).area_km2().unwrap();
        let north = BoundingBox::new(60.0, 0.0, 61.0, 1.0).area_km2().unwrap();
        assert!(north < equator * 0.51);
        assert!(north > equator * 0.47);
    }

    #[test]
    fn monotonic_in_both_spans() {
        let mut last = 0.0;
        for i in 1..=90 {
            let area = BoundingBox::new(0.0, 10.0, i as f64, 11.0)
                .area_km2()
                .unwrap();
            assert!(area > last, "lat span {i}: {area} <= {last}");
            last = area;
        }

        let mut last = 0.0;
        for i in 1..=36 {
            let area = BoundingBox::new(70.0, -180.0, 71.0, -180.0 + i as f64 * 10.0)
                .area_km2()
                .unwrap();
            assert!(area > last, "lon span {i}: {area} <= {last}");
            last = area;
        }
    }

    #[test]
    fn small_city_box() {
        let b = BoundingBox::new(40.70, -74.02, 40.72, -74.00);
        let area = b.area_km2().unwrap();
        // ~2.22 km north-south by ~1.69 km east-west
        assert_relative_eq!(area, 3.75, max_relative = 0.01);
    }

    #[test]
    fn rejects_non_increasing_bounds() {
        let err = BoundingBox::new(1.0, 0.0, 1.0, 1.0).area_km2().unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { bound: "lat", .. }));

        let err = BoundingBox::new(2.0, 0.0, 1.0, 1.0).area_km2().unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { bound: "lat", .. }));

        let err = BoundingBox::new(0.0, 5.0, 1.0, 5.0).area_km2().unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { bound: "lon", .. }));

        let err = BoundingBox::new(0.0, 6.0, 1.0, 5.0).area_km2().unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { bound: "lon", .. }));
    }

    #[test]
    fn rejects_out_of_range_bounds() {
        let err = BoundingBox::new(-91.0, 0.0, 1.0, 1.0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { bound: "latMin", .. }));

        let err = BoundingBox::new(0.0, 0.0, 1.0, f64::NAN).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { bound: "lonMax", .. }));
    }

    #[test]
    fn contains_edges() {
        let b = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(b.contains(0.0, 0.0));
        assert!(b.contains(1.0, 1.0));
        assert!(b.contains(0.5, 0.5));
        assert!(!b.contains(1.1, 0.5));
        assert!(!b.contains(0.5, -0.1));
    }

    #[test]
    fn haversine_one_degree_of_latitude() {
        let d = haversine_distance_km(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        assert_relative_eq!(d, EARTH_RADIUS_KM.to_radians(), max_relative = 1e-6);
    }

    #[test]
    fn box_deserializes_from_camel_case() {
        let b: BoundingBox = serde_json::from_str(
            r#"{"latMin":40.70,"lonMin":-74.02,"latMax":40.72,"lonMax":-74.00}"#,
        )
        .unwrap();
        assert_eq!(b, BoundingBox::new(40.70, -74.02, 40.72, -74.00));
    }
}
