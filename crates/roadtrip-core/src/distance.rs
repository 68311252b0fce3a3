use geo::{Distance, Haversine, Point};
use roadtrip_parser::Coordinate;

use crate::error::TripError;

const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;
const METERS_PER_MILE: f64 = 1_609.344;

pub const EARTH_MEAN_RADIUS_MI: f64 = EARTH_MEAN_RADIUS_M / METERS_PER_MILE;

/// Great-circle distance in miles on a spherical earth.
pub fn haversine_miles(a: Coordinate, b: Coordinate) -> f64 {
    Haversine.distance(point(a), point(b)) / METERS_PER_MILE
}

fn point(coordinate: Coordinate) -> Point<f64> {
    Point::new(coordinate.longitude, coordinate.latitude)
}

/// Distance of every segment, one fewer than the number of coordinates.
pub fn compute_distances(coordinates: &[Coordinate]) -> Result<Vec<f64>, TripError> {
    if coordinates.len() < 2 {
        return Err(TripError::InsufficientData {
            what: "coordinates",
            required: 2,
            found: coordinates.len(),
        });
    }

    Ok(coordinates
        .windows(2)
        .map(|pair| haversine_miles(pair[0], pair[1]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_longitude_at_the_equator() {
        let dist = haversine_miles(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!((dist - 69.09).abs() < 0.01, "got {dist}");
    }

    #[test]
    fn quarter_meridian() {
        let dist = haversine_miles(Coordinate::new(0.0, 0.0), Coordinate::new(90.0, 0.0));
        let expected = std::f64::consts::FRAC_PI_2 * EARTH_MEAN_RADIUS_MI;
        assert!((dist - expected).abs() < 1e-6, "got {dist}");
    }

    #[test]
    fn latitude_and_longitude_are_not_swapped() {
        // one degree of longitude shrinks with latitude, one degree of latitude does not
        let along_parallel =
            haversine_miles(Coordinate::new(60.0, 10.0), Coordinate::new(60.0, 11.0));
        let along_meridian =
            haversine_miles(Coordinate::new(60.0, 10.0), Coordinate::new(61.0, 10.0));
        assert!((along_parallel - 34.5).abs() < 0.1, "got {along_parallel}");
        assert!((along_meridian - 69.09).abs() < 0.01, "got {along_meridian}");
    }
}
