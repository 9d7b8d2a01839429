use crate::matching::domain::Coordinates;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat_from = from.latitude.to_radians();
    let lat_to = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat_from.cos() * lat_to.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(latitude: f64, longitude: f64) -> Coordinates {
        Coordinates {
            latitude,
            longitude,
        }
    }

    #[test]
    fn identical_points_are_zero_apart() {
        let berlin = point(52.52, 13.405);
        assert_eq!(haversine_km(berlin, berlin), 0.0);
    }

    #[test]
    fn berlin_to_munich_is_roughly_504_km() {
        let distance = haversine_km(point(52.52, 13.405), point(48.1351, 11.582));
        assert!((distance - 504.0).abs() < 5.0, "got {distance}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = point(40.7128, -74.006);
        let b = point(51.5074, -0.1278);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_longitude_on_the_equator() {
        let distance = haversine_km(point(0.0, 0.0), point(0.0, 1.0));
        assert!((distance - 111.195).abs() < 0.01, "got {distance}");
    }
}
