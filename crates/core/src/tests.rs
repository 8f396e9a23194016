//! Unit tests for georoute-core primitives.

#[cfg(test)]
mod ids {
    use crate::NodeId;

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{haversine, GeoPoint, Unit};

    #[test]
    fn zero_distance_identical_points() {
        let p = GeoPoint::new(30.694, -88.043);
        assert_eq!(p.distance(p, Unit::Km), 0.0);
    }

    #[test]
    fn zero_distance_antipodal_identical() {
        // Identical coordinates at an antipodal-ish location still give 0.
        let p = GeoPoint::new(-45.0, 170.0);
        assert_eq!(haversine(p, p, Unit::Km), 0.0);
    }

    #[test]
    fn one_degree_latitude_is_about_111km() {
        let a = GeoPoint::new(30.0, -88.0);
        let b = GeoPoint::new(31.0, -88.0);
        let d = a.distance(b, Unit::Km);
        assert!((d - 111.19).abs() < 0.5, "got {d}");
    }

    #[test]
    fn symmetric() {
        let a = GeoPoint::new(10.0, 20.0);
        let b = GeoPoint::new(-5.0, 170.0);
        assert!((a.distance(b, Unit::Km) - b.distance(a, Unit::Km)).abs() < 1e-9);
    }

    #[test]
    fn monotone_in_angular_separation() {
        let origin = GeoPoint::new(0.0, 0.0);
        let near = GeoPoint::new(0.0, 1.0);
        let far = GeoPoint::new(0.0, 10.0);
        assert!(origin.distance(near, Unit::Km) < origin.distance(far, Unit::Km));
    }

    #[test]
    fn antipodal_is_half_circumference() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let d = a.distance(b, Unit::Km);
        // Half the equatorial great circle: pi * R.
        assert!((d - std::f64::consts::PI * 6371.0088).abs() < 1.0, "got {d}");
    }

    #[test]
    fn validate_rejects_out_of_range() {
        assert!(GeoPoint::new(91.0, 0.0).validate().is_err());
        assert!(GeoPoint::new(0.0, 181.0).validate().is_err());
        assert!(GeoPoint::new(-90.0, -180.0).validate().is_ok());
        assert!(GeoPoint::new(90.0, 180.0).validate().is_ok());
    }

    #[test]
    fn wrapped_lon_delta_short_way() {
        let a = GeoPoint::new(0.0, 179.0);
        let b = GeoPoint::new(0.0, -179.0);
        // Naive delta would be -358; wrapped should be the short 2-degree hop.
        assert!((a.wrapped_lon_delta(b) - 2.0).abs() < 1e-9);
        assert!(a.crosses_antimeridian(b));
    }

    #[test]
    fn no_antimeridian_crossing_for_nearby_points() {
        let a = GeoPoint::new(10.0, 10.0);
        let b = GeoPoint::new(10.0, 20.0);
        assert!(!a.crosses_antimeridian(b));
    }
}

#[cfg(test)]
mod units {
    use crate::Unit;

    #[test]
    fn km_is_identity() {
        assert_eq!(Unit::Km.convert_from_km(42.0), 42.0);
    }

    #[test]
    fn table_matches_spec() {
        assert_eq!(Unit::M.from_km_factor(), 1000.0);
        assert_eq!(Unit::Mi.from_km_factor(), 0.621_371);
        assert_eq!(Unit::Ft.from_km_factor(), 3280.84);
    }

    #[test]
    fn parse_roundtrip() {
        use std::str::FromStr;
        assert_eq!(Unit::from_str("km").unwrap(), Unit::Km);
        assert_eq!(Unit::from_str("ft").unwrap(), Unit::Ft);
        assert!(Unit::from_str("parsec").is_err());
    }
}
