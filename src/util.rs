//! Various utilities, e.g. coordinate normalization.

use crate::pbf;

/// Normalizes `lat` and `lon` to nanodegrees and returns them in a `(latitude: i64, longitude: i64)` pair.
///
/// All arithmetic stays in 64-bit integers; converting the result to degrees
/// is a single `1e-9` float multiplication.
pub fn normalize_coord(lat: i64, lon: i64, block: &pbf::PrimitiveBlock) -> (i64, i64) {
    (
        lat * block.granularity() as i64 + block.lat_offset(),
        lon * block.granularity() as i64 + block.lon_offset(),
    )
}

/// Normalizes a timestamp coming from [`pbf::Info`] or [`pbf::DenseInfo`] to
/// milliseconds since the Unix epoch.
pub fn normalize_timestamp(timestamp: i64, block: &pbf::PrimitiveBlock) -> i64 {
    timestamp * block.date_granularity() as i64
}

#[cfg(test)]
mod normalize_tests {
    use super::*;

    fn block(granularity: Option<i32>, lat_offset: Option<i64>, lon_offset: Option<i64>) -> pbf::PrimitiveBlock {
        pbf::PrimitiveBlock {
            stringtable: pbf::StringTable::default(),
            primitivegroup: vec![],
            granularity,
            lat_offset,
            lon_offset,
            date_granularity: None,
        }
    }

    #[test]
    fn default_granularity() {
        let (lat, lon) = normalize_coord(515442632, -2010027, &block(None, None, None));
        assert_eq!(lat, 51544263200);
        assert_eq!(lon, -201002700);
    }

    #[test]
    fn offsets_are_added_after_scaling() {
        let (lat, lon) = normalize_coord(10, 20, &block(Some(1000), Some(5), Some(-5)));
        assert_eq!(lat, 10005);
        assert_eq!(lon, 19995);
    }

    #[test]
    fn default_date_granularity_is_milliseconds() {
        let block = block(None, None, None);
        assert_eq!(normalize_timestamp(1395698102, &block), 1395698102000);
    }
}
