//! Wire format of stored point sets.

use super::StorageError;
use prost::Message;

/// One georeferenced occurrence record.
#[derive(Clone, PartialEq, Message)]
pub struct PointFeature {
    #[prost(double, tag = "1")]
    pub latitude: f64,
    #[prost(double, tag = "2")]
    pub longitude: f64,
    #[prost(int32, optional, tag = "3")]
    pub year: Option<i32>,
    #[prost(string, tag = "4")]
    pub basis_of_record: String,
}

/// All points of a dataset, in stored order.
#[derive(Clone, PartialEq, Message)]
pub struct PointFeatures {
    #[prost(message, repeated, tag = "1")]
    pub features: Vec<PointFeature>,
}

impl PointFeature {
    pub fn new(latitude: f64, longitude: f64, year: Option<i32>, basis_of_record: &str) -> Self {
        Self {
            latitude,
            longitude,
            year,
            basis_of_record: basis_of_record.to_string(),
        }
    }
}

/// Decodes a stored point set, reporting failures as corruption of `key`.
pub fn decode_point_features(key: &str, bytes: &[u8]) -> Result<PointFeatures, StorageError> {
    PointFeatures::decode(bytes).map_err(|e| StorageError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_stored_points() {
        let stored = PointFeatures {
            features: vec![
                PointFeature::new(51.5, -0.12, Some(2001), "OBSERVATION"),
                PointFeature::new(-33.9, 151.2, None, "PRESERVED_SPECIMEN"),
            ],
        };
        let bytes = stored.encode_to_vec();

        let decoded = decode_point_features("0:0", &bytes).unwrap();
        assert_eq!(decoded.features.len(), 2);
        assert_eq!(decoded.features[0].year, Some(2001));
        assert_eq!(decoded.features[1].year, None);
        assert_eq!(decoded.features[1].basis_of_record, "PRESERVED_SPECIMEN");
    }

    #[test]
    fn test_decode_garbage_is_corruption() {
        let result = decode_point_features("2:abc", &[0x0a, 0xff]);
        assert!(matches!(result, Err(StorageError::Corrupt { ref key, .. }) if key == "2:abc"));
    }
}
