//! Decoder for the encoded polyline format used by the directions service.
//!
//! Each coordinate is the delta from the previous one, scaled by 1e5,
//! zig-zag encoded and split into 5-bit chunks offset by 63.

use shared::GeoPoint;

const PRECISION: f64 = 1e5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolylineError {
    #[error("unexpected end of polyline at byte {0}")]
    Truncated(usize),
    #[error("invalid polyline character at byte {0}")]
    InvalidChar(usize),
    #[error("polyline value overflows at byte {0}")]
    Overflow(usize),
}

pub fn decode(encoded: &str) -> Result<Vec<GeoPoint>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut path = Vec::with_capacity(bytes.len() / 4);
    let mut cursor = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;

    while cursor < bytes.len() {
        lat = lat
            .checked_add(next_delta(bytes, &mut cursor)?)
            .ok_or(PolylineError::Overflow(cursor))?;
        lng = lng
            .checked_add(next_delta(bytes, &mut cursor)?)
            .ok_or(PolylineError::Overflow(cursor))?;
        path.push(GeoPoint::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    Ok(path)
}

fn next_delta(bytes: &[u8], cursor: &mut usize) -> Result<i64, PolylineError> {
    let mut result = 0i64;
    let mut shift = 0u32;
    loop {
        let byte = *bytes.get(*cursor).ok_or(PolylineError::Truncated(*cursor))?;
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidChar(*cursor));
        }
        if shift > 60 {
            return Err(PolylineError::Overflow(*cursor));
        }
        let chunk = i64::from(byte - 63);
        *cursor += 1;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }
    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: GeoPoint, lat: f64, lng: f64) {
        assert!((actual.lat - lat).abs() < 1e-9, "{actual:?} vs {lat}");
        assert!((actual.lng - lng).abs() < 1e-9, "{actual:?} vs {lng}");
    }

    #[test]
    fn decodes_reference_polyline() {
        let path = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(path.len(), 3);
        assert_close(path[0], 38.5, -120.2);
        assert_close(path[1], 40.7, -120.95);
        assert_close(path[2], 43.252, -126.453);
    }

    #[test]
    fn empty_input_is_empty_path() {
        assert_eq!(decode(""), Ok(Vec::new()));
    }

    #[test]
    fn single_zero_point() {
        let path = decode("??").unwrap();
        assert_eq!(path, vec![GeoPoint::new(0.0, 0.0)]);
    }

    #[test]
    fn truncated_input_is_rejected() {
        // latitude present, longitude missing
        assert_eq!(decode("_p~iF"), Err(PolylineError::Truncated(5)));
        // continuation bit set on the last byte
        assert!(matches!(decode("_p~iF~"), Err(PolylineError::Truncated(_))));
    }

    #[test]
    fn invalid_character_is_rejected() {
        assert_eq!(decode("_p~iF ps|U"), Err(PolylineError::InvalidChar(5)));
    }

    #[test]
    fn accumulated_overflow_is_rejected() {
        // 12 full continuation chunks then 'F' decode to a delta of -2^62,
        // so the third point pushes the running latitude below i64::MIN
        let huge = format!("{}F", "~".repeat(12));
        let encoded = huge.repeat(6);
        assert!(matches!(decode(&encoded), Err(PolylineError::Overflow(_))));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn encode_value(value: i64, out: &mut String) {
            let mut v = if value < 0 { !(value << 1) } else { value << 1 };
            while v >= 0x20 {
                out.push(char::from(((0x20 | (v & 0x1f)) + 63) as u8));
                v >>= 5;
            }
            out.push(char::from((v + 63) as u8));
        }

        fn encode(points: &[(i64, i64)]) -> String {
            let mut out = String::new();
            let (mut prev_lat, mut prev_lng) = (0, 0);
            for &(lat, lng) in points {
                encode_value(lat - prev_lat, &mut out);
                encode_value(lng - prev_lng, &mut out);
                prev_lat = lat;
                prev_lng = lng;
            }
            out
        }

        fn scaled_coord() -> impl Strategy<Value = (i64, i64)> {
            (-9_000_000i64..=9_000_000, -18_000_000i64..=18_000_000)
        }

        proptest! {
            #[test]
            fn prop_decode_never_panics(input in "[ -~]{0,64}") {
                let _ = decode(&input);
            }

            #[test]
            fn prop_decode_inverts_encoding(
                points in prop::collection::vec(scaled_coord(), 0..20)
            ) {
                let path = decode(&encode(&points)).unwrap();
                prop_assert_eq!(path.len(), points.len());
                for (decoded, &(lat, lng)) in path.iter().zip(&points) {
                    prop_assert!((decoded.lat - lat as f64 / PRECISION).abs() < 1e-9);
                    prop_assert!((decoded.lng - lng as f64 / PRECISION).abs() < 1e-9);
                }
            }
        }
    }
}
