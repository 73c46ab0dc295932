//! Codec for the compressed polyline format used by routing services.
//!
//! Coordinates are scaled by 1e5, delta-encoded against the previous point,
//! zig-zag transformed and emitted as 5-bit groups offset into printable
//! ASCII. Points are (latitude, longitude) tuples in degrees; round-trips
//! are exact for coordinates quantized to 1e-5 degrees.

use std::{error, fmt};

const PRECISION: f64 = 1e5;
const CONTINUATION_BIT: u64 = 0x20;
const ASCII_OFFSET: u8 = 63;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolylineError {
    /// The stream ended while a value still had its continuation bit set,
    /// or after a latitude with no matching longitude.
    UnterminatedSequence,
    /// A character outside the encodable ASCII range.
    InvalidCharacter(char),
}

impl error::Error for PolylineError {}

impl fmt::Display for PolylineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PolylineError::UnterminatedSequence => {
                write!(f, "polyline ended in the middle of a coordinate")
            }
            PolylineError::InvalidCharacter(c) => {
                write!(f, "invalid polyline character {c:?}")
            }
        }
    }
}

/// Encodes a sequence of (latitude, longitude) points.
pub fn encode(points: &[(f64, f64)]) -> String {
    let mut encoded = String::new();
    let mut previous_latitude = 0i64;
    let mut previous_longitude = 0i64;

    for &(latitude, longitude) in points {
        let lat = scale(latitude);
        let lon = scale(longitude);
        encode_value(lat - previous_latitude, &mut encoded);
        encode_value(lon - previous_longitude, &mut encoded);
        previous_latitude = lat;
        previous_longitude = lon;
    }

    encoded
}

/// Decodes an encoded polyline back into (latitude, longitude) points.
pub fn decode(encoded: &str) -> Result<Vec<(f64, f64)>, PolylineError> {
    let mut points = Vec::new();
    let mut bytes = encoded.bytes();
    let mut latitude = 0i64;
    let mut longitude = 0i64;

    while let Some(lat_delta) = decode_value(&mut bytes)? {
        let lon_delta =
            decode_value(&mut bytes)?.ok_or(PolylineError::UnterminatedSequence)?;
        latitude += lat_delta;
        longitude += lon_delta;
        points.push((latitude as f64 / PRECISION, longitude as f64 / PRECISION));
    }

    Ok(points)
}

fn scale(degrees: f64) -> i64 {
    (degrees * PRECISION).round() as i64
}

fn encode_value(value: i64, encoded: &mut String) {
    // Zig-zag so small negative deltas stay short.
    let mut remaining = if value < 0 {
        !(value << 1) as u64
    } else {
        (value << 1) as u64
    };

    while remaining >= CONTINUATION_BIT {
        let group = CONTINUATION_BIT | (remaining & 0x1f);
        encoded.push((group as u8 + ASCII_OFFSET) as char);
        remaining >>= 5;
    }
    encoded.push((remaining as u8 + ASCII_OFFSET) as char);
}

/// Reads one zig-zag value. `Ok(None)` marks a clean end of the stream;
/// running out of bytes mid-value is an error.
fn decode_value(
    bytes: &mut impl Iterator<Item = u8>,
) -> Result<Option<i64>, PolylineError> {
    let mut accumulated = 0u64;
    let mut shift = 0u32;

    loop {
        let Some(byte) = bytes.next() else {
            return if shift == 0 {
                Ok(None)
            } else {
                Err(PolylineError::UnterminatedSequence)
            };
        };
        if !(ASCII_OFFSET..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter(byte as char));
        }

        let group = (byte - ASCII_OFFSET) as u64;
        accumulated |= (group & 0x1f) << shift;
        shift += 5;
        if group & CONTINUATION_BIT == 0 {
            break;
        }
    }

    let value = if accumulated & 1 == 1 {
        !(accumulated >> 1)
    } else {
        accumulated >> 1
    };
    Ok(Some(value as i64))
}
