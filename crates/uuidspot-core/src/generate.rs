//! Identifier generation, single and bulk.

use std::sync::OnceLock;

use uuid::timestamp::context::Context;
use uuid::{Timestamp, Uuid};

use crate::error::GenerateError;
use crate::version::UuidVersion;

/// Upper bound on a single bulk request.
pub const MAX_BULK_COUNT: i64 = 500;

/// Process-wide v1 state: a clock-sequence context plus a random node id.
///
/// The node id carries the multicast bit, marking it as randomly generated
/// rather than a real MAC address (RFC 4122 §4.5).
fn v1_state() -> &'static (Context, [u8; 6]) {
    static STATE: OnceLock<(Context, [u8; 6])> = OnceLock::new();
    STATE.get_or_init(|| {
        let seed = *Uuid::new_v4().as_bytes();
        let context = Context::new(u16::from_be_bytes([seed[0], seed[1]]));
        let mut node = [seed[2], seed[3], seed[4], seed[5], seed[6], seed[7]];
        node[0] |= 0x01;
        (context, node)
    })
}

/// Generate one identifier of the selected version, rendered in the
/// canonical lowercase hyphenated form.
pub fn generate(version: UuidVersion) -> String {
    let uuid = match version {
        UuidVersion::V1 => {
            let (context, node) = v1_state();
            Uuid::new_v1(Timestamp::now(context), node)
        }
        UuidVersion::V4 => Uuid::new_v4(),
        UuidVersion::V7 => Uuid::now_v7(),
    };
    uuid.to_string()
}

/// Generate exactly `count` identifiers, or fail before generating any.
///
/// Duplicates are neither checked nor prevented; uniqueness is the
/// underlying generator's collision probability.
pub fn generate_many(count: i64, version: UuidVersion) -> Result<Vec<String>, GenerateError> {
    if !(1..=MAX_BULK_COUNT).contains(&count) {
        return Err(GenerateError::InvalidCount { count });
    }
    Ok((0..count).map(|_| generate(version)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Canonical grouped-hex form: 8-4-4-4-12, lowercase hex only.
    fn is_canonical(s: &str) -> bool {
        if s.len() != 36 {
            return false;
        }
        s.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit() && !c.is_ascii_uppercase(),
        })
    }

    /// The version digit sits at index 14, right after the second hyphen.
    fn version_digit(s: &str) -> u8 {
        s.as_bytes()[14] - b'0'
    }

    #[test]
    fn test_generate_canonical_form_per_version() {
        for version in [UuidVersion::V1, UuidVersion::V4, UuidVersion::V7] {
            let id = generate(version);
            assert!(is_canonical(&id), "not canonical: {id}");
            assert_eq!(version_digit(&id), version.number());

            let parsed = Uuid::parse_str(&id).unwrap();
            assert_eq!(parsed.get_variant(), uuid::Variant::RFC4122);
        }
    }

    #[test]
    fn test_generate_many_returns_exact_count() {
        for count in [1, 2, 17, 499, 500] {
            let ids = generate_many(count, UuidVersion::V4).unwrap();
            assert_eq!(ids.len(), count as usize);
            for id in &ids {
                assert!(is_canonical(id));
                assert_eq!(version_digit(id), 4);
            }
        }
    }

    #[test]
    fn test_generate_many_rejects_out_of_range_counts() {
        for count in [0, -1, -500, 501, i64::MAX] {
            assert_eq!(
                generate_many(count, UuidVersion::V7),
                Err(GenerateError::InvalidCount { count })
            );
        }
    }

    #[test]
    fn test_v7_sorts_by_generation_time() {
        let earlier = generate(UuidVersion::V7);
        // v7 encodes unix milliseconds in the leading 48 bits; a strictly
        // later clock value must sort after.
        std::thread::sleep(std::time::Duration::from_millis(5));
        let later = generate(UuidVersion::V7);
        assert!(earlier < later, "{earlier} !< {later}");
    }

    #[test]
    fn test_v1_timestamp_is_decodable() {
        let before = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();

        let id = generate(UuidVersion::V1);
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 1);
        assert_eq!(parsed.get_variant(), uuid::Variant::RFC4122);

        let ts = parsed.get_timestamp().expect("v1 carries a timestamp");
        let (secs, _nanos) = ts.to_unix();
        assert!(secs >= before && secs <= before + 5, "decoded {secs}");
    }

    #[test]
    fn test_v1_node_has_multicast_bit() {
        let id = generate(UuidVersion::V1);
        let parsed = Uuid::parse_str(&id).unwrap();
        let node_first_byte = parsed.as_bytes()[10];
        assert_eq!(node_first_byte & 0x01, 0x01);
    }
}
