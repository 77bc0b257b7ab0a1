// ── Credential presence ──
//
// Keys and addresses arrive either as byte arrays or as hex strings, and
// an unset value is all zeros rather than missing. Everything that gates
// a device action goes through `is_absent`.

use lorasim_api::KeyMaterial;

/// Whether a byte-valued field is effectively unset.
///
/// - missing / `null` → absent
/// - byte array → absent iff every byte is zero (an empty array too)
/// - string → whitespace stripped, absent iff empty or only `0`s
/// - anything else → absent
pub fn is_absent(value: Option<&KeyMaterial>) -> bool {
    match value {
        None => true,
        Some(KeyMaterial::Bytes(bytes)) => bytes.iter().all(|b| *b == 0),
        Some(KeyMaterial::Hex(text)) => text
            .chars()
            .filter(|c| !c.is_whitespace())
            .all(|c| c == '0'),
        Some(KeyMaterial::Other(_)) => true,
    }
}

/// Inverse of [`is_absent`].
pub fn is_present(value: Option<&KeyMaterial>) -> bool {
    !is_absent(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn hex(s: &str) -> KeyMaterial {
        KeyMaterial::from(s)
    }

    #[test]
    fn missing_is_absent() {
        assert!(is_absent(None));
    }

    #[test]
    fn empty_and_zero_strings_are_absent() {
        assert!(is_absent(Some(&hex(""))));
        assert!(is_absent(Some(&hex("000000"))));
        assert!(is_absent(Some(&hex("0 0 0"))));
        assert!(is_absent(Some(&hex(" \t\n"))));
    }

    #[test]
    fn zero_byte_arrays_are_absent() {
        assert!(is_absent(Some(&KeyMaterial::Bytes(vec![0; 16]))));
        assert!(is_absent(Some(&KeyMaterial::Bytes(Vec::new()))));
    }

    #[test]
    fn non_zero_values_are_present() {
        assert!(is_present(Some(&hex("0001"))));
        assert!(is_present(Some(&hex("ab"))));
        assert!(is_present(Some(&KeyMaterial::Bytes(vec![0, 0, 1]))));
    }

    #[test]
    fn unrecognised_shapes_are_absent() {
        assert!(is_absent(Some(&KeyMaterial::Other(json!(42)))));
        assert!(is_absent(Some(&KeyMaterial::Other(json!({ "k": 1 })))));
        assert!(is_absent(Some(&KeyMaterial::Other(json!(["aa"])))));
    }

    #[test]
    fn decoded_wire_values_classify_like_literals() {
        let zero: KeyMaterial = serde_json::from_value(json!([0, 0, 0, 0])).unwrap();
        let set: KeyMaterial = serde_json::from_value(json!("26011BDA")).unwrap();
        assert!(is_absent(Some(&zero)));
        assert!(is_present(Some(&set)));
    }
}
