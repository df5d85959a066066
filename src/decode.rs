//! Decoders for the tagged cell format used by the balance tables.
//!
//! Every raw value is either bare text or a two-part `kind:::value` string,
//! where `kind` names the data author's intended type (`int`, `double`,
//! `decimalarray`, `unit_id`, `preset`, `legion_id`). Decoding a cell
//! against an expected kind has three outcomes:
//!
//! - kind matches (or the decoder is wildcard) and the value is non-empty:
//!   the value is parsed as the target type.
//! - kind mismatch or empty value: the cell carries no value for this
//!   field. This is how the data disables optional fields, so it is *not*
//!   an error -- decoders return `Ok(None)`.
//! - a kind-matched (or untagged) cell whose text fails numeric parsing:
//!   a [`DecodeError`]. Malformed numerics mean the data format changed
//!   under us, and guessing past that would corrupt every downstream stat.
//!
//! Untagged cells are interpreted directly as the target type, covering
//! legacy cells that predate the tagging scheme.

use thiserror::Error;

use crate::game_types::{DecimalArray, GameEnum, UnitRef};

/// Kind tag for decimal cells.
pub const KIND_DOUBLE: &str = "double";
/// Kind tag for integer cells.
pub const KIND_INT: &str = "int";
/// Kind tag for comma-separated decimal sequence cells.
pub const KIND_DECIMAL_ARRAY: &str = "decimalarray";
/// Kind tag for unit reference cells.
pub const KIND_UNIT_ID: &str = "unit_id";

/// The separator between a cell's kind tag and its value.
const KIND_SEPARATOR: &str = ":::";

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed {target} value: {text:?}")]
    Malformed {
        target: &'static str,
        text: String,
    },
}

/// Splits a raw cell into its optional kind tag and its value, both
/// trimmed. A cell without the `:::` separator has no kind.
fn split_tagged(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(KIND_SEPARATOR) {
        Some((kind, value)) => (Some(kind.trim()), value.trim()),
        None => (None, raw.trim()),
    }
}

/// Applies the kind-matching rules and hands a matched value to `convert`.
///
/// `expected` of `None` is the wildcard: any kind tag is accepted.
fn decode_with<T>(
    raw: &str,
    expected: Option<&str>,
    convert: impl FnOnce(&str) -> Result<Option<T>, DecodeError>,
) -> Result<Option<T>, DecodeError> {
    match split_tagged(raw) {
        // Untagged legacy cell: interpret the whole cell directly.
        (None, value) => convert(value),
        (Some(kind), value) => {
            if expected.is_none_or(|e| e == kind) && !value.is_empty() {
                convert(value)
            } else {
                Ok(None)
            }
        }
    }
}

pub fn decode_f64(raw: &str) -> Result<Option<f64>, DecodeError> {
    decode_with(raw, Some(KIND_DOUBLE), |value| {
        value
            .parse()
            .map(Some)
            .map_err(|_| DecodeError::Malformed {
                target: "double",
                text: value.to_owned(),
            })
    })
}

pub fn decode_i32(raw: &str) -> Result<Option<i32>, DecodeError> {
    decode_with(raw, Some(KIND_INT), |value| {
        value
            .parse()
            .map(Some)
            .map_err(|_| DecodeError::Malformed {
                target: "int",
                text: value.to_owned(),
            })
    })
}

pub fn decode_decimal_array(raw: &str) -> Result<Option<DecimalArray>, DecodeError> {
    decode_with(raw, Some(KIND_DECIMAL_ARRAY), |value| {
        value
            .parse()
            .map(Some)
            .map_err(|_| DecodeError::Malformed {
                target: "decimalarray",
                text: value.to_owned(),
            })
    })
}

/// Decodes a free-form string cell. String cells accept any kind tag.
pub fn decode_string(raw: &str) -> Option<String> {
    // Infallible: the value is taken verbatim.
    decode_with(raw, None, |value| {
        if value.is_empty() {
            Ok(None)
        } else {
            Ok(Some(value.to_owned()))
        }
    })
    .unwrap_or(None)
}

/// Decodes a unit reference cell. The identifier is wrapped unresolved;
/// see [`crate::game_types::UnitIndex`] for resolution.
pub fn decode_unit_ref(raw: &str) -> Option<UnitRef> {
    decode_with(raw, Some(KIND_UNIT_ID), |value| {
        Ok(Some(UnitRef(value.to_owned())))
    })
    .unwrap_or(None)
}

/// Decodes an enumeration cell by internal-name lookup.
///
/// A value that matches no member yields `None`, the same as a kind
/// mismatch: the emitters later substitute the enumeration's `Illegal`
/// sentinel. `None` here keeps "no data" distinguishable from a real
/// member for as long as possible.
pub fn decode_enum<E: GameEnum>(raw: &str) -> Option<E> {
    decode_with(raw, Some(E::KIND), |value| Ok(E::from_internal_name(value))).unwrap_or(None)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game_types::{ArmorType, Legion};

    #[test]
    fn tagged_match_parses_value() {
        assert_eq!(decode_i32("int:::42").unwrap(), Some(42));
        assert_eq!(decode_f64("double:::0.95").unwrap(), Some(0.95));
        assert_eq!(
            decode_decimal_array("decimalarray:::1.5,2.0,3.25").unwrap(),
            Some(DecimalArray(vec![1.5, 2.0, 3.25]))
        );
    }

    #[test]
    fn kind_mismatch_is_no_value() {
        assert_eq!(decode_i32("double:::42").unwrap(), None);
        assert_eq!(decode_f64("int:::42").unwrap(), None);
        assert_eq!(decode_enum::<ArmorType>("legion_id:::arm_light"), None);
    }

    #[test]
    fn empty_value_is_no_value() {
        assert_eq!(decode_i32("int:::").unwrap(), None);
        assert_eq!(decode_string("*:::"), None);
        assert_eq!(decode_unit_ref("unit_id:::"), None);
    }

    #[test]
    fn untagged_cell_parses_directly() {
        assert_eq!(decode_i32("7").unwrap(), Some(7));
        assert_eq!(decode_f64("1.25").unwrap(), Some(1.25));
        assert_eq!(decode_string("hello"), Some("hello".to_owned()));
    }

    #[test]
    fn malformed_numeric_is_fatal() {
        assert!(decode_i32("int:::abc").is_err());
        assert!(decode_f64("double:::1.2.3").is_err());
        assert!(decode_i32("xyz").is_err());
        assert!(decode_decimal_array("decimalarray:::1.5,nope").is_err());
    }

    #[test]
    fn whitespace_around_tag_and_value() {
        assert_eq!(decode_i32(" int ::: 42 ").unwrap(), Some(42));
    }

    #[test]
    fn enum_by_internal_name() {
        assert_eq!(
            decode_enum::<ArmorType>("preset:::arm_fortified"),
            Some(ArmorType::Fortified)
        );
        assert_eq!(decode_enum::<ArmorType>("preset:::arm_unknown"), None);
        assert_eq!(
            decode_enum::<Legion>("legion_id:::nether_legion_id"),
            Some(Legion::Nether)
        );
        // Legions use their own kind tag, not "preset".
        assert_eq!(decode_enum::<Legion>("preset:::nether_legion_id"), None);
    }

    #[test]
    fn string_cells_accept_any_kind() {
        assert_eq!(
            decode_string("preset:::Splashes/Tempest.png"),
            Some("Splashes/Tempest.png".to_owned())
        );
    }

    #[test]
    fn unit_ref_wraps_raw_identifier() {
        assert_eq!(
            decode_unit_ref("unit_id:::crab_unit_id"),
            Some(UnitRef("crab_unit_id".to_owned()))
        );
    }
}
