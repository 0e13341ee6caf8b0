//! Property tests for field reduction.
//!
//! Covers the skip rules, last-write-wins for repeated names, and
//! determinism across equal inputs.

use partform_core::{FieldValue, RawPart, reduce};
use proptest::prelude::*;

fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

fn payload() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..32)
}

/// A part that the reducer always skips.
fn skipped_part() -> impl Strategy<Value = RawPart> {
    prop_oneof![
        payload().prop_map(|data| RawPart::new().header("X-Other", "1").data(data)),
        (field_name(), payload()).prop_map(|(name, data)| {
            RawPart::new()
                .header("Content-Disposition", format!("inline; name=\"{name}\""))
                .data(data)
        }),
        payload().prop_map(|data| {
            RawPart::new()
                .header("Content-Disposition", "form-data; filename=\"a.bin\"")
                .data(data)
        }),
    ]
}

/// A part that the reducer always honors, with its expected name.
fn honored_part() -> impl Strategy<Value = (String, RawPart)> {
    (field_name(), payload(), any::<bool>()).prop_map(|(name, data, as_file)| {
        let mut part = RawPart::new()
            .header("Content-Disposition", format!("form-data; name=\"{name}\""))
            .data(data);
        if as_file {
            part = part.header("Content-Type", "application/octet-stream");
        }
        (name, part)
    })
}

fn expected_value(part: &RawPart) -> FieldValue {
    let value = reduce(vec![part.clone()]).expect("single part reduces");
    value
        .into_iter()
        .next()
        .map(|(_, v)| v)
        .expect("honored part yields a field")
}

proptest! {
    #[test]
    fn skipped_parts_contribute_nothing(parts in prop::collection::vec(skipped_part(), 0..8)) {
        let fields = reduce(parts).unwrap();
        prop_assert!(fields.is_empty());
    }

    #[test]
    fn skipped_parts_do_not_disturb_honored_ones(
        honored in prop::collection::vec(honored_part(), 1..8),
        noise in prop::collection::vec(skipped_part(), 0..8),
    ) {
        let mut parts = Vec::new();
        let mut noise = noise.into_iter();
        for (_, part) in &honored {
            parts.push(part.clone());
            if let Some(skipped) = noise.next() {
                parts.push(skipped);
            }
        }

        let with_noise = reduce(parts).unwrap();
        let without_noise = reduce(honored.into_iter().map(|(_, p)| p)).unwrap();
        prop_assert_eq!(with_noise, without_noise);
    }

    #[test]
    fn last_write_wins(parts in prop::collection::vec(honored_part(), 1..12)) {
        let fields = reduce(parts.iter().map(|(_, p)| p.clone())).unwrap();

        let mut names: Vec<&str> = parts.iter().map(|(n, _)| n.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(fields.len(), names.len());

        for name in names {
            let (_, last) = parts.iter().rev().find(|(n, _)| n == name).unwrap();
            let expected = expected_value(last);
            prop_assert_eq!(fields.get(name), Some(&expected));
        }
    }

    #[test]
    fn equal_inputs_reduce_equally(parts in prop::collection::vec(honored_part(), 0..8)) {
        let first = reduce(parts.iter().map(|(_, p)| p.clone())).unwrap();
        let second = reduce(parts.into_iter().map(|(_, p)| p)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn text_fields_are_lossy_utf8(data in payload()) {
        let part = RawPart::new()
            .header("content-disposition", "form-data; name=\"t\"")
            .data(data.clone());
        let fields = reduce(vec![part]).unwrap();
        let expected = String::from_utf8_lossy(&data);
        prop_assert_eq!(fields.text("t"), Some(&*expected));
    }
}
