//! Recursive merge of two mappings.

use std::collections::btree_map::Entry;

use crate::value::{Map, Value};

/// Merges `incoming` into `acc`.
///
/// Nested maps merge recursively and lists concatenate, incoming items last.
/// Any other pair is resolved in favor of `incoming`, except that an incoming
/// null never replaces an existing value: headers carry `{section: null}` and
/// must not clobber content merged before them.
pub fn deep_merge(acc: &mut Map, incoming: Map) {
    for (key, rhs) in incoming {
        match acc.fields.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(rhs);
            }
            Entry::Occupied(mut slot) => merge_value(slot.get_mut(), rhs),
        }
    }
}

fn merge_value(lhs: &mut Value, rhs: Value) {
    match (lhs, rhs) {
        (_, Value::Null) => {}
        (Value::Map(lhs), Value::Map(rhs)) => deep_merge(lhs, rhs),
        (Value::List(lhs), Value::List(rhs)) => lhs.extend(rhs),
        (lhs, rhs) => *lhs = rhs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_yaml;
    use pretty_assertions::assert_eq;

    fn map(yaml: &str) -> Map {
        match from_yaml(yaml).unwrap() {
            Value::Map(m) => m,
            other => panic!("expected map, got {:?}", other),
        }
    }

    fn merged(parts: &[&str]) -> Map {
        let mut acc = Map::new();
        for part in parts {
            deep_merge(&mut acc, map(part));
        }
        acc
    }

    #[test]
    fn test_disjoint_nested_keys_merge_in_either_order() {
        let expected = map("x:\n  a: 1\n  b: 2\n");
        assert_eq!(merged(&["x:\n  a: 1\n", "x:\n  b: 2\n"]), expected);
        assert_eq!(merged(&["x:\n  b: 2\n", "x:\n  a: 1\n"]), expected);
    }

    #[test]
    fn test_scalar_last_writer_wins() {
        assert_eq!(merged(&["x: 1\n", "x: 2\n"]), map("x: 2\n"));
    }

    #[test]
    fn test_lists_concatenate() {
        assert_eq!(
            merged(&["servers:\n- url: a\n", "servers:\n- url: b\n"]),
            map("servers:\n- url: a\n- url: b\n")
        );
    }

    #[test]
    fn test_type_conflict_incoming_wins() {
        assert_eq!(merged(&["x:\n  a: 1\n", "x: [1]\n"]), map("x: [1]\n"));
        assert_eq!(merged(&["x: [1]\n", "x: scalar\n"]), map("x: scalar\n"));
    }

    #[test]
    fn test_null_placeholder_does_not_clobber() {
        assert_eq!(
            merged(&["paths:\n  /a:\n    get: {}\n", "paths:\n"]),
            map("paths:\n  /a:\n    get: {}\n")
        );
    }

    #[test]
    fn test_content_replaces_null_placeholder() {
        assert_eq!(
            merged(&["info:\n", "info:\n  title: T\n"]),
            map("info:\n  title: T\n")
        );
    }

    #[test]
    fn test_null_into_empty_is_kept() {
        assert_eq!(merged(&["info:\n"]), map("info: ~\n"));
    }
}
