use std::collections::HashSet;

use proptest::prelude::*;
use serde_json::json;
use utils_orderedmap::{from_json_str, OrderedMap, Pair, Parent, Path, Step, Value};

#[test]
fn from_pairs_keeps_order() {
    let map = OrderedMap::from_pairs([
        Pair::new("c", 1),
        Pair::new("a", "x"),
        Pair::new("b", Value::Null),
    ]);
    assert_eq!(map.keys(), ["c", "a", "b"]);
    assert_eq!(map.len(), 3);
    assert!(map.get_or_nil("b").is_null());
}

#[test]
fn sort_and_reinsert() {
    let mut map = from_json_str(r#"{"b": 2, "c": 3, "a": 1}"#).unwrap();
    map.sort_keys_by(|a, b| b.cmp(a));
    assert_eq!(map.keys(), ["c", "b", "a"]);

    map.sort_by(|(_, a), (_, b)| a.as_i64().cmp(&b.as_i64()));
    assert_eq!(map.keys(), ["a", "b", "c"]);

    map.delete("a");
    map.set("a", 10);
    assert_eq!(map.keys(), ["b", "c", "a"]);
}

#[test]
fn nested_set_in_existing_array() {
    let mut map = from_json_str(r#"{"parameters": {"children": [{"name": "a"}, {"name": "b"}, {"name": "c"}]}}"#).unwrap();
    let path: Path = "parameters.children[2].name".parse().unwrap();
    map.set_nested_path(&path, "changed").unwrap();
    assert_eq!(map.get_nested_path(&path).unwrap(), &Value::from("changed"));

    let path = Path::from(vec![
        Step::Map("parameters".into()),
        Step::Map("children".into()),
        Step::Index(1),
        Step::Map("extra".into()),
    ]);
    map.set_nested_path(&path, json!({"k": [1, 2]})).unwrap();
    assert_eq!(
        map.to_json_value().unwrap(),
        json!({"parameters": {"children": [
            {"name": "a"},
            {"name": "b", "extra": {"k": [1, 2]}},
            {"name": "changed"}
        ]}})
    );
}

#[test]
fn visitor_reports_paths_in_order() {
    let map = from_json_str(r#"{"b": {"y": 1, "x": [true]}, "a": "s"}"#).unwrap();
    let mut paths = Vec::new();
    map.visit_all_recursive(|path, _, parent| {
        let in_array = matches!(parent, Parent::Array(_));
        paths.push((path.to_string(), in_array));
    });
    assert_eq!(
        paths,
        vec![
            ("b".to_string(), false),
            ("b.y".to_string(), false),
            ("b.x".to_string(), false),
            ("b.x[0]".to_string(), true),
            ("a".to_string(), false),
        ]
    );
}

proptest! {
    #[test]
    fn keys_and_values_stay_in_sync(ops in proptest::collection::vec((any::<bool>(), "[a-e]", any::<i64>()), 0..40)) {
        let mut map = OrderedMap::new();
        for (insert, key, value) in ops {
            if insert {
                map.set(key, value);
            } else {
                map.delete(&key);
            }
        }
        let keys: HashSet<&str> = map.keys().iter().map(String::as_str).collect();
        prop_assert_eq!(keys.len(), map.len());
        let iterated: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        prop_assert_eq!(iterated, map.keys().iter().map(String::as_str).collect::<Vec<_>>());
        for key in map.keys() {
            prop_assert!(map.contains_key(key));
        }
    }

    #[test]
    fn json_round_trip_keeps_order(keys in proptest::collection::vec("[a-z]{1,6}", 0..12)) {
        let mut map = OrderedMap::new();
        for (i, key) in keys.iter().enumerate() {
            map.set(key.as_str(), i);
        }
        let encoded = utils_orderedmap::to_json_string(&map).unwrap();
        let decoded = from_json_str(&encoded).unwrap();
        prop_assert_eq!(decoded.keys(), map.keys());
        prop_assert_eq!(decoded, map);
    }
}
