use serde::Deserialize;
use serde_json::json;
use utils_orderedmap::{from_json_str, to_json_string, to_json_string_pretty, OrderedMap, Value};

#[test]
fn decode_keeps_document_order() {
    let map = from_json_str(r#"{"z": 1, "a": 2, "b": 3}"#).unwrap();
    assert_eq!(map.keys(), ["z", "a", "b"]);
    assert_eq!(to_json_string(&map).unwrap(), r#"{"z":1,"a":2,"b":3}"#);
}

#[test]
fn decode_nested_objects_as_ordered_maps() {
    let map = from_json_str(
        r#"{
            "number": 4,
            "orderedmap": {"e": 1, "a": 2, "nested": {"y": null, "x": [true, 1.5]}},
            "slice": [{"b": 1, "a": 2}, "x"]
        }"#,
    )
    .unwrap();

    let inner = map.get("orderedmap").and_then(Value::as_map).unwrap();
    assert_eq!(inner.keys(), ["e", "a", "nested"]);
    let nested = map.get_nested_map("orderedmap.nested").unwrap().unwrap();
    assert_eq!(nested.keys(), ["y", "x"]);
    assert!(nested.get_or_nil("y").is_null());

    let in_array = map.get_nested_map("slice[0]").unwrap().unwrap();
    assert_eq!(in_array.keys(), ["b", "a"]);
    assert_eq!(map.get_nested("slice[1]").unwrap(), &Value::from("x"));
}

#[test]
fn duplicate_keys_take_last_position() {
    let map = from_json_str(r#"{"a": 1, "b": {"x": 1, "y": 2, "x": 3}, "a": {"c": 1}}"#).unwrap();
    assert_eq!(map.keys(), ["b", "a"]);
    assert_eq!(map.get_nested("a.c").unwrap(), &Value::from(1));
    let b = map.get_nested_map("b").unwrap().unwrap();
    assert_eq!(b.keys(), ["y", "x"]);
    assert_eq!(b.get("x"), Some(&Value::from(3)));
}

#[test]
fn special_characters_in_keys() {
    let json = r#"{"\\.<>[]{}_-": 1, "test\n\t\"ing": 2}"#;
    let map = from_json_str(json).unwrap();
    assert_eq!(map.keys(), ["\\.<>[]{}_-", "test\n\t\"ing"]);
    assert_eq!(from_json_str(&to_json_string(&map).unwrap()).unwrap(), map);
}

#[test]
fn empty_containers_round_trip() {
    for json in [r#"{"x":[]}"#, r#"{"x":{}}"#, "{}"] {
        let map = from_json_str(json).unwrap();
        assert_eq!(to_json_string(&map).unwrap(), json);
    }
}

#[test]
fn pretty_output_is_indented_in_order() {
    let map = from_json_str(r#"{"number": 4, "slice": ["1", 1], "orderedmap": {"e": 1, "a": 2}}"#).unwrap();
    let expected = r#"{
  "number": 4,
  "slice": [
    "1",
    1
  ],
  "orderedmap": {
    "e": 1,
    "a": 2
  }
}"#;
    assert_eq!(to_json_string_pretty(&map).unwrap(), expected);
}

#[test]
fn decode_inside_struct() {
    #[derive(Deserialize)]
    struct Config {
        data: OrderedMap,
    }

    let config: Config = serde_json::from_str(r#"{"data": {"x": 1, "a": 2}}"#).unwrap();
    assert_eq!(config.data.keys(), ["x", "a"]);
    assert_eq!(config.data.get("x"), Some(&Value::from(1)));
}

#[test]
fn to_json_value_is_recursive() {
    let map = from_json_str(r#"{"b": {"d": [1, {"e": "f"}]}, "a": null}"#).unwrap();
    let value = map.to_json_value().unwrap();
    assert_eq!(value, json!({"b": {"d": [1, {"e": "f"}]}, "a": null}));
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["b", "a"]);
}

#[test]
fn any_values_cannot_be_encoded() {
    let mut map = OrderedMap::new();
    map.set("ok", 1);
    map.set("handle", Value::any(vec![1_i32]));
    let err = map.to_json_value().unwrap_err();
    assert!(err.to_string().contains("Vec<i32>"));
}
