#![cfg(feature = "json")]

use std::collections::{BTreeMap, HashMap};

use fg_reflect::DeserializeError;
use fg_reflect::Serializable;
use fg_reflect::backends::json::{
    JsonError, deserialize_json_into, from_json_str, from_json_value, to_json_string, to_json_value,
};
use fg_reflect::derive::Serializable;
use serde_json::{Value, json};

fn read_error<T: Serializable>(json: Value) -> DeserializeError {
    match from_json_value::<T>(&json) {
        Ok(_) => panic!("reading {json} should fail"),
        Err(err) => err,
    }
}

#[derive(Serializable, Default, Debug, PartialEq)]
struct Wrapper {
    x: f32,
    y: f32,
}

#[derive(Serializable, Default, Debug, PartialEq)]
struct Limits {
    a: i8,
    b: i16,
    c: i32,
    d: i64,
    e: u8,
    f: u16,
    g: u32,
    h: u64,
    small: f32,
    large: f64,
    flag: bool,
    label: String,
}

#[derive(Serializable, Default, Debug, PartialEq)]
struct Pair {
    a: i32,
    b: i32,
}

#[test]
fn struct_text_keeps_member_order() {
    let value = Wrapper { x: 1.5, y: -2.0 };
    assert_eq!(to_json_string(&value), r#"{"x":1.5,"y":-2.0}"#);

    let back: Wrapper = from_json_str(r#"{"y":-2.0,"x":1.5}"#).unwrap();
    assert_eq!(back, value);
}

#[test]
fn missing_member_is_named() {
    let err = from_json_str::<Wrapper>(r#"{"x":1.5}"#).unwrap_err();
    assert!(err.to_string().contains("\"y\""), "{err}");

    let err = read_error::<Pair>(json!({ "a": 1 }));
    assert_eq!(
        err,
        DeserializeError::MissingMember {
            member: "b".into(),
            type_name: "Pair".into(),
        }
    );
}

#[test]
fn unknown_members_are_ignored() {
    let pair: Pair = from_json_value(&json!({ "a": 1, "extra": [1, 2, 3], "b": 2 })).unwrap();
    assert_eq!(pair, Pair { a: 1, b: 2 });
}

#[test]
fn limits_round_trip() {
    let max = Limits {
        a: i8::MAX,
        b: i16::MAX,
        c: i32::MAX,
        d: i64::MAX,
        e: u8::MAX,
        f: u16::MAX,
        g: u32::MAX,
        h: u64::MAX,
        small: 3.25,
        large: -1234.5,
        flag: true,
        label: "\"quoted\" / \u{e9}".into(),
    };
    let min = Limits {
        a: i8::MIN,
        b: i16::MIN,
        c: i32::MIN,
        d: i64::MIN,
        small: -0.125,
        large: 1.0e-3,
        ..Limits::default()
    };

    for value in [max, min, Limits::default()] {
        let text = to_json_string(&value);
        let back: Limits = from_json_str(&text).unwrap();
        assert_eq!(back, value, "{text}");
    }
}

#[test]
fn out_of_range_integers_fail_with_location() {
    let mut json = to_json_value(&Limits::default());
    json["e"] = json!(256);

    let err = read_error::<Limits>(json);
    assert_eq!(err.pointer(), Some("/e"));
    assert_eq!(
        err.root(),
        &DeserializeError::OutOfRange {
            value: "256".into(),
            type_name: "u8".into(),
        }
    );

    let err = read_error::<u64>(json!(-1));
    assert!(matches!(err, DeserializeError::OutOfRange { .. }), "{err}");
}

#[test]
fn floats_read_integers() {
    let wrapper: Wrapper = from_json_value(&json!({ "x": 3, "y": -4 })).unwrap();
    assert_eq!(wrapper, Wrapper { x: 3.0, y: -4.0 });
}

#[test]
fn shape_mismatch_reports_kinds() {
    let err = read_error::<Pair>(json!({ "a": "one", "b": 2 }));
    assert_eq!(err.pointer(), Some("/a"));
    assert_eq!(
        err.root(),
        &DeserializeError::TypeMismatch {
            expected: "integer",
            found: "string",
        }
    );

    let err = read_error::<Vec<u8>>(json!({ "a": 1 }));
    assert_eq!(err.to_string(), "expected array, found object");
}

#[test]
fn collections_round_trip() {
    let mut scores = HashMap::new();
    scores.insert(String::from("alice"), vec![1_u16, 2]);
    scores.insert(String::from("bob"), Vec::new());

    let json = to_json_value(&scores);
    assert_eq!(json, json!({ "alice": [1, 2], "bob": [] }));
    let back: HashMap<String, Vec<u16>> = from_json_value(&json).unwrap();
    assert_eq!(back, scores);

    let mut ordered = BTreeMap::new();
    ordered.insert(String::from("b"), Box::new(2.5_f64));
    ordered.insert(String::from("a"), Box::new(-1.0));
    assert_eq!(to_json_string(&ordered), r#"{"a":-1.0,"b":2.5}"#);
}

#[test]
fn read_in_place_replaces_collections() {
    let mut values = vec![9_i32, 9, 9];
    deserialize_json_into(&json!([1, 2]), &mut values).unwrap();
    assert_eq!(values, [1, 2]);

    let mut pair = Pair { a: 5, b: 6 };
    deserialize_json_into(&json!({ "a": 1, "b": 2 }), &mut pair).unwrap();
    assert_eq!(pair, Pair { a: 1, b: 2 });
}

#[test]
fn nested_errors_point_at_the_innermost_value() {
    #[derive(Serializable, Default, Debug)]
    struct Level {
        pairs: Vec<Pair>,
    }

    let err = read_error::<Level>(json!({ "pairs": [{ "a": 1, "b": 2 }, { "a": 1, "b": true }] }));
    assert_eq!(err.pointer(), Some("/pairs/1/b"));
    assert_eq!(err.to_string(), "expected integer, found bool (at /pairs/1/b)");
}

#[test]
fn invalid_text_is_a_parse_error() {
    assert!(matches!(from_json_str::<Pair>("{\"a\": 1,"), Err(JsonError::Parse(_))));
    assert!(matches!(from_json_str::<Pair>("{}"), Err(JsonError::Deserialize(_))));
}

#[cfg(feature = "glam")]
mod math {
    use fg_reflect::DeserializeError;
    use fg_reflect::backends::json::{from_json_value, to_json_value};
    use glam::{Mat2, Quat, Vec2, Vec3};
    use serde_json::json;

    #[test]
    fn vectors_are_arrays() {
        assert_eq!(to_json_value(&Vec2::new(1.0, 2.0)), json!([1.0, 2.0]));
        assert_eq!(from_json_value::<Vec3>(&json!([1, 2, 3])).unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            from_json_value::<Quat>(&json!([0.0, 0.0, 0.0, 1.0])).unwrap(),
            Quat::IDENTITY
        );
    }

    #[test]
    fn matrices_are_column_arrays() {
        let matrix = Mat2::from_cols(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        let json = to_json_value(&matrix);
        assert_eq!(json, json!([[1.0, 2.0], [3.0, 4.0]]));
        assert_eq!(from_json_value::<Mat2>(&json).unwrap(), matrix);
    }

    #[test]
    fn arity_mismatch() {
        let err = from_json_value::<Vec2>(&json!([1.0, 2.0, 3.0])).unwrap_err();
        assert_eq!(
            err,
            DeserializeError::ArityMismatch {
                type_name: "Vec2".into(),
                expected: 2,
                actual: Some(3),
            }
        );

        let err = from_json_value::<Mat2>(&json!([[1.0, 2.0], [3.0]])).unwrap_err();
        assert_eq!(err.pointer(), Some("/1"));
    }
}
