#![cfg(feature = "serde")]

use std::collections::BTreeMap;

use fg_reflect::backends::serde::SerializeDriver;
use fg_reflect::derive::Serializable;
use serde::Deserialize;

#[derive(Serializable, Default, Debug, PartialEq)]
struct Wrapper {
    x: f32,
    y: f32,
}

#[derive(Serializable, Default)]
struct Level {
    name: String,
    spawns: Vec<Wrapper>,
    #[serializable(skip)]
    dirty: bool,
}

/// The shape `Level` takes in serde formats.
#[derive(Deserialize, Debug, PartialEq)]
struct LevelData {
    name: String,
    spawns: Vec<BTreeMap<String, f32>>,
}

#[test]
fn json_matches_the_native_backend() {
    let value = Wrapper { x: 1.5, y: -2.0 };
    let text = serde_json::to_string(&SerializeDriver::new(&value)).unwrap();
    assert_eq!(text, r#"{"x":1.5,"y":-2.0}"#);

    #[cfg(feature = "json")]
    assert_eq!(text, fg_reflect::backends::json::to_json_string(&value));
}

#[test]
fn ron_output_reads_back_as_plain_data() {
    let level = Level {
        name: "cave".into(),
        spawns: vec![Wrapper { x: 0.5, y: 4.0 }, Wrapper::default()],
        dirty: true,
    };

    let text = ron::to_string(&SerializeDriver::new(&level)).unwrap();
    assert!(!text.contains("dirty"), "{text}");

    let back: BTreeMap<String, ron::Value> = ron::from_str(&text).unwrap();
    assert_eq!(back.keys().map(String::as_str).collect::<Vec<_>>(), ["name", "spawns"]);

    let json = serde_json::to_string(&SerializeDriver::new(&level)).unwrap();
    let data: LevelData = serde_json::from_str(&json).unwrap();
    assert_eq!(data.name, "cave");
    assert_eq!(data.spawns.len(), 2);
    assert_eq!(data.spawns[0]["x"], 0.5);
    assert_eq!(data.spawns[1]["y"], 0.0);
}

#[test]
fn ron_keeps_integer_widths() {
    let values = vec![u64::MAX, 0];
    let text = ron::to_string(&SerializeDriver::new(&values)).unwrap();
    let back: Vec<u64> = ron::from_str(&text).unwrap();
    assert_eq!(back, values);

    let map: BTreeMap<String, i8> = [("low".to_string(), i8::MIN)].into_iter().collect();
    let text = ron::to_string(&SerializeDriver::new(&map)).unwrap();
    let back: BTreeMap<String, i8> = ron::from_str(&text).unwrap();
    assert_eq!(back, map);
}
