use anyhow::Result;
use numeric_json::{
    read_json, write_json, write_serializable, Datum, Extension, JsonWriter, LocalStorage,
    NdArray, NumericScalar, WriterConfig, WriterError,
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_writes_four_space_indented_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data = Datum::map([
        ("a", Datum::Int(1)),
        ("b", Datum::from(vec![1i64, 2, 3])),
    ]);

    let path = write_json(&data, temp_dir.path(), "result.json")?;

    assert_eq!(path, temp_dir.path().join("result.json"));
    let content = fs::read_to_string(&path)?;
    assert_eq!(
        content,
        "{\n    \"a\": 1,\n    \"b\": [\n        1,\n        2,\n        3\n    ]\n}"
    );
    Ok(())
}

#[test]
fn test_numeric_scalar_is_written_as_plain_number() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data = Datum::map([("score", Datum::from(NumericScalar::F64(3.5)))]);

    write_json(&data, temp_dir.path(), "score.json")?;

    let content = fs::read_to_string(temp_dir.path().join("score.json"))?;
    assert_eq!(content, "{\n    \"score\": 3.5\n}");
    Ok(())
}

#[test]
fn test_round_trip_normalizes_numeric_types() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let matrix = NdArray::new(
        vec![2, 2],
        vec![
            NumericScalar::F32(0.5),
            NumericScalar::F32(1.5),
            NumericScalar::F32(2.5),
            NumericScalar::F32(3.5),
        ],
    )?;
    let data = Datum::map([
        ("name", Datum::from("trial-7")),
        ("count", Datum::from(NumericScalar::U16(12))),
        ("flags", Datum::from(NdArray::from_vec(vec![true.into(), false.into()]))),
        ("matrix", Datum::from(matrix)),
        ("nested", Datum::map([("empty", Datum::List(vec![])), ("none", Datum::Null)])),
    ]);

    write_json(&data, temp_dir.path(), "trial.json")?;
    let read_back = read_json(temp_dir.path(), "trial.json")?;

    assert_eq!(
        read_back,
        json!({
            "name": "trial-7",
            "count": 12,
            "flags": [true, false],
            "matrix": [[0.5, 1.5], [2.5, 3.5]],
            "nested": {"empty": [], "none": null}
        })
    );

    // keys come back in insertion order
    let keys: Vec<_> = read_back.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["name", "count", "flags", "matrix", "nested"]);
    Ok(())
}

#[test]
fn test_second_write_overwrites_first() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let long = Datum::from((0..100i64).collect::<Vec<_>>());
    let short = Datum::map([("done", Datum::Bool(true))]);

    write_json(&long, temp_dir.path(), "out.json")?;
    write_json(&short, temp_dir.path(), "out.json")?;

    let content = fs::read_to_string(temp_dir.path().join("out.json"))?;
    assert_eq!(content, "{\n    \"done\": true\n}");
    Ok(())
}

#[test]
fn test_missing_directory_is_filesystem_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let missing = temp_dir.path().join("does-not-exist");

    let err = write_json(&Datum::Null, &missing, "out.json").unwrap_err();

    match err {
        WriterError::IoError { ref source, .. } => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
        }
        ref other => panic!("expected IoError, got {:?}", other),
    }
    assert!(!missing.exists());
    Ok(())
}

#[test]
fn test_unencodable_value_leaves_existing_file_untouched() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_json(&Datum::from(vec![1i64]), temp_dir.path(), "out.json")?;
    let before = fs::read_to_string(temp_dir.path().join("out.json"))?;

    let bad = Datum::map([(
        "value",
        Datum::Ext(Extension::Opaque {
            type_name: "datetime".to_string(),
        }),
    )]);
    let err = write_json(&bad, temp_dir.path(), "out.json").unwrap_err();

    assert!(matches!(err, WriterError::EncodingError { ref path, .. } if path == "$.value"));
    assert_eq!(fs::read_to_string(temp_dir.path().join("out.json"))?, before);
    Ok(())
}

#[test]
fn test_unencodable_value_creates_no_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let bad = Datum::Ext(Extension::Complex { re: 1.0, im: 1.0 });

    assert!(write_json(&bad, temp_dir.path(), "out.json").is_err());
    assert!(!temp_dir.path().join("out.json").exists());
    Ok(())
}

#[test]
fn test_write_serializable_values() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut counts = std::collections::BTreeMap::new();
    counts.insert("alpha", vec![1u8, 2]);
    counts.insert("beta", vec![]);

    write_serializable(&counts, temp_dir.path(), "counts.json")?;

    let content = fs::read_to_string(temp_dir.path().join("counts.json"))?;
    assert_eq!(
        content,
        "{\n    \"alpha\": [\n        1,\n        2\n    ],\n    \"beta\": []\n}"
    );
    Ok(())
}

#[test]
fn test_atomic_writer_with_config_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("writer.toml");
    fs::write(&config_path, "atomic = true\nensure_ascii = true\nindent = 2\n")?;

    let config = WriterConfig::from_file(&config_path)?;
    let writer = JsonWriter::new(LocalStorage::new(temp_dir.path())).with_config(config);
    writer.write(&Datum::map([("city", Datum::from("Zürich"))]), "city.json")?;

    let content = fs::read_to_string(temp_dir.path().join("city.json"))?;
    assert_eq!(content, "{\n  \"city\": \"Z\\u00fcrich\"\n}");
    assert_eq!(writer.read("city.json")?, json!({"city": "Zürich"}));

    let mut names: Vec<_> = fs::read_dir(temp_dir.path())?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<_>>()?;
    names.sort();
    assert_eq!(names, vec!["city.json", "writer.toml"]);
    Ok(())
}

#[test]
fn test_non_finite_floats_are_written_as_literals() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data = Datum::map([
        ("loss", Datum::Float(f64::NAN)),
        ("bounds", Datum::from(NdArray::from_vec(vec![
            NumericScalar::F64(f64::NEG_INFINITY),
            NumericScalar::F64(f64::INFINITY),
        ]))),
    ]);

    write_json(&data, temp_dir.path(), "stats.json")?;

    let content = fs::read_to_string(temp_dir.path().join("stats.json"))?;
    assert_eq!(
        content,
        "{\n    \"loss\": NaN,\n    \"bounds\": [\n        -Infinity,\n        Infinity\n    ]\n}"
    );
    Ok(())
}

#[test]
fn test_non_ascii_is_escaped_by_default() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_json(&Datum::map([("naïve", Datum::from("😀"))]), temp_dir.path(), "emoji.json")?;

    let content = fs::read_to_string(temp_dir.path().join("emoji.json"))?;
    assert_eq!(content, "{\n    \"na\\u00efve\": \"\\ud83d\\ude00\"\n}");
    assert!(content.is_ascii());
    Ok(())
}

#[test]
fn test_nested_filename_writes_into_existing_subdirectory() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let err = write_json(&Datum::Int(1), temp_dir.path(), "sub/result.json").unwrap_err();
    match err {
        WriterError::IoError { ref source, .. } => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
        }
        ref other => panic!("expected IoError, got {:?}", other),
    }
    assert!(!temp_dir.path().join("sub").exists());

    fs::create_dir(temp_dir.path().join("sub"))?;
    let path = write_json(&Datum::Int(1), temp_dir.path(), "sub/result.json")?;
    assert_eq!(path, temp_dir.path().join("sub/result.json"));
    assert_eq!(fs::read_to_string(path)?, "1");
    Ok(())
}

#[test]
fn test_absolute_filename_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let target = temp_dir.path().join("abs.json");

    let err = write_json(&Datum::Null, temp_dir.path(), &target.to_string_lossy()).unwrap_err();

    assert!(matches!(err, WriterError::InvalidConfigValueError { .. }));
    assert!(!target.exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_read_only_directory_is_permission_error() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new()?;
    let locked = temp_dir.path().join("locked");
    fs::create_dir(&locked)?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o500))?;

    // privileged users bypass mode bits; nothing to assert then
    if fs::write(locked.join("writable-check"), b"").is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o700))?;
        return Ok(());
    }

    let result = write_json(&Datum::Int(1), &locked, "out.json");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o700))?;

    match result {
        Err(WriterError::IoError { ref path, ref source }) => {
            assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            assert_eq!(path, &locked.join("out.json"));
        }
        other => panic!("expected IoError, got {:?}", other),
    }
    Ok(())
}
