//! End-to-end integration tests
//!
//! These tests drive the public contact surface (`read`, `project`,
//! `update`) against a copy of `tests/fixtures/clients.dat`. Each test:
//! 1. Copies the fixture into a fresh temporary directory
//! 2. Runs operations through `LegacyCodec` / `AsyncLegacyCodec`
//! 3. Checks results and the bytes left on disk
//!
//! The fixture covers multi-valued balances, an empty dates attribute,
//! mismatched balance/date counts, and unparseable numbers and dates.

#[cfg(test)]
mod tests {
    use legacy_dynarray::core::delimiter::{parse_record, serialize_record};
    use legacy_dynarray::{
        parse_attribute_map, AsyncLegacyCodec, AttributeMap, FieldSchema, FlatFileStore,
        LatestBalance, LegacyCodec, ProjectionOptions, RecordStore,
    };
    use rstest::rstest;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const FIXTURE: &str = "tests/fixtures/clients.dat";

    /// Copy the fixture into a temp dir and open a codec over the copy
    fn open_fixture() -> (TempDir, PathBuf, LegacyCodec<FlatFileStore>) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("LEGACY_CLIENTS.dat");
        fs::copy(FIXTURE, &path)
            .unwrap_or_else(|e| panic!("Failed to copy fixture {}: {}", FIXTURE, e));
        let codec = LegacyCodec::new(FlatFileStore::new(&path), FieldSchema::default());
        (dir, path, codec)
    }

    fn lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .expect("Failed to read data file")
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_every_fixture_line_round_trips() {
        let content = fs::read_to_string(FIXTURE).expect("Failed to read fixture");
        for line in content.lines() {
            assert_eq!(serialize_record(&parse_record(line)), line);
        }
    }

    #[rstest]
    #[case::name("101", 2, None, "John Doe")]
    #[case::first_balance("101", 3, Some(1), "2500.00")]
    #[case::second_balance("101", 3, Some(2), "400.00")]
    #[case::missing_value("101", 3, Some(99), "")]
    #[case::missing_attribute("101", 99, None, "")]
    #[case::empty_attribute("103", 4, None, "")]
    fn test_read_and_extract(
        #[case] key: &str,
        #[case] attribute: usize,
        #[case] value: Option<usize>,
        #[case] expected: &str,
    ) {
        let (_dir, _path, codec) = open_fixture();
        let record = codec.read(key).unwrap();
        assert_eq!(record.extract(attribute, value, None).unwrap(), expected);
    }

    #[test]
    fn test_project_matches_legacy_view() {
        let (_dir, _path, codec) = open_fixture();
        let view = codec.project("101", &ProjectionOptions::default()).unwrap();

        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            serde_json::json!({
                "client_id": "101",
                "client_name": "John Doe",
                "current_balance": "12.50",
                "legacy_balances_history": ["2500.00", "400.00", "12.50"],
                "transaction_dates": ["2023-11-01", "2023-12-01", "2024-01-15"],
                "transactions": [
                    {"amount": "2500.00", "date": "2023-11-01"},
                    {"amount": "400.00", "date": "2023-12-01"},
                    {"amount": "12.50", "date": "2024-01-15"}
                ],
                "data_source": "Simulated Universe/Pick Flat File"
            })
        );
    }

    #[rstest]
    #[case::last(LatestBalance::Last, "12.50")]
    #[case::first(LatestBalance::First, "2500.00")]
    fn test_latest_balance(#[case] latest: LatestBalance, #[case] expected: &str) {
        let (_dir, _path, codec) = open_fixture();
        let options = ProjectionOptions {
            latest_balance: latest,
            ..ProjectionOptions::default()
        };
        let view = codec.project("101", &options).unwrap();
        assert_eq!(view.current_balance.unwrap().to_string(), expected);
    }

    #[test]
    fn test_project_lenient_on_bad_data() {
        let (_dir, _path, codec) = open_fixture();
        let view = codec.project("105", &ProjectionOptions::default()).unwrap();

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json["legacy_balances_history"],
            serde_json::json!(["12.5", "n/a", "7\\8"])
        );
        assert_eq!(
            json["transaction_dates"],
            serde_json::json!(["2024-02-30", "not-a-date", "2024-07-01"])
        );
        assert!(view.legacy_balances_history[0].as_decimal().is_some());
        assert!(view.transaction_dates[2].as_date().is_some());
    }

    #[test]
    fn test_project_pads_mismatched_counts() {
        let (_dir, _path, codec) = open_fixture();
        let view = codec.project("104", &ProjectionOptions::default()).unwrap();

        let json = serde_json::to_value(&view.transactions).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"amount": "100.00", "date": "2024-05-01"},
                {"amount": "50.00", "date": "2024-05-15"},
                {"amount": null, "date": "2024-06-01"},
                {"amount": null, "date": "2024-06-15"}
            ])
        );
    }

    #[test]
    fn test_update_readback_and_backup() {
        let (_dir, path, codec) = open_fixture();
        let before_content = fs::read_to_string(&path).unwrap();
        let before = codec.read("102").unwrap();

        let map = parse_attribute_map(r#"{"2": "Jane"}"#).unwrap();
        codec.update("102", &map).unwrap();

        let after = codec.read("102").unwrap();
        assert_eq!(after.extract(2, None, None).unwrap(), "Jane");
        for position in [1, 3, 4] {
            assert_eq!(
                after.extract(position, None, None).unwrap(),
                before.extract(position, None, None).unwrap()
            );
        }

        let backup = fs::read_to_string(codec.store().backup_path()).unwrap();
        assert_eq!(backup, before_content);
    }

    #[test]
    fn test_update_leaves_other_lines_byte_identical() {
        let (_dir, path, codec) = open_fixture();
        let before = lines(&path);

        let map = AttributeMap::new()
            .with_scalar(2, "Jane Doe")
            .unwrap()
            .with_list(3, &["999.99", "0.00"])
            .unwrap();
        codec.update("102", &map).unwrap();

        let after = lines(&path);
        assert_eq!(after.len(), before.len());
        for (index, (old, new)) in before.iter().zip(after.iter()).enumerate() {
            if index == 1 {
                assert_eq!(new, "102^Jane Doe^999.99]0.00^2024-02-10]2024-03-15");
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_write_round_trip_is_identity_on_disk() {
        let (_dir, path, codec) = open_fixture();
        let before = fs::read(&path).unwrap();

        let line = codec.store().locate("101").unwrap();
        let record = parse_record(&line);
        codec
            .store()
            .write("101", &serialize_record(&record))
            .unwrap();

        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_update_not_found_and_configuration_errors() {
        let (_dir, path, codec) = open_fixture();
        let before = fs::read(&path).unwrap();

        let map = AttributeMap::new().with_scalar(2, "Nobody").unwrap();
        assert!(codec.update("999", &map).unwrap_err().is_not_found());

        assert!(parse_attribute_map(r#"{"abc": "x"}"#)
            .unwrap_err()
            .is_configuration());
        assert!(parse_attribute_map(r#"{"1000000000000": "x"}"#)
            .unwrap_err()
            .is_configuration());

        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_persist() {
        let (_dir, _path, codec) = open_fixture();
        let codec = AsyncLegacyCodec::new(codec);

        let mut handles = Vec::new();
        for (key, name) in [("101", "A"), ("102", "B"), ("103", "C"), ("104", "D")] {
            let codec = codec.clone();
            handles.push(tokio::spawn(async move {
                let map = AttributeMap::new().with_scalar(2, name).unwrap();
                codec.update(key, map).await
            }));
        }
        // Two writers on the same key, touching different attributes.
        for position in [6, 7] {
            let codec = codec.clone();
            handles.push(tokio::spawn(async move {
                let map = AttributeMap::new()
                    .with_scalar(position, &format!("extra{}", position))
                    .unwrap();
                codec.update("105", map).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        for (key, name) in [("101", "A"), ("102", "B"), ("103", "C"), ("104", "D")] {
            let record = codec.read(key).await.unwrap();
            assert_eq!(record.extract(2, None, None).unwrap(), name);
        }
        let record = codec.read("105").await.unwrap();
        assert_eq!(record.extract(6, None, None).unwrap(), "extra6");
        assert_eq!(record.extract(7, None, None).unwrap(), "extra7");
        assert_eq!(record.extract(2, None, None).unwrap(), "Sam Bad");
    }
}
