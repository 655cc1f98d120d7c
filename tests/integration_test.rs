/// Integration tests for the stream core and the application layer
mod test_utilities;

use io_manager::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use test_utilities::mocks::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Student {
    id: u32,
    name: String,
    grades: Vec<u8>,
}

fn students() -> Vec<Student> {
    vec![
        Student {
            id: 1,
            name: "Ada".to_string(),
            grades: vec![9, 10],
        },
        Student {
            id: 2,
            name: "Linus".to_string(),
            grades: vec![],
        },
    ]
}

#[test]
fn test_writer_setup_write_close_produces_exact_content() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("exact.txt");

    let mut manager = StreamManager::new();
    manager.setup_text_writer(&path, false).unwrap();
    manager.write_text("exactly this").unwrap();
    manager.close_all().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "exactly this\n");
}

#[test]
fn test_writer_setup_without_permission_is_access_denied() {
    let temp_dir = TempDir::new().unwrap();
    let locked = temp_dir.path().join("locked.txt");
    fs::write(&locked, "original").unwrap();
    let mut permissions = fs::metadata(&locked).unwrap().permissions();
    permissions.set_readonly(true);
    fs::set_permissions(&locked, permissions).unwrap();

    let mut manager = StreamManager::new();
    for append in [false, true] {
        let err = manager.setup_text_writer(&locked, append).unwrap_err();
        assert_eq!(err.severity(), Severity::Permission);
        assert!(matches!(
            err,
            StreamError::AccessDenied {
                mode: AccessMode::Write,
                ..
            }
        ));
        assert!(!manager.is_text_writer_ready());
    }
    assert_eq!(fs::read_to_string(&locked).unwrap(), "original");
}

#[test]
fn test_write_before_setup_is_not_ready() {
    let mut manager = StreamManager::new();
    let err = manager.write_text("too early").unwrap_err();

    assert_eq!(err.severity(), Severity::NotReady);
    assert_eq!(err.to_string(), "Stream writer has not been set up");
}

#[test]
fn test_one_shot_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hello.txt");

    write_text(&path, "hello", false).unwrap();
    assert_eq!(read_all_text_from(&path).unwrap(), "hello\n");
}

#[test]
fn test_one_shot_append_semantics() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ab.txt");

    write_text(&path, "a", false).unwrap();
    write_text(&path, "b", true).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
}

#[test]
fn test_copy_produces_identical_content() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("source.txt");
    let output = temp_dir.path().join("nested-copy.txt");
    let content = "alpha\nbeta\r\n\ngamma";
    fs::write(&input, content).unwrap();

    copy_to_new_file(&output, false, &input).unwrap();
    assert_eq!(fs::read(&output).unwrap(), fs::read(&input).unwrap());
}

#[test]
fn test_copy_of_binary_input_replaces_existing_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in.bin");
    let output = temp_dir.path().join("out.bin");
    let binary: Vec<u8> = (0..=255).collect();
    fs::write(&input, &binary).unwrap();
    fs::write(&output, "will be replaced").unwrap();

    assert_eq!(copy_to_new_file(&output, false, &input).unwrap(), 256);
    assert_eq!(fs::read(&output).unwrap(), binary);
}

/// One-shot read and write failures both come back as typed errors. Under
/// the legacy policy a failed read yields `None` instead; the legacy write,
/// which exits the process, is covered by the binary tests.
#[test]
fn test_read_and_write_failures_are_reconciled() {
    let missing = PathBuf::from("/nonexistent/input.txt");
    let unwritable = PathBuf::from("/nonexistent/dir/output.txt");

    let read_err = read_all_text_from(&missing).unwrap_err();
    let write_err = write_text(&unwritable, "x", false).unwrap_err();
    assert_eq!(read_err.severity(), Severity::Permission);
    assert_eq!(write_err.severity(), Severity::Permission);

    let legacy = OneShot::new(ErrorPolicy::Legacy.apply(StreamOptions::default()));
    assert_eq!(
        io_manager::stream::compat::read_all_text_or_none(&legacy, &missing),
        None
    );
}

#[test]
fn test_close_all_twice() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in.txt");
    fs::write(&input, "x").unwrap();

    let mut manager = StreamManager::new();
    manager.setup_text_reader(&input).unwrap();
    manager.setup_object_writer(temp_dir.path().join("o.bin"), false).unwrap();

    assert!(manager.close_all().is_ok());
    assert!(manager.close_all().is_ok());
}

#[test]
fn test_close_all_on_fresh_manager() {
    let mut manager = StreamManager::default();
    assert!(manager.close_all().is_ok());
}

#[test]
fn test_object_stream_round_trip_with_append() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("students.bin");
    let all = students();

    let mut manager = StreamManager::new();
    manager.setup_object_writer(&path, false).unwrap();
    manager.write_object(&all[0]).unwrap();
    manager.close_all().unwrap();

    manager.setup_object_writer(&path, true).unwrap();
    manager.write_object(&all[1]).unwrap();
    manager.close_all().unwrap();

    manager.setup_object_reader(&path).unwrap();
    assert_eq!(manager.read_all_objects::<Student>().unwrap(), all);
}

#[test]
fn test_object_reader_with_wrong_type_is_malformed() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("students.json.obj");

    let options = StreamOptions {
        codec: ObjectCodec::Json,
        ..StreamOptions::default()
    };
    let mut manager = StreamManager::with_options(options);
    manager.setup_object_writer(&path, false).unwrap();
    manager.write_object("just a string").unwrap();
    manager.close_all().unwrap();

    manager.setup_object_reader(&path).unwrap();
    let err = manager.read_object::<Student>().unwrap_err();
    assert!(matches!(err, StreamError::MalformedRecord { .. }));
    assert_eq!(err.severity(), Severity::Fatal);
}

#[test]
fn test_transfer_use_case_copy_reports_progress() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in.txt");
    let output = temp_dir.path().join("out.txt");
    fs::write(&input, "payload\n").unwrap();

    let reporter = MockProgressReporter::new();
    let use_case =
        TextTransferUseCase::new(OneShot::default(), ErrorPolicy::Propagate, reporter.clone());

    let response = use_case
        .execute(TransferRequest::copy(&input, &output, false))
        .unwrap();

    assert_eq!(response.bytes, 8);
    assert_eq!(response.text, None);
    assert_eq!(reporter.message_count(), 5);
    let messages = reporter.get_messages();
    assert_eq!(messages[1], "Progress: 1/3 - streams open");
    assert_eq!(messages[2], "Progress: 2/3 - input read");
    assert_eq!(messages[3], "Progress: 3/3 - output written");
    assert!(messages[4].starts_with("Completed: ✅ Copied 8 bytes"));
}

#[test]
fn test_transfer_use_case_legacy_read_of_missing_file() {
    let reporter = MockProgressReporter::new();
    let policy = ErrorPolicy::Legacy;
    let use_case = TextTransferUseCase::new(
        OneShot::new(policy.apply(StreamOptions::default())),
        policy,
        reporter.clone(),
    );

    let response = use_case
        .execute(TransferRequest::read(TextSource::File(
            "/nonexistent/missing.txt".into(),
        )))
        .unwrap();

    assert_eq!(response, TransferResponse::read(None));
    assert_eq!(reporter.message_count(), 1);
    assert!(reporter.errors()[0].contains("Nothing read from"));
}

#[test]
fn test_transfer_use_case_legacy_copy_keeps_progress_and_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in.bin");
    let output = temp_dir.path().join("out.bin");
    let bytes = [0xFF, 0xFE, b'o', b'k', b'\r', b'\n'];
    fs::write(&input, bytes).unwrap();
    fs::write(&output, "stale").unwrap();

    let reporter = MockProgressReporter::new();
    let policy = ErrorPolicy::Legacy;
    let use_case = TextTransferUseCase::new(
        OneShot::new(policy.apply(StreamOptions::default())),
        policy,
        reporter.clone(),
    );

    let response = use_case
        .execute(TransferRequest::copy(&input, &output, false))
        .unwrap();

    assert_eq!(response.bytes, bytes.len());
    assert_eq!(fs::read(&output).unwrap(), bytes);
    assert_eq!(
        reporter.copy_phases(),
        vec!["streams open", "input read", "output written"]
    );
    assert!(matches!(
        reporter.events().last(),
        Some(Reported::Completion(message)) if message.contains("Copied 6 bytes")
    ));
}

#[test]
fn test_inspect_use_case_counts_records() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("students.bin");

    let mut manager = StreamManager::new();
    manager.setup_object_writer(&path, false).unwrap();
    for student in students() {
        manager.write_object(&student).unwrap();
    }
    manager.close_all().unwrap();

    let summary = InspectObjectsUseCase::new(StreamOptions::default())
        .execute(&path)
        .unwrap();
    assert_eq!(summary.codec, ObjectCodec::Bincode);
    assert_eq!(summary.records.len(), 2);
}
