//! Integration test for [`digest_core::init_tracing`].

use digest_core::{init_tracing, DigestError};
use tempfile::TempDir;

/// **Test: Tracing writes to a log file under a directory that does not exist yet.**
///
/// **Expected:** First init succeeds and events land in the file with their fields; a second init fails
/// with `DigestError::Logging` because the global subscriber is already set.
#[test]
fn test_init_tracing_creates_log_file_once() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("nested").join("digest.log");
    let log_path = log_path.to_str().unwrap();

    init_tracing(log_path).expect("first init failed");
    tracing::error!(chat_id = 1, "logger smoke test");
    let written = std::fs::read_to_string(log_path).unwrap();
    assert!(written.contains("logger smoke test"), "{}", written);
    assert!(written.contains("chat_id=1"), "{}", written);

    let second = init_tracing(log_path);
    assert!(matches!(second, Err(DigestError::Logging(_))));
}
