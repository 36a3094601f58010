//! E2E: every failing test case is reported, not just the first.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use geni_kernel::Validator;
use geni_sandbox::AcceptAllChecker;
use geni_storage::{InMemoryStorage, Storage};
use geni_tests::{sandbox, CONCAT_STRICT};
use geni_types::{Shape, TestCase};
use serde_json::json;

#[tokio::test]
async fn failures_one_and_three_of_three() {
    let storage = Arc::new(InMemoryStorage::new());
    let path = Path::new("fp/temp/attempt_0.ts");
    storage.create_dir_all(Path::new("fp/temp")).await.unwrap();
    storage.write(path, CONCAT_STRICT).await.unwrap();

    let validator = Validator::new(
        storage,
        Arc::new(AcceptAllChecker),
        Arc::new(sandbox()),
        Duration::from_millis(200),
    );
    let tests = vec![
        TestCase::new(vec![json!(1), json!("")], json!("1")),
        TestCase::new(vec![json!(2), json!("b")], json!("b2")),
        TestCase::new(vec![json!(3), json!("c")], json!("c4")),
    ];
    let verdict = validator.validate(path, &Shape::String, &tests).await.unwrap();

    let diagnostic = verdict.diagnostic().unwrap();
    assert!(diagnostic.starts_with("2/3 tests failed. Failed test cases: "));
    let cases: serde_json::Value = serde_json::from_str(
        diagnostic.trim_start_matches("2/3 tests failed. Failed test cases: "),
    )
    .unwrap();
    assert_eq!(
        cases,
        json!([
            {"input": [1, ""], "expected": "1", "error": "execution failed: empty string"},
            {"input": [3, "c"], "expected": "c4", "actual": "c3"}
        ])
    );
}
