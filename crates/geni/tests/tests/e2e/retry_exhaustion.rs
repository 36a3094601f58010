//! E2E: a spent retry budget is an error and promotes nothing.

use geni_kernel::GeniError;
use geni_llm::{LlmError, ScriptedLlm};
use geni_tests::{flatten_task, Rig, FLATTEN_FIRSTS};

#[tokio::test]
async fn exhausted_budget_reports_last_failure() {
    let rig = Rig::new(ScriptedLlm::repeating(FLATTEN_FIRSTS));
    let task = flatten_task();

    let err = rig.geni.synthesize(&task).await.unwrap_err();
    match err {
        GeniError::GenerationExhausted {
            attempts,
            last_diagnostic,
        } => {
            assert_eq!(attempts, 5);
            assert!(last_diagnostic.starts_with("1/1 tests failed."));
            assert!(last_diagnostic.contains(r#""actual":[1,4]"#));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(rig.llm.calls(), 5);
    assert!(!rig.geni.store().has_final(&task.fingerprint()).await.unwrap());
}

#[tokio::test]
async fn llm_outage_exhausts_budget_without_attempt_files() {
    let llm = ScriptedLlm::new();
    for _ in 0..5 {
        llm.push_failure(LlmError::Status {
            status: 503,
            body: "overloaded".into(),
        });
    }
    let rig = Rig::new(llm);
    let task = flatten_task();

    let err = rig.geni.synthesize(&task).await.unwrap_err();
    assert!(matches!(
        err,
        GeniError::GenerationExhausted { ref last_diagnostic, .. }
            if last_diagnostic.contains("503")
    ));
    assert!(rig.attempt_files(&task).is_empty());
}
