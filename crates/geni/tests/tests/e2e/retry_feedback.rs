//! E2E: each retry prompt carries the previous failures verbatim.

use geni_llm::ScriptedLlm;
use geni_sandbox::RejectingChecker;
use geni_storage::InMemoryStorage;
use geni_tests::{concat_task, Rig, CONCAT, CONCAT_REVERSED, CONCAT_STRICT};
use std::sync::Arc;

#[tokio::test]
async fn prompt_k_contains_diagnostic_k_minus_one() {
    let checker = RejectingChecker::new().when("throw new Error", "Unreachable code detected.");
    let rig = Rig::with_parts(
        ScriptedLlm::with_responses([CONCAT_STRICT, CONCAT_REVERSED, CONCAT]),
        Arc::new(InMemoryStorage::new()),
        Rig::config(),
        Arc::new(checker),
    );
    let task = concat_task();
    rig.geni.synthesize(&task).await.unwrap();

    let prompts = rig.llm.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(!prompts[0].contains("Please retry"));

    let first_diagnostic = "Type check failed: Unreachable code detected.";
    assert!(prompts[1].contains(first_diagnostic));

    let second_diagnostic = r#"1/1 tests failed. Failed test cases: [{"input":[13,"Hello"],"expected":"Hello13","actual":"13Hello"}]"#;
    assert!(prompts[2].contains(second_diagnostic));
    // Earlier feedback stays in later prompts, in order.
    let a = prompts[2].find(first_diagnostic).unwrap();
    let b = prompts[2].find(second_diagnostic).unwrap();
    assert!(a < b);
}

#[tokio::test]
async fn stored_failures_seed_the_first_prompt_of_a_new_run() {
    let first = Rig::new(ScriptedLlm::with_responses([CONCAT_REVERSED]));
    let task = concat_task();
    assert!(first.geni.synthesize(&task).await.is_err());

    let second = first.reopen(ScriptedLlm::with_responses([CONCAT]));
    second.geni.synthesize(&task).await.unwrap();

    let prompt = &second.llm.prompts()[0];
    assert!(prompt.contains("Please retry"));
    assert!(prompt.contains("return n + s"));
    assert!(prompt.contains("1/1 tests failed."));
}
