//! E2E: attempt files are numbered contiguously across runs.

use geni_llm::ScriptedLlm;
use geni_tests::{concat_task, Rig, CONCAT, CONCAT_REVERSED};

#[tokio::test]
async fn failing_cycles_leave_contiguous_files() {
    let rig = Rig::new(ScriptedLlm::repeating(CONCAT_REVERSED));
    let task = concat_task();
    assert!(rig.geni.synthesize(&task).await.is_err());

    let files = rig.attempt_files(&task);
    let expected: Vec<String> = (0..5).map(|i| format!("attempt_{i}.ts")).collect();
    let mut sorted = files.clone();
    sorted.sort_by_key(|name| {
        name.trim_start_matches("attempt_")
            .trim_end_matches(".ts")
            .parse::<u64>()
            .unwrap_or(u64::MAX)
    });
    assert_eq!(sorted, expected);
}

#[tokio::test]
async fn second_run_continues_after_highest_ordinal() {
    let first = Rig::new(ScriptedLlm::with_responses([CONCAT_REVERSED, CONCAT_REVERSED]));
    let task = concat_task();
    let fp = task.fingerprint();
    // Two failures, then the script runs dry and the budget is spent.
    assert!(first.geni.synthesize(&task).await.is_err());
    assert_eq!(first.geni.store().next_index(&fp).await.unwrap(), 2);

    let second = first.reopen(ScriptedLlm::with_responses([CONCAT]));
    second.geni.synthesize(&task).await.unwrap();

    let attempts = second.geni.store().list_attempts(&fp).await.unwrap();
    let indices: Vec<u64> = attempts.iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert!(attempts[2].1.contains("return s + n"));
}
