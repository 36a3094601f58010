//! E2E: stored passing attempts are reused without asking the LLM.

use geni_kernel::OUTDATED_PREFIX;
use geni_llm::ScriptedLlm;
use geni_storage::Storage;
use geni_synthesis::adapter;
use geni_tests::{concat_task, flatten_task, Rig, CONCAT, CONCAT_REVERSED, FLATTEN, FLATTEN_FIRSTS};
use serde_json::json;

#[tokio::test]
async fn final_artifact_is_reused() {
    let first = Rig::new(ScriptedLlm::with_responses([CONCAT]));
    let original = first.geni.synthesize(&concat_task()).await.unwrap();

    let second = first.reopen(ScriptedLlm::new());
    let cached = second.geni.synthesize(&concat_task()).await.unwrap();

    assert_eq!(second.llm.calls(), 0);
    assert_eq!(cached.source(), original.source());
    assert_eq!(cached.call(&[json!(1), json!("x")]).await.unwrap(), json!("x1"));
}

#[tokio::test]
async fn stored_passing_attempt_is_promoted() {
    let rig = Rig::new(ScriptedLlm::new());
    let task = flatten_task();
    let fp = task.fingerprint();
    let store = rig.geni.store();
    let wrap = |body: &str| format!("{body}\n{}", adapter(&task.inputs, &task.output));
    store.persist_attempt(&fp, 0, &wrap(FLATTEN_FIRSTS)).await.unwrap();
    store.persist_attempt(&fp, 1, &wrap(FLATTEN)).await.unwrap();
    let second_copy = format!("{FLATTEN}\n// second passing copy");
    store
        .persist_attempt(&fp, 2, &wrap(second_copy.as_str()))
        .await
        .unwrap();

    let function = rig.geni.synthesize(&task).await.unwrap();

    assert_eq!(rig.llm.calls(), 0);
    assert_eq!(function.source(), wrap(FLATTEN));
    assert_eq!(store.load_final(&fp).await.unwrap(), Some(wrap(FLATTEN)));
    assert_eq!(store.next_index(&fp).await.unwrap(), 3);
}

#[tokio::test]
async fn outdated_final_is_regenerated_and_replaced() {
    let first = Rig::new(ScriptedLlm::with_responses([CONCAT_REVERSED]));
    let mut lenient = concat_task();
    lenient.tests.clear();
    let stale = first.geni.synthesize(&lenient).await.unwrap();
    assert!(stale.source().contains("return n + s"));

    // Same fingerprint, but now with a test the stored function fails.
    let second = first.reopen(ScriptedLlm::with_responses([CONCAT]));
    let fresh = second.geni.synthesize(&concat_task()).await.unwrap();

    assert_eq!(second.llm.calls(), 1);
    assert!(fresh.source().contains("return s + n"));
    let fp = concat_task().fingerprint();
    let final_source = second.geni.store().load_final(&fp).await.unwrap().unwrap();
    assert_eq!(final_source, fresh.source());

    // The stale attempt was fed back, not the outdated-artifact notice.
    let prompt = &second.llm.prompts()[0];
    assert!(prompt.contains("return n + s"));
    assert!(!prompt.contains(OUTDATED_PREFIX));
}

#[tokio::test]
async fn outdated_final_is_kept_when_nothing_passes() {
    let first = Rig::new(ScriptedLlm::with_responses([CONCAT_REVERSED]));
    let mut lenient = concat_task();
    lenient.tests.clear();
    let stale = first.geni.synthesize(&lenient).await.unwrap();

    let second = first.reopen(ScriptedLlm::repeating(CONCAT_REVERSED));
    assert!(second.geni.synthesize(&concat_task()).await.is_err());

    let fp = concat_task().fingerprint();
    let final_path = second.geni.store().final_path(&fp);
    assert_eq!(
        second.storage.read_to_string(&final_path).await.unwrap(),
        stale.source()
    );
}
