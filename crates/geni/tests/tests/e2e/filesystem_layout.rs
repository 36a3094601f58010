//! E2E: attempts land in the documented on-disk layout.

use std::sync::Arc;

use geni_kernel::{Geni, GeniConfig};
use geni_llm::ScriptedLlm;
use geni_sandbox::AcceptAllChecker;
use geni_storage::FsStorage;
use geni_tests::{concat_task, sandbox, CONCAT, CONCAT_REVERSED};

#[tokio::test]
async fn attempts_and_final_under_fingerprint_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = GeniConfig::default()
        .with_cache_root(dir.path())
        .with_test_timeout_ms(200);
    let geni = Geni::new(
        config.clone(),
        Arc::new(ScriptedLlm::with_responses([CONCAT_REVERSED, CONCAT])),
        Arc::new(FsStorage::new(&config.cache_root)),
        Arc::new(AcceptAllChecker),
        Arc::new(sandbox()),
    );
    let task = concat_task();
    let function = geni.synthesize(&task).await.unwrap();

    let task_dir = dir.path().join(task.fingerprint().to_hex());
    let first = std::fs::read_to_string(task_dir.join("temp").join("attempt_0.ts")).unwrap();
    let second = std::fs::read_to_string(task_dir.join("temp").join("attempt_1.ts")).unwrap();
    let promoted = std::fs::read_to_string(task_dir.join("final.ts")).unwrap();

    assert!(first.contains("return n + s"));
    assert_eq!(second, function.source());
    assert_eq!(promoted, second);
    assert!(!task_dir.join("temp").join("attempt_2.ts").exists());
}

#[tokio::test]
async fn cache_survives_a_new_process() {
    let dir = tempfile::tempdir().unwrap();
    let build = |llm: Arc<ScriptedLlm>| {
        Geni::new(
            GeniConfig::default().with_cache_root(dir.path()),
            llm,
            Arc::new(FsStorage::new(dir.path())),
            Arc::new(AcceptAllChecker),
            Arc::new(sandbox()),
        )
    };

    build(Arc::new(ScriptedLlm::with_responses([CONCAT])))
        .synthesize(&concat_task())
        .await
        .unwrap();

    // A second orchestrator over the same directory.
    let llm = Arc::new(ScriptedLlm::new());
    let geni = build(llm.clone());
    geni.synthesize(&concat_task()).await.unwrap();
    assert_eq!(llm.calls(), 0);
}
