//! E2E against real `tsc` and `deno`; skipped when either is missing.

use std::process::Stdio;
use std::sync::Arc;

use geni_kernel::{Geni, GeniConfig};
use geni_llm::ScriptedLlm;
use geni_sandbox::{CommandTypeChecker, ProcessSandbox};
use geni_storage::FsStorage;
use geni_tests::{concat_task, flatten_task, CONCAT, FLATTEN};
use serde_json::json;

async fn available(program: &str) -> bool {
    tokio::process::Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

async fn toolchain() -> bool {
    let ok = available("tsc").await && available("deno").await;
    if !ok {
        eprintln!("skipping: tsc and deno are required");
    }
    ok
}

fn geni(dir: &std::path::Path, llm: Arc<ScriptedLlm>) -> Geni {
    let config = GeniConfig::default()
        .with_cache_root(dir)
        .with_test_timeout_ms(20_000);
    Geni::new(
        config.clone(),
        llm,
        Arc::new(FsStorage::new(dir)),
        Arc::new(CommandTypeChecker::new(config.type_checker.clone())),
        Arc::new(ProcessSandbox::new(config.sandbox.clone())),
    )
}

#[tokio::test]
async fn flatten_with_real_toolchain() {
    if !toolchain().await {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let llm = Arc::new(ScriptedLlm::with_responses([FLATTEN]));
    let function = geni(dir.path(), llm).synthesize(&flatten_task()).await.unwrap();
    let result = function.call(&[json!([[1, 2, 3], [4, 5, 6]])]).await.unwrap();
    assert_eq!(result, json!([1, 2, 3, 4, 5, 6]));
}

#[tokio::test]
async fn mistyped_candidate_is_rejected_by_tsc() {
    if !toolchain().await {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    // Takes a string where the task declares a number.
    let mistyped = "function main(n: string, s: string): string {\n  return s + n;\n}";
    let llm = Arc::new(ScriptedLlm::with_responses([mistyped, CONCAT]));
    let function = geni(dir.path(), llm.clone())
        .synthesize(&concat_task())
        .await
        .unwrap();

    assert_eq!(llm.calls(), 2);
    assert!(llm.prompts()[1].contains("Type check failed: "));
    assert_eq!(
        function.call(&[json!(13), json!("Hello")]).await.unwrap(),
        json!("Hello13")
    );
}
