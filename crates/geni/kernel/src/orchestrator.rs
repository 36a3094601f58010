use std::sync::Arc;

use geni_llm::{HttpLlm, LlmProvider};
use geni_sandbox::{CommandTypeChecker, ProcessSandbox, SandboxRunner, TypeChecker};
use geni_storage::{FsStorage, Storage};
use geni_synthesis::CodeGenerator;
use geni_types::{FeedbackRecord, Fingerprint, TaskSpec, ValidatedAttempt, Verdict};
use tracing::{debug, info, warn};

use crate::attempt_store::AttemptStore;
use crate::config::GeniConfig;
use crate::error::GeniError;
use crate::runnable::Runnable;
use crate::validator::Validator;

/// The synthesis orchestrator.
///
/// `synthesize` walks CheckCache, then Generate and Validate in a loop,
/// ending in Pass or ExhaustedRetries. Concurrent calls for the same
/// fingerprint are not coordinated.
pub struct Geni {
    config: GeniConfig,
    store: AttemptStore,
    validator: Validator,
    generator: CodeGenerator,
    sandbox: Arc<dyn SandboxRunner>,
}

impl Geni {
    pub fn new(
        config: GeniConfig,
        llm: Arc<dyn LlmProvider>,
        storage: Arc<dyn Storage>,
        checker: Arc<dyn TypeChecker>,
        sandbox: Arc<dyn SandboxRunner>,
    ) -> Self {
        let validator = Validator::new(
            storage.clone(),
            checker,
            sandbox.clone(),
            config.test_timeout(),
        );
        Self {
            store: AttemptStore::new(storage),
            validator,
            generator: CodeGenerator::new(llm),
            sandbox,
            config,
        }
    }

    /// Production wiring: HTTP LLM, filesystem cache under
    /// `config.cache_root`, `tsc` and a process sandbox.
    pub fn from_config(config: GeniConfig) -> Result<Self, GeniError> {
        let llm = Arc::new(HttpLlm::new(config.llm.clone())?);
        let storage = Arc::new(FsStorage::new(config.cache_root.clone()));
        let checker = Arc::new(CommandTypeChecker::new(config.type_checker.clone()));
        let sandbox = Arc::new(ProcessSandbox::new(config.sandbox.clone()));
        Ok(Self::new(config, llm, storage, checker, sandbox))
    }

    pub fn config(&self) -> &GeniConfig {
        &self.config
    }

    pub fn store(&self) -> &AttemptStore {
        &self.store
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Return a function satisfying `task`, generating one if no stored
    /// candidate passes.
    pub async fn synthesize(&self, task: &TaskSpec) -> Result<Runnable, GeniError> {
        let fp = task.fingerprint();
        info!(fingerprint = %fp, description = %task.description, "Synthesizing function");

        if let Some(source) = self.check_final(&fp, task).await? {
            info!(fingerprint = %fp, "Using cached function");
            return Ok(self.runnable(fp, source, task));
        }

        let validated = self
            .store
            .validate_all_attempts(&self.validator, &fp, &task.output, &task.tests)
            .await?;
        if let Some(passing) = validated.iter().find(|a| a.verdict.is_pass()) {
            self.store.promote_final(&fp, &passing.source).await?;
            info!(fingerprint = %fp, attempt = passing.index, "Promoted stored attempt");
            return Ok(self.runnable(fp, passing.source.clone(), task));
        }

        let feedback: Vec<FeedbackRecord> = validated
            .iter()
            .filter_map(ValidatedAttempt::feedback)
            .collect();
        let last_diagnostic = feedback
            .last()
            .map(|f| f.diagnostic.clone())
            .unwrap_or_else(|| "no attempts were made".to_string());
        let next_index = self.store.next_index(&fp).await?;
        debug!(
            fingerprint = %fp,
            stored_failures = feedback.len(),
            next_index,
            "No stored attempt passes"
        );

        self.retry_loop(fp, task, feedback, next_index, last_diagnostic)
            .await
    }

    /// Re-validate the final artifact; its source if it still passes.
    async fn check_final(
        &self,
        fp: &Fingerprint,
        task: &TaskSpec,
    ) -> Result<Option<String>, GeniError> {
        if !self.store.has_final(fp).await? {
            return Ok(None);
        }
        let verdict = self
            .validator
            .validate_cached_function(&self.store.final_path(fp), &task.output, &task.tests)
            .await?;
        match verdict {
            Verdict::Pass => Ok(self.store.load_final(fp).await?),
            Verdict::Fail(diagnostic) => {
                warn!(fingerprint = %fp, %diagnostic, "Final artifact no longer validates");
                Ok(None)
            }
        }
    }

    async fn retry_loop(
        &self,
        fp: Fingerprint,
        task: &TaskSpec,
        mut feedback: Vec<FeedbackRecord>,
        mut next_index: u64,
        mut last_diagnostic: String,
    ) -> Result<Runnable, GeniError> {
        for attempt in 1..=self.config.max_attempts {
            let source = match self
                .generator
                .generate(&task.description, &task.inputs, &task.output, &feedback)
                .await
            {
                Ok(source) => source,
                Err(e) => {
                    warn!(fingerprint = %fp, attempt, error = %e, "Generation failed");
                    last_diagnostic = e.to_string();
                    continue;
                }
            };

            let index = next_index;
            next_index += 1;
            let path = self.store.persist_attempt(&fp, index, &source).await?;

            match self
                .validator
                .validate(&path, &task.output, &task.tests)
                .await?
            {
                Verdict::Pass => {
                    self.store.promote_final(&fp, &source).await?;
                    info!(fingerprint = %fp, attempt, index, "Attempt passed, promoted");
                    return Ok(self.runnable(fp, source, task));
                }
                Verdict::Fail(diagnostic) => {
                    warn!(fingerprint = %fp, attempt, index, %diagnostic, "Attempt failed");
                    last_diagnostic = diagnostic.clone();
                    feedback.push(FeedbackRecord::new(source, diagnostic));
                }
            }
        }

        warn!(
            fingerprint = %fp,
            attempts = self.config.max_attempts,
            "Retry budget exhausted"
        );
        Err(GeniError::GenerationExhausted {
            attempts: self.config.max_attempts,
            last_diagnostic,
        })
    }

    fn runnable(&self, fp: Fingerprint, source: String, task: &TaskSpec) -> Runnable {
        Runnable::new(
            fp,
            source,
            task.inputs.clone(),
            task.output.clone(),
            self.sandbox.clone(),
            self.config.test_timeout(),
        )
    }
}
