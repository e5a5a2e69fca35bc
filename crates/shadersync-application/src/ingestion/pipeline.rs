use super::job::{FollowUp, IngestionJob, JobFailure, JobState, RetryPolicy};
use crate::session::{CurrentSession, SessionTicket};
use futures::future::join_all;
use shadersync_core::bridge::{Command, CommandBridge};
use shadersync_core::loader::LoaderCounter;
use shadersync_core::runtime::RuntimeState;
use shadersync_core::session::{AssetMap, AssetSource, Slot, SlotPair};
use shadersync_core::store::AssetFetcher;
use std::sync::Arc;
use tokio::time::MissedTickBehavior;

/// Outcome of one pipeline run, available once every job is terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionReport {
    jobs: Vec<IngestionJob>,
    scene_sources: Option<SlotPair<Option<String>>>,
}

impl IngestionReport {
    /// Jobs in asset order.
    pub fn jobs(&self) -> &[IngestionJob] {
        &self.jobs
    }

    pub fn job(&self, name: &str) -> Option<&IngestionJob> {
        self.jobs.iter().find(|job| job.name() == name)
    }

    pub fn applied(&self) -> impl Iterator<Item = &IngestionJob> {
        self.jobs.iter().filter(|job| job.is_applied())
    }

    pub fn failed(&self) -> impl Iterator<Item = &IngestionJob> {
        self.jobs.iter().filter(|job| job.failure().is_some())
    }

    pub fn is_settled(&self) -> bool {
        self.jobs.iter().all(|job| job.state().is_terminal())
    }

    /// Default scene sources the runtime reported after a scene-replacing
    /// asset was loaded.
    pub fn scene_sources(&self) -> Option<&SlotPair<Option<String>>> {
        self.scene_sources.as_ref()
    }
}

struct JobRun {
    job: IngestionJob,
    scene_sources: Option<SlotPair<Option<String>>>,
}

/// Runs ingestion jobs for a set of assets.
///
/// A failed job only produces a console warning. Its siblings and the
/// caller carry on.
pub struct AssetIngestionPipeline {
    bridge: Arc<CommandBridge>,
    fetcher: Arc<dyn AssetFetcher>,
    session: Arc<CurrentSession>,
    loader: LoaderCounter,
    policy: RetryPolicy,
}

impl AssetIngestionPipeline {
    pub fn new(
        bridge: Arc<CommandBridge>,
        fetcher: Arc<dyn AssetFetcher>,
        session: Arc<CurrentSession>,
        loader: LoaderCounter,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            bridge,
            fetcher,
            session,
            loader,
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Ingests every asset and settles once all jobs are terminal.
    ///
    /// Jobs run concurrently with no ordering between them. A job whose
    /// `ticket` has been superseded by the time it would write ends
    /// `Failed(Superseded)` without touching the runtime.
    pub async fn ingest(&self, assets: &AssetMap, ticket: SessionTicket) -> IngestionReport {
        if assets.is_empty() {
            return IngestionReport::default();
        }

        let _loading = self.loader.guard(None);
        tracing::info!("[Ingestion] Starting {} job(s)", assets.len());

        let runs = assets
            .iter()
            .map(|(name, source)| self.run(IngestionJob::new(name, source.clone()), ticket));
        let runs = join_all(runs).await;

        let mut report = IngestionReport::default();
        for run in runs {
            if run.scene_sources.is_some() {
                report.scene_sources = run.scene_sources;
            }
            report.jobs.push(run.job);
        }

        tracing::info!(
            "[Ingestion] Settled: {} applied, {} failed",
            report.applied().count(),
            report.failed().count()
        );
        report
    }

    async fn run(&self, mut job: IngestionJob, ticket: SessionTicket) -> JobRun {
        let _loading = self.loader.guard(None);

        let outcome = match self.resolve(&mut job).await {
            Ok(bytes) => match self.await_runtime(&mut job).await {
                Ok(()) if !self.session.is_current(&ticket) => Err(JobFailure::Superseded),
                Ok(()) => self.apply(&mut job, &bytes),
                Err(failure) => Err(failure),
            },
            Err(failure) => Err(failure),
        };

        match outcome {
            Ok(scene_sources) => JobRun { job, scene_sources },
            Err(failure) => {
                self.report_failure(&job, &failure);
                job.fail(failure);
                JobRun {
                    job,
                    scene_sources: None,
                }
            }
        }
    }

    /// Pending → Decoded (or Failed).
    async fn resolve(&self, job: &mut IngestionJob) -> Result<Vec<u8>, JobFailure> {
        let bytes = match job.source().clone() {
            AssetSource::Inline(data) => data
                .decode()
                .map_err(|e| JobFailure::Decode(e.to_string()))?,
            AssetSource::Remote(url) => {
                job.advance(JobState::Fetching);
                self.fetcher
                    .fetch(&url)
                    .await
                    .map_err(|e| JobFailure::Transport(e.to_string()))?
            }
        };

        job.advance(JobState::Decoded);
        tracing::debug!("[Ingestion] {} decoded ({} bytes)", job.name(), bytes.len());
        Ok(bytes)
    }

    /// Decoded → AwaitingRuntime, bounded by the retry policy.
    ///
    /// State changes wake the wait early, so loss fails the job without
    /// spending the rest of the budget.
    async fn await_runtime(&self, job: &mut IngestionJob) -> Result<(), JobFailure> {
        job.advance(JobState::AwaitingRuntime);
        self.loader.update(&format!("Loading {}", job.name()));

        let runtime = self.bridge.runtime();
        let mut state = runtime.subscribe();
        let mut ticker = tokio::time::interval(self.policy.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while job.attempts() < self.policy.max_attempts {
            tokio::select! {
                _ = ticker.tick() => {
                    job.count_attempt();
                }
                changed = state.changed() => {
                    if changed.is_err() {
                        return Err(JobFailure::RuntimeLost("runtime handle dropped".to_string()));
                    }
                }
            }

            if let RuntimeState::Lost { cause } = runtime.state() {
                return Err(JobFailure::RuntimeLost(cause));
            }
            if runtime.observe_readiness() && runtime.fs_attachable() {
                return Ok(());
            }
        }

        Err(JobFailure::TimeoutExhausted {
            attempts: job.attempts(),
        })
    }

    /// Write, notify, follow up. No retry on failure.
    fn apply(
        &self,
        job: &mut IngestionJob,
        bytes: &[u8],
    ) -> Result<Option<SlotPair<Option<String>>>, JobFailure> {
        let boundary = self
            .bridge
            .runtime()
            .gate()
            .map_err(JobFailure::from_write_error)?;
        boundary
            .write_file(job.target_path(), bytes)
            .map_err(JobFailure::from_write_error)?;
        self.bridge
            .console()
            .log(format!("Loaded asset: {}", job.name()));

        self.bridge
            .notify_asset_loaded(job.name(), job.extension())
            .map_err(JobFailure::from_write_error)?;

        let scene_sources = match job.follow_up() {
            Some(FollowUp::RestoreDefaultScene) => Some(self.restore_default_scene()),
            Some(FollowUp::EnableCubemap) => {
                self.bridge.send(&Command::toggle("cubemap", true));
                None
            }
            None => None,
        };

        job.advance(JobState::Applied);
        tracing::info!("[Ingestion] Applied {}", job.name());
        Ok(scene_sources)
    }

    fn restore_default_scene(&self) -> SlotPair<Option<String>> {
        let sources = SlotPair::new(
            self.bridge.default_source(Slot::Fragment),
            self.bridge.default_source(Slot::Vertex),
        );
        for slot in [Slot::Fragment, Slot::Vertex] {
            if let Some(text) = sources.get(slot) {
                self.bridge.set_source(slot, text);
            }
        }
        sources
    }

    fn report_failure(&self, job: &IngestionJob, failure: &JobFailure) {
        if *failure == JobFailure::Superseded {
            tracing::debug!("[Ingestion] {} discarded: {}", job.name(), failure);
            return;
        }
        tracing::warn!("[Ingestion] {} failed: {}", job.name(), failure);
        self.bridge
            .console()
            .error(format!("Error loading asset {}: {}", job.name(), failure));
    }
}
