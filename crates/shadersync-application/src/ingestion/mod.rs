//! Asset ingestion.
//!
//! Moves asset bytes into the runtime's virtual file system. One job per
//! asset, all jobs of a run polled concurrently, each bounded by a
//! [`RetryPolicy`] while it waits for the runtime.

mod job;
mod pipeline;

pub use job::{
    ENVIRONMENT_EXTENSIONS, FollowUp, IngestionJob, JobFailure, JobState, RetryPolicy,
    SCENE_EXTENSIONS,
};
pub use pipeline::{AssetIngestionPipeline, IngestionReport};
