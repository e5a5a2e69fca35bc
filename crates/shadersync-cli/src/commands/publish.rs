use super::Context;
use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use shadersync_core::session::Document;
use shadersync_core::store::{DocumentStore, NewDocument};
use std::path::Path;

pub async fn run(context: &Context, path: &Path, name: &str) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    // Re-serialize so what gets stored is exactly what a load accepts.
    let document = Document::from_json(&text)
        .with_context(|| format!("{} is not a shader document", path.display()))?;

    let request = NewDocument::titled(
        name,
        &context.config.description_prefix,
        document.to_json_pretty()?,
        context.config.public_documents,
    )
    .context("A document name is required")?;

    let Some(user) = context.store.authenticated_user().await? else {
        bail!("Not logged in: put github_token in secret.json or set GITHUB_TOKEN");
    };
    tracing::debug!("[Publish] Publishing as {}", user);

    let identity = context
        .store
        .create(request)
        .await
        .context("Failed to store document")?;

    println!("{} {}", "Saved to document:".green(), identity);
    Ok(())
}
