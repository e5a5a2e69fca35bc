use super::Context;
use anyhow::{Context as _, Result, anyhow};
use colored::Colorize;
use shadersync_core::session::{AssetSource, Document, parse_identity};
use shadersync_core::store::DocumentStore;

pub async fn run(context: &Context, input: &str) -> Result<()> {
    let identity =
        parse_identity(input).ok_or_else(|| anyhow!("No document id in '{}'", input))?;

    let stored = context
        .store
        .fetch(&identity)
        .await
        .with_context(|| format!("Failed to fetch document {}", identity))?;

    let entry = stored
        .shader_entry(&context.config.document_name)
        .ok_or_else(|| anyhow!("Document {} has no shader entry", identity))?;

    let body = match (&entry.content, &entry.raw_url) {
        (Some(content), _) if !entry.truncated => content.clone(),
        (_, Some(raw_url)) => {
            tracing::debug!("[Inspect] Fetching full body of {}", entry.name);
            context.store.fetch_raw(raw_url).await?
        }
        _ => return Err(anyhow!("Entry {} has no readable body", entry.name)),
    };

    let document = Document::from_json(&body)
        .with_context(|| format!("Entry {} is not a shader document", entry.name))?;

    println!("{} {}", "Document".bold(), identity.cyan());
    println!("  entry:  {}", entry.name);
    println!("  frag:   {} lines", document.frag.lines().count());
    println!("  vert:   {} lines", document.vert.lines().count());

    if document.assets.is_empty() {
        println!("  assets: {}", "none".dimmed());
    } else {
        println!("  assets:");
        for (name, source) in document.assets.iter() {
            println!("    {} {}", name.green(), describe(source));
        }
    }

    if document.commands.is_empty() {
        println!("  commands: {}", "none".dimmed());
    } else {
        println!("  commands:");
        for command in &document.commands {
            println!("    > {}", command);
        }
    }

    Ok(())
}

fn describe(source: &AssetSource) -> String {
    match source {
        AssetSource::Inline(data) => match data.decode() {
            Ok(bytes) => format!("({}, {} bytes inline)", data.media_type(), bytes.len()),
            Err(e) => format!("({})", e.to_string().red()),
        },
        AssetSource::Remote(url) => format!("-> {}", url),
    }
}
