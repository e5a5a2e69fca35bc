use anyhow::{Context, Result, anyhow};
use shadersync_core::session::{
    AssetMap, AssetSource, DEFAULT_FRAGMENT, DEFAULT_VERTEX, DataUrl, Document,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs of a pack run.
#[derive(Debug, Default)]
pub struct PackOptions {
    pub frag: Option<PathBuf>,
    pub vert: Option<PathBuf>,
    pub assets: Vec<PathBuf>,
    pub commands: Vec<String>,
}

pub fn run(options: &PackOptions, output: Option<&Path>) -> Result<()> {
    let document = build(options)?;
    let json = document.to_json_pretty()?;

    match output {
        Some(path) => {
            fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Packed {} asset(s) into {}", document.assets.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Builds a document from local files. Missing sources fall back to the
/// built-in defaults.
pub fn build(options: &PackOptions) -> Result<Document> {
    let frag = read_source(options.frag.as_deref(), DEFAULT_FRAGMENT)?;
    let vert = read_source(options.vert.as_deref(), DEFAULT_VERTEX)?;

    let mut assets = AssetMap::new();
    for path in &options.assets {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow!("Invalid asset path {}", path.display()))?;
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let media_type = mime_guess::from_path(path).first_or_octet_stream();

        if assets
            .insert(
                name,
                AssetSource::Inline(DataUrl::encode(media_type.essence_str(), &bytes)),
            )
            .is_some()
        {
            tracing::warn!("[Pack] Asset {} given twice, keeping the last", name);
        }
    }

    Ok(Document {
        frag,
        vert,
        assets,
        commands: options.commands.clone(),
    })
}

fn read_source(path: Option<&Path>, fallback: &str) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => Ok(fallback.to_string()),
    }
}
