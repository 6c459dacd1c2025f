use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use hpreview_core::config::load_settings_with_env;
use hpreview_core::{
    ContentKey, ContentSnapshot, DictionaryService, HeadlessPreviewProvider, PreviewOutcome,
    UrlInfo,
};
use uuid::Uuid;

use crate::host_files::{FileDictionary, StaticRoute};

pub struct UrlOpts {
    pub config: PathBuf,
    pub id: Uuid,
    pub name: Option<String>,
    pub culture: Option<String>,
    pub culture_names: Vec<(String, String)>,
    pub route: Option<String>,
    pub dictionary: Option<PathBuf>,
}

pub fn run_url(opts: &UrlOpts) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to start async runtime")?;
    let info = runtime.block_on(preview_for(opts))?;
    println!("{}", info.url);
    println!("label: {}", info.message);
    Ok(())
}

pub async fn preview_for(opts: &UrlOpts) -> Result<UrlInfo> {
    let settings = load_settings_with_env(&opts.config)
        .with_context(|| format!("failed to load {}", opts.config.display()))?;
    let key = ContentKey(opts.id);
    let dictionary: Arc<dyn DictionaryService> = match &opts.dictionary {
        Some(path) => Arc::new(FileDictionary::load(path)?),
        None => Arc::new(FileDictionary::default()),
    };
    let provider = HeadlessPreviewProvider::new(
        Arc::new(settings),
        Arc::new(StaticRoute::new(key, opts.route.clone())),
        dictionary,
    );

    let mut content = ContentSnapshot {
        key,
        name: opts.name.clone(),
        culture_names: Vec::new(),
    };
    for (culture, name) in &opts.culture_names {
        content = content.with_culture_name(culture.clone(), name.clone());
    }

    match provider.dispatch(&content, opts.culture.as_deref()).await? {
        PreviewOutcome::Resolved(info) => Ok(info),
        PreviewOutcome::NotConfigured => {
            bail!("headless preview is not configured (needs enabled, base_url and preview_secret)")
        }
        PreviewOutcome::PathUnresolved => bail!("could not determine a path for {key}"),
    }
}

/// Parses `CULTURE=NAME` pairs given on the command line.
pub fn parse_culture_name(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((culture, name)) if !culture.is_empty() => {
            Ok((culture.to_string(), name.to_string()))
        }
        _ => Err(format!("expected CULTURE=NAME, got {raw:?}")),
    }
}
