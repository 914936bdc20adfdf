use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::render::{render_gaps, render_report, render_tokens, to_json};
use super::{Cli, Commands, OutputFormat};
use crate::{
    app::{init_config, load_config, load_config_from, Config},
    cache::fingerprint,
    gaps::{analyze_profile, resolve_profile},
    knowledge::{HttpKnowledgeService, KnowledgeProvider},
    models::ModelFactory,
    runtime::Engine,
    scene::{load_scene_file, ComponentSnapshot, SceneNode},
    tokens::TokenClassifier,
};

/// Handle CLI subcommands. Returns whether every item succeeded.
pub async fn handle_command(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::Init => {
            println!("Initializing component-audit configuration...");
            match init_config()? {
                Some(path) => println!("Configuration written to {}", path.display()),
                None => println!("Configuration already exists; nothing to do."),
            }
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Analyze {
            files,
            model,
            offline,
            format,
        } => {
            let config = resolve_config(cli.config.as_deref())?;
            analyze(&config, files, model.as_deref(), *offline, *format).await
        }
        Commands::Tokens { file, format } => {
            let config = resolve_config(cli.config.as_deref())?;
            show_tokens(&config, file, *format)
        }
        Commands::Gaps {
            family,
            states,
            props,
            accessibility,
            format,
        } => {
            let profile = resolve_profile(family);
            let gaps = analyze_profile(&profile, states, props, accessibility);
            println!("{}", render_gaps(&profile, &gaps, *format));
            Ok(true)
        }
        Commands::Knowledge { offline } => {
            let config = resolve_config(cli.config.as_deref())?;
            show_knowledge(&config, *offline).await
        }
    }
}

fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
}

fn load_nodes(files: &[PathBuf]) -> Result<Vec<SceneNode>> {
    let mut nodes = Vec::new();
    for file in files {
        nodes.extend(load_scene_file(file)?);
    }
    Ok(nodes)
}

async fn analyze(
    config: &Config,
    files: &[PathBuf],
    model: Option<&str>,
    offline: bool,
    format: OutputFormat,
) -> Result<bool> {
    let nodes = load_nodes(files)?;
    let credentials = ModelFactory::credentials(&config.generation, model)?;
    let engine = Engine::from_config(config, offline)?;

    let outcomes = engine.analyze_batch(&nodes, &credentials).await?;
    let all_ok = outcomes.iter().all(|o| o.is_ok());

    if format == OutputFormat::Json {
        let items: Vec<serde_json::Value> = outcomes
            .iter()
            .zip(&nodes)
            .map(|(outcome, node)| match outcome {
                Ok(outcome) => serde_json::to_value(outcome)
                    .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() })),
                Err(e) => serde_json::json!({ "component": node.name, "error": e.to_string() }),
            })
            .collect();
        println!("{}", to_json(&items));
    } else {
        for (outcome, node) in outcomes.iter().zip(&nodes) {
            match outcome {
                Ok(outcome) => println!("{}", render_report(outcome, format)),
                Err(e) => eprintln!("{} {}: {}", "[ERROR]".red().bold(), node.name, e),
            }
        }
    }

    debug!("{}", engine.cache_stats().format());
    Ok(all_ok)
}

fn show_tokens(config: &Config, file: &Path, format: OutputFormat) -> Result<bool> {
    let nodes = load_nodes(&[file.to_path_buf()])?;
    let classifier = TokenClassifier::new(config.tokens.ai_suggestion_cap);

    for node in &nodes {
        let snapshot = ComponentSnapshot::from_node(node)
            .with_context(|| format!("Cannot classify '{}'", node.name))?;
        let tokens = classifier.classify(node, snapshot.interactive);
        let key = fingerprint(&snapshot, &tokens);
        println!("{}", render_tokens(&snapshot.name, key.as_str(), &tokens, format));
    }
    Ok(true)
}

async fn show_knowledge(config: &Config, offline: bool) -> Result<bool> {
    let provider = if offline || !config.knowledge.enabled {
        KnowledgeProvider::offline()
    } else {
        let service = HttpKnowledgeService::new(&config.knowledge.base_url)?;
        KnowledgeProvider::new(Arc::new(service), &config.knowledge)
    };

    let knowledge = provider.knowledge().await;
    println!("Knowledge status: {}", provider.status().as_str().green());
    println!("  Version:  {}", knowledge.version);
    println!("  Updated:  {}", knowledge.last_updated.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "  Families: {}",
        knowledge
            .per_family_guidance
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(true)
}

/// Show version information
pub fn show_version() {
    println!("component-audit v{}", env!("CARGO_PKG_VERSION"));
    println!("   Deterministic token classification and AI-assisted component audits");
}
