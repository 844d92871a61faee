//! Application orchestrator.
//! Loads/merges config, initializes logging, validates the format string and
//! runs the tree walker over every input path.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, error, info};

use tagmove::cli::Args;
use tagmove::config::{CONFIG_ENV, create_template_config, load_config};
use tagmove::format::StaticFormat;
use tagmove::output as out;
use tagmove::{Config, LoftyProvider, TagMoveError, TreeWalker, default_config_path};

use crate::logging::init_tracing;

fn print_config_location() {
    if let Ok(cfg_env) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit): {cfg_env}"));
    }
    match default_config_path() {
        Ok(p) => {
            out::print_user(&p.display().to_string());
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info("No config file there yet; run with --init-config to create a template.");
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a config path: {e}")),
    }
}

fn init_config() -> Result<()> {
    let path = default_config_path()?;
    if path.exists() {
        out::print_info(&format!("Config already exists: {}", path.display()));
        return Ok(());
    }
    create_template_config(&path)?;
    out::print_success(&format!("Template config written to: {}", path.display()));
    out::print_info(&format!(
        "Edit <format> and friends, then re-run. To use a different location set {CONFIG_ENV}."
    ));
    Ok(())
}

/// Defaults < XML file < CLI flags. Also returns the config file used, if any.
fn build_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    let mut cfg = Config::default();
    let mut source = None;
    if let Some((path, xml)) = load_config()? {
        xml.apply_to(&mut cfg)
            .with_context(|| format!("invalid value in config '{}'", path.display()))?;
        source = Some(path);
    }
    args.apply_overrides(&mut cfg);
    Ok((cfg, source))
}

fn log_failure(e: &anyhow::Error) {
    if let Some(tm) = e.downcast_ref::<TagMoveError>() {
        let code = tm.code();
        let kind = tm.kind();
        match tm {
            TagMoveError::PathUniquenessViolation { from, to } => {
                error!(code, kind, from = %from.display(), to = %to.display(), "Destination already exists; aborting run")
            }
            TagMoveError::MalformedTemplate { template, reason } => {
                error!(code, kind, %template, %reason, "Malformed format string")
            }
            _ => error!(code, kind, error = %tm, "Run failed"),
        }
    } else {
        error!(error = ?e, "Run failed");
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location();
        return Ok(());
    }
    if args.init_config {
        return init_config();
    }

    let (cfg, cfg_source) = build_config(&args).inspect_err(|e| out::print_error(&format!("{e:#}")))?;

    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    if let Some(p) = &cfg_source {
        debug!(path = %p.display(), "Loaded config file");
    }
    debug!("Starting tagmove: {:?}", args);

    let result = (|| -> Result<()> {
        cfg.validate()?;
        if args.paths.is_empty() {
            return Err(TagMoveError::NoPaths.into());
        }

        let format = StaticFormat(cfg.template()?);
        let provider = LoftyProvider::new();
        let walker = TreeWalker::new(&cfg, &provider, &format);

        if cfg.simulate {
            info!("Simulating; pass --for-real to apply changes");
        }
        walker.run(&args.paths)?;
        Ok(())
    })();

    if let Err(e) = &result {
        log_failure(e);
        out::print_error(&format!("{e:#}"));
    }
    result
}
