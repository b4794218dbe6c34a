use super::render::{render_map, render_schema};
use crate::args::{Cli, Commands};
use attrmap::{
    AttrError, AttributeKey, AttributeMap, AttributeRegistry, AttributeSchema, Attributes,
    DefaultAttributeMap, MapSnapshot, Result, SharedAttributeMap, SingletonAttributeMap,
};
use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct AppContext {
    registry: AttributeRegistry,
    /// Declared attributes in schema order.
    keys: Vec<AttributeKey>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::Build {
            assignments,
            frozen,
            singleton,
            output,
        } => handle_build(&ctx, &assignments, frozen, singleton, output.as_deref()),
        Commands::Show { snapshot } => handle_show(&ctx, &snapshot),
        Commands::Schema => handle_schema(&ctx),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let schema_dir = match &cli.schema_dir {
        Some(dir) => dir.clone(),
        None => default_schema_dir()?,
    };
    let schema = AttributeSchema::load(&schema_dir)?;
    let registry = AttributeRegistry::new();
    let keys = schema.install(&registry)?;
    tracing::debug!(dir = %schema_dir.display(), attributes = keys.len(), "schema installed");

    Ok(AppContext { registry, keys })
}

fn default_schema_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "attrmap", "attrmap")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            AttrError::InvalidArgument(
                "could not determine a config dir, pass --schema-dir".to_string(),
            )
        })
}

fn handle_build(
    ctx: &AppContext,
    assignments: &[String],
    frozen: bool,
    singleton: bool,
    output: Option<&Path>,
) -> Result<()> {
    let map = build_map(ctx, assignments, frozen, singleton)?;
    let snapshot = MapSnapshot::capture(map.as_ref())?;

    match output {
        Some(path) => {
            snapshot.save(path)?;
            println!(
                "{}",
                format!("Wrote {} map to {}", map.strategy(), path.display()).green()
            );
        }
        None => println!("{}", snapshot.to_json()?),
    }
    Ok(())
}

fn build_map(
    ctx: &AppContext,
    assignments: &[String],
    frozen: bool,
    singleton: bool,
) -> Result<SharedAttributeMap> {
    if singleton && assignments.len() != 1 {
        return Err(AttrError::InvalidArgument(format!(
            "--singleton takes exactly one assignment, got {}",
            assignments.len()
        )));
    }

    let mut map = DefaultAttributeMap::with_capacity(assignments.len());
    for assignment in assignments {
        let (name, text) = split_assignment(assignment)?;
        let key = ctx.registry.require(name)?;
        let value = key.parse_value(text)?;
        map.insert(&key, value)?;
    }

    let built: SharedAttributeMap = if singleton {
        let entry = map
            .entries()
            .next()
            .map(|(key, value)| (key.clone(), value.clone()));
        match entry {
            Some((key, value)) => Arc::new(SingletonAttributeMap::from_entry(key, value)?),
            None => return Err(AttrError::InvalidArgument("nothing to bind".to_string())),
        }
    } else {
        Arc::new(map)
    };

    if frozen {
        Ok(Arc::new(Attributes::unmodifiable_shared(built)))
    } else {
        Ok(built)
    }
}

fn split_assignment(assignment: &str) -> Result<(&str, &str)> {
    match assignment.split_once('=') {
        Some((name, text)) if !name.trim().is_empty() => Ok((name.trim(), text)),
        _ => Err(AttrError::InvalidArgument(format!(
            "expected NAME=VALUE, got '{}'",
            assignment
        ))),
    }
}

fn handle_show(ctx: &AppContext, path: &Path) -> Result<()> {
    let snapshot = MapSnapshot::load(path)?;
    let map = snapshot.restore(&ctx.registry)?;
    print!("{}", render_map(map.as_ref(), &ctx.keys));
    Ok(())
}

fn handle_schema(ctx: &AppContext) -> Result<()> {
    print!("{}", render_schema(&ctx.keys));
    Ok(())
}
