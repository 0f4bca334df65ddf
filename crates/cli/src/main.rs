//! mirnet CLI
//!
//! # Commands
//!
//! - `alias`: print the reference ids of accessions
//! - `annotate`: print the annotations of accessions
//! - `build`: expand a network from seed accessions and dump it as JSON
//!
//! Every command reads the static configuration (`--config`, TOML) and a
//! JSON dataset (`--data`) loaded into the in-memory record store.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use mirnet_core::{
    AliasRestriction, ComplexFilterMode, GeneFilter, InteractionRestriction, MoleculeType,
    NetworkConfig, TaxonId,
};
use mirnet_engine::{expand_network, AliasResolver, ExpansionOptions, ExpansionStatus};
use mirnet_store::MemoryStore;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Identifier resolution and interaction network expansion
#[derive(Parser)]
#[command(name = "mirnet")]
#[command(version)]
#[command(about = "Identifier resolution and interaction network expansion")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// Static configuration (TOML). Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset for the in-memory record store (JSON)
    #[arg(long)]
    data: PathBuf,

    /// Species names or taxon ids, comma-separated (e.g. "human,10090")
    #[arg(long, value_delimiter = ',')]
    species: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the reference ids of accessions
    Alias {
        #[command(flatten)]
        source: Source,

        /// Only match aliases in these namespaces
        #[arg(long, value_delimiter = ',')]
        namespace: Vec<String>,

        /// Accessions to resolve
        #[arg(required = true)]
        accessions: Vec<String>,
    },
    /// Print the annotations of accessions
    Annotate {
        #[command(flatten)]
        source: Source,

        /// Accessions to annotate
        #[arg(required = true)]
        accessions: Vec<String>,
    },
    /// Expand a network from seed accessions
    Build {
        #[command(flatten)]
        source: Source,

        /// Number of shells to grow
        #[arg(long, default_value_t = 1)]
        depth: u32,

        /// File of admitted gene symbols, one per line
        #[arg(long)]
        filter_file: Option<PathBuf>,

        /// Complex matching policy against the gene filter ("any" or "all")
        #[arg(long, default_value_t = ComplexFilterMode::Any)]
        complex_filter: ComplexFilterMode,

        /// Hook molecule types, comma-separated
        #[arg(long, value_delimiter = ',')]
        hooks: Vec<MoleculeType>,

        /// Queried databases, comma-separated
        #[arg(long, value_delimiter = ',')]
        databases: Vec<String>,

        /// Network name
        #[arg(long, default_value = "mirnet")]
        name: String,

        /// Write the graph here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed accessions
        #[arg(required = true)]
        seeds: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Alias {
            source,
            namespace,
            accessions,
        } => run_alias(&source, &namespace, &accessions),
        Commands::Annotate { source, accessions } => run_annotate(&source, &accessions),
        Commands::Build {
            source,
            depth,
            filter_file,
            complex_filter,
            hooks,
            databases,
            name,
            output,
            seeds,
        } => {
            let mut restriction = InteractionRestriction::new();
            if !hooks.is_empty() {
                restriction = restriction.hooks(hooks);
            }
            if !databases.is_empty() {
                restriction = restriction.databases(databases);
            }
            let mut options = ExpansionOptions::new()
                .restriction(restriction)
                .complex_mode(complex_filter)
                .name(name);
            if let Some(path) = filter_file {
                options = options.gene_filter(read_gene_filter(&path)?);
            }
            run_build(&source, &seeds, depth, options, output.as_deref())
        }
    }
}

/// Loaded configuration, store and species restriction of one invocation.
struct Loaded {
    config: NetworkConfig,
    store: MemoryStore,
    species: Option<BTreeSet<TaxonId>>,
}

fn load(source: &Source) -> Result<Loaded> {
    let config = match &source.config {
        Some(path) => NetworkConfig::from_path(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => NetworkConfig::default(),
    };
    let store = MemoryStore::from_path(&source.data)
        .with_context(|| format!("loading dataset {}", source.data.display()))?;
    let species = if source.species.is_empty() {
        None
    } else {
        let resolver = AliasResolver::new(&store)?;
        Some(resolver.species_restriction(&source.species)?)
    };
    info!(
        target: "mirnet::cli",
        tables = config.tables.len(),
        species = ?species,
        "loaded"
    );
    Ok(Loaded {
        config,
        store,
        species,
    })
}

fn read_gene_filter(path: &Path) -> Result<GeneFilter> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading gene filter {}", path.display()))?;
    let filter = GeneFilter::new(text.lines().map(str::trim).filter(|l| !l.is_empty()));
    if filter.is_empty() {
        bail!("gene filter {} is empty", path.display());
    }
    Ok(filter)
}

fn run_alias(source: &Source, namespaces: &[String], accessions: &[String]) -> Result<()> {
    let ctx = load(source)?;
    let resolver = AliasResolver::new(&ctx.store)?;
    let restrict = if namespaces.is_empty() {
        AliasRestriction::any()
    } else {
        AliasRestriction::namespaces(namespaces)
    };
    let resolution = resolver.resolve(accessions, &restrict, ctx.species.as_ref())?;

    let mut out = io::stdout().lock();
    for (alias, id) in &resolution.identified {
        writeln!(out, "{}\t{}", alias, id)?;
    }
    for (alias, ids) in &resolution.ambiguous {
        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        writeln!(out, "{}\tambiguous\t{}", alias, ids.join(","))?;
    }
    for alias in &resolution.orphans {
        writeln!(out, "{}\torphan", alias)?;
    }
    Ok(())
}

fn run_annotate(source: &Source, accessions: &[String]) -> Result<()> {
    let ctx = load(source)?;
    let resolver = AliasResolver::new(&ctx.store)?;
    let annotated = resolver.annotate(accessions, ctx.species.as_ref())?;

    let mut out = io::stdout().lock();
    for (alias, id) in &annotated.resolution.identified {
        match annotated.annotations.get(id) {
            Some(a) => {
                let species = a.species.map(|t| t.to_string()).unwrap_or_default();
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    alias, id, a.symbol, species, a.description
                )?;
            }
            None => writeln!(out, "{}\t{}\t-", alias, id)?,
        }
    }
    Ok(())
}

fn run_build(
    source: &Source,
    seeds: &[String],
    depth: u32,
    mut options: ExpansionOptions,
    output: Option<&Path>,
) -> Result<()> {
    let ctx = load(source)?;
    if let Some(species) = ctx.species.clone() {
        options = options.species(species);
    }
    let outcome = expand_network(&ctx.store, &ctx.config, seeds, depth, &options)?;
    let report = &outcome.report;
    if !report.orphan_seeds.is_empty() {
        let orphans: Vec<&str> = report.orphan_seeds.iter().map(String::as_str).collect();
        eprintln!("unresolved seeds: {}", orphans.join(", "));
    }
    for (seed, ids) in &report.ambiguous_seeds {
        eprintln!("ambiguous seed {}: {} matches", seed, ids.len());
    }

    let json = outcome.graph.snapshot().to_json()?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?
        }
        None => writeln!(io::stdout().lock(), "{}", json)?,
    }

    match outcome.status {
        ExpansionStatus::Complete => Ok(()),
        ExpansionStatus::NoSeeds => bail!("none of the seeds could be resolved"),
        ExpansionStatus::Stalled { shell, candidates } => bail!(
            "expansion stalled at shell {}: {} candidates filtered out",
            shell,
            candidates
        ),
    }
}
