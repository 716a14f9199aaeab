use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use family_tree::{
    config::{OutputFormat, TreeConfig},
    genealogy::{Genealogy, GenealogyRecords},
    lineage::{FamilyTreeBuilder, KinshipGraph},
    tree::{FamilyTree, JsonFormatter, OutlineFormatter, RenderOptions, TreeFormatter, YamlFormatter},
    types::PersonId,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "family-tree")]
#[command(about = "Projects a genealogy into a generation-ordered family tree")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the family tree around a start person
    Build {
        /// Genealogy records file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// ID of the person the tree is anchored at
        #[arg(short, long)]
        start: u32,

        /// Output format (json, yaml, outline)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tag nodes with person-/marriage- identifiers
        #[arg(long)]
        include_ids: bool,
    },

    /// List the persons in each generation reached from a start person
    Generations {
        /// Genealogy records file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// ID of the start person
        #[arg(short, long)]
        start: u32,
    },

    /// Check a genealogy file for dangling references and descent cycles
    Validate {
        /// Genealogy records file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize configuration file
    Init {
        /// Configuration file path
        #[arg(short = 'f', long, default_value = "family-tree.yml")]
        config_file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level)?;

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Build {
            input,
            start,
            format,
            output,
            include_ids,
        } => {
            let mut config = config;
            if let Some(format) = format {
                config.output.format = format;
            }
            config.output.include_ids |= include_ids;
            build_tree(&input, PersonId(start), output.as_ref(), &config)?;
        }

        Commands::Generations { input, start } => {
            list_generations(&input, PersonId(start), &config)?;
        }

        Commands::Validate { input } => {
            validate_genealogy(&input)?;
        }

        Commands::Init { config_file } => {
            init_config(config_file)?;
        }
    }

    Ok(())
}

/// Initialize tracing with the specified log level
fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to create env filter")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}

/// Load configuration from file or use defaults, then apply the environment
fn load_config(config_path: Option<&PathBuf>) -> Result<TreeConfig> {
    let mut config = TreeConfig::default();

    if let Some(path) = config_path {
        if path.exists() {
            info!("Loading configuration from: {:?}", path);
            config.merge_with(TreeConfig::load_from_file(path)?);
        } else {
            warn!("Configuration file not found: {:?}. Using defaults.", path);
        }
    }

    config.apply_env()?;
    config.validate()?;
    Ok(config)
}

fn load_genealogy(input: &Path) -> Result<Genealogy> {
    let records = GenealogyRecords::from_path(input)
        .with_context(|| format!("Failed to read genealogy records: {:?}", input))?;
    Genealogy::from_records(&records)
        .with_context(|| format!("Genealogy records in {:?} are inconsistent", input))
}

fn build_tree(
    input: &Path,
    start: PersonId,
    output_file: Option<&PathBuf>,
    config: &TreeConfig,
) -> Result<()> {
    let genealogy = load_genealogy(input)?;
    let tree = FamilyTreeBuilder::new(&genealogy, config)
        .build(start)
        .with_context(|| format!("Failed to build family tree from person {}", start))?;

    let content = format_tree(&tree, config)?;

    if let Some(file_path) = output_file {
        std::fs::write(file_path, &content)
            .with_context(|| format!("Failed to write output to: {:?}", file_path))?;
        info!("Tree written to: {:?}", file_path);
    } else {
        println!("{}", content);
    }

    Ok(())
}

fn format_tree(tree: &FamilyTree, config: &TreeConfig) -> Result<String> {
    let options = RenderOptions {
        include_ids: config.output.include_ids,
    };
    let formatter: Box<dyn TreeFormatter> = match config.output.format {
        OutputFormat::Json => Box::new(JsonFormatter {
            pretty: config.output.pretty,
            options,
        }),
        OutputFormat::Yaml => Box::new(YamlFormatter { options }),
        OutputFormat::Outline => Box::new(OutlineFormatter),
    };
    Ok(formatter.format(tree)?)
}

fn list_generations(input: &Path, start: PersonId, config: &TreeConfig) -> Result<()> {
    let genealogy = load_genealogy(input)?;
    let walk = FamilyTreeBuilder::new(&genealogy, config)
        .walk(start)
        .with_context(|| format!("Failed to walk genealogy from person {}", start))?;

    for (generation, bucket) in walk.generations() {
        let names = bucket
            .persons()
            .iter()
            .map(|&id| genealogy.person(id).map(|person| person.name.as_str()))
            .collect::<family_tree::Result<Vec<_>>>()?;
        println!("{:>3}: {}", generation, names.join(", "));
    }

    info!("Walk made {} visits", walk.visits());
    Ok(())
}

fn validate_genealogy(input: &Path) -> Result<()> {
    let genealogy = load_genealogy(input)?;
    let stats = KinshipGraph::from_genealogy(&genealogy)?.get_statistics();

    println!("Genealogy Statistics:");
    println!("  Persons: {}", stats.persons);
    println!("  Marriages: {}", stats.marriages);
    println!("  Persons without recorded parents: {}", stats.root_persons);
    println!("  Unmarried persons: {}", stats.unmarried_persons);
    println!("  Childless marriages: {}", stats.childless_marriages);

    info!("Genealogy validation completed");
    Ok(())
}

/// Initialize configuration file
fn init_config(config_file: PathBuf) -> Result<()> {
    info!("Initializing configuration file: {:?}", config_file);

    if config_file.exists() {
        warn!("Configuration file already exists: {:?}", config_file);
        print!("Overwrite existing file? (y/N): ");
        use std::io::{self, Write};
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().to_lowercase().starts_with('y') {
            info!("Configuration initialization cancelled");
            return Ok(());
        }
    }

    TreeConfig::default()
        .save_to_file(&config_file)
        .with_context(|| format!("Failed to write configuration file: {:?}", config_file))?;

    println!("Configuration file created: {:?}", config_file);
    Ok(())
}
