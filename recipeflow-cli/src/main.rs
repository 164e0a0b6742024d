//! recipeflow - Recipe flow-graph extraction CLI
//!
//! # Usage
//!
//! ```bash
//! # Build the relation-type allowlist for a corpus
//! recipeflow relations --corpus r-300 --root corpus/ --output relations.json
//!
//! # Assemble a relation-classification dataset
//! recipeflow dataset --corpus r-100 --root corpus/ --style typed \
//!     --undersample 0.9 --output out/
//!
//! # Export the annotated flow graph of every recipe
//! recipeflow graph --corpus r-200 --root corpus/ --format dot --output graphs/
//!
//! # Corpus statistics
//! recipeflow stats --corpus r-300 --root corpus/
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use recipeflow::{
    candidate_pairs, load_corpus, true_flow_graph, CorpusTarget, DatasetBuilder, ExampleStyle,
    PairStats, RelationSet,
};
use recipeflow_core::GraphExportFormat;

/// Recipe flow-graph extraction: allowlists, datasets and graph export.
#[derive(Parser, Debug)]
#[command(name = "recipeflow", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the relation-type allowlist from a corpus's true edges
    Relations(RelationsArgs),
    /// Assemble a train/validation relation-classification dataset
    Dataset(DatasetArgs),
    /// Export one annotated flow graph per recipe
    Graph(GraphArgs),
    /// Print corpus statistics
    Stats(StatsArgs),
}

#[derive(Parser, Debug)]
struct RelationsArgs {
    /// Corpus target (r-100, r-200 or r-300)
    #[arg(short, long)]
    corpus: CorpusTarget,

    /// Corpus root directory (contains r-100/, r-200/)
    #[arg(short, long)]
    root: PathBuf,

    /// Output JSON file
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct DatasetArgs {
    /// Corpus target (r-100, r-200 or r-300)
    #[arg(short, long)]
    corpus: CorpusTarget,

    /// Corpus root directory
    #[arg(short, long)]
    root: PathBuf,

    /// Relation allowlist file; built from the corpus itself when omitted
    #[arg(long)]
    relations: Option<PathBuf>,

    /// Example rendering style
    #[arg(short, long, default_value = "untyped")]
    style: ExampleStyle,

    /// Fraction of non-edge examples to drop
    #[arg(short, long, default_value_t = 0.0)]
    undersample: f64,

    /// RNG seed for undersampling and the split
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output directory for train.jsonl / valid.jsonl / labels.json
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct GraphArgs {
    /// Corpus target (r-100, r-200 or r-300)
    #[arg(short, long)]
    corpus: CorpusTarget,

    /// Corpus root directory
    #[arg(short, long)]
    root: PathBuf,

    /// Export format
    #[arg(short, long, default_value = "dot")]
    format: OutputFormat,

    /// Output directory, one file per recipe
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct StatsArgs {
    /// Corpus target (r-100, r-200 or r-300)
    #[arg(short, long)]
    corpus: CorpusTarget,

    /// Corpus root directory
    #[arg(short, long)]
    root: PathBuf,
}

/// Flow-graph export format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Graphviz DOT text
    #[default]
    Dot,
    /// NetworkX node-link JSON
    Json,
}

impl OutputFormat {
    fn export_format(self) -> GraphExportFormat {
        match self {
            OutputFormat::Dot => GraphExportFormat::Dot,
            OutputFormat::Json => GraphExportFormat::NetworkXJson,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Dot => "dot",
            OutputFormat::Json => "json",
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let result: Result<(), String> = match cli.command {
        Commands::Relations(args) => run_relations(args),
        Commands::Dataset(args) => run_dataset(args),
        Commands::Graph(args) => run_graph(args),
        Commands::Stats(args) => run_stats(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_relations(args: RelationsArgs) -> Result<(), String> {
    let recipes = load_corpus(&args.root, args.corpus).map_err(|e| e.to_string())?;
    let relations = RelationSet::from_corpus(&recipes).map_err(|e| e.to_string())?;
    relations.save(&args.output).map_err(|e| e.to_string())?;

    let edges: usize = recipes.iter().map(|p| p.flow.edge_count()).sum();
    println!(
        "{}: {} recipes, {} true edges, {} relation tag pairs -> {}",
        args.corpus,
        recipes.len(),
        edges,
        relations.len(),
        args.output.display()
    );
    Ok(())
}

fn run_dataset(args: DatasetArgs) -> Result<(), String> {
    let recipes = load_corpus(&args.root, args.corpus).map_err(|e| e.to_string())?;
    let relations = match &args.relations {
        Some(path) => RelationSet::load(path).map_err(|e| e.to_string())?,
        None => RelationSet::from_corpus(&recipes).map_err(|e| e.to_string())?,
    };

    let dataset = DatasetBuilder::new(args.style)
        .undersample(args.undersample)
        .seed(args.seed)
        .build(&recipes, &relations, args.corpus)
        .map_err(|e| e.to_string())?;

    fs::create_dir_all(&args.output).map_err(|e| e.to_string())?;
    dataset.write(&args.output).map_err(|e| e.to_string())?;

    println!(
        "{} ({}): {} train / {} valid examples, {} labels -> {}",
        args.corpus,
        args.style.as_str(),
        dataset.train.len(),
        dataset.valid.len(),
        dataset.labels().len(),
        args.output.display()
    );
    Ok(())
}

fn run_graph(args: GraphArgs) -> Result<(), String> {
    let recipes = load_corpus(&args.root, args.corpus).map_err(|e| e.to_string())?;
    fs::create_dir_all(&args.output).map_err(|e| e.to_string())?;

    for pair in &recipes {
        let graph = true_flow_graph(pair).map_err(|e| e.to_string())?;
        let path = args
            .output
            .join(format!("{}.{}", pair.recipe.name, args.format.extension()));
        fs::write(&path, graph.export(args.format.export_format())).map_err(|e| e.to_string())?;
        log::debug!(
            "wrote {} ({} nodes, {} edges)",
            path.display(),
            graph.node_count(),
            graph.edge_count()
        );
    }

    println!(
        "{}: exported {} flow graphs -> {}",
        args.corpus,
        recipes.len(),
        args.output.display()
    );
    Ok(())
}

fn run_stats(args: StatsArgs) -> Result<(), String> {
    let recipes = load_corpus(&args.root, args.corpus).map_err(|e| e.to_string())?;
    let relations = RelationSet::from_corpus(&recipes).map_err(|e| e.to_string())?;

    let tokens: usize = recipes.iter().map(|p| p.recipe.len()).sum();
    let mentions: usize = recipes
        .iter()
        .map(|p| p.recipe.mention_starts().len())
        .sum();
    let edges: usize = recipes.iter().map(|p| p.flow.edge_count()).sum();

    let mut stats = PairStats::default();
    let mut histogram: BTreeMap<String, usize> = BTreeMap::new();
    for pair in &recipes {
        // Only the accepted/rejected counters are wanted here.
        let _ = candidate_pairs(&pair.recipe, &relations, &mut stats);
        for label in pair.flow.label_map().values() {
            *histogram.entry(label.as_label()).or_default() += 1;
        }
    }

    println!("corpus     : {}", args.corpus);
    println!("recipes    : {}", recipes.len());
    println!("tokens     : {tokens}");
    println!("mentions   : {mentions}");
    println!("true edges : {edges}");
    println!("tag pairs  : {}", relations.len());
    println!(
        "candidates : {} accepted, {} rejected",
        stats.accepted, stats.rejected
    );
    println!("labels     :");
    for (label, count) in &histogram {
        println!("  {label:<10} {count}");
    }
    Ok(())
}
