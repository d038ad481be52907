//! ontoslice CLI
//!
//! Command-line front end for:
//! - listing the topic seed table
//! - subsetting an ontology by topics or class names and printing the
//!   prompt-ready schema text
//! - classifying articles into topics (keywords, a model, or both)
//! - the full article → topics → schema prompt pipeline

#[cfg(feature = "llm-anthropic")]
mod anthropic;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use ontoslice_classify::hybrid::DEFAULT_HYBRID_KEYWORD_THRESHOLD;
use ontoslice_classify::keyword::DEFAULT_KEYWORD_THRESHOLD;
use ontoslice_classify::llm::DEFAULT_LLM_THRESHOLD;
use ontoslice_classify::{
    CompletionBackend, HybridClassifier, KeywordClassifier, LlmClassifier, TopicClassification,
    TopicClassifier, TopicKeywords,
};
use ontoslice_schema::config::{GIST_NAMESPACE, GIST_PREFIX};
use ontoslice_schema::render::DEFAULT_MAX_DEFINITION_LEN;
use ontoslice_schema::{
    OntologyConfig, PropertyKind, RenderOptions, SchemaModel, SchemaSubset, SubsetOptions,
    Subsetter, TopicSeeds,
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const NAMESPACE_ENV: &str = "ONTOSLICE_NAMESPACE";
const PREFIX_ENV: &str = "ONTOSLICE_PREFIX";

#[derive(Parser)]
#[command(name = "ontoslice")]
#[command(author, version, about = "ontoslice: topic-driven ontology subsets for prompts")]
struct Cli {
    /// Ontology namespace IRI (default: gist, or $ONTOSLICE_NAMESPACE)
    #[arg(long, global = true)]
    namespace: Option<String>,
    /// Prefix used when printing names (default: gist, or $ONTOSLICE_PREFIX)
    #[arg(long, global = true)]
    prefix: Option<String>,
    /// Topic seed table (JSON); the built-in gist table when omitted
    #[arg(long, global = true)]
    seeds: Option<PathBuf>,
    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known topics with their seed counts.
    Topics,

    /// Print the schema subset for topics or explicit classes.
    Subset {
        /// Ontology document (.ttl, .nt, .nq, .trig, .owl/.rdf)
        ontology: PathBuf,
        /// Topic to include (repeatable)
        #[arg(long = "topic", conflicts_with = "classes")]
        topics: Vec<String>,
        /// Class local name to include, with its ancestors (repeatable)
        #[arg(long = "class")]
        classes: Vec<String>,
        /// Do not expand topic seeds with their subclasses
        #[arg(long)]
        no_descendants: bool,
        /// Subclass levels added below each topic seed
        #[arg(long, default_value_t = SubsetOptions::default().max_depth)]
        max_depth: usize,
        /// Definitions longer than this many characters are truncated
        #[arg(long, default_value_t = DEFAULT_MAX_DEFINITION_LEN)]
        max_definition_len: usize,
        /// Write the schema text here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print subset statistics as JSON on stderr
        #[arg(long)]
        stats_json: bool,
    },

    /// Classify articles (HTML or plain text) into topics.
    Classify {
        /// Article files
        #[arg(required = true)]
        articles: Vec<PathBuf>,
        #[command(flatten)]
        classifier: ClassifierArgs,
        /// Emit one JSON object per article
        #[arg(long)]
        json: bool,
    },

    /// Classify an article and print the schema subset for its topics.
    Prompt {
        /// Ontology document
        ontology: PathBuf,
        /// Article file (HTML or plain text)
        article: PathBuf,
        #[command(flatten)]
        classifier: ClassifierArgs,
        #[arg(long, default_value_t = DEFAULT_MAX_DEFINITION_LEN)]
        max_definition_len: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Regex keyword counts
    Keyword,
    /// Language model (needs ANTHROPIC_API_KEY)
    Llm,
    /// Keyword filter, then the model for articles that pass
    Hybrid,
}

#[derive(Debug, Args)]
struct ClassifierArgs {
    /// Classification method
    #[arg(long, value_enum, default_value_t = Method::Keyword)]
    method: Method,
    /// Minimum confidence for a topic to be reported
    /// (default: 0.1 for keyword, 0.5 for llm and hybrid)
    #[arg(long)]
    min_confidence: Option<f64>,
    /// Keyword table (JSON, topic -> patterns); the built-in table when omitted
    #[arg(long)]
    keywords: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ontology_config(cli.namespace.clone(), cli.prefix.clone());
    let seeds = load_seeds(cli.seeds.as_deref())?;

    match cli.command {
        Commands::Topics => cmd_topics(&seeds),
        Commands::Subset {
            ontology,
            topics,
            classes,
            no_descendants,
            max_depth,
            max_definition_len,
            out,
            stats_json,
        } => {
            let options = SubsetOptions {
                include_descendants: !no_descendants,
                max_depth,
            };
            cmd_subset(
                &ontology,
                &config,
                &seeds,
                &Selection::new(topics, classes)?,
                options,
                &RenderOptions { max_definition_len },
                out.as_deref(),
                stats_json,
            )
        }
        Commands::Classify {
            articles,
            classifier,
            json,
        } => cmd_classify(&articles, &classifier, json),
        Commands::Prompt {
            ontology,
            article,
            classifier,
            max_definition_len,
        } => cmd_prompt(
            &ontology,
            &article,
            &config,
            &seeds,
            &classifier,
            &RenderOptions { max_definition_len },
        ),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Flags win over environment variables, which win over the gist defaults.
fn ontology_config(namespace: Option<String>, prefix: Option<String>) -> OntologyConfig {
    let namespace = namespace
        .or_else(|| env::var(NAMESPACE_ENV).ok())
        .unwrap_or_else(|| GIST_NAMESPACE.to_string());
    let prefix = prefix
        .or_else(|| env::var(PREFIX_ENV).ok())
        .unwrap_or_else(|| GIST_PREFIX.to_string());
    OntologyConfig::new(namespace, prefix)
}

fn load_seeds(path: Option<&Path>) -> Result<TopicSeeds> {
    match path {
        Some(path) => TopicSeeds::from_json_file(path)
            .with_context(|| format!("loading topic seeds from {}", path.display())),
        None => Ok(TopicSeeds::gist()),
    }
}

fn load_model(path: &Path, config: &OntologyConfig) -> Result<SchemaModel> {
    let graph = ontoslice_ingest_rdfowl::load_file(path)
        .with_context(|| format!("loading ontology {}", path.display()))?;
    let model = SchemaModel::build(&graph, config);
    eprintln!(
        "{} {} ({} triples, {} classes, {} object / {} datatype properties)",
        "Loaded".green().bold(),
        path.display(),
        graph.len(),
        model.class_count(),
        model.property_count(PropertyKind::Object),
        model.property_count(PropertyKind::Datatype),
    );
    Ok(model)
}

fn read_article(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading article {}", path.display()))
}

fn article_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// What a `subset` invocation selects by.
#[derive(Debug, PartialEq, Eq)]
enum Selection {
    Topics(Vec<String>),
    Classes(Vec<String>),
}

impl Selection {
    fn new(topics: Vec<String>, classes: Vec<String>) -> Result<Self> {
        match (topics.is_empty(), classes.is_empty()) {
            (false, true) => Ok(Self::Topics(topics)),
            (true, false) => Ok(Self::Classes(classes)),
            (true, true) => bail!("give at least one --topic or --class"),
            (false, false) => bail!("--topic and --class cannot be combined"),
        }
    }
}

fn cmd_topics(seeds: &TopicSeeds) -> Result<()> {
    println!("{}", "Topics".green().bold());
    for topic in seeds.topics() {
        println!(
            "  {} {:<14} {} classes, {} properties",
            "→".cyan(),
            topic,
            seeds.seed_classes(topic).len(),
            seeds.seed_properties(topic).len()
        );
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_subset(
    ontology: &Path,
    config: &OntologyConfig,
    seeds: &TopicSeeds,
    selection: &Selection,
    options: SubsetOptions,
    render: &RenderOptions,
    out: Option<&Path>,
    stats_json: bool,
) -> Result<()> {
    let model = load_model(ontology, config)?;
    let subsetter = Subsetter::new(&model, seeds);

    let subset = match selection {
        Selection::Topics(topics) => {
            for topic in topics.iter().filter(|t| !seeds.contains(t)) {
                eprintln!("{} unknown topic `{}` skipped", "warning:".yellow().bold(), topic);
            }
            subsetter.subset_by_topics(topics, options)
        }
        Selection::Classes(classes) => {
            for class in classes.iter().filter(|c| !model.has_class(c)) {
                eprintln!("{} unknown class `{}` skipped", "warning:".yellow().bold(), class);
            }
            subsetter.subset_by_classes(classes)
        }
    };

    report_stats(&subset, stats_json)?;
    let text = subset.render(render);
    match out {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("  {} {}", "→".cyan(), path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn report_stats(subset: &SchemaSubset<'_>, as_json: bool) -> Result<()> {
    let stats = subset.stats();
    if as_json {
        eprintln!("{}", serde_json::to_string(&stats)?);
    } else {
        eprintln!(
            "{} {} classes, {} object properties, {} datatype properties",
            "Subset".green().bold(),
            stats.classes,
            stats.object_properties,
            stats.datatype_properties
        );
    }
    Ok(())
}

fn keyword_classifier(min_confidence: f64, keywords: Option<&Path>) -> Result<KeywordClassifier> {
    let table = match keywords {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading keyword table {}", path.display()))?;
            TopicKeywords::from_json_str(&text)?
        }
        None => TopicKeywords::default_table(),
    };
    Ok(KeywordClassifier::new(&table, min_confidence)?)
}

/// The model backend is only constructed for `llm` and `hybrid`.
fn build_classifier<B, F>(args: &ClassifierArgs, backend: F) -> Result<Box<dyn TopicClassifier>>
where
    B: CompletionBackend + 'static,
    F: FnOnce() -> Result<B>,
{
    let keywords = args.keywords.as_deref();
    let classifier: Box<dyn TopicClassifier> = match args.method {
        Method::Keyword => {
            let min_confidence = args.min_confidence.unwrap_or(DEFAULT_KEYWORD_THRESHOLD);
            Box::new(keyword_classifier(min_confidence, keywords)?)
        }
        Method::Llm => {
            let min_confidence = args.min_confidence.unwrap_or(DEFAULT_LLM_THRESHOLD);
            Box::new(LlmClassifier::new(backend()?).with_min_confidence(min_confidence))
        }
        Method::Hybrid => {
            let filter = keyword_classifier(DEFAULT_HYBRID_KEYWORD_THRESHOLD, keywords)?;
            let min_confidence = args.min_confidence.unwrap_or(DEFAULT_LLM_THRESHOLD);
            let refiner = LlmClassifier::new(backend()?).with_min_confidence(min_confidence);
            Box::new(HybridClassifier::new(filter, refiner))
        }
    };
    tracing::debug!(method = ?args.method, "classifier ready");
    Ok(classifier)
}

#[cfg(feature = "llm-anthropic")]
fn model_backend() -> Result<Box<dyn CompletionBackend>> {
    let backend = anthropic::AnthropicBackend::from_env()?;
    tracing::info!(model = backend.model(), "using Anthropic backend");
    Ok(Box::new(backend))
}

#[cfg(not(feature = "llm-anthropic"))]
fn model_backend() -> Result<Box<dyn CompletionBackend>> {
    bail!("this build has no model backend; rebuild with the `llm-anthropic` feature")
}

fn cmd_classify(articles: &[PathBuf], args: &ClassifierArgs, json: bool) -> Result<()> {
    let classifier = build_classifier(args, model_backend)?;
    for path in articles {
        let text = read_article(path)?;
        let result = classifier.classify(&text, Some(&article_id(path)))?;
        if json {
            println!("{}", serde_json::to_string(&result)?);
        } else {
            print_classification(path, &result);
        }
    }
    Ok(())
}

fn print_classification(path: &Path, result: &TopicClassification) {
    println!("{} {}", "Article".green().bold(), path.display());
    if result.topics.is_empty() {
        println!("  {}", "no topics".dimmed());
        return;
    }
    for topic in &result.topics {
        let score = result.confidence.get(topic).copied().unwrap_or_default();
        println!("  {} {:<14} {:.2}", "→".cyan(), topic, score);
    }
}

fn cmd_prompt(
    ontology: &Path,
    article: &Path,
    config: &OntologyConfig,
    seeds: &TopicSeeds,
    args: &ClassifierArgs,
    render: &RenderOptions,
) -> Result<()> {
    let classifier = build_classifier(args, model_backend)?;
    let text = read_article(article)?;
    let result = classifier.classify(&text, Some(&article_id(article)))?;
    if result.topics.is_empty() {
        eprintln!(
            "{} no topics detected in {}; the schema text will be empty",
            "warning:".yellow().bold(),
            article.display()
        );
    } else {
        eprintln!("{} {}", "Topics".green().bold(), result.topics.join(", "));
    }

    let model = load_model(ontology, config)?;
    print!("{}", prompt_text(&model, seeds, &result, render)?);
    Ok(())
}

fn prompt_text(
    model: &SchemaModel,
    seeds: &TopicSeeds,
    result: &TopicClassification,
    render: &RenderOptions,
) -> Result<String> {
    let subset =
        Subsetter::new(model, seeds).subset_by_topics(&result.topics, SubsetOptions::default());
    report_stats(&subset, false)?;
    Ok(subset.render(render))
}
