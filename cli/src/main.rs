use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use shelfscan_core::dataset::load_path;
use shelfscan_core::stemmer::stem;
use shelfscan_core::{Book, BookField, Corpus, FieldWeights, StemAlgorithm};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "shelfscan")]
#[command(about = "Search a reading-list export with TF-IDF ranking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DatasetArgs {
    /// Export file (.json/.jsonl) or a directory of them
    #[arg(long)]
    input: PathBuf,
    /// JSON object of field -> weight; replaces the default table
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Stemming algorithm: porter or snowball
    #[arg(long, default_value = "porter")]
    stemmer: StemAlgorithm,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the records against a query
    Search {
        #[command(flatten)]
        dataset: DatasetArgs,
        /// Number of results to print
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Print the similarity next to each title
        #[arg(long, default_value_t = false)]
        scores: bool,
        /// Query text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Summarize the index built from the records
    Stats {
        #[command(flatten)]
        dataset: DatasetArgs,
        /// How many terms to list per table
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Print the Porter stem of each word
    Stem {
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { dataset, limit, scores, query } => {
            run_search(&dataset, &query.join(" "), limit, scores)
        }
        Commands::Stats { dataset, top } => run_stats(&dataset, top),
        Commands::Stem { words } => {
            for w in words {
                let lowered = w.to_lowercase();
                println!("{w} -> {}", stem(&lowered));
            }
            Ok(())
        }
    }
}

fn load_corpus(args: &DatasetArgs) -> Result<Corpus<Book>> {
    let books: Vec<Book> = load_path(&args.input)?;
    let weights = match &args.weights {
        Some(path) => FieldWeights::<BookField>::from_json_file(path)?,
        None => FieldWeights::default(),
    };
    tracing::info!(records = books.len(), fields = weights.len(), stemmer = args.stemmer.name(), "building index");
    Ok(Corpus::with_algorithm(books, weights, args.stemmer))
}

fn run_search(args: &DatasetArgs, query: &str, limit: usize, show_scores: bool) -> Result<()> {
    let corpus = load_corpus(args)?;
    for (pos, (book, score)) in corpus.rank(query).into_iter().take(limit).enumerate() {
        if show_scores {
            println!("{:>3}. {score:.4}  {}", pos + 1, book.title);
        } else {
            println!("{:>3}. {}", pos + 1, book.title);
        }
    }
    Ok(())
}

fn run_stats(args: &DatasetArgs, top: usize) -> Result<()> {
    let corpus = load_corpus(args)?;
    let index = corpus.index();
    println!("records:    {}", index.len());
    println!("vocabulary: {}", index.vocabulary_len());
    println!("stemmer:    {}", index.algorithm().name());
    println!("weights:");
    for (field, weight) in index.field_weights().iter() {
        println!("  {field:?}: {weight}");
    }

    let mut terms: Vec<(&String, f64)> = index.idf_table().iter().map(|(t, w)| (t, *w)).collect();
    // Rarest first; ties alphabetical.
    terms.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    println!("rarest terms:");
    for (term, idf) in terms.iter().take(top) {
        println!("  {term:<20} {idf:.4}");
    }
    let everywhere: Vec<&str> = terms
        .iter()
        .filter(|(_, idf)| *idf == 0.0)
        .take(top)
        .map(|(t, _)| t.as_str())
        .collect();
    println!("terms in every record (idf 0): {}", everywhere.join(", "));
    Ok(())
}
