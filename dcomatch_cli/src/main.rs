use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use dcomatch_rank::{
    CancelToken, Comparator, EditDistanceComparator, MemoryStore, ProcessComparator, RankOptions,
    Ranker, format_markdown_report, format_scan_report,
};
use dcomatch_redline::{RedlineOptions, format_plain, render_diff};
use dcomatch_text::Category;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dcomatch")]
#[command(about = "Find similar legal-order articles and render redlines")]
struct Cli {
    /// Write logs to stderr as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank corpus articles by similarity to a source text or article.
    Rank(RankArgs),
    /// Render a word-level redline between two texts.
    Diff(DiffArgs),
    /// Rank every article of one order against all other orders.
    Scan(ScanArgs),
}

#[derive(Debug, Args)]
struct CorpusArgs {
    /// Corpus JSON file.
    #[arg(long)]
    corpus: PathBuf,

    /// Ranking options JSON file; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    parallel: bool,

    /// External comparator command, run once per comparison.
    #[arg(long)]
    worker: Option<String>,

    #[arg(long = "worker-arg", allow_hyphen_values = true)]
    worker_args: Vec<String>,

    #[arg(long)]
    worker_timeout_ms: Option<u64>,
}

#[derive(Debug, Args)]
struct RankArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// Source text file, `-` for stdin.
    #[arg(long, conflicts_with = "article", required_unless_present = "article")]
    text_file: Option<PathBuf>,

    /// Rank a corpus article against the other orders instead.
    #[arg(long)]
    article: Option<i64>,

    #[arg(long)]
    category: Option<Category>,

    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct DiffArgs {
    earlier: PathBuf,
    later: PathBuf,

    #[arg(long, conflicts_with = "html")]
    json: bool,

    #[arg(long)]
    html: bool,

    #[arg(long)]
    ignore_case: bool,

    /// Treat line breaks as plain whitespace.
    #[arg(long)]
    no_newline_tokens: bool,
}

#[derive(Debug, Args)]
struct ScanArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    #[arg(long)]
    order: i64,

    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Rank(args) => run_rank(args),
        Command::Diff(args) => run_diff(args),
        Command::Scan(args) => run_scan(args),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run_rank(args: RankArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ranker = build_ranker(&args.corpus)?;
    let cancel = CancelToken::new();

    let (report, label) = match (args.article, &args.text_file) {
        (Some(id), _) => {
            let article = ranker
                .store()
                .article(id)
                .cloned()
                .ok_or_else(|| format!("article {id} not found in corpus"))?;
            let label = format!("article {} of {}", article.number, article.order.name);
            (ranker.rank_article(&article, &cancel)?, label)
        }
        (None, Some(path)) => {
            let text = read_input(path)?;
            let report = ranker.rank_with_report(&text, args.category, &cancel)?;
            (report, path.display().to_string())
        }
        (None, None) => return Err("either --text-file or --article is required".into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_markdown_report(&report, &label));
    }
    Ok(())
}

fn run_diff(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let earlier = read_input(&args.earlier)?;
    let later = read_input(&args.later)?;
    let options = RedlineOptions {
        newline_is_token: !args.no_newline_tokens,
        ignore_case: args.ignore_case,
    };
    let redline = render_diff(&earlier, &later, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&redline)?);
    } else if args.html {
        println!("{}", redline.markup);
    } else {
        println!("{}", format_plain(&redline.spans));
    }
    Ok(())
}

fn run_scan(args: ScanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ranker = build_ranker(&args.corpus)?;
    let scans = ranker.scan_order(args.order, &CancelToken::new())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&scans)?);
    } else {
        println!("{}", format_scan_report(&scans, args.order));
    }
    Ok(())
}

fn build_ranker(
    args: &CorpusArgs,
) -> Result<Ranker<MemoryStore, Box<dyn Comparator>>, Box<dyn std::error::Error>> {
    let store = MemoryStore::from_path(&args.corpus)?;
    let mut options = match &args.config {
        Some(path) => serde_json::from_str::<RankOptions>(&fs::read_to_string(path)?)?,
        None => RankOptions::default(),
    };
    if args.parallel {
        options.parallel = true;
    }

    let comparator: Box<dyn Comparator> = match &args.worker {
        Some(program) => {
            let mut worker = ProcessComparator::new(program).with_args(args.worker_args.clone());
            if let Some(ms) = args.worker_timeout_ms {
                worker = worker.with_timeout(Duration::from_millis(ms));
            }
            Box::new(worker)
        }
        None => Box::new(EditDistanceComparator::new(options.align)),
    };

    tracing::debug!(
        corpus = %args.corpus.display(),
        articles = store.len(),
        parallel = options.parallel,
        "corpus_loaded"
    );
    Ok(Ranker::new(store, comparator, options)?)
}

fn read_input(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}
