use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::time::Instant;

use fm_approx::index::fm::{FMIndex, IndexConfig, IndexMeta, SubstitutionAlphabet, DEFAULT_OCC_INTERVAL};
use fm_approx::search::{self, HitFilter, SearchParams};
use fm_approx::{io, report};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "fm-approx", author, version, about = "FM-index with bounded-mismatch search", arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build an FM index of the reference and save it to <output>.fm
    Index {
        /// Reference file (single-line text or single-record FASTA)
        reference: String,
        /// Output prefix for the index file
        #[arg(short, long, default_value = "ref")]
        output: String,
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Search every pattern allowing up to K substitutions
    Search {
        #[command(flatten)]
        query: QueryArgs,
        /// Output path (stdout if omitted)
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Search every pattern and score the hits against ground-truth positions
    Eval {
        #[command(flatten)]
        query: QueryArgs,
        /// Ground-truth positions, one per pattern
        truth: String,
        /// Report path
        #[arg(short, long, default_value = "approx_search_results.txt")]
        out: String,
    },
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Occ checkpoint interval
    #[arg(long = "occ-interval", default_value_t = DEFAULT_OCC_INTERVAL)]
    occ_interval: usize,
    /// Substitution alphabet (e.g. ACGT); defaults to every symbol seen in the reference
    #[arg(long)]
    alphabet: Option<String>,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Path to a saved index (.fm)
    #[arg(short = 'i', long = "index", conflicts_with = "reference")]
    index: Option<String>,
    /// Build the index from this reference instead of loading one
    #[arg(short = 'r', long = "reference")]
    reference: Option<String>,
    #[command(flatten)]
    build: BuildArgs,
    /// Patterns file (one per line, or FASTQ)
    patterns: String,
    /// Maximum number of substitutions
    #[arg(short = 'k', long = "mismatches", default_value_t = 2, allow_negative_numbers = true)]
    mismatches: i64,
    /// Drop hits whose start offset is smaller than the pattern length
    #[arg(long = "legacy-filter")]
    legacy_filter: bool,
    /// Abort a single query after expanding this many search nodes
    #[arg(long = "max-nodes")]
    max_nodes: Option<usize>,
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    threads: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Index { reference, output, build } => run_index(&reference, &output, &build),
        Commands::Search { query, out } => run_search(&query, out.as_deref()),
        Commands::Eval { query, truth, out } => run_eval(&query, &truth, &out),
    }
}

fn index_config(build: &BuildArgs) -> IndexConfig {
    let substitutions = match &build.alphabet {
        Some(symbols) => SubstitutionAlphabet::Explicit(symbols.as_bytes().to_vec()),
        None => SubstitutionAlphabet::Observed,
    };
    IndexConfig { occ_interval: build.occ_interval, substitutions }
}

fn build_from_reference(reference: &str, build: &BuildArgs) -> Result<FMIndex> {
    let seq = io::read_reference(io::open(reference)?)?;
    log::info!("reference: {} ({} bp)", reference, seq.len());

    let t0 = Instant::now();
    let mut fm = FMIndex::build(&seq, index_config(build))?;
    fm.set_meta(IndexMeta {
        reference_file: Some(reference.to_string()),
        build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
        build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
    });
    log::info!(
        "index built in {} ms: sigma={}, substitutions={:?}",
        t0.elapsed().as_millis(),
        fm.alphabet().sigma(),
        String::from_utf8_lossy(&fm.substitution_symbols()),
    );
    Ok(fm)
}

fn run_index(reference: &str, output: &str, build: &BuildArgs) -> Result<()> {
    let fm = build_from_reference(reference, build)?;
    let out_path = format!("{}.fm", output);
    fm.save_to_file(&out_path)
        .map_err(|e| anyhow!("cannot write index to '{}': {}", out_path, e))?;
    println!("FM index saved: {}", out_path);
    Ok(())
}

fn open_index(query: &QueryArgs) -> Result<FMIndex> {
    match (&query.index, &query.reference) {
        (Some(path), _) => {
            let fm = FMIndex::load_from_file(path).map_err(|e| anyhow!("cannot load index '{}': {}", path, e))?;
            if let Some(ts) = &fm.meta().build_timestamp {
                log::debug!("index '{}' built at {}", path, ts);
            }
            Ok(fm)
        }
        (None, Some(reference)) => build_from_reference(reference, &query.build),
        (None, None) => bail!("either --index or --reference is required"),
    }
}

/// 对全部模式执行查询；单条模式失败时记录警告并视为无命中
fn run_queries(query: &QueryArgs, fm: &FMIndex) -> Result<Vec<Vec<u32>>> {
    let mut params = SearchParams::with_budget(query.mismatches)?;
    params.max_nodes = query.max_nodes;
    if query.legacy_filter {
        params.hit_filter = HitFilter::ShortOffset;
    }

    let patterns = io::read_patterns(io::open(&query.patterns)?)?;
    log::info!("patterns: {} (k={}, threads={})", patterns.len(), params.max_mismatches, query.threads);

    let results = search::search_batch(fm, &patterns, &params, query.threads)?;
    let mut out = Vec::with_capacity(results.len());
    for (i, res) in results.into_iter().enumerate() {
        match res {
            Ok(hits) => out.push(hits),
            Err(e) => {
                log::warn!("pattern {}: {}", i + 1, e);
                out.push(Vec::new());
            }
        }
    }
    Ok(out)
}

fn run_search(query: &QueryArgs, out_path: Option<&str>) -> Result<()> {
    let start = Instant::now();
    let fm = open_index(query)?;
    let results = run_queries(query, &fm)?;

    let mut out: Box<dyn Write> = match out_path {
        Some(p) => Box::new(std::io::BufWriter::new(
            std::fs::File::create(p).map_err(|e| anyhow!("cannot create '{}': {}", p, e))?,
        )),
        None => Box::new(std::io::BufWriter::new(std::io::stdout())),
    };
    report::write_hits(&mut out, &results)?;
    out.flush()?;

    log::info!("execution time: {} ms", start.elapsed().as_millis());
    Ok(())
}

fn run_eval(query: &QueryArgs, truth_path: &str, out_path: &str) -> Result<()> {
    let start = Instant::now();
    let fm = open_index(query)?;
    let truth = io::read_ground_truth(io::open(truth_path)?)?;
    let results = run_queries(query, &fm)?;
    if truth.len() < results.len() {
        bail!("ground truth has {} positions but there are {} patterns", truth.len(), results.len());
    }

    let eval = report::evaluate(&results, &truth);
    println!("Accuracy: {}%", eval.accuracy());

    let fh = std::fs::File::create(out_path).map_err(|e| anyhow!("cannot create '{}': {}", out_path, e))?;
    let mut out = std::io::BufWriter::new(fh);
    eval.write_to(&mut out)?;
    out.flush()?;

    println!("Execution time: {} ms", start.elapsed().as_millis());
    Ok(())
}
