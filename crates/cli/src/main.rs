use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use search_types::{ExecutionError, Outcome, ResultSet, SearchConfig, SearchQuery};
use server::SearchOrchestrator;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// Queries the bench command picks from
const SAMPLE_QUERIES: &[&str] = &[
    "cheap italian food open now",
    "vegan thai in Shoreditch under £25",
    "highly rated sushi near Kings Cross",
    "somewhere posh for dinner, no indian",
    "gluten free brunch in Soho",
    "best burgers open now",
    "tapas between 15 and 30 near the river",
    "halal curry, 4+ stars",
    "a quiet place for lunch",
    "italian tomorrow at 7pm in soho",
    "late night ramen on friday",
    "ramen",
];

/// dine-search - restaurant search query planner
#[derive(Parser)]
#[command(name = "dine-search")]
#[command(about = "Plan restaurant searches from free text and summarize their results", long_about = None)]
struct Cli {
    /// Configuration file (missing file means defaults)
    #[arg(short, long, default_value = SearchConfig::FILE_NAME)]
    config: PathBuf,

    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Commands,
}

/// Flags that override individual configuration values
#[derive(Args)]
struct ConfigOverrides {
    /// Address of the query-understanding gRPC service
    #[arg(long, global = true)]
    understanding_addr: Option<String>,

    /// Most bound parameters per query
    #[arg(long, global = true)]
    max_parameters: Option<usize>,

    /// Longest summary in characters
    #[arg(long, global = true)]
    summary_max_chars: Option<usize>,

    /// Budget for the understanding service call, in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,
}

impl ConfigOverrides {
    fn apply(self, mut config: SearchConfig) -> SearchConfig {
        if let Some(addr) = self.understanding_addr {
            config.understanding_addr = Some(addr);
        }
        if let Some(max) = self.max_parameters {
            config.max_parameters = max;
        }
        if let Some(max) = self.summary_max_chars {
            config.summary_max_chars = max;
        }
        if let Some(ms) = self.timeout_ms {
            config.understanding_timeout_ms = ms;
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query and show the structured query it becomes
    Plan {
        /// Query text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Requester id forwarded to the understanding service
        #[arg(long, default_value = "cli")]
        user: String,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Plan a query, then summarize rows read from a JSON file
    Summarize {
        /// Query text
        #[arg(long)]
        query: String,

        /// JSON array of result rows
        #[arg(long, conflicts_with = "execution_error")]
        rows: Option<PathBuf>,

        /// Report this execution failure instead of rows
        #[arg(long)]
        execution_error: Option<String>,

        #[arg(long, default_value = "cli")]
        user: String,

        #[arg(long)]
        json: bool,
    },

    /// Plan random sample queries concurrently and report latencies
    Bench {
        /// Number of queries to plan
        #[arg(long, default_value = "1000")]
        requests: usize,

        /// Number of queries in flight at once
        #[arg(long, default_value = "16")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = SearchConfig::load_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let config = cli.overrides.apply(config);
    config.validate().context("Invalid configuration overrides")?;
    info!(
        understanding = config.understanding_addr.as_deref().unwrap_or("disabled"),
        max_parameters = config.max_parameters,
        "Configuration loaded"
    );

    let orchestrator = SearchOrchestrator::new(&config)
        .await
        .context("Failed to create search orchestrator")?;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Plan { text, user, json } => handle_plan(&orchestrator, text.join(" "), user, json).await?,
        Commands::Summarize {
            query,
            rows,
            execution_error,
            user,
            json,
        } => handle_summarize(&orchestrator, query, rows, execution_error, user, json).await?,
        Commands::Bench {
            requests,
            concurrent,
        } => handle_bench(orchestrator, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'plan' command
async fn handle_plan(orchestrator: &SearchOrchestrator, text: String, user: String, json: bool) -> Result<()> {
    let start = Instant::now();
    let outcome = orchestrator.process_query(&SearchQuery::new(text, user)).await;
    let elapsed = start.elapsed();

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
        println!("{}", format!("Planned in {:?}", elapsed).dimmed());
    }
    Ok(())
}

/// Handle the 'summarize' command
async fn handle_summarize(
    orchestrator: &SearchOrchestrator,
    query: String,
    rows: Option<PathBuf>,
    execution_error: Option<String>,
    user: String,
    json: bool,
) -> Result<()> {
    let execution: std::result::Result<ResultSet, ExecutionError> = match (rows, execution_error) {
        (_, Some(message)) => Err(ExecutionError::new(message)),
        (Some(path), None) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read rows from {}", path.display()))?;
            let rows: ResultSet = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a JSON array of rows", path.display()))?;
            Ok(rows)
        }
        (None, None) => Ok(Vec::new()),
    };

    let pending = orchestrator.process_query(&SearchQuery::new(query, user)).await;
    let outcome = orchestrator.complete(pending, execution);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

/// Handle the 'bench' command
async fn handle_bench(orchestrator: SearchOrchestrator, requests: usize, concurrent: usize) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("--requests and --concurrent must be greater than zero");
    }

    let limiter = Arc::new(Semaphore::new(concurrent));
    let started = Instant::now();

    // Use tokio::spawn to plan queries concurrently
    let mut handles = Vec::with_capacity(requests);
    for i in 0..requests {
        let text = SAMPLE_QUERIES[rand::random::<u32>() as usize % SAMPLE_QUERIES.len()];
        let orchestrator = orchestrator.clone();
        let limiter = limiter.clone();
        handles.push(tokio::spawn(async move {
            let _permit = limiter.acquire_owned().await?;
            let start = Instant::now();
            let outcome = orchestrator
                .process_query(&SearchQuery::new(text, format!("bench-{i}")))
                .await;
            Ok::<_, anyhow::Error>((start.elapsed(), outcome.success))
        }));
    }

    // Wait for all tasks to complete and collect timings
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    let mut failures = 0usize;
    for handle in handles {
        let (elapsed, success) = handle.await.context("Bench task panicked")??;
        timings.push(elapsed);
        if !success {
            failures += 1;
        }
    }
    let wall_time = started.elapsed();

    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let total: Duration = timings.iter().sum();
    let average = total / timings.len() as u32;

    println!("{}", "Benchmark results:".bold().blue());
    println!("{}Requests: {} ({} failed)", "• ".green(), requests, failures);
    println!("{}Wall time: {:?}", "• ".green(), wall_time);
    println!("{}Average latency: {:?}", "• ".cyan(), average);
    println!("{}P50 latency: {:?}", "• ".cyan(), percentile(0.50));
    println!("{}P95 latency: {:?}", "• ".cyan(), percentile(0.95));
    println!("{}P99 latency: {:?}", "• ".cyan(), percentile(0.99));
    println!(
        "{}Throughput: {:.2} queries/second",
        "• ".cyan(),
        requests as f64 / wall_time.as_secs_f64()
    );
    Ok(())
}

/// Helper function to format and print an outcome
fn print_outcome(outcome: &Outcome) {
    if !outcome.success {
        let code = outcome.error_code().map(|c| c.as_str()).unwrap_or("UNKNOWN");
        println!(
            "{} {} [{}]",
            "✗".red(),
            outcome.error.as_deref().unwrap_or("failed").red().bold(),
            code
        );
        if let Some(detail) = &outcome.error_detail {
            println!("  {}", detail.reason);
        }
        return;
    }

    if let Some(facets) = &outcome.facets {
        println!("{}", "Facets:".bold().blue());
        for (name, value) in facets.iter() {
            let value = serde_json::to_string(value).unwrap_or_else(|_| "?".into());
            println!("  {} {}: {}", "•".green(), name, value);
        }
    }

    if let Some(query) = &outcome.structured_query {
        println!("{}", "Structured query:".bold().blue());
        println!("  {}", query.template);
        for (i, param) in query.parameters.iter().enumerate() {
            let param = serde_json::to_string(param).unwrap_or_else(|_| "?".into());
            println!("  {} = {}", format!("${}", i + 1).yellow(), param);
        }
    }

    if let Some(summary) = &outcome.summary {
        println!("{}", "Summary:".bold().blue());
        println!("  {}", summary);
    }
}
