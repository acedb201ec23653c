//! Example: Extract facets from a few queries
//!
//! Run with: cargo run --package intent --example extract_facets -- "thai in soho"
//!
//! Without arguments a set of sample queries is used.

use intent::IntentParser;
use search_types::SearchConfig;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let queries: Vec<String> = if args.is_empty() {
        vec![
            "cheap italian food open now".to_string(),
            "vegan brunch near the british museum".to_string(),
            "highly rated ramen under £15, no more sushi".to_string(),
        ]
    } else {
        vec![args.join(" ")]
    };

    let parser = IntentParser::new(&SearchConfig::default());

    println!("=== Facet Extraction Example ===\n");
    for text in &queries {
        let start = Instant::now();
        let facets = parser.parse_local(text)?;
        let elapsed = start.elapsed();

        println!("Query: {}", text);
        for (name, value) in facets.iter() {
            println!("  {:<18} {}", name, serde_json::to_string(value)?);
        }
        println!("  ({:?})\n", elapsed);
    }

    Ok(())
}
