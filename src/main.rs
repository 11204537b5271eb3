//! `scour` CLI: load a JSON-lines corpus, run queries, print ranked results.
//!
//! Each line of the documents file is one document:
//!
//! ```json
//! {"id": 0, "text": "curly cat in the city", "status": "active", "ratings": [1, 2, 3]}
//! ```
//!
//! `status` and `ratings` are optional (`active` / empty).

use clap::Parser;
use scour::{DocumentId, DocumentStatus, ExecutionPolicy, SearchEngine};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "scour", about = "In-memory full-text search over a JSON-lines corpus")]
struct Args {
    /// Documents file, one JSON object per line
    #[arg(long)]
    documents: PathBuf,

    /// Space-delimited stop words excluded from indexing and queries
    #[arg(long, default_value = "")]
    stop_words: String,

    /// Run searches with the data-parallel execution policy
    #[arg(long)]
    parallel: bool,

    /// Also report which query words occur in this document id
    #[arg(long)]
    match_id: Option<DocumentId>,

    /// Queries to run, e.g. "curly cat -dog"
    #[arg(required = true)]
    queries: Vec<String>,
}

#[derive(Deserialize)]
struct DocumentInput {
    id: DocumentId,
    text: String,
    #[serde(default)]
    status: DocumentStatus,
    #[serde(default)]
    ratings: Vec<i32>,
}

fn load_documents(args: &Args, engine: &mut SearchEngine) -> Result<usize, String> {
    let contents = fs::read_to_string(&args.documents)
        .map_err(|e| format!("failed to read {}: {e}", args.documents.display()))?;

    let mut added = 0;
    for (line_number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let input: DocumentInput = serde_json::from_str(line)
            .map_err(|e| format!("invalid JSON on line {}: {e}", line_number + 1))?;
        engine
            .add_document(input.id, &input.text, input.status, &input.ratings)
            .map_err(|e| format!("line {}: {e}", line_number + 1))?;
        added += 1;
    }
    Ok(added)
}

fn run(args: &Args) -> Result<(), String> {
    let mut engine =
        SearchEngine::with_stop_words_text(&args.stop_words).map_err(|e| e.to_string())?;
    let added = load_documents(args, &mut engine)?;
    println!("indexed {added} documents");

    let policy = if args.parallel {
        ExecutionPolicy::Parallel
    } else {
        ExecutionPolicy::Sequential
    };

    for raw_query in &args.queries {
        println!("query: {raw_query}");
        let found = engine
            .find_top_documents_with(policy, raw_query)
            .map_err(|e| e.to_string())?;
        if found.is_empty() {
            println!("  no matching documents");
        }
        for document in &found {
            println!("  {document}");
        }

        if let Some(document_id) = args.match_id {
            if engine.document_ids().any(|id| id == document_id) {
                let matched = engine
                    .match_document_with(policy, raw_query, document_id)
                    .map_err(|e| e.to_string())?;
                let words: Vec<&str> = matched.words.iter().map(|w| w.as_str()).collect();
                println!("  document {document_id} matches: [{}]", words.join(", "));
            } else {
                println!("  document {document_id} is not in the index");
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
