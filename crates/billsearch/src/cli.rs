use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "billsearch")]
#[command(version)]
#[command(about = "Lexical and semantic search over U.S. Congress bills")]
pub struct Cli {
    /// JSON configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty bill database
    Init {
        #[arg(long)]
        db: PathBuf,
    },

    /// Load bills from a JSONL file
    Ingest {
        #[arg(long)]
        db: PathBuf,
        /// One bill record per line
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Append legal-model passage embeddings for bills that lack them
    Precompute {
        #[arg(long)]
        db: PathBuf,
    },

    /// Search bill summaries
    Search(SearchArgs),

    /// Find matching passages inside one bill
    Passages {
        #[arg(long)]
        db: PathBuf,
        #[arg(long)]
        bill: i64,
        query: String,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Show corpus and embedding counts
    Status {
        #[arg(long)]
        db: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[arg(long)]
    pub db: PathBuf,

    pub query: String,

    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// "any", "house", "senate" or the full publisher name
    #[arg(long, default_value = "any")]
    pub chamber: String,

    /// Earliest publication date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest publication date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Only bills sponsored across parties
    #[arg(long)]
    pub bipartisan: bool,

    /// Attach sponsors to each result
    #[arg(long)]
    pub sponsors: bool,

    /// Legislative type, repeatable
    #[arg(long = "type")]
    pub types: Vec<String>,

    /// Substring that must appear verbatim, repeatable
    #[arg(long)]
    pub exact: Vec<String>,
}
