use std::num::NonZeroUsize;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "User-based collaborative filtering recommender")]
pub struct Cli {
    /// CSV file of user,item,rating rows (overrides RATINGS_PATH)
    #[arg(long, global = true)]
    pub ratings: Option<String>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Port number (defaults to PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List known users
    Users,
    /// Print recommendations and a similarity analysis for a user
    Recommend {
        user: String,
        /// Maximum number of recommendations
        #[arg(short, long)]
        limit: Option<usize>,
        /// Only the N most similar neighbors contribute
        #[arg(short, long)]
        neighbors: Option<NonZeroUsize>,
    },
    /// Print the Pearson similarity between two users
    Similarity { user_a: String, user_b: String },
    /// Print how similar every other user is to a user
    Neighbors { user: String },
}
