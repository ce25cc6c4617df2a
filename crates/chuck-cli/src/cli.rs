//! Command-line interface definitions and parsing

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Data directory for the stored login
    #[arg(short, long)]
    pub data_dir: Option<String>,

    /// Joke API base URL
    #[arg(long, env = "CHUCK_API_URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the local account and log in
    Register {
        email: String,
        password: String,
        /// Password again
        confirm: String,
    },
    /// Log in with the stored account
    Login { email: String, password: String },
    /// Log out, keeping the stored account
    Logout,
    /// Show the session state
    Status,
    /// Print a random joke
    Random {
        /// Only pick from this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List joke categories
    Categories,
    /// Search jokes by text
    Search { query: String },
}
