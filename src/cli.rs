use clap::{Parser, Subcommand};

/// Datadeck — authenticated tabular upload backend
#[derive(Parser)]
#[command(name = "datadeck", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Port to bind
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register an account directly against the configured database
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}
