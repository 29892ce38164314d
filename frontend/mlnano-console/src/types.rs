use std::path::PathBuf;

use crate::output::OutputArgs;

/// Main CLI structure
#[derive(clap::Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct MlnanoCli {
    #[command(subcommand)]
    pub command: MlnanoCommands,
}

/// Available CLI commands
#[derive(clap::Subcommand, Clone, Debug)]
pub enum MlnanoCommands {
    /// Interactive page: upload form, live list and file preview
    #[clap(aliases = &["ui", "c"])]
    Console {
        #[clap(flatten)]
        conn: ConnectionArgs,
    },
    /// Upload a file and record it as a new data set
    #[clap(aliases = &["up", "u"])]
    Upload {
        /// File to upload
        file: PathBuf,
        /// Data set name
        #[arg(short, long, default_value = "")]
        name: String,
        #[clap(flatten)]
        conn: ConnectionArgs,
    },
    /// List data sets
    #[clap(aliases = &["ls", "l"])]
    List {
        #[clap(flatten)]
        output: OutputArgs,
        #[clap(flatten)]
        conn: ConnectionArgs,
    },
    /// Print data sets as they are created
    #[clap(aliases = &["w"])]
    Watch {
        #[clap(flatten)]
        conn: ConnectionArgs,
    },
    /// Resolve a stored file key to a temporary URL
    #[clap(aliases = &["o"])]
    Open {
        /// Storage key of the data set file
        key: String,
        #[clap(flatten)]
        conn: ConnectionArgs,
    },
    /// Context management operations
    #[clap(aliases = &["ctx"])]
    Context {
        #[command(subcommand)]
        opt: ContextOperation,
    },
}

/// Selects which stored context a command talks to.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct ConnectionArgs {
    /// Context name (defaults to the current context)
    #[arg(long = "context")]
    pub context: Option<String>,
    /// Alternative config file
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

/// Context operation commands
#[derive(clap::Subcommand, Clone, Debug)]
pub enum ContextOperation {
    /// Configure connection settings
    #[clap(aliases = &["s", "update"])]
    Set {
        /// Context name (defaults to current)
        name: Option<String>,
        /// GraphQL endpoint
        #[arg(long)]
        api: Option<String>,
        /// Subscription endpoint (defaults to the GraphQL endpoint)
        #[arg(long)]
        realtime: Option<String>,
        /// Object storage gateway
        #[arg(long)]
        storage: Option<String>,
        /// Storage bucket
        #[arg(long)]
        bucket: Option<String>,
        /// Storage region
        #[arg(long)]
        region: Option<String>,
        /// Identity id used for private objects
        #[arg(long)]
        identity: Option<String>,
        /// Session token
        #[arg(long)]
        token: Option<String>,
    },
    /// Display current configuration
    #[clap(aliases = &["g"])]
    Get,
    /// Switch between contexts
    Select {
        /// Context name to switch to
        name: String,
    },
}

/// Available output formats
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}
