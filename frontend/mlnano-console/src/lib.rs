mod auth;
mod commands;
mod config;
mod controller;
mod output;
mod store;
#[cfg(test)]
mod testing;
mod types;
mod view;

use std::process;

pub use auth::{AuthError, AuthGate};
pub use controller::{
    CreateOutcome, CreateStage, DataSetController, EMPTY_NAME_ALERT,
    FileLocation, PendingFile,
};
pub use output::OutputArgs;
pub use store::{ListState, ResolvedImage, StoreAction, reduce};
pub use types::{
    ConnectionArgs, ContextOperation, MlnanoCli, MlnanoCommands, OutputFormat,
};

pub async fn run(cli: MlnanoCli) {
    match &cli.command {
        MlnanoCommands::Console { conn } => {
            if let Err(e) = commands::handle_console_command(conn).await {
                eprintln!("Console command failed: {:#}", e);
                process::exit(1);
            }
        }
        MlnanoCommands::Upload { file, name, conn } => {
            if let Err(e) = commands::handle_upload_command(file, name, conn).await {
                eprintln!("Upload command failed: {:#}", e);
                process::exit(1);
            }
        }
        MlnanoCommands::List { output, conn } => {
            if let Err(e) = commands::handle_list_command(&output.output, conn).await {
                eprintln!("List command failed: {:#}", e);
                process::exit(1);
            }
        }
        MlnanoCommands::Watch { conn } => {
            if let Err(e) = commands::handle_watch_command(conn).await {
                eprintln!("Watch command failed: {:#}", e);
                process::exit(1);
            }
        }
        MlnanoCommands::Open { key, conn } => {
            if let Err(e) = commands::handle_open_command(key, conn).await {
                eprintln!("Open command failed: {:#}", e);
                process::exit(1);
            }
        }
        MlnanoCommands::Context { opt } => {
            if let Err(e) = commands::handle_context_command(opt).await {
                eprintln!("Context command failed: {:#}", e);
                process::exit(1);
            }
        }
    }
}
