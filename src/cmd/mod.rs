use crate::{pkg::server::listen, prelude::Result};
use clap::{Parser, Subcommand};

mod admin;
mod migrate;

#[derive(Parser)]
#[command(about = "corporate site api and back office")]
struct Cmd {
    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    Listen,
    Migrate,
    /// Creates an admin account, or resets the name and password of an existing one.
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, env = "ADMIN_PASSWORD")]
        password: String,
    },
}

pub async fn run() -> Result<()> {
    let args = Cmd::parse();
    match args.command {
        Some(SubCommandType::Listen) => {
            listen().await?;
        }
        Some(SubCommandType::Migrate) => {
            migrate::apply().await?;
        }
        Some(SubCommandType::CreateAdmin {
            email,
            name,
            password,
        }) => {
            admin::create(&email, &name, &password).await?;
        }
        None => {
            tracing::error!("no subcommand passed");
        }
    }
    Ok(())
}
