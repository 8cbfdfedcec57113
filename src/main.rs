use clap::Parser;
use plant_admin::{cli::Cli, commands, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    commands::run(cli.command).await
}
