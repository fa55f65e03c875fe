use anyhow::Result;
use clap::Parser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use qedit::commands::{Cli, Commands};
use qedit::cue::print_cue_sheet;
use qedit::cue::report::check_cue_sheets;
use qedit::edit::edit_cue_sheet;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let logger = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .build();

    let level = logger.filter();
    let pb = MultiProgress::new();

    LogWrapper::new(pb.clone(), logger).try_init()?;
    log::set_max_level(level);

    let cli = Cli::parse();

    match cli.command {
        Commands::Edit(cmd) => edit_cue_sheet(cmd).await?,
        Commands::Check(cmd) => check_cue_sheets(pb.clone(), cmd).await?,
        Commands::Print(cmd) => print_cue_sheet(&cmd.input).await?,
    }

    Ok(())
}
