use clap::Parser;
use dom_locator::cli::commands::{
    CommandContext, cmd_find, cmd_locate, cmd_rank, cmd_record, cmd_xpath,
};
use dom_locator::cli::config::{Cli, Commands, load_config};
use dom_locator::locator::Locator;
use dom_locator::trace::logger::TraceLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Trace path: CLI > config
    let trace_path = cli.trace.as_deref().or(config.trace.path.as_deref());

    let ctx = CommandContext {
        locator: Locator::new(config.locator.clone())?,
        tracer: TraceLogger::from_path(trace_path),
        verbose: cli.verbose,
    };

    let found = match cli.command {
        Commands::Xpath { snapshot, at } => cmd_xpath(&ctx, &snapshot, &at)?,
        Commands::Find { snapshot, xpath } => cmd_find(&ctx, &snapshot, &xpath)?,
        Commands::Record {
            snapshot,
            at,
            output,
        } => {
            cmd_record(&ctx, &snapshot, &at, output.as_deref())?;
            true
        }
        Commands::Locate { snapshot, record } => cmd_locate(&ctx, &snapshot, &record)?,
        Commands::Rank {
            snapshot,
            record,
            limit,
        } => {
            let limit = limit.unwrap_or(config.rank.default_limit);
            cmd_rank(&ctx, &snapshot, &record, limit)?
        }
    };

    if !found {
        std::process::exit(1);
    }
    Ok(())
}
