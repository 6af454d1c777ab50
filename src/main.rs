use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod error;
mod matching;
mod store;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("pair_solver=debug,info")
    } else {
        EnvFilter::new("pair_solver=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Pair(args) => {
            cli::pair::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Swap(args) => {
            cli::swap::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Show(args) => {
            cli::show::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Publish(args) => {
            cli::publish::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Score(args) => {
            cli::score::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
