use anyhow::Context;
use clap::Parser;
use tailwind_converter::{handle_convert_command, handle_lookup_command, Cli, Commands};

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(args) => {
            init_logging(args.verbose);

            match handle_convert_command(args).await {
                Ok(_) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Lookup(args) => {
            init_logging(false);

            let entry = handle_lookup_command(&args)
                .with_context(|| format!("Failed to look up `{}`", args.property))?;
            match entry {
                Some(entry) => {
                    let json = serde_json::to_string_pretty(&entry).context("Failed to serialize entry")?;
                    println!("{}", json);
                    Ok(())
                }
                None => {
                    eprintln!("Unknown property: {}", args.property);
                    std::process::exit(1);
                }
            }
        }
    }
}
