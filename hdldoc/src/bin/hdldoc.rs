use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use hdldoc::{generate, resolve_args, write_output, Cli, Config, OutputTarget};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let args = resolve_args(cli);
    log::debug!("arguments: {:?}", args);

    let config = Config::resolve(args.config.as_deref()).context("failed to load configuration")?;
    let text = generate(&args, &config)
        .with_context(|| format!("failed to process {}", args.file.display()))?;

    match args.output.path() {
        None => print!("{}", text),
        Some(path) => {
            write_output(&path, &text)?;
            if args.output == OutputTarget::Temp {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
