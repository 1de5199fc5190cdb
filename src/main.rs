mod cli;
mod commands;
mod formatting;
mod pipeline;
mod settings;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use cli::Commands;
use commands::{run_explain, run_generate, run_transform, GenerateArgs};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Generate {
            input,
            framework,
            rules,
            assets,
            responsive,
            svg_mode,
            with_props,
            name,
            out_dir,
        } => {
            run_generate(
                args.config,
                GenerateArgs {
                    input,
                    framework,
                    rules,
                    assets,
                    responsive,
                    svg_mode,
                    with_props,
                    name,
                    out_dir,
                },
            )
            .await
        }
        Commands::Transform { input } => run_transform(args.config, input).await,
        Commands::Explain {
            input,
            rules,
            framework,
        } => run_explain(args.config, input, rules, framework).await,
    }
}

/// Logs go to stderr so stdout stays a clean JSON payload.
/// `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "fcg=debug,fcg_lib=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
