use anyhow::Result;
use clap::Parser;
use protocell_lib::app::{input, App, AppOptions, ShutdownManager};
use protocell_lib::Signals;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Snapshot directory to resume from
    #[arg(short, long)]
    load: Option<PathBuf>,

    /// Stop after this many ticks
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Number of partition workers (defaults to available threads - 1)
    #[arg(short, long)]
    partitions: Option<usize>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Disable periodic saves
    #[arg(long)]
    no_autosave: bool,

    /// Do not read commands (p, s, q) from stdin
    #[arg(long)]
    no_input: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    protocell_core::init_logging();
    let args = Args::parse();

    let signals = Signals::new();
    let ctrl_c_signals = signals.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received, initiating graceful shutdown...");
        ctrl_c_signals.request_shutdown();
    });

    let options = AppOptions {
        config_path: Some(args.config),
        load: args.load,
        ticks: args.ticks,
        partitions: args.partitions,
        seed: args.seed,
        no_autosave: args.no_autosave,
    };
    let mut app = App::new(options, signals.clone())?;
    let mut shutdown = ShutdownManager::new(signals);
    shutdown.set_save_on_exit(app.config.persistence.save_on_exit);

    if !args.no_input {
        input::spawn_stdin_reader(app.controls.clone(), app.signals.clone())?;
    }

    let res = tokio::task::block_in_place(|| app.run());
    if let Err(e) = &res {
        tracing::error!(error = %e, "Application error");
        shutdown.set_exit_code(1);
    }
    match shutdown.cleanup(&mut app) {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "Final state saved"),
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "Shutdown save failed");
            shutdown.set_exit_code(1);
        }
    }

    let code = shutdown.exit_code();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
