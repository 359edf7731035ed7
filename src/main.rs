//! Scout entry point: parse flags, set up logging, run the menu.

use anyhow::Context;
use clap::Parser;
use scout::cli::{print_error, Cli, Menu, Terminal};
use scout::scanner::{is_root, NmapService};
use scout::storage::TextFileStore;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the menu on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = cli.settings().context("failed to load settings")?;
    let ports = settings.port_spec()?;

    let store = TextFileStore::new(&settings.list_file);
    let service = NmapService::new(&settings.nmap_path)
        .with_args(settings.nmap_args.clone())
        .with_udp(settings.scan_udp);

    let mut terminal = Terminal::new(io::stdin().lock(), io::stdout());
    let privileged = is_root();
    if service.requires_privileges() && !privileged {
        terminal.warn("UDP scanning requires root/sudo privileges; scanning TCP ports only.")?;
    }
    let service = service.for_privileges(privileged);

    let mut menu = Menu::new(terminal, &store, &service, ports)
        .with_report_format(settings.report_format)
        .with_progress(settings.show_progress);
    menu.run().await?;

    Ok(())
}
