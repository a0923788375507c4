use bios_watch::{
    App,
    cli::Cli,
    config::ConfigStore,
    errors, logging,
    service::{MsiReleaseSource, WebhookNotifier},
};
use clap::Parser;
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse cli arguments
    let args = Cli::parse();

    // Initialize logging
    logging::init(logging::resolve_filter())?;
    tracing::debug!("Options: {args:?}");

    errors::init(run(args)).await
}

async fn run(args: Cli) -> Result<()> {
    let timeout = args.request_timeout();
    let source = MsiReleaseSource::new(args.product, timeout)?;
    let notifier = WebhookNotifier::new(timeout)?;

    let outcome = App::new(ConfigStore::new(args.config), source, notifier)
        .with_dry_run(args.dry_run)
        .run()
        .await?;

    println!("{outcome}");
    Ok(())
}
