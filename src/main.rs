use std::io;
use std::path::PathBuf;

use clap::Parser;
use kyiv1557::{report, Credentials, Session, DEFAULT_CONFIG_PATH};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kyiv1557=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let opts = Options::parse();
    let credentials = Credentials::load(&opts.config)?;
    let mut session = Session::login_with(&credentials).await?;

    // `Stdout` locks per write, so nothing is held across the address switches.
    report::write_all(&mut io::stdout(), &mut session).await
}

#[derive(Parser)]
#[command(about = "Print the 1557 portal notices for every address on the account")]
struct Options {
    /// INI file with a [1557] section holding `phone` and `pass`
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}
