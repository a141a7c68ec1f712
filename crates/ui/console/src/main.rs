use clap::Parser;
use color_eyre::Result;

use console::{
    app::App,
    catalog,
    cli::{Cli, Cmd},
    config::{ensure_data_and_config_dirs_exist, Config},
    errors, logging,
};
use submit::Client;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    errors::init()?;
    ensure_data_and_config_dirs_exist()?;
    let _guard = logging::init()?;

    let config = Config::new()?;

    match cli.cmd {
        Cmd::Run { screen } => {
            let screen = catalog::screen_for(screen)?;
            let mut app = App::new(screen, config.submit_config());
            app.run().await?;
        }
        Cmd::Health => {
            let client = Client::new(config.submit_config());
            match client.ping().await {
                Ok(status) => {
                    println!("backend reachable (status {status})");
                }
                Err(e) => {
                    eprintln!("backend unreachable: {e}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
