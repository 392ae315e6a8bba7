use anyhow::Result;
use metar_core::Config;
use metar_report::{MetarCommand, Reply};

#[tokio::main]
async fn main() -> Result<()> {
    metar_core::init()?;

    let (config, _) = Config::load_validated()?;
    tracing::debug!("Config directory: {}", config.config_dir.display());

    let command = MetarCommand::from_config(&config)?;

    let icao = std::env::args().nth(1);
    for reply in command.run(icao.as_deref()).await {
        match reply {
            Reply::Text(text) => println!("{}", text),
            Reply::Image(path) => println!("{}", path.display()),
        }
    }

    Ok(())
}
