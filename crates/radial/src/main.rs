use anyhow::Context;
use clap::Parser;
use radial::config;
use radial::gui::app::AppModel;
use radial::sys::{runtime, server};
use relm4::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Circular slider demo", long_about = None)]
struct Args {
    /// Unix socket accepting control commands (`set 0.5`, `animate 1`, ...)
    #[arg(short, long, default_value = server::DEFAULT_SOCKET_PATH)]
    socket: PathBuf,

    /// Config file to load and watch (defaults to the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a commented default config to the config path and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config_path = match args.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    if args.write_config {
        let path = config::write_default_config(&config_path)
            .with_context(|| format!("writing {}", config_path.display()))?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = config::load_or_default(&config_path);

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx, args.socket, config_path.clone());

    let app = RelmApp::new("org.radial.demo");

    app.run::<AppModel>((config, config_path, rx));
    Ok(())
}
