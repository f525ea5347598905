use clap::Parser;
use forage_server::config::Config;
use forage_server::runtime::SimulationRunner;
use forage_server::server;
use forage_server::simulation::SimulationState;

#[derive(Parser, Debug)]
#[command(name = "forage-server")]
#[command(about = "Foraging Evolution Simulation Server", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.json")]
    config: String,

    #[arg(long)]
    no_server: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = if std::path::Path::new(&args.config).exists() {
        log::info!("Loading config from: {}", args.config);
        Config::load_from_file(&args.config)?
    } else {
        log::info!(
            "Config file not found, using defaults and saving to: {}",
            args.config
        );
        let config = Config::default();
        config.save_to_file(&args.config)?;
        config
    };

    log::info!("Initializing simulation...");
    let state = SimulationState::new(&config);
    let runner = SimulationRunner::new(state, config.simulation.ticks_per_second);

    let serving = config.server.enabled && !args.no_server;
    if serving {
        let server_runner = runner.clone();
        let server_config = config.clone();
        tokio::spawn(async move {
            if let Err(e) = server::run_server(server_config, server_runner).await {
                log::error!("Server error: {}", e);
            }
        });
        log::info!(
            "WebSocket server started on {}:{}",
            config.server.address,
            config.server.port
        );
    }

    // Headless runs end at extinction; with a server attached the world
    // stays up, paused, so a client can inspect or reset it.
    runner.run(!serving).await?;

    if config.data.collect {
        let shared = runner.state();
        let state = shared.read().await;
        if !state.collector.is_empty() {
            state.collector.write_to_dir(&config.data.export_directory)?;
        }
    }

    Ok(())
}
