mod app;
mod command;
mod config;
mod error;
mod gesture;
mod messages;
mod motor;
mod tracker;
mod transport;

use app::VisionApp;
use config::Config;
use motor::Dispatcher;
use tracker::JsonLinesTracker;
use transport::{CommandClient, CommandServer, HttpSink};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "gesture-drive")]
#[command(about = "Drive a two-motor robot with hand gestures")]
struct Cli {
    /// Config file (default: ~/.config/gesture-drive/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Robot side: accept commands and run the motors
    Serve,
    /// Vision side: read hand detections from stdin and send commands
    Drive,
    /// Run each motor direction briefly, then stop
    MotorTest,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.validate()?;

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Drive => drive(config).await,
        Commands::MotorTest => motor_test(config).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    let driver = motor::open_driver(&config.driver).await?;
    let dispatcher = Arc::new(Dispatcher::new(driver));

    let server =
        CommandServer::bind(&config.listen_addr, &config.command_path, dispatcher.clone()).await?;

    tracing::info!("Starting robot command server");
    tracing::info!(
        "Listening for commands on http://{}{}",
        server.local_addr()?,
        config.command_path
    );

    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, stopping motors and shutting down");
            dispatcher.execute(command::Command::Stop).await?;
            Ok(())
        }
    }
}

async fn drive(config: Config) -> Result<()> {
    let sink = HttpSink::new(&config.server_url, config.request_timeout())?;
    let client = CommandClient::new(sink, config.heartbeat());
    let tracker = JsonLinesTracker::spawn(std::io::BufReader::new(std::io::stdin()))?;

    tracing::info!("Sending gesture commands to {}", config.server_url);

    VisionApp::new(tracker, client, config.default_speed, config.frame_retry())
        .run()
        .await
}

async fn motor_test(config: Config) -> Result<()> {
    let driver = motor::open_driver(&config.driver).await?;
    let dispatcher = Dispatcher::new(driver);

    tokio::select! {
        result = motor::selftest::run(&dispatcher, Duration::from_secs(2)) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, stopping motors");
            dispatcher.execute(command::Command::Stop).await?;
            Ok(())
        }
    }
}
