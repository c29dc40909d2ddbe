//! Pi GPIO Web binary: the control-panel server and a one-shot ADC read.

use clap::{Args, Parser, Subcommand};
use pi_gpio_web::{
    read_channel, AdcLines, Channel, LedBank, Panel, SharedBus, WebConfig, DEFAULT_WEB_PORT,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "pi_gpio_web")]
#[command(about = "Raspberry Pi GPIO control panel over WebSockets")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Web server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Web server port
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server (default)
    Serve(ServeArgs),

    /// Read all analog channels once and exit
    Read,
}

#[derive(Args)]
struct ServeArgs {
    /// Directory to serve the control page from (built-in page otherwise)
    #[arg(long)]
    static_dir: Option<String>,

    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,

    /// Maximum WebSocket connections
    #[arg(long, default_value_t = 100)]
    max_connections: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    match &cli.command {
        Some(Commands::Serve(args)) => serve_command(&cli, args).await?,
        Some(Commands::Read) => read_command()?,
        None => {
            // Default to serve command
            let serve_args = ServeArgs {
                static_dir: None,
                no_cors: false,
                max_connections: 100,
            };
            serve_command(&cli, &serve_args).await?;
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Claim the four converter lines, real or simulated depending on features.
fn build_lines() -> pi_gpio_web::Result<Box<dyn AdcLines + Send>> {
    #[cfg(feature = "gpio")]
    {
        Ok(Box::new(pi_gpio_web::hardware::lines::GpioAdcLines::new()?))
    }
    #[cfg(not(feature = "gpio"))]
    {
        info!("GPIO feature not compiled, using simulated converter");
        Ok(Box::new(pi_gpio_web::SimulatedConverter::with_values([
            512, 100, 200, 300, 400, 500, 600, 700,
        ])))
    }
}

/// Claim the LED pins, real or in-memory depending on features.
fn build_leds() -> pi_gpio_web::Result<LedBank> {
    #[cfg(feature = "gpio")]
    {
        LedBank::gpio()
    }
    #[cfg(not(feature = "gpio"))]
    {
        Ok(LedBank::memory())
    }
}

async fn serve_command(cli: &Cli, args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting GPIO control panel server...");

    let bus: SharedBus = Arc::new(Mutex::new(build_lines()?));
    let panel = Arc::new(Mutex::new(Panel::new(build_leds()?)?));

    let config = WebConfig::new(&cli.host, cli.port)
        .with_static_path(args.static_dir.clone())
        .with_cors(!args.no_cors)
        .with_max_websocket_connections(args.max_connections);

    info!("Web server configuration:");
    info!("  - Bind address: {}", config.bind_address());
    info!("  - CORS enabled: {}", config.enable_cors);
    info!(
        "  - Max WebSocket connections: {}",
        config.max_websocket_connections
    );

    pi_gpio_web::start_web_server(config, panel, bus).await?;

    Ok(())
}

fn read_command() -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = build_lines()?;

    println!("Analog inputs:");
    for channel in Channel::all() {
        let value = read_channel(lines.as_mut(), channel)?;
        println!("  adc{}: {}", channel, value);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["pi_gpio_web", "--port", "9090"]).unwrap();
        assert_eq!(cli.port, 9090);
    }

    #[test]
    fn test_default_values() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["pi_gpio_web"]).unwrap();
        assert_eq!(cli.port, DEFAULT_WEB_PORT);
        assert_eq!(cli.host, "0.0.0.0");
    }
}
