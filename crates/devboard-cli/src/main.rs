//! `devboard`: command-line front end for the board peripheral drivers.
//!
//! One subcommand per peripheral; device names are resolved relative to
//! `/dev` and default to the standard node names. Sensor reads can emit
//! JSON with `--json` for scripting.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use devboard_core::constants::{DEFAULT_AP3216C_DEVICE, DEFAULT_DHT11_DEVICE, DEFAULT_KEY_DEVICE};
use devboard_drivers::key::Key;
use devboard_drivers::{Ap3216c, Dht11, KeyConfig, Led};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "devboard", version, about = "Exercise the board peripheral drivers")]
struct Cli {
    /// Print sensor readings as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Control an LED device
    Led {
        #[command(subcommand)]
        action: LedAction,
    },
    /// Read the AP3216C light/proximity sensor
    Ap3216c {
        #[command(subcommand)]
        action: Ap3216cAction,
    },
    /// Read the DHT11 temperature/humidity sensor
    Dht11 {
        #[command(subcommand)]
        action: Dht11Action,
    },
    /// Watch classified key events
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand)]
enum LedAction {
    /// Turn an LED on or off
    Set {
        /// Device node name under /dev
        device: String,
        /// Target state
        state: LedState,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LedState {
    On,
    Off,
}

#[derive(Subcommand)]
enum Ap3216cAction {
    /// Read one sample from the sensor
    Read {
        /// Device node name under /dev
        #[arg(default_value = DEFAULT_AP3216C_DEVICE)]
        device: String,
    },
}

#[derive(Subcommand)]
enum Dht11Action {
    /// Read one sample from the sensor
    Read {
        /// Device node name under /dev
        #[arg(default_value = DEFAULT_DHT11_DEVICE)]
        device: String,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Print key events until interrupted
    Watch {
        /// Device node name under /dev
        #[arg(default_value = DEFAULT_KEY_DEVICE)]
        device: String,
        /// Report each long press at most once per press cycle
        #[arg(long)]
        latch_long_press: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Led { action } => run_led(action),
        Command::Ap3216c { action } => run_ap3216c(action, cli.json),
        Command::Dht11 { action } => run_dht11(action, cli.json),
        Command::Key { action } => run_key(action).await,
    }
}

fn run_led(action: LedAction) -> Result<()> {
    let LedAction::Set { device, state } = action;
    let mut led = Led::new(device.as_str());
    led.init()?;
    let on = matches!(state, LedState::On);
    led.set_state(on)?;
    println!("LED {device}: {}", if on { "on" } else { "off" });
    Ok(())
}

fn run_ap3216c(action: Ap3216cAction, json: bool) -> Result<()> {
    let Ap3216cAction::Read { device } = action;
    let mut sensor = Ap3216c::new(device.as_str());
    sensor.init()?;
    let data = sensor.read_data()?;
    debug!(?data, device, "ap3216c sample");
    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        println!("ir:  {}", data.ir);
        println!("als: {}", data.als);
        println!("ps:  {}", data.ps);
    }
    Ok(())
}

fn run_dht11(action: Dht11Action, json: bool) -> Result<()> {
    let Dht11Action::Read { device } = action;
    let mut sensor = Dht11::new(device.as_str());
    sensor.init()?;
    let data = sensor.read_data()?;
    debug!(?data, device, "dht11 sample");
    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        println!("humidity:    {:.1} %", data.humidity());
        println!("temperature: {:.1} C", data.temperature());
    }
    Ok(())
}

async fn run_key(action: KeyAction) -> Result<()> {
    let KeyAction::Watch {
        device,
        latch_long_press,
    } = action;
    let config = KeyConfig {
        latch_long_press,
        ..KeyConfig::default()
    };
    let mut key = Key::with_config(device.as_str(), config);
    key.init()?;
    key.set_callback(Box::new(|code, event| {
        println!("key {code}: {event}");
    }))
    .await?;
    key.start()?;
    println!("watching {device}, press Ctrl-C to exit");

    tokio::signal::ctrl_c().await?;
    key.stop().await?;
    Ok(())
}
