//! `blued` command-line front end.
//!
//! Replays a JSON-lines capture of inbound daemon messages through a
//! session and reacts to the resulting events the way a live client would.
//! Outgoing commands go to `--output` as JSON lines; the report goes to
//! stdout.
//!
//! ```text
//!  --input (JSONL) ──▶ Session ──▶ handlers ──▶ stdout report
//!                        │
//!                        └──▶ CaptureTransport ──▶ --output (JSONL)
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use uuid::Uuid;

use blued_client::adapters::read_capture;
use blued_client::prelude::*;

type Output = CaptureTransport<Box<dyn Write + Send>>;

#[derive(Debug, Parser)]
#[command(name = "blued", version, about = "Drive a blued session from a message capture")]
struct Cli {
    /// Session configuration (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Inbound daemon messages, one JSON record per line [default: stdin]
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Where to write outgoing messages [default: discard]
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Log every message and event
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan and print every discovered peripheral
    Discover {
        #[arg(long)]
        allow_duplicates: bool,
    },
    /// Connect to one peripheral and dump its services and readable values
    Explore {
        peripheral: Uuid,
        #[arg(long)]
        allow_duplicates: bool,
    },
    /// Advertise as an iBeacon
    Beacon {
        #[arg(long, default_value = "1beac099-beac-beac-beac-beac09beac09")]
        uuid: Uuid,
        #[arg(long, default_value_t = 0)]
        major: u16,
        #[arg(long, default_value_t = 0)]
        minor: u16,
        #[arg(long, default_value_t = -57, allow_hyphen_values = true)]
        power: i8,
        /// Darwin kernel release (e.g. 14.5.0); selects the beacon layout
        #[arg(long)]
        darwin_release: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "info" }),
    )
    .init();

    let mut config = load_config(cli.config.as_deref())?;
    config.verbose |= cli.verbose;
    if let Command::Beacon {
        darwin_release: Some(release),
        ..
    } = &cli.command
    {
        config.beacon_format = BeaconFormat::for_darwin_release(release);
    }

    let output: Box<dyn Write + Send> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::sink()),
    };

    let mut session = Session::new(CaptureTransport::new(output), config.clone());
    if config.verbose {
        session.on_all(sink_handler(LogEventSink::new()));
    }

    let done = Arc::new(AtomicBool::new(false));
    match cli.command {
        Command::Discover { allow_duplicates } => install_discover(&mut session, allow_duplicates),
        Command::Explore {
            peripheral,
            allow_duplicates,
        } => install_explore(&mut session, peripheral, allow_duplicates, done.clone()),
        Command::Beacon {
            uuid,
            major,
            minor,
            power,
            ..
        } => install_beacon(&mut session, IBeacon::new(uuid, major, minor, power)),
    }

    info!("init {}", config.client_name);
    session.central_mut().init().context("sending init")?;

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    replay(&mut session, input, &done)?;

    println!("goodbye!");
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn replay(session: &mut Session<Output>, input: impl BufRead, done: &AtomicBool) -> Result<()> {
    for record in read_capture(input) {
        let inbound = match record {
            Ok(inbound) => inbound,
            Err(e @ Error::Capture { .. }) => {
                warn!("skipping {e}");
                continue;
            }
            Err(e) => return Err(e).context("reading input"),
        };
        // Malformed messages are logged by the session and skipped.
        let _ = session.handle(inbound);
        if done.load(Ordering::Relaxed) {
            break;
        }
    }
    Ok(())
}

fn check(what: &str, result: blued_client::Result<()>) {
    if let Err(e) = result {
        warn!("{what}: {e}");
    }
}

// ── discover ──────────────────────────────────────────────────

fn scan_when_powered(session: &mut Session<Output>, allow_duplicates: bool) {
    session.on(EventKind::StateChange, move |ev, central| {
        if *ev == Event::StateChange(AdapterState::PoweredOn) {
            check("start scanning", central.start_scanning(&[], allow_duplicates));
        } else {
            check("stop scanning", central.stop_scanning());
        }
    });
}

fn install_discover(session: &mut Session<Output>, allow_duplicates: bool) {
    scan_when_powered(session, allow_duplicates);
    session.on(EventKind::Discover, |ev, _| {
        let Event::Discover {
            peripheral,
            advertisement,
            rssi,
            ..
        } = ev
        else {
            return;
        };
        println!("peripheral discovered ({peripheral}):");
        println!("\tlocal name: {}", advertisement.local_name);
        println!("\trssi: {rssi}");
        if !advertisement.service_uuids.is_empty() {
            let services: Vec<String> = advertisement
                .service_uuids
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("\tadvertised services: {}", services.join(", "));
        }
        for sd in &advertisement.service_data {
            println!("\tservice data {}: {}", sd.uuid, hex::encode(&sd.data));
        }
        if !advertisement.manufacturer_data.is_empty() {
            println!(
                "\tmanufacturer data: {}",
                hex::encode(&advertisement.manufacturer_data)
            );
        }
        if let Some(beacon) = advertisement.ibeacon() {
            println!(
                "\tiBeacon: {} major={} minor={} power={}",
                beacon.uuid, beacon.major, beacon.minor, beacon.measured_power
            );
        }
        if advertisement.tx_power_level != 0 {
            println!("\ttx power level: {}", advertisement.tx_power_level);
        }
    });
}

// ── explore ───────────────────────────────────────────────────

fn install_explore(
    session: &mut Session<Output>,
    target: Uuid,
    allow_duplicates: bool,
    done: Arc<AtomicBool>,
) {
    scan_when_powered(session, allow_duplicates);

    session.on(EventKind::Discover, move |ev, central| {
        let Event::Discover {
            peripheral,
            advertisement,
            connectable,
            ..
        } = ev
        else {
            return;
        };
        if *peripheral != target {
            return;
        }
        check("stop scanning", central.stop_scanning());

        println!();
        println!("peripheral with UUID {peripheral} found");
        if *connectable {
            println!("  Connectable");
        }
        if !advertisement.local_name.is_empty() {
            println!("  Local Name        = {}", advertisement.local_name);
        }
        if advertisement.tx_power_level != 0 {
            println!("  TX Power Level    = {}", advertisement.tx_power_level);
        }
        if !advertisement.manufacturer_data.is_empty() {
            println!(
                "  Manufacturer Data = {}",
                hex::encode(&advertisement.manufacturer_data)
            );
        }
        for sd in &advertisement.service_data {
            println!("  Service Data      = {} {}", sd.uuid, hex::encode(&sd.data));
        }
        println!();
        println!("services and characteristics:");
        check("connect", central.connect(*peripheral));
    });

    session.on(EventKind::Connect, |ev, central| {
        if let Some(peripheral) = ev.peripheral() {
            check("discover services", central.discover_services(peripheral, &[]));
        }
    });

    session.on(EventKind::ServicesDiscover, |ev, central| {
        let Event::ServicesDiscover {
            peripheral,
            services,
        } = ev
        else {
            return;
        };
        for &service in services {
            check(
                "discover characteristics",
                central.discover_characteristics(*peripheral, service, &[]),
            );
        }
    });

    session.on(EventKind::CharacteristicsDiscover, |ev, central| {
        let Event::CharacteristicsDiscover {
            peripheral,
            service,
            characteristics,
        } = ev
        else {
            return;
        };
        let readable = print_service(central, *peripheral, *service, characteristics);
        for characteristic in readable {
            check("read", central.read(*peripheral, *service, characteristic));
        }
    });

    session.on(EventKind::Read, |ev, _| {
        if let Event::Read {
            characteristic,
            data,
            ..
        } = ev
        {
            println!(
                "  {characteristic} value  {} | {:?}",
                hex::encode(data),
                String::from_utf8_lossy(data)
            );
        }
    });

    session.on(EventKind::Disconnect, move |_, _| {
        done.store(true, Ordering::Relaxed);
    });
}

/// Print one service and its characteristics; returns the readable ones.
fn print_service(
    central: &Central<Output>,
    peripheral: Uuid,
    service: GattUuid,
    characteristics: &[GattUuid],
) -> Vec<GattUuid> {
    let Some(s) = central
        .directory()
        .peripheral(peripheral)
        .and_then(|p| p.service(service))
    else {
        return Vec::new();
    };

    match s.name() {
        Some(name) => println!("{} ({name})", s.uuid),
        None => println!("{}", s.uuid),
    }

    let mut readable = Vec::new();
    for c in characteristics.iter().filter_map(|&u| s.characteristic(u)) {
        match c.name() {
            Some(name) => println!("  {} ({name})", c.uuid),
            None => println!("  {}", c.uuid),
        }
        println!("    properties  {}", c.properties);
        if c.properties.readable() {
            readable.push(c.uuid);
        }
    }
    readable
}

// ── beacon ────────────────────────────────────────────────────

fn install_beacon(session: &mut Session<Output>, beacon: IBeacon) {
    session.on(EventKind::StateChange, move |ev, central| {
        if *ev == Event::StateChange(AdapterState::PoweredOn) {
            info!(
                "start advertising {} {} {} {}",
                beacon.uuid, beacon.major, beacon.minor, beacon.measured_power
            );
            check("start advertising", central.start_advertising_ibeacon(&beacon));
        } else {
            check("stop advertising", central.stop_advertising());
        }
    });
    session.on(EventKind::AdvertisingStart, |_, _| println!("advertising"));
    session.on(EventKind::AdvertisingStop, |_, _| println!("advertising stopped"));
}
