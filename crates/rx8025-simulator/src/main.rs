//! Desktop simulator for the RX8025 clock driver.
//!
//! Runs the driver against a simulated chip on a virtual I2C bus and
//! replays the firmware's demo loop: set the clock once, then once per
//! second print every field read individually followed by the Unix time
//! from the single-transaction bulk read.
//!
//! ```text
//! rx8025-simulator [seconds] [date time]
//! rx8025-simulator 5 "Feb 28 2024" "23:59:58"
//! ```
//!
//! `seconds` defaults to 10; `0` runs until interrupted. Without a date and
//! time the clock starts at 2022-04-08 00:33:35.

use std::process::ExitCode;
use std::time::Duration;

use embassy_futures::block_on;
use log::{error, info};

use rx8025_core::sim::SimulatedRx8025;
use rx8025_core::{DateTime, DriverError, RtcConfig, Rx8025};

// ---------------------------------------------------------------------------
// Simulation constants
// ---------------------------------------------------------------------------

/// Wall-clock time between two polls of the chip.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Number of polls when none is given on the command line.
const DEFAULT_POLLS: u32 = 10;

// Start time written by the firmware's setup routine
const START_SECOND: u8 = 35;
const START_MINUTE: u8 = 33;
const START_HOUR: u8 = 0;
const START_DAY: u8 = 8;
const START_MONTH: u8 = 4;
const START_YEAR: u16 = 22;

type SimRtc = Rx8025<SimulatedRx8025>;

// ---------------------------------------------------------------------------
// Demo steps
// ---------------------------------------------------------------------------

fn setup(rtc: &mut SimRtc, start: Option<DateTime>) -> Result<(), DriverError<SimulatedRx8025>> {
    block_on(rtc.initialize())?;
    match start {
        Some(time) => block_on(rtc.set_datetime(&time)),
        None => block_on(rtc.set_time(
            START_SECOND,
            START_MINUTE,
            START_HOUR,
            START_DAY,
            START_MONTH,
            START_YEAR,
        )),
    }
}

/// Read each field in its own transaction, like the firmware's display loop.
fn print_fields(rtc: &mut SimRtc) -> Result<(), DriverError<SimulatedRx8025>> {
    let year = block_on(rtc.get_year())?;
    let month = block_on(rtc.get_month())?;
    let day = block_on(rtc.get_date())?;
    let hour = block_on(rtc.get_hour())?;
    let minute = block_on(rtc.get_minute())?;
    let second = block_on(rtc.get_second())?;
    println!(
        "20{:02}-{:02}-{:02} {:02}:{:02}:{:02}",
        year, month, day, hour, minute, second
    );
    Ok(())
}

fn print_bulk(rtc: &mut SimRtc) -> Result<(), DriverError<SimulatedRx8025>> {
    let time = block_on(rtc.get_datetime())?;
    let unix = block_on(rtc.get_unix_time())?;
    println!("{} (weekday {}) unix {}", time, time.day_of_week(), unix);
    Ok(())
}

fn parse_args() -> Result<(u32, Option<DateTime>), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let polls = match args.first() {
        Some(arg) => arg
            .parse()
            .map_err(|_| format!("invalid number of seconds: {arg}"))?,
        None => DEFAULT_POLLS,
    };
    let start = match (args.get(1), args.get(2)) {
        (Some(date), Some(time)) => Some(
            DateTime::parse(date, time).map_err(|e| format!("invalid start time: {e}"))?,
        ),
        (Some(_), None) => return Err("a start date needs a start time".into()),
        _ => None,
    };
    Ok((polls, start))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    env_logger::init();

    let (polls, start) = match parse_args() {
        Ok(parsed) => parsed,
        Err(message) => {
            error!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let config = RtcConfig::default();
    info!(
        "Starting RX8025 simulator at {:#04x}, anchor shift {} s",
        config.address,
        config.anchor.shift_secs()
    );
    let mut rtc = Rx8025::with_config(SimulatedRx8025::new(config.address), config);

    if let Err(e) = setup(&mut rtc, start) {
        error!("Failed to set up the clock: {}", e);
        return ExitCode::FAILURE;
    }

    let mut elapsed = 0u32;
    while polls == 0 || elapsed < polls {
        if let Err(e) = print_fields(&mut rtc).and_then(|()| print_bulk(&mut rtc)) {
            error!("Failed to read the clock: {}", e);
            return ExitCode::FAILURE;
        }

        std::thread::sleep(POLL_INTERVAL);
        rtc.transport_mut().advance(POLL_INTERVAL.as_secs() as u32);
        elapsed += 1;
    }

    info!("Simulator exiting");
    ExitCode::SUCCESS
}
