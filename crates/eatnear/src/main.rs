//! eatnear CLI - find the ten nearest restaurants from the terminal
//!
//! One-shot by default; `--interactive` reads form commands from stdin.

use std::{future::Future, io::Write as _, path::PathBuf, process::ExitCode, time::Duration};

use anyhow::Result;
use clap::{ArgAction, Parser};
use eatnear::{
    DeviceLocation, FinderConfig, LoadingFlag, PlacesTransport, RestaurantFinder, init_logging,
};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Level, debug};

const HELP: &str = "\
Commands:
  lat <value>   set the latitude field
  lon <value>   set the longitude field
  locate        fill both fields from the device location
  search        look up the nearest restaurants
  open <n>      expand row n (closes any other row)
  close         collapse the open row
  show          print the current fields and list
  help          show this message
  quit          leave";

#[derive(Parser)]
#[command(name = "eatnear")]
#[command(about = "Find the nearest restaurants around a pair of coordinates", long_about = None)]
struct Args {
    /// Latitude in decimal degrees, [-90, 90]
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,

    /// Longitude in decimal degrees, [-180, 180]
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,

    /// Start from the device location (applied before --lat/--lon)
    #[arg(long)]
    locate: bool,

    /// Expand row N (1-based) of the printed list
    #[arg(long, value_name = "N")]
    expand: Option<usize>,

    /// Read commands from stdin instead of running a single search
    #[arg(short, long)]
    interactive: bool,

    /// Config file (defaults to $EATNEAR_CONFIG, then the platform config dir)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

enum Command {
    Lat(String),
    Lon(String),
    Locate,
    Search,
    Open(usize),
    Close,
    Show,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let (word, rest) = line
            .trim()
            .split_once(char::is_whitespace)
            .map_or((line.trim(), ""), |(w, r)| (w, r.trim()));
        match word {
            "lat" => Some(Self::Lat(rest.to_string())),
            "lon" => Some(Self::Lon(rest.to_string())),
            "locate" => Some(Self::Locate),
            "search" => Some(Self::Search),
            "open" => rest.parse().ok().map(Self::Open),
            "close" => Some(Self::Close),
            "show" => Some(Self::Show),
            "help" | "?" => Some(Self::Help),
            "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    init_logging(level)?;

    let config = load_config(args.config.as_deref())?;
    let mut finder = RestaurantFinder::from_config(&config)?;

    if args.interactive {
        run_interactive(&mut finder).await?;
        return Ok(ExitCode::SUCCESS);
    }
    run_once(&mut finder, &args).await
}

fn load_config(path: Option<&std::path::Path>) -> Result<FinderConfig> {
    let Some(path) = path else {
        return Ok(FinderConfig::load()?);
    };
    let mut config = FinderConfig::load_from(path)?;
    config.apply_env_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

async fn run_once<T, D>(finder: &mut RestaurantFinder<T, D>, args: &Args) -> Result<ExitCode>
where
    T: PlacesTransport,
    D: DeviceLocation,
{
    if args.locate
        && let Err(e) = with_spinner(finder.loading_flag(), "Locating...", finder.locate()).await?
    {
        eprintln!("{e}");
        return Ok(ExitCode::FAILURE);
    }
    if let Some(lat) = &args.lat {
        finder.set_latitude(lat.as_str());
    }
    if let Some(lon) = &args.lon {
        finder.set_longitude(lon.as_str());
    }

    if !finder.can_submit() {
        print_field_errors(finder);
        return Ok(ExitCode::FAILURE);
    }

    if let Err(e) = with_spinner(finder.loading_flag(), "Searching...", finder.search()).await? {
        eprintln!("{e}");
        return Ok(ExitCode::FAILURE);
    }
    if let Some(row) = args.expand {
        open_row(finder, row);
    }
    print!("{}", finder.render());
    Ok(ExitCode::SUCCESS)
}

async fn run_interactive<T, D>(finder: &mut RestaurantFinder<T, D>) -> Result<()>
where
    T: PlacesTransport,
    D: DeviceLocation,
{
    println!("{HELP}");
    show(finder);
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            prompt()?;
            continue;
        }
        let Some(command) = Command::parse(&line) else {
            eprintln!("Unknown command: {}. Type `help` for the list.", line.trim());
            prompt()?;
            continue;
        };
        match command {
            Command::Lat(raw) => {
                finder.set_latitude(raw);
                print_field_errors(finder);
            }
            Command::Lon(raw) => {
                finder.set_longitude(raw);
                print_field_errors(finder);
            }
            Command::Locate => match with_spinner(finder.loading_flag(), "Locating...", finder.locate()).await? {
                Ok(_) => show(finder),
                Err(e) => eprintln!("{e}"),
            },
            Command::Search => {
                if finder.can_submit() {
                    match with_spinner(finder.loading_flag(), "Searching...", finder.search()).await? {
                        Ok(_) => print!("{}", finder.render()),
                        Err(e) => eprintln!("{e}"),
                    }
                } else {
                    print_field_errors(finder);
                }
            }
            Command::Open(row) => {
                if open_row(finder, row) {
                    print!("{}", finder.render());
                }
            }
            Command::Close => {
                finder.collapse();
                print!("{}", finder.render());
            }
            Command::Show => show(finder),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
        prompt()?;
    }
    debug!("Interactive session ended");
    Ok(())
}

/// Expand a 1-based row, reporting rows that do not exist.
fn open_row<T, D>(finder: &mut RestaurantFinder<T, D>, row: usize) -> bool
where
    T: PlacesTransport,
    D: DeviceLocation,
{
    let opened = row
        .checked_sub(1)
        .is_some_and(|index| finder.expand(index));
    if !opened {
        eprintln!("No row {row} in the current list");
    }
    opened
}

fn show<T, D>(finder: &RestaurantFinder<T, D>)
where
    T: PlacesTransport,
    D: DeviceLocation,
{
    println!(
        "latitude: {}  longitude: {}",
        finder.latitude(),
        finder.longitude()
    );
    print_field_errors(finder);
    print!("{}", finder.render());
}

fn print_field_errors<T, D>(finder: &RestaurantFinder<T, D>)
where
    T: PlacesTransport,
    D: DeviceLocation,
{
    for message in finder.field_errors() {
        eprintln!("{message}");
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

/// Drive `task` to completion, showing a spinner on stderr while `loading` is set.
async fn with_spinner<F: Future>(
    loading: LoadingFlag,
    message: &'static str,
    task: F,
) -> Result<F::Output> {
    tokio::pin!(task);
    let mut poll = tokio::time::interval(Duration::from_millis(50));
    let mut spinner: Option<ProgressBar> = None;

    let output = loop {
        tokio::select! {
            output = &mut task => break output,
            _ = poll.tick() => {
                if loading.is_set() {
                    if spinner.is_none() {
                        let pb = ProgressBar::new_spinner();
                        pb.set_style(
                            ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?,
                        );
                        pb.set_message(message);
                        pb.enable_steady_tick(Duration::from_millis(100));
                        spinner = Some(pb);
                    }
                } else if let Some(pb) = spinner.take() {
                    pb.finish_and_clear();
                }
            }
        }
    };
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    Ok(output)
}
