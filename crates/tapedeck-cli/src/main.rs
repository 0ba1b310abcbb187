//! tapedeck — print a "show of the day" for a live-music artist: pick the
//! best-matching historical show for today's date (or a given `MM-DD`),
//! resolve its playable tracks, and optionally overlay the setlist.

use anyhow::{bail, Context};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use tapedeck_core::archive::ArchiveClient;
use tapedeck_core::artists;
use tapedeck_core::config::Config;
use tapedeck_core::model::{Artist, Show};
use tapedeck_core::selector;
use tapedeck_core::setlist::SetlistClient;
use tapedeck_core::settings::Settings;
use tapedeck_core::tracks;

const USAGE: &str = "\
Usage: tapedeck [OPTIONS]

Options:
  --artist <NAME>   Artist to search (default: last used, else first configured)
  --date <MM-DD>    Day of the year (default: today)
  --any-artist      On \"no show found\", retry the other artists in random order
  --setlist         Also look up the setlist (needs an API key)
  --list-artists    Print the configured artists and exit
  -h, --help        Show this help";

#[derive(Debug, Default)]
struct Args {
    artist: Option<String>,
    date: Option<String>,
    any_artist: bool,
    setlist: bool,
    list_artists: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--artist" => {
                args.artist = Some(iter.next().context("--artist needs a value")?);
            }
            "--date" => {
                args.date = Some(iter.next().context("--date needs a value")?);
            }
            "--any-artist" => args.any_artist = true,
            "--setlist" => args.setlist = true,
            "--list-artists" => args.list_artists = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other => bail!("unknown argument: {}\n{}", other, USAGE),
        }
    }
    Ok(args)
}

/// Validate an `MM-DD` marker; leap-day friendly (year 2000 is a leap year).
fn day_marker(raw: &str) -> anyhow::Result<String> {
    let (month, day) = raw
        .split_once('-')
        .with_context(|| format!("date must be MM-DD, got {}", raw))?;
    let month: u32 = month.parse().with_context(|| format!("bad month in {}", raw))?;
    let day: u32 = day.parse().with_context(|| format!("bad day in {}", raw))?;
    if chrono::NaiveDate::from_ymd_opt(2000, month, day).is_none() {
        bail!("no such day of the year: {}", raw);
    }
    Ok(format!("{:02}-{:02}", month, day))
}

fn print_show(artist: &Artist, show: &Show) {
    let date = if show.date.is_empty() {
        "????"
    } else {
        show.date.as_str()
    };
    let tag = if show.is_random { " (random pick)" } else { "" };
    println!("{} — {}{}", artist.name, date, tag);
    if !show.title.is_empty() {
        println!("{}", show.title);
    }
    println!("[{}]", show.identifier);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = Config::load()?;
    let artist_list = artists::load_or_default();

    if args.list_artists {
        for artist in &artist_list {
            println!("{}  (collection: {})", artist.name, artist.collection_id);
        }
        return Ok(());
    }

    let settings_path = Settings::path();
    let mut settings = Settings::load(&settings_path);

    let marker = match &args.date {
        Some(raw) => day_marker(raw)?,
        None => chrono::Local::now().format("%m-%d").to_string(),
    };

    // --artist wins; otherwise continue with the last-used artist when it is
    // still configured, else the first in the list.
    let artist = match &args.artist {
        Some(name) => artist_list
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .with_context(|| format!("unknown artist: {} (try --list-artists)", name))?,
        None => artist_list
            .iter()
            .find(|a| a.name == settings.last_artist)
            .or_else(|| artist_list.first())
            .context("no artists configured")?,
    };

    let client = ArchiveClient::new(&config.archive.root, config.archive.timeout())?;
    let mut rng = rand::thread_rng();

    let mut picked = selector::select_show(&client, artist, &marker, &mut rng)
        .await?
        .map(|show| (artist.clone(), show));

    if picked.is_none() && args.any_artist {
        let others: Vec<Artist> = artist_list
            .iter()
            .filter(|a| a.name != artist.name)
            .cloned()
            .collect();
        picked = selector::select_show_any(&client, &others, &marker, &mut rng).await?;
    }

    let Some((artist, show)) = picked else {
        println!("No shows found for {}.", marker);
        return Ok(());
    };

    print_show(&artist, &show);

    let track_list = tracks::resolve_tracks(&client, &show).await?;
    if track_list.is_empty() {
        println!("No playable tracks in this show.");
    } else {
        println!();
        for (i, track) in track_list.iter().enumerate() {
            println!("{:3}. {}", i + 1, track.display_text());
            println!("     {}", track.url);
        }
    }

    if args.setlist {
        let api_key = if settings.setlist_api_key.is_empty() {
            config.setlist.api_key.clone()
        } else {
            settings.setlist_api_key.clone()
        };
        let setlists =
            SetlistClient::new(&config.setlist.root, &api_key, config.archive.timeout())?;
        match setlists.find_setlist(&artist, &show).await? {
            Some(setlist) => {
                println!();
                println!("{}", setlist.format());
            }
            None => println!("\nNo setlist available for this show."),
        }
    }

    settings.last_artist = artist.name.clone();
    settings.last_show = show.identifier.clone();
    if let Err(e) = settings.save(&settings_path) {
        warn!("failed to save settings: {:#}", e);
    }

    Ok(())
}
