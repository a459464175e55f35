use anyhow::Result;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use roadtrip_core::{Config, DomainError, ShecodesClient, TripRequest, WeatherReading, resolve_api_key};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "roadtrip", version, about = "Road-trip planner CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the SheCodes API key in the local secrets file.
    Configure,

    /// Show current weather for a single city.
    Weather {
        /// City name, e.g. "Durban".
        city: String,
    },

    /// Plan a road trip: weather for both cities plus a day-by-day itinerary.
    Plan {
        /// Start city (origin).
        origin: String,

        /// Destination city.
        destination: String,

        /// Trip length in days.
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=60))]
        days: u32,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let outcome = match self.command {
            Command::Configure => configure(),
            Command::Weather { city } => {
                let city = city.trim().to_string();
                if city.is_empty() {
                    eprintln!("Please enter a city name.");
                    std::process::exit(2);
                }
                show_weather(&city).await
            }
            Command::Plan { origin, destination, days } => {
                let origin = origin.trim().to_string();
                let destination = destination.trim().to_string();
                if origin.is_empty() || destination.is_empty() {
                    eprintln!("Please enter both origin and destination.");
                    std::process::exit(2);
                }
                plan(&origin, &destination, days).await
            }
        };

        if let Err(err) = outcome {
            // API failures carry a display-ready message; anything else is a
            // surprise and says so.
            match err.downcast_ref::<DomainError>() {
                Some(domain) => eprintln!("{domain}"),
                None => eprintln!("Unexpected error: {err}"),
            }
            std::process::exit(1);
        }

        Ok(())
    }
}

fn configure() -> Result<()> {
    let api_key = inquire::Password::new("SheCodes API key:").without_confirmation().prompt()?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        eprintln!("No key entered; nothing saved.");
        std::process::exit(2);
    }

    let mut cfg = Config::load().unwrap_or_default();
    cfg.set_api_key(api_key);
    cfg.save()?;

    println!("API key saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show_weather(city: &str) -> Result<()> {
    let client = ShecodesClient::new(resolve_api_key()?);
    let reading = client.current_weather(city).await?;

    print_weather_card("City", city, &reading);
    Ok(())
}

async fn plan(origin: &str, destination: &str, days: u32) -> Result<()> {
    println!("Gathering sunshine, checking skies, and plotting delight...");

    // One credential resolution per submission; both calls share it.
    let client = ShecodesClient::new(resolve_api_key()?);

    let (weather_origin, weather_destination) =
        tokio::try_join!(client.current_weather(origin), client.current_weather(destination))?;

    println!("Weather checked! Now crafting your itinerary...");

    let request = TripRequest {
        origin: origin.to_string(),
        destination: destination.to_string(),
        duration_days: days,
    };
    let itinerary = client.generate_itinerary(&request).await?;

    println!();
    println!("Quick weather peek");
    println!();
    print_weather_card("Origin", origin, &weather_origin);
    println!();
    print_weather_card("Destination", destination, &weather_destination);

    println!();
    println!("Your road trip plan");
    println!();
    println!("{itinerary}");
    println!();
    println!("Psst... prices are estimates in ZAR and activities are suggestions - make it yours!");

    let year = chrono::Utc::now().year();
    println!("© {year} Built with love for travelers 🚗🗺");

    Ok(())
}

fn print_weather_card(label: &str, city: &str, reading: &WeatherReading) {
    println!("{label}: {}", title_case(city));
    println!("  🌡️  {}°C", reading.temperature_c);
    println!("  🌤️  {}", title_case(&reading.condition));
}

/// Uppercase the first letter of every word, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }

    out
}
