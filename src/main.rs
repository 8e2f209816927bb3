use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use leasy::booking::{self, SystemClock};
use leasy::config::{self, ResolvedConfig, DEFAULT_CONFIG_FILE};
use leasy::geocoding::{Geocoder, NominatimGeocoder};
use leasy::models::{GeoPoint, Item, ItemId, ItemType, UserId};
use leasy::rental::{NewListing, RentalService};
use leasy::store::{InMemoryItemStore, ItemQuery};

#[derive(Parser)]
#[command(name = "leasy", about = "Rent things from your neighbours")]
struct Args {
    /// Config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Item data file (overrides config and LEASY_DATA_FILE)
    #[arg(long)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List items
    List {
        /// Only items listed by this user
        #[arg(long)]
        owner: Option<UserId>,
        /// Item type tag, e.g. power-tool
        #[arg(long = "type")]
        item_type: Option<ItemType>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        search: Option<String>,
        /// Hide rented items
        #[arg(long)]
        available: bool,
    },
    /// List a new item
    Add {
        #[arg(long)]
        owner: UserId,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Price per day
        #[arg(long)]
        price: String,
        #[arg(long = "type", default_value = "other")]
        item_type: ItemType,
        #[arg(long)]
        photo: Option<String>,
        /// Address to geocode as the item location
        #[arg(long)]
        address: Option<String>,
    },
    /// Items around a point or address
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        #[arg(long)]
        address: Option<String>,
        /// Search radius in km, snapped like the map slider
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Rent an item from START up to END (YYYY-MM-DD)
    Book {
        item: ItemId,
        #[arg(long)]
        user: UserId,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    /// End the current rental of an item
    Cancel {
        item: ItemId,
        #[arg(long)]
        user: UserId,
    },
    /// Remove a listing
    Delete {
        item: ItemId,
        #[arg(long)]
        user: UserId,
    },
    /// Price for a date range, without booking
    Quote {
        item: ItemId,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    /// Resolve an address to coordinates
    Geocode { address: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let file_config = config::load_config(&args.config).context("Failed to load config")?;
    let settings = config::resolve(&file_config, args.data.as_deref());

    let store = InMemoryItemStore::load_json(&settings.data_file)
        .await
        .context("Failed to load item data")?;
    let service = RentalService::new(store, SystemClock);

    match args.command {
        Command::List {
            owner,
            item_type,
            max_price,
            search,
            available,
        } => {
            let query = ItemQuery {
                owner,
                item_type,
                max_price,
                text: search,
                available_only: available,
            };
            let items = service.listings(&query).await?;
            info!("Found {} items", items.len());
            for (i, item) in items.iter().enumerate() {
                print_item(i + 1, item);
            }
        }
        Command::Add {
            owner,
            title,
            description,
            price,
            item_type,
            photo,
            address,
        } => {
            let location = match address {
                Some(address) => Some(geocode(&settings, &address).await?),
                None => None,
            };
            let item = service
                .create_listing(
                    &owner,
                    NewListing {
                        title,
                        description,
                        price,
                        photo,
                        location,
                        item_type,
                    },
                )
                .await?;
            service.store().save_json(&settings.data_file).await?;
            println!("Listed {} as {}", item.title, item.id);
        }
        Command::Nearby {
            lat,
            lon,
            address,
            radius,
        } => {
            let center = match (lat, lon, address) {
                (Some(lat), Some(lon), _) => GeoPoint::new(lat, lon)?,
                (_, _, Some(address)) => geocode(&settings, &address).await?,
                _ => anyhow::bail!("give either --lat and --lon, or --address"),
            };
            let view = service
                .nearby(center, radius.unwrap_or(settings.default_radius_km))
                .await?;
            println!(
                "{} items within {} km (zoom {})",
                view.markers.len(),
                view.radius_km,
                view.zoom
            );
            for marker in &view.markers {
                println!(
                    "  {:>6.2} km  {} [{}]",
                    marker.distance_km, marker.title, marker.item_id
                );
            }
        }
        Command::Book {
            item,
            user,
            from,
            to,
        } => {
            let outcome = service.book(&item, from, to, &user).await?;
            service.store().save_json(&settings.data_file).await?;
            println!(
                "Booked {} for {} days, total €{:.2}",
                item, outcome.days, outcome.total_price
            );
        }
        Command::Cancel { item, user } => {
            service.cancel(&item, &user).await?;
            service.store().save_json(&settings.data_file).await?;
            println!("Rental of {} cancelled", item);
        }
        Command::Delete { item, user } => {
            service.delete(&item, &user).await?;
            service.store().save_json(&settings.data_file).await?;
            println!("Deleted {}", item);
        }
        Command::Quote { item, from, to } => {
            let item = service.item(&item).await?;
            let total = booking::quote(item.price(), from, to);
            println!("{}: €{:.2}/day, total €{:.2}", item.title, item.price(), total);
        }
        Command::Geocode { address } => {
            let point = geocode(&settings, &address).await?;
            println!("{}, {}", point.latitude(), point.longitude());
        }
    }

    Ok(())
}

async fn geocode(settings: &ResolvedConfig, address: &str) -> Result<GeoPoint> {
    let geocoder = NominatimGeocoder::with_settings(
        settings.nominatim_url.as_str(),
        &settings.user_agent,
        settings.geocoder_timeout,
    )?;
    geocoder
        .geocode(address)
        .await?
        .with_context(|| format!("No coordinates found for {address:?}"))
}

fn print_item(n: usize, item: &Item) {
    println!("{}. {} (€{:.2} /per dag)", n, item.title, item.price());
    println!("   Type: {}", item.item_type);
    if !item.description.is_empty() {
        println!("   {}", item.description);
    }
    match item.rental() {
        Some(rental) => println!("   Rented by {} until {}", rental.renter, rental.end),
        None => println!("   Available"),
    }
    println!("   ID: {}", item.id);
    println!();
}
