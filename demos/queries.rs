//! SoQL query examples against a public Socrata dataset.
//!
//! Run with:
//!   SODA_APP_TOKEN=... cargo run --example queries

use socrata_soda::{Authentication, Dataset, OrderDirection, SodaClient, SoqlQuery};
use serde::Deserialize;

/// A row from the USGS earthquakes demo dataset.
#[derive(Debug, Deserialize)]
struct Earthquake {
    region: String,
    magnitude: String,
    source: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let app_token = std::env::var("SODA_APP_TOKEN").unwrap_or_default();
    let auth = Authentication::new("soda.demo.socrata.com", app_token);
    let client = SodaClient::new(auth)?;
    let earthquakes = Dataset::new(client, "4tka-6guv")?;

    // Dynamic JSON rows
    let query = SoqlQuery::new()
        .where_clause("source = 'pr'")
        .limit(5)?;
    let rows: Vec<serde_json::Value> = earthquakes.get_data(query).await?;
    println!("Puerto Rico earthquakes: {}", rows.len());
    for row in &rows {
        println!("  {} (magnitude {})", row["region"], row["magnitude"]);
    }

    // Typed rows
    let query = SoqlQuery::new()
        .select(&["region", "magnitude", "source"])
        .where_clause("magnitude > 4.0")
        .order("magnitude", OrderDirection::Descending)
        .limit(10)?;
    let strongest: Vec<Earthquake> = earthquakes.get_data(query).await?;
    for quake in &strongest {
        println!("{} {} ({})", quake.magnitude, quake.region, quake.source);
    }

    // Aggregation
    let query = SoqlQuery::new()
        .select(&["region", "MAX(magnitude)"])
        .group("region")
        .limit(20)?;
    let by_region: Vec<serde_json::Value> = earthquakes.get_data(query).await?;
    println!("{} regions", by_region.len());

    println!("API version: {}", earthquakes.api_version().await?);

    Ok(())
}
