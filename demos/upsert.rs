//! Writing to a dataset: upsert from CSV, then delete a row.
//!
//! Run with:
//!   SODA_APP_TOKEN=... SODA_EMAIL=... SODA_PASSWORD=... cargo run --example upsert

use socrata_soda::{Authentication, CsvConverter, Dataset, Payload, SodaClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let app_token = std::env::var("SODA_APP_TOKEN")?;
    let email = std::env::var("SODA_EMAIL")?;
    let password = std::env::var("SODA_PASSWORD")?;

    let auth = Authentication::new("opendata.socrata.com", app_token)
        .with_credentials(email, password);
    let client = SodaClient::new(auth)?;
    let dataset = Dataset::new(client, "pkfj-5jsd")?;

    // Upsert rows from a CSV file
    let converter = CsvConverter::from_file("jobs.csv")?;
    let result = dataset.upsert(Payload::from_converter(&converter)?).await?;
    println!(
        "created {}, updated {}, deleted {}",
        result["Rows Created"], result["Rows Updated"], result["Rows Deleted"]
    );

    // Upsert structured rows directly
    let rows = serde_json::json!([
        { "title": "Forester", "state": "AR", "date_posted": "2026-08-30" }
    ]);
    dataset.upsert(rows).await?;

    // Delete a single row by its identifier
    dataset.delete_row("416").await?;
    println!("row 416 deleted");

    Ok(())
}
