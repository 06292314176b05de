//! Runs a match query over an encrypted column through the proxy.
//!
//! Usage: `cargo run --example match_search -- --term alice`

use clap::Parser;
use tokio_postgres::types::Json;
use zarfdb::envelope::Envelope;
use zarfdb::schema::Schema;
use zarfdb_postgres::{connect, match_v1, DatabaseConfig};

#[derive(Parser)]
struct Args {
    /// Search term matched against the encrypted email column
    #[arg(long)]
    term: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let config = DatabaseConfig::from_env()?;
    let client = connect(&config).await?;

    let schema = Schema::new().with_table("users", ["email_encrypted"]);
    let users = schema.table("users")?;

    let clause = match_v1(users, "email_encrypted", &args.term, 1)?;
    let statement = format!("SELECT email_encrypted FROM users WHERE {}", clause.sql());

    let rows = client.query(&statement, &[clause.param()]).await?;

    println!("Found {} matching user(s)", rows.len());
    for row in rows {
        let Json(envelope): Json<Envelope> = row.get(0);
        if let Some(email) = envelope.plaintext() {
            println!("  {email}");
        }
    }

    Ok(())
}
