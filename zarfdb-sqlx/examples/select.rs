//! Selects all users and prints the proxy-decrypted emails.
//!
//! Rows come back as plaintext-kind envelopes because the proxy decrypts on
//! the way out; every read still goes through the kind-checked accessor.
//!
//! Usage: `cargo run --example select`

use sqlx::postgres::PgPoolOptions;
use zarfdb_sqlx::Encrypted;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    let rows: Vec<Encrypted> = sqlx::query_scalar("SELECT email_encrypted FROM users")
        .fetch_all(&pool)
        .await?;

    let emails: Vec<&str> = rows.iter().filter_map(|row| row.plaintext()).collect();

    println!("All emails have been decrypted by the proxy");
    println!("Emails: {emails:#?}");

    Ok(())
}
