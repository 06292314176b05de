//! Inserts a user with an encrypted email through the proxy.
//!
//! The proxy encrypts the envelope on the way to the database; this process
//! only ever handles the plaintext-kind payload.
//!
//! Usage: `cargo run --example insert -- --email alice@example.com`

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use zarfdb::envelope::Envelope;
use zarfdb::schema::Schema;

#[derive(Parser)]
struct Args {
    /// Email address to store, both plain and encrypted
    #[arg(long)]
    email: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    let schema = Schema::new().with_table("users", ["email_encrypted"]);
    let users = schema.table("users")?;

    let envelope = Envelope::from_plaintext(
        args.email.clone(),
        users.identifier("email_encrypted")?,
    );

    sqlx::query("INSERT INTO users (email, email_encrypted) VALUES ($1, $2)")
        .bind(&args.email)
        .bind(Json(envelope))
        .execute(&pool)
        .await?;

    println!(
        "Inserted a new user with an encrypted email from the plaintext {}",
        args.email
    );

    Ok(())
}
