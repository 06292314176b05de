//! `ZarfDB` demo CLI: insert, list, and search encrypted values through the
//! proxy.

#![warn(clippy::pedantic, clippy::nursery)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use zarfdb::envelope::Envelope;
use zarfdb::predicate::MatchVersion;
use zarfdb::schema::{Schema, Table};
use zarfdb_sqlx::{Encrypted, QueryBuilderExt};

#[derive(Parser)]
#[command(name = "zarfdb")]
#[command(about = "ZarfDB encryption proxy demo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert a user with an encrypted email
    Insert {
        /// Email address to store
        #[arg(long)]
        email: String,
    },
    /// List all users with proxy-decrypted emails
    Select,
    /// Search users by encrypted-email match
    Search {
        /// Search term
        #[arg(long)]
        term: String,
        /// Matching protocol version
        #[arg(long, default_value_t = 1)]
        protocol: u8,
    },
}

fn demo_schema() -> Schema {
    Schema::new().with_table("users", ["email_encrypted"])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("Failed to connect to the proxy")?;

    let schema = demo_schema();
    let users = schema.table("users")?;

    match cli.command {
        Commands::Insert { email } => insert(&pool, users, &email).await,
        Commands::Select => select(&pool).await,
        Commands::Search { term, protocol } => search(&pool, users, &term, protocol).await,
    }
}

async fn insert(pool: &PgPool, users: &Table, email: &str) -> anyhow::Result<()> {
    let envelope = Envelope::from_plaintext(email, users.identifier("email_encrypted")?);

    sqlx::query("INSERT INTO users (email, email_encrypted) VALUES ($1, $2)")
        .bind(email)
        .bind(Json(envelope))
        .execute(pool)
        .await
        .context("Failed to insert user")?;

    info!(email, "inserted user");
    println!("Inserted a new user with an encrypted email from the plaintext {email}");

    Ok(())
}

async fn select(pool: &PgPool) -> anyhow::Result<()> {
    let rows: Vec<Encrypted> = sqlx::query_scalar("SELECT email_encrypted FROM users")
        .fetch_all(pool)
        .await
        .context("Failed to fetch users")?;

    let emails: Vec<&str> = rows.iter().filter_map(|row| row.plaintext()).collect();

    println!("All emails have been decrypted by the proxy");
    println!("Emails: {emails:#?}");

    Ok(())
}

async fn search(pool: &PgPool, users: &Table, term: &str, protocol: u8) -> anyhow::Result<()> {
    let version = match protocol {
        1 => MatchVersion::V1,
        2 => MatchVersion::V2,
        other => anyhow::bail!("unsupported matching protocol version: {other}"),
    };

    let mut builder: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("SELECT email_encrypted FROM users WHERE ");
    builder.push_match(version, users, "email_encrypted", term)?;

    info!(sql = builder.sql(), "running match query");

    let rows: Vec<Encrypted> = builder
        .build_query_scalar()
        .fetch_all(pool)
        .await
        .context("Failed to run match query")?;

    println!("Found {} matching user(s)", rows.len());
    for row in &rows {
        if let Some(email) = row.plaintext() {
            println!("  {email}");
        }
    }

    Ok(())
}
