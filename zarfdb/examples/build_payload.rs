//! Example demonstrating envelope construction and predicate assembly.
//!
//! Everything here is a pure transformation; no database connection is
//! needed. The resulting payloads are exactly what the sqlx and
//! tokio-postgres adapters send through the proxy.

use zarfdb::envelope::Envelope;
use zarfdb::predicate::{self, CompareOp};
use zarfdb::schema::Schema;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("ZarfDB Payload Construction Example");
    println!("===================================\n");

    // Register the tables that carry encrypted columns
    let schema = Schema::new().with_table("users", ["email_encrypted", "age_encrypted"]);
    let users = schema.table("users")?;
    println!("✓ Schema registered for table: {}", users.name());

    // Example 1: Building an envelope for a write
    println!("\nExample 1: Envelope for an INSERT");
    println!("---------------------------------");
    let envelope = Envelope::from_plaintext(
        "alice@example.com",
        users.identifier("email_encrypted")?,
    );
    println!("Wire payload: {}", envelope.to_json()?);
    println!("Plaintext accessor: {:?}", envelope.plaintext());
    println!("Ciphertext accessor: {:?}", envelope.ciphertext());

    // Example 2: What comes back after the proxy rewrite
    println!("\nExample 2: Reading a stored value");
    println!("---------------------------------");
    let stored = Envelope::from_json(
        r#"{"v":1,"s":1,"k":"ct","c":"mBbKmsMMkbKBSN","i":{"t":"users","c":"email_encrypted"}}"#,
    )?;
    println!("Plaintext accessor on ciphertext kind: {:?}", stored.plaintext());
    println!("→ Wrong-kind reads are absence, never an error");

    // Example 3: Match predicates for both protocol versions
    println!("\nExample 3: Match predicates");
    println!("---------------------------");
    let v1 = predicate::match_v1(users, "email_encrypted", "alice")?;
    let v2 = predicate::match_v2(users, "email_encrypted", "alice")?;
    println!("v1 fragment: {}", v1.to_sql("\"email_encrypted\"", "$1"));
    println!("v2 fragment: {}", v2.to_sql("\"email_encrypted\"", "$1"));
    println!("→ The versions differ only in the database-side function name");

    // Example 4: Typed comparison over an order-revealing index
    println!("\nExample 4: Order comparison");
    println!("---------------------------");
    let older_than_30 = predicate::compare(CompareOp::Gt, users, "age_encrypted", &30_i64)?;
    println!("Fragment: {}", older_than_30.to_sql("\"age_encrypted\"", "$1"));
    println!("Bound payload: {}", older_than_30.payload()?);

    // Example 5: Configuration errors propagate
    println!("\nExample 5: Unresolved references");
    println!("--------------------------------");
    match predicate::match_v1(users, "phone_encrypted", "555") {
        Ok(_) => println!("✗ Unexpected success"),
        Err(e) => println!("✓ Rejected as expected: {e}"),
    }

    println!("\n✓ All examples completed successfully!");

    Ok(())
}
