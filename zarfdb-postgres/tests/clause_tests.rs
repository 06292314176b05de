//! Clause-rendering tests for the positional-parameter builders.

use zarfdb::predicate::{CompareOp, MatchVersion};
use zarfdb::schema::Schema;
use zarfdb_postgres::{match_clause, match_v1, match_v2, ClientError};

fn users_schema() -> Schema {
    Schema::new().with_table("users", ["email_encrypted", "age_encrypted"])
}

#[test]
fn test_match_v1_clause_references_parameter_index() {
    let schema = users_schema();
    let users = schema.table("users").expect("Failed to resolve table");

    let clause = match_v1(users, "email_encrypted", "a@b.com", 1).expect("Failed to build clause");
    assert_eq!(
        clause.sql(),
        "cs_match_v1(\"email_encrypted\") @> cs_match_v1($1)"
    );
}

#[test]
fn test_clause_uses_caller_chosen_index() {
    let schema = users_schema();
    let users = schema.table("users").expect("Failed to resolve table");

    let clause = match_v2(users, "email_encrypted", "a@b.com", 3).expect("Failed to build clause");
    assert_eq!(
        clause.sql(),
        "cs_match_v2(\"email_encrypted\") @> cs_match_v2($3)"
    );
}

#[test]
fn test_versions_share_clause_assembly() {
    let schema = users_schema();
    let users = schema.table("users").expect("Failed to resolve table");

    let v1 = match_clause(MatchVersion::V1, users, "email_encrypted", "a@b.com", 1).unwrap();
    let v2 = match_clause(MatchVersion::V2, users, "email_encrypted", "a@b.com", 1).unwrap();

    assert_eq!(v1.sql().replace("cs_match_v1", "cs_match_v2"), v2.sql());
}

#[test]
fn test_compare_clause_shape() {
    let schema = users_schema();
    let users = schema.table("users").expect("Failed to resolve table");

    let clause =
        zarfdb_postgres::compare(CompareOp::Lt, users, "age_encrypted", &65_i64, 2).unwrap();
    assert_eq!(
        clause.sql(),
        "cs_ore_64_8_v1(\"age_encrypted\") < cs_ore_64_8_v1($2)"
    );
}

#[test]
fn test_unresolved_column_is_payload_error() {
    let schema = users_schema();
    let users = schema.table("users").expect("Failed to resolve table");

    let result = match_v1(users, "phone_encrypted", "555", 1);
    assert!(matches!(result, Err(ClientError::Payload(_))));
}
