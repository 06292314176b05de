//! Fragment-assembly tests against a real `QueryBuilder`.
//!
//! No database connection is needed: the builder's SQL text and bind
//! placeholders are inspected before the query would be executed.

use sqlx::{Postgres, QueryBuilder};
use zarfdb::predicate::{self, CompareOp, MatchVersion};
use zarfdb::schema::Schema;
use zarfdb_sqlx::QueryBuilderExt;

fn users_schema() -> Schema {
    Schema::new().with_table("users", ["email_encrypted", "age_encrypted"])
}

#[test]
fn test_match_v1_fragment_binds_payload() {
    let schema = users_schema();
    let users = schema.table("users").expect("Failed to resolve table");

    let mut builder: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("SELECT email_encrypted FROM users WHERE ");
    builder
        .push_match_v1(users, "email_encrypted", "a@b.com")
        .expect("Failed to push predicate");

    assert_eq!(
        builder.sql(),
        "SELECT email_encrypted FROM users WHERE \
         cs_match_v1(\"email_encrypted\") @> cs_match_v1($1)"
    );
}

#[test]
fn test_v1_and_v2_fragments_differ_only_in_function_name() {
    let schema = users_schema();
    let users = schema.table("users").expect("Failed to resolve table");

    let mut v1: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
    v1.push_match_v1(users, "email_encrypted", "a@b.com").unwrap();

    let mut v2: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
    v2.push_match_v2(users, "email_encrypted", "a@b.com").unwrap();

    assert_eq!(v1.sql().replace("cs_match_v1", "cs_match_v2"), v2.sql());
}

#[test]
fn test_bind_placeholders_are_numbered_across_predicates() {
    let schema = users_schema();
    let users = schema.table("users").expect("Failed to resolve table");

    let mut builder: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("SELECT * FROM users WHERE ");
    builder
        .push_match_v1(users, "email_encrypted", "a@b.com")
        .unwrap()
        .push(" AND ");
    builder
        .push_compare(CompareOp::Gte, users, "age_encrypted", &21_i64)
        .unwrap();

    assert_eq!(
        builder.sql(),
        "SELECT * FROM users WHERE \
         cs_match_v1(\"email_encrypted\") @> cs_match_v1($1) AND \
         cs_ore_64_8_v1(\"age_encrypted\") >= cs_ore_64_8_v1($2)"
    );
}

#[test]
fn test_push_exact_fragment() {
    let schema = users_schema();
    let users = schema.table("users").expect("Failed to resolve table");

    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
    builder
        .push_exact(users, "email_encrypted", &"a@b.com".to_string())
        .unwrap();

    assert_eq!(
        builder.sql(),
        "cs_unique_v1(\"email_encrypted\") = cs_unique_v1($1)"
    );
}

#[test]
fn test_push_prebuilt_predicate() {
    let schema = users_schema();
    let users = schema.table("users").expect("Failed to resolve table");

    let predicate =
        predicate::match_predicate(MatchVersion::V2, users, "email_encrypted", "alice")
            .expect("Failed to build predicate");

    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
    builder.push_predicate(&predicate);

    assert_eq!(
        builder.sql(),
        "cs_match_v2(\"email_encrypted\") @> cs_match_v2($1)"
    );
}

#[test]
fn test_unresolved_column_leaves_builder_untouched() {
    let schema = users_schema();
    let users = schema.table("users").expect("Failed to resolve table");

    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1 WHERE ");
    let result = builder.push_match_v1(users, "phone_encrypted", "555");

    assert!(result.is_err());
    assert_eq!(builder.sql(), "SELECT 1 WHERE ");
}
