//! Integration tests for the schema comparator.
//!
//! These tests build v1 and v2 snapshots of a small application schema
//! through the editors, diff them, and verify the resulting diff shape
//! end to end, including serialization of the computed diff.

use sqldelta_core::{
    Column, ColumnType, Comparator, ComparatorConfig, ForeignKeyConstraint, Index, IndexedColumn,
    OptionallyQualifiedName, PrimaryKeyChange, PrimaryKeyConstraint, ReferentialAction, Schema,
    SchemaDiff, Sequence, Table, UnqualifiedName, Value, View,
};

fn name(value: &str) -> UnqualifiedName {
    UnqualifiedName::unquoted(value).unwrap()
}

fn qualified(value: &str) -> OptionallyQualifiedName {
    OptionallyQualifiedName::unquoted(value, None).unwrap()
}

fn id_column() -> Column {
    Column::editor()
        .set_name(name("id"))
        .set_type(ColumnType::BigInt)
        .set_autoincrement(true)
        .create()
        .unwrap()
}

fn varchar(column_name: &str, length: u32) -> Column {
    Column::editor()
        .set_name(name(column_name))
        .set_type(ColumnType::String)
        .set_length(Some(length))
        .create()
        .unwrap()
}

fn primary_key() -> PrimaryKeyConstraint {
    PrimaryKeyConstraint::editor()
        .set_column_names(vec![name("id")])
        .create()
        .unwrap()
}

fn users_v1() -> Table {
    Table::editor()
        .set_name(qualified("users"))
        .add_column(id_column())
        .add_column(varchar("email", 255))
        .add_column(varchar("nickname", 64))
        .set_primary_key_constraint(Some(primary_key()))
        .add_index(
            Index::editor()
                .set_name(name("idx_users_email"))
                .set_columns(vec![IndexedColumn::new(name("email"), None)])
                .set_unique(true)
                .create()
                .unwrap(),
        )
        .create()
        .unwrap()
}

fn users_v2() -> Table {
    // nickname becomes display_name (same shape), the unique email index is
    // renamed, and a status column with a default appears.
    Table::editor()
        .set_name(qualified("users"))
        .add_column(id_column())
        .add_column(varchar("email", 255))
        .add_column(varchar("display_name", 64))
        .add_column(
            Column::editor()
                .set_name(name("status"))
                .set_type(ColumnType::String)
                .set_length(Some(16))
                .set_default(Some(Value::Text("active".into())))
                .create()
                .unwrap(),
        )
        .set_primary_key_constraint(Some(primary_key()))
        .add_index(
            Index::editor()
                .set_name(name("uniq_users_email"))
                .set_columns(vec![IndexedColumn::new(name("email"), None)])
                .set_unique(true)
                .create()
                .unwrap(),
        )
        .create()
        .unwrap()
}

fn posts(author_fk_name: &str) -> Table {
    Table::editor()
        .set_name(qualified("posts"))
        .add_column(id_column())
        .add_column(
            Column::editor()
                .set_name(name("author_id"))
                .set_type(ColumnType::BigInt)
                .create()
                .unwrap(),
        )
        .set_primary_key_constraint(Some(primary_key()))
        .add_foreign_key_constraint(
            ForeignKeyConstraint::editor()
                .set_name(Some(name(author_fk_name)))
                .set_referencing_column_names(vec![name("author_id")])
                .set_referenced_table_name(qualified("users"))
                .set_referenced_column_names(vec![name("id")])
                .set_on_delete_action(ReferentialAction::Cascade)
                .create()
                .unwrap(),
        )
        .create()
        .unwrap()
}

fn schema_v1() -> Schema {
    Schema::editor()
        .add_table(users_v1())
        .add_table(posts("fk_posts_author"))
        .add_table(
            Table::editor()
                .set_name(qualified("audit_log"))
                .add_column(id_column())
                .create()
                .unwrap(),
        )
        .add_sequence(
            Sequence::editor()
                .set_name(qualified("invoice_seq"))
                .create()
                .unwrap(),
        )
        .add_view(View::new(
            qualified("active_users"),
            "SELECT id FROM users",
        ))
        .create()
        .unwrap()
}

fn schema_v2() -> Schema {
    Schema::editor()
        .add_table(users_v2())
        // The FK keeps its structure under a new name; that must not
        // register as a change.
        .add_table(posts("fk_posts_users"))
        .add_table(
            Table::editor()
                .set_name(qualified("sessions"))
                .add_column(id_column())
                .create()
                .unwrap(),
        )
        .add_sequence(
            Sequence::editor()
                .set_name(qualified("invoice_seq"))
                .set_allocation_size(50)
                .create()
                .unwrap(),
        )
        .add_view(View::new(
            qualified("active_users"),
            "SELECT id FROM users WHERE status = 'active'",
        ))
        .create()
        .unwrap()
}

#[test]
fn full_schema_evolution_diff() {
    let diff = Comparator::new().compare_schemas(&schema_v1(), &schema_v2());
    assert!(!diff.is_empty());

    // Tables: sessions appears, audit_log goes away, users changes, posts
    // does not (its only difference is a foreign key name).
    assert_eq!(diff.created_tables.len(), 1);
    assert_eq!(diff.created_tables[0].name().name().value(), "sessions");
    assert_eq!(diff.dropped_tables.len(), 1);
    assert_eq!(diff.dropped_tables[0].name().name().value(), "audit_log");
    assert_eq!(diff.altered_tables.len(), 1);

    let users = &diff.altered_tables[0];
    assert_eq!(users.table.name().name().value(), "users");

    // nickname -> display_name is an unambiguous rename.
    assert_eq!(users.renamed_columns.len(), 1);
    assert_eq!(
        users
            .renamed_columns
            .get("nickname")
            .unwrap()
            .name()
            .identifier()
            .value(),
        "display_name"
    );
    assert!(users.dropped_columns.is_empty());

    // status is genuinely new.
    assert_eq!(users.added_columns.len(), 1);
    assert_eq!(
        users.added_columns[0].name().identifier().value(),
        "status"
    );

    // The unique email index was renamed, not rebuilt.
    assert_eq!(users.renamed_indexes.len(), 1);
    assert!(users.added_indexes.is_empty());
    assert!(users.dropped_indexes.is_empty());

    // The primary key did not change.
    assert!(users.primary_key_change.is_none());

    // Sequences: allocation size changed.
    assert_eq!(diff.altered_sequences.len(), 1);
    assert_eq!(diff.altered_sequences[0].allocation_size(), 50);

    // Views: the defining query changed, reported as drop plus create.
    assert_eq!(diff.dropped_views.len(), 1);
    assert_eq!(diff.created_views.len(), 1);
}

#[test]
fn evolution_diff_is_idempotent_per_side() {
    let comparator = Comparator::new();
    assert!(comparator
        .compare_schemas(&schema_v1(), &schema_v1())
        .is_empty());
    assert!(comparator
        .compare_schemas(&schema_v2(), &schema_v2())
        .is_empty());
}

#[test]
fn rename_detection_disabled_reports_adds_and_drops() {
    let comparator = Comparator::new().with_config(
        ComparatorConfig::new()
            .with_detect_renamed_columns(false)
            .with_detect_renamed_indexes(false),
    );
    let diff = comparator.compare_schemas(&schema_v1(), &schema_v2());
    let users = diff
        .altered_tables
        .iter()
        .find(|t| t.table.name().name().value() == "users")
        .unwrap();

    assert!(users.renamed_columns.is_empty());
    assert_eq!(users.added_columns.len(), 2);
    assert_eq!(users.dropped_columns.len(), 1);
    assert!(users.renamed_indexes.is_empty());
    assert_eq!(users.added_indexes.len(), 1);
    assert_eq!(users.dropped_indexes.len(), 1);
}

#[test]
fn computed_diff_round_trips_through_serde() {
    let diff = Comparator::new().compare_schemas(&schema_v1(), &schema_v2());
    let json = serde_json::to_string_pretty(&diff).unwrap();
    let restored: SchemaDiff = serde_json::from_str(&json).unwrap();
    assert_eq!(diff, restored);
}

#[test]
fn primary_key_removal_shows_up_in_the_table_diff() {
    let with_pk = users_v1();
    let without_pk = with_pk
        .edit()
        .set_primary_key_constraint(None)
        .create()
        .unwrap();

    let diff = Comparator::new().compare_tables(&with_pk, &without_pk);
    assert!(matches!(
        diff.primary_key_change,
        Some(PrimaryKeyChange::Dropped(_))
    ));
}
