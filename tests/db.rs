use diesel::prelude::*;
use diesel::sql_types::Text;

mod common;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}

#[test]
fn test_pool_hands_out_wal_connections() {
    let test_db = common::TestDb::new("test_pool_connection.db");
    let mut conn = test_db.pool().get().expect("get connection");

    let mode: JournalMode = diesel::sql_query("PRAGMA journal_mode")
        .get_result(&mut conn)
        .expect("read journal mode");

    assert_eq!(mode.journal_mode.to_lowercase(), "wal");
}

#[test]
fn test_stage_check_constraint_is_enforced() {
    let test_db = common::TestDb::new("test_stage_check.db");
    let mut conn = test_db.pool().get().expect("get connection");

    let result = diesel::sql_query(
        "INSERT INTO leads (id, name, email, company, stage, engaged, initials) \
         VALUES (1, 'A', 'a@b.c', 'C', 9, 0, 'A')",
    )
    .execute(&mut conn);

    assert!(result.is_err());
}
