use flatwatch::domain::notification::NewNotification;
use flatwatch::repository::{DieselRepository, NotificationWriter};

mod common;

#[test]
fn test_migrated_database_accepts_connections() {
    let test_db = common::TestDb::new("test_migrated_database.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}

#[test]
fn test_foreign_keys_are_enforced() {
    let test_db = common::TestDb::new("test_foreign_keys.db");
    let repo = DieselRepository::new(test_db.pool());

    // Neither user 999 nor apartment 999 exists.
    let result = repo.create_notification(&NewNotification::new(999, 999));
    assert!(result.is_err());
}
