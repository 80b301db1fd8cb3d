use meerab_core::db::open_db_in_memory;
use meerab_core::{
    FieldsError, ResultFields, ResultService, ServiceError, SqliteResultRepository,
};
use rusqlite::{params, Connection};
use serde_json::json;

fn result_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM results;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn created_result_is_found_by_key() {
    let conn = open_db_in_memory().unwrap();
    let service = ResultService::new(SqliteResultRepository::new(&conn));

    let mut fields = ResultFields::new("101", "Final2024");
    fields.student_name = Some("Rahim Uddin".to_string());
    fields.gpa = Some("5.00".to_string());
    fields.marks = vec![json!({"subject": "Math", "mark": 95})];
    let created = service.create_result(fields).unwrap();

    let found = service.search_result("101", "Final2024").unwrap().unwrap();
    assert_eq!(found, created);
    assert_eq!(found.fields.gpa.as_deref(), Some("5.00"));
    assert_eq!(found.fields.marks, vec![json!({"subject": "Math", "mark": 95})]);
}

#[test]
fn unknown_key_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let service = ResultService::new(SqliteResultRepository::new(&conn));
    service.create_result(ResultFields::new("101", "Final2024")).unwrap();

    assert!(service.search_result("102", "Final2024").unwrap().is_none());
    assert!(service.search_result("101", "Final2023").unwrap().is_none());
}

#[test]
fn search_is_case_sensitive_and_exact() {
    let conn = open_db_in_memory().unwrap();
    let service = ResultService::new(SqliteResultRepository::new(&conn));
    service.create_result(ResultFields::new("A1", "Final2024")).unwrap();

    assert!(service.search_result("a1", "Final2024").unwrap().is_none());
    assert!(service.search_result("A1", "final2024").unwrap().is_none());
    assert!(service.search_result(" A1", "Final2024").unwrap().is_none());
}

#[test]
fn repeated_search_is_stable() {
    let conn = open_db_in_memory().unwrap();
    let service = ResultService::new(SqliteResultRepository::new(&conn));
    service.create_result(ResultFields::new("7", "Midterm")).unwrap();

    let first = service.search_result("7", "Midterm").unwrap();
    let second = service.search_result("7", "Midterm").unwrap();
    assert_eq!(first, second);
    assert_eq!(result_count(&conn), 1);
}

#[test]
fn duplicate_keys_resolve_to_newest_record() {
    let conn = open_db_in_memory().unwrap();
    let service = ResultService::new(SqliteResultRepository::new(&conn));

    let older = service.create_result(ResultFields::new("9", "Final")).unwrap();
    let newer = service.create_result(ResultFields::new("9", "Final")).unwrap();
    conn.execute(
        "UPDATE results SET created_at = 100 WHERE id = ?1;",
        params![older.id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE results SET created_at = 50 WHERE id = ?1;",
        params![newer.id.to_string()],
    )
    .unwrap();

    let found = service.search_result("9", "Final").unwrap().unwrap();
    assert_eq!(found.id, older.id);
}

#[test]
fn bulk_create_inserts_every_entry() {
    let conn = open_db_in_memory().unwrap();
    let service = ResultService::new(SqliteResultRepository::new(&conn));

    let batch = ResultFields::batch_from_json(json!([
        {"roll": "1", "examName": "Final2024", "gpa": "4.50"},
        {"roll": "2", "examName": "Final2024", "gpa": "Fail"},
        {"roll": 3, "examName": "Final2024"}
    ]))
    .unwrap();
    let count = service.bulk_create_results(batch).unwrap();

    assert_eq!(count, 3);
    for roll in ["1", "2", "3"] {
        let found = service.search_result(roll, "Final2024").unwrap();
        assert!(found.is_some(), "roll {roll} should be retrievable");
    }
    assert_eq!(
        service
            .search_result("2", "Final2024")
            .unwrap()
            .unwrap()
            .fields
            .gpa
            .as_deref(),
        Some("Fail")
    );
}

#[test]
fn bulk_create_accepts_empty_array() {
    let conn = open_db_in_memory().unwrap();
    let service = ResultService::new(SqliteResultRepository::new(&conn));

    assert_eq!(service.bulk_create_results(Vec::new()).unwrap(), 0);
    assert_eq!(result_count(&conn), 0);
}

#[test]
fn bulk_store_failure_rolls_back_the_batch() {
    let conn = open_db_in_memory().unwrap();
    let service = ResultService::new(SqliteResultRepository::new(&conn));

    // Fails the third insert of the batch.
    conn.execute_batch(
        "CREATE TRIGGER reject_third BEFORE INSERT ON results
         WHEN json_extract(NEW.doc, '$.roll') = '3'
         BEGIN SELECT RAISE(ABORT, 'rejected by trigger'); END;",
    )
    .unwrap();

    let batch = ["1", "2", "3"]
        .into_iter()
        .map(|roll| ResultFields::new(roll, "X"))
        .collect::<Vec<_>>();
    let err = service.bulk_create_results(batch).unwrap_err();

    assert!(matches!(err, ServiceError::Repo(_)));
    assert!(err.to_string().contains("rejected by trigger"));
    assert_eq!(result_count(&conn), 0);
}

#[test]
fn json_batch_errors_are_input_errors() {
    let err = ResultFields::batch_from_json(json!({"roll": "1", "examName": "Final2024"}))
        .unwrap_err();
    assert_eq!(err, FieldsError::NotAnArray);
    assert!(matches!(
        ServiceError::from(err),
        ServiceError::Input(FieldsError::NotAnArray)
    ));

    let err = ResultFields::batch_from_json(json!([
        {"roll": "1", "examName": "Final2024"},
        {"roll": "2"}
    ]))
    .unwrap_err();
    assert!(matches!(err, FieldsError::AtIndex { index: 1, .. }));
}
