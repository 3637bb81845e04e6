mod common;

use common::{Script, ScriptedDriver, column};
use rust_decimal::Decimal;
use sql_dbapi::prelude::*;

fn people() -> Script {
    Script::query(
        vec![
            column("id", sql_types::INTEGER),
            column("name", sql_types::VARCHAR),
        ],
        vec![
            vec![RowValues::Int(42), RowValues::Text("Ann".into())],
            vec![RowValues::Int(43), RowValues::Text("Cy".into())],
            vec![RowValues::Int(44), RowValues::Null],
        ],
    )
}

#[test]
fn parameters_bind_by_position_with_typed_setters() -> Result<(), Box<dyn std::error::Error>> {
    let driver = ScriptedDriver::new(Script::update(1));
    let conn = driver.open();
    let mut cur = conn.cursor();
    cur.execute(
        "INSERT INTO t VALUES (?, ?, ?, ?, ?)",
        &[
            RowValues::Int(7),
            RowValues::Float(1.5),
            RowValues::Text("Bo".into()),
            RowValues::Bool(true),
            RowValues::Null,
        ],
    )?;

    let calls = driver.log.calls();
    assert_eq!(
        &calls[2..7],
        &[
            "set_long 1 7",
            "set_double 2 1.5",
            "set_string 3 Bo",
            "set_object 4 Bool(true)",
            "set_object 5 Null",
        ]
    );
    assert_eq!(driver.log.count("execute_update"), 1);
    assert_eq!(cur.rowcount(), Some(1));
    assert!(cur.description().is_empty());
    assert_eq!(cur.state(), CursorState::UpdateExecuted);
    Ok(())
}

#[test]
fn query_fetches_rows_then_none() -> Result<(), Box<dyn std::error::Error>> {
    let driver = ScriptedDriver::new(people());
    let conn = driver.open();
    let mut cur = conn.cursor();
    cur.execute("SELECT id, name FROM people WHERE id >= ?", &[RowValues::Int(42)])?;

    assert_eq!(cur.state(), CursorState::QueryOpen);
    assert_eq!(cur.rowcount(), None);
    let names: Vec<&str> = cur.description().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["id", "name"]);
    assert_eq!(cur.description()[0].type_code, sql_types::INTEGER);
    assert!(cur.description()[0].null_ok);

    let first = cur.fetchone()?.expect("first row");
    assert_eq!(
        first.values(),
        &[RowValues::Int(42), RowValues::Text("Ann".into())]
    );
    assert_eq!(first.get("name"), Some(&RowValues::Text("Ann".into())));

    let rest = cur.fetchall()?;
    assert_eq!(rest.len(), 2);
    assert_eq!(rest[1].get_by_index(1), Some(&RowValues::Null));
    assert!(cur.fetchone()?.is_none());
    Ok(())
}

#[test]
fn null_never_reaches_a_typed_accessor() -> Result<(), Box<dyn std::error::Error>> {
    let driver = ScriptedDriver::new(Script::query(
        vec![
            column("i", sql_types::BIGINT),
            column("f", sql_types::DOUBLE),
            column("b", sql_types::BOOLEAN),
            column("d", sql_types::DECIMAL),
            column("o", sql_types::TIMESTAMP),
        ],
        vec![vec![RowValues::Null; 5]],
    ));
    let conn = driver.open();
    let mut cur = conn.cursor();
    cur.execute("SELECT i, f, b, d, o FROM t", &[])?;

    let row = cur.fetchone()?.expect("row");
    assert!(row.values().iter().all(RowValues::is_null));
    assert_eq!(driver.log.count("get_string"), 5);
    for accessor in ["get_long", "get_double", "get_boolean", "get_object"] {
        assert_eq!(driver.log.count(accessor), 0, "{accessor} was called");
    }
    Ok(())
}

#[test]
fn each_type_code_uses_its_accessor() -> Result<(), Box<dyn std::error::Error>> {
    let when = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap();
    let driver = ScriptedDriver::new(Script::query(
        vec![
            column("i", sql_types::SMALLINT),
            column("f", sql_types::REAL),
            column("b", sql_types::BOOLEAN),
            column("d", sql_types::NUMERIC),
            column("t", sql_types::NCHAR),
            column("o", sql_types::TIMESTAMP),
        ],
        vec![vec![
            RowValues::Int(3),
            RowValues::Float(2.5),
            RowValues::Bool(true),
            RowValues::Decimal("3.14".parse::<Decimal>()?),
            RowValues::Text("x".into()),
            RowValues::Timestamp(when),
        ]],
    ));
    let conn = driver.open();
    let mut cur = conn.cursor();
    cur.execute("SELECT * FROM t", &[])?;
    let row = cur.fetchone()?.expect("row");

    assert_eq!(row.get("i"), Some(&RowValues::Int(3)));
    assert_eq!(row.get("f"), Some(&RowValues::Float(2.5)));
    assert_eq!(row.get("b"), Some(&RowValues::Bool(true)));
    assert_eq!(row.get("t"), Some(&RowValues::Text("x".into())));
    assert_eq!(row.get("o"), Some(&RowValues::Timestamp(when)));

    let decimal = row.get("d").and_then(RowValues::as_decimal).expect("decimal");
    assert_eq!(decimal.to_string(), "3.14");

    // decimals and text come straight from the NULL check read
    let typed: Vec<String> = driver
        .log
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("get_") && !c.starts_with("get_string"))
        .collect();
    assert_eq!(typed, ["get_long 1", "get_double 2", "get_boolean 3", "get_object 6"]);
    assert_eq!(driver.log.count("get_string"), 6);
    Ok(())
}

#[test]
fn oversized_decimal_text_fails_the_fetch() -> Result<(), Box<dyn std::error::Error>> {
    let driver = ScriptedDriver::new(Script::query(
        vec![column("d", sql_types::DECIMAL)],
        vec![
            vec![RowValues::Text("0.12345678901234567890123456789".into())],
            vec![RowValues::Text("2.50".into())],
        ],
    ));
    let conn = driver.open();
    let mut cur = conn.cursor();
    cur.execute("SELECT d FROM t", &[])?;

    let err = cur.fetchone().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataError);
    assert_eq!(err.sql_state(), Some("22003"));

    let row = cur.fetchone()?.expect("second row");
    let value = row.get("d").and_then(RowValues::as_decimal).expect("decimal");
    assert_eq!(value.to_string(), "2.50");
    Ok(())
}

#[test]
fn driver_without_an_answer_falls_back_to_statement_text() -> Result<(), Box<dyn std::error::Error>>
{
    let mut script = people();
    script.produces_result_set = None;
    let driver = ScriptedDriver::new(script);
    let conn = driver.open();
    let mut cur = conn.cursor();

    cur.execute("  select id, name from people", &[])?;
    assert_eq!(cur.state(), CursorState::QueryOpen);

    cur.execute("WITH x AS (SELECT 1) SELECT * FROM x", &[])?;
    assert_eq!(cur.state(), CursorState::UpdateExecuted);
    assert_eq!(driver.log.count("execute_query"), 1);
    assert_eq!(driver.log.count("execute_update"), 1);
    Ok(())
}

#[test]
fn lexical_classification_ignores_the_driver() -> Result<(), Box<dyn std::error::Error>> {
    let driver = ScriptedDriver::new(people());
    let conn = driver.open();
    let mut cur =
        conn.cursor_with(CursorOptions::default().with_classification(StatementClassification::Lexical));

    cur.execute("PRAGMA table_info(people)", &[])?;
    assert_eq!(cur.state(), CursorState::UpdateExecuted);
    assert_eq!(cur.rowcount(), Some(0));
    assert!(cur.description().is_empty());
    assert!(cur.fetchone().is_err());
    Ok(())
}

#[test]
fn re_executing_releases_the_previous_statement() -> Result<(), Box<dyn std::error::Error>> {
    let driver = ScriptedDriver::new(people());
    let conn = driver.open();
    let mut cur = conn.cursor();
    cur.execute("SELECT id, name FROM people", &[])?;
    cur.fetchone()?;
    driver.log.clear();

    cur.execute("SELECT id, name FROM people", &[])?;
    let calls = driver.log.calls();
    assert_eq!(calls[0], "result_set.close");
    assert_eq!(calls[1], "statement.close");
    assert!(calls[2].starts_with("prepare"));

    // the new result set starts from the first row
    let row = cur.fetchone()?.expect("row");
    assert_eq!(row.get("id"), Some(&RowValues::Int(42)));
    Ok(())
}

#[test]
fn fetching_without_a_query_fails() {
    let driver = ScriptedDriver::new(Script::update(3));
    let conn = driver.open();
    let mut cur = conn.cursor();

    let err = cur.fetchone().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatabaseError);
    assert_eq!(err.message(), "no result set available to fetch from");

    cur.execute("DELETE FROM t", &[]).unwrap();
    assert!(cur.fetchall().is_err());
    assert!(cur.fetchmany(None).is_err());
}

#[test]
fn fetchmany_defaults_to_arraysize() -> Result<(), Box<dyn std::error::Error>> {
    let driver = ScriptedDriver::new(people());
    let conn = driver.open();
    let mut cur = conn.cursor();
    assert_eq!(cur.arraysize(), 1);
    cur.execute("SELECT id, name FROM people", &[])?;

    assert_eq!(cur.fetchmany(None)?.len(), 1);
    cur.set_arraysize(5);
    assert_eq!(cur.fetchmany(None)?.len(), 2);
    assert!(cur.fetchmany(Some(4))?.is_empty());
    Ok(())
}

#[test]
fn rows_iterator_yields_every_row() -> Result<(), Box<dyn std::error::Error>> {
    let driver = ScriptedDriver::new(people());
    let conn = driver.open();
    let mut cur = conn.cursor();
    cur.execute("SELECT id, name FROM people", &[])?;

    let ids: Vec<i64> = cur
        .rows()
        .map(|row| row.map(|r| *r.get("id").and_then(RowValues::as_int).unwrap()))
        .collect::<Result<_, _>>()?;
    assert_eq!(ids, [42, 43, 44]);
    Ok(())
}

#[test]
fn decode_failure_carries_the_sql_state_kind() {
    let mut script = people();
    script.fail_typed_reads = Some(DriverError::new("numeric overflow").with_sql_state("22003"));
    let driver = ScriptedDriver::new(script);
    let conn = driver.open();
    let mut cur = conn.cursor();
    cur.execute("SELECT id, name FROM people", &[]).unwrap();

    let err = cur.fetchone().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataError);
    assert!(err.is_a(ErrorKind::DatabaseError));
    assert!(err.is_a(ErrorKind::Error));
    assert_eq!(err.message(), "numeric overflow");

    let mut rows = cur.rows();
    assert!(rows.next().unwrap().is_err());
    assert!(rows.next().is_none());
}

#[test]
fn driver_failures_without_state_are_database_errors() {
    let mut script = people();
    script.fail_execute = Some(DriverError::new("disk I/O error"));
    let driver = ScriptedDriver::new(script);
    let conn = driver.open();
    let mut cur = conn.cursor();

    let err = cur.execute("SELECT 1", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatabaseError);
    assert_eq!(err.to_string(), "Database error: disk I/O error");
    assert_eq!(cur.state(), CursorState::Prepared);
}

#[test]
fn prepare_failure_is_refined_by_state() {
    let mut script = people();
    script.fail_prepare = Some(DriverError::new("near \"SELEC\": syntax error").with_sql_state("42000"));
    let driver = ScriptedDriver::new(script);
    let conn = driver.open();
    let mut cur = conn.cursor();

    let err = cur.execute("SELEC 1", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProgrammingError);
    assert_eq!(err.sql_state(), Some("42000"));
    assert_eq!(cur.state(), CursorState::Idle);
}

#[test]
fn nextset_is_never_supported() {
    let driver = ScriptedDriver::new(people());
    let conn = driver.open();
    let mut cur = conn.cursor();
    assert_eq!(cur.nextset().unwrap_err().kind(), ErrorKind::ProgrammingError);
    cur.execute("SELECT id FROM people", &[]).unwrap();
    let err = cur.nextset().unwrap_err();
    assert_eq!(err.message(), "Not Implemented");
    cur.close();
    assert!(cur.nextset().is_err());
}

#[test]
fn close_swallows_driver_failures() {
    let mut script = people();
    script.fail_close = true;
    let driver = ScriptedDriver::new(script);
    let conn = driver.open();
    let mut cur = conn.cursor();
    cur.execute("SELECT id, name FROM people", &[]).unwrap();

    cur.close();
    assert_eq!(cur.state(), CursorState::Closed);
    assert_eq!(driver.log.count("result_set.close"), 1);
    assert_eq!(driver.log.count("statement.close"), 1);

    // a second close has nothing left to release
    cur.close();
    assert_eq!(driver.log.count("statement.close"), 1);

    let err = cur.execute("SELECT 1", &[]).unwrap_err();
    assert_eq!(err.message(), "cursor is closed");
    assert_eq!(cur.fetchone().unwrap_err().message(), "cursor is closed");
}

#[test]
fn dropping_a_cursor_releases_its_statement() {
    let driver = ScriptedDriver::new(people());
    let conn = driver.open();
    {
        let mut cur = conn.cursor();
        cur.execute("SELECT id, name FROM people", &[]).unwrap();
    }
    assert_eq!(driver.log.count("result_set.close"), 1);
    assert_eq!(driver.log.count("statement.close"), 1);
}

#[test]
fn connect_failure_is_a_plain_error() {
    let driver = ScriptedDriver::new(Script {
        fail_connect: Some(DriverError::new("unknown host").with_sql_state("08001")),
        ..Script::default()
    });
    let err = connect(&driver, &ConnectOptions::new("nowhere")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Error);
    assert_eq!(err.message(), "unknown host");
    assert!(!err.is_a(ErrorKind::DatabaseError));
}

#[test]
fn connection_delegates_to_the_driver() -> Result<(), Box<dyn std::error::Error>> {
    let driver = ScriptedDriver::new(Script::update(0));
    let options = ConnectOptions::builder("db1")
        .user("sa")
        .password("secret")
        .login_timeout_secs(5)
        .finish();
    let conn = connect(&driver, &options)?;
    conn.commit()?;
    conn.rollback()?;
    conn.close()?;

    assert_eq!(
        driver.log.calls(),
        ["connect db1 timeout=5", "commit", "rollback", "connection.close"]
    );
    Ok(())
}

#[test]
fn cursors_share_one_connection() -> Result<(), Box<dyn std::error::Error>> {
    let driver = ScriptedDriver::new(people());
    let conn = driver.open();
    let mut a = conn.cursor();
    let mut b = conn.cursor();
    a.execute("SELECT id, name FROM people", &[])?;
    b.execute("SELECT id, name FROM people", &[])?;
    assert_eq!(a.fetchone()?, b.fetchone()?);
    assert_eq!(driver.log.count("connect"), 1);
    Ok(())
}
