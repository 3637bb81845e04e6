use clap::{Parser, ValueEnum};
use tracing::Level;

use sql_dbapi::prelude::*;
use sql_dbapi::sqlite::SqliteOptionsBuilder;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Classification {
    Driver,
    Lexical,
}

impl From<Classification> for StatementClassification {
    fn from(value: Classification) -> Self {
        match value {
            Classification::Driver => StatementClassification::DriverReported,
            Classification::Lexical => StatementClassification::Lexical,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Run one SQL statement through the DB-API cursor")]
struct Args {
    /// SQLite database path, or :memory:
    database: String,
    /// Statement with `?` placeholders
    sql: String,
    /// Positional parameter; repeat for each placeholder. Parsed as int, float, true/false,
    /// null, or text.
    #[arg(short, long = "param")]
    params: Vec<String>,
    #[arg(long, value_enum, default_value = "driver")]
    classification: Classification,
    #[arg(long)]
    autocommit: bool,
    #[arg(long, default_value_t = 0)]
    login_timeout_secs: u64,
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

fn parse_param(raw: &str) -> RowValues {
    if let Ok(i) = raw.parse::<i64>() {
        return RowValues::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return RowValues::Float(f);
    }
    match raw {
        "true" => RowValues::Bool(true),
        "false" => RowValues::Bool(false),
        "null" | "NULL" => RowValues::Null,
        _ => RowValues::Text(raw.to_string()),
    }
}

fn render(value: &RowValues) -> String {
    match value {
        RowValues::Int(i) => i.to_string(),
        RowValues::Float(f) => f.to_string(),
        RowValues::Text(s) => s.clone(),
        RowValues::Bool(b) => b.to_string(),
        RowValues::Decimal(d) => d.to_string(),
        RowValues::Date(d) => d.to_string(),
        RowValues::Time(t) => t.to_string(),
        RowValues::Timestamp(ts) => ts.to_string(),
        RowValues::Blob(bytes) => format!("<{} bytes>", bytes.len()),
        RowValues::Null => "NULL".to_string(),
    }
}

fn run(args: Args) -> Result<(), DbApiError> {
    let autocommit = args.autocommit;
    let driver = SqliteOptionsBuilder::new().autocommit(autocommit).build();
    let options = ConnectOptions::builder(args.database)
        .login_timeout_secs(args.login_timeout_secs)
        .finish();
    let conn = connect(&driver, &options)?;
    let mut cur = conn.cursor_with(
        CursorOptions::default().with_classification(args.classification.into()),
    );

    let params: Vec<RowValues> = args.params.iter().map(|p| parse_param(p)).collect();
    cur.execute(&args.sql, &params)?;

    if cur.state() == CursorState::QueryOpen {
        let header: Vec<&str> = cur.description().iter().map(|d| d.name.as_str()).collect();
        println!("{}", header.join("\t"));
        for row in cur.rows() {
            let row = row?;
            let cells: Vec<String> = row.values().iter().map(render).collect();
            println!("{}", cells.join("\t"));
        }
    } else {
        println!("rowcount: {}", cur.rowcount().unwrap_or(-1));
        if !autocommit {
            conn.commit()?;
        }
    }

    cur.close();
    conn.close()
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(Level::from(args.log_level))
        .init();

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
