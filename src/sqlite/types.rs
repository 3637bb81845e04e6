use rusqlite::types::Value;

use crate::types::sql_types;

/// Type code for a declared column type, following SQLite's affinity rules.
///
/// Booleans and date/time names are checked before the affinity substrings since SQLite itself
/// has no such storage classes. Names matching no rule map to `OTHER`.
#[must_use]
pub fn type_code_for_decl(decl: &str) -> i32 {
    let upper = decl.to_ascii_uppercase();
    let base = upper.split('(').next().unwrap_or("").trim();

    match base {
        "BOOLEAN" | "BOOL" => return sql_types::BOOLEAN,
        "DATE" => return sql_types::DATE,
        "TIME" => return sql_types::TIME,
        "DATETIME" | "TIMESTAMP" => return sql_types::TIMESTAMP,
        "DECIMAL" => return sql_types::DECIMAL,
        "NUMERIC" => return sql_types::NUMERIC,
        _ => {}
    }

    if base.contains("INT") {
        return match base {
            "TINYINT" => sql_types::TINYINT,
            "SMALLINT" => sql_types::SMALLINT,
            "BIGINT" => sql_types::BIGINT,
            _ => sql_types::INTEGER,
        };
    }
    if base.contains("CHAR") || base.contains("CLOB") || base.contains("TEXT") {
        return match base {
            "CHAR" | "CHARACTER" => sql_types::CHAR,
            "NCHAR" | "NATIVE CHARACTER" => sql_types::NCHAR,
            "NVARCHAR" | "VARYING CHARACTER" => sql_types::NVARCHAR,
            "CLOB" => sql_types::CLOB,
            _ => sql_types::VARCHAR,
        };
    }
    if base.contains("BLOB") {
        return sql_types::BLOB;
    }
    if base.contains("REAL") || base.contains("FLOA") || base.contains("DOUB") {
        return match base {
            "FLOAT" => sql_types::FLOAT,
            "REAL" => sql_types::REAL,
            _ => sql_types::DOUBLE,
        };
    }
    sql_types::OTHER
}

fn storage_class_code(value: &Value) -> Option<i32> {
    match value {
        Value::Integer(_) => Some(sql_types::INTEGER),
        Value::Real(_) => Some(sql_types::DOUBLE),
        Value::Text(_) => Some(sql_types::VARCHAR),
        Value::Blob(_) => Some(sql_types::BLOB),
        Value::Null => None,
    }
}

/// Type code for a column with no declared type, from the storage classes of all its values.
///
/// NULLs are skipped. Integers mixed with reals widen to `DOUBLE`. Any other mix, or a column
/// with no non-NULL value, is `OTHER` so each value passes through with its own storage class.
#[must_use]
pub fn type_code_for_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> i32 {
    let mut inferred = None;
    for code in values.into_iter().filter_map(storage_class_code) {
        inferred = Some(match inferred {
            None => code,
            Some(seen) if seen == code => seen,
            Some(sql_types::INTEGER | sql_types::DOUBLE)
                if matches!(code, sql_types::INTEGER | sql_types::DOUBLE) =>
            {
                sql_types::DOUBLE
            }
            Some(_) => return sql_types::OTHER,
        });
    }
    inferred.unwrap_or(sql_types::OTHER)
}

/// `(precision, scale)` from a declaration such as `DECIMAL(10, 2)` or `VARCHAR(40)`.
#[must_use]
pub fn declared_precision_scale(decl: &str) -> Option<(i32, i32)> {
    let open = decl.find('(')?;
    let close = decl[open..].find(')')? + open;
    let mut parts = decl[open + 1..close].split(',');
    let precision = parts.next()?.trim().parse().ok()?;
    let scale = match parts.next() {
        Some(s) => s.trim().parse().ok()?,
        None => 0,
    };
    Some((precision, scale))
}

/// Display width used when the declaration gives none.
#[must_use]
pub fn default_display_size(type_code: i32) -> i32 {
    match type_code {
        sql_types::TINYINT => 4,
        sql_types::SMALLINT => 6,
        sql_types::INTEGER | sql_types::BIGINT => 20,
        sql_types::FLOAT | sql_types::REAL | sql_types::DOUBLE => 25,
        sql_types::BOOLEAN => 5,
        sql_types::DATE => 10,
        sql_types::TIME => 8,
        sql_types::TIMESTAMP => 29,
        _ => i32::MAX,
    }
}
