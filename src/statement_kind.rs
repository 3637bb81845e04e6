/// Lexical query test: the trimmed, lowercased text starts with `select`.
///
/// Leading comments, `WITH` queries and `VALUES` all count as updates here; drivers that can
/// report whether a statement yields rows avoid those misses.
#[must_use]
pub fn is_select_text(sql: &str) -> bool {
    let trimmed = sql.trim_start();
    trimmed
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("select"))
}

fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-')
}

fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

/// First keyword of `sql`, uppercased, skipping whitespace and comments.
#[must_use]
pub fn leading_keyword(sql: &str) -> Option<String> {
    let bytes = sql.as_bytes();
    let mut idx = 0;
    loop {
        while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
            idx += 1;
        }
        if is_line_comment_start(bytes, idx) {
            while idx < bytes.len() && bytes[idx] != b'\n' {
                idx += 1;
            }
        } else if is_block_comment_start(bytes, idx) {
            idx += 2;
            while idx < bytes.len() && !is_block_comment_end(bytes, idx) {
                idx += 1;
            }
            idx = (idx + 2).min(bytes.len());
        } else {
            break;
        }
    }

    let start = idx;
    while idx < bytes.len() && (bytes[idx].is_ascii_alphabetic() || bytes[idx] == b'_') {
        idx += 1;
    }
    (idx > start).then(|| sql[start..idx].to_ascii_uppercase())
}

/// INSERT, UPDATE, DELETE or REPLACE: the statements that change rows.
#[must_use]
pub fn is_dml(sql: &str) -> bool {
    matches!(
        leading_keyword(sql).as_deref(),
        Some("INSERT" | "UPDATE" | "DELETE" | "REPLACE")
    )
}
