pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS text_summary (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    summary TEXT,
    created_at TEXT NOT NULL
);
"#;
