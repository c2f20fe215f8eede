use anyhow::Result;
use rusqlite::Connection;

pub fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS records (
            tree  TEXT NOT NULL,
            key   TEXT NOT NULL,
            doc   TEXT NOT NULL,
            PRIMARY KEY (tree, key)
        );
        ",
    )?;
    Ok(())
}
