//! Compose and print a parameterized UPDATE, reusing one argument across
//! several placeholders via an explicit printf index.
//!
//! Run with: `cargo run --example basic`

use sqlf::{PostgresBindVar, SqlfResult, sqlf};

fn main() -> SqlfResult<()> {
    let id = 4;
    let name = "bolaji";
    let q = sqlf!(
        r#"UPDATE changesets
SET
    batch_change_ids = batch_change_ids - %[1]s::text,
    updated_at = NOW(),
    detached_at = CASE
        WHEN batch_change_ids - %[1]s::text = '{}'::jsonb AND detached_at IS NULL
        THEN NOW()
        ELSE detached_at
    END
WHERE batch_change_ids ? %[1]s::text AND name = %s"#,
        id,
        name
    )?;

    println!("{}", q.to_sql(&PostgresBindVar));
    println!("{:?}", q.args());
    Ok(())
}
