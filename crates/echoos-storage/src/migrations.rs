// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations, compiled in with refinery's `embed_migrations!`.

use echoos_core::EchoError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply every pending migration to `conn`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), EchoError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(|e| EchoError::Storage {
            source: Box::new(e),
        })?;
    Ok(())
}
