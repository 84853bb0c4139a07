//! Fixture repository: CRUD operations for the `fixtures` table.
//!
//! Fixtures are owned through their project, so every read and write joins
//! `projects` on the caller's owner id.

use rusqlite::{params, Connection, Row};

use super::project_repo::reconcile_aggregates;
use super::{new_id, now_timestamp, Database, DatabaseError};
use crate::model::{Fixture, NewFixture, OwnerId};

fn fixture_from_row(row: &Row<'_>) -> Result<Fixture, rusqlite::Error> {
    Ok(Fixture {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        room_name: row.get("room_name")?,
        detected_symbol: row.get("detected_symbol")?,
        selected_model_id: row.get("selected_model_id")?,
        quantity: row.get("quantity")?,
        lux_level: row.get("lux_level")?,
        created_at: row.get("created_at")?,
    })
}

/// Inserts a batch of fixtures for a project in one transaction, preserving
/// the batch order for later listing.
pub fn insert_many(
    db: &Database,
    owner: &OwnerId,
    project_id: &str,
    fixtures: &[NewFixture],
) -> Result<Vec<Fixture>, DatabaseError> {
    db.with_conn(|conn| {
        let tx = conn.unchecked_transaction()?;
        let owned: u32 = tx.query_row(
            "SELECT COUNT(*) FROM projects WHERE id = ?1 AND owner_id = ?2",
            params![project_id, owner.as_str()],
            |r| r.get(0),
        )?;
        if owned == 0 {
            return Err(DatabaseError::NotFound {
                table: "projects",
                id: project_id.to_string(),
            });
        }

        let start: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM fixtures WHERE project_id = ?1",
            params![project_id],
            |r| r.get(0),
        )?;
        let created_at = now_timestamp();

        let mut stored = Vec::with_capacity(fixtures.len());
        for (offset, fixture) in fixtures.iter().enumerate() {
            let row = Fixture {
                id: new_id(),
                project_id: project_id.to_string(),
                room_name: fixture.room_name.clone(),
                detected_symbol: fixture.detected_symbol.clone(),
                selected_model_id: fixture.selected_model_id.clone(),
                quantity: fixture.quantity,
                lux_level: fixture.lux_level,
                created_at: created_at.clone(),
            };
            tx.execute(
                "INSERT INTO fixtures (id, project_id, room_name, detected_symbol,
                 selected_model_id, quantity, lux_level, position, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    row.id,
                    row.project_id,
                    row.room_name,
                    row.detected_symbol,
                    row.selected_model_id,
                    row.quantity,
                    row.lux_level,
                    start + offset as i64,
                    row.created_at,
                ],
            )?;
            stored.push(row);
        }

        tx.commit()?;
        Ok(stored)
    })
}

/// Lists a project's fixtures in detection order.
pub fn list_for_project(
    db: &Database,
    owner: &OwnerId,
    project_id: &str,
) -> Result<Vec<Fixture>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT f.* FROM fixtures f JOIN projects p ON p.id = f.project_id
             WHERE f.project_id = ?1 AND p.owner_id = ?2
             ORDER BY f.position, f.rowid",
        )?;
        let rows = stmt
            .query_map(params![project_id, owner.as_str()], fixture_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Finds one of the owner's fixtures by ID.
pub fn find_by_id(
    db: &Database,
    owner: &OwnerId,
    id: &str,
) -> Result<Option<Fixture>, DatabaseError> {
    db.with_conn(|conn| find_in(conn, owner, id))
}

fn find_in(conn: &Connection, owner: &OwnerId, id: &str) -> Result<Option<Fixture>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT f.* FROM fixtures f JOIN projects p ON p.id = f.project_id
         WHERE f.id = ?1 AND p.owner_id = ?2",
    )?;
    let mut rows = stmt.query_map(params![id, owner.as_str()], fixture_from_row)?;
    match rows.next() {
        Some(Ok(row)) => Ok(Some(row)),
        Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
        None => Ok(None),
    }
}

/// Points a fixture at a new catalog model and refreshes the owning
/// project's aggregates in the same transaction.
pub fn update_selected_model(
    db: &Database,
    owner: &OwnerId,
    fixture_id: &str,
    model_id: &str,
) -> Result<Fixture, DatabaseError> {
    db.with_conn(|conn| {
        let tx = conn.unchecked_transaction()?;
        let mut fixture = find_in(&tx, owner, fixture_id)?.ok_or_else(|| DatabaseError::NotFound {
            table: "fixtures",
            id: fixture_id.to_string(),
        })?;

        tx.execute(
            "UPDATE fixtures SET selected_model_id = ?2 WHERE id = ?1",
            params![fixture_id, model_id],
        )?;
        reconcile_aggregates(&tx, &fixture.project_id)?;
        tx.commit()?;

        fixture.selected_model_id = Some(model_id.to_string());
        Ok(fixture)
    })
}
