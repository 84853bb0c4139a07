//! Project repository: owner-scoped CRUD operations for the `projects` table.

use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;

use super::{get_decimal, new_id, now_timestamp, parse_column, Database, DatabaseError};
use crate::model::{NewProject, OwnerId, Project, ProjectStatus};

fn project_from_row(row: &Row<'_>) -> Result<Project, rusqlite::Error> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        source_file_name: row.get("source_file_name")?,
        source_file_type: parse_column(row, "source_file_type")?,
        total_fixtures: row.get("total_fixtures")?,
        total_cost: get_decimal(row, "total_cost")?,
        average_lux: row.get("average_lux")?,
        status: parse_column(row, "status")?,
        error_message: row.get("error_message")?,
        owner_id: OwnerId::new(row.get::<_, String>("owner_id")?),
        created_at: row.get("created_at")?,
        processed_at: row.get("processed_at")?,
    })
}

/// Creates a pending project with zeroed aggregates.
pub fn insert(
    db: &Database,
    owner: &OwnerId,
    project: &NewProject,
) -> Result<Project, DatabaseError> {
    let created = Project {
        id: new_id(),
        name: project.name.clone(),
        source_file_name: project.source_file_name.clone(),
        source_file_type: project.source_file_type,
        total_fixtures: 0,
        total_cost: Decimal::ZERO,
        average_lux: 0.0,
        status: ProjectStatus::Pending,
        error_message: None,
        owner_id: owner.clone(),
        created_at: now_timestamp(),
        processed_at: None,
    };

    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO projects (id, name, source_file_name, source_file_type, total_fixtures,
             total_cost, average_lux, status, owner_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                created.id,
                created.name,
                created.source_file_name,
                created.source_file_type.as_str(),
                created.total_fixtures,
                created.total_cost.to_string(),
                created.average_lux,
                created.status.as_str(),
                created.owner_id.as_str(),
                created.created_at,
            ],
        )?;
        Ok(())
    })?;

    Ok(created)
}

/// Finds one of the owner's projects by ID.
pub fn find_by_id(
    db: &Database,
    owner: &OwnerId,
    id: &str,
) -> Result<Option<Project>, DatabaseError> {
    db.with_conn(|conn| find_in(conn, owner, id))
}

fn find_in(conn: &Connection, owner: &OwnerId, id: &str) -> Result<Option<Project>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT * FROM projects WHERE id = ?1 AND owner_id = ?2")?;
    let mut rows = stmt.query_map(params![id, owner.as_str()], project_from_row)?;
    match rows.next() {
        Some(Ok(row)) => Ok(Some(row)),
        Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
        None => Ok(None),
    }
}

/// Lists the owner's projects, most recent first.
pub fn list_for_owner(
    db: &Database,
    owner: &OwnerId,
    limit: Option<u64>,
) -> Result<Vec<Project>, DatabaseError> {
    db.with_conn(|conn| {
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut stmt = conn.prepare(
            "SELECT * FROM projects WHERE owner_id = ?1
             ORDER BY created_at DESC, rowid DESC LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![owner.as_str(), limit], project_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Deletes a project; fixtures, their recommendations and reports cascade.
pub fn delete(db: &Database, owner: &OwnerId, id: &str) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        let affected = conn.execute(
            "DELETE FROM projects WHERE id = ?1 AND owner_id = ?2",
            params![id, owner.as_str()],
        )?;
        if affected == 0 {
            return Err(DatabaseError::NotFound {
                table: "projects",
                id: id.to_string(),
            });
        }
        Ok(())
    })
}

/// Moves a project to `status`. Finished states stamp `processed_at`; the
/// error message is kept only for failures.
pub fn set_status(
    db: &Database,
    owner: &OwnerId,
    id: &str,
    status: ProjectStatus,
    error_message: Option<&str>,
) -> Result<Project, DatabaseError> {
    let error_message = error_message.filter(|_| status == ProjectStatus::Failed);
    let processed_at = status.is_finished().then(now_timestamp);

    db.with_conn(|conn| {
        let affected = conn.execute(
            "UPDATE projects SET status = ?3, error_message = ?4, processed_at = ?5
             WHERE id = ?1 AND owner_id = ?2",
            params![id, owner.as_str(), status.as_str(), error_message, processed_at],
        )?;
        if affected == 0 {
            return Err(DatabaseError::NotFound {
                table: "projects",
                id: id.to_string(),
            });
        }
        find_in(conn, owner, id)?.ok_or_else(|| DatabaseError::NotFound {
            table: "projects",
            id: id.to_string(),
        })
    })
}

/// Recomputes `total_fixtures`, `total_cost` and `average_lux` from the
/// project's fixtures and returns the updated project.
pub fn refresh_aggregates(
    db: &Database,
    owner: &OwnerId,
    id: &str,
) -> Result<Project, DatabaseError> {
    db.with_conn(|conn| {
        if find_in(conn, owner, id)?.is_none() {
            return Err(DatabaseError::NotFound {
                table: "projects",
                id: id.to_string(),
            });
        }
        reconcile_aggregates(conn, id)?;
        find_in(conn, owner, id)?.ok_or_else(|| DatabaseError::NotFound {
            table: "projects",
            id: id.to_string(),
        })
    })
}

/// Writes aggregates derived from the current fixture rows. Callers hold the
/// connection lock, so this can run inside a surrounding transaction.
pub(crate) fn reconcile_aggregates(
    conn: &Connection,
    project_id: &str,
) -> Result<(), DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT f.quantity, f.lux_level, m.unit_price
         FROM fixtures f LEFT JOIN fixture_models m ON m.id = f.selected_model_id
         WHERE f.project_id = ?1",
    )?;
    let lines = stmt
        .query_map(params![project_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut total_fixtures: i64 = 0;
    let mut total_cost = Decimal::ZERO;
    let mut lux_sum = 0.0;
    for (quantity, lux, price) in &lines {
        total_fixtures += quantity;
        lux_sum += lux;
        if let Some(price) = price {
            let price: Decimal = price.parse().map_err(|e: rust_decimal::Error| {
                DatabaseError::InvalidValue {
                    table: "fixture_models",
                    column: "unit_price",
                    reason: e.to_string(),
                }
            })?;
            total_cost = price
                .checked_mul(Decimal::from(*quantity))
                .and_then(|line| total_cost.checked_add(line))
                .ok_or_else(|| DatabaseError::InvalidValue {
                    table: "projects",
                    column: "total_cost",
                    reason: format!("total cost of project {} overflows", project_id),
                })?;
        }
    }
    let average_lux = if lines.is_empty() {
        0.0
    } else {
        lux_sum / lines.len() as f64
    };

    conn.execute(
        "UPDATE projects SET total_fixtures = ?2, total_cost = ?3, average_lux = ?4 WHERE id = ?1",
        params![project_id, total_fixtures, total_cost.to_string(), average_lux],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixture_repo;
    use crate::db::test_support::{insert_model, insert_project, new_fixture, owner, test_db};

    #[test]
    fn test_insert_and_find() {
        let db = test_db();
        let created = insert_project(&db, &owner(), "Office");

        let found = find_by_id(&db, &owner(), &created.id).unwrap().unwrap();
        assert_eq!(found.name, "Office");
        assert_eq!(found.total_fixtures, 0);
        assert_eq!(found.total_cost, Decimal::ZERO);
        assert_eq!(found.owner_id, owner());
        assert_eq!(found.status, ProjectStatus::Pending);
        assert!(found.processed_at.is_none());
    }

    #[test]
    fn test_find_scoped_to_owner() {
        let db = test_db();
        let created = insert_project(&db, &owner(), "Office");

        let other = OwnerId::new("user-2");
        assert!(find_by_id(&db, &other, &created.id).unwrap().is_none());
    }

    #[test]
    fn test_list_for_owner_filters_and_limits() {
        let db = test_db();
        insert_project(&db, &owner(), "A");
        insert_project(&db, &owner(), "B");
        insert_project(&db, &owner(), "C");
        insert_project(&db, &OwnerId::new("user-2"), "Foreign");

        let all = list_for_owner(&db, &owner(), None).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|p| p.owner_id == owner()));

        let limited = list_for_owner(&db, &owner(), Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].name, "C");
    }

    #[test]
    fn test_delete_other_owner_is_not_found() {
        let db = test_db();
        let created = insert_project(&db, &owner(), "Office");

        let result = delete(&db, &OwnerId::new("user-2"), &created.id);
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
        assert!(find_by_id(&db, &owner(), &created.id).unwrap().is_some());
    }

    #[test]
    fn test_delete_cascades_to_fixtures() {
        let db = test_db();
        let model = insert_model(&db, "LP-600", "LED Panel", 8999);
        let project = insert_project(&db, &owner(), "Office");
        fixture_repo::insert_many(&db, &owner(), &project.id, &[new_fixture(Some(&model.id), 2)])
            .unwrap();

        delete(&db, &owner(), &project.id).unwrap();

        let remaining: u32 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM fixtures", [], |r| r.get(0))?)
            })
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_refresh_aggregates() {
        let db = test_db();
        let panel = insert_model(&db, "LP-600", "LED Panel", 4599);
        let down = insert_model(&db, "DL-12", "Downlight", 1299);
        let project = insert_project(&db, &owner(), "Office");

        let mut second = new_fixture(Some(&down.id), 1);
        second.lux_level = 500.0;
        fixture_repo::insert_many(
            &db,
            &owner(),
            &project.id,
            &[new_fixture(Some(&panel.id), 2), second, new_fixture(None, 4)],
        )
        .unwrap();

        let refreshed = refresh_aggregates(&db, &owner(), &project.id).unwrap();
        assert_eq!(refreshed.total_fixtures, 7);
        assert_eq!(refreshed.total_cost, Decimal::new(10497, 2));
        let expected_lux = (300.0 + 500.0 + 300.0) / 3.0;
        assert!((refreshed.average_lux - expected_lux).abs() < 1e-9);
    }

    #[test]
    fn test_refresh_aggregates_empty_project() {
        let db = test_db();
        let project = insert_project(&db, &owner(), "Empty");

        let refreshed = refresh_aggregates(&db, &owner(), &project.id).unwrap();
        assert_eq!(refreshed.total_fixtures, 0);
        assert_eq!(refreshed.total_cost, Decimal::ZERO);
        assert_eq!(refreshed.average_lux, 0.0);
    }

    #[test]
    fn test_refresh_aggregates_unknown_project() {
        let db = test_db();
        let result = refresh_aggregates(&db, &owner(), "missing");
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn test_set_status_completed_stamps_processed_at() {
        let db = test_db();
        let project = insert_project(&db, &owner(), "Office");

        let processing =
            set_status(&db, &owner(), &project.id, ProjectStatus::Processing, None).unwrap();
        assert_eq!(processing.status, ProjectStatus::Processing);
        assert!(processing.processed_at.is_none());

        let done = set_status(&db, &owner(), &project.id, ProjectStatus::Completed, Some("ignored"))
            .unwrap();
        assert_eq!(done.status, ProjectStatus::Completed);
        assert!(done.error_message.is_none());
        assert!(done.processed_at.is_some());
    }

    #[test]
    fn test_set_status_failed_keeps_message() {
        let db = test_db();
        let project = insert_project(&db, &owner(), "Office");

        set_status(&db, &owner(), &project.id, ProjectStatus::Failed, Some("no fixtures")).unwrap();

        let found = find_by_id(&db, &owner(), &project.id).unwrap().unwrap();
        assert_eq!(found.status, ProjectStatus::Failed);
        assert_eq!(found.error_message.as_deref(), Some("no fixtures"));
        assert!(found.processed_at.is_some());
    }

    #[test]
    fn test_set_status_other_owner_is_not_found() {
        let db = test_db();
        let project = insert_project(&db, &owner(), "Office");

        let result = set_status(
            &db,
            &OwnerId::new("user-2"),
            &project.id,
            ProjectStatus::Completed,
            None,
        );
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn test_refresh_aggregates_overflow_is_an_error() {
        let db = test_db();
        let model = insert_model(&db, "LP-600", "LED Panel", 4599);
        let project = insert_project(&db, &owner(), "Office");
        fixture_repo::insert_many(&db, &owner(), &project.id, &[new_fixture(Some(&model.id), 2)])
            .unwrap();
        // Written behind the catalog's back, as an older or foreign writer could.
        db.with_conn(|conn| {
            conn.execute(
                "UPDATE fixture_models SET unit_price = ?2 WHERE id = ?1",
                params![model.id, Decimal::MAX.to_string()],
            )?;
            Ok(())
        })
        .unwrap();

        let result = refresh_aggregates(&db, &owner(), &project.id);
        assert!(matches!(result, Err(DatabaseError::InvalidValue { .. })));

        // The connection lock survives the failure.
        assert_eq!(list_for_owner(&db, &owner(), None).unwrap().len(), 1);
    }
}
