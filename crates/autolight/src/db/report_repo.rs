//! Report repository: one row per exported artifact.

use rusqlite::{params, Row};

use super::{new_id, now_timestamp, parse_column, Database, DatabaseError};
use crate::model::{OwnerId, Report, ReportFormat};

fn report_from_row(row: &Row<'_>) -> Result<Report, rusqlite::Error> {
    Ok(Report {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        format: parse_column(row, "format")?,
        file_name: row.get("file_name")?,
        generated_at: row.get("generated_at")?,
    })
}

/// Records a generated report against one of the owner's projects.
pub fn insert(
    db: &Database,
    owner: &OwnerId,
    project_id: &str,
    format: ReportFormat,
    file_name: &str,
) -> Result<Report, DatabaseError> {
    let report = Report {
        id: new_id(),
        project_id: project_id.to_string(),
        format,
        file_name: file_name.to_string(),
        generated_at: now_timestamp(),
    };

    db.with_conn(|conn| {
        let affected = conn.execute(
            "INSERT INTO reports (id, project_id, format, file_name, generated_at)
             SELECT ?1, id, ?3, ?4, ?5 FROM projects WHERE id = ?2 AND owner_id = ?6",
            params![
                report.id,
                report.project_id,
                report.format.as_str(),
                report.file_name,
                report.generated_at,
                owner.as_str(),
            ],
        )?;
        if affected == 0 {
            return Err(DatabaseError::NotFound {
                table: "projects",
                id: project_id.to_string(),
            });
        }
        Ok(())
    })?;

    Ok(report)
}

/// Lists a project's reports, newest first.
pub fn list_for_project(
    db: &Database,
    owner: &OwnerId,
    project_id: &str,
) -> Result<Vec<Report>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT r.* FROM reports r JOIN projects p ON p.id = r.project_id
             WHERE r.project_id = ?1 AND p.owner_id = ?2
             ORDER BY r.generated_at DESC, r.rowid DESC",
        )?;
        let rows = stmt
            .query_map(params![project_id, owner.as_str()], report_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}
