//! Dashboard statistics: owner-scoped aggregates across projects and fixtures.
//!
//! Only completed projects count; pending, processing and failed uploads
//! stay out of every figure.

use rusqlite::params;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{get_decimal, Database, DatabaseError};
use crate::model::OwnerId;

/// Number of recent projects whose rooms feed the fixtures-per-room chart.
const ROOM_CHART_PROJECTS: i64 = 5;
/// Number of recent projects listed with their cost and lux.
const RECENT_PROJECTS: i64 = 10;
/// Number of fixture types in the distribution.
const TOP_FIXTURE_TYPES: i64 = 10;

/// Aggregate summary for one owner's dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_projects: i64,
    pub total_fixtures: i64,
    pub average_lux: f64,
    pub fixtures_per_room: Vec<RoomStat>,
    pub fixture_types: Vec<FixtureTypeStat>,
    pub recent_projects: Vec<ProjectStat>,
}

/// Fixture count for one room of a recent project.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStat {
    pub project_name: String,
    pub room_name: String,
    pub fixture_count: i64,
}

/// Installed quantity per catalog fixture type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureTypeStat {
    pub fixture_type: String,
    pub total: i64,
}

/// Cost and lux for one recent project.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStat {
    pub project_id: String,
    pub name: String,
    pub total_fixtures: i64,
    pub total_cost: Decimal,
    pub average_lux: f64,
}

/// Returns the dashboard summary for an owner.
pub fn summary(db: &Database, owner: &OwnerId) -> Result<DashboardSummary, DatabaseError> {
    db.with_conn(|conn| {
        let total_projects: i64 = conn.query_row(
            "SELECT COUNT(*) FROM projects WHERE owner_id = ?1 AND status = 'completed'",
            params![owner.as_str()],
            |r| r.get(0),
        )?;

        let (total_fixtures, average_lux): (i64, f64) = conn.query_row(
            "SELECT COALESCE(SUM(f.quantity), 0), COALESCE(AVG(f.lux_level), 0.0)
             FROM fixtures f JOIN projects p ON p.id = f.project_id
             WHERE p.owner_id = ?1 AND p.status = 'completed'",
            params![owner.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        // Rooms of the most recent projects.
        let mut stmt = conn.prepare(
            "WITH recent AS (
                SELECT id, name, created_at, rowid AS seq FROM projects
                WHERE owner_id = ?1 AND status = 'completed'
                ORDER BY created_at DESC, rowid DESC LIMIT ?2
             )
             SELECT recent.name, f.room_name, SUM(f.quantity)
             FROM recent JOIN fixtures f ON f.project_id = recent.id
             GROUP BY recent.id, f.room_name
             ORDER BY recent.created_at DESC, recent.seq DESC, f.room_name",
        )?;
        let fixtures_per_room: Vec<RoomStat> = stmt
            .query_map(params![owner.as_str(), ROOM_CHART_PROJECTS], |row| {
                Ok(RoomStat {
                    project_name: row.get(0)?,
                    room_name: row.get(1)?,
                    fixture_count: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        // Fixture type distribution.
        let mut stmt = conn.prepare(
            "SELECT COALESCE(m.fixture_type, 'Unassigned'), SUM(f.quantity)
             FROM fixtures f
             JOIN projects p ON p.id = f.project_id
             LEFT JOIN fixture_models m ON m.id = f.selected_model_id
             WHERE p.owner_id = ?1 AND p.status = 'completed'
             GROUP BY COALESCE(m.fixture_type, 'Unassigned')
             ORDER BY SUM(f.quantity) DESC, 1
             LIMIT ?2",
        )?;
        let fixture_types: Vec<FixtureTypeStat> = stmt
            .query_map(params![owner.as_str(), TOP_FIXTURE_TYPES], |row| {
                Ok(FixtureTypeStat {
                    fixture_type: row.get(0)?,
                    total: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        // Recent projects with their reconciled aggregates.
        let mut stmt = conn.prepare(
            "SELECT id, name, total_fixtures, total_cost, average_lux FROM projects
             WHERE owner_id = ?1 AND status = 'completed'
             ORDER BY created_at DESC, rowid DESC LIMIT ?2",
        )?;
        let recent_projects: Vec<ProjectStat> = stmt
            .query_map(params![owner.as_str(), RECENT_PROJECTS], |row| {
                Ok(ProjectStat {
                    project_id: row.get("id")?,
                    name: row.get("name")?,
                    total_fixtures: row.get("total_fixtures")?,
                    total_cost: get_decimal(row, "total_cost")?,
                    average_lux: row.get("average_lux")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DashboardSummary {
            total_projects,
            total_fixtures,
            average_lux,
            fixtures_per_room,
            fixture_types,
            recent_projects,
        })
    })
}
