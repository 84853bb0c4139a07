//! Recommendation repository: the persisted alternatives offered per fixture.

use rusqlite::{params, Row};

use super::{new_id, now_timestamp, Database, DatabaseError};
use crate::model::{FixtureRecommendation, OwnerId};

/// One alternative to persist, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationInput {
    pub model_id: String,
    pub reason: String,
}

fn recommendation_from_row(row: &Row<'_>) -> Result<FixtureRecommendation, rusqlite::Error> {
    Ok(FixtureRecommendation {
        id: row.get("id")?,
        fixture_id: row.get("fixture_id")?,
        recommended_model_id: row.get("recommended_model_id")?,
        reason: row.get("reason")?,
        priority: row.get("priority")?,
        created_at: row.get("created_at")?,
    })
}

/// Replaces all recommendations of one fixture. Priorities are assigned from
/// 1 in slice order.
pub fn replace_for_fixture(
    db: &Database,
    owner: &OwnerId,
    fixture_id: &str,
    recommendations: &[RecommendationInput],
) -> Result<Vec<FixtureRecommendation>, DatabaseError> {
    db.with_conn(|conn| {
        let tx = conn.unchecked_transaction()?;
        let owned: u32 = tx.query_row(
            "SELECT COUNT(*) FROM fixtures f JOIN projects p ON p.id = f.project_id
             WHERE f.id = ?1 AND p.owner_id = ?2",
            params![fixture_id, owner.as_str()],
            |r| r.get(0),
        )?;
        if owned == 0 {
            return Err(DatabaseError::NotFound {
                table: "fixtures",
                id: fixture_id.to_string(),
            });
        }

        tx.execute(
            "DELETE FROM fixture_recommendations WHERE fixture_id = ?1",
            params![fixture_id],
        )?;

        let created_at = now_timestamp();
        let mut stored = Vec::with_capacity(recommendations.len());
        for (index, input) in recommendations.iter().enumerate() {
            let row = FixtureRecommendation {
                id: new_id(),
                fixture_id: fixture_id.to_string(),
                recommended_model_id: input.model_id.clone(),
                reason: input.reason.clone(),
                priority: index as u32 + 1,
                created_at: created_at.clone(),
            };
            tx.execute(
                "INSERT INTO fixture_recommendations (id, fixture_id, recommended_model_id,
                 reason, priority, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    row.id,
                    row.fixture_id,
                    row.recommended_model_id,
                    row.reason,
                    row.priority,
                    row.created_at,
                ],
            )?;
            stored.push(row);
        }

        tx.commit()?;
        Ok(stored)
    })
}

/// Lists recommendations for every fixture of a project, grouped by fixture
/// and ordered by priority.
pub fn list_for_project(
    db: &Database,
    owner: &OwnerId,
    project_id: &str,
) -> Result<Vec<FixtureRecommendation>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT r.* FROM fixture_recommendations r
             JOIN fixtures f ON f.id = r.fixture_id
             JOIN projects p ON p.id = f.project_id
             WHERE f.project_id = ?1 AND p.owner_id = ?2
             ORDER BY f.position, r.priority",
        )?;
        let rows = stmt
            .query_map(params![project_id, owner.as_str()], recommendation_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}
