//! Catalog repository: CRUD operations for the `fixture_models` table.
//!
//! Catalog iteration order is insertion order (`rowid`), which is the order
//! recommendations are drawn in.

use rusqlite::{params, Row};
use rust_decimal::Decimal;

use super::{get_decimal, new_id, now_timestamp, Database, DatabaseError};
use crate::model::{FixtureModel, NewFixtureModel};

fn model_from_row(row: &Row<'_>) -> Result<FixtureModel, rusqlite::Error> {
    Ok(FixtureModel {
        id: row.get("id")?,
        model_name: row.get("model_name")?,
        manufacturer: row.get("manufacturer")?,
        fixture_type: row.get("fixture_type")?,
        wattage: row.get("wattage")?,
        lumens: row.get("lumens")?,
        unit_price: get_decimal(row, "unit_price")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
    })
}

/// Highest accepted unit price. Keeps `price × quantity` sums well inside
/// `Decimal` range for any `u32` quantity.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

fn validate_price(price: Decimal) -> Result<(), DatabaseError> {
    if price < Decimal::ZERO {
        return Err(DatabaseError::InvalidValue {
            table: "fixture_models",
            column: "unit_price",
            reason: format!("price {} is negative", price),
        });
    }
    if price > MAX_UNIT_PRICE {
        return Err(DatabaseError::InvalidValue {
            table: "fixture_models",
            column: "unit_price",
            reason: format!("price {} exceeds {}", price, MAX_UNIT_PRICE),
        });
    }
    Ok(())
}

/// Inserts a catalog entry and returns it with its generated id. Prices must
/// lie in `0..=MAX_UNIT_PRICE`.
pub fn insert(db: &Database, model: &NewFixtureModel) -> Result<FixtureModel, DatabaseError> {
    validate_price(model.unit_price)?;

    let id = new_id();
    let created_at = now_timestamp();
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO fixture_models (id, model_name, manufacturer, fixture_type, wattage,
             lumens, unit_price, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id,
                model.model_name,
                model.manufacturer,
                model.fixture_type,
                model.wattage,
                model.lumens,
                model.unit_price.to_string(),
                model.description,
                created_at,
            ],
        )?;
        Ok(())
    })?;

    Ok(FixtureModel {
        id,
        model_name: model.model_name.clone(),
        manufacturer: model.manufacturer.clone(),
        fixture_type: model.fixture_type.clone(),
        wattage: model.wattage,
        lumens: model.lumens,
        unit_price: model.unit_price,
        description: model.description.clone(),
        created_at,
    })
}

/// Returns every catalog entry in catalog order.
pub fn list_all(db: &Database) -> Result<Vec<FixtureModel>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM fixture_models ORDER BY rowid")?;
        let rows = stmt
            .query_map([], model_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Finds a catalog entry by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<FixtureModel>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM fixture_models WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], model_from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Number of catalog entries.
pub fn count(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 =
            conn.query_row("SELECT COUNT(*) FROM fixture_models", [], |r| r.get(0))?;
        Ok(count)
    })
}
