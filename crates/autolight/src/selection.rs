//! Per-fixture selection state for the results view.
//!
//! Each entry pairs a fixture with its resolved model and up to
//! [`MAX_RECOMMENDATIONS`] alternatives of the same fixture type. The state
//! only changes through [`SelectionState::toggle_recommendations`] (local)
//! and [`SelectionState::apply_selection`], which persists before it mutates.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::CatalogCache;
use crate::cost::{self, CostLine};
use crate::db::recommendation_repo::RecommendationInput;
use crate::error::{AutolightError, ReferenceError};
use crate::model::{Fixture, FixtureModel, FixtureRecommendation, OwnerId};
use crate::repository::{FixtureRepository, RecommendationRepository};

/// Upper bound on alternatives offered per fixture.
pub const MAX_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFixture {
    pub fixture: Fixture,
    pub selected_model: Option<FixtureModel>,
    pub recommendations: Vec<FixtureModel>,
    pub recommendations_visible: bool,
}

impl SelectedFixture {
    pub fn line_total(&self) -> Decimal {
        cost::line_total(self)
    }
}

impl CostLine for SelectedFixture {
    fn quantity(&self) -> u32 {
        self.fixture.quantity
    }

    fn unit_price(&self) -> Option<Decimal> {
        self.selected_model.as_ref().map(|m| m.unit_price)
    }
}

/// Same-type alternatives to `selected`, first [`MAX_RECOMMENDATIONS`] in
/// catalog order. No selection means no alternatives.
pub fn derive_recommendations(
    selected: Option<&FixtureModel>,
    catalog: &CatalogCache,
) -> Vec<FixtureModel> {
    let Some(selected) = selected else {
        return Vec::new();
    };
    catalog
        .of_type(&selected.fixture_type)
        .filter(|m| m.id != selected.id)
        .take(MAX_RECOMMENDATIONS)
        .cloned()
        .collect()
}

/// Reason text stored alongside a persisted recommendation.
pub fn recommendation_reason(model: &FixtureModel) -> String {
    format!("Same fixture type: {}", model.fixture_type)
}

pub(crate) fn recommendation_inputs(models: &[FixtureModel]) -> Vec<RecommendationInput> {
    models
        .iter()
        .map(|m| RecommendationInput {
            model_id: m.id.clone(),
            reason: recommendation_reason(m),
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionState {
    entries: Vec<SelectedFixture>,
}

impl SelectionState {
    /// Joins each fixture to the catalog and derives its alternatives.
    pub fn initialize(fixtures: Vec<Fixture>, catalog: &CatalogCache) -> Self {
        let entries = fixtures
            .into_iter()
            .map(|fixture| {
                let selected_model = resolve(&fixture, catalog);
                let recommendations = derive_recommendations(selected_model.as_ref(), catalog);
                SelectedFixture {
                    fixture,
                    selected_model,
                    recommendations,
                    recommendations_visible: false,
                }
            })
            .collect();
        Self { entries }
    }

    /// Like [`initialize`](Self::initialize), but reuses persisted
    /// recommendations for fixtures whose stored rows are all still valid:
    /// in the catalog, of the selected model's type and not the selection.
    pub fn restore(
        fixtures: Vec<Fixture>,
        catalog: &CatalogCache,
        stored: &[FixtureRecommendation],
    ) -> Self {
        let mut by_fixture: HashMap<&str, Vec<&FixtureRecommendation>> = HashMap::new();
        for rec in stored {
            by_fixture.entry(rec.fixture_id.as_str()).or_default().push(rec);
        }

        let entries = fixtures
            .into_iter()
            .map(|fixture| {
                let selected_model = resolve(&fixture, catalog);
                let recommendations = by_fixture
                    .get_mut(fixture.id.as_str())
                    .and_then(|rows| stored_recommendations(rows, selected_model.as_ref(), catalog))
                    .unwrap_or_else(|| derive_recommendations(selected_model.as_ref(), catalog));
                SelectedFixture {
                    fixture,
                    selected_model,
                    recommendations,
                    recommendations_visible: false,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[SelectedFixture] {
        &self.entries
    }

    pub fn get(&self, fixture_id: &str) -> Option<&SelectedFixture> {
        self.entries.iter().find(|e| e.fixture.id == fixture_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_cost(&self) -> Decimal {
        cost::total(&self.entries)
    }

    /// Flips one entry's visibility flag. `None` when the fixture is unknown.
    pub fn toggle_recommendations(&mut self, fixture_id: &str) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|e| e.fixture.id == fixture_id)?;
        entry.recommendations_visible = !entry.recommendations_visible;
        Some(entry.recommendations_visible)
    }

    /// Swaps a fixture's model.
    ///
    /// The model must be in `catalog` and the fixture in this state, else a
    /// [`ReferenceError`] is returned with nothing changed. The store update
    /// runs first; only on success is the entry replaced and its
    /// recommendations recomputed and persisted. On a store failure the
    /// state is untouched.
    pub fn apply_selection<S>(
        &mut self,
        store: &S,
        owner: &OwnerId,
        catalog: &CatalogCache,
        fixture_id: &str,
        model_id: &str,
    ) -> Result<&SelectedFixture, AutolightError>
    where
        S: FixtureRepository + RecommendationRepository + ?Sized,
    {
        let _span = tracing::info_span!("selection.apply", fixture_id, model_id).entered();

        let Some(model) = catalog.get(model_id) else {
            log::warn!(
                "Rejected selection of unknown model {} for fixture {}",
                model_id,
                fixture_id
            );
            return Err(ReferenceError::UnknownModel(model_id.to_string()).into());
        };
        let Some(index) = self.entries.iter().position(|e| e.fixture.id == fixture_id) else {
            log::warn!("Rejected selection for unknown fixture {}", fixture_id);
            return Err(ReferenceError::UnknownFixture(fixture_id.to_string()).into());
        };

        let updated = store
            .update_selected_model(owner, fixture_id, model_id)
            .map_err(|e| {
                log::error!("Failed to persist selection for fixture {}: {}", fixture_id, e);
                e
            })?;

        let recommendations = derive_recommendations(Some(model), catalog);
        let inputs = recommendation_inputs(&recommendations);
        if let Err(e) = store.replace_recommendations(owner, fixture_id, &inputs) {
            // The selection itself is stored; a stale projection is re-derived on restore.
            log::warn!("Failed to persist recommendations for fixture {}: {}", fixture_id, e);
        }

        let entry = &mut self.entries[index];
        entry.fixture = updated;
        entry.selected_model = Some(model.clone());
        entry.recommendations = recommendations;

        log::debug!(
            "Fixture {} now uses {} (line total {})",
            fixture_id,
            model.model_name,
            entry.line_total()
        );
        Ok(&self.entries[index])
    }
}

fn resolve(fixture: &Fixture, catalog: &CatalogCache) -> Option<FixtureModel> {
    fixture
        .selected_model_id
        .as_deref()
        .and_then(|id| catalog.get(id))
        .cloned()
}

fn stored_recommendations(
    rows: &mut Vec<&FixtureRecommendation>,
    selected: Option<&FixtureModel>,
    catalog: &CatalogCache,
) -> Option<Vec<FixtureModel>> {
    let selected = selected?;
    if rows.is_empty() || rows.len() > MAX_RECOMMENDATIONS {
        return None;
    }
    rows.sort_by_key(|r| r.priority);
    rows.iter()
        .map(|r| {
            catalog
                .get(&r.recommended_model_id)
                .filter(|m| m.id != selected.id && m.fixture_type == selected.fixture_type)
                .cloned()
        })
        .collect()
}
