//! A loaded results view: one project, its catalog snapshot and selection state.

use rust_decimal::Decimal;

use crate::catalog::CatalogCache;
use crate::db::DatabaseError;
use crate::error::{ReferenceError, Result};
use crate::model::{OwnerId, Project};
use crate::repository::RecordStore;
use crate::selection::{SelectedFixture, SelectionState};

#[derive(Debug)]
pub struct ResultsSession {
    owner: OwnerId,
    project: Project,
    catalog: CatalogCache,
    selection: SelectionState,
}

impl ResultsSession {
    /// Loads the project, the catalog and the project's fixtures, restoring
    /// persisted recommendations where they are still valid.
    pub fn open<S: RecordStore + ?Sized>(
        store: &S,
        owner: &OwnerId,
        project_id: &str,
    ) -> Result<Self> {
        let _span = tracing::info_span!("results.open", project_id).entered();

        let project = store
            .find_project(owner, project_id)?
            .ok_or_else(|| DatabaseError::NotFound {
                table: "projects",
                id: project_id.to_string(),
            })?;
        let catalog = CatalogCache::load(store)?;
        let fixtures = store.list_fixtures(owner, project_id)?;
        let stored = store.list_recommendations(owner, project_id)?;
        let selection = SelectionState::restore(fixtures, &catalog, &stored);

        log::info!(
            "Opened results for project '{}' ({} fixtures, total {})",
            project.name,
            selection.len(),
            selection.total_cost()
        );

        Ok(Self {
            owner: owner.clone(),
            project,
            catalog,
            selection,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn total_cost(&self) -> Decimal {
        self.selection.total_cost()
    }

    pub fn toggle_recommendations(&mut self, fixture_id: &str) -> Option<bool> {
        self.selection.toggle_recommendations(fixture_id)
    }

    /// Applies a selection and mirrors the new total on the cached project.
    pub fn apply_selection<S: RecordStore + ?Sized>(
        &mut self,
        store: &S,
        fixture_id: &str,
        model_id: &str,
    ) -> Result<&SelectedFixture> {
        self.selection
            .apply_selection(store, &self.owner, &self.catalog, fixture_id, model_id)?;
        self.project.total_cost = self.selection.total_cost();

        self.selection
            .get(fixture_id)
            .ok_or_else(|| ReferenceError::UnknownFixture(fixture_id.to_string()).into())
    }
}
