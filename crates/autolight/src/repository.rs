//! Typed repository interfaces over the record store.
//!
//! The workflows only talk to these traits. `Database` implements all of
//! them by delegating to the per-table modules in [`crate::db`]; tests swap
//! in doubles that fail on demand.

use crate::db::recommendation_repo::RecommendationInput;
use crate::db::{
    catalog_repo, fixture_repo, project_repo, recommendation_repo, report_repo, Database,
    DatabaseError,
};
use crate::model::{
    Fixture, FixtureModel, FixtureRecommendation, NewFixture, NewFixtureModel, NewProject,
    OwnerId, Project, ProjectStatus, Report, ReportFormat,
};

pub trait ProjectRepository {
    fn create_project(
        &self,
        owner: &OwnerId,
        project: &NewProject,
    ) -> Result<Project, DatabaseError>;

    fn find_project(&self, owner: &OwnerId, id: &str) -> Result<Option<Project>, DatabaseError>;

    fn list_projects(
        &self,
        owner: &OwnerId,
        limit: Option<u64>,
    ) -> Result<Vec<Project>, DatabaseError>;

    fn delete_project(&self, owner: &OwnerId, id: &str) -> Result<(), DatabaseError>;

    fn refresh_aggregates(&self, owner: &OwnerId, id: &str) -> Result<Project, DatabaseError>;

    fn set_project_status(
        &self,
        owner: &OwnerId,
        id: &str,
        status: ProjectStatus,
        error_message: Option<&str>,
    ) -> Result<Project, DatabaseError>;
}

pub trait CatalogRepository {
    fn list_models(&self) -> Result<Vec<FixtureModel>, DatabaseError>;
    fn find_model(&self, id: &str) -> Result<Option<FixtureModel>, DatabaseError>;
    fn insert_model(&self, model: &NewFixtureModel) -> Result<FixtureModel, DatabaseError>;
    fn count_models(&self) -> Result<u64, DatabaseError>;
}

pub trait FixtureRepository {
    fn insert_fixtures(
        &self,
        owner: &OwnerId,
        project_id: &str,
        fixtures: &[NewFixture],
    ) -> Result<Vec<Fixture>, DatabaseError>;

    fn list_fixtures(
        &self,
        owner: &OwnerId,
        project_id: &str,
    ) -> Result<Vec<Fixture>, DatabaseError>;

    /// Persists a new selection and refreshes the owning project's aggregates.
    fn update_selected_model(
        &self,
        owner: &OwnerId,
        fixture_id: &str,
        model_id: &str,
    ) -> Result<Fixture, DatabaseError>;
}

pub trait RecommendationRepository {
    fn replace_recommendations(
        &self,
        owner: &OwnerId,
        fixture_id: &str,
        recommendations: &[RecommendationInput],
    ) -> Result<Vec<FixtureRecommendation>, DatabaseError>;

    fn list_recommendations(
        &self,
        owner: &OwnerId,
        project_id: &str,
    ) -> Result<Vec<FixtureRecommendation>, DatabaseError>;
}

pub trait ReportRepository {
    fn record_report(
        &self,
        owner: &OwnerId,
        project_id: &str,
        format: ReportFormat,
        file_name: &str,
    ) -> Result<Report, DatabaseError>;

    fn list_reports(&self, owner: &OwnerId, project_id: &str) -> Result<Vec<Report>, DatabaseError>;
}

/// Everything a results or upload workflow needs from the store.
pub trait RecordStore:
    ProjectRepository
    + CatalogRepository
    + FixtureRepository
    + RecommendationRepository
    + ReportRepository
{
}

impl<T> RecordStore for T where
    T: ProjectRepository
        + CatalogRepository
        + FixtureRepository
        + RecommendationRepository
        + ReportRepository
{
}

impl ProjectRepository for Database {
    fn create_project(
        &self,
        owner: &OwnerId,
        project: &NewProject,
    ) -> Result<Project, DatabaseError> {
        project_repo::insert(self, owner, project)
    }

    fn find_project(&self, owner: &OwnerId, id: &str) -> Result<Option<Project>, DatabaseError> {
        project_repo::find_by_id(self, owner, id)
    }

    fn list_projects(
        &self,
        owner: &OwnerId,
        limit: Option<u64>,
    ) -> Result<Vec<Project>, DatabaseError> {
        project_repo::list_for_owner(self, owner, limit)
    }

    fn delete_project(&self, owner: &OwnerId, id: &str) -> Result<(), DatabaseError> {
        project_repo::delete(self, owner, id)
    }

    fn refresh_aggregates(&self, owner: &OwnerId, id: &str) -> Result<Project, DatabaseError> {
        project_repo::refresh_aggregates(self, owner, id)
    }

    fn set_project_status(
        &self,
        owner: &OwnerId,
        id: &str,
        status: ProjectStatus,
        error_message: Option<&str>,
    ) -> Result<Project, DatabaseError> {
        project_repo::set_status(self, owner, id, status, error_message)
    }
}

impl CatalogRepository for Database {
    fn list_models(&self) -> Result<Vec<FixtureModel>, DatabaseError> {
        catalog_repo::list_all(self)
    }

    fn find_model(&self, id: &str) -> Result<Option<FixtureModel>, DatabaseError> {
        catalog_repo::find_by_id(self, id)
    }

    fn insert_model(&self, model: &NewFixtureModel) -> Result<FixtureModel, DatabaseError> {
        catalog_repo::insert(self, model)
    }

    fn count_models(&self) -> Result<u64, DatabaseError> {
        catalog_repo::count(self)
    }
}

impl FixtureRepository for Database {
    fn insert_fixtures(
        &self,
        owner: &OwnerId,
        project_id: &str,
        fixtures: &[NewFixture],
    ) -> Result<Vec<Fixture>, DatabaseError> {
        fixture_repo::insert_many(self, owner, project_id, fixtures)
    }

    fn list_fixtures(
        &self,
        owner: &OwnerId,
        project_id: &str,
    ) -> Result<Vec<Fixture>, DatabaseError> {
        fixture_repo::list_for_project(self, owner, project_id)
    }

    fn update_selected_model(
        &self,
        owner: &OwnerId,
        fixture_id: &str,
        model_id: &str,
    ) -> Result<Fixture, DatabaseError> {
        fixture_repo::update_selected_model(self, owner, fixture_id, model_id)
    }
}

impl RecommendationRepository for Database {
    fn replace_recommendations(
        &self,
        owner: &OwnerId,
        fixture_id: &str,
        recommendations: &[RecommendationInput],
    ) -> Result<Vec<FixtureRecommendation>, DatabaseError> {
        recommendation_repo::replace_for_fixture(self, owner, fixture_id, recommendations)
    }

    fn list_recommendations(
        &self,
        owner: &OwnerId,
        project_id: &str,
    ) -> Result<Vec<FixtureRecommendation>, DatabaseError> {
        recommendation_repo::list_for_project(self, owner, project_id)
    }
}

impl ReportRepository for Database {
    fn record_report(
        &self,
        owner: &OwnerId,
        project_id: &str,
        format: ReportFormat,
        file_name: &str,
    ) -> Result<Report, DatabaseError> {
        report_repo::insert(self, owner, project_id, format, file_name)
    }

    fn list_reports(
        &self,
        owner: &OwnerId,
        project_id: &str,
    ) -> Result<Vec<Report>, DatabaseError> {
        report_repo::list_for_project(self, owner, project_id)
    }
}
