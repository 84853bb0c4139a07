//! Application state: current page, theme and the open results session.

use std::path::PathBuf;

use crate::config::{save_settings, Settings, Theme};
use crate::error::Result;
use crate::model::OwnerId;
use crate::repository::RecordStore;
use crate::session::ResultsSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Upload,
    Results(String),
    Catalog,
    Reports,
}

#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,
    /// Where settings are persisted; `None` keeps changes in memory only.
    pub settings_path: Option<PathBuf>,
    pub page: Page,
    pub session: Option<ResultsSession>,
}

impl AppState {
    pub fn new(settings: Settings, settings_path: Option<PathBuf>) -> Self {
        Self {
            settings,
            settings_path,
            page: Page::Dashboard,
            session: None,
        }
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme
    }

    /// Flips between light and dark and persists the choice. On a write
    /// failure the previous theme is kept.
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let mut next = self.settings.clone();
        next.theme = next.theme.toggled();

        if let Some(path) = &self.settings_path {
            save_settings(path, &next)?;
        }
        self.settings = next;
        Ok(self.settings.theme)
    }

    /// Switches page. The open session survives only while the page stays
    /// on that session's project.
    pub fn navigate(&mut self, page: Page) {
        let keep = match (&page, &self.session) {
            (Page::Results(id), Some(session)) => session.project().id == *id,
            _ => false,
        };
        if !keep {
            self.session = None;
        }
        self.page = page;
    }

    pub fn open_results<S: RecordStore + ?Sized>(
        &mut self,
        store: &S,
        owner: &OwnerId,
        project_id: &str,
    ) -> Result<&mut ResultsSession> {
        let session = ResultsSession::open(store, owner, project_id)?;
        self.page = Page::Results(project_id.to_string());
        Ok(self.session.insert(session))
    }
}
