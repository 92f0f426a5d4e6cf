//! Application state definitions

use super::forms::StageForm;
use crate::api::{ApplicationDetail, ApplicationSummary};
use crate::wizard::WizardState;
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// The CMS-10114 wizard
    #[default]
    Wizard,
    /// Previously submitted applications
    Applications,
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,

    // Wizard
    pub wizard: WizardState,
    /// Input buffers for the stage on screen, `None` on Review and Confirmed
    pub form: Option<StageForm>,
    pub review_scroll: usize,

    // Applications list
    pub applications: Vec<ApplicationSummary>,
    pub applications_total: usize,
    pub selected_index: usize,
    pub application_detail: Option<ApplicationDetail>,
    pub detail_scroll: usize,

    // UI state
    pub api_connected: bool,
    pub status_message: Option<String>,
    errors: VecDeque<String>,
}

impl AppState {
    pub fn new(api_connected: bool) -> Self {
        let mut state = Self {
            wizard: WizardState::new(),
            api_connected,
            ..Self::default()
        };
        state.sync_form();
        state
    }

    /// Rebuild the stage form after the wizard moved.
    ///
    /// Re-entering a stage shows the answers it already accepted.
    pub fn sync_form(&mut self) {
        let stage = self.wizard.current_stage();
        if self.form.as_ref().map(|f| f.stage) == stage {
            return;
        }
        self.form = stage.map(|stage| StageForm::new(stage, self.wizard.record()));
        self.review_scroll = 0;
    }

    /// Queue an error for the modal error dialog
    pub fn push_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    pub fn selected_application(&self) -> Option<&ApplicationSummary> {
        self.applications.get(self.selected_index)
    }

    /// Scroll the review summary one line, stopping at its last line
    pub fn scroll_review_down(&mut self, content_lines: usize) {
        self.review_scroll = step_down(self.review_scroll, content_lines);
    }

    /// Scroll the application detail one line, stopping at its last line
    pub fn scroll_detail_down(&mut self, content_lines: usize) {
        self.detail_scroll = step_down(self.detail_scroll, content_lines);
    }

    /// Move selection down
    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.applications.len() {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }
}

fn step_down(offset: usize, content_lines: usize) -> usize {
    (offset + 1).min(content_lines.saturating_sub(1))
}
