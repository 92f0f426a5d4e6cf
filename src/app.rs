//! Application state and core logic

use crate::api::ApiClientTrait;
use crate::state::{AppState, View};
use crate::wizard::{Phase, SubmissionStatus, WizardError};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Window in which a second Ctrl+C quits
const DOUBLE_CTRL_C_WINDOW: Duration = Duration::from_secs(1);

/// Page size for the applications list
const APPLICATIONS_PAGE: u32 = 50;

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Client for the application API
    api: Box<dyn ApiClientTrait>,
    /// Whether the app should quit
    quit: bool,
    /// Timestamp of last Ctrl+C press for double-tap quit
    pub last_ctrl_c: Option<Instant>,
    /// Set when the user asked to submit; the run loop draws the busy
    /// indicator before the request goes out
    pending_submission: bool,
}

impl App {
    /// Create a new App instance
    pub async fn new(api: Box<dyn ApiClientTrait>) -> Self {
        let api_connected = api.check_health().await;
        if !api_connected {
            info!("application API is not reachable yet");
        }
        Self {
            state: AppState::new(api_connected),
            api,
            quit: false,
            last_ctrl_c: None,
            pending_submission: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Whether a submission is queued or in flight
    pub fn is_busy(&self) -> bool {
        self.pending_submission || self.state.wizard.is_submitting()
    }

    pub fn has_pending_submission(&self) -> bool {
        self.pending_submission
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message);
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.handle_ctrl_c();
            return Ok(());
        }
        self.last_ctrl_c = None;

        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Nothing may change while the record is on its way
        if self.is_busy() {
            return Ok(());
        }

        self.state.status_message = None;

        if key.code == KeyCode::Char('l') && key.modifiers.contains(KeyModifiers::CONTROL) {
            match self.state.current_view {
                View::Wizard => self.open_applications().await,
                View::Applications => self.state.current_view = View::Wizard,
            }
            return Ok(());
        }

        match self.state.current_view {
            View::Wizard => match self.state.wizard.phase() {
                Phase::Stage(_) => self.handle_stage_key(key),
                Phase::Review => self.handle_review_key(key),
                Phase::Confirmed => self.handle_confirmed_key(key)?,
            },
            View::Applications => self.handle_applications_key(key).await,
        }

        Ok(())
    }

    fn handle_ctrl_c(&mut self) {
        let now = Instant::now();
        match self.last_ctrl_c {
            Some(prev) if now.duration_since(prev) <= DOUBLE_CTRL_C_WINDOW => self.quit = true,
            _ => {
                self.last_ctrl_c = Some(now);
                let message = if self.state.wizard.record().is_empty()
                    || self.state.wizard.reference_id().is_some()
                {
                    "Press Ctrl+C again to quit"
                } else {
                    "Press Ctrl+C again to quit; entered answers will be lost"
                };
                self.state.status_message = Some(message.to_string());
            }
        }
    }

    fn handle_stage_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => self.advance_stage(),
            KeyCode::Esc => self.retreat_stage(),
            KeyCode::Char('p') if ctrl => self.copy_mailing_address(),
            _ => {
                let Some(form) = self.state.form.as_mut() else {
                    return;
                };
                match key.code {
                    KeyCode::Tab | KeyCode::Down => form.next_field(),
                    KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                    KeyCode::Right => {
                        if let Some(field) = form.active_field_mut() {
                            field.next_option();
                        }
                    }
                    KeyCode::Left => {
                        if let Some(field) = form.active_field_mut() {
                            field.prev_option();
                        }
                    }
                    KeyCode::Backspace => {
                        if let Some(field) = form.active_field_mut() {
                            field.pop_char();
                        }
                    }
                    KeyCode::Char(c) if !ctrl => {
                        if let Some(field) = form.active_field_mut() {
                            field.push_char(c);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// Hand the stage on screen to the wizard
    fn advance_stage(&mut self) {
        let Some(form) = self.state.form.as_mut() else {
            return;
        };
        let data = form.to_stage_data();
        match self.state.wizard.advance(&data) {
            Ok(()) => self.state.sync_form(),
            Err(WizardError::Invalid(errors)) => {
                let count = errors.len();
                form.set_errors(errors);
                self.state.status_message = Some(if count == 1 {
                    "1 field needs attention".to_string()
                } else {
                    format!("{count} fields need attention")
                });
            }
            Err(e) => self.push_error(e.to_string()),
        }
    }

    fn retreat_stage(&mut self) {
        if self.state.wizard.retreat() {
            self.state.sync_form();
        }
    }

    fn copy_mailing_address(&mut self) {
        if let Some(form) = self.state.form.as_mut() {
            if form.copy_mailing_to_practice() {
                self.state.status_message =
                    Some("Practice address copied from mailing address".to_string());
            }
        }
    }

    fn handle_review_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => self.request_submission(),
            KeyCode::Enter => self.request_submission(),
            KeyCode::Esc => self.retreat_stage(),
            KeyCode::Down | KeyCode::Char('j') => {
                let lines = crate::ui::summary_line_count(self.state.wizard.record());
                self.state.scroll_review_down(lines);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.review_scroll = self.state.review_scroll.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// Queue the submission; [`Self::submit_pending`] sends it
    fn request_submission(&mut self) {
        if matches!(
            self.state.wizard.status(),
            SubmissionStatus::Idle | SubmissionStatus::Failed { .. }
        ) {
            debug!("submission requested");
            self.pending_submission = true;
        }
    }

    /// Send a queued submission and report the outcome
    pub async fn submit_pending(&mut self) {
        if !std::mem::take(&mut self.pending_submission) {
            return;
        }
        let outcome = self
            .state
            .wizard
            .submit(self.api.as_ref())
            .await
            .map(Clone::clone);
        match outcome {
            Ok(SubmissionStatus::Succeeded { reference_id }) => {
                self.state.api_connected = true;
                self.state.status_message =
                    Some(format!("Application submitted. Reference ID: {reference_id}"));
            }
            Ok(SubmissionStatus::Failed { message }) => {
                self.push_error(format!("Submission failed: {message}"));
            }
            Ok(_) => {}
            Err(e) => self.push_error(e.to_string()),
        }
        self.state.sync_form();
    }

    fn handle_confirmed_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('y') => {
                if let Some(reference_id) = self.state.wizard.reference_id().map(str::to_string) {
                    match self.copy_to_clipboard(&reference_id) {
                        Ok(()) => {
                            self.state.status_message =
                                Some(format!("Copied {reference_id} to clipboard"));
                        }
                        Err(e) => self.push_error(format!("Failed to copy: {e}")),
                    }
                }
            }
            KeyCode::Char('n') => {
                self.state.wizard.reset()?;
                self.state.form = None;
                self.state.sync_form();
                info!("started a new application");
            }
            _ => {}
        }
        Ok(())
    }

    async fn open_applications(&mut self) {
        self.state.current_view = View::Applications;
        self.state.application_detail = None;
        self.load_applications().await;
    }

    /// Load the first page of submitted applications
    pub async fn load_applications(&mut self) {
        match self.api.list_applications(APPLICATIONS_PAGE, 0).await {
            Ok(list) => {
                self.state.api_connected = true;
                self.state.applications_total = list.total;
                self.state.applications = list.applications;
                if self.state.selected_index >= self.state.applications.len() {
                    self.state.selected_index = 0;
                }
            }
            Err(e) => {
                self.state.api_connected = e.status().is_some();
                self.push_error(format!("Failed to load applications: {e}"));
            }
        }
    }

    async fn handle_applications_key(&mut self, key: KeyEvent) {
        if self.state.application_detail.is_some() {
            match key.code {
                KeyCode::Esc | KeyCode::Backspace => self.state.application_detail = None,
                KeyCode::Down | KeyCode::Char('j') => {
                    let lines = self
                        .state
                        .application_detail
                        .as_ref()
                        .map_or(0, crate::ui::detail_line_count);
                    self.state.scroll_detail_down(lines);
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.state.detail_scroll = self.state.detail_scroll.saturating_sub(1);
                }
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Esc => self.state.current_view = View::Wizard,
            KeyCode::Down | KeyCode::Char('j') => self.state.move_selection_down(),
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Char('r') => self.load_applications().await,
            KeyCode::Enter => self.open_selected_application().await,
            _ => {}
        }
    }

    async fn open_selected_application(&mut self) {
        let Some(id) = self
            .state
            .selected_application()
            .map(|a| a.application_id.clone())
        else {
            return;
        };
        match self.api.get_application(&id).await {
            Ok(detail) => {
                self.state.detail_scroll = 0;
                self.state.application_detail = Some(detail);
            }
            Err(e) => self.push_error(format!("Failed to load application {id}: {e}")),
        }
    }

    /// Copy text to the system clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}
