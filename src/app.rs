//! Application state and main event loop.

use crate::config::StartView;
use crate::domain::{
    BacklogItem, Comment, DevelopmentType, ProgressPolicy, Project, ProjectDraft, ProjectPatch,
    StageClick, Workspace,
};
use crate::error::{AppError, NotifyResult, Result};
use crate::services::{
    export_to, DocumentStore, ExportFormat, Identity, JsonStore, LogNotifier, Notification,
    Notifier, OutboxNotifier,
};
use crate::ui::input::{Action, InputHandler};
use crate::ui::widgets::comment_editor::{CommentEditor, EditorAction};
use crate::ui::widgets::help::HelpWidget;
use crate::ui::widgets::stage_checklist::{detail_rows, DetailRow};
use crate::ui::widgets::text_input::{TextInputAction, TextInputState};
use crate::views::{
    build_rows, build_timeline, DashboardKpis, GanttChart, KanbanBoard, SortKey, TableRow,
    TimelineGroup,
};
use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Main screens, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Kanban,
    Table,
    Timeline,
    Gantt,
    Backlog,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Self::Dashboard,
        Self::Kanban,
        Self::Table,
        Self::Timeline,
        Self::Gantt,
        Self::Backlog,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Tablero",
            Self::Kanban => "Kanban",
            Self::Table => "Tabla",
            Self::Timeline => "Línea de tiempo",
            Self::Gantt => "Gantt",
            Self::Backlog => "Backlog",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn offset(self, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let idx = (self.index() as isize + delta).rem_euclid(len) as usize;
        Self::ALL[idx]
    }
}

impl From<StartView> for Tab {
    fn from(view: StartView) -> Self {
        match view {
            StartView::Dashboard => Self::Dashboard,
            StartView::Kanban => Self::Kanban,
            StartView::Table => Self::Table,
            StartView::Timeline => Self::Timeline,
            StartView::Gantt => Self::Gantt,
            StartView::Backlog => Self::Backlog,
        }
    }
}

/// Application view state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppView {
    /// Tabbed main screens
    #[default]
    Main,
    /// Project detail editor
    Detail,
    /// Name prompt for a new project
    NewProject,
    /// Title prompt for a new backlog item
    NewBacklogItem,
    /// Justification prompt before deleting the open project
    DeleteProject,
    /// Justification prompt before deleting the selected backlog item
    DeleteBacklogItem,
    /// Comment editor on the open project
    Comment,
    /// Ask whether to email the requester about a saved status change
    ConfirmNotify,
    /// Help view showing keybindings
    Help,
}

/// Next free office code for `year`, e.g. `P-2024-007`
pub fn next_project_code(projects: &[Project], year: i32) -> String {
    let prefix = format!("P-{year}-");
    let last = projects
        .iter()
        .filter_map(|p| p.code.strip_prefix(&prefix))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{prefix}{:03}", last + 1)
}

/// Main application state
pub struct App {
    /// Workspace context
    pub workspace: Workspace,
    pub identity: Identity,
    pub policy: ProgressPolicy,

    // Collections, as of the latest snapshot
    pub projects: Vec<Project>,
    pub backlog: Vec<BacklogItem>,

    // Read models rebuilt from each snapshot
    pub board: KanbanBoard,
    pub rows: Vec<TableRow>,
    pub timeline: Vec<TimelineGroup>,
    pub gantt: GanttChart,
    pub kpis: DashboardKpis,
    pub today: NaiveDate,

    // UI State
    /// Current view
    pub view: AppView,
    pub tab: Tab,
    pub kanban_column: usize,
    pub kanban_card: usize,
    pub table_index: usize,
    pub sort_key: SortKey,
    pub sort_descending: bool,
    pub timeline_index: usize,
    pub gantt_index: usize,
    pub backlog_index: usize,

    // Detail editor
    pub draft: Option<ProjectDraft>,
    pub detail_cursor: usize,
    pub comment_editor: Option<CommentEditor>,
    /// Status-change notice waiting for the user to confirm sending it
    pub pending_notification: Option<Notification>,

    // Prompts
    pub text_input: TextInputState,
    pub input_error: Option<String>,
    /// Development type chosen in the creation prompts
    pub new_development_type: DevelopmentType,

    /// Error message to display
    pub error_message: Option<String>,
    /// Non-blocking status message shown in the footer
    pub status_message: Option<String>,
    pub help_scroll: usize,

    // Services
    project_store: Arc<dyn DocumentStore<Project>>,
    backlog_store: Arc<dyn DocumentStore<BacklogItem>>,
    project_updates: watch::Receiver<Vec<Project>>,
    backlog_updates: watch::Receiver<Vec<BacklogItem>>,
    notifier: Box<dyn Notifier>,

    // Input handler
    input_handler: InputHandler,

    /// Should quit the application
    pub should_quit: bool,
}

impl App {
    /// Open the workspace collections and build the application
    pub fn new(workspace: Workspace) -> Result<Self> {
        workspace.ensure_data_directory()?;
        let project_store = JsonStore::<Project>::open(&workspace.data_directory)?.shared();
        let backlog_store = JsonStore::<BacklogItem>::open(&workspace.data_directory)?.shared();
        let identity = Identity::from_config(&workspace.config.identity);

        let notifier: Box<dyn Notifier> = if workspace.config.notifications.enabled {
            Box::new(OutboxNotifier::new(workspace.outbox_path.clone()))
        } else {
            Box::new(LogNotifier)
        };

        tracing::info!(
            "Opened workspace {} as {}",
            workspace.root_path.display(),
            identity.current_user()
        );
        Ok(Self::with_services(
            workspace,
            identity,
            project_store,
            backlog_store,
            notifier,
        ))
    }

    /// Build the application on top of explicit collaborators
    pub fn with_services(
        workspace: Workspace,
        identity: Identity,
        project_store: Arc<dyn DocumentStore<Project>>,
        backlog_store: Arc<dyn DocumentStore<BacklogItem>>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let policy = workspace.config.progress.policy;
        let tab = Tab::from(workspace.config.ui.default_view);
        let input_handler = InputHandler::new(workspace.config.ui.vim_navigation);
        let project_updates = project_store.subscribe();
        let backlog_updates = backlog_store.subscribe();
        let today = Local::now().date_naive();

        let mut app = Self {
            workspace,
            identity,
            policy,
            projects: Vec::new(),
            backlog: Vec::new(),
            board: KanbanBoard::build(&[], policy),
            rows: Vec::new(),
            timeline: Vec::new(),
            gantt: GanttChart::build(&[], policy, today),
            kpis: DashboardKpis::compute(&[], policy, today),
            today,
            view: AppView::Main,
            tab,
            kanban_column: 0,
            kanban_card: 0,
            table_index: 0,
            sort_key: SortKey::default(),
            sort_descending: false,
            timeline_index: 0,
            gantt_index: 0,
            backlog_index: 0,
            draft: None,
            detail_cursor: 0,
            comment_editor: None,
            pending_notification: None,
            text_input: TextInputState::new(),
            input_error: None,
            new_development_type: DevelopmentType::Remodeling,
            error_message: None,
            status_message: None,
            help_scroll: 0,
            project_store,
            backlog_store,
            project_updates,
            backlog_updates,
            notifier,
            input_handler,
            should_quit: false,
        };
        app.reload();
        app
    }

    /// Take the current contents of both collections
    pub fn reload(&mut self) {
        self.projects = self.project_updates.borrow_and_update().clone();
        self.backlog = self.backlog_updates.borrow_and_update().clone();
        self.rebuild_views();
    }

    /// Adopt new snapshots published since the last tick
    pub fn poll_snapshots(&mut self) {
        let mut changed = false;
        if self.project_updates.has_changed().unwrap_or(false) {
            self.projects = self.project_updates.borrow_and_update().clone();
            changed = true;
        }
        if self.backlog_updates.has_changed().unwrap_or(false) {
            self.backlog = self.backlog_updates.borrow_and_update().clone();
            changed = true;
        }
        if changed {
            tracing::debug!(
                "Snapshot: {} projects, {} backlog items",
                self.projects.len(),
                self.backlog.len()
            );
            self.rebuild_views();
        }
    }

    /// Recompute every read model and fold the snapshot into an open draft
    fn rebuild_views(&mut self) {
        self.today = Local::now().date_naive();
        self.board = KanbanBoard::build(&self.projects, self.policy);
        self.rows = build_rows(
            &self.projects,
            self.policy,
            self.sort_key,
            self.sort_descending,
        );
        self.timeline = build_timeline(&self.projects, self.policy);
        self.gantt = GanttChart::build(&self.projects, self.policy, self.today);
        self.kpis = DashboardKpis::compute(&self.projects, self.policy, self.today);
        self.clamp_selection();

        if let Some(draft) = self.draft.as_mut() {
            match self.projects.iter().find(|p| p.id == draft.id()) {
                Some(snapshot) => draft.rebase(snapshot),
                None => {
                    self.draft = None;
                    self.comment_editor = None;
                    if matches!(
                        self.view,
                        AppView::Detail | AppView::Comment | AppView::DeleteProject
                    ) {
                        self.view = AppView::Main;
                        self.error_message = Some("El proyecto fue eliminado".to_string());
                    }
                }
            }
            self.clamp_detail_cursor();
        }
    }

    fn clamp_selection(&mut self) {
        let clamp = |idx: usize, len: usize| idx.min(len.saturating_sub(1));
        self.kanban_column = clamp(self.kanban_column, self.board.columns.len());
        let cards = self
            .board
            .columns
            .get(self.kanban_column)
            .map_or(0, |c| c.cards.len());
        self.kanban_card = clamp(self.kanban_card, cards);
        self.table_index = clamp(self.table_index, self.rows.len());
        self.timeline_index = clamp(self.timeline_index, self.timeline_len());
        self.gantt_index = clamp(self.gantt_index, self.gantt.bars.len());
        self.backlog_index = clamp(self.backlog_index, self.backlog.len());
    }

    fn clamp_detail_cursor(&mut self) {
        if let Some(draft) = &self.draft {
            let rows = detail_rows(draft.project()).len();
            self.detail_cursor = self.detail_cursor.min(rows.saturating_sub(1));
        }
    }

    fn timeline_len(&self) -> usize {
        self.timeline.iter().map(|g| g.entries.len()).sum()
    }

    /// Id of the project under the cursor in the current tab
    pub fn selected_project_id(&self) -> Option<&str> {
        match self.tab {
            Tab::Kanban => self
                .board
                .columns
                .get(self.kanban_column)?
                .cards
                .get(self.kanban_card)
                .map(|c| c.id.as_str()),
            Tab::Table => self.rows.get(self.table_index).map(|r| r.id.as_str()),
            Tab::Timeline => self
                .timeline
                .iter()
                .flat_map(|g| g.entries.iter())
                .nth(self.timeline_index)
                .map(|e| e.id.as_str()),
            Tab::Gantt => self.gantt.bars.get(self.gantt_index).map(|b| b.id.as_str()),
            Tab::Dashboard | Tab::Backlog => None,
        }
    }

    pub fn selected_backlog_item(&self) -> Option<&BacklogItem> {
        self.backlog.get(self.backlog_index)
    }

    fn require_admin(&self, action: &str) -> Result<()> {
        if self.identity.current_is_admin() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(format!(
                "{action} requiere permisos de administrador"
            )))
        }
    }

    /// Hand a notification to the notifier; failures are logged only
    fn notify(&self, notification: NotifyResult<Notification>) {
        if let Err(e) = notification.and_then(|n| self.notifier.send(&n)) {
            tracing::warn!("Notification not sent: {}", e);
        }
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            tracing::warn!("{}", e);
            self.error_message = Some(e.to_string());
        }
    }

    // ---- Main screens ----

    fn move_selection(&mut self, delta: isize) {
        let step = |idx: usize, len: usize| -> usize {
            if len == 0 {
                return 0;
            }
            (idx as isize + delta).clamp(0, len as isize - 1) as usize
        };
        match self.tab {
            Tab::Dashboard => {}
            Tab::Kanban => {
                let cards = self
                    .board
                    .columns
                    .get(self.kanban_column)
                    .map_or(0, |c| c.cards.len());
                self.kanban_card = step(self.kanban_card, cards);
            }
            Tab::Table => self.table_index = step(self.table_index, self.rows.len()),
            Tab::Timeline => self.timeline_index = step(self.timeline_index, self.timeline_len()),
            Tab::Gantt => self.gantt_index = step(self.gantt_index, self.gantt.bars.len()),
            Tab::Backlog => self.backlog_index = step(self.backlog_index, self.backlog.len()),
        }
    }

    fn move_column(&mut self, delta: isize) {
        if self.tab != Tab::Kanban || self.board.columns.is_empty() {
            return;
        }
        let last = self.board.columns.len() as isize - 1;
        self.kanban_column = (self.kanban_column as isize + delta).clamp(0, last) as usize;
        self.clamp_selection();
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.status_message = None;
    }

    /// Change the table sort and rebuild its rows
    pub fn set_sort(&mut self, key: SortKey, descending: bool) {
        self.sort_key = key;
        self.sort_descending = descending;
        self.rows = build_rows(&self.projects, self.policy, key, descending);
        self.status_message = Some(format!(
            "Orden: {} {}",
            key.label(),
            if descending { "▼" } else { "▲" }
        ));
    }

    /// Open the detail editor on a project
    pub fn open_project(&mut self, id: &str) {
        let Some(project) = self.projects.iter().find(|p| p.id == id) else {
            return;
        };
        self.detail_cursor = project.stage_index();
        self.draft = Some(ProjectDraft::new(project.clone()));
        self.view = AppView::Detail;
        self.status_message = None;
    }

    fn open_prompt(&mut self, view: AppView) {
        self.text_input.clear();
        self.input_error = None;
        self.new_development_type = DevelopmentType::Remodeling;
        self.view = view;
    }

    fn close_prompt(&mut self, view: AppView) {
        self.text_input.clear();
        self.input_error = None;
        self.view = view;
    }

    /// Create a project from the name prompt and open it
    pub fn create_project(&mut self, name: &str) -> Result<()> {
        let user = self.identity.current_user().to_string();
        let code = next_project_code(&self.projects, Local::now().year());
        let mut project = Project::new(code, name.trim(), self.new_development_type.code(), &user);
        project.requester_email = Some(user);

        self.project_store.create(project.clone())?;
        tracing::info!("Created project {} ({})", project.code, project.name);
        self.notify(Notification::creation(&project, self.policy));

        self.reload();
        self.open_project(&project.id);
        self.status_message = Some(format!("Proyecto {} creado", project.code));
        Ok(())
    }

    pub fn create_backlog_item(&mut self, title: &str) -> Result<()> {
        let item = BacklogItem::new(
            title.trim(),
            self.new_development_type.code(),
            self.identity.current_user(),
        );
        self.backlog_store.create(item.clone())?;
        tracing::info!("Added backlog item {}", item.title);
        self.reload();
        self.status_message = Some(format!("\"{}\" agregado al backlog", item.title));
        Ok(())
    }

    /// Turn the selected backlog item into a project
    pub fn promote_selected(&mut self) -> Result<()> {
        self.require_admin("Promover ítems")?;
        let Some(item) = self.selected_backlog_item().cloned() else {
            return Ok(());
        };

        let code = next_project_code(&self.projects, Local::now().year());
        let mut project = item.promote(code, self.identity.current_user());
        if !item.created_by.trim().is_empty() {
            project.requester_email = Some(item.created_by.clone());
        }

        self.project_store.create(project.clone())?;
        self.backlog_store
            .delete(&item.id, &format!("Promovido a proyecto {}", project.code))?;
        tracing::info!("Promoted backlog item {} to {}", item.id, project.code);
        self.notify(Notification::creation(&project, self.policy));

        self.reload();
        self.status_message = Some(format!("Promovido a proyecto {}", project.code));
        Ok(())
    }

    pub fn delete_selected_backlog_item(&mut self, justification: &str) -> Result<()> {
        self.require_admin("Eliminar ítems")?;
        let Some(id) = self.selected_backlog_item().map(|i| i.id.clone()) else {
            return Ok(());
        };
        let removed = self.backlog_store.delete(&id, justification)?;
        self.reload();
        self.status_message = Some(format!("\"{}\" eliminado", removed.title));
        Ok(())
    }

    /// Write the spreadsheet and the printable report
    pub fn export(&mut self) -> Result<()> {
        let directory = &self.workspace.export_directory;
        let csv = export_to(directory, ExportFormat::Csv, &self.projects, self.policy)?;
        let report = export_to(directory, ExportFormat::Report, &self.projects, self.policy)?;
        self.status_message = Some(format!(
            "Exportado: {}, {}",
            csv.file_name().unwrap_or_default().to_string_lossy(),
            report.file_name().unwrap_or_default().to_string_lossy()
        ));
        Ok(())
    }

    // ---- Detail editor ----

    /// Apply Space/Enter on the detail row under the cursor
    pub fn toggle_detail_row(&mut self) -> Result<()> {
        let Some(row) = self
            .draft
            .as_ref()
            .and_then(|d| detail_rows(d.project()).get(self.detail_cursor).copied())
        else {
            return Ok(());
        };

        match row {
            DetailRow::Stage(idx) => {
                self.require_admin("Cambiar etapas")?;
                let Some(draft) = self.draft.as_mut() else {
                    return Ok(());
                };
                let stored_status = draft.project().status.clone();
                if let StageClick::Changed { from, to } = draft.click_stage(idx) {
                    tracing::debug!("Draft {} moved {} -> {}", draft.id(), stored_status, to.id);
                    let from_label = if from.id == stored_status {
                        from.label
                    } else {
                        stored_status.as_str()
                    };
                    self.status_message = Some(format!("{} → {}", from_label, to.label));
                }
            }
            DetailRow::SubStage(key) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.toggle_sub_stage(key);
                }
            }
        }
        self.clamp_detail_cursor();
        Ok(())
    }

    pub fn cycle_development_type(&mut self) -> Result<()> {
        self.require_admin("Cambiar el tipo de desarrollo")?;
        let Some(draft) = self.draft.as_mut() else {
            return Ok(());
        };
        let current = draft.project().development();
        let idx = DevelopmentType::KNOWN
            .iter()
            .position(|t| *t == current)
            .map_or(0, |i| (i + 1) % DevelopmentType::KNOWN.len());
        let next = DevelopmentType::KNOWN[idx].clone();
        draft.set_development_type(next.code());
        self.status_message = Some(format!("Tipo: {}", next.label()));
        self.clamp_detail_cursor();
        Ok(())
    }

    /// Persist the draft's changed fields
    pub fn save_draft(&mut self) -> Result<()> {
        let Some(draft) = self.draft.as_mut() else {
            return Ok(());
        };
        let Some(patch) = draft.patch() else {
            self.status_message = Some("Sin cambios".to_string());
            return Ok(());
        };

        let change = draft.status_change();
        let stored = self.project_store.update(draft.id(), patch)?;
        draft.committed();
        tracing::info!("Saved project {} at {}", stored.code, stored.status);
        self.status_message = Some("Cambios guardados".to_string());

        let Some((previous, _)) = change.filter(|(from, to)| from.id != to.id) else {
            return Ok(());
        };
        match Notification::status_change(&stored, previous, self.policy) {
            Ok(notification) => {
                self.pending_notification = Some(notification);
                self.view = AppView::ConfirmNotify;
            }
            Err(e) => tracing::warn!("Notification not built: {}", e),
        }
        Ok(())
    }

    /// Send or drop the status-change notice waiting for confirmation
    pub fn resolve_pending_notification(&mut self, send: bool) {
        if let Some(notification) = self.pending_notification.take() {
            if send {
                self.notify(Ok(notification));
                self.status_message = Some("Notificación enviada".to_string());
            } else {
                tracing::info!(
                    "Status change notification for {} skipped",
                    notification.project_code
                );
                self.status_message = Some("Notificación omitida".to_string());
            }
        }
        self.view = if self.draft.is_some() {
            AppView::Detail
        } else {
            AppView::Main
        };
    }

    pub fn post_comment(&mut self, body: &str) -> Result<()> {
        let Some(id) = self.draft.as_ref().map(|d| d.id().to_string()) else {
            return Ok(());
        };
        let comment = Comment::new(self.identity.current_user(), body);
        if !comment.mentions.is_empty() {
            tracing::info!("Comment on {} mentions {:?}", id, comment.mentions);
        }
        self.project_store
            .update(&id, ProjectPatch::comment(comment))?;
        self.status_message = Some("Comentario publicado".to_string());
        Ok(())
    }

    pub fn delete_open_project(&mut self, justification: &str) -> Result<()> {
        self.require_admin("Eliminar proyectos")?;
        let Some(id) = self.draft.as_ref().map(|d| d.id().to_string()) else {
            return Ok(());
        };
        let removed = self.project_store.delete(&id, justification)?;
        self.draft = None;
        self.view = AppView::Main;
        self.reload();
        self.status_message = Some(format!("Proyecto {} eliminado", removed.code));
        Ok(())
    }

    fn close_detail(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            if draft.is_dirty() {
                draft.discard();
                self.status_message = Some("Cambios descartados".to_string());
            }
        }
        self.draft = None;
        self.view = AppView::Main;
    }

    // ---- Key handling ----

    /// Handle keyboard input and return true if should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Clear error on any key press
        self.error_message = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match self.view {
            AppView::Main => self.handle_main_key(key),
            AppView::Detail => self.handle_detail_key(key),
            AppView::NewProject | AppView::NewBacklogItem => self.handle_create_key(key),
            AppView::DeleteProject | AppView::DeleteBacklogItem => self.handle_delete_key(key),
            AppView::Comment => self.handle_comment_key(key),
            AppView::ConfirmNotify => self.handle_confirm_key(key),
            AppView::Help => self.handle_help_key(key),
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent) -> bool {
        let Some(action) = self.input_handler.handle_key(key) else {
            return false;
        };
        match action {
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::MoveLeft => self.move_column(-1),
            Action::MoveRight => self.move_column(1),
            Action::Home => self.move_selection(isize::MIN / 2),
            Action::End => self.move_selection(isize::MAX / 2),
            Action::NextTab => self.switch_tab(self.tab.offset(1)),
            Action::PrevTab => self.switch_tab(self.tab.offset(-1)),
            Action::GoToTab(idx) => {
                if let Some(tab) = Tab::ALL.get(idx) {
                    self.switch_tab(*tab);
                }
            }
            Action::Select => {
                if let Some(id) = self.selected_project_id().map(str::to_string) {
                    self.open_project(&id);
                }
            }
            Action::NewItem => {
                if self.tab == Tab::Backlog {
                    self.open_prompt(AppView::NewBacklogItem);
                } else {
                    self.open_prompt(AppView::NewProject);
                }
            }
            Action::Delete if self.tab == Tab::Backlog => {
                let result = self.require_admin("Eliminar ítems");
                if result.is_ok() && self.selected_backlog_item().is_some() {
                    self.open_prompt(AppView::DeleteBacklogItem);
                }
                self.report(result);
            }
            Action::Promote if self.tab == Tab::Backlog => {
                let result = self.promote_selected();
                self.report(result);
            }
            Action::CycleSort if self.tab == Tab::Table => {
                self.set_sort(self.sort_key.next(), self.sort_descending);
            }
            Action::ReverseSort if self.tab == Tab::Table => {
                self.set_sort(self.sort_key, !self.sort_descending);
            }
            Action::Export => {
                let result = self.export();
                self.report(result);
            }
            Action::Refresh => {
                self.reload();
                self.status_message = Some("Colecciones recargadas".to_string());
            }
            Action::Help => {
                self.help_scroll = 0;
                self.view = AppView::Help;
            }
            Action::Quit | Action::Back => return true,
            _ => {}
        }
        false
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> bool {
        let Some(action) = self.input_handler.handle_key(key) else {
            return false;
        };
        let rows = self
            .draft
            .as_ref()
            .map_or(0, |d| detail_rows(d.project()).len());

        let result = match action {
            Action::MoveUp => {
                self.detail_cursor = self.detail_cursor.saturating_sub(1);
                Ok(())
            }
            Action::MoveDown => {
                self.detail_cursor = (self.detail_cursor + 1).min(rows.saturating_sub(1));
                Ok(())
            }
            Action::Home => {
                self.detail_cursor = 0;
                Ok(())
            }
            Action::End => {
                self.detail_cursor = rows.saturating_sub(1);
                Ok(())
            }
            Action::Select => self.toggle_detail_row(),
            Action::CyclePriority => {
                if let Some(draft) = self.draft.as_mut() {
                    let priority = draft.cycle_priority();
                    self.status_message = Some(format!("Prioridad: {}", priority.label()));
                }
                Ok(())
            }
            Action::CycleDevelopmentType => self.cycle_development_type(),
            Action::Save => self.save_draft(),
            Action::Comment => {
                if let Some(draft) = &self.draft {
                    self.comment_editor = Some(CommentEditor::new(&draft.project().name));
                    self.view = AppView::Comment;
                }
                Ok(())
            }
            Action::Delete => self.require_admin("Eliminar proyectos").map(|()| {
                self.open_prompt(AppView::DeleteProject);
            }),
            Action::Help => {
                self.help_scroll = 0;
                self.view = AppView::Help;
                Ok(())
            }
            Action::Back | Action::Quit => {
                self.close_detail();
                Ok(())
            }
            _ => Ok(()),
        };
        self.report(result);
        false
    }

    fn handle_create_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Tab {
            let current = DevelopmentType::KNOWN
                .iter()
                .position(|t| *t == self.new_development_type)
                .unwrap_or(0);
            self.new_development_type =
                DevelopmentType::KNOWN[(current + 1) % DevelopmentType::KNOWN.len()].clone();
            return false;
        }

        match self.text_input.handle_key(key) {
            TextInputAction::Submit => {
                if self.text_input.is_blank() {
                    self.input_error = Some("El nombre no puede estar vacío".to_string());
                    return false;
                }
                let value = self.text_input.value().to_string();
                let is_project = self.view == AppView::NewProject;
                self.close_prompt(AppView::Main);
                let result = if is_project {
                    self.create_project(&value)
                } else {
                    self.create_backlog_item(&value)
                };
                self.report(result);
            }
            TextInputAction::Cancel => self.close_prompt(AppView::Main),
            TextInputAction::Changed => self.input_error = None,
            TextInputAction::None => {}
        }
        false
    }

    fn handle_delete_key(&mut self, key: KeyEvent) -> bool {
        let back = if self.view == AppView::DeleteProject {
            AppView::Detail
        } else {
            AppView::Main
        };

        match self.text_input.handle_key(key) {
            TextInputAction::Submit => {
                let justification = self.text_input.value().to_string();
                let result = if self.view == AppView::DeleteProject {
                    self.delete_open_project(&justification)
                } else {
                    self.delete_selected_backlog_item(&justification)
                };
                match result {
                    Ok(()) => self.close_prompt(AppView::Main),
                    Err(e) => self.input_error = Some(e.to_string()),
                }
            }
            TextInputAction::Cancel => self.close_prompt(back),
            TextInputAction::Changed => self.input_error = None,
            TextInputAction::None => {}
        }
        false
    }

    fn handle_comment_key(&mut self, key: KeyEvent) -> bool {
        let Some(editor) = self.comment_editor.as_mut() else {
            self.view = AppView::Detail;
            return false;
        };
        match editor.handle_key(key) {
            EditorAction::Submit => {
                if editor.is_blank() {
                    return false;
                }
                let body = editor.content();
                let result = self.post_comment(&body);
                if result.is_ok() {
                    self.comment_editor = None;
                    self.view = AppView::Detail;
                }
                self.report(result);
            }
            EditorAction::Cancel => {
                self.comment_editor = None;
                self.view = AppView::Detail;
            }
            EditorAction::None => {}
        }
        false
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('y') => {
                self.resolve_pending_notification(true)
            }
            KeyCode::Esc | KeyCode::Char('n') => self.resolve_pending_notification(false),
            _ => {}
        }
        false
    }

    /// Handle keys in help view
    fn handle_help_key(&mut self, key: KeyEvent) -> bool {
        let max_scroll = HelpWidget::line_count().saturating_sub(1);
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.view = if self.draft.is_some() {
                    AppView::Detail
                } else {
                    AppView::Main
                };
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.help_scroll = self.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.help_scroll = (self.help_scroll + 1).min(max_scroll);
            }
            KeyCode::PageUp => {
                self.help_scroll = self.help_scroll.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.help_scroll = (self.help_scroll + 10).min(max_scroll);
            }
            _ => {}
        }
        false
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let tick_rate = Duration::from_millis(self.workspace.config.ui.refresh_rate_ms);
        let mut last_tick = Instant::now();

        loop {
            self.poll_snapshots();

            terminal
                .draw(|f| crate::ui::layout::draw(f, self))
                .map_err(|e| AppError::Terminal(e.to_string()))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());

            if event::poll(timeout).map_err(|e| AppError::Terminal(e.to_string()))? {
                match event::read().map_err(|e| AppError::Terminal(e.to_string()))? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            self.should_quit = true;
                        }
                    }
                    Event::Resize(width, height) => {
                        tracing::debug!("Terminal resized to {}x{}", width, height);
                    }
                    Event::FocusGained | Event::FocusLost | Event::Mouse(_) | Event::Paste(_) => {}
                }
            }

            if self.should_quit {
                break;
            }

            if last_tick.elapsed() >= tick_rate {
                last_tick = Instant::now();
            }
        }

        if self.draft.as_ref().is_some_and(|d| d.is_dirty()) {
            tracing::warn!("Quit with unsaved edits; changes discarded");
        }
        Ok(())
    }
}
