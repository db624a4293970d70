// crates/journal-terminal/src/app.rs

use std::path::PathBuf;

use chrono::{DateTime, Local};
use copypasta::{ClipboardContext, ClipboardProvider};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use journal_client::{
    project, ClientError, JournalApi, QueryData, QueryKey, QueryOutcome, QuerySlot, RequestTag,
};
use journal_core::{
    AccessState, DateRange, ExportFormat, FilterField, ImportFormat, ImportResult,
    MetricsSnapshot, Pagination, ParseError, Trade, TradeFilters, TradeQuery, TradesPage, UiMode,
    UsersPage,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::network::{ExportSummary, WorkerReply, WorkerRequest};
use crate::route::Route;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Filter(FilterField),
    DateFrom,
    DateTo,
    IdentityId,
    ImportPath,
}

impl EditTarget {
    pub fn label(&self) -> &'static str {
        match self {
            EditTarget::Filter(field) => field.placeholder(),
            EditTarget::DateFrom => "date from (YYYY-MM-DD)",
            EditTarget::DateTo => "date to (YYYY-MM-DD)",
            EditTarget::IdentityId => "telegram user id",
            EditTarget::ImportPath => "file to import (.csv / .json)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing(EditTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub at: DateTime<Local>,
}

/// Filter form, page position and listing of the trades screen.
#[derive(Debug, Default)]
pub struct TradesView {
    pub filters: TradeFilters,
    pub pagination: Pagination,
    pub page: QuerySlot<TradesPage>,
    pub selected: usize,
}

impl TradesView {
    pub fn key(&self) -> QueryKey {
        QueryKey::Trades(TradeQuery::new(self.filters.clone(), &self.pagination))
    }

    /// Total matches reported by the last listing, 0 until one arrives.
    pub fn total(&self) -> usize {
        self.page.data().map(|p| p.total).unwrap_or(0)
    }

    pub fn rows(&self) -> &[Trade] {
        self.page.data().map(|p| p.items.as_slice()).unwrap_or(&[])
    }

    pub fn selected_trade(&self) -> Option<&Trade> {
        self.rows().get(self.selected)
    }

    /// A changed filter sends the listing back to the first page.
    pub fn set_filter(&mut self, field: FilterField, raw: &str) -> Result<bool, ParseError> {
        let changed = self.filters.set(field, raw)?;
        if changed {
            self.pagination.reset();
            self.selected = 0;
        }
        Ok(changed)
    }

    pub fn clear_filters(&mut self) -> bool {
        if self.filters.is_empty() {
            return false;
        }
        self.filters.clear();
        self.pagination.reset();
        self.selected = 0;
        true
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.pagination.next_page(self.total());
        if moved {
            self.selected = 0;
        }
        moved
    }

    pub fn prev_page(&mut self) -> bool {
        let moved = self.pagination.prev_page();
        if moved {
            self.selected = 0;
        }
        moved
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows().len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[derive(Debug, Default)]
pub struct DashboardView {
    pub range: DateRange,
    pub metrics: QuerySlot<MetricsSnapshot>,
}

impl DashboardView {
    pub fn key(&self) -> QueryKey {
        QueryKey::Metrics(self.range)
    }
}

#[derive(Debug, Default)]
pub struct TransferView {
    pub importing: bool,
    pub exporting: bool,
    pub last_import: Option<Result<ImportResult, String>>,
    pub last_export: Option<Result<ExportSummary, String>>,
    /// Download links for the current mode, refreshed on every mode switch.
    pub export_urls: Vec<(ExportFormat, String)>,
}

pub struct App {
    // Data source state, mirrored from the store
    pub mode: UiMode,
    pub access: AccessState,
    pub epoch: u64,
    pub api_healthy: Option<bool>,

    // UI state
    pub route: Route,
    pub input_mode: InputMode,
    pub should_quit: bool,
    pub show_help: bool,
    pub status: Option<StatusMessage>,

    // Screens
    pub dashboard: DashboardView,
    pub trades: TradesView,
    pub detail: QuerySlot<Trade>,
    pub metrics: QuerySlot<MetricsSnapshot>,
    pub users: QuerySlot<UsersPage>,
    pub transfer: TransferView,

    // Input buffer
    pub input_buffer: String,
    pub input_cursor: usize,

    // Statistics
    pub reply_count: u64,

    api: JournalApi,
    worker_tx: Option<UnboundedSender<WorkerRequest>>,
}

impl App {
    pub fn new(api: JournalApi) -> Self {
        let mut app = Self {
            mode: api.mode(),
            access: api.access(),
            epoch: 0,
            api_healthy: None,
            route: Route::default(),
            input_mode: InputMode::Normal,
            should_quit: false,
            show_help: false,
            status: None,
            dashboard: DashboardView::default(),
            trades: TradesView::default(),
            detail: QuerySlot::default(),
            metrics: QuerySlot::default(),
            users: QuerySlot::default(),
            transfer: TransferView::default(),
            input_buffer: String::new(),
            input_cursor: 0,
            reply_count: 0,
            api,
            worker_tx: None,
        };
        app.refresh_export_urls();
        app
    }

    pub fn set_worker_sender(&mut self, tx: UnboundedSender<WorkerRequest>) {
        self.worker_tx = Some(tx);
    }

    fn send(&self, req: WorkerRequest) {
        if let Some(tx) = &self.worker_tx {
            if tx.send(req).is_err() {
                warn!("fetch worker is gone");
            }
        }
    }

    /// First fetch for the opening screen plus a health probe.
    pub fn start(&mut self) {
        self.send(WorkerRequest::Health { epoch: self.epoch });
        self.sync_queries();
    }

    // ---- queries -------------------------------------------------------

    /// What the current screen needs, if anything.
    pub fn current_key(&self) -> Option<QueryKey> {
        match &self.route {
            Route::Dashboard => Some(self.dashboard.key()),
            Route::Trades => Some(self.trades.key()),
            Route::TradeDetail(id) => Some(QueryKey::Trade(id.clone())),
            Route::Metrics => Some(QueryKey::Metrics(DateRange::default())),
            Route::ImportExport => None,
            Route::AdminUsers => Some(QueryKey::Users),
        }
    }

    pub fn current_tag(&self) -> Option<RequestTag> {
        self.current_key().map(|key| RequestTag::new(self.epoch, key))
    }

    /// Point the current screen's slot at its tag and fetch if the slot
    /// was not already there. Safe to call after every event.
    pub fn sync_queries(&mut self) {
        let Some(tag) = self.current_tag() else {
            return;
        };
        let (needs_fetch, left_behind) = match &self.route {
            Route::Dashboard => self.dashboard.metrics.retarget(tag.clone()),
            Route::Trades => self.trades.page.retarget(tag.clone()),
            Route::TradeDetail(_) => self.detail.retarget(tag.clone()),
            Route::Metrics => self.metrics.retarget(tag.clone()),
            Route::AdminUsers => self.users.retarget(tag.clone()),
            Route::ImportExport => (false, None),
        };
        // Only this slot ever pointed at the old tag.
        if let Some(old) = left_behind.filter(|old| old.epoch == self.epoch) {
            self.send(WorkerRequest::Invalidate(old));
        }
        if needs_fetch {
            debug!("requesting {:?}", tag);
            self.send(WorkerRequest::Fetch(tag));
        }
    }

    /// Drop the current screen's cached result and fetch it again.
    pub fn refresh(&mut self) {
        if let Some(tag) = self.current_tag() {
            self.send(WorkerRequest::Invalidate(tag));
            match &self.route {
                Route::Dashboard => self.dashboard.metrics.reset(),
                Route::Trades => self.trades.page.reset(),
                Route::TradeDetail(_) => self.detail.reset(),
                Route::Metrics => self.metrics.reset(),
                Route::AdminUsers => self.users.reset(),
                Route::ImportExport => {}
            }
        }
        self.send(WorkerRequest::Health { epoch: self.epoch });
        self.sync_queries();
    }

    /// Start a new epoch: every cached result and in-flight reply from
    /// before is stale.
    fn bump_epoch(&mut self) {
        self.epoch += 1;
        self.api_healthy = None;
        self.send(WorkerRequest::Epoch(self.epoch));
        self.send(WorkerRequest::Health { epoch: self.epoch });
        self.refresh_export_urls();
        self.sync_queries();
    }

    fn refresh_export_urls(&mut self) {
        self.transfer.export_urls = [ExportFormat::Json, ExportFormat::Csv]
            .into_iter()
            .map(|format| {
                let url = match self.api.export_url(format) {
                    Ok(url) => url.to_string(),
                    Err(e) => format!("unavailable: {}", e),
                };
                (format, url)
            })
            .collect();
    }

    // ---- worker replies ------------------------------------------------

    pub fn handle_reply(&mut self, reply: WorkerReply) {
        self.reply_count += 1;

        match reply {
            WorkerReply::Query { tag, outcome } => self.apply_outcome(tag, outcome),
            WorkerReply::Imported(result) => {
                self.transfer.importing = false;
                match &result {
                    Ok(res) => {
                        self.set_info(format!(
                            "Import finished: {} imported, {} failed",
                            res.imported, res.failed
                        ));
                    }
                    Err(e) => self.set_error(format!("Import failed: {}", e)),
                }
                let imported = result.as_ref().map(|r| r.imported > 0).unwrap_or(false);
                self.transfer.last_import = Some(result);
                if imported {
                    // New rows on the server; nothing cached is current.
                    self.bump_epoch();
                }
            }
            WorkerReply::Exported(result) => {
                self.transfer.exporting = false;
                match &result {
                    Ok(summary) => self.set_info(format!(
                        "Exported {} bytes to {}",
                        summary.bytes,
                        summary.path.display()
                    )),
                    Err(e) => self.set_error(format!("Export failed: {}", e)),
                }
                self.transfer.last_export = Some(result);
            }
            WorkerReply::Health { epoch, healthy } => {
                if epoch == self.epoch {
                    self.api_healthy = Some(healthy);
                }
            }
        }
    }

    fn apply_outcome(&mut self, tag: RequestTag, outcome: QueryOutcome) {
        let applied = match &tag.key {
            QueryKey::Trades(_) => {
                let applied = self
                    .trades
                    .page
                    .accept(&tag, project(outcome, QueryData::into_trades));
                if applied {
                    let rows = self.trades.rows().len();
                    self.trades.selected = self.trades.selected.min(rows.saturating_sub(1));
                }
                applied
            }
            QueryKey::Trade(_) => self.detail.accept(&tag, project(outcome, QueryData::into_trade)),
            QueryKey::Metrics(_) => {
                // The dashboard without a date range and the metrics screen
                // share a key.
                let snap = project(outcome, QueryData::into_metrics);
                let on_dashboard = self.dashboard.metrics.accept(&tag, snap.clone());
                let on_metrics = self.metrics.accept(&tag, snap);
                on_dashboard || on_metrics
            }
            QueryKey::Users => self.users.accept(&tag, project(outcome, QueryData::into_users)),
        };

        if !applied {
            debug!("dropping stale reply for {:?}", tag);
        }
    }

    // ---- access panel --------------------------------------------------

    pub fn toggle_mode(&mut self) {
        let next = self.mode.toggled();
        if let Err(e) = self.api.set_mode(next) {
            self.set_error(format!("Could not save mode: {}", e));
            return;
        }
        self.mode = next;
        self.set_info(format!("Data source: {}", next));
        self.bump_epoch();
    }

    pub fn toggle_role(&mut self) {
        let next = AccessState::new(self.access.role.toggled(), self.access.identity_id);
        self.apply_access(next);
    }

    fn apply_access(&mut self, next: AccessState) {
        if next == self.access {
            return;
        }
        if let Err(e) = self.api.set_access(&next) {
            self.set_error(format!("Could not save access: {}", e));
            return;
        }
        self.access = next;
        self.set_info(format!("Acting as {} {}", next.role, next.identity_id));
        self.bump_epoch();
    }

    // ---- navigation ----------------------------------------------------

    pub fn navigate(&mut self, route: Route) {
        if route != self.route {
            debug!("navigate {} -> {}", self.route.path(), route.path());
            self.route = route;
        }
    }

    pub fn open_selected_trade(&mut self) {
        if let Some(trade) = self.trades.selected_trade() {
            let route = Route::parse(&trade.detail_href());
            self.navigate(route);
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // ---- import / export -----------------------------------------------

    pub fn start_export(&mut self, format: ExportFormat) {
        if self.transfer.exporting {
            return;
        }
        self.transfer.exporting = true;
        let dest = PathBuf::from(format.file_name());
        self.set_info(format!("Exporting {} to {}", format, dest.display()));
        self.send(WorkerRequest::Export { format, dest });
    }

    fn start_import(&mut self, raw: &str) -> bool {
        let path = PathBuf::from(raw.trim());
        let Some(format) = ImportFormat::from_path(&path) else {
            self.set_error("Choose a .csv or .json file".to_string());
            return false;
        };
        self.transfer.importing = true;
        self.set_info(format!("Importing {} as {}", path.display(), format));
        self.send(WorkerRequest::Import { format, path });
        true
    }

    pub fn copy_export_url(&mut self, format: ExportFormat) {
        let Some((_, url)) = self.transfer.export_urls.iter().find(|(f, _)| *f == format) else {
            return;
        };
        let url = url.clone();
        match copy_to_clipboard(&url) {
            Ok(()) => self.set_info(format!("Copied {}", url)),
            Err(e) => self.set_error(format!("Clipboard unavailable: {}", e)),
        }
    }

    // ---- status line ---------------------------------------------------

    pub fn set_info(&mut self, text: String) {
        info!("{}", text);
        self.status = Some(StatusMessage {
            text,
            level: StatusLevel::Info,
            at: Local::now(),
        });
    }

    pub fn set_error(&mut self, text: String) {
        warn!("{}", text);
        self.status = Some(StatusMessage {
            text,
            level: StatusLevel::Error,
            at: Local::now(),
        });
    }

    // ---- keyboard ------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::F(1) | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Editing(target) => self.handle_editing_key(target, key),
        }

        self.sync_queries();
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        // Global hotkeys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                self.toggle_help();
                return;
            }
            KeyCode::Tab => {
                self.navigate(self.route.next_tab());
                return;
            }
            KeyCode::BackTab => {
                self.navigate(self.route.prev_tab());
                return;
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.navigate(Route::TABS[index].clone());
                return;
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                self.toggle_mode();
                return;
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.toggle_role();
                return;
            }
            KeyCode::Char('u') | KeyCode::Char('U') => {
                self.begin_edit(EditTarget::IdentityId);
                return;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.refresh();
                return;
            }
            _ => {}
        }

        // Screen hotkeys
        match self.route {
            Route::Dashboard => match key.code {
                KeyCode::Char('f') | KeyCode::Char('/') => self.begin_edit(EditTarget::DateFrom),
                KeyCode::Char('c') => self.dashboard.range = DateRange::default(),
                _ => {}
            },
            Route::Trades => match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.trades.select_prev(),
                KeyCode::Down | KeyCode::Char('j') => self.trades.select_next(),
                KeyCode::Right | KeyCode::Char('n') => {
                    self.trades.next_page();
                }
                KeyCode::Left | KeyCode::Char('p') => {
                    self.trades.prev_page();
                }
                KeyCode::Enter => self.open_selected_trade(),
                KeyCode::Char('f') | KeyCode::Char('/') => {
                    self.begin_edit(EditTarget::Filter(FilterField::ALL[0]))
                }
                KeyCode::Char('c') => {
                    self.trades.clear_filters();
                }
                _ => {}
            },
            Route::TradeDetail(_) => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Backspace | KeyCode::Left) {
                    self.navigate(Route::Trades);
                }
            }
            Route::ImportExport => match key.code {
                KeyCode::Char('i') => {
                    if !self.transfer.importing {
                        self.begin_edit(EditTarget::ImportPath);
                    }
                }
                KeyCode::Char('j') => self.start_export(ExportFormat::Json),
                KeyCode::Char('c') => self.start_export(ExportFormat::Csv),
                KeyCode::Char('y') => self.copy_export_url(ExportFormat::Json),
                KeyCode::Char('Y') => self.copy_export_url(ExportFormat::Csv),
                _ => {}
            },
            Route::Metrics | Route::AdminUsers => {}
        }
    }

    fn handle_editing_key(&mut self, target: EditTarget, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if self.commit_edit(target) {
                    self.finish_edit();
                }
            }
            KeyCode::Tab => self.step_edit(target, true),
            KeyCode::BackTab => self.step_edit(target, false),
            KeyCode::Esc => self.cancel_input(),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Left => self.input_cursor = self.input_cursor.saturating_sub(1),
            KeyCode::Right => {
                self.input_cursor = (self.input_cursor + 1).min(self.input_buffer.chars().count())
            }
            KeyCode::Char(c) => self.enter_char(c),
            _ => {}
        }
    }

    // ---- input editing -------------------------------------------------

    /// Open the input line on `target`, prefilled with its current value.
    pub fn begin_edit(&mut self, target: EditTarget) {
        self.input_buffer = self.current_value(target);
        self.input_cursor = self.input_buffer.chars().count();
        self.input_mode = InputMode::Editing(target);
    }

    fn current_value(&self, target: EditTarget) -> String {
        let date = |d: Option<chrono::NaiveDate>| {
            d.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
        };
        match target {
            EditTarget::Filter(field) => self.trades.filters.get(field).unwrap_or_default(),
            EditTarget::DateFrom => date(self.dashboard.range.from),
            EditTarget::DateTo => date(self.dashboard.range.to),
            EditTarget::IdentityId => self.access.identity_id.to_string(),
            EditTarget::ImportPath => String::new(),
        }
    }

    /// Apply the input line to `target`. On a parse error the line stays
    /// open so it can be corrected.
    fn commit_edit(&mut self, target: EditTarget) -> bool {
        let raw = self.input_buffer.clone();
        let result = match target {
            EditTarget::Filter(field) => self.trades.set_filter(field, &raw).map(|_| ()),
            EditTarget::DateFrom => self.dashboard.range.set_from(&raw).map(|_| ()),
            EditTarget::DateTo => self.dashboard.range.set_to(&raw).map(|_| ()),
            EditTarget::IdentityId => match raw.trim().parse::<i64>() {
                Ok(id) => {
                    self.apply_access(AccessState::new(self.access.role, id));
                    Ok(())
                }
                Err(_) => Err(ParseError::Integer(raw.clone())),
            },
            EditTarget::ImportPath => {
                return self.start_import(&raw);
            }
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                self.set_error(e.to_string());
                false
            }
        }
    }

    /// Commit and move to the neighbouring field of the same form.
    fn step_edit(&mut self, target: EditTarget, forward: bool) {
        let next = match target {
            EditTarget::Filter(field) => {
                EditTarget::Filter(if forward { field.next() } else { field.prev() })
            }
            EditTarget::DateFrom => EditTarget::DateTo,
            EditTarget::DateTo => EditTarget::DateFrom,
            EditTarget::IdentityId | EditTarget::ImportPath => return,
        };
        if self.commit_edit(target) {
            self.begin_edit(next);
        }
    }

    fn finish_edit(&mut self) {
        self.input_buffer.clear();
        self.input_cursor = 0;
        self.input_mode = InputMode::Normal;
    }

    pub fn cancel_input(&mut self) {
        self.finish_edit();
    }

    fn byte_index(&self) -> usize {
        self.input_buffer
            .char_indices()
            .nth(self.input_cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len())
    }

    pub fn enter_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.input_buffer.insert(idx, c);
        self.input_cursor += 1;
    }

    pub fn delete_char(&mut self) {
        if self.input_cursor > 0 {
            self.input_cursor -= 1;
            let idx = self.byte_index();
            self.input_buffer.remove(idx);
        }
    }
}

/// The text a screen shows for a failed query.
pub fn describe_error(route: &Route, err: &ClientError) -> String {
    match (route, err) {
        (Route::AdminUsers, _) => "Admin only. Set role=ADMIN in access panel.".to_string(),
        (_, e) if e.is_denied_or_missing() => "Not found or access denied.".to_string(),
        (_, ClientError::DemoUnsupported(what)) => format!("{} is not available in demo mode.", what),
        (_, e) => e.to_string(),
    }
}

fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let mut ctx = ClipboardContext::new().map_err(|e| e.to_string())?;
    ctx.set_contents(text.to_string()).map_err(|e| e.to_string())
}
