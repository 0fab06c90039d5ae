//! Main application state and event loop for the VIGIL TUI.
//!
//! The `App` owns the dashboard state exclusively and consumes three
//! message streams: scheduler cadences, fetch results, and keyboard
//! input. Fetches run on spawned tasks so a slow endpoint never blocks
//! the clock tick; results are applied in arrival order (last write
//! wins). Every repaint is a full render pass over current state, so an
//! interleaving of messages only changes which snapshot is visible.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, KeyEvent, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use vigil_core::clock::{Clock, SharedClock, SystemClock};
use vigil_core::config::VigilConfig;
use vigil_core::countdown::CountdownEngine;
use vigil_core::fetch::{BotStatusClient, SiteCheckClient, Snapshot};
use vigil_core::history::{HistoryBuilder, RandomPingSynth};
use vigil_core::cache::HistoryCache;
use vigil_core::sched::{PollEvent, Scheduler, SchedulerConfig};
use vigil_core::{DashState, Result, Route, VigilError};

use crate::board::TimerBoard;
use crate::chart::PingChart;
use crate::event::{AppEvent, InputHandler};
use crate::render;
use crate::theme::Theme;
use crate::widget;

/// Completed fetch, delivered back to the app task.
#[derive(Debug)]
enum FetchOutcome {
    Bots(Result<Option<Snapshot>>),
    Sites(Result<Option<Snapshot>>),
}

/// Main application state.
pub struct App {
    state: DashState,
    engine: CountdownEngine,
    board: TimerBoard,
    chart: PingChart,
    history: HistoryBuilder,
    clock: SharedClock,
    bots: BotStatusClient,
    sites: SiteCheckClient,
    input: InputHandler,
    theme: Theme,
    /// Selected row on the fleet list
    selected: usize,
    /// Cached header clock label, updated on every tick
    clock_label: String,
    should_quit: bool,
    dirty: bool,
}

impl App {
    /// Create an app from config, seeding history from the local cache.
    pub fn new(config: &VigilConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an app with an explicit clock.
    pub fn with_clock(config: &VigilConfig, clock: SharedClock) -> Result<Self> {
        let cache = HistoryCache::new(config.cache_path()?);
        let state = DashState::with_history(cache.load());
        let history = HistoryBuilder::new(Box::new(RandomPingSynth), cache, clock.clone());
        let clock_label = clock.display();

        Ok(Self {
            state,
            engine: CountdownEngine::new(),
            board: TimerBoard::new(),
            chart: PingChart::new(),
            history,
            clock,
            bots: BotStatusClient::new(config)?,
            sites: SiteCheckClient::new(config)?,
            input: InputHandler::new(),
            theme: Theme::default(),
            selected: 0,
            clock_label,
            should_quit: false,
            dirty: true,
        })
    }

    /// Run the dashboard until quit.
    pub async fn run(&mut self, config: &VigilConfig) -> Result<()> {
        crossterm::terminal::enable_raw_mode().map_err(|e| VigilError::TerminalInit {
            message: e.to_string(),
        })?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen).map_err(|e| {
            VigilError::TerminalInit {
                message: e.to_string(),
            }
        })?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|e| VigilError::TerminalInit {
            message: e.to_string(),
        })?;

        let result = self.run_loop(&mut terminal, config).await;

        crossterm::terminal::disable_raw_mode().map_err(|e| VigilError::TerminalRestore {
            message: e.to_string(),
        })?;
        crossterm::execute!(
            terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen
        )
        .map_err(|e| VigilError::TerminalRestore {
            message: e.to_string(),
        })?;
        terminal.show_cursor().map_err(|e| VigilError::TerminalRestore {
            message: e.to_string(),
        })?;

        result
    }

    async fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        config: &VigilConfig,
    ) -> Result<()> {
        // Initial combined fetch: both endpoints in parallel, then one
        // route render. A failure here leaves the placeholder row as the
        // only visible signal; the scheduler retries on cadence.
        let (bots, sites) = tokio::join!(self.bots.fetch(), self.sites.fetch());
        self.apply_bots(bots);
        self.apply_sites(sites);
        self.reroute();
        self.repaint(terminal)?;

        let (poll_tx, mut poll_rx) = mpsc::unbounded_channel();
        Scheduler::spawn(SchedulerConfig::from(config), poll_tx);

        let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel();
        let (input_tx, mut input_rx) = mpsc::unbounded_channel();
        spawn_input_thread(input_tx);

        info!("dashboard running");

        while !self.should_quit {
            tokio::select! {
                Some(event) = poll_rx.recv() => self.on_poll(event, &fetch_tx),
                Some(outcome) = fetch_rx.recv() => self.on_fetch(outcome),
                Some(key) = input_rx.recv() => self.on_key(key, &fetch_tx),
                else => break,
            }

            if self.dirty {
                self.repaint(terminal)?;
                self.dirty = false;
            }
        }

        Ok(())
    }

    fn repaint(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        terminal
            .draw(|frame| self.draw(frame))
            .map_err(|e| VigilError::internal(format!("draw failed: {e}")))?;
        Ok(())
    }

    /// Full render pass over current state.
    ///
    /// Each pass declares the active view's countdown slots, (re)starts
    /// the timers for them, and rebuilds the chart, so navigating can
    /// never stack timers or chart instances.
    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        match self.state.route().clone() {
            Route::List => {
                let vm = render::build_list(&self.state, &self.clock_label);
                self.selected = self.selected.min(vm.cards.len().saturating_sub(1));

                self.board.sync_slots(
                    vm.cards
                        .iter()
                        .filter_map(|card| card.timer.as_ref())
                        .map(|timer| timer.element_key.clone()),
                );
                for timer in vm.cards.iter().filter_map(|card| card.timer.as_ref()) {
                    self.engine.start(
                        timer.target_epoch,
                        &timer.element_key,
                        &timer.timer_key,
                        &mut self.board,
                    );
                }

                widget::draw_list(frame, &vm, &self.board, &self.theme, self.selected);
            }
            Route::Detail(id) => {
                let Some(vm) = render::build_detail(&self.state, &id, &self.clock_label) else {
                    // The router resolves unknown ids away before a
                    // repaint; a snapshot race can still hit this. Fall
                    // back to the list.
                    self.state.set_route(Route::List);
                    self.draw(frame);
                    return;
                };

                self.board
                    .sync_slots(vm.timer.iter().map(|t| t.element_key.clone()));
                if let Some(timer) = &vm.timer {
                    self.engine.start(
                        timer.target_epoch,
                        &timer.element_key,
                        &timer.timer_key,
                        &mut self.board,
                    );
                }

                self.chart.rebuild(&vm.series);
                widget::draw_detail(frame, &vm, &self.board, &self.chart, &self.theme);
            }
        }
    }

    fn on_poll(&mut self, event: PollEvent, fetch_tx: &mpsc::UnboundedSender<FetchOutcome>) {
        match event {
            PollEvent::Tick => {
                self.clock_label = self.clock.display();
                self.engine.tick(self.clock.epoch(), &mut self.board);
                self.dirty = true;
            }
            PollEvent::RefreshBots { silent } => self.trigger_bot_fetch(fetch_tx, silent),
            PollEvent::RefreshSites => self.trigger_site_fetch(fetch_tx),
        }
    }

    fn trigger_bot_fetch(&self, fetch_tx: &mpsc::UnboundedSender<FetchOutcome>, silent: bool) {
        debug!(silent, "live status refresh");
        let client = self.bots.clone();
        let tx = fetch_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(FetchOutcome::Bots(client.fetch().await));
        });
    }

    fn trigger_site_fetch(&self, fetch_tx: &mpsc::UnboundedSender<FetchOutcome>) {
        debug!("site check refresh");
        let client = self.sites.clone();
        let tx = fetch_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(FetchOutcome::Sites(client.fetch().await));
        });
    }

    fn on_fetch(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Bots(result) => self.apply_bots(result),
            FetchOutcome::Sites(result) => self.apply_sites(result),
        }
    }

    fn apply_bots(&mut self, result: Result<Option<Snapshot>>) {
        match result {
            Ok(Some(snapshot)) => {
                self.history.record_snapshot(&snapshot, &mut self.state);
                self.state.replace_bots(snapshot);
                self.state
                    .set_last_sync(format!("Live Sync: {}", self.clock.display()));
                self.reroute();
                self.dirty = true;
            }
            Ok(None) => debug!("unsuccessful bot envelope, state unchanged"),
            Err(e) => warn!(error = %e, "live status fetch failed, state unchanged"),
        }
    }

    fn apply_sites(&mut self, result: Result<Option<Snapshot>>) {
        match result {
            Ok(Some(snapshot)) => {
                self.history.record_snapshot(&snapshot, &mut self.state);
                self.state.replace_sites(snapshot);
                self.reroute();
                self.dirty = true;
            }
            Ok(None) => debug!("unsuccessful site envelope, state unchanged"),
            Err(e) => warn!(error = %e, "site check fetch failed, state unchanged"),
        }
    }

    /// Re-resolve the active route against current state.
    ///
    /// Runs after every successful merge and on navigation; a detail
    /// route whose entity vanished redirects to the list.
    fn reroute(&mut self) {
        let route = self.state.route().clone().resolve(&self.state);
        self.state.set_route(route);
    }

    fn navigate(&mut self, fragment: &str) {
        let route = Route::parse(fragment).resolve(&self.state);
        self.state.set_route(route);
        self.dirty = true;
    }

    fn on_key(&mut self, key: KeyEvent, fetch_tx: &mpsc::UnboundedSender<FetchOutcome>) {
        match self.input.handle_key(key) {
            AppEvent::Quit | AppEvent::ForceQuit => self.should_quit = true,
            AppEvent::Refresh => {
                self.trigger_bot_fetch(fetch_tx, false);
                self.trigger_site_fetch(fetch_tx);
            }
            AppEvent::NavigateUp => {
                self.selected = self.selected.saturating_sub(1);
                self.dirty = true;
            }
            AppEvent::NavigateDown => {
                self.selected = self.selected.saturating_add(1);
                self.dirty = true;
            }
            AppEvent::GoToTop => {
                self.selected = 0;
                self.dirty = true;
            }
            AppEvent::GoToBottom => {
                self.selected = usize::MAX;
                self.dirty = true;
            }
            AppEvent::Select => {
                if self.state.route().is_list() {
                    let vm = render::build_list(&self.state, &self.clock_label);
                    if let Some(card) = vm.cards.get(self.selected.min(vm.cards.len().saturating_sub(1))) {
                        let fragment = card.fragment.clone();
                        self.navigate(&fragment);
                    }
                }
            }
            AppEvent::Back => self.navigate(""),
            AppEvent::None => {}
        }
    }
}

/// Blocking keyboard reader feeding the app channel.
///
/// crossterm's reader blocks, so it lives on its own thread; the poll
/// timeout lets the thread notice a closed channel and exit.
fn spawn_input_thread(tx: mpsc::UnboundedSender<KeyEvent>) {
    std::thread::spawn(move || {
        loop {
            match crossterm::event::poll(Duration::from_millis(250)) {
                Ok(true) => {
                    if let Ok(Event::Key(key)) = crossterm::event::read() {
                        if key.kind == KeyEventKind::Press && tx.send(key).is_err() {
                            break;
                        }
                    }
                }
                Ok(false) => {
                    if tx.is_closed() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "input poll failed");
                    break;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use std::collections::BTreeMap;
    use tempfile::TempDir;
    use vigil_core::clock::ManualClock;
    use vigil_core::types::{Entity, EntityKind};

    fn test_config(dir: &TempDir) -> VigilConfig {
        VigilConfig {
            cache_path: Some(dir.path().join("history.json")),
            ..Default::default()
        }
    }

    fn test_app(dir: &TempDir) -> App {
        let clock = Arc::new(ManualClock::at(1_700_000_000));
        App::with_clock(&test_config(dir), clock).unwrap()
    }

    fn bot(id: &str, status: &str, next_action: i64) -> (String, Entity) {
        (
            id.to_string(),
            Entity {
                id: id.to_string(),
                kind: EntityKind::Bot,
                status: status.to_string(),
                balance: Some("0.42 BNB".into()),
                level: Some(2),
                url: None,
                uptime: None,
                next_action: Some(next_action),
                last_checked: Some("2026-08-06 10:15:00".into()),
            },
        )
    }

    fn snapshot(bots: &[(&str, &str, i64)]) -> Snapshot {
        bots.iter()
            .map(|(id, status, next)| bot(id, status, *next))
            .collect::<BTreeMap<_, _>>()
    }

    fn render(app: &mut App, width: u16, height: u16) -> Buffer {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn buffer_contains(buffer: &Buffer, text: &str) -> bool {
        let area = buffer.area;
        let mut content = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                content.push(buffer[(x, y)].symbol().chars().next().unwrap_or(' '));
            }
            content.push('\n');
        }
        content.contains(text)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_empty_app_renders_placeholder() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        let buffer = render(&mut app, 100, 24);

        assert!(buffer_contains(&buffer, "VIGIL Fleet Monitor"));
        assert!(buffer_contains(&buffer, "Awaiting first sync"));
    }

    #[test]
    fn test_snapshot_renders_cards_and_stats() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.apply_bots(Ok(Some(snapshot(&[
            ("alpha", "ONLINE", 0),
            ("beta", "CRASH detected", 0),
        ]))));

        let buffer = render(&mut app, 100, 24);
        assert!(buffer_contains(&buffer, "ALPHA"));
        assert!(buffer_contains(&buffer, "CRASH DETECTED"));
        assert!(buffer_contains(&buffer, "MONITORS: 2"));
        assert!(buffer_contains(&buffer, "DOWN: 1"));
        // Target 0 means ready now; the render pass set the slot directly.
        assert!(buffer_contains(&buffer, "READY"));
    }

    #[test]
    fn test_failed_fetch_retains_prior_state() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.apply_bots(Ok(Some(snapshot(&[("alpha", "ONLINE", 0)]))));

        app.apply_bots(Err(VigilError::http("http://x", "timeout")));
        app.apply_bots(Ok(None));

        let buffer = render(&mut app, 100, 24);
        assert!(buffer_contains(&buffer, "ALPHA"));
        assert!(buffer_contains(&buffer, "MONITORS: 1"));
    }

    #[test]
    fn test_select_opens_detail_and_back_returns() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.apply_bots(Ok(Some(snapshot(&[("alpha", "SLEEPING", 1_700_000_065)]))));

        let (fetch_tx, _fetch_rx) = mpsc::unbounded_channel();
        app.on_key(key(KeyCode::Enter), &fetch_tx);
        assert_eq!(*app.state.route(), Route::Detail("alpha".into()));

        let buffer = render(&mut app, 100, 30);
        assert!(buffer_contains(&buffer, "Details"));
        assert!(buffer_contains(&buffer, "Avg Ping"));

        app.on_key(key(KeyCode::Esc), &fetch_tx);
        assert_eq!(*app.state.route(), Route::List);
    }

    #[test]
    fn test_countdown_transitions_on_ticks() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::at(1_000));
        let mut app = App::with_clock(&test_config(&dir), clock.clone()).unwrap();
        app.apply_bots(Ok(Some(snapshot(&[("alpha", "ONLINE", 1_065)]))));

        // First render registers the card's timer.
        let _ = render(&mut app, 100, 24);
        assert_eq!(app.engine.live_timers(), 1);

        let (fetch_tx, _fetch_rx) = mpsc::unbounded_channel();
        clock.advance(1);
        app.on_poll(PollEvent::Tick, &fetch_tx);
        let buffer = render(&mut app, 100, 24);
        assert!(buffer_contains(&buffer, "01:04"));

        // Past the target the timer goes terminal and self-cancels.
        clock.advance(70);
        app.on_poll(PollEvent::Tick, &fetch_tx);
        assert_eq!(app.engine.live_timers(), 0);
        let buffer = render(&mut app, 100, 24);
        assert!(buffer_contains(&buffer, "CLAIMING"));
    }

    #[test]
    fn test_detail_route_redirects_when_entity_vanishes() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.apply_bots(Ok(Some(snapshot(&[("alpha", "ONLINE", 0)]))));

        let (fetch_tx, _fetch_rx) = mpsc::unbounded_channel();
        app.on_key(key(KeyCode::Enter), &fetch_tx);
        assert_eq!(*app.state.route(), Route::Detail("alpha".into()));

        // alpha disappears from the next snapshot; the merge reroutes.
        app.apply_bots(Ok(Some(snapshot(&[("beta", "ONLINE", 0)]))));
        assert_eq!(*app.state.route(), Route::List);
    }

    #[test]
    fn test_quit_keys_stop_the_loop() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        let (fetch_tx, _fetch_rx) = mpsc::unbounded_channel();

        app.on_key(key(KeyCode::Char('q')), &fetch_tx);
        assert!(app.should_quit);
    }
}
