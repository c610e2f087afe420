//! Live terminal dashboard.
//!
//! The loop only reads the tracker; the single mutation after start-up is
//! the clock-out performed by the `AutoClockOut` guard once the loop ends.

use crate::config::Config;
use crate::core::store::SessionStore;
use crate::core::tracker::{AutoClockOut, SessionTracker};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::{BillingPolicy, Session};
use crate::ui::messages::{info, success, warning};
use crate::ui::prompt::prompt_memo;
use crate::ui::view::DashboardView;
use crate::utils::formatting::{hms, hour_clock, money};
use crate::utils::time::{self, format_timestamp};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};
use std::io::{self, BufReader, IsTerminal, Read, Stdout, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

const TITLE: &str = " TIMECLOCK TERMINAL ";
const FOOTER: &str = "q / Esc / Ctrl+C to quit";
/// Longest single wait on input, so a signal is noticed quickly.
const POLL_SLICE: Duration = Duration::from_millis(200);

type MemoResult = AppResult<Option<String>>;

/// Something the dashboard can draw on and give back before the memo prompt.
pub trait Screen {
    type Backend: Backend;

    fn terminal(&mut self) -> &mut Terminal<Self::Backend>;
}

impl<B: Backend> Screen for Terminal<B> {
    type Backend = B;

    fn terminal(&mut self) -> &mut Terminal<B> {
        self
    }
}

/// Raw mode plus alternate screen, restored on drop (panics included).
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn enter() -> AppResult<Self> {
        if !io::stdout().is_terminal() {
            return Err(AppError::Terminal(
                "the dashboard needs an interactive terminal (try `rtimeclock status`)".into(),
            ));
        }

        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
                Err(e.into())
            }
        }
    }
}

impl Screen for TerminalSession {
    type Backend = CrosstermBackend<Stdout>;

    fn terminal(&mut self) -> &mut Terminal<Self::Backend> {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// SIGINT, SIGTERM and SIGHUP only raise the returned flag.
fn register_shutdown_flag() -> AppResult<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));

    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&flag))?;
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&flag))?;
    #[cfg(unix)]
    signal_hook::flag::register(signal_hook::consts::SIGHUP, Arc::clone(&flag))?;

    Ok(flag)
}

/// Raw mode turns Ctrl+C into a key event instead of SIGINT.
fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Next key press from the terminal, waiting at most `timeout`.
fn next_terminal_key(timeout: Duration) -> AppResult<Option<KeyEvent>> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
    {
        return Ok(Some(key));
    }
    Ok(None)
}

pub fn draw(frame: &mut Frame, view: &DashboardView) {
    let border = if view.is_active() {
        Color::LightCyan
    } else {
        Color::DarkGray
    };

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(border))
        .title(TITLE)
        .title_alignment(Alignment::Center);

    let area = frame.area();
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let gauge_height = if view.is_active() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(gauge_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    if let Some(active) = &view.active {
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Current Hour Progress"),
            )
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
            .ratio(active.hour_progress.clamp(0.0, 1.0))
            .label(hour_clock(active.elapsed_secs));
        frame.render_widget(gauge, chunks[0]);
    }

    let mut lines: Vec<Line> = Vec::new();
    match &view.active {
        Some(a) => {
            lines.push(Line::from(format!(
                "Clocked In: {}",
                a.start_time.format("%I:%M %p")
            )));
            lines.push(Line::from(format!("Elapsed: {}", hms(a.elapsed_secs))));
            lines.push(Line::from(format!("Hourly Rate: {}", money(view.hourly_rate))));
            lines.push(Line::from(""));
            lines.push(
                Line::from(format!("Session Earnings: {}", money(a.session_earnings)))
                    .style(Style::default().fg(Color::Yellow)),
            );
        }
        None => {
            lines.push(
                Line::from("Status: Not clocked in").style(Style::default().fg(Color::Gray)),
            );
            lines.push(Line::from(format!("Hourly Rate: {}", money(view.hourly_rate))));
            lines.push(Line::from(""));
            lines.push(Line::from(format!("Session Earnings: {}", money(0.0))));
        }
    }
    lines.push(
        Line::from(format!(
            "Pay Period Earnings: {}",
            money(view.period_totals.total_earnings)
        ))
        .style(
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        ),
    );
    lines.push(Line::from(view.period.label()).style(Style::default().fg(Color::Gray)));
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "Current Time: {}",
        view.now.format("%I:%M:%S %p")
    )));

    frame.render_widget(Paragraph::new(lines), chunks[1]);
    frame.render_widget(
        Paragraph::new(FOOTER)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        chunks[2],
    );
}

/// Redraw every `tick` until a quit key or the shutdown flag.
fn event_loop<B, S, K>(
    terminal: &mut Terminal<B>,
    tracker: &SessionTracker<S>,
    policy: &BillingPolicy,
    tick: Duration,
    shutdown: &AtomicBool,
    next_key: &mut K,
) -> AppResult<()>
where
    B: Backend,
    S: SessionStore,
    K: FnMut(Duration) -> AppResult<Option<KeyEvent>>,
{
    loop {
        let view = DashboardView::capture(tracker, policy, time::now())?;
        terminal.draw(|f| draw(f, &view))?;

        let deadline = Instant::now() + tick;
        loop {
            if shutdown.load(Ordering::Relaxed) {
                log::info!("Shutdown signal received, leaving dashboard");
                return Ok(());
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            if let Some(key) = next_key(remaining.min(POLL_SLICE))?
                && is_quit_key(&key)
            {
                log::info!("Quit requested from keyboard");
                return Ok(());
            }
        }
    }
}

/// Read the memo on a helper thread; a blocked stdin read never sees signals.
fn spawn_memo_reader<R, W>(input: R, output: W) -> Receiver<MemoResult>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut input = BufReader::new(input);
        let mut output = output;
        let _ = tx.send(prompt_memo(&mut input, &mut output));
    });
    rx
}

/// The typed memo, or `None` as soon as the shutdown flag rises.
fn wait_for_memo(rx: &Receiver<MemoResult>, shutdown: &AtomicBool) -> Option<String> {
    loop {
        if shutdown.load(Ordering::Relaxed) {
            log::info!("Shutdown signal received while waiting for the memo");
            return None;
        }

        match rx.recv_timeout(POLL_SLICE) {
            Ok(Ok(memo)) => return memo,
            Ok(Err(e)) => {
                log::warn!("Memo prompt failed: {e}");
                return None;
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => return None,
        }
    }
}

/// What a dashboard run did to the tracker.
#[derive(Debug)]
pub struct DashboardExit {
    /// Session left open by an earlier process and picked up again.
    pub resumed: Option<Session>,
    /// Session opened by `auto_clock_in`.
    pub opened: Option<Session>,
    pub closed: Option<Session>,
    /// Still clocked in after the run (`auto_clock_out` off).
    pub left_open: bool,
    /// Result of the refresh loop; the clock-out happens either way.
    pub loop_result: AppResult<()>,
}

/// Start-up, refresh loop and shutdown of one dashboard run.
///
/// `screen` is dropped before the memo prompt. `memo_io` is `None` when
/// there is nobody to ask.
pub fn run_session<Sc, S, K, R, W>(
    mut screen: Sc,
    tracker: &mut SessionTracker<S>,
    cfg: &Config,
    shutdown: &AtomicBool,
    mut next_key: K,
    memo_io: Option<(R, W)>,
) -> AppResult<DashboardExit>
where
    Sc: Screen,
    S: SessionStore,
    K: FnMut(Duration) -> AppResult<Option<KeyEvent>>,
    R: Read + Send + 'static,
    W: Write + Send + 'static,
{
    let policy = cfg.billing_policy()?;

    let resumed = tracker.active_session().cloned();
    let opened = if resumed.is_none() && cfg.auto_clock_in {
        Some(tracker.clock_in()?)
    } else {
        None
    };

    let guard = AutoClockOut::new(tracker, cfg.auto_clock_out);

    let loop_result = event_loop(
        screen.terminal(),
        guard.tracker(),
        &policy,
        cfg.refresh_interval(),
        shutdown,
        &mut next_key,
    );
    drop(screen);

    let ask = loop_result.is_ok() && guard.will_clock_out() && !shutdown.load(Ordering::Relaxed);
    let memo = match memo_io {
        Some((input, output)) if ask => {
            let rx = spawn_memo_reader(input, output);
            wait_for_memo(&rx, shutdown)
        }
        _ => None,
    };

    let closed = guard.release(memo.as_deref())?;

    Ok(DashboardExit {
        resumed,
        opened,
        closed,
        left_open: tracker.is_active(),
        loop_result,
    })
}

/// Run the dashboard against the database at `db_path`.
pub fn run_dashboard(cfg: &Config, db_path: &Path) -> AppResult<()> {
    cfg.billing_policy()?;
    let pool = DbPool::open(db_path)?;
    pool.set_setting("hourly_rate", &format!("{:.2}", cfg.hourly_rate))?;

    let mut tracker = SessionTracker::new(pool, cfg.hourly_rate)?;
    let shutdown = register_shutdown_flag()?;

    // nothing is clocked in unless the screen is up
    let screen = TerminalSession::enter()?;

    let memo_io = io::stdin()
        .is_terminal()
        .then(|| (io::stdin(), io::stdout()));

    let exit = run_session(
        screen,
        &mut tracker,
        cfg,
        &shutdown,
        next_terminal_key,
        memo_io,
    )?;

    if let Some(s) = &exit.resumed {
        info(format!(
            "Resumed session started at {}",
            format_timestamp(&s.start_time)
        ));
    }
    if let Some(s) = &exit.opened {
        info(format!("Clocked in at {}", format_timestamp(&s.start_time)));
    }
    if let Some(closed) = &exit.closed {
        success(format!(
            "Auto clocked out! Session earnings: {}",
            money(closed.earnings.unwrap_or(0.0))
        ));
    }
    if exit.left_open {
        warning("Session left open (auto_clock_out is off).");
    }

    exit.loop_result
}
