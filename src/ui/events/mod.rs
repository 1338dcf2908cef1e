// Event handling and main UI loop

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::control::{Dispatch, JobController, ProgressSubscriber};
use crate::engine::{Backend, BackendEvent, FfmpegBackend, Worker};
use crate::ui::{
    Converter, NoticeModal, PromptModal, QuitModal,
    state::{AppState, NoticeKind, QuitConfirmationState},
};

mod backend;
mod converter;
mod prompt;

pub use backend::handle_backend_event;

// Event types sent from dedicated event thread to main loop
enum UiEvent {
    Input(Event), // Keyboard, mouse, or other terminal events
    Tick,         // Periodic update for rendering
}

/// Spawn a dedicated thread for event polling.
fn spawn_event_thread(tx: mpsc::Sender<UiEvent>) {
    let tick_rate = Duration::from_millis(50);

    thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::from_secs(0));

            if event::poll(timeout).unwrap_or(false) {
                if let Ok(evt) = event::read() {
                    if tx.send(UiEvent::Input(evt)).is_err() {
                        break; // Main thread dropped the receiver
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                if tx.send(UiEvent::Tick).is_err() {
                    break;
                }
                last_tick = Instant::now();
            }
        }
    });
}

pub fn run_ui(input: Option<PathBuf>, config: &Config) -> io::Result<()> {
    let backend: Arc<dyn Backend> = Arc::new(FfmpegBackend::from_config(config));
    let mut worker = Worker::new(backend);
    let subscriber = match worker.take_progress_receiver() {
        Some(rx) => ProgressSubscriber::subscribe(rx),
        None => ProgressSubscriber::detached(),
    };

    let mut app_state = AppState::new(JobController::new(worker.handle()), subscriber, config);
    if let Some(path) = input {
        if let Some(err) = converter::select_input(&mut app_state, &path.to_string_lossy()) {
            app_state.show_notice(NoticeKind::Error, "Invalid input", err);
        }
    }
    worker.handle().fetch_catalog();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let (event_tx, event_rx) = mpsc::channel();
    spawn_event_thread(event_tx);

    let result = run_app(&mut terminal, &mut app_state, &worker, event_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if app_state.awaiting_cancel {
        wait_for_cancel(&worker, Duration::from_secs(3));
    }

    result
}

/// Give a cancel issued on exit the chance to reach ffmpeg before the process ends
fn wait_for_cancel(worker: &Worker, timeout: Duration) {
    let deadline = Instant::now() + timeout;
    while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
        match worker.receiver().recv_timeout(remaining) {
            Ok(BackendEvent::CancelResolved(result)) => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "cancel on exit failed");
                }
                return;
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }
    tracing::warn!("cancel on exit not acknowledged");
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    worker: &Worker,
    event_rx: Receiver<UiEvent>,
) -> io::Result<()> {
    loop {
        let mut pending_ticks: u64 = 0;
        let mut pending_inputs: Vec<Event> = Vec::new();

        // Always block for at least one event, then drain the queue
        match event_rx.recv() {
            Ok(UiEvent::Tick) => pending_ticks += 1,
            Ok(UiEvent::Input(ev)) => pending_inputs.push(ev),
            Err(_) => return Ok(()),
        }
        while let Ok(evt) = event_rx.try_recv() {
            match evt {
                UiEvent::Tick => pending_ticks += 1,
                UiEvent::Input(ev) => pending_inputs.push(ev),
            }
        }

        // Input first so commands are never stuck behind a tick backlog
        for input in pending_inputs {
            if let Event::Key(key) = input {
                if key.kind == KeyEventKind::Press && handle_key(key, state) {
                    return Ok(());
                }
            }
        }

        state.tick += pending_ticks;

        // Progress before resolutions, so a resolution always ends the job last
        state.progress.drain(&mut state.job);

        // Process at most 10 messages per frame to keep UI responsive
        for _ in 0..10 {
            match worker.receiver().try_recv() {
                Ok(msg) => handle_backend_event(msg, state),
                Err(_) => break,
            }
        }

        terminal.draw(|frame| {
            Converter::render(frame, state);

            if let Some(ref mut prompt) = state.prompt {
                PromptModal::render(frame, prompt);
            }
            if let Some(ref notice) = state.notice {
                NoticeModal::render(frame, notice);
            }
            if let Some(ref quit) = state.quit_confirmation {
                QuitModal::render(frame, quit);
            }
        })?;
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Route a key press. Returns true when the app should exit.
pub fn handle_key<D: Dispatch>(key: KeyEvent, state: &mut AppState<D>) -> bool {
    if state.quit_confirmation.is_some() {
        return handle_quit_key(key, state);
    }

    if state.prompt.is_some() {
        prompt::handle_prompt_key(key, state);
        return false;
    }

    if state.notice.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            state.notice = None;
        }
        return false;
    }

    if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) || is_ctrl_c(&key) {
        if state.job.is_active() {
            state.quit_confirmation = Some(QuitConfirmationState {
                phase: state.job.phase().label(),
            });
            return false;
        }
        return true;
    }

    converter::handle_converter_key(key, state);
    false
}

fn handle_quit_key<D: Dispatch>(key: KeyEvent, state: &mut AppState<D>) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            state.quit_confirmation = None;
            if let Some(outcome) = state.job.cancel() {
                state.awaiting_cancel = true;
                state.apply_outcome(outcome);
            }
            true
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.quit_confirmation = None;
            false
        }
        _ => false,
    }
}
