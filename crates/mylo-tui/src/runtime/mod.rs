//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! - Client calls are spawned as tokio tasks
//! - Each task sends its result to `inbox_tx` wrapped in `TaskCompleted`
//! - The runtime drains `inbox_rx` each frame and feeds the reducer
//!
//! Structure:
//! - `mod.rs`: Core runtime (TuiRuntime, event loop, effect dispatch)
//! - `inbox.rs`: Inbox channel types
//! - `handlers.rs`: Client call handlers

pub(crate) mod handlers;
mod inbox;

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use mylo_core::clients::Clients;
use tokio::sync::mpsc;

use crate::common::{TaskCompleted, TaskId, TaskKind};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::terminal::{self, TuiTerminal};
use crate::{render, update};

/// Tick interval while a task is in flight (spinner animation).
pub const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Tick interval when nothing is running.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(250);

/// Full-screen TUI runtime.
///
/// Owns the terminal, the state and the clients. Terminal state is restored
/// on drop and on panic.
pub struct TuiRuntime {
    terminal: TuiTerminal,
    pub state: AppState,
    clients: Clients,
    /// Inbox sender - spawned tasks send events here.
    inbox_tx: UiEventSender,
    /// Inbox receiver - runtime drains this each frame.
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Creates a new TUI runtime and takes over the terminal.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(clients: Clients) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state: AppState::new(),
            clients,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until the user quits.
    ///
    /// Must be called from within a tokio runtime; client calls are spawned on it.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!("TUI started");
        let mut dirty = true;

        while !self.state.should_quit {
            let events = self.collect_events()?;

            for event in events {
                // Ticks drive spinner/notice changes; input and results change screens.
                dirty = true;
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        tracing::info!("TUI exiting");
        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.state.tasks.is_any_running() || self.state.notice.is_some() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        self.collect_inbox_events(&mut events);

        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    /// Drains all events from the inbox channel.
    fn collect_inbox_events(&mut self, events: &mut Vec<UiEvent>) {
        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns a client call and reports its result as `TaskCompleted`.
    fn spawn_task<Fut>(&self, kind: TaskKind, id: TaskId, fut: Fut)
    where
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let inner = fut.await;
            let completed = TaskCompleted {
                id,
                result: Box::new(inner),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        tracing::debug!(effect = effect.name(), "Executing effect");
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::SignIn { task, credentials } => {
                let auth = self.clients.auth.clone();
                self.spawn_task(
                    TaskKind::SignIn,
                    task,
                    handlers::sign_in(auth, credentials),
                );
            }
            UiEffect::SignUp { task, credentials } => {
                let auth = self.clients.auth.clone();
                self.spawn_task(
                    TaskKind::SignUp,
                    task,
                    handlers::sign_up(auth, credentials),
                );
            }
            UiEffect::SignOut => {
                handlers::sign_out(self.clients.auth.as_ref());
            }
            UiEffect::LoadProfile { task, user_id } => {
                let profiles = self.clients.profiles.clone();
                self.spawn_task(
                    TaskKind::ProfileLoad,
                    task,
                    handlers::load_profile(profiles, user_id),
                );
            }
            UiEffect::SaveProfile {
                task,
                user_id,
                profile,
            } => {
                let profiles = self.clients.profiles.clone();
                self.spawn_task(
                    TaskKind::ProfileSave,
                    task,
                    handlers::save_profile(profiles, user_id, profile),
                );
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
