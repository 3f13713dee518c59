use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval, sleep};

use crate::game::{GameConfig, GameEngine, GameSession, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// How long the final frame stays on screen after a collision
const GAME_OVER_LINGER: Duration = Duration::from_millis(1500);

/// Run terminal setup; if it fails, undo whatever raw-mode state it left behind
fn setup_or_restore<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    setup().inspect_err(|_| restore())
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Quit,
    GameOver,
}

pub struct HumanMode {
    session: GameSession,
    tick_interval: Duration,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate().context("Invalid game configuration")?;

        let tick_interval = config.tick_period();
        let session = GameSession::new(GameEngine::new(config)).context("Failed to start game")?;

        Ok(Self {
            session,
            tick_interval,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    /// Latest state produced by the session
    pub fn state(&self) -> &GameState {
        self.session.current()
    }

    pub fn final_score(&self) -> u32 {
        self.session.current().score
    }

    pub async fn run(&mut self) -> Result<LoopExit> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut terminal = setup_or_restore(Self::setup_terminal, || {
            let _ = execute!(stderr(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        })?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stderr>>> {
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;
        Ok(terminal)
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<LoopExit> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.tick_interval);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The opening state is on screen before the first tick fires
        tick_timer.tick().await;
        self.draw(terminal)?;

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(&event),
                        Some(Err(err)) => warn!("Terminal event error: {err}"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game()?;
                    self.draw(terminal)?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("Quit requested after {} ticks", self.metrics.ticks);
                return Ok(LoopExit::Quit);
            }

            if self.session.is_over() {
                info!(
                    "Game over after {} ticks, {} food eaten",
                    self.metrics.ticks, self.metrics.food_eaten
                );
                self.linger(&mut event_stream).await;
                return Ok(LoopExit::GameOver);
            }
        }
    }

    /// Keep the final frame up for a moment; a quit key cuts it short
    async fn linger(&mut self, event_stream: &mut EventStream) {
        let deadline = sleep(GAME_OVER_LINGER);
        tokio::pin!(deadline);

        while !self.should_quit {
            tokio::select! {
                _ = &mut deadline => return,
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(&event),
                        Some(Err(err)) => warn!("Terminal event error: {err}"),
                        None => return,
                    }
                }
                _ = tokio::signal::ctrl_c() => return,
            }
        }
    }

    fn handle_event(&mut self, event: &Event) {
        match self.input_handler.handle_event(event) {
            KeyAction::Turn(direction) => {
                self.session.steer(direction);
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self) -> Result<()> {
        if self.session.is_over() {
            return Ok(());
        }

        let event = self.session.tick().context("Failed to advance game")?;
        self.metrics.on_tick(event);
        Ok(())
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        self.metrics.update();
        terminal
            .draw(|frame| {
                self.renderer.render(frame, self.session.current(), &self.metrics);
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
