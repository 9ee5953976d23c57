use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::game::{GameConfig, GameEvent, GameSession, Phase};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::render::Renderer;
use crate::storage::HighScoreStore;

/// The interactive game: terminal in, terminal out
///
/// One tokio select loop interleaves keyboard events and render frames;
/// each frame reports its measured elapsed time to the session, which
/// decides how many simulation ticks are due.
pub struct PlayMode {
    session: GameSession,
    config: GameConfig,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>) -> Self {
        Self {
            session: GameSession::new(config.clone(), store),
            config,
            metrics: SessionMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS; the session's scheduler turns frame time
        // into simulation ticks at whatever the current tick rate is.
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);
        let mut last_frame = Instant::now();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Advance the simulation and draw a frame
                _ = render_timer.tick() => {
                    let now = Instant::now();
                    let elapsed = now - last_frame;
                    last_frame = now;

                    self.session.on_frame(elapsed);
                    for event in self.session.poll_events() {
                        if event == GameEvent::GameOver {
                            self.metrics.on_game_over();
                        }
                    }

                    self.metrics.update();
                    let snapshot = self.session.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.apply_action(action);
        }
    }

    fn apply_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Steer(direction) => {
                self.session.set_requested_direction(direction);
            }
            KeyAction::Start => {
                // Ignored mid-run; only a fresh or finished board starts.
                if matches!(self.session.phase(), Phase::NotStarted | Phase::GameOver) {
                    self.session.start(self.config.clone());
                    self.metrics.on_game_start();
                }
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
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
