//! Tilt Tetris runner (default binary).
//!
//! Drives the piece controller at a fixed tick. Commands come from the gesture relay
//! through the TCP listener, with the keyboard feeding the same mailbox as a fallback.
//! Set `TILT_TETRIS_HEADLESS=1` to run without the terminal view.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};

use tilt_tetris::adapter::CommandListener;
use tilt_tetris::core::{
    Board, CommandMailbox, EffectState, Grid, PieceController, SimClock, TimingConfig,
};
use tilt_tetris::input::{handle_key_event, should_quit, KeyAction};
use tilt_tetris::term::{BoardView, FrameBuffer, HudStatus, LinkStatus, TerminalRenderer, Viewport};
use tilt_tetris::types::TICK_MS;

struct Game {
    grid: Grid,
    effects: EffectState,
    controller: PieceController<CommandMailbox>,
    clock: SimClock,
    last_tick: Instant,
}

impl Game {
    fn new(timing: &TimingConfig, mailbox: CommandMailbox) -> Self {
        let mut grid = Grid::new(seed());
        let clock = SimClock::new();
        let mut controller = PieceController::new(timing, mailbox);
        controller.initialize(grid.spawn_piece(), clock.now());

        Self {
            grid,
            effects: EffectState::new(),
            controller,
            clock,
            last_tick: Instant::now(),
        }
    }

    /// Time left until the next tick is due
    fn until_next_tick(&self) -> Duration {
        Duration::from_millis(TICK_MS).saturating_sub(self.last_tick.elapsed())
    }

    /// Run one tick if it is due
    fn update(&mut self) -> bool {
        let delta = self.last_tick.elapsed();
        if delta < Duration::from_millis(TICK_MS) {
            return false;
        }
        self.last_tick = Instant::now();

        let frame = self.clock.advance(delta);
        self.controller.tick(&mut self.grid, &mut self.effects, frame);
        self.effects.update(frame.delta);
        true
    }

    fn status(&self, listener: Option<&CommandListener>) -> HudStatus {
        let link = match listener {
            None => LinkStatus::Disabled,
            Some(l) if l.is_finished() => LinkStatus::Lost,
            Some(_) => LinkStatus::Live,
        };
        HudStatus {
            link,
            input: self.controller.input_state(),
            pieces_locked: self.controller.pieces_locked(),
            pieces_destroyed: self.controller.pieces_destroyed(),
            lines_cleared: self.controller.lines_cleared(),
            games_over: self.grid.games_over(),
        }
    }
}

fn main() -> Result<()> {
    let timing = TimingConfig::from_env().context("invalid timing configuration")?;
    println!(
        "[Config] step={}ms move={}ms lock={}ms",
        timing.step_delay_ms, timing.move_delay_ms, timing.lock_delay_ms
    );

    let mailbox = CommandMailbox::new();
    let mut listener = CommandListener::start_from_env(mailbox.clone())?;
    let mut game = Game::new(&timing, mailbox.clone());

    let result = if is_headless() {
        run_headless(&mut game, listener.as_ref())
    } else {
        let mut term = TerminalRenderer::new();
        term.enter()?;
        let result = run(&mut term, &mut game, &mailbox, listener.as_ref());
        // Always try to restore terminal state.
        let _ = term.exit();
        result
    };

    if let Some(listener) = listener.as_mut() {
        listener.shutdown();
    }
    result
}

fn run(
    term: &mut TerminalRenderer,
    game: &mut Game,
    mailbox: &CommandMailbox,
    listener: Option<&CommandListener>,
) -> Result<()> {
    let view = BoardView::default();
    let mut fb = FrameBuffer::new(0, 0);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(
            &game.grid,
            &game.effects,
            &game.status(listener),
            Viewport::new(w, h),
            &mut fb,
        );
        term.draw(&fb)?;

        // Input with timeout until next tick.
        if event::poll(game.until_next_tick())? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    match handle_key_event(key) {
                        Some(KeyAction::Send(cmd)) => {
                            if let Some(tag) = cmd.as_str() {
                                mailbox.send(tag);
                            }
                        }
                        Some(KeyAction::HardDrop) => {
                            game.controller.hard_drop(&mut game.grid);
                        }
                        None => {}
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        game.update();
    }
}

/// Tick without a terminal until the relay link ends
fn run_headless(game: &mut Game, listener: Option<&CommandListener>) -> Result<()> {
    let Some(listener) = listener else {
        println!("[Piece] Headless mode needs the listener; nothing to do");
        return Ok(());
    };

    println!("[Piece] Running headless, stop the relay to exit");
    let mut reported = (0, 0, 0);
    while !listener.is_finished() {
        std::thread::sleep(game.until_next_tick());
        game.update();

        let status = game.status(Some(listener));
        let counts = (status.pieces_locked, status.pieces_destroyed, status.games_over);
        if counts.0 != reported.0 {
            println!(
                "[Piece] Locked {} pieces, {} lines cleared",
                status.pieces_locked, status.lines_cleared
            );
        }
        if counts.1 != reported.1 {
            println!("[Piece] Destroyed piece #{}", status.pieces_destroyed);
        }
        if counts.2 != reported.2 {
            println!("[Board] Spawn blocked, playfield cleared (game over #{})", status.games_over);
        }
        reported = counts;
    }
    Ok(())
}

fn is_headless() -> bool {
    std::env::var("TILT_TETRIS_HEADLESS")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

fn seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
