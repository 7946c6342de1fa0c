//! Fixed-timestep driver
//!
//! The host calls [`GameLoop::frame`] once per displayed frame with the
//! elapsed wall time. Simulation always advances in whole ticks of
//! `1 / fps` seconds; leftover time carries to the next frame.

use crate::consts::MAX_SUBSTEPS;
use crate::renderer::{self, SpriteInstance};
use crate::sim::{GameEvent, GameState, TickInput, tick};

/// Receives the sprite snapshot after each host frame
pub trait RenderSink {
    fn present(&mut self, state: &GameState, sprites: &[SpriteInstance]);
}

/// Discards every frame (headless runs)
impl RenderSink for () {
    fn present(&mut self, _state: &GameState, _sprites: &[SpriteInstance]) {}
}

pub struct GameLoop {
    pub state: GameState,
    accumulator: f32,
    sim_dt: f32,
    /// Held keys plus pending one-shot commands
    input: TickInput,
}

impl GameLoop {
    pub fn new(state: GameState) -> Self {
        let sim_dt = 1.0 / state.tuning().fps.max(1) as f32;
        Self {
            state,
            accumulator: 0.0,
            sim_dt,
            input: TickInput::default(),
        }
    }

    /// Seconds per simulation tick
    #[inline]
    pub fn sim_dt(&self) -> f32 {
        self.sim_dt
    }

    /// Replace the held-key state. Pending pause/restart presses are kept
    /// until a tick consumes them.
    pub fn set_input(&mut self, input: TickInput) {
        let pause = self.input.pause || input.pause;
        let restart = self.input.restart || input.restart;
        self.input = TickInput {
            pause,
            restart,
            ..input
        };
    }

    /// Run the ticks owed for `elapsed` seconds, then hand a snapshot to
    /// `sink`. Returns the number of ticks run.
    pub fn frame(&mut self, elapsed: f32, sink: &mut impl RenderSink) -> u32 {
        let elapsed = elapsed.clamp(0.0, 0.25);
        self.accumulator += elapsed;

        let mut substeps = 0;
        while self.accumulator >= self.sim_dt && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input);
            self.accumulator -= self.sim_dt;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.pause = false;
            self.input.restart = false;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= self.sim_dt {
            log::warn!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        let sprites = renderer::snapshot(&self.state);
        sink.present(&self.state, &sprites);
        substeps
    }

    /// Take events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
