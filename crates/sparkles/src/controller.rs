//! Pen activation state machine
//!
//! [`PenController`] is the single owner of everything the pen allocates in a
//! page: configuration, particle pool, overlay surface, pointer listener and
//! animation loop. One instance lives per page context; there is no global
//! state.
//!
//! Activation acquires surface -> pointer listener -> animation loop, and
//! deactivation releases them in the reverse order. Both are idempotent.

use glam::DVec2;
use sparkle_pen_config::SimulationConfig;
use sparkle_pen_ipc::{
    ConfigResponse, ErrorResponse, PenCommand, PenResponse, ResponseStatus, SparkleConfig,
    SparkleConfigPatch, StatusResponse, ToggleResponse, decode_command, response_json,
};
use tracing::{debug, info, warn};

use crate::canvas::OverlaySurface;
use crate::error::HostError;
use crate::host::{FrameScheduler, PointerSource, SurfaceHost};
use crate::input::InputCapture;
use crate::pool::ParticlePool;
use crate::scheduler::{AnimationScheduler, FrameOutcome};
use crate::surface::SurfaceManager;

/// Activation state of the pen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenState {
    #[default]
    Inactive,
    Active,
}

impl PenState {
    pub fn is_active(self) -> bool {
        self == PenState::Active
    }
}

/// Ties surface, input and animation into an on/off toggle driven by
/// [`PenCommand`]s.
pub struct PenController<S: SurfaceHost, P: PointerSource, F: FrameScheduler> {
    state: PenState,
    config: SparkleConfig,
    simulation: SimulationConfig,
    pool: ParticlePool,
    surface: SurfaceManager<S>,
    input: InputCapture<P>,
    scheduler: AnimationScheduler<F>,
    last_pointer: Option<DVec2>,
}

impl<S, P, F> PenController<S, P, F>
where
    S: SurfaceHost,
    P: PointerSource,
    F: FrameScheduler,
{
    /// Create an inactive controller with default simulation tunables
    pub fn new(surface_host: S, pointer_source: P, frame_scheduler: F, seed: u64) -> Self {
        Self::with_simulation(
            surface_host,
            pointer_source,
            frame_scheduler,
            SimulationConfig::default(),
            seed,
        )
    }

    /// Create an inactive controller with custom simulation tunables.
    ///
    /// Tunables with an empty range or non-positive lifetime are replaced by
    /// the defaults.
    pub fn with_simulation(
        surface_host: S,
        pointer_source: P,
        frame_scheduler: F,
        simulation: SimulationConfig,
        seed: u64,
    ) -> Self {
        let simulation = if simulation.is_valid() {
            simulation
        } else {
            warn!("Invalid simulation config {:?}, using defaults", simulation);
            SimulationConfig::default()
        };

        Self {
            state: PenState::Inactive,
            config: SparkleConfig::default(),
            simulation,
            pool: ParticlePool::with_seed(seed),
            surface: SurfaceManager::new(surface_host),
            input: InputCapture::new(pointer_source),
            scheduler: AnimationScheduler::new(frame_scheduler),
            last_pointer: None,
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Dispatch a command. Always produces a response.
    pub fn handle(&mut self, command: PenCommand) -> PenResponse {
        debug!("Handling command: {}", command.action());
        match command {
            PenCommand::ActivatePen => PenResponse::Toggle(self.activate()),
            PenCommand::DeactivatePen => PenResponse::Toggle(self.deactivate()),
            PenCommand::GetPenStatus => PenResponse::Status(self.status()),
            PenCommand::UpdateSparkleConfig { config } => {
                PenResponse::Config(self.update_config(config))
            }
        }
    }

    /// JSON boundary around [`handle`](Self::handle).
    ///
    /// Undecodable requests get an error response instead of failing.
    pub fn handle_json(&mut self, request: &str) -> String {
        let response = match decode_command(request) {
            Ok(command) => self.handle(command),
            Err(e) => {
                warn!("Rejected malformed command: {}", e);
                PenResponse::Error(ErrorResponse::new(e.to_string()))
            }
        };

        response_json(&response)
    }

    /// Turn the pen on: surface, then pointer listener, then animation loop.
    ///
    /// If the host refuses any resource, everything acquired so far is
    /// released and the pen stays inactive.
    pub fn activate(&mut self) -> ToggleResponse {
        if self.state.is_active() {
            debug!("Sparkle Pen already active");
            return self.toggle_response(ResponseStatus::Success);
        }

        self.state = PenState::Active;
        match self.acquire() {
            Ok(()) => {
                info!("Sparkle Pen activated");
                self.toggle_response(ResponseStatus::Success)
            }
            Err(e) => {
                warn!("Sparkle Pen activation failed: {}", e);
                self.state = PenState::Inactive;
                self.release();
                self.toggle_response(ResponseStatus::Error)
            }
        }
    }

    /// Turn the pen off: pointer listener, then animation loop, then surface
    pub fn deactivate(&mut self) -> ToggleResponse {
        if !self.state.is_active() {
            debug!("Sparkle Pen already inactive");
            return self.toggle_response(ResponseStatus::Success);
        }

        self.state = PenState::Inactive;
        self.release();
        info!("Sparkle Pen deactivated");
        self.toggle_response(ResponseStatus::Success)
    }

    /// Current state and configuration, without side effects
    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            is_pen_active: self.state.is_active(),
            current_sparkle_config: self.config.clone(),
        }
    }

    /// Shallow-merge `patch` into the configuration. Valid in any state.
    pub fn update_config(&mut self, patch: SparkleConfigPatch) -> ConfigResponse {
        self.config.merge(patch);
        info!("Sparkle config updated: shape={}", self.config.shape);
        if !self.config.shape.is_known() {
            warn!(
                "Unrecognised sparkle shape '{}', particles will not be drawn",
                self.config.shape
            );
        }

        ConfigResponse {
            status: ResponseStatus::Success,
            new_config: self.config.clone(),
        }
    }

    fn acquire(&mut self) -> Result<(), HostError> {
        self.surface.create()?;
        self.input.attach()?;
        self.scheduler.start()
    }

    fn release(&mut self) {
        self.input.detach();
        self.stop_animation();
        self.destroy_surface();
    }

    fn toggle_response(&self, status: ResponseStatus) -> ToggleResponse {
        ToggleResponse {
            status,
            is_pen_active: self.state.is_active(),
            current_sparkle_config: self.config.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Host callbacks
    // ------------------------------------------------------------------

    /// Pointer moved to `(x, y)` in viewport pixels.
    ///
    /// While active, spawns a burst of particles there and makes sure the
    /// animation loop is running. Returns whether anything was spawned.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> bool {
        if !self.state.is_active() {
            return false;
        }

        self.last_pointer = Some(DVec2::new(x, y));
        self.pool.spawn(
            x,
            y,
            self.simulation.particles_per_move,
            &self.config.shape,
            &self.simulation,
        );

        if let Err(e) = self.scheduler.start() {
            warn!("Could not start animation: {}", e);
        }
        true
    }

    /// Run one animation frame: clear, step the pool, request the next frame.
    pub fn on_frame(&mut self) -> FrameOutcome {
        if !self.scheduler.begin_frame() {
            return FrameOutcome::Idle;
        }

        let Some(surface) = self.surface.surface_mut() else {
            warn!("Overlay surface not available, stopping animation");
            self.scheduler.stop::<S::Surface>(&mut self.pool, None);
            return FrameOutcome::Stopped;
        };

        surface.clear();
        self.pool.step(&self.config.shape, &self.simulation, surface);

        if let Err(e) = self.scheduler.reschedule() {
            warn!("Could not schedule next frame: {}", e);
        }

        FrameOutcome::Rendered {
            live: self.pool.len(),
        }
    }

    /// Viewport changed size
    pub fn on_resize(&mut self) {
        self.surface.resize_to_viewport();
    }

    // ------------------------------------------------------------------
    // Component access
    // ------------------------------------------------------------------

    /// Ensure the animation loop is scheduled
    pub fn start_animation(&mut self) -> Result<(), HostError> {
        self.scheduler.start()
    }

    /// Cancel the loop, drop all particles and wipe the surface
    pub fn stop_animation(&mut self) {
        self.scheduler
            .stop(&mut self.pool, self.surface.surface_mut());
    }

    /// Remove the overlay surface; the animation cannot outlive it
    pub fn destroy_surface(&mut self) {
        self.surface.destroy();
        self.stop_animation();
    }

    pub fn state(&self) -> PenState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn config(&self) -> &SparkleConfig {
        &self.config
    }

    pub fn simulation(&self) -> &SimulationConfig {
        &self.simulation
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Latest pointer position seen while active
    pub fn last_pointer(&self) -> Option<DVec2> {
        self.last_pointer
    }

    pub fn is_animating(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_present()
    }

    pub fn surface(&self) -> Option<&S::Surface> {
        self.surface.surface()
    }

    pub fn surface_host(&self) -> &S {
        self.surface.host()
    }

    pub fn surface_host_mut(&mut self) -> &mut S {
        self.surface.host_mut()
    }

    pub fn pointer_source(&self) -> &P {
        self.input.source()
    }

    pub fn pointer_source_mut(&mut self) -> &mut P {
        self.input.source_mut()
    }

    pub fn frame_scheduler(&self) -> &F {
        self.scheduler.frames()
    }

    pub fn frame_scheduler_mut(&mut self) -> &mut F {
        self.scheduler.frames_mut()
    }
}
