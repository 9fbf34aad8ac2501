//! In-memory host
//!
//! A drawing context that records every call, and host capabilities that
//! count what is currently acquired. Used by the test suites to check that
//! activation never duplicates resources and deactivation releases them all.

use crate::canvas::{OverlaySurface, SparkleCanvas};
use crate::controller::PenController;
use crate::error::HostError;
use crate::host::{FrameHandle, FrameScheduler, PointerSource, SurfaceHost};
use crate::scheduler::FrameOutcome;

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    GlobalAlpha(f64),
    FillStyle(String),
    StrokeStyle(String),
    LineWidth(f64),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Arc { x: f64, y: f64, radius: f64 },
    ClosePath,
    Fill,
    Stroke,
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
}

/// Drawing context that records calls instead of rasterising
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn fill_count(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Fill))
    }

    pub fn stroke_count(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Stroke))
    }

    pub fn clear_count(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::ClearRect { .. }))
    }

    fn count(&self, predicate: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| predicate(op)).count()
    }
}

impl SparkleCanvas for RecordingCanvas {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ops.push(DrawOp::GlobalAlpha(alpha));
    }

    fn set_fill_style(&mut self, style: &str) {
        self.ops.push(DrawOp::FillStyle(style.to_string()));
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.ops.push(DrawOp::StrokeStyle(style.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, _start_angle: f64, _end_angle: f64) {
        self.ops.push(DrawOp::Arc { x, y, radius });
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::ClearRect {
            x,
            y,
            width,
            height,
        });
    }
}

impl OverlaySurface for RecordingCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

/// Surface host that hands out [`RecordingCanvas`] surfaces
#[derive(Debug, Default)]
pub struct HeadlessSurfaceHost {
    viewport: (u32, u32),
    live_surfaces: usize,
    created: usize,
    resize_watchers: usize,
    fail_next_create: bool,
}

impl HeadlessSurfaceHost {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: (width, height),
            ..Default::default()
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// Make the next `create_surface` fail
    pub fn fail_next_create(&mut self) {
        self.fail_next_create = true;
    }

    /// Surfaces currently attached to the document
    pub fn live_surfaces(&self) -> usize {
        self.live_surfaces
    }

    /// Surfaces created over the host's lifetime
    pub fn created(&self) -> usize {
        self.created
    }

    /// Resize observers currently registered
    pub fn resize_watchers(&self) -> usize {
        self.resize_watchers
    }
}

impl SurfaceHost for HeadlessSurfaceHost {
    type Surface = RecordingCanvas;

    fn create_surface(&mut self) -> Result<RecordingCanvas, HostError> {
        if std::mem::take(&mut self.fail_next_create) {
            return Err(HostError::SurfaceCreation("headless failure".to_string()));
        }
        self.created += 1;
        self.live_surfaces += 1;
        Ok(RecordingCanvas::default())
    }

    fn destroy_surface(&mut self, _surface: RecordingCanvas) {
        self.live_surfaces = self.live_surfaces.saturating_sub(1);
    }

    fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    fn watch_resize(&mut self) -> Result<(), HostError> {
        self.resize_watchers += 1;
        Ok(())
    }

    fn unwatch_resize(&mut self) {
        self.resize_watchers = self.resize_watchers.saturating_sub(1);
    }
}

/// Pointer source that counts registered handlers
#[derive(Debug, Default)]
pub struct HeadlessPointerSource {
    handlers: usize,
    fail_next_attach: bool,
}

impl HeadlessPointerSource {
    /// Handlers currently registered
    pub fn handlers(&self) -> usize {
        self.handlers
    }

    /// Make the next `attach` fail
    pub fn fail_next_attach(&mut self) {
        self.fail_next_attach = true;
    }
}

impl PointerSource for HeadlessPointerSource {
    fn attach(&mut self) -> Result<(), HostError> {
        if std::mem::take(&mut self.fail_next_attach) {
            return Err(HostError::Listener("headless failure".to_string()));
        }
        self.handlers += 1;
        Ok(())
    }

    fn detach(&mut self) {
        self.handlers = self.handlers.saturating_sub(1);
    }
}

/// Frame clock advanced manually with [`fire`](Self::fire)
#[derive(Debug, Default)]
pub struct HeadlessFrameScheduler {
    next_id: i32,
    pending: Vec<FrameHandle>,
    requested: usize,
    cancelled: usize,
    fail_requests: bool,
}

impl HeadlessFrameScheduler {
    /// Callbacks currently scheduled
    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    /// Total successful requests
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Total cancellations of a pending request
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    pub fn fail_requests(&mut self, fail: bool) {
        self.fail_requests = fail;
    }

    /// Deliver the oldest pending frame, as the host would before invoking
    /// the callback. Returns None when nothing is scheduled.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl FrameScheduler for HeadlessFrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, HostError> {
        if self.fail_requests {
            return Err(HostError::FrameRequest("headless failure".to_string()));
        }
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        self.requested += 1;
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        if self.pending.len() < before {
            self.cancelled += 1;
        }
    }
}

/// Controller wired to the in-memory host
pub type HeadlessPen = PenController<HeadlessSurfaceHost, HeadlessPointerSource, HeadlessFrameScheduler>;

impl HeadlessPen {
    /// Controller over a `width` x `height` viewport with a fixed RNG seed
    pub fn headless(width: u32, height: u32, seed: u64) -> Self {
        PenController::new(
            HeadlessSurfaceHost::new(width, height),
            HeadlessPointerSource::default(),
            HeadlessFrameScheduler::default(),
            seed,
        )
    }

    /// Fire the pending frame (if any) and run its callback
    pub fn tick(&mut self) -> FrameOutcome {
        self.frame_scheduler_mut().fire();
        self.on_frame()
    }
}
