//! Render lifecycle: setup, background rendering and pixel streaming.
//!
//! [`RenderManager::render`] returns immediately with a [`PixelStream`];
//! a dedicated render thread drives a rayon pool over the frame's buckets
//! and publishes each pixel as it is shaded. Events arrive in no particular
//! order, but every pixel is published exactly once when the render
//! finishes. Only a drained stream or a terminal [`RenderState`] means the
//! frame is complete; [`RenderManager::frame_buffer`] therefore hands out
//! the frame only once the render thread has been joined.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use glint_core::{load_scene, FrameSettings, LoadError, SceneDescription};
use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_partition, render_bucket, Bucket, BucketResult};
use crate::renderer::{FrameBuffer, PixelEvent, RenderConfig};
use crate::{Camera, Scene};

/// How long a worker waits on a full channel before checking for cancellation.
const SEND_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Errors that can occur while setting up or running a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to load scene: {0}")]
    Load(#[from] LoadError),

    #[error("Frame size {width}x{height} has no pixels")]
    EmptyFrame { width: u32, height: u32 },

    #[error("Render manager has not been set up")]
    NotSetUp,

    #[error("Render has already been started")]
    AlreadyStarted,

    #[error("No finished frame is available")]
    NoFrame,

    #[error("Pixel ({x}, {y}) shaded to a non-finite color")]
    NonFinitePixel { x: u32, y: u32 },

    #[error("Render worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to spawn render thread: {0}")]
    Spawn(std::io::Error),

    #[error("Render was cancelled")]
    Cancelled,
}

/// Where a [`RenderManager`] is in its one-way lifecycle.
///
/// `NotStarted -> InProgress -> Finished | Cancelled | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RenderState {
    NotStarted = 0,
    InProgress = 1,
    Finished = 2,
    Cancelled = 3,
    Failed = 4,
}

impl RenderState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::NotStarted,
            1 => Self::InProgress,
            2 => Self::Finished,
            3 => Self::Cancelled,
            _ => Self::Failed,
        }
    }

    /// True once the render can no longer change.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled | Self::Failed)
    }
}

/// Cooperative cancellation flag shared with the render workers.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Receiving end of the pixel events of one render.
///
/// Iteration blocks until the next event and ends once every worker has
/// exited, whether the render finished, failed or was cancelled.
pub struct PixelStream {
    receiver: Receiver<PixelEvent>,
}

impl Iterator for PixelStream {
    type Item = PixelEvent;

    fn next(&mut self) -> Option<PixelEvent> {
        self.receiver.recv().ok()
    }
}

/// Immutable inputs to one render pass, owned by the render thread.
struct RenderJob {
    scene: Scene,
    camera: Camera,
    config: RenderConfig,
    width: u32,
    height: u32,
}

/// Sending end shared by the workers.
struct PixelSink {
    sender: Sender<PixelEvent>,
    cancel: CancellationToken,
    /// Set when a worker fails so the others stop early
    halted: AtomicBool,
    /// Cleared when the stream is dropped
    connected: AtomicBool,
    /// Set once the manager is waiting for the frame
    detached: Arc<AtomicBool>,
}

impl PixelSink {
    fn new(sender: Sender<PixelEvent>, cancel: CancellationToken, detached: Arc<AtomicBool>) -> Self {
        Self {
            sender,
            cancel,
            halted: AtomicBool::new(false),
            connected: AtomicBool::new(true),
            detached,
        }
    }

    fn disconnect(&self, reason: &str) {
        if self.connected.swap(false, Ordering::Relaxed) {
            log::debug!("{}, rendering without events", reason);
        }
    }

    fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.halted.load(Ordering::SeqCst)
    }

    fn halt(&self) {
        self.halted.store(true, Ordering::SeqCst);
    }

    /// Publish an event, blocking while the channel is full.
    ///
    /// A dropped stream is not an error: the event is discarded. Once the
    /// manager is waiting for the frame, a full channel discards events
    /// instead of blocking.
    fn send(&self, mut event: PixelEvent) -> Result<(), RenderError> {
        if !self.connected.load(Ordering::Relaxed) {
            return Ok(());
        }

        loop {
            match self.sender.send_timeout(event, SEND_POLL_INTERVAL) {
                Ok(()) => return Ok(()),
                Err(SendTimeoutError::Timeout(returned)) => {
                    if self.should_stop() {
                        return Err(RenderError::Cancelled);
                    }
                    if self.detached.load(Ordering::SeqCst) {
                        self.disconnect("Pixel stream not drained before wait");
                        return Ok(());
                    }
                    event = returned;
                }
                Err(SendTimeoutError::Disconnected(_)) => {
                    self.disconnect("Pixel stream dropped");
                    return Ok(());
                }
            }
        }
    }
}

/// Owns a scene and camera and renders them in the background.
pub struct RenderManager {
    config: RenderConfig,
    frame: Option<FrameSettings>,
    job: Option<RenderJob>,
    state: Arc<AtomicU8>,
    cancel: CancellationToken,
    detached: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<FrameBuffer, RenderError>>>,
    frame_buffer: Option<FrameBuffer>,
    failure: Option<RenderError>,
}

impl RenderManager {
    /// Create a render manager with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            config,
            frame: None,
            job: None,
            state: Arc::new(AtomicU8::new(RenderState::NotStarted as u8)),
            cancel: CancellationToken::new(),
            detached: Arc::new(AtomicBool::new(false)),
            handle: None,
            frame_buffer: None,
            failure: None,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Prepare a scene description for rendering.
    ///
    /// May be called again to replace the scene until [`render`] starts.
    ///
    /// [`render`]: RenderManager::render
    pub fn setup(&mut self, description: &SceneDescription) -> Result<(), RenderError> {
        let frame = description.frame;
        let mut scene = Scene::from_description(description);
        scene.set_shading(self.config.shading);

        let mut camera = Camera::from_settings(&description.camera);
        if !self.config.legacy_screen_mapping {
            camera = camera.with_screen_size(frame.width, frame.height);
        }

        self.setup_scene(scene, camera, frame)
    }

    /// Load a scene file and prepare it for rendering.
    pub fn setup_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), RenderError> {
        let description = load_scene(path)?;
        self.setup(&description)
    }

    /// Prepare an already built scene and camera for rendering.
    ///
    /// The camera and scene are used as given.
    pub fn setup_scene(
        &mut self,
        scene: Scene,
        camera: Camera,
        frame: FrameSettings,
    ) -> Result<(), RenderError> {
        if self.render_state() != RenderState::NotStarted {
            return Err(RenderError::AlreadyStarted);
        }
        if frame.width == 0 || frame.height == 0 {
            return Err(RenderError::EmptyFrame {
                width: frame.width,
                height: frame.height,
            });
        }

        self.frame = Some(frame);
        self.job = Some(RenderJob {
            scene,
            camera,
            config: self.config.clone(),
            width: frame.width,
            height: frame.height,
        });
        Ok(())
    }

    /// Start rendering in the background.
    ///
    /// Returns immediately with the stream of finished pixels. The scene
    /// and camera move into the render thread and stay untouched until it
    /// exits.
    pub fn render(&mut self) -> Result<PixelStream, RenderError> {
        if self.render_state() != RenderState::NotStarted {
            return Err(RenderError::AlreadyStarted);
        }
        let job = self.job.take().ok_or(RenderError::NotSetUp)?;

        let (sender, receiver) = bounded(job.config.channel_capacity);
        let sink = PixelSink::new(sender, self.cancel.clone(), Arc::clone(&self.detached));
        let state = Arc::clone(&self.state);
        self.set_state(RenderState::InProgress);

        let spawned = thread::Builder::new()
            .name("glint-render".to_string())
            .spawn(move || {
                let outcome = run_render(&job, &sink);
                state.store(terminal_state(&outcome) as u8, Ordering::SeqCst);
                // Close the stream only after the state is terminal
                drop(sink);
                outcome
            });

        match spawned {
            Ok(handle) => self.handle = Some(handle),
            Err(err) => {
                self.set_state(RenderState::Failed);
                log::error!("Failed to spawn render thread: {}", err);
                return Err(RenderError::Spawn(err));
            }
        }

        Ok(PixelStream { receiver })
    }

    /// Current state, without blocking.
    pub fn render_state(&self) -> RenderState {
        RenderState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Ask the workers to stop. The stream still closes normally.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A handle that cancels this manager's render from anywhere.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Block until the render thread exits and return the finished frame.
    ///
    /// A failure or cancellation is returned once; later calls report
    /// [`RenderError::NoFrame`] (or [`RenderError::Cancelled`]).
    ///
    /// Drain the [`PixelStream`] before calling this to see every pixel.
    /// Once waiting, workers no longer block on a full channel: events
    /// that don't fit are dropped and the frame buffer is still completed.
    pub fn wait(&mut self) -> Result<&FrameBuffer, RenderError> {
        self.detached.store(true, Ordering::SeqCst);
        self.join();

        if let Some(error) = self.failure.take() {
            return Err(error);
        }

        match self.render_state() {
            RenderState::Finished => self.frame_buffer.as_ref().ok_or(RenderError::NoFrame),
            RenderState::Cancelled => Err(RenderError::Cancelled),
            RenderState::NotStarted if self.job.is_none() => Err(RenderError::NotSetUp),
            _ => Err(RenderError::NoFrame),
        }
    }

    /// The finished frame, or `None` while rendering or after a failure.
    pub fn frame_buffer(&mut self) -> Option<&FrameBuffer> {
        if self.handle.as_ref().is_some_and(|handle| handle.is_finished()) {
            self.join();
        }
        self.frame_buffer.as_ref()
    }

    /// Frame width in pixels, or 0 before setup.
    pub fn frame_width(&self) -> u32 {
        self.frame.map_or(0, |frame| frame.width)
    }

    /// Frame height in pixels, or 0 before setup.
    pub fn frame_height(&self) -> u32 {
        self.frame.map_or(0, |frame| frame.height)
    }

    fn set_state(&self, state: RenderState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    fn join(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        match handle.join() {
            Ok(Ok(frame)) => self.frame_buffer = Some(frame),
            Ok(Err(error)) => self.failure = Some(error),
            Err(payload) => {
                self.set_state(RenderState::Failed);
                self.failure = Some(RenderError::WorkerPanicked(panic_message(payload.as_ref())));
            }
        }
    }
}

impl Default for RenderManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RenderManager {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel();
            self.join();
        }
    }
}

fn terminal_state(outcome: &Result<FrameBuffer, RenderError>) -> RenderState {
    match outcome {
        Ok(_) => RenderState::Finished,
        Err(RenderError::Cancelled) => RenderState::Cancelled,
        Err(_) => RenderState::Failed,
    }
}

/// Render every bucket of the job on a rayon pool and assemble the frame.
fn run_render(job: &RenderJob, sink: &PixelSink) -> Result<FrameBuffer, RenderError> {
    let started = Instant::now();
    let outcome = render_buckets(job, sink);
    let elapsed = started.elapsed();

    match &outcome {
        Ok(_) => log::info!("Render finished in {:.2?}", elapsed),
        Err(RenderError::Cancelled) => log::warn!("Render cancelled after {:.2?}", elapsed),
        Err(err) => log::error!("Render failed after {:.2?}: {}", elapsed, err),
    }

    outcome
}

/// Workers own their buckets' pixels and hand them back as
/// [`BucketResult`]s; the frame is assembled once every bucket is done.
fn render_buckets(job: &RenderJob, sink: &PixelSink) -> Result<FrameBuffer, RenderError> {
    let buckets = generate_partition(job.width, job.height, job.config.partition);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(job.config.threads.unwrap_or(0))
        .thread_name(|i| format!("glint-worker-{}", i))
        .build()?;

    log::info!(
        "Rendering {}x{} frame: {} buckets on {} threads",
        job.width,
        job.height,
        buckets.len(),
        pool.current_num_threads()
    );

    let failure = OnceLock::new();
    let results: Vec<BucketResult> = pool.install(|| {
        buckets
            .par_iter()
            .filter_map(|bucket| render_guarded(bucket, job, sink, &failure))
            .collect()
    });

    if let Some(error) = failure.into_inner() {
        return Err(error);
    }
    if results.len() < buckets.len() {
        return Err(RenderError::Cancelled);
    }

    let mut frame = FrameBuffer::new(job.width, job.height);
    for result in &results {
        for (x, y, color) in result.frame_pixels() {
            frame.set(x, y, color);
        }
    }
    Ok(frame)
}

/// Render one bucket, turning a failure or panic into a halt of the render.
fn render_guarded(
    bucket: &Bucket,
    job: &RenderJob,
    sink: &PixelSink,
    failure: &OnceLock<RenderError>,
) -> Option<BucketResult> {
    let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
        render_bucket(
            bucket,
            &job.camera,
            &job.scene,
            &job.config,
            || sink.should_stop(),
            |event| sink.send(event),
        )
    }));

    let error = match rendered {
        Ok(Ok(result)) => return Some(result),
        Ok(Err(RenderError::Cancelled)) => return None,
        Ok(Err(error)) => error,
        Err(payload) => RenderError::WorkerPanicked(panic_message(payload.as_ref())),
    };

    // First failure wins
    let _ = failure.set(error);
    sink.halt();
    None
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
