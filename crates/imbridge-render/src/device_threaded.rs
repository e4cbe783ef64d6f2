//! Command-buffer renderer that submits from a dedicated thread.
//!
//! Used when the host renders on its own thread. Frames are double-buffered:
//! the next frame is copied into an owned [`FrameSnapshot`] while the previous
//! one is being submitted, then the producer waits for the previous snapshot to
//! come back before handing over the new one. At most one frame is in flight,
//! and the GUI library's draw data is only ever read on the calling thread.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use imbridge_core::{RenderingDevice, SurfaceId};

use crate::device::DeviceBackend;
use crate::error::{RenderError, RenderResult};
use crate::renderer::{RenderFrame, Renderer};
use crate::snapshot::FrameSnapshot;

enum Job {
    InitViewport(SurfaceId),
    CloseViewport(SurfaceId),
    Draw(FrameSnapshot),
    Shutdown,
}

/// GPU renderer whose device calls all happen on one submission thread.
pub struct ThreadedGpuRenderer {
    jobs: Sender<Job>,
    returned: Receiver<FrameSnapshot>,
    /// Snapshots not currently owned by the submission thread.
    free: Vec<FrameSnapshot>,
    in_flight: bool,
    thread: Option<JoinHandle<()>>,
}

impl ThreadedGpuRenderer {
    /// Builds device resources on the calling thread, then starts the
    /// submission thread.
    pub fn new(device: Arc<dyn RenderingDevice>) -> RenderResult<Self> {
        let backend = DeviceBackend::new(device)?;
        let (jobs, job_rx) = mpsc::channel();
        let (return_tx, returned) = mpsc::channel();

        let thread = std::thread::Builder::new()
            .name("imbridge-render".into())
            .spawn(move || run(backend, &job_rx, &return_tx))
            .map_err(|e| RenderError::ThreadSpawnFailed(e.to_string()))?;

        Ok(Self {
            jobs,
            returned,
            free: vec![FrameSnapshot::new()],
            in_flight: false,
            thread: Some(thread),
        })
    }

    /// Blocks until the in-flight frame, if any, has been submitted.
    pub fn wait_idle(&mut self) {
        if !self.in_flight {
            return;
        }
        self.in_flight = false;
        match self.returned.recv() {
            Ok(snapshot) => self.free.push(snapshot),
            Err(_) => log::error!("render thread exited unexpectedly"),
        }
    }

    /// Returns false when the submission thread is gone.
    fn send(&mut self, job: Job) -> bool {
        let Err(mpsc::SendError(job)) = self.jobs.send(job) else {
            return true;
        };
        log::error!("render thread is gone; dropping job");
        if let Job::Draw(snapshot) = job {
            self.free.push(snapshot);
        }
        false
    }

    fn is_running(&self) -> bool {
        self.thread.is_some()
    }
}

fn run(mut backend: DeviceBackend, jobs: &Receiver<Job>, returned: &Sender<FrameSnapshot>) {
    log::debug!("render thread started");
    while let Ok(job) = jobs.recv() {
        match job {
            Job::InitViewport(surface) => backend.init_viewport(surface),
            Job::CloseViewport(surface) => backend.close_viewport(surface),
            Job::Draw(snapshot) => {
                backend.draw(&snapshot);
                if returned.send(snapshot).is_err() {
                    break;
                }
            }
            Job::Shutdown => break,
        }
    }
    backend.dispose();
    log::debug!("render thread stopped");
}

impl Renderer for ThreadedGpuRenderer {
    fn name(&self) -> &'static str {
        "imbridge_gpu_mt"
    }

    fn init_viewport(&mut self, surface: SurfaceId) {
        if self.is_running() {
            self.send(Job::InitViewport(surface));
        }
    }

    fn close_viewport(&mut self, surface: SurfaceId) {
        if self.is_running() {
            self.send(Job::CloseViewport(surface));
        }
    }

    fn render(&mut self, frame: &RenderFrame<'_>) {
        if !self.is_running() {
            return;
        }
        let mut snapshot = self.free.pop().unwrap_or_default();
        snapshot.capture(frame);
        self.wait_idle();
        self.in_flight = self.send(Job::Draw(snapshot));
    }

    fn on_hide(&mut self) {}

    fn dispose(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        self.wait_idle();
        // A send failure means the thread already exited.
        let _ = self.jobs.send(Job::Shutdown);
        if thread.join().is_err() {
            log::error!("render thread panicked");
        }
    }
}

impl Drop for ThreadedGpuRenderer {
    fn drop(&mut self) {
        self.dispose();
    }
}
