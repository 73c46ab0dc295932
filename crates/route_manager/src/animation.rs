use std::time::Duration;

use tokio::{sync::watch, task::JoinHandle, time};

/// Offset units subtracted per tick.
pub const DASH_STEP: f64 = 1.0;
/// Tick period, roughly one display frame.
pub const TICK_PERIOD: Duration = Duration::from_millis(16);

/// Repeating dash-offset animation for route playback.
///
/// A background task decrements the offset by [`DASH_STEP`] once per tick
/// and publishes it through a watch channel; the host's renderer applies
/// the latest value to the dash style of the path entity it draws. The
/// task runs until explicitly stopped (or the animation is dropped).
#[derive(Debug)]
pub struct DashAnimation {
    task: JoinHandle<()>,
    offset: watch::Receiver<f64>,
}

impl DashAnimation {
    /// Spawns the animation loop. Must be called from within a tokio
    /// runtime.
    pub fn start() -> Self {
        let (tx, rx) = watch::channel(0.0f64);
        let task = tokio::spawn(async move {
            let mut interval = time::interval(TICK_PERIOD);
            let mut offset = 0.0f64;
            loop {
                interval.tick().await;
                offset -= DASH_STEP;
                if tx.send(offset).is_err() {
                    // Every receiver is gone; nobody is rendering this.
                    break;
                }
            }
        });
        log::debug!("route animation started");
        Self { task, offset: rx }
    }

    /// A fresh handle on the published offset.
    pub fn offset(&self) -> watch::Receiver<f64> {
        self.offset.clone()
    }

    pub fn stop(self) {
        log::debug!("route animation stopped");
        self.task.abort();
    }
}

impl Drop for DashAnimation {
    fn drop(&mut self) {
        self.task.abort();
    }
}
