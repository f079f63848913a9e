use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam::channel::{Sender, bounded, tick};

/// A background thread that calls a closure at a fixed rate until the closure returns false or
/// the ticker is dropped. Dropping the ticker stops the thread and waits for it.
pub struct Ticker {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a thread that runs `f` `rate` times per second.
    pub fn spawn<F>(name: &str, rate: u32, mut f: F) -> std::io::Result<Self>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let interval = Duration::from_secs_f64(1.0 / f64::from(rate.max(1)));
        let (stop, stopped) = bounded::<()>(0);
        let thread = thread::Builder::new().name(name.into()).spawn(move || {
            log::debug!("refresh thread started, interval {interval:?}");
            let ticks = tick(interval);
            loop {
                crossbeam::select! {
                    recv(ticks) -> _ => {
                        if !f() {
                            log::debug!("refresh target is gone");
                            break;
                        }
                    }
                    recv(stopped) -> _ => break,
                }
            }
            log::debug!("refresh thread stopped");
        })?;
        Ok(Self {
            stop: Some(stop),
            thread: Some(thread),
        })
    }

    /// Returns true once the thread has exited on its own.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        // Disconnecting wakes the thread.
        self.stop.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("refresh thread panicked");
            }
        }
    }
}
