//! The display side of the two waveform visualizers.
//!
//! The processor owns the [Display]; everything else reaches it through a [DisplayHandle],
//! which never keeps it alive.
use std::sync::{Arc, Mutex, PoisonError, Weak};

use scope::{Scope, Ticker};

use crate::params::Params;

pub struct Display {
    main: Mutex<Scope>,
    sidechain: Mutex<Scope>,
    repaint_rate: u32,
}

/// A non-owning view of a processor's [Display].
#[derive(Clone)]
pub struct DisplayHandle {
    display: Weak<Display>,
    params: Arc<Params>,
}

impl Display {
    pub(crate) fn new(main: Scope, sidechain: Scope) -> Self {
        let repaint_rate = main.repaint_rate();
        Self {
            main: Mutex::new(main),
            sidechain: Mutex::new(sidechain),
            repaint_rate,
        }
    }

    fn refresh(&self) -> bool {
        let main = self.main.lock().unwrap_or_else(PoisonError::into_inner).refresh();
        let sidechain = self
            .sidechain
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .refresh();
        main | sidechain
    }
}

impl DisplayHandle {
    pub(crate) fn new(display: &Arc<Display>, params: Arc<Params>) -> Self {
        Self {
            display: Arc::downgrade(display),
            params,
        }
    }

    /// Returns false once the processor is gone.
    pub fn is_alive(&self) -> bool {
        self.display.strong_count() > 0
    }

    /// Pull new levels into both histories. Returns whether anything changed, or None if the
    /// processor is gone.
    pub fn refresh(&self) -> Option<bool> {
        self.display.upgrade().map(|display| display.refresh())
    }

    /// Look at the main input waveform.
    pub fn main<R>(&self, f: impl FnOnce(&Scope) -> R) -> Option<R> {
        let display = self.display.upgrade()?;
        let scope = display.main.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(&scope))
    }

    /// Look at the sidechain waveform.
    pub fn sidechain<R>(&self, f: impl FnOnce(&Scope) -> R) -> Option<R> {
        let display = self.display.upgrade()?;
        let scope = display.sidechain.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(&scope))
    }

    /// The sidechain waveform is only shown while the effect is on.
    pub fn sidechain_visible(&self) -> bool {
        self.params.enabled()
    }

    /// Refresh both histories at the repaint rate on a background thread, until the processor
    /// or the returned ticker is dropped.
    pub fn spawn_refresh(&self) -> std::io::Result<Ticker> {
        let rate = self
            .display
            .upgrade()
            .map_or(scope::Options::default().repaint_rate, |display| {
                display.repaint_rate
            });
        let display = self.display.clone();
        Ticker::spawn("rmsc-display", rate, move || {
            display.upgrade().map(|display| display.refresh()).is_some()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use scope::Sink;

    use super::{Display, DisplayHandle};
    use crate::params::Params;

    #[test]
    fn handle_does_not_keep_the_display_alive() {
        let options = scope::Options {
            samples_per_level: 2,
            ..scope::Options::default()
        };
        let (mut main, main_scope) = scope::channel(&options);
        let (_sidechain, sidechain_scope) = scope::channel(&options);
        let display = Arc::new(Display::new(main_scope, sidechain_scope));
        let params = Arc::new(Params::default());
        let handle = DisplayHandle::new(&display, params.clone());

        let block = buffer::Owned::from_channels([vec![0.5, -0.5]]);
        main.push_buffer(block.audio());
        assert_eq!(handle.refresh(), Some(true));
        let last = handle.main(|scope| scope.levels(0).last()).flatten();
        assert_eq!(last, Some(scope::Level { min: -0.5, max: 0.5 }));

        assert!(handle.sidechain_visible());
        params.set_enabled(false);
        assert!(!handle.sidechain_visible());

        drop(display);
        assert!(!handle.is_alive());
        assert_eq!(handle.refresh(), None);
        assert!(handle.main(|_| ()).is_none());
        assert!(handle.sidechain(|_| ()).is_none());
    }

    #[test]
    fn refresh_thread_exits_with_the_display() {
        let (_main, main_scope) = scope::channel(&scope::Options::default());
        let (_sidechain, sidechain_scope) = scope::channel(&scope::Options::default());
        let display = Arc::new(Display::new(main_scope, sidechain_scope));
        let handle = DisplayHandle::new(&display, Arc::new(Params::default()));

        let ticker = handle.spawn_refresh().unwrap();
        drop(display);
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while !ticker.is_finished() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(ticker.is_finished());
    }
}
