//! Configuration file watcher for hot-reloading
//!
//! Watches ~/.config/rush/config.toml for changes. Every matching event also
//! calls a wake function so an idle event loop gets a chance to poll.

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, channel};
use std::time::{Duration, Instant};

use rush::Config;

/// Debounce window
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Drops events that arrive within the debounce window of the last accepted one
#[derive(Debug, Default)]
struct Debouncer {
    last: Option<Instant>,
}

impl Debouncer {
    fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last {
            if now.duration_since(last) < DEBOUNCE {
                return false;
            }
        }
        self.last = Some(now);
        true
    }
}

/// Watches the config directory for changes to config.toml
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<()>,
    debouncer: Debouncer,
}

impl ConfigWatcher {
    pub fn new<F>(wake: F) -> Option<Self>
    where
        F: Fn() + Send + 'static,
    {
        let config_dir = Config::config_dir()?;
        Self::watch(&config_dir, config_dir.join("config.toml"), wake)
    }

    fn watch<F>(config_dir: &Path, config_path: PathBuf, wake: F) -> Option<Self>
    where
        F: Fn() + Send + 'static,
    {
        let (tx, rx) = channel();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
            if let Ok(event) = res {
                if (event.kind.is_modify() || event.kind.is_create())
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(()).is_ok()
                {
                    wake();
                }
            }
        })
        .ok()?;

        if let Err(e) = watcher.watch(config_dir, RecursiveMode::NonRecursive) {
            log::debug!("Not watching {:?}: {}", config_dir, e);
            return None;
        }

        log::info!("Watching {:?} for config changes", config_dir);

        Some(Self {
            _watcher: watcher,
            receiver: rx,
            debouncer: Debouncer::default(),
        })
    }

    /// Poll for a config change (non-blocking, debounced)
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while self.receiver.try_recv().is_ok() {
            if self.debouncer.accept(Instant::now()) {
                changed = true;
            }
        }
        changed
    }
}
