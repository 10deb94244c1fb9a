//! Thread pool sizing, cooperative cancellation and progress
//! reporting shared by the bucket renderer and the photon emission
//! pass.

// std
use std::io::Stdout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
// others
use pbr::ProgressBar;

/// Shared flag polled by workers between units of work.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag::default()
    }
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Zero asks for one worker per logical CPU.
pub fn num_worker_threads(requested: usize) -> usize {
    if requested == 0 {
        num_cpus::get().max(1)
    } else {
        requested
    }
}

/// Lock a mutex, recovering the data if another worker panicked
/// while holding it.
pub fn lock_or_recover<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Terminal progress bar, only shown when info logging is enabled.
pub struct ProgressReporter {
    bar: Option<ProgressBar<Stdout>>,
    total: u64,
    done: u64,
}

impl ProgressReporter {
    pub fn new(total: u64, title: &str) -> Self {
        let bar = if log::log_enabled!(log::Level::Info) && total > 0 {
            let mut pb = ProgressBar::new(total);
            pb.message(&format!("{} ", title));
            Some(pb)
        } else {
            None
        };
        ProgressReporter {
            bar,
            total,
            done: 0,
        }
    }
    pub fn update(&mut self, done: u64) {
        self.done = done.min(self.total);
        if let Some(ref mut pb) = self.bar {
            pb.set(self.done);
        }
    }
    pub fn done(&self) -> u64 {
        self.done
    }
    pub fn finish(&mut self) {
        if let Some(ref mut pb) = self.bar {
            pb.finish_println("");
        }
        self.bar = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_shared_between_clones() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        assert!(!other.is_cancelled());
        flag.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn explicit_thread_count_wins() {
        assert_eq!(num_worker_threads(3), 3);
        assert!(num_worker_threads(0) >= 1);
    }

    #[test]
    fn progress_is_clamped() {
        let mut progress = ProgressReporter::new(10, "test");
        progress.update(4);
        assert_eq!(progress.done(), 4);
        progress.update(12);
        assert_eq!(progress.done(), 10);
        progress.finish();
    }
}
