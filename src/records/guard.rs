use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    InFlight,
}

/// Returned when a submission is attempted while another is being saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRejected;

impl fmt::Display for SubmitRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A submission is already being saved; wait for it to finish")
    }
}

impl std::error::Error for SubmitRejected {}

/// Single-flight guard around submit-and-save.
///
/// Saving is not idempotent, so only one submission may be in flight at a
/// time. `try_begin` flips Idle -> InFlight and hands out a ticket; the
/// guard returns to Idle when the ticket is dropped, whether the save
/// succeeded or not.
#[derive(Debug)]
pub struct SubmitGuard {
    state: Mutex<SubmitState>,
}

impl Default for SubmitGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SubmitState::Idle),
        }
    }

    pub fn state(&self) -> SubmitState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn try_begin(&self) -> Result<SubmitTicket<'_>, SubmitRejected> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match *state {
            SubmitState::InFlight => Err(SubmitRejected),
            SubmitState::Idle => {
                *state = SubmitState::InFlight;
                Ok(SubmitTicket { guard: self })
            }
        }
    }
}

/// Proof that the holder owns the in-flight slot
#[derive(Debug)]
pub struct SubmitTicket<'a> {
    guard: &'a SubmitGuard,
}

impl Drop for SubmitTicket<'_> {
    fn drop(&mut self) {
        let mut state = self.guard.state.lock().unwrap_or_else(|e| e.into_inner());
        *state = SubmitState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        assert_eq!(SubmitGuard::new().state(), SubmitState::Idle);
    }

    #[test]
    fn test_second_submit_rejected_while_in_flight() {
        let guard = SubmitGuard::new();
        let ticket = guard.try_begin().unwrap();
        assert_eq!(guard.state(), SubmitState::InFlight);
        assert_eq!(guard.try_begin().unwrap_err(), SubmitRejected);
        drop(ticket);
        assert_eq!(guard.state(), SubmitState::Idle);
    }

    #[test]
    fn test_released_after_failure() {
        let guard = SubmitGuard::new();
        let result: Result<(), &str> = (|| {
            let _ticket = guard.try_begin().map_err(|_| "rejected")?;
            Err("save failed")
        })();
        assert_eq!(result, Err("save failed"));
        assert!(guard.try_begin().is_ok());
    }

    #[test]
    fn test_one_winner_across_threads() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::{Arc, Barrier};

        let guard = Arc::new(SubmitGuard::new());
        let barrier = Arc::new(Barrier::new(8));
        let wins = Arc::new(AtomicUsize::new(0));
        let release = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let guard = guard.clone();
                let barrier = barrier.clone();
                let wins = wins.clone();
                let release = release.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    let ticket = guard.try_begin();
                    if ticket.is_ok() {
                        wins.fetch_add(1, Ordering::SeqCst);
                    }
                    // Hold the ticket until everyone has tried
                    release.wait();
                    drop(ticket);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(wins.load(Ordering::SeqCst), 1);
        assert_eq!(guard.state(), SubmitState::Idle);
    }
}
