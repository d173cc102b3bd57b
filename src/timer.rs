//! Explicit cancellable timers
//!
//! Each lifecycle timer is an owned handle; cancelling it keeps the fire-time
//! message from ever entering the channel. Late firings that slip through are
//! additionally dropped by epoch checks at delivery.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::messages::PanelMsg;

/// Handle to a one-shot timer
#[derive(Debug, Clone)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Arm a one-shot timer that posts `msg` back through the channel after
/// `delay`, unless cancelled first
pub fn spawn(delay: Duration, tx: Sender<PanelMsg>, msg: PanelMsg) -> TimerHandle {
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);
    thread::spawn(move || {
        thread::sleep(delay);
        if !flag.load(Ordering::SeqCst) {
            let _ = tx.send(msg);
        }
    });
    TimerHandle { cancelled }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn fires_after_delay() {
        let (tx, rx) = mpsc::channel();
        spawn(Duration::from_millis(5), tx, PanelMsg::ReloadDue);
        let msg = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(msg, PanelMsg::ReloadDue));
    }

    #[test]
    fn cancelled_timer_stays_silent() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn(Duration::from_millis(20), tx, PanelMsg::ReloadDue);
        handle.cancel();
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
