//! Background loads
//!
//! A [`Loader`] runs one read on a worker thread and hands the result back
//! over a channel exactly once. Dropping the loader before the result is
//! taken discards it; the worker's send simply fails.

use crossbeam::channel::{self, Receiver, TryRecvError};
use std::thread;

use crate::Result;

pub struct Loader<T> {
    rx: Receiver<Result<T>>,
    delivered: bool,
}

impl<T: Send + 'static> Loader<T> {
    /// Start `load` on a worker thread
    pub fn spawn<F>(name: &str, load: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (tx, rx) = channel::bounded::<Result<T>>(1);
        let name = name.to_string();

        thread::spawn(move || {
            let result = load();
            if tx.send(result).is_err() {
                tracing::debug!("Discarding {} load, receiver is gone", name);
            }
        });

        Self { rx, delivered: false }
    }
}

impl<T> Loader<T> {
    /// Take the result if the worker has finished.
    ///
    /// Returns `Some` at most once over the life of the loader.
    pub fn poll(&mut self) -> Option<Result<T>> {
        if self.delivered {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.delivered = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                // Worker panicked before sending.
                self.delivered = true;
                None
            }
        }
    }

    /// Block until the worker finishes; `None` if it was already taken
    pub fn wait(&mut self) -> Option<Result<T>> {
        if self.delivered {
            return None;
        }
        self.delivered = true;
        self.rx.recv().ok()
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_result_is_delivered_once() {
        let mut loader = Loader::spawn("numbers", || Ok(vec![1, 2, 3]));
        assert_eq!(loader.wait().unwrap().unwrap(), vec![1, 2, 3]);
        assert!(loader.is_delivered());
        assert!(loader.wait().is_none());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn test_poll_eventually_delivers() {
        let (gate_tx, gate_rx) = channel::bounded::<()>(0);
        let mut loader = Loader::spawn("gated", move || {
            gate_rx.recv().ok();
            Ok(42)
        });

        assert!(loader.poll().is_none());
        gate_tx.send(()).unwrap();

        let value = loop {
            if let Some(result) = loader.poll() {
                break result.unwrap();
            }
            thread::yield_now();
        };
        assert_eq!(value, 42);
    }

    #[test]
    fn test_errors_are_delivered() {
        let mut loader: Loader<()> = Loader::spawn("failing", || Err(Error::LockPoisoned));
        assert!(matches!(loader.wait(), Some(Err(Error::LockPoisoned))));
    }

    #[test]
    fn test_dropped_loader_discards_result() {
        let (done_tx, done_rx) = channel::bounded::<()>(1);
        let loader = Loader::spawn("dropped", move || {
            done_tx.send(()).ok();
            Ok("late")
        });
        drop(loader);
        done_rx.recv().unwrap();
    }
}
