//! Fixed-size worker pool with structured completion
//!
//! Workers pull from one shared queue until it is closed and drained. Results
//! are handed back to the calling thread, which is the only place they are
//! consumed.

use cpp_lexer::logging::{codes, Code};
use std::any::Any;
use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};
use std::thread;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("Worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },
}

impl PoolError {
    pub fn error_code(&self) -> Code {
        codes::pool::WORKER_PANICKED
    }
}

/// Counts from one completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolReport {
    pub submitted: usize,
    pub processed: usize,
    /// Items handled by each worker, indexed by worker number
    pub per_worker: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// At least one worker is always started
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `handler` once per item on the pool and pass every result to
    /// `collect` on the calling thread. Returns after all workers have
    /// stopped and been joined.
    pub fn run<T, R, H, C>(
        &self,
        items: impl IntoIterator<Item = T>,
        handler: H,
        mut collect: C,
    ) -> Result<PoolReport, PoolError>
    where
        T: Send,
        R: Send,
        H: Fn(T) -> R + Sync,
        C: FnMut(R),
    {
        let (work_tx, work_rx) = mpsc::channel::<T>();
        let work_rx = Mutex::new(work_rx);
        let (result_tx, result_rx) = mpsc::channel::<R>();

        thread::scope(|scope| {
            let handles: Vec<_> = (0..self.workers)
                .map(|_| {
                    let result_tx = result_tx.clone();
                    let work_rx = &work_rx;
                    let handler = &handler;
                    scope.spawn(move || {
                        let mut processed = 0;
                        loop {
                            // Idle: wait for the next item or for the queue
                            // to close.
                            let next = work_rx
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .recv();
                            let Ok(item) = next else {
                                break;
                            };
                            let result = handler(item);
                            processed += 1;
                            if result_tx.send(result).is_err() {
                                break;
                            }
                        }
                        processed
                    })
                })
                .collect();
            drop(result_tx);

            let mut submitted = 0;
            for item in items {
                if work_tx.send(item).is_err() {
                    break;
                }
                submitted += 1;
            }
            // Closing the queue stops every worker once it is drained.
            drop(work_tx);

            for result in result_rx {
                collect(result);
            }

            let mut report = PoolReport {
                submitted,
                ..PoolReport::default()
            };
            let mut panicked = None;
            for (worker, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(processed) => {
                        report.processed += processed;
                        report.per_worker.push(processed);
                    }
                    Err(payload) => {
                        report.per_worker.push(0);
                        panicked.get_or_insert(PoolError::WorkerPanicked {
                            worker,
                            message: panic_message(payload.as_ref()),
                        });
                    }
                }
            }

            match panicked {
                Some(error) => Err(error),
                None => Ok(report),
            }
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_every_item_is_handled_exactly_once() {
        let calls = AtomicUsize::new(0);
        let mut seen = BTreeSet::new();

        let report = WorkerPool::new(4)
            .run(
                0..100,
                |i| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    i * 2
                },
                |doubled| {
                    seen.insert(doubled);
                },
            )
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 100);
        assert_eq!(seen, (0..100).map(|i| i * 2).collect::<BTreeSet<_>>());
        assert_eq!(report.submitted, 100);
        assert_eq!(report.processed, 100);
        assert_eq!(report.per_worker.len(), 4);
        assert_eq!(report.per_worker.iter().sum::<usize>(), 100);
    }

    #[test]
    fn test_results_are_collected_on_the_calling_thread() {
        let caller = thread::current().id();
        let mut collected = 0;

        WorkerPool::new(3)
            .run(
                vec!["a", "b", "c"],
                |item| (item, thread::current().id()),
                |(_, _worker)| {
                    assert_eq!(thread::current().id(), caller);
                    collected += 1;
                },
            )
            .unwrap();

        assert_eq!(collected, 3);
    }

    #[test]
    fn test_zero_workers_is_clamped_to_one() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.workers(), 1);

        let report = pool.run(1..=5, |i| i, |_| {}).unwrap();
        assert_eq!(report.per_worker, vec![5]);
    }

    #[test]
    fn test_empty_input_stops_all_workers() {
        let report = WorkerPool::new(8)
            .run(Vec::<u32>::new(), |i| i, |_| {})
            .unwrap();
        assert_eq!(report.submitted, 0);
        assert_eq!(report.processed, 0);
        assert_eq!(report.per_worker, vec![0; 8]);
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let result = WorkerPool::new(2).run(
            0..10,
            |i| {
                if i == 3 {
                    panic!("bad item");
                }
                i
            },
            |_| {},
        );

        assert_matches!(
            result,
            Err(PoolError::WorkerPanicked { message, .. }) if message == "bad item"
        );
    }
}
