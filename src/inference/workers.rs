//! Lightweight worker pool for CPU bound prediction batches.

use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

pub struct Pool {
    tx: Option<mpsc::Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl Pool {
    /// Spawn `size` workers (at least one).
    pub fn new(size: usize) -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        let shared_rx = Arc::new(Mutex::new(rx));

        let workers = (0..size.max(1))
            .map(|idx| {
                let rx = Arc::clone(&shared_rx);
                thread::Builder::new()
                    .name(format!("predict-{idx}"))
                    .spawn(move || loop {
                        let job = {
                            let Ok(guard) = rx.lock() else { break };
                            guard.recv()
                        };

                        match job {
                            Ok(job) => job(),
                            Err(_) => break,
                        }
                    })
            })
            .filter_map(|spawned| match spawned {
                Ok(handle) => Some(handle),
                Err(err) => {
                    log::warn!(target: "workers", "failed to spawn worker: {err}");
                    None
                }
            })
            .collect();

        Self {
            tx: Some(tx),
            workers,
        }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(tx) = &self.tx {
            let _ = tx.send(Box::new(job));
        }
    }
}

impl Drop for Pool {
    /// Close the queue, let queued jobs finish, then join every worker.
    fn drop(&mut self) {
        self.tx.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}
