//! Fan-out of a directory listing into concurrent chunk workers.
//!
//! Each chunk of `batch_size` entries gets its own task that walks the chunk
//! sequentially. All workers push onto one channel sized to the input, so a
//! send never waits for space. A coordinator task joins every worker and then
//! drops the last sender, which is what ends the aggregator's drain.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;

use crate::error::PipelineError;
use crate::types::Flyer;

use super::aggregate::{Aggregate, Aggregator};
use super::discovery::ListedEntry;
use super::entry::EntryBuilder;
use super::inspect::ImageInspector;

/// One message from a worker: a finished entry or a file it gave up on.
#[derive(Debug)]
pub enum BatchEvent {
    Entry(Box<Flyer>),
    Skipped(PipelineError),
}

/// Running fan-out whose results are read from `receiver`.
pub struct Dispatch {
    /// Closed once every worker has finished
    pub receiver: mpsc::Receiver<BatchEvent>,
    /// Number of chunk workers spawned
    pub batches: usize,
    occupancy: Arc<Occupancy>,
    coordinator: JoinHandle<()>,
}

impl Dispatch {
    /// Most chunk workers seen running at the same time so far.
    pub fn peak_concurrency(&self) -> usize {
        self.occupancy.peak.load(Ordering::SeqCst)
    }

    /// Wait for the coordinator after the receiver has been drained.
    pub async fn finish(self) -> usize {
        if let Err(e) = self.coordinator.await {
            tracing::error!("Batch coordinator failed: {}", e);
        }
        self.batches
    }
}

/// Splits a listing into chunks and inspects each chunk on its own task.
#[derive(Clone)]
pub struct BatchScheduler {
    inspector: Arc<ImageInspector>,
    builder: Arc<EntryBuilder>,
    max_concurrent: Option<Arc<Semaphore>>,
}

impl BatchScheduler {
    /// Create a scheduler. `max_concurrent_batches` caps how many chunk
    /// workers run at once; `None` lets every chunk run immediately.
    pub fn new(
        inspector: ImageInspector,
        builder: EntryBuilder,
        max_concurrent_batches: Option<usize>,
    ) -> Self {
        Self {
            inspector: Arc::new(inspector),
            builder: Arc::new(builder),
            max_concurrent: max_concurrent_batches.map(|n| Arc::new(Semaphore::new(n.max(1)))),
        }
    }

    /// Number of workers `dispatch` spawns for `len` entries.
    pub fn batch_count(len: usize, batch_size: usize) -> usize {
        len.div_ceil(batch_size.max(1))
    }

    /// Spawn one worker per chunk plus the coordinator, returning at once.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, entries: Vec<ListedEntry>, batch_size: usize) -> Dispatch {
        // chunks() panics on zero
        let batch_size = batch_size.max(1);
        let (tx, receiver) = mpsc::channel(entries.len().max(1));
        let occupancy = Arc::new(Occupancy::default());

        let handles: Vec<JoinHandle<()>> = entries
            .chunks(batch_size)
            .enumerate()
            .map(|(index, chunk)| {
                let worker = Worker {
                    index,
                    chunk: chunk.to_vec(),
                    inspector: Arc::clone(&self.inspector),
                    builder: Arc::clone(&self.builder),
                    results: tx.clone(),
                    gate: self.max_concurrent.clone(),
                    occupancy: Arc::clone(&occupancy),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        let batches = handles.len();
        tracing::debug!(
            "Dispatched {} entries across {} batch(es) of up to {}",
            entries.len(),
            batches,
            batch_size
        );

        let coordinator = tokio::spawn(async move {
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::error!("Batch worker failed: {}", e);
                }
            }
            drop(tx);
        });

        Dispatch {
            receiver,
            batches,
            occupancy,
            coordinator,
        }
    }

    /// Dispatch every chunk and drain the results once all workers are done.
    pub async fn schedule(&self, entries: Vec<ListedEntry>, batch_size: usize) -> Aggregate {
        let mut dispatch = self.dispatch(entries, batch_size);
        let mut aggregate = Aggregator::drain(&mut dispatch.receiver).await;
        aggregate.peak_concurrency = dispatch.peak_concurrency();
        aggregate.batches = dispatch.finish().await;
        tracing::debug!(
            "Peak of {} batch(es) running at once",
            aggregate.peak_concurrency
        );
        aggregate
    }
}

/// Count of running workers and its high-water mark.
#[derive(Debug, Default)]
struct Occupancy {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl Occupancy {
    fn enter(self: &Arc<Self>) -> Running {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        Running(Arc::clone(self))
    }
}

/// Held while a worker runs.
struct Running(Arc<Occupancy>);

impl Drop for Running {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// State owned by one chunk task.
struct Worker {
    index: usize,
    chunk: Vec<ListedEntry>,
    inspector: Arc<ImageInspector>,
    builder: Arc<EntryBuilder>,
    results: mpsc::Sender<BatchEvent>,
    gate: Option<Arc<Semaphore>>,
    occupancy: Arc<Occupancy>,
}

impl Worker {
    async fn run(self) {
        let _permit = match &self.gate {
            Some(gate) => match Arc::clone(gate).acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(_) => return,
            },
            None => None,
        };
        let _running = self.occupancy.enter();

        tracing::trace!("Batch {} started ({} entries)", self.index, self.chunk.len());

        for entry in &self.chunk {
            if entry.is_dir {
                continue;
            }

            let result = match self.inspector.inspect(&entry.path).await {
                Ok(inspection) => self.builder.build(entry, inspection),
                Err(e) => Err(e),
            };

            let event = match result {
                Ok(flyer) => {
                    tracing::debug!(
                        "Inspected {:?}: {}x{} {}",
                        entry.file_name,
                        flyer.design.resolution.width,
                        flyer.design.resolution.height,
                        flyer.design.orientation
                    );
                    BatchEvent::Entry(Box::new(flyer))
                }
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", entry.file_name, e);
                    BatchEvent::Skipped(e)
                }
            };

            if self.results.send(event).await.is_err() {
                // Receiver dropped, nobody is collecting any more
                break;
            }
        }

        tracing::trace!("Batch {} finished", self.index);
    }
}
