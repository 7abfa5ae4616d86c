use std::{
    collections::HashMap,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use tracing::{debug, trace, warn};

use crate::core::{
    id::NodeId,
    render::{Bitmap, ImageId, Painter},
};

/// A boxed background render job.
pub type RenderJob = Box<dyn FnOnce() -> Bitmap + Send>;

/// Identifies one prerendered image: a node at a content revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrerenderKey {
    /// Node that owns the image.
    pub node: NodeId,
    /// Widget-defined content revision.
    pub revision: u64,
}

/// Lifecycle of one prerender request.
enum Slot {
    /// Submitted to the pool.
    Pending,
    /// Rendered, waiting for upload on the render thread.
    Ready(Bitmap),
    /// Uploaded to the painter.
    Uploaded(ImageId),
}

/// Fixed pool of worker threads that render widget chrome into bitmaps.
///
/// Jobs go out on one channel, which every worker receives from, and results
/// come back on another. The canvas
/// drains results without blocking at the start of each draw, and uploads
/// them to the painter the first time a widget asks for them. Nothing in the
/// draw path ever waits on a worker.
pub struct Prerenderer {
    /// Job queue. `None` once shutdown has begun.
    jobs: Option<Sender<(PrerenderKey, RenderJob)>>,
    /// Finished bitmaps.
    results: Receiver<(PrerenderKey, Bitmap)>,
    /// Worker handles, joined on drop.
    workers: Vec<JoinHandle<()>>,
    /// Known requests.
    slots: HashMap<PrerenderKey, Slot>,
}

impl Prerenderer {
    /// Spawn a pool with `workers` threads (at least one).
    pub fn new(workers: usize) -> Self {
        let (job_tx, job_rx) = unbounded::<(PrerenderKey, RenderJob)>();
        let (result_tx, result_rx) = unbounded();
        let workers = (0..workers.max(1))
            .map(|i| {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                thread::Builder::new()
                    .name(format!("arbor-prerender-{i}"))
                    .spawn(move || worker(&job_rx, &result_tx))
            })
            .filter_map(|spawned| match spawned {
                Ok(h) => Some(h),
                Err(e) => {
                    warn!(%e, "failed to spawn prerender worker");
                    None
                }
            })
            .collect();
        Self {
            jobs: Some(job_tx),
            results: result_rx,
            workers,
            slots: HashMap::new(),
        }
    }

    /// Move finished bitmaps into their slots without blocking.
    pub fn poll(&mut self) {
        while let Ok((key, bitmap)) = self.results.try_recv() {
            self.complete(key, bitmap);
        }
    }

    /// Block until every pending job has finished or `timeout` elapses.
    /// Returns true if nothing is left pending.
    pub fn flush(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.poll();
        while self.pending() > 0 {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.results.recv_timeout(left) {
                Ok((key, bitmap)) => self.complete(key, bitmap),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        self.pending() == 0
    }

    /// Record a finished job, unless it was evicted while in flight.
    fn complete(&mut self, key: PrerenderKey, bitmap: Bitmap) {
        match self.slots.get_mut(&key) {
            Some(slot @ Slot::Pending) => {
                trace!(?key, "prerender ready");
                *slot = Slot::Ready(bitmap);
            }
            _ => trace!(?key, "discarding stale prerender"),
        }
    }

    /// Look up or submit the image for `key`.
    ///
    /// Ready bitmaps are uploaded through `painter` on first use. A request
    /// for a new revision deletes the node's older images.
    pub fn request(
        &mut self,
        key: PrerenderKey,
        painter: &mut dyn Painter,
        job: RenderJob,
    ) -> Option<ImageId> {
        match self.slots.remove(&key) {
            Some(Slot::Uploaded(id)) => {
                self.slots.insert(key, Slot::Uploaded(id));
                Some(id)
            }
            Some(Slot::Ready(bitmap)) => {
                let id = painter.create_image(&bitmap);
                self.slots.insert(key, Slot::Uploaded(id));
                Some(id)
            }
            Some(Slot::Pending) => {
                self.slots.insert(key, Slot::Pending);
                None
            }
            None => {
                self.evict_where(painter, |k| k.node == key.node);
                let Some(jobs) = &self.jobs else {
                    return None;
                };
                if jobs.send((key, job)).is_err() {
                    warn!("prerender pool is gone");
                    return None;
                }
                self.slots.insert(key, Slot::Pending);
                None
            }
        }
    }

    /// Drop every image whose node fails `alive`.
    pub fn retain_nodes(&mut self, painter: &mut dyn Painter, alive: impl Fn(NodeId) -> bool) {
        self.evict_where(painter, |k| !alive(k.node));
    }

    /// Remove matching slots, deleting uploaded images.
    fn evict_where(
        &mut self,
        painter: &mut dyn Painter,
        mut pred: impl FnMut(&PrerenderKey) -> bool,
    ) {
        let doomed: Vec<PrerenderKey> = self.slots.keys().filter(|k| pred(k)).copied().collect();
        for key in doomed {
            if let Some(Slot::Uploaded(id)) = self.slots.remove(&key) {
                debug!(?key, "evicting prerendered image");
                painter.delete_image(id);
            }
        }
    }

    /// Number of jobs still in flight.
    pub fn pending(&self) -> usize {
        self.slots
            .values()
            .filter(|s| matches!(s, Slot::Pending))
            .count()
    }

    /// Number of tracked images in any state.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Is nothing tracked?
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Drop for Prerenderer {
    fn drop(&mut self) {
        self.jobs.take();
        for w in self.workers.drain(..) {
            if w.join().is_err() {
                warn!("prerender worker panicked");
            }
        }
    }
}

/// Worker loop: render jobs until the queue closes.
fn worker(jobs: &Receiver<(PrerenderKey, RenderJob)>, results: &Sender<(PrerenderKey, Bitmap)>) {
    for (key, job) in jobs {
        if results.send((key, job())).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};

    use slotmap::SlotMap;

    use super::*;
    use crate::core::testing::RecordingPainter;

    fn key(revision: u64) -> (SlotMap<NodeId, ()>, PrerenderKey) {
        let mut sm = SlotMap::with_key();
        let node = sm.insert(());
        (sm, PrerenderKey { node, revision })
    }

    fn solid() -> RenderJob {
        Box::new(|| {
            let mut b = Bitmap::new(2, 2);
            b.put(0, 0, [255, 0, 0, 255]);
            b
        })
    }

    #[test]
    fn request_then_upload() {
        let mut p = Prerenderer::new(2);
        let mut painter = RecordingPainter::new();
        let (_sm, k) = key(1);

        assert_eq!(p.request(k, &mut painter, solid()), None);
        assert_eq!(p.pending(), 1);
        assert!(p.flush(Duration::from_secs(5)));

        let id = p.request(k, &mut painter, solid()).unwrap();
        assert_eq!(painter.images_created(), 1);
        // Second request reuses the upload.
        assert_eq!(p.request(k, &mut painter, solid()), Some(id));
        assert_eq!(painter.images_created(), 1);
    }

    #[test]
    fn new_revision_evicts_old() {
        let mut p = Prerenderer::new(1);
        let mut painter = RecordingPainter::new();
        let (_sm, k1) = key(1);
        let k2 = PrerenderKey { revision: 2, ..k1 };

        p.request(k1, &mut painter, solid());
        assert!(p.flush(Duration::from_secs(5)));
        let old = p.request(k1, &mut painter, solid()).unwrap();

        assert_eq!(p.request(k2, &mut painter, solid()), None);
        assert!(painter.images_deleted().contains(&old));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn workers_render_concurrently() {
        let mut p = Prerenderer::new(2);
        let mut painter = RecordingPainter::new();
        let mut sm: SlotMap<NodeId, ()> = SlotMap::with_key();
        // Each job waits for the other, so both must be running at once.
        let gate = Arc::new(Barrier::new(2));
        for _ in 0..2 {
            let k = PrerenderKey {
                node: sm.insert(()),
                revision: 1,
            };
            let gate = Arc::clone(&gate);
            let job: RenderJob = Box::new(move || {
                gate.wait();
                Bitmap::new(1, 1)
            });
            assert_eq!(p.request(k, &mut painter, job), None);
        }
        assert!(p.flush(Duration::from_secs(5)));
        assert_eq!(p.pending(), 0);
    }

    #[test]
    fn retain_drops_dead_nodes() {
        let mut p = Prerenderer::new(1);
        let mut painter = RecordingPainter::new();
        let (_sm, k) = key(7);
        p.request(k, &mut painter, solid());
        assert!(p.flush(Duration::from_secs(5)));
        p.request(k, &mut painter, solid()).unwrap();

        p.retain_nodes(&mut painter, |_| false);
        assert!(p.is_empty());
        assert_eq!(painter.images_deleted().len(), 1);
    }
}
