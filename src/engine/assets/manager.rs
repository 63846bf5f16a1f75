// Image store: asynchronous decoding with explicit completion events

use super::{AssetError, AssetLoader, ImageEvent, ImageHandle, LoadState};
use image::RgbaImage;
use log::{debug, info, warn};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

/// Jobs each decode worker may hold before `request` spills into the backlog
const DECODE_QUEUE_DEPTH: usize = 16;

/// Read access to decoded pixels
///
/// Collision tests only need this trait, which keeps them usable with
/// anything that can hand out decoded images.
pub trait ImageLookup {
    /// Decoded pixels for `handle`, or `None` while pending or after failure
    fn image(&self, handle: ImageHandle) -> Option<&RgbaImage>;
}

/// Outcome of a background decode, waiting to be collected
enum Completion {
    Decoded(ImageHandle, RgbaImage),
    Failed(ImageHandle, String),
}

/// Queue shared between the store and its decode workers
#[derive(Clone, Default)]
struct CompletionQueue {
    completions: Arc<Mutex<Vec<Completion>>>,
}

impl CompletionQueue {
    fn push(&self, completion: Completion) {
        if let Ok(mut completions) = self.completions.lock() {
            completions.push(completion);
        }
    }

    fn drain(&self) -> Vec<Completion> {
        self.completions
            .lock()
            .map(|mut completions| completions.drain(..).collect())
            .unwrap_or_default()
    }
}

struct DecodeJob {
    handle: ImageHandle,
    source: String,
}

/// Fixed set of decode threads, each fed by its own bounded channel
///
/// Workers exit once the pool, and with it every sender, is dropped.
struct DecodePool {
    senders: Vec<mpsc::SyncSender<DecodeJob>>,
    next_sender: usize,
}

impl DecodePool {
    fn spawn(loader: &Arc<AssetLoader>, queue: &CompletionQueue, workers: usize) -> Self {
        let mut senders = Vec::with_capacity(workers);
        for index in 0..workers {
            let (tx, rx) = mpsc::sync_channel::<DecodeJob>(DECODE_QUEUE_DEPTH);
            let loader = Arc::clone(loader);
            let queue = queue.clone();

            let spawned = thread::Builder::new()
                .name(format!("image-decode-{index}"))
                .spawn(move || {
                    while let Ok(job) = rx.recv() {
                        let completion = match loader.load_image(&job.source) {
                            Ok(pixels) => Completion::Decoded(job.handle, pixels),
                            Err(err) => Completion::Failed(job.handle, format!("{:#}", err)),
                        };
                        queue.push(completion);
                    }
                });

            match spawned {
                Ok(_) => senders.push(tx),
                Err(err) => warn!("Could not spawn image decode worker {}: {}", index, err),
            }
        }

        debug!("Image decode pool running {} workers", senders.len());
        Self {
            senders,
            next_sender: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Hand `job` to the next worker with room; gives it back when every queue is full
    fn submit(&mut self, job: DecodeJob) -> Result<(), DecodeJob> {
        let len = self.senders.len();
        let mut job = job;
        for offset in 0..len {
            let idx = (self.next_sender + offset) % len;
            match self.senders[idx].try_send(job) {
                Ok(()) => {
                    self.next_sender = (idx + 1) % len;
                    return Ok(());
                }
                Err(mpsc::TrySendError::Full(returned))
                | Err(mpsc::TrySendError::Disconnected(returned)) => job = returned,
            }
        }
        Err(job)
    }
}

struct ImageSlot {
    source: String,
    state: LoadState,
    pixels: Option<RgbaImage>,
}

/// Registry of image sources and their decoded pixels
///
/// `request` registers a source and queues it on a small pool of decode
/// threads, started on first use. Nothing blocks on that work: the driver
/// calls [`ImageStore::poll_events`] once per tick and forwards the returned
/// events to whoever cares.
pub struct ImageStore {
    loader: Arc<AssetLoader>,
    slots: Vec<ImageSlot>,
    by_source: HashMap<String, ImageHandle>,
    queue: CompletionQueue,
    workers: usize,
    pool: Option<DecodePool>,
    /// Jobs that found every worker queue full
    backlog: VecDeque<DecodeJob>,
    in_flight: usize,
}

impl ImageStore {
    /// Create a store resolving sources against `asset_root`
    pub fn new<P: AsRef<Path>>(asset_root: P) -> Self {
        let workers = thread::available_parallelism()
            .map(|n| n.get().clamp(2, 4))
            .unwrap_or(2);
        Self::with_workers(asset_root, workers)
    }

    /// Create a store decoding on `workers` threads (at least one)
    pub fn with_workers<P: AsRef<Path>>(asset_root: P, workers: usize) -> Self {
        Self {
            loader: Arc::new(AssetLoader::new(asset_root)),
            slots: Vec::new(),
            by_source: HashMap::new(),
            queue: CompletionQueue::default(),
            workers: workers.max(1),
            pool: None,
            backlog: VecDeque::new(),
            in_flight: 0,
        }
    }

    /// Register `source` and queue it for background decoding
    ///
    /// Requesting a known source returns its existing handle without
    /// decoding again. Sources without a supported image extension fail
    /// right away; their `Failed` event still arrives through `poll_events`.
    pub fn request(&mut self, source: &str) -> ImageHandle {
        if let Some(&handle) = self.by_source.get(source) {
            return handle;
        }

        let handle = self.register(source);
        self.in_flight += 1;

        if !AssetLoader::is_supported(source) {
            let reason = AssetError::Unsupported(source.to_string()).to_string();
            self.queue.push(Completion::Failed(handle, reason));
            return handle;
        }

        self.dispatch(DecodeJob {
            handle,
            source: source.to_string(),
        });
        debug!("Requested {} as {}", source, handle);
        handle
    }

    /// Register already-decoded pixels under `source`
    ///
    /// The completion is still delivered through [`ImageStore::poll_events`],
    /// so subscribers see in-memory images exactly like decoded files.
    pub fn insert(&mut self, source: &str, pixels: RgbaImage) -> ImageHandle {
        let handle = match self.by_source.get(source) {
            Some(&handle) => handle,
            None => self.register(source),
        };
        self.queue.push(Completion::Decoded(handle, pixels));
        self.in_flight += 1;
        handle
    }

    /// Collect finished decodes and return their completion events
    pub fn poll_events(&mut self) -> Vec<ImageEvent> {
        self.flush_backlog();

        let completions = self.queue.drain();
        let mut events = Vec::with_capacity(completions.len());

        for completion in completions {
            self.in_flight = self.in_flight.saturating_sub(1);
            match completion {
                Completion::Decoded(handle, pixels) => {
                    let (width, height) = pixels.dimensions();
                    if let Some(slot) = self.slots.get_mut(handle.raw() as usize) {
                        info!("Decoded {} ({}x{})", slot.source, width, height);
                        slot.state = LoadState::Ready;
                        slot.pixels = Some(pixels);
                        events.push(ImageEvent::Loaded {
                            handle,
                            width,
                            height,
                        });
                    }
                }
                Completion::Failed(handle, reason) => {
                    if let Some(slot) = self.slots.get_mut(handle.raw() as usize) {
                        warn!("Failed to decode {}: {}", slot.source, reason);
                        slot.state = LoadState::Failed;
                        slot.pixels = None;
                        events.push(ImageEvent::Failed { handle, reason });
                    }
                }
            }
        }

        events
    }

    /// Handle registered for `source`, if any
    pub fn handle(&self, source: &str) -> Option<ImageHandle> {
        self.by_source.get(source).copied()
    }

    /// Source string a handle was registered with
    pub fn source(&self, handle: ImageHandle) -> Option<&str> {
        self.slots
            .get(handle.raw() as usize)
            .map(|slot| slot.source.as_str())
    }

    /// Decode state of `handle`; unknown handles report `Failed`
    pub fn state(&self, handle: ImageHandle) -> LoadState {
        self.slots
            .get(handle.raw() as usize)
            .map(|slot| slot.state)
            .unwrap_or(LoadState::Failed)
    }

    /// Pixel size of a decoded image
    pub fn dimensions(&self, handle: ImageHandle) -> Option<(u32, u32)> {
        self.image(handle).map(|img| img.dimensions())
    }

    /// Number of completions not yet collected by `poll_events`
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Get statistics about registered images
    pub fn stats(&self) -> ImageStats {
        let mut stats = ImageStats::default();
        for slot in &self.slots {
            match slot.state {
                LoadState::Pending => stats.pending += 1,
                LoadState::Ready => stats.ready += 1,
                LoadState::Failed => stats.failed += 1,
            }
        }
        stats
    }

    /// Hand a job to the pool, parking it in the backlog when every worker is busy
    fn dispatch(&mut self, job: DecodeJob) {
        let (loader, queue, workers) = (&self.loader, &self.queue, self.workers);
        let pool = self
            .pool
            .get_or_insert_with(|| DecodePool::spawn(loader, queue, workers));

        if pool.is_empty() {
            self.queue
                .push(Completion::Failed(job.handle, "no decode workers".to_string()));
            return;
        }
        if let Err(job) = pool.submit(job) {
            self.backlog.push_back(job);
        }
    }

    /// Retry parked jobs in order until the workers are full again
    fn flush_backlog(&mut self) {
        let Some(pool) = self.pool.as_mut() else {
            return;
        };
        while let Some(job) = self.backlog.pop_front() {
            if let Err(job) = pool.submit(job) {
                self.backlog.push_front(job);
                break;
            }
        }
    }

    fn register(&mut self, source: &str) -> ImageHandle {
        let handle = ImageHandle(self.slots.len() as u32);
        self.slots.push(ImageSlot {
            source: source.to_string(),
            state: LoadState::Pending,
            pixels: None,
        });
        self.by_source.insert(source.to_string(), handle);
        handle
    }
}

impl ImageLookup for ImageStore {
    fn image(&self, handle: ImageHandle) -> Option<&RgbaImage> {
        self.slots
            .get(handle.raw() as usize)
            .and_then(|slot| slot.pixels.as_ref())
    }
}

/// Statistics about registered images
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageStats {
    pub pending: usize,
    pub ready: usize,
    pub failed: usize,
}
