//! Serialized conversion queue.
//!
//! A single worker task pulls jobs in submission order and runs one FFmpeg
//! process at a time. Every output line and the final outcome of each job
//! are handed to a [`JobObserver`] as they happen.

use crate::core::lines::LineReader;
use crate::models::config::FfmpegConfig;
use crate::models::job::{ConversionJob, JobOutcome, QueueEvent};
use crate::services::ffmpeg;
use crate::Result;
use os_pipe::PipeReader;
use std::io::BufReader;
use std::process::ExitStatus;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Child;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Upper bound on how long a stopped FFmpeg gets to finish its output file.
const QUIT_GRACE: Duration = Duration::from_secs(5);

/// Receives queue events from the worker.
///
/// Implementations must not block: the worker calls `notify` between reads
/// of the process output.
pub trait JobObserver: Send + Sync + 'static {
    fn notify(&self, event: QueueEvent);
}

impl JobObserver for mpsc::UnboundedSender<QueueEvent> {
    fn notify(&self, event: QueueEvent) {
        // A closed receiver means nobody is displaying output any more.
        let _ = self.send(event);
    }
}

/// Result of [`JobQueue::shutdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// All submitted work finished within the grace period.
    pub drained: bool,
    /// Jobs (running or queued) left without a terminal event.
    pub forced: usize,
}

impl ShutdownReport {
    fn drained() -> Self {
        Self {
            drained: true,
            forced: 0,
        }
    }
}

/// Single-worker FIFO queue of conversion jobs.
pub struct JobQueue {
    /// `None` once shutdown has begun.
    sender: Mutex<Option<mpsc::UnboundedSender<ConversionJob>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    /// Set when the grace period ran out; the worker stops its process.
    stop: watch::Sender<bool>,
    /// Submitted jobs without a terminal event yet.
    unfinished: Arc<AtomicUsize>,
}

impl JobQueue {
    /// Start a queue and its worker. Must be called inside a tokio runtime.
    pub fn new<O: JobObserver>(config: FfmpegConfig, observer: O) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (stop, stop_rx) = watch::channel(false);
        let unfinished = Arc::new(AtomicUsize::new(0));

        let worker = tokio::spawn(worker_loop(
            receiver,
            stop_rx,
            config,
            Arc::new(observer),
            Arc::clone(&unfinished),
        ));

        Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            stop,
            unfinished,
        }
    }

    /// Start a queue whose events arrive on the returned channel.
    pub fn with_channel(config: FfmpegConfig) -> (Self, mpsc::UnboundedReceiver<QueueEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(config, tx), rx)
    }

    /// Enqueue a job without waiting.
    ///
    /// Returns false, and drops the job, once shutdown has begun.
    pub fn submit(&self, job: ConversionJob) -> bool {
        let sender = lock(&self.sender);
        let Some(sender) = sender.as_ref() else {
            tracing::warn!(
                "Queue is shutting down, dropping: {}",
                job.input().display()
            );
            return false;
        };

        tracing::info!("Queuing conversion for: {}", job.input().display());
        self.unfinished.fetch_add(1, Ordering::SeqCst);
        match sender.send(job) {
            Ok(()) => true,
            Err(mpsc::error::SendError(job)) => {
                self.unfinished.fetch_sub(1, Ordering::SeqCst);
                tracing::error!("Worker stopped, dropping: {}", job.input().display());
                false
            }
        }
    }

    /// Jobs submitted but not yet finished, including the running one.
    pub fn unfinished(&self) -> usize {
        self.unfinished.load(Ordering::SeqCst)
    }

    /// Whether `submit` still accepts jobs.
    pub fn is_accepting(&self) -> bool {
        lock(&self.sender).is_some()
    }

    /// Stop accepting jobs and wait up to `grace` for the queue to drain.
    ///
    /// If the worker is still busy after `grace`, the running FFmpeg is sent
    /// `q` and given up to `min(grace, 5s)` more to write its output; queued
    /// jobs are discarded. A process still alive after that is killed.
    /// Calling this again returns immediately.
    pub async fn shutdown(&self, grace: Duration) -> ShutdownReport {
        drop(lock(&self.sender).take());

        let Some(mut worker) = lock(&self.worker).take() else {
            return ShutdownReport::drained();
        };

        tracing::debug!(
            "Shutting down queue with {} unfinished job(s)",
            self.unfinished()
        );

        match tokio::time::timeout(grace, &mut worker).await {
            Ok(Ok(())) => return ShutdownReport::drained(),
            Ok(Err(e)) => tracing::error!("Queue worker ended abnormally: {}", e),
            Err(_) => {
                tracing::warn!(
                    "Queue not drained after {:?}, stopping {} job(s)",
                    grace,
                    self.unfinished()
                );
                let _ = self.stop.send(true);

                if tokio::time::timeout(QUIT_GRACE.min(grace), &mut worker)
                    .await
                    .is_err()
                {
                    tracing::warn!("FFmpeg did not quit in time, killing it");
                    worker.abort();
                    let _ = worker.await;
                }
            }
        }

        ShutdownReport {
            drained: false,
            forced: self.unfinished(),
        }
    }
}

impl Drop for JobQueue {
    fn drop(&mut self) {
        if let Some(worker) = lock(&self.worker).take() {
            worker.abort();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Worker task: run jobs one by one until the sender side is dropped or a
/// stop is requested.
async fn worker_loop(
    mut receiver: mpsc::UnboundedReceiver<ConversionJob>,
    mut stop: watch::Receiver<bool>,
    config: FfmpegConfig,
    observer: Arc<dyn JobObserver>,
    unfinished: Arc<AtomicUsize>,
) {
    while let Some(job) = receiver.recv().await {
        let stopping = *stop.borrow();
        if stopping {
            tracing::debug!("Stop requested, discarding queued jobs");
            return;
        }
        run_job(&job, &config, observer.as_ref(), &mut stop).await;
        unfinished.fetch_sub(1, Ordering::SeqCst);
    }
    tracing::debug!("Queue worker drained");
}

/// Run one job to completion and report it.
///
/// Emits `Started`, then one `Line` per output line, then exactly one
/// `Finished`. Errors never escape: they become a failed outcome.
async fn run_job(
    job: &ConversionJob,
    config: &FfmpegConfig,
    observer: &dyn JobObserver,
    stop: &mut watch::Receiver<bool>,
) -> JobOutcome {
    tracing::debug!("Running: {}", ffmpeg::command_line(job, config));
    observer.notify(QueueEvent::Started {
        id: job.id(),
        input: job.input().to_path_buf(),
    });

    let outcome = match execute(job, config, observer, stop).await {
        Ok(status) if status.success() => JobOutcome::Succeeded,
        Ok(status) => JobOutcome::Failed {
            reason: format!("ffmpeg {}", status),
        },
        Err(e) => {
            tracing::error!("Error converting {}: {}", job.input().display(), e);
            JobOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    observer.notify(QueueEvent::Finished {
        id: job.id(),
        input: job.input().to_path_buf(),
        outcome: outcome.clone(),
    });
    outcome
}

/// Spawn FFmpeg, forward its merged output, wait for exit.
async fn execute(
    job: &ConversionJob,
    config: &FfmpegConfig,
    observer: &dyn JobObserver,
    stop: &mut watch::Receiver<bool>,
) -> Result<ExitStatus> {
    let (mut child, output) = ffmpeg::spawn_conversion(job, config)?;

    // The pipe is a blocking handle; read it off the runtime and hand the
    // lines over in order.
    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    let reading = tokio::task::spawn_blocking(move || forward_lines(output, line_tx));

    let mut quitting = false;
    loop {
        tokio::select! {
            line = line_rx.recv() => match line {
                Some(line) => observer.notify(QueueEvent::Line { id: job.id(), line }),
                None => break,
            },
            _ = stop_requested(stop), if !quitting => {
                quitting = true;
                request_quit(&mut child).await;
            }
        }
    }

    reading
        .await
        .map_err(|e| crate::Error::other(format!("output reader failed: {}", e)))??;

    Ok(child.wait().await?)
}

/// Read lines until EOF or until nobody is listening.
fn forward_lines(output: PipeReader, lines: mpsc::UnboundedSender<String>) -> std::io::Result<()> {
    let mut reader = LineReader::new(BufReader::new(output));
    while let Some(line) = reader.next_line()? {
        if lines.send(line).is_err() {
            break;
        }
    }
    Ok(())
}

/// Resolves once a stop is requested. Never resolves if the queue is gone.
async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    if stop.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Ask FFmpeg to finish up, the way its interactive `q` key does.
async fn request_quit(child: &mut Child) {
    tracing::info!("Asking FFmpeg to quit");
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(b"q").await {
            tracing::debug!("Could not send quit to FFmpeg: {}", e);
        }
    }
}
