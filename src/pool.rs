// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The worker pool.
//!
//! A fixed set of long-lived threads, each responsible for one band of
//! rows of the frame.  A frame is rendered in one barrier cycle: the
//! pool hands every worker a "ready" token carrying the cycle number,
//! then waits for every worker to hand the same number back on its
//! "finished" channel.  Only once all of them have is the frame
//! complete and safe to read.
//!
//! The render context sits behind a read-write lock.  Workers hold the
//! read side for the whole of their compute phase; the orchestrator
//! takes the write side to change anything between cycles.  Since
//! both `render_frame` and `context_mut` need the pool mutably, the
//! orchestrator can never be editing the context while a cycle is in
//! flight.
//!
//! Idle workers do not block forever: they wait for their ready token
//! with a short timeout and check the pool's running flag every time
//! it expires.  Shutting down therefore takes up to one poll interval.

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::frame::row_range;
use crate::render::render_band;
use crate::timer::Timer;
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, trace, warn, Level};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Where a worker is in the barrier cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorkerState {
    /// Idle, polling for the next ready token.
    WaitingForReady,
    /// Rendering its band for the given cycle.
    Computing(u64),
    /// Done with the given cycle, about to report back.
    Finished(u64),
    /// Leaving for good.
    ShutdownRequested,
}

struct Worker {
    index: usize,
    workers: usize,
    context: Arc<RwLock<RenderContext>>,
    running: Arc<AtomicBool>,
    ready: Receiver<u64>,
    finished: Sender<u64>,
    poll_interval: Duration,
}

impl Worker {
    fn run(self) {
        debug!("worker {} started", self.index);
        let mut state = WorkerState::WaitingForReady;
        loop {
            state = match state {
                WorkerState::WaitingForReady => self.wait_for_ready(),
                WorkerState::Computing(cycle) => {
                    self.compute(cycle);
                    WorkerState::Finished(cycle)
                }
                WorkerState::Finished(cycle) => match self.finished.send(cycle) {
                    Ok(()) => WorkerState::WaitingForReady,
                    Err(_) => WorkerState::ShutdownRequested,
                },
                WorkerState::ShutdownRequested => break,
            };
        }
        debug!("worker {} stopped", self.index);
    }

    fn wait_for_ready(&self) -> WorkerState {
        match self.ready.recv_timeout(self.poll_interval) {
            Ok(cycle) => WorkerState::Computing(cycle),
            Err(RecvTimeoutError::Timeout) => {
                if self.running.load(Ordering::Acquire) {
                    WorkerState::WaitingForReady
                } else {
                    WorkerState::ShutdownRequested
                }
            }
            Err(RecvTimeoutError::Disconnected) => WorkerState::ShutdownRequested,
        }
    }

    fn compute(&self, cycle: u64) {
        let label = format!("worker {} cycle {}", self.index, cycle);
        let _timer = Timer::with_level(label, Level::Trace);
        let context = self.context.read().unwrap_or_else(PoisonError::into_inner);
        let mut band = context.frame().band(self.index);
        debug_assert_eq!(
            band.rows(),
            row_range(self.index, self.workers, context.frame().height())
        );
        render_band(&context, &mut band);
    }
}

struct WorkerHandle {
    ready: Sender<u64>,
    finished: Receiver<u64>,
    thread: JoinHandle<()>,
}

/// Owns the render context, the workers, and the flag that keeps them
/// running.
pub struct WorkerPool {
    context: Arc<RwLock<RenderContext>>,
    running: Arc<AtomicBool>,
    workers: Vec<WorkerHandle>,
    cycle: u64,
}

impl WorkerPool {
    /// Starts `workers` workers over `context`.  If the context's frame
    /// was laid out for a different number of workers it is
    /// reallocated.
    pub fn spawn(
        mut context: RenderContext,
        workers: usize,
        poll_interval: Duration,
    ) -> Result<WorkerPool, RenderError> {
        if workers == 0 {
            return Err(RenderError::InvalidWorkerCount(workers));
        }
        if context.frame().band_count() != workers {
            let (width, height) = (context.frame().width(), context.frame().height());
            context.reallocate(width, height, workers)?;
        }

        let mut pool = WorkerPool {
            context: Arc::new(RwLock::new(context)),
            running: Arc::new(AtomicBool::new(true)),
            workers: Vec::with_capacity(workers),
            cycle: 0,
        };
        for index in 0..workers {
            let (ready_tx, ready_rx) = channel::bounded(1);
            let (finished_tx, finished_rx) = channel::bounded(1);
            let worker = Worker {
                index,
                workers,
                context: Arc::clone(&pool.context),
                running: Arc::clone(&pool.running),
                ready: ready_rx,
                finished: finished_tx,
                poll_interval,
            };
            // On failure the pool is dropped here, which stops the
            // workers already started.
            let thread = thread::Builder::new()
                .name(format!("render-worker-{}", index))
                .spawn(move || worker.run())
                .map_err(|cause| RenderError::Spawn { index, cause })?;
            pool.workers.push(WorkerHandle {
                ready: ready_tx,
                finished: finished_rx,
                thread,
            });
        }
        debug!("spawned {} render workers", workers);
        Ok(pool)
    }

    /// Number of workers; zero once the pool has been shut down.
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Number of completed or attempted cycles.
    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    /// Whether the pool still accepts work.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Runs one barrier cycle: every worker renders its band, and this
    /// returns once all of them are done.
    pub fn render_frame(&mut self) -> Result<(), RenderError> {
        if !self.is_running() {
            return Err(RenderError::Stopped);
        }
        let _timer = Timer::new("render_frame");
        self.cycle += 1;
        let cycle = self.cycle;
        trace!("starting cycle {}", cycle);

        for (index, worker) in self.workers.iter().enumerate() {
            if worker.ready.send(cycle).is_err() {
                warn!("worker {} did not take cycle {}", index, cycle);
                return Err(RenderError::WorkerLost(index));
            }
        }
        for (index, worker) in self.workers.iter().enumerate() {
            loop {
                match worker.finished.recv() {
                    Ok(done) if done == cycle => break,
                    // Left over from a cycle that was abandoned.
                    Ok(stale) => trace!("worker {} reported stale cycle {}", index, stale),
                    Err(_) => {
                        warn!("worker {} never finished cycle {}", index, cycle);
                        return Err(RenderError::WorkerLost(index));
                    }
                }
            }
        }
        trace!("finished cycle {}", cycle);
        Ok(())
    }

    /// Read access to the context, e.g. to copy the frame out.
    pub fn context(&self) -> Result<RwLockReadGuard<'_, RenderContext>, RenderError> {
        self.context.read().map_err(|_| RenderError::Poisoned)
    }

    /// Write access to the context between cycles.
    pub fn context_mut(&mut self) -> Result<RwLockWriteGuard<'_, RenderContext>, RenderError> {
        self.context.write().map_err(|_| RenderError::Poisoned)
    }

    /// Reallocates the frame for a new surface size.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), RenderError> {
        self.context_mut()?.resize(width, height)
    }

    /// Stops the workers and waits for them to exit.  Idempotent.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        // Dropping the finished receivers frees any worker stuck
        // reporting an abandoned cycle.  Idle workers leave through the
        // running flag, so the ready senders stay alive until the joins
        // are done.
        let (ready, threads): (Vec<Sender<u64>>, Vec<JoinHandle<()>>) = self
            .workers
            .drain(..)
            .map(|worker| (worker.ready, worker.thread))
            .unzip();
        for (index, thread) in threads.into_iter().enumerate() {
            if thread.join().is_err() {
                error!("worker {} panicked", index);
            }
        }
        drop(ready);
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::planes::Point;
    use crate::render::render_single;
    use num::Complex;
    use std::time::Instant;

    const POLL: Duration = Duration::from_millis(5);

    fn pool(workers: usize, width: usize, height: usize) -> WorkerPool {
        let context = RenderContext::new(&Config {
            workers,
            width,
            height,
            ..Config::default()
        })
        .unwrap();
        WorkerPool::spawn(context, workers, POLL).unwrap()
    }

    fn matches_reference(pool: &WorkerPool) -> bool {
        let context = pool.context().unwrap();
        context.frame().to_rgba() == render_single(&context)
    }

    #[test]
    fn rejects_zero_workers() {
        let context = RenderContext::new(&Config::default()).unwrap();
        assert!(WorkerPool::spawn(context, 0, POLL).is_err());
    }

    #[test]
    fn single_worker_fills_a_tiny_frame() {
        let mut pool = pool(1, 2, 2);
        pool.render_frame().unwrap();
        assert!(matches_reference(&pool));
        let context = pool.context().unwrap();
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)].iter() {
            assert!(context.frame().pixel(*x, *y)[3] > 0);
        }
    }

    #[test]
    fn uneven_partition_renders_every_row() {
        let mut pool = pool(4, 13, 11);
        pool.render_frame().unwrap();
        assert!(matches_reference(&pool));
    }

    #[test]
    fn more_workers_than_rows() {
        let mut pool = pool(16, 5, 3);
        pool.render_frame().unwrap();
        assert!(matches_reference(&pool));
    }

    #[test]
    fn edits_between_cycles_are_picked_up() {
        let mut pool = pool(3, 24, 16);
        pool.render_frame().unwrap();
        let before = pool.context().unwrap().frame().to_rgba();

        {
            let mut context = pool.context_mut().unwrap();
            context.set_constant(Complex::new(0.285, 0.01));
            context.set_max_iterations(60).unwrap();
            context.set_smoothing(false);
            context.viewport.zoom_towards(Point(3.0, 5.0), 0.5);
        }
        pool.render_frame().unwrap();
        assert!(matches_reference(&pool));
        assert_ne!(pool.context().unwrap().frame().to_rgba(), before);
        assert_eq!(pool.cycles(), 2);
    }

    #[test]
    fn resize_between_cycles() {
        let mut pool = pool(4, 8, 8);
        pool.render_frame().unwrap();
        pool.resize(21, 9).unwrap();
        pool.render_frame().unwrap();
        let context = pool.context().unwrap();
        assert_eq!(context.frame().to_rgba().len(), 21 * 9 * 4);
        assert_eq!(context.frame().band_count(), 4);
        drop(context);
        assert!(matches_reference(&pool));
    }

    #[test]
    fn frame_is_relaid_for_the_pool() {
        let context = RenderContext::new(&Config {
            workers: 2,
            width: 6,
            height: 6,
            ..Config::default()
        })
        .unwrap();
        let mut pool = WorkerPool::spawn(context, 3, POLL).unwrap();
        assert_eq!(pool.context().unwrap().frame().band_count(), 3);
        pool.render_frame().unwrap();
        assert!(matches_reference(&pool));
    }

    #[test]
    fn many_cycles_in_a_row() {
        let mut pool = pool(4, 16, 12);
        for _ in 0..50 {
            pool.render_frame().unwrap();
        }
        assert_eq!(pool.cycles(), 50);
        assert!(matches_reference(&pool));
    }

    #[test]
    fn shutdown_is_prompt_and_final() {
        let mut pool = pool(8, 4, 4);
        pool.render_frame().unwrap();
        let started = Instant::now();
        pool.shutdown();
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(!pool.is_running());
        match pool.render_frame() {
            Err(RenderError::Stopped) => (),
            other => panic!("expected Stopped, got {:?}", other),
        }
        // A second shutdown is harmless.
        pool.shutdown();
    }
}
