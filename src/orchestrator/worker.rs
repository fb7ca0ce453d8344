//! Serialized execution queue
//!
//! An [`ExecutionWorker`] owns an [`Engine`] on one background thread and
//! runs submitted snippets strictly one at a time, in submission order.
//! Each submission returns an [`ExecutionTicket`] the caller can block on.

use crate::orchestrator::Engine;
use crate::result::{Diagnostic, ExecutionResult, ExecutionTier};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Submissions that may wait before `submit` blocks
pub const DEFAULT_QUEUE_DEPTH: usize = 32;

const WORKER_STOPPED: &str = "execution worker stopped";

struct Job {
    source: String,
    reply: Sender<ExecutionResult>,
}

#[derive(Debug)]
pub struct ExecutionWorker {
    queue: Option<SyncSender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl ExecutionWorker {
    pub fn spawn(engine: Engine) -> io::Result<Self> {
        Self::with_queue_depth(engine, DEFAULT_QUEUE_DEPTH)
    }

    pub fn with_queue_depth(engine: Engine, depth: usize) -> io::Result<Self> {
        let (queue, jobs) = mpsc::sync_channel::<Job>(depth);
        let handle = thread::Builder::new()
            .name("sniprun-worker".to_string())
            .spawn(move || {
                for (index, job) in jobs.into_iter().enumerate() {
                    debug!(job = index, "executing queued snippet");
                    let result = engine.execute(&job.source);
                    if job.reply.send(result).is_err() {
                        debug!(job = index, "ticket dropped before completion");
                    }
                }
                debug!("execution queue closed");
            })?;

        Ok(Self {
            queue: Some(queue),
            handle: Some(handle),
        })
    }

    /// Queue `source`; blocks while the queue is full
    pub fn submit(&self, source: impl Into<String>) -> ExecutionTicket {
        let (reply, result) = mpsc::channel();
        let job = Job {
            source: source.into(),
            reply,
        };
        // A failed send drops the reply sender, so the ticket reports the stop.
        if let Some(queue) = &self.queue {
            if queue.send(job).is_err() {
                warn!("execution worker is not running");
            }
        }
        ExecutionTicket { result }
    }

    /// Submit and wait
    pub fn execute(&self, source: impl Into<String>) -> ExecutionResult {
        self.submit(source).wait()
    }
}

impl Drop for ExecutionWorker {
    fn drop(&mut self) {
        // Closing the queue lets the thread finish what is already queued.
        drop(self.queue.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("execution worker panicked");
            }
        }
    }
}

/// Pending result of one submission
#[derive(Debug)]
pub struct ExecutionTicket {
    result: Receiver<ExecutionResult>,
}

impl ExecutionTicket {
    pub fn wait(self) -> ExecutionResult {
        self.result.recv().unwrap_or_else(|_| stopped())
    }

    /// The result if it is ready, without blocking
    pub fn try_result(&self) -> Option<ExecutionResult> {
        match self.result.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(stopped()),
        }
    }
}

fn stopped() -> ExecutionResult {
    ExecutionResult::failure(
        WORKER_STOPPED,
        vec![Diagnostic::error(WORKER_STOPPED)],
        ExecutionTier::None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn worker() -> ExecutionWorker {
        ExecutionWorker::spawn(Engine::new(EngineConfig::interpreter_only())).unwrap()
    }

    #[test]
    fn test_results_arrive_in_submission_order() {
        let worker = worker();
        let tickets: Vec<ExecutionTicket> = (0..5)
            .map(|n| worker.submit(format!("System.out.println({} * 2);", n)))
            .collect();
        let outputs: Vec<String> = tickets.into_iter().map(|t| t.wait().output).collect();
        assert_eq!(outputs, vec!["0\n", "2\n", "4\n", "6\n", "8\n"]);
    }

    #[test]
    fn test_execute_blocks_for_result() {
        let worker = worker();
        let result = worker.execute("System.out.println(\"done\");");
        assert!(result.success);
        assert_eq!(result.output, "done\n");
    }

    #[test]
    fn test_drop_drains_queue() {
        let worker = worker();
        let ticket = worker.submit("System.out.println(1);");
        drop(worker);
        assert_eq!(ticket.try_result().map(|r| r.output).as_deref(), Some("1\n"));
    }
}
