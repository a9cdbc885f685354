use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::client::command::{Command, ExecResult};
use crate::client::config::SessionConfig;

/// State shared between the submitting loop and the worker tasks. One
/// lock guards the configuration and both tables; it is held for the
/// whole of an apply and never across a blocking wait.
struct DispatchState {
    config: SessionConfig,
    next_seq: u64,
    in_flight: HashMap<u64, Command>,
    completed: HashMap<u64, ExecResult>,
}

/// Applies commands on worker tasks while the caller keeps reading input.
/// Submission order assigns sequence numbers; completion order is
/// whatever the scheduler produces and is never assumed.
pub struct Dispatcher {
    state: Arc<Mutex<DispatchState>>,
    workers: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(DispatchState {
                config,
                next_seq: 0,
                in_flight: HashMap::new(),
                completed: HashMap::new(),
            })),
            workers: Vec::new(),
        }
    }

    /// Queues one constructed command and returns its sequence number.
    /// The number is taken under the lock, so submissions are numbered in
    /// the order they arrive.
    pub async fn submit(&mut self, cmd: Command) -> u64 {
        let seq = {
            let mut state = self.state.lock().await;
            let seq = state.next_seq;
            state.next_seq += 1;
            state.in_flight.insert(seq, cmd);
            seq
        };

        let state = self.state.clone();
        self.workers.push(tokio::spawn(async move {
            let mut state = state.lock().await;
            let Some(cmd) = state.in_flight.remove(&seq) else {
                return;
            };

            let result = cmd.apply(&mut state.config);
            debug!("command {seq} finished: {result:?}");
            if result != ExecResult::Success {
                println!("error: {result}");
            }
            state.completed.insert(seq, result);
        }));

        seq
    }

    /// Waits until every submitted command has been applied.
    pub async fn drain(&mut self) {
        for worker in self.workers.drain(..) {
            let _ = worker.await;
        }
    }

    pub async fn result(&self, seq: u64) -> Option<ExecResult> {
        self.state.lock().await.completed.get(&seq).copied()
    }

    /// Snapshot of the configuration. Call after [`drain`] to observe the
    /// settled state.
    ///
    /// [`drain`]: Dispatcher::drain
    pub async fn config(&self) -> SessionConfig {
        self.state.lock().await.config.clone()
    }
}
