//! Dependency-ordered parallel build scheduler.
//!
//! Drives a [`BuildSummary`] to completion on a fixed pool of worker
//! threads. The driver thread is the sole owner of all scheduling state;
//! workers receive immutable job snapshots over a channel and report back
//! over a completion channel, so no scheduling state is ever shared
//! mutably across threads.
//!
//! A module is dispatched only when every dependency that needed compiling
//! has reported success. The first worker error is sticky: dispatching
//! stops, outstanding jobs are drained, and their results are discarded.

use std::collections::BTreeMap;
use std::sync::{mpsc, Mutex};

use lumen_core::interface::Interface;
use lumen_core::module::{Location, ModuleId};
use lumen_core::summary::{BuildData, BuildSummary};
use lumen_util::errors::{BuildError, BuildResult};

use crate::artifact::ArtifactRoot;
use crate::backend::ModuleCompiler;
use crate::queue::Queue;

/// A compilation job handed to one worker.
struct Job {
    module: ModuleId,
    location: Location,
    /// Snapshot of the module's dependency interfaces at dispatch time.
    ready: BTreeMap<ModuleId, Interface>,
}

type Completion = (ModuleId, Result<Interface, BuildError>);

/// Compile every module in `summary`, at most `workers` at a time.
///
/// Returns the interfaces of every module involved in the build: the ones
/// discovered ready during analysis plus everything compiled here. On the
/// first compile error the remaining in-flight jobs finish, their results
/// are discarded, and that error is returned.
pub fn run(
    summary: BuildSummary,
    workers: usize,
    compiler: &dyn ModuleCompiler,
    artifacts: &ArtifactRoot,
) -> BuildResult<BTreeMap<ModuleId, Interface>> {
    // Interfaces that analysis already proved valid.
    let mut completed: BTreeMap<ModuleId, Interface> = BTreeMap::new();
    for data in summary.values() {
        for (dep, iface) in &data.ready {
            completed.insert(dep.clone(), iface.clone());
        }
    }

    if summary.is_empty() {
        return Ok(completed);
    }

    // Reverse index: who is waiting on each pending module.
    let mut dependents: BTreeMap<ModuleId, Vec<ModuleId>> = BTreeMap::new();
    for (id, data) in &summary {
        for dep in &data.blocking {
            dependents.entry(dep.clone()).or_default().push(id.clone());
        }
    }

    // Schedulable entries feed the ready queue; the rest wait in `blocked`.
    let mut blocked: BTreeMap<ModuleId, BuildData> = BTreeMap::new();
    let mut runnable: BTreeMap<ModuleId, BuildData> = BTreeMap::new();
    let mut queue: Queue<ModuleId> = Queue::new();
    for (id, data) in summary {
        if data.is_schedulable() {
            queue.enqueue([id.clone()]);
            runnable.insert(id, data);
        } else {
            blocked.insert(id, data);
        }
    }

    let pool_size = workers.max(1);
    let (job_tx, job_rx) = mpsc::channel::<Job>();
    let (done_tx, done_rx) = mpsc::channel::<Completion>();
    let job_rx = Mutex::new(job_rx);
    let job_rx = &job_rx;

    let first_error = std::thread::scope(|scope| {
        for _ in 0..pool_size {
            let done_tx = done_tx.clone();
            scope.spawn(move || loop {
                let Ok(job) = job_rx.lock().expect("job channel lock").recv() else {
                    break;
                };
                let outcome = compiler
                    .compile(&job.module, &job.location, &job.ready)
                    .and_then(|compiled| {
                        artifacts.write_module(&job.module, &compiled.iface, &compiled.object)?;
                        Ok(compiled.iface)
                    });
                if done_tx.send((job.module, outcome)).is_err() {
                    break;
                }
            });
        }
        drop(done_tx);

        let mut in_flight = 0usize;
        let mut first_error: Option<BuildError> = None;

        loop {
            // Saturate the pool with ready modules.
            while first_error.is_none() && in_flight < pool_size && !queue.is_empty() {
                let Some(id) = queue.dequeue(1).pop() else {
                    break;
                };
                let Some(data) = runnable.remove(&id) else {
                    break;
                };
                let _ = job_tx.send(Job {
                    module: id,
                    location: data.location,
                    ready: data.ready,
                });
                in_flight += 1;
            }

            if in_flight == 0 {
                if first_error.is_some() || (queue.is_empty() && blocked.is_empty()) {
                    break;
                }
                if queue.is_empty() {
                    // Unreachable for analyzer output (its graph is
                    // acyclic), but the scheduler can be fed directly.
                    first_error = Some(BuildError::Generic {
                        message: format!(
                            "{} module(s) can never be scheduled; \
                             their blocking dependencies are not part of the build",
                            blocked.len()
                        ),
                    });
                    break;
                }
                continue;
            }

            let Ok((module, outcome)) = done_rx.recv() else {
                first_error.get_or_insert(BuildError::Generic {
                    message: "worker pool disconnected before the build finished".into(),
                });
                break;
            };
            in_flight -= 1;

            match outcome {
                Ok(iface) => {
                    if first_error.is_some() {
                        // Drain mode: the job finished, its result is dropped.
                        continue;
                    }
                    let mut newly_ready = Vec::new();
                    if let Some(waiters) = dependents.get(&module) {
                        for waiter in waiters {
                            if let Some(data) = blocked.get_mut(waiter) {
                                data.blocking.retain(|m| m != &module);
                                data.ready.insert(module.clone(), iface.clone());
                                if data.is_schedulable() {
                                    newly_ready.push(waiter.clone());
                                }
                            }
                        }
                    }
                    for waiter in newly_ready {
                        if let Some(data) = blocked.remove(&waiter) {
                            runnable.insert(waiter.clone(), data);
                            queue.enqueue([waiter]);
                        }
                    }
                    completed.insert(module, iface);
                }
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        drop(job_tx);
        first_error
    });

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(completed),
    }
}
