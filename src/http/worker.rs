use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Client;
use tokio::sync::{Semaphore, broadcast, mpsc};
use tokio::time::{interval, sleep};
use tracing::{debug, error};
use url::Url;

use crate::args::{ResourceKind, RunArgs, TaskSet, ThinkTime};
use crate::auth::{AuthSettings, SessionDriver};
use crate::error::{AppError, ValidationError};
use crate::metrics::ProbeSample;
use crate::probe::{
    BatchError, BatchState, ChannelReporter, ProbeContext, run_batch_cycle, run_crud_sequence,
    run_smoke_sequence,
};

use super::client::{admin_base_url, build_client, token_endpoint_url};

/// The per-worker slice of the run configuration.
#[derive(Debug, Clone)]
pub struct ProbePlan {
    pub task_set: TaskSet,
    pub resources: Vec<ResourceKind>,
    pub batch_size: usize,
    pub think_time: ThinkTime,
}

impl ProbePlan {
    /// Derive the plan from parsed arguments. An empty resource list selects
    /// every resource kind.
    #[must_use]
    pub fn from_args(args: &RunArgs) -> Self {
        let resources = if args.resources.is_empty() {
            ResourceKind::all().to_vec()
        } else {
            args.resources.clone()
        };
        Self {
            task_set: args.task_set,
            resources,
            batch_size: args.batch_size.get(),
            think_time: args.think_time,
        }
    }
}

/// Remaining task iterations shared across all workers.
struct IterationBudget {
    remaining: AtomicU64,
}

impl IterationBudget {
    const fn new(limit: u64) -> Self {
        Self {
            remaining: AtomicU64::new(limit),
        }
    }

    fn try_take(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |value| {
                value.checked_sub(1)
            })
            .is_ok()
    }
}

struct WorkerContext {
    shutdown_tx: broadcast::Sender<u16>,
    client: Client,
    settings: Arc<AuthSettings>,
    admin_base: Arc<Url>,
    plan: ProbePlan,
    samples_tx: mpsc::Sender<ProbeSample>,
    iteration_budget: Option<Arc<IterationBudget>>,
}

/// Create the virtual-user pool task and validate the target configuration.
///
/// The spawned task authenticates once as a preflight (a denied token request
/// stops the run before any probe executes), then ramps workers up through a
/// spawn-rate permit loop. Each worker owns its session driver and credential.
///
/// # Errors
///
/// Returns an error when required target settings are missing or the HTTP
/// client cannot be built.
pub fn setup_probe_workers(
    args: &RunArgs,
    shutdown_tx: &broadcast::Sender<u16>,
    samples_tx: &mpsc::Sender<ProbeSample>,
) -> Result<tokio::task::JoinHandle<()>, AppError> {
    let base_url = args
        .base_url
        .as_deref()
        .ok_or(ValidationError::MissingBaseUrl)?;
    let username = args
        .username
        .clone()
        .ok_or(ValidationError::MissingUsername)?;
    let password = args
        .password
        .clone()
        .ok_or(ValidationError::MissingPassword)?;

    let plan = ProbePlan::from_args(args);
    let client = build_client(args)?;
    let admin_base = Arc::new(admin_base_url(base_url, &args.realm)?);
    let token_url = token_endpoint_url(base_url, &args.realm)?;
    let settings = Arc::new(AuthSettings {
        token_url,
        username,
        password,
        client_id: args.auth_client_id.clone(),
        client_secret: args.auth_client_secret.clone(),
    });

    let shutdown_tx = shutdown_tx.clone();
    let samples_tx = samples_tx.clone();
    let max_tasks = args.users.get();
    let spawn_rate = args.spawn_rate.get();
    let tick_interval = args.spawn_interval.get();
    let iteration_budget = args
        .max_iterations
        .map(|limit| Arc::new(IterationBudget::new(limit.get())));

    Ok(tokio::spawn(async move {
        let mut preflight = SessionDriver::new(client.clone(), Arc::clone(&settings));
        if let Err(err) = preflight.authenticate().await {
            error!("Authentication preflight failed: {}", err);
            drop(shutdown_tx.send(1));
            return;
        }
        drop(preflight);
        debug!("Authentication preflight succeeded.");

        let mut shutdown_rx = shutdown_tx.subscribe();
        let mut spawn_interval = interval(Duration::from_millis(tick_interval));
        let mut total_spawned: usize = 0;
        let permits = Arc::new(Semaphore::new(0));
        let mut worker_handles = Vec::with_capacity(max_tasks);

        for _ in 0..max_tasks {
            let permits = Arc::clone(&permits);
            let worker = WorkerContext {
                shutdown_tx: shutdown_tx.clone(),
                client: client.clone(),
                settings: Arc::clone(&settings),
                admin_base: Arc::clone(&admin_base),
                plan: plan.clone(),
                samples_tx: samples_tx.clone(),
                iteration_budget: iteration_budget.clone(),
            };

            worker_handles.push(tokio::spawn(async move {
                let mut shutdown_rx_worker = worker.shutdown_tx.subscribe();
                let startup_permit_result = tokio::select! {
                    _ = shutdown_rx_worker.recv() => return,
                    permit = permits.acquire_owned() => permit,
                };
                let _startup_permit = match startup_permit_result {
                    Ok(permit) => permit,
                    Err(_) => return,
                };

                run_worker(&worker, &mut shutdown_rx_worker).await;
            }));
        }

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = spawn_interval.tick() => {
                    if total_spawned >= max_tasks {
                        continue;
                    }
                    let available = max_tasks.saturating_sub(total_spawned);
                    let to_spawn = spawn_rate.min(available);
                    permits.add_permits(to_spawn);
                    total_spawned = total_spawned.saturating_add(to_spawn);
                }
            }
        }

        drop(permits);

        for handle in worker_handles {
            if handle.await.is_err() {
                break;
            }
        }
    }))
}

async fn run_worker(worker: &WorkerContext, shutdown_rx: &mut broadcast::Receiver<u16>) {
    let mut driver = SessionDriver::new(worker.client.clone(), Arc::clone(&worker.settings));
    let auth_result = tokio::select! {
        _ = shutdown_rx.recv() => return,
        result = driver.authenticate() => result,
    };
    if let Err(err) = auth_result {
        // Fatal to this virtual user only; sibling workers keep running.
        error!("Virtual user authentication failed: {}", err);
        return;
    }

    let reporter = ChannelReporter::new(worker.samples_tx.clone());
    let context = ProbeContext {
        client: &worker.client,
        admin_base: &worker.admin_base,
        reporter: &reporter,
    };
    let mut batch_state = BatchState::new();

    loop {
        if let Some(budget) = worker.iteration_budget.as_ref()
            && !budget.try_take()
        {
            drop(worker.shutdown_tx.send(0));
            return;
        }

        let should_stop = tokio::select! {
            _ = shutdown_rx.recv() => true,
            stop = run_iteration(&context, &mut driver, worker, &mut batch_state) => stop,
        };
        if should_stop {
            return;
        }

        let think_delay = worker.plan.think_time.sample(&mut rand::thread_rng());
        if !think_delay.is_zero() {
            tokio::select! {
                _ = shutdown_rx.recv() => return,
                () = sleep(think_delay) => {}
            }
        }
    }
}

/// One task iteration: a fan-out of independent probe sequences, or a batch
/// cycle per kind. Returns true when this worker must stop.
async fn run_iteration(
    context: &ProbeContext<'_>,
    driver: &mut SessionDriver,
    worker: &WorkerContext,
    batch_state: &mut BatchState,
) -> bool {
    match worker.plan.task_set {
        TaskSet::Crud => {
            for kind in &worker.plan.resources {
                if let Err(err) = run_crud_sequence(context, driver, *kind).await {
                    error!("Virtual user authentication failed: {}", err);
                    return true;
                }
            }
            false
        }
        TaskSet::Smoke => {
            for kind in &worker.plan.resources {
                if let Err(err) = run_smoke_sequence(context, driver, *kind).await {
                    error!("Virtual user authentication failed: {}", err);
                    return true;
                }
            }
            false
        }
        TaskSet::Batch => {
            for kind in &worker.plan.resources {
                match run_batch_cycle(context, driver, *kind, batch_state, worker.plan.batch_size)
                    .await
                {
                    Ok(()) => {}
                    Err(BatchError::Auth(err)) => {
                        error!("Virtual user authentication failed: {}", err);
                        return true;
                    }
                    Err(BatchError::Escalated(err)) => {
                        error!("Aborting run: {}", err);
                        drop(worker.shutdown_tx.send(1));
                        return true;
                    }
                }
            }
            false
        }
    }
}
