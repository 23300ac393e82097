//! # Store Task
//!
//! One task owns [`RootState`]. Handles send it actions over a channel and
//! read snapshots from a `watch`; nothing else ever mutates state. The task
//! also listens for `SessionExpired` on the bus and logs the session out.
//!
//! ```text
//! dispatch(op) ──► Pending ──► store task ──► snapshot + events
//!      │                             ▲
//!      └── spawned request ──────────┘ Fulfilled / Rejected
//! ```

use sd_api_client::storage::TOKEN_KEY;
use shared_bus::{
    EventFilter, EventPublisher, EventStream, EventTopic, InMemoryEventBus, StoreEvent,
};
use shared_types::{OperationKind, RequestSeq};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_stream::StreamExt;
use tracing::{debug, info, warn, Instrument};

use crate::actions::{Action, Outcome};
use crate::error::{Rejection, StoreError};
use crate::operations::{Operation, StoreContext};
use crate::state::RootState;

/// Actions buffered before senders wait on the store task.
pub const COMMAND_BUFFER: usize = 256;

struct Command {
    action: Action,
    applied: oneshot::Sender<()>,
}

/// Entry point: spawns the store task.
pub struct Store;

impl Store {
    /// Spawn the store task on the current runtime.
    ///
    /// The auth slice starts authenticated when a token is already
    /// persisted. The task stops once every handle is dropped.
    pub fn spawn(context: StoreContext, bus: Arc<InMemoryEventBus>) -> StoreHandle {
        let mut initial = RootState::default();
        match context.api.storage().get(TOKEN_KEY) {
            Ok(Some(token)) => {
                initial.auth.token = Some(token);
                initial.auth.is_authenticated = true;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Could not read persisted token, starting logged out"),
        }

        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let (snapshots, snapshot_rx) = watch::channel(Arc::new(initial.clone()));
        let session = bus.event_stream(EventFilter::topics(vec![EventTopic::Session]));
        let publisher: Arc<dyn EventPublisher> = bus.clone();
        tokio::spawn(run(initial, receiver, session, snapshots, publisher));

        StoreHandle {
            commands,
            snapshots: snapshot_rx,
            next_seq: Arc::new(AtomicU64::new(0)),
            context: Arc::new(context),
            bus,
        }
    }
}

async fn run(
    mut state: RootState,
    mut commands: mpsc::Receiver<Command>,
    mut session: EventStream,
    snapshots: watch::Sender<Arc<RootState>>,
    events: Arc<dyn EventPublisher>,
) {
    info!("Store task started");
    loop {
        tokio::select! {
            // Session events are published before the rejection that follows
            // them is sent, so they are reduced first.
            biased;
            Some(event) = session.next() => {
                if let StoreEvent::SessionExpired { path } = event {
                    info!(path = %path, "Session expired, logging out");
                    reduce(&mut state, Action::SessionExpired, &snapshots, events.as_ref()).await;
                }
            }
            command = commands.recv() => {
                let Some(Command { action, applied }) = command else {
                    break;
                };
                reduce(&mut state, action, &snapshots, events.as_ref()).await;
                // The sender may have stopped waiting; the action is applied either way.
                let _ = applied.send(());
            }
        }
    }
    info!("Store task stopped");
}

async fn reduce(
    state: &mut RootState,
    action: Action,
    snapshots: &watch::Sender<Arc<RootState>>,
    events: &dyn EventPublisher,
) {
    debug!(action = action.label(), "Reducing");
    let produced = state.reduce(action);
    snapshots.send_replace(Arc::new(state.clone()));
    for event in produced {
        events.publish(event).await;
    }
}

/// Cloneable handle to a running store.
#[derive(Clone)]
pub struct StoreHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Arc<RootState>>,
    next_seq: Arc<AtomicU64>,
    context: Arc<StoreContext>,
    bus: Arc<InMemoryEventBus>,
}

impl StoreHandle {
    /// Dispatch an operation.
    ///
    /// Returns once the pending state is applied; the request runs on its
    /// own task. Dropping the returned [`Dispatched`] does not cancel it.
    pub async fn dispatch(&self, operation: Operation) -> Result<Dispatched, StoreError> {
        let seq = RequestSeq(self.next_seq.fetch_add(1, Ordering::SeqCst) + 1);
        let kind = operation.kind();

        self.apply(Action::Pending {
            seq,
            operation: kind,
        })
        .await?;

        let (tx, rx) = oneshot::channel();
        let commands = self.commands.clone();
        let context = Arc::clone(&self.context);
        let span = sd_telemetry::operation_span!(kind.action_type(), %seq);
        tokio::spawn(
            async move {
                let result = operation
                    .execute(&context)
                    .await
                    .map_err(|e| {
                        warn!(error = %e, "Operation rejected");
                        Rejection::from_api(kind, &e)
                    });
                let action = match &result {
                    Ok(outcome) => Action::Fulfilled {
                        seq,
                        operation: kind,
                        outcome: outcome.clone(),
                    },
                    Err(rejection) => Action::Rejected {
                        seq,
                        operation: kind,
                        message: rejection.message.clone(),
                    },
                };
                if send_and_wait(&commands, action).await.is_err() {
                    warn!("Store stopped before the result could be applied");
                }
                let _ = tx.send(result);
            }
            .instrument(span),
        );

        Ok(Dispatched {
            seq,
            operation: kind,
            result: rx,
        })
    }

    /// Dispatch and wait for the operation to settle.
    pub async fn run(&self, operation: Operation) -> Result<Result<Outcome, Rejection>, StoreError> {
        Ok(self.dispatch(operation).await?.settled().await)
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RootState> {
        self.snapshots.borrow().clone()
    }

    /// Receiver that sees every new snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<RootState>> {
        self.snapshots.clone()
    }

    /// Event bus the store publishes on.
    #[must_use]
    pub fn events(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    #[must_use]
    pub fn context(&self) -> &StoreContext {
        &self.context
    }

    /// Drop the selected project, its assignment messages and detail status.
    pub async fn clear_selected_project(&self) -> Result<(), StoreError> {
        self.apply(Action::ClearSelectedProject).await
    }

    /// Clear the token from the auth slice and from storage.
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.context.api.clear_token()?;
        self.apply(Action::Logout).await
    }

    /// Put the auth slice back to its initial state.
    pub async fn reset_auth(&self) -> Result<(), StoreError> {
        self.apply(Action::ResetAuth).await
    }

    async fn apply(&self, action: Action) -> Result<(), StoreError> {
        send_and_wait(&self.commands, action).await
    }
}

async fn send_and_wait(commands: &mpsc::Sender<Command>, action: Action) -> Result<(), StoreError> {
    let (applied, done) = oneshot::channel();
    commands
        .send(Command { action, applied })
        .await
        .map_err(|_| StoreError::Closed)?;
    done.await.map_err(|_| StoreError::Closed)
}

/// A dispatched operation whose request may still be running.
#[derive(Debug)]
pub struct Dispatched {
    seq: RequestSeq,
    operation: OperationKind,
    result: oneshot::Receiver<Result<Outcome, Rejection>>,
}

impl Dispatched {
    #[must_use]
    pub fn seq(&self) -> RequestSeq {
        self.seq
    }

    #[must_use]
    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    /// Wait for the request to end. The store has applied the result by the
    /// time this returns, unless the response was superseded.
    pub async fn settled(self) -> Result<Outcome, Rejection> {
        self.result
            .await
            .unwrap_or_else(|_| Err(Rejection::store_stopped(self.operation)))
    }
}

/// Wait on the bus for the event that ends `seq`.
pub async fn wait_for_terminal(
    subscription: &mut shared_bus::Subscription,
    seq: RequestSeq,
) -> Option<StoreEvent> {
    while let Some(event) = subscription.recv().await {
        if event.seq() == Some(seq) && event.is_terminal() {
            return Some(event);
        }
    }
    None
}
