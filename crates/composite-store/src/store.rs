//! Store - holds application state and manages the dispatch loop
//!
//! Two execution modes share one pipeline implementation:
//! - `Immediate`: the dispatching thread runs middleware and reducer itself.
//!   Dispatches that arrive while a run is in progress (re-entrant ones from
//!   middleware or listeners, or ones from other threads) are queued and
//!   drained by the thread currently owning the pipeline, in arrival order.
//! - `Threaded`: every action is posted to one serial reduce thread which
//!   owns the pipeline.
//!
//! Either way actions are reduced strictly in dispatch order and never
//! concurrently.

use crate::dispatcher::{Dispatcher, StoreHandle};
use crate::emitter::{Emission, Emitter};
use crate::error::StoreError;
use crate::listener::{ChannelListener, Listener, ListenerId, Listeners};
use crate::middleware::{Middleware, Pipeline};
use crate::reducer::Reducer;
use crate::state_cell::StateCell;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::thread::{self, JoinHandle};

/// Where the middleware → reducer pipeline runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Run synchronously on the dispatching thread
    Immediate,
    /// Post to a dedicated serial reduce thread
    #[default]
    Threaded,
}

enum Engine<S, A> {
    Immediate {
        pipeline: Mutex<Pipeline<S, A>>,
        pending: Mutex<VecDeque<A>>,
    },
    Threaded {
        tx: Mutex<Option<Sender<A>>>,
        worker: Mutex<Option<JoinHandle<()>>>,
    },
}

pub(crate) struct StoreInner<S, A> {
    cell: Arc<StateCell<S>>,
    engine: Engine<S, A>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S, A> StoreInner<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Debug + Send + 'static,
{
    pub(crate) fn dispatch(&self, action: A) {
        if self.cell.is_ended() {
            log::debug!("Store ended, ignoring {:?}", action);
            return;
        }

        match &self.engine {
            Engine::Immediate { pipeline, pending } => {
                lock(pending).push_back(action);
                self.drain(pipeline, pending);
            }
            Engine::Threaded { tx, .. } => {
                let tx = lock(tx);
                match tx.as_ref() {
                    Some(tx) => {
                        if let Err(e) = tx.send(action) {
                            log::error!("Reduce worker gone, dropping {:?}", e.0);
                        }
                    }
                    None => log::debug!("Store ended, ignoring {:?}", action),
                }
            }
        }
    }

    fn drain(&self, pipeline: &Mutex<Pipeline<S, A>>, pending: &Mutex<VecDeque<A>>) {
        loop {
            let mut owner = match pipeline.try_lock() {
                Ok(guard) => guard,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                // Someone else is running the pipeline and will pick it up
                Err(TryLockError::WouldBlock) => return,
            };

            loop {
                if self.cell.is_ended() {
                    lock(pending).clear();
                    owner.clear();
                    return;
                }
                let next = lock(pending).pop_front();
                match next {
                    Some(action) => owner.run(action),
                    None => break,
                }
            }
            drop(owner);

            // An action may have been queued after the last pop but before
            // the pipeline was released
            if lock(pending).is_empty() {
                return;
            }
        }
    }

    fn end(&self) {
        if !self.cell.mark_ended() {
            return;
        }
        log::info!("Ending store at version {}", self.cell.version());

        match &self.engine {
            Engine::Immediate { pipeline, pending } => {
                lock(pending).clear();
                match pipeline.try_lock() {
                    Ok(mut owner) => owner.clear(),
                    Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().clear(),
                    // The running owner clears the chain when it sees the flag
                    Err(TryLockError::WouldBlock) => {}
                }
            }
            Engine::Threaded { tx, worker } => {
                lock(tx).take();
                let handle = lock(worker).take();
                if let Some(handle) = handle {
                    if handle.thread().id() != thread::current().id()
                        && handle.join().is_err()
                    {
                        log::error!("Reduce worker panicked");
                    }
                }
            }
        }

        self.cell.shutdown();
    }
}

fn reduce_loop<S, A>(rx: Receiver<A>, mut pipeline: Pipeline<S, A>, cell: Arc<StateCell<S>>)
where
    S: Clone,
    A: Debug,
{
    log::info!("Reduce worker started");

    while let Ok(action) = rx.recv() {
        if cell.is_ended() {
            log::debug!("Store ended, dropping {:?}", action);
            break;
        }
        pipeline.run(action);
    }

    pipeline.clear();
    log::info!("Reduce worker stopped");
}

/// Builder for a `Store`
pub struct StoreBuilder<S, A> {
    initial: S,
    reducer: Box<dyn Reducer<S, A>>,
    middleware: Vec<Box<dyn Middleware<S, A>>>,
    mode: DispatchMode,
    emission: Emission,
}

impl<S, A> StoreBuilder<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Debug + Send + 'static,
{
    /// Add middleware to the chain (executes in the order added)
    pub fn middleware(mut self, middleware: impl Middleware<S, A> + 'static) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Add already boxed middleware
    pub fn boxed_middleware(mut self, middleware: Box<dyn Middleware<S, A>>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn emission(mut self, emission: Emission) -> Self {
        self.emission = emission;
        self
    }

    /// Build the store, spawning its worker threads if the mode needs them
    pub fn build(self) -> Result<Store<S, A>, StoreError> {
        let StoreBuilder {
            initial,
            reducer,
            middleware,
            mode,
            emission,
        } = self;

        let ended = Arc::new(AtomicBool::new(false));
        let listeners = Arc::new(Listeners::new());
        let emitter = Emitter::spawn(emission, Arc::clone(&listeners), Arc::clone(&ended))?;
        let cell = Arc::new(StateCell::new(initial, ended, listeners, emitter));

        let (tx, rx) = mpsc::channel();
        let mut detached = None;
        let inner = Arc::new_cyclic(|weak| {
            let handle = StoreHandle::new(Arc::clone(&cell), Dispatcher::new(weak.clone()));
            let pipeline = Pipeline::new(middleware, reducer, handle);
            let engine = match mode {
                DispatchMode::Immediate => Engine::Immediate {
                    pipeline: Mutex::new(pipeline),
                    pending: Mutex::new(VecDeque::new()),
                },
                DispatchMode::Threaded => {
                    detached = Some(pipeline);
                    Engine::Threaded {
                        tx: Mutex::new(Some(tx)),
                        worker: Mutex::new(None),
                    }
                }
            };
            StoreInner {
                cell: Arc::clone(&cell),
                engine,
            }
        });
        let store = Store { inner };

        match &store.inner.engine {
            Engine::Immediate { pipeline, pending } => {
                lock(pipeline).attach();
                // Actions dispatched from `attach` were queued behind the lock
                store.inner.drain(pipeline, pending);
            }
            Engine::Threaded { worker, .. } => {
                if let Some(mut pipeline) = detached {
                    pipeline.attach();
                    let cell = Arc::clone(&cell);
                    let handle = thread::Builder::new()
                        .name("composite-reducer".to_string())
                        .spawn(move || reduce_loop(rx, pipeline, cell))
                        .map_err(|e| StoreError::WorkerSpawn {
                            name: "composite-reducer",
                            reason: e.to_string(),
                        })?;
                    *lock(worker) = Some(handle);
                }
            }
        }

        log::info!("Store created ({:?}, {:?})", mode, emission);
        Ok(store)
    }
}

/// Store - owns the current state and serializes every mutation
///
/// Dropping the store ends it.
pub struct Store<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Debug + Send + 'static,
{
    inner: Arc<StoreInner<S, A>>,
}

impl<S, A> Store<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Debug + Send + 'static,
{
    /// Start building a store from an initial state and the root reducer
    pub fn builder(initial: S, reducer: impl Reducer<S, A> + 'static) -> StoreBuilder<S, A> {
        StoreBuilder {
            initial,
            reducer: Box::new(reducer),
            middleware: Vec::new(),
            mode: DispatchMode::default(),
            emission: Emission::default(),
        }
    }

    /// Process an action through the middleware chain and reducer
    ///
    /// After `end()` this is a silent no-op.
    pub fn dispatch(&self, action: A) {
        self.inner.dispatch(action);
    }

    /// Get a cloneable dispatcher for callbacks and other threads
    pub fn dispatcher(&self) -> Dispatcher<S, A> {
        Dispatcher::new(Arc::downgrade(&self.inner))
    }

    /// Latest fully reduced state
    pub fn current_state(&self) -> Arc<S> {
        self.inner.cell.current()
    }

    /// Number of reductions committed so far
    pub fn version(&self) -> u64 {
        self.inner.cell.version()
    }

    /// Register a listener for snapshots committed from now on
    pub fn add_listener(&self, listener: impl Listener<S> + 'static) -> ListenerId {
        let cell = &self.inner.cell;
        cell.listeners().add(Arc::new(listener), cell.version())
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.cell.listeners().remove(id)
    }

    /// Observe snapshots as a channel stream
    pub fn watch(&self) -> (ListenerId, Receiver<Arc<S>>) {
        let (tx, rx) = mpsc::channel();
        let id = self.add_listener(ChannelListener::new(tx));
        (id, rx)
    }

    pub fn is_ended(&self) -> bool {
        self.inner.cell.is_ended()
    }

    /// Terminate the store
    ///
    /// Stops accepting dispatches, drops queued actions, clears the
    /// middleware chain and releases worker threads. Idempotent.
    pub fn end(&self) {
        self.inner.end();
    }
}

impl<S, A> Drop for Store<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Debug + Send + 'static,
{
    fn drop(&mut self) {
        self.inner.end();
    }
}
