use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::action::Action;
use crate::error::{Error, Result};
use crate::model::PageState;
use crate::options::{ReentrancyPolicy, StoreOptions};
use crate::reducer::reduce_action;

/// Receiver of state change notifications.
pub trait StoreObserver {
    /// Called synchronously after every applied action.
    fn on_state_changed(&self, state: &Arc<PageState>);
}

/// Token returned by [`Store::add_observer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Single-writer container of the current [`PageState`].
///
/// The store is single-threaded: share it with `Rc` and hand it to every
/// consumer explicitly. Observers are held weakly, so dropping the last
/// strong handle of an observer silently unregisters it.
pub struct Store {
    options: StoreOptions,
    data: RefCell<Option<Arc<PageState>>>,
    observers: RefCell<Vec<(ObserverId, Weak<dyn StoreObserver>)>>,
    next_observer_id: Cell<u64>,
    notifying: Cell<bool>,
    pending: RefCell<VecDeque<Action>>,
}

impl Store {
    /// Construct an uninitialized store; call [`Store::init`] before
    /// dispatching.
    pub fn new(options: StoreOptions) -> Self {
        Self {
            options,
            data: RefCell::new(None),
            observers: RefCell::new(Vec::new()),
            next_observer_id: Cell::new(0),
            notifying: Cell::new(false),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    /// Construct a store holding `initial` with default options.
    pub fn create(initial: PageState) -> Self {
        Self::with_state(StoreOptions::default(), initial)
    }

    /// Construct a store holding `initial`.
    pub fn with_state(options: StoreOptions, initial: PageState) -> Self {
        let store = Self::new(options);
        store.data.replace(Some(Arc::new(initial)));
        store
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Install the initial state and notify registered observers.
    pub fn init(&self, initial: PageState) -> Result<()> {
        if self.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }

        let state = Arc::new(initial);
        self.data.replace(Some(Arc::clone(&state)));
        log::debug!("store initialized with {} nodes", state.nodes().len());
        self.notify(&state);
        self.run(None)
    }

    pub fn is_initialized(&self) -> bool {
        self.data.borrow().is_some()
    }

    /// Return the current state, if initialized.
    pub fn data(&self) -> Option<Arc<PageState>> {
        self.data.borrow().clone()
    }

    /// Apply `action` through the root reducer and notify observers.
    ///
    /// Called from inside an observer callback, the action is handled
    /// according to [`StoreOptions::reentrancy`]. When a queued action
    /// fails, the actions queued behind it are discarded and its error is
    /// returned here. More than [`StoreOptions::max_queued_actions`]
    /// queued actions in one call fail with [`Error::QueueFull`].
    pub fn handle_action(&self, action: Action) -> Result<()> {
        if self.notifying.get() {
            return self.defer(action);
        }
        self.run(Some(action))
    }

    /// Register an observer and return a token to remove it with.
    pub fn add_observer<O>(&self, observer: &Rc<O>) -> ObserverId
    where
        O: StoreObserver + 'static,
    {
        let id = ObserverId(self.next_observer_id.get());
        self.next_observer_id.set(id.0 + 1);

        let observer = Rc::downgrade(observer);
        let observer: Weak<dyn StoreObserver> = observer;
        self.observers.borrow_mut().push((id, observer));
        id
    }

    /// Unregister an observer. Returns `false` when `id` is not
    /// registered.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    /// Number of registered observers that are still alive.
    pub fn observer_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|(_, observer)| observer.strong_count() > 0)
            .count()
    }

    /// Apply `first`, then every action queued while notifying.
    ///
    /// At most `max_queued_actions` queued actions run per call.
    fn run(&self, first: Option<Action>) -> Result<()> {
        if let Some(action) = first {
            self.apply_or_discard(action)?;
        }

        let limit = self.options.max_queued_actions;
        let mut drained = 0_usize;
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(action) = next else {
                return Ok(());
            };

            drained += 1;
            if drained > limit {
                log::warn!(
                    "dropping `{}`: more than {limit} queued actions in one \
                     dispatch",
                    action.name()
                );
                self.discard_pending();
                return Err(Error::QueueFull { limit });
            }
            self.apply_or_discard(action)?;
        }
    }

    fn apply_or_discard(&self, action: Action) -> Result<()> {
        self.apply(action).inspect_err(|_| self.discard_pending())
    }

    fn apply(&self, action: Action) -> Result<()> {
        let current = self.data().ok_or(Error::NotInitialized)?;
        let next = Arc::new(reduce_action(&current, &action)?);
        log::debug!("applied `{}`", action.name());

        self.data.replace(Some(Arc::clone(&next)));
        self.notify(&next);
        Ok(())
    }

    fn defer(&self, action: Action) -> Result<()> {
        match self.options.reentrancy {
            ReentrancyPolicy::Reject => Err(Error::ReentrantDispatch {
                action: action.name(),
            }),
            ReentrancyPolicy::Queue => {
                let mut pending = self.pending.borrow_mut();
                if pending.len() >= self.options.max_queued_actions {
                    return Err(Error::QueueFull {
                        limit: self.options.max_queued_actions,
                    });
                }
                log::debug!("queued `{}` during notification", action.name());
                pending.push_back(action);
                Ok(())
            },
        }
    }

    fn discard_pending(&self) {
        let mut pending = self.pending.borrow_mut();
        if !pending.is_empty() {
            log::warn!("discarding {} queued actions", pending.len());
            pending.clear();
        }
    }

    fn notify(&self, state: &Arc<PageState>) {
        // Snapshot the list so observers may (un)register while notified.
        let observers: Vec<Rc<dyn StoreObserver>> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|(_, observer)| observer.strong_count() > 0);
            observers
                .iter()
                .filter_map(|(_, observer)| observer.upgrade())
                .collect()
        };

        let _guard = NotifyGuard::enter(&self.notifying);
        for observer in observers {
            observer.on_state_changed(state);
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreOptions::default())
    }
}

/// Marks the store as notifying until dropped, including on unwind.
struct NotifyGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> NotifyGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
