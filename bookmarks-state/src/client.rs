use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use crate::action::Action;
use crate::error::Result;
use crate::model::{ClosedFolders, NodeTable, PageState};
use crate::store::{ObserverId, Store, StoreObserver};

/// Change test used by watches.
///
/// Shared handles compare by pointer, so a deep-equal value in a new
/// allocation counts as a change. Plain values compare by equality.
pub trait Identity {
    fn is_same(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Identity for Arc<T> {
    fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Identity for Rc<T> {
    fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: Identity> Identity for Option<T> {
    fn is_same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(left), Some(right)) => left.is_same(right),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Identity for NodeTable {
    fn is_same(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Identity for ClosedFolders {
    fn is_same(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

macro_rules! value_identity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identity for $ty {
                fn is_same(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

value_identity!(bool, usize, u32, u64, i32, i64, String, &'static str);

/// Consumer-owned field kept up to date by a [`StoreClient`] watch.
///
/// Empty until the client sees its first state.
pub struct Watched<T> {
    slot: Rc<WatchSlot<T>>,
}

struct WatchSlot<T> {
    value: RefCell<Option<T>>,
    updates: Cell<u64>,
}

impl<T> Clone for Watched<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> Watched<T> {
    fn new() -> Self {
        Self {
            slot: Rc::new(WatchSlot {
                value: RefCell::new(None),
                updates: Cell::new(0),
            }),
        }
    }

    /// Run `read` against the current value.
    pub fn with<R>(&self, read: impl FnOnce(Option<&T>) -> R) -> R {
        read(self.slot.value.borrow().as_ref())
    }

    /// How many times the value has been replaced.
    pub fn updates(&self) -> u64 {
        self.slot.updates.get()
    }

    pub fn is_set(&self) -> bool {
        self.slot.value.borrow().is_some()
    }
}

impl<T: Clone> Watched<T> {
    /// Return a clone of the current value.
    pub fn get(&self) -> Option<T> {
        self.slot.value.borrow().clone()
    }
}

trait Watch {
    fn name(&self) -> &str;

    /// Recompute the projection; returns `true` when the field changed.
    fn refresh(&self, state: &PageState) -> bool;
}

struct Projection<T, F> {
    name: String,
    project: F,
    field: Watched<T>,
}

impl<T, F> Watch for Projection<T, F>
where
    T: Identity,
    F: Fn(&PageState) -> T,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn refresh(&self, state: &PageState) -> bool {
        let next = (self.project)(state);
        let mut value = self.field.slot.value.borrow_mut();
        if value.as_ref().is_some_and(|current| current.is_same(&next)) {
            return false;
        }

        *value = Some(next);
        let updates = &self.field.slot.updates;
        updates.set(updates.get() + 1);
        true
    }
}

type ChangeHook = Box<dyn Fn(&[String])>;

/// Binds a consumer to a [`Store`].
///
/// The consumer declares watches, each projecting the page state to a
/// value kept in a [`Watched`] field. On every store notification the
/// projections are recomputed and a field is only replaced when the new
/// value is not [`Identity::is_same`] as the old one.
pub struct StoreClient {
    store: Rc<Store>,
    watches: RefCell<Vec<Box<dyn Watch>>>,
    observer: Cell<Option<ObserverId>>,
    on_change: RefCell<Option<ChangeHook>>,
}

impl StoreClient {
    pub fn new(store: Rc<Store>) -> Rc<Self> {
        Rc::new(Self {
            store,
            watches: RefCell::new(Vec::new()),
            observer: Cell::new(None),
            on_change: RefCell::new(None),
        })
    }

    /// Keep a field updated with `project(state)`, e.g. to track a node:
    /// `client.watch("item", move |state| state.nodes().get(&id).cloned())`.
    ///
    /// Watching an already watched name replaces the earlier watch.
    pub fn watch<T, F>(&self, name: impl Into<String>, project: F) -> Watched<T>
    where
        T: Identity + 'static,
        F: Fn(&PageState) -> T + 'static,
    {
        let name = name.into();
        let field = Watched::new();
        let watch = Box::new(Projection {
            name: name.clone(),
            project,
            field: field.clone(),
        });

        let mut watches = self.watches.borrow_mut();
        if let Some(index) = watches.iter().position(|w| w.name() == name) {
            log::warn!("watch `{name}` registered twice, replacing it");
            watches[index] = watch;
        } else {
            watches.push(watch);
        }
        field
    }

    /// Install a callback receiving the names of the watches that changed
    /// in one notification.
    pub fn set_on_change(&self, hook: impl Fn(&[String]) + 'static) {
        self.on_change.replace(Some(Box::new(hook)));
    }

    /// Start receiving store notifications.
    pub fn attach(self: &Rc<Self>) {
        if self.observer.get().is_some() {
            return;
        }
        let id = self.store.add_observer(self);
        self.observer.set(Some(id));
    }

    /// Stop receiving store notifications.
    pub fn detach(&self) {
        if let Some(id) = self.observer.take() {
            self.store.remove_observer(id);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.observer.get().is_some()
    }

    /// Forward an action to the store.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.store.handle_action(action)
    }

    /// Return the store's current state.
    pub fn state(&self) -> Option<Arc<PageState>> {
        self.store.data()
    }

    /// Refresh every watch from the store's current state, if any.
    pub fn update_from_store(&self) {
        if let Some(state) = self.store.data() {
            self.refresh(&state);
        }
    }

    fn refresh(&self, state: &PageState) {
        let changed: Vec<String> = self
            .watches
            .borrow()
            .iter()
            .filter(|watch| watch.refresh(state))
            .map(|watch| watch.name().to_string())
            .collect();
        if changed.is_empty() {
            return;
        }

        log::trace!("watches updated: {changed:?}");
        if let Some(hook) = self.on_change.borrow().as_ref() {
            hook(&changed);
        }
    }
}

impl StoreObserver for StoreClient {
    fn on_state_changed(&self, state: &Arc<PageState>) {
        self.refresh(state);
    }
}

impl Drop for StoreClient {
    fn drop(&mut self) {
        self.detach();
    }
}
