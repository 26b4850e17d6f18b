//! State container for a bookmarks manager.
//!
//! State flows one way:
//! 1. a consumer builds an [`Action`] with one of the constructors in
//!    [`action`];
//! 2. the action is dispatched to the [`Store`], which runs
//!    [`reduce_action`] to produce a brand-new [`PageState`];
//! 3. the store synchronously notifies every [`StoreObserver`], typically
//!    a [`StoreClient`] that refreshes its [`Watched`] fields when the
//!    projected value is no longer the same value.
//!
//! The page state is never mutated in place. Unchanged parts are shared
//! between versions, which is what makes identity-based change detection
//! in [`StoreClient`] both cheap and correct.
//!
//! ```
//! use std::rc::Rc;
//!
//! use bookmarks_state::{
//!     BookmarkNode, NodeTable, Store, StoreClient, action, initial_state,
//! };
//!
//! let nodes: NodeTable = [
//!     BookmarkNode::folder("0", "").with_children(["1"]),
//!     BookmarkNode::folder("1", "Bookmarks bar").with_parent("0"),
//! ]
//! .into_iter()
//! .collect();
//! let store = Rc::new(Store::create(initial_state(nodes)));
//!
//! let client = StoreClient::new(Rc::clone(&store));
//! let selected = client.watch("selected", |state| {
//!     state.selected_folder().map(str::to_string)
//! });
//! client.attach();
//! client.update_from_store();
//!
//! client.dispatch(action::change_folder_open("0", false)).unwrap();
//! assert_eq!(selected.get().flatten().as_deref(), Some("0"));
//! ```

pub mod action;
mod client;
mod error;
mod events;
mod model;
mod options;
pub mod reducer;
mod snapshot;
mod store;
mod tree;

pub use action::{Action, ChangeInfo};
pub use client::{Identity, StoreClient, Watched};
pub use error::{Error, Result, StateInvariantError};
pub use events::BookmarkEvent;
pub use model::{BookmarkNode, ClosedFolders, NodeId, NodeTable, PageState};
pub use options::{ReentrancyPolicy, StoreOptions};
pub use reducer::reduce_action;
pub use snapshot::{BookmarkTreeNode, initial_state, normalize_nodes};
pub use store::{ObserverId, Store, StoreObserver};
