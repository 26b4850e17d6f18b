/// What the store does with an action dispatched while it is still
/// notifying observers about the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReentrancyPolicy {
    /// Fail the nested dispatch with [`crate::Error::ReentrantDispatch`].
    #[default]
    Reject,
    /// Apply the nested action after the current notification round.
    Queue,
}

/// Configuration knobs that influence how the store behaves.
#[derive(Clone, Debug)]
pub struct StoreOptions {
    pub reentrancy: ReentrancyPolicy,
    /// Upper bound of actions waiting under [`ReentrancyPolicy::Queue`].
    pub max_queued_actions: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            reentrancy: ReentrancyPolicy::default(),
            max_queued_actions: 64,
        }
    }
}
