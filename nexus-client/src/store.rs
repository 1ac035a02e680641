/// Fetch-on-mount collection state
///
/// Every list-bearing page follows the same pattern: fetch the collection
/// when the page mounts, show a loading indicator until the first response
/// resolves, then treat the local copy as the source of truth for
/// rendering. Mutations either patch the local copy in place or trigger a
/// full refetch; navigating between pages always refetches.
///
/// `RemoteCollection<T>` models that lifecycle without any I/O of its own;
/// the caller drives it with the results of `NexusClient` calls.
///
/// # Example
///
/// ```
/// use nexus_client::store::RemoteCollection;
///
/// let mut tasks: RemoteCollection<String> = RemoteCollection::new();
/// assert!(tasks.is_loading());
///
/// tasks.resolve(vec!["draft wireframes".to_string()]);
/// assert_eq!(tasks.items().unwrap().len(), 1);
/// ```

/// Lifecycle of a server-backed collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteState {
    /// Initial fetch in flight; render a loading indicator
    Loading,

    /// First response resolved; local items are the source of truth
    Loaded,

    /// Initial fetch failed
    Failed(String),
}

/// A locally mirrored server collection
#[derive(Debug, Clone)]
pub struct RemoteCollection<T> {
    state: RemoteState,
    items: Vec<T>,
    loaded_once: bool,
}

impl<T> Default for RemoteCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RemoteCollection<T> {
    /// Creates an empty collection in the loading state
    pub fn new() -> Self {
        Self {
            state: RemoteState::Loading,
            items: Vec::new(),
            loaded_once: false,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> &RemoteState {
        &self.state
    }

    /// Whether the initial fetch is still in flight
    pub fn is_loading(&self) -> bool {
        self.state == RemoteState::Loading
    }

    /// Resolves the fetch with server items
    ///
    /// Also used for refetches: the local copy is replaced wholesale.
    pub fn resolve(&mut self, items: Vec<T>) {
        self.items = items;
        self.state = RemoteState::Loaded;
        self.loaded_once = true;
    }

    /// Marks the fetch as failed
    ///
    /// Items already loaded are kept so a failed refetch does not blank
    /// the page.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = RemoteState::Failed(message.into());
    }

    /// Puts the collection back into the loading state for a refetch
    pub fn reload(&mut self) {
        self.state = RemoteState::Loading;
    }

    /// Loaded items, or `None` before the first successful fetch
    ///
    /// A failed initial fetch still yields `None`; only a `resolve` makes
    /// items visible.
    pub fn items(&self) -> Option<&[T]> {
        if self.loaded_once {
            Some(&self.items)
        } else {
            None
        }
    }

    /// Appends an item after a successful create
    pub fn insert(&mut self, item: T) {
        self.items.push(item);
    }

    /// Patches the first item matching the predicate in place
    ///
    /// Returns whether a match was found.
    pub fn patch<F>(&mut self, predicate: F, item: T) -> bool
    where
        F: Fn(&T) -> bool,
    {
        if let Some(slot) = self.items.iter_mut().find(|i| predicate(i)) {
            *slot = item;
            true
        } else {
            false
        }
    }

    /// Removes every item matching the predicate
    ///
    /// Returns how many were removed.
    pub fn remove<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|i| !predicate(i));
        before - self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_loading_with_no_items() {
        let collection: RemoteCollection<i32> = RemoteCollection::new();
        assert!(collection.is_loading());
        assert!(collection.items().is_none());
    }

    #[test]
    fn test_resolve_makes_items_visible() {
        let mut collection = RemoteCollection::new();
        collection.resolve(vec![1, 2, 3]);

        assert_eq!(collection.state(), &RemoteState::Loaded);
        assert_eq!(collection.items().unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn test_failed_initial_fetch_has_no_items() {
        let mut collection: RemoteCollection<i32> = RemoteCollection::new();
        collection.fail("connection refused");

        assert_eq!(
            collection.state(),
            &RemoteState::Failed("connection refused".to_string())
        );
        assert!(collection.items().is_none());
    }

    #[test]
    fn test_failed_refetch_keeps_items() {
        let mut collection = RemoteCollection::new();
        collection.resolve(vec![1, 2]);

        collection.reload();
        collection.fail("connection refused");

        assert_eq!(
            collection.state(),
            &RemoteState::Failed("connection refused".to_string())
        );
        assert_eq!(collection.items().unwrap(), &[1, 2]);
    }

    #[test]
    fn test_insert_patch_remove() {
        let mut collection = RemoteCollection::new();
        collection.resolve(vec![10, 20, 30]);

        collection.insert(40);
        assert!(collection.patch(|i| *i == 20, 25));
        assert!(!collection.patch(|i| *i == 99, 0));
        assert_eq!(collection.remove(|i| *i >= 30), 2);

        assert_eq!(collection.items().unwrap(), &[10, 25]);
    }
}
