use derive_more::{Display, From, Into};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct ListenerId(u64);

type Callback<T> = Rc<dyn Fn(&T)>;

/// Single-threaded observer list.
///
/// All methods take `&self`, and [`Listeners::emit`] iterates over a snapshot,
/// so a callback may connect or disconnect listeners, or re-enter whatever
/// owns the list, while an emission is running. Listeners added during an
/// emission are first called on the next one; listeners removed during an
/// emission are not called again.
pub struct Listeners<T: ?Sized> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(ListenerId, Callback<T>)>>,
}

impl<T: ?Sized> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish()
    }
}

impl<T: ?Sized> Listeners<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&T) + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.entries.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    pub fn disconnect(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        entries.len() != before
    }

    pub fn is_connected(&self, id: ListenerId) -> bool {
        self.entries.borrow().iter().any(|(entry, _)| *entry == id)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn emit(&self, payload: &T) {
        let snapshot: Vec<(ListenerId, Callback<T>)> = self.entries.borrow().clone();
        for (id, callback) in snapshot {
            if self.is_connected(id) {
                callback(payload);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_every_listener() {
        let listeners = Listeners::<i32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..3 {
            let seen = seen.clone();
            listeners.connect(move |v| seen.borrow_mut().push((tag, *v)));
        }

        listeners.emit(&7);

        assert_eq!(*seen.borrow(), vec![(0, 7), (1, 7), (2, 7)]);
    }

    #[test]
    fn test_disconnect() {
        let listeners = Listeners::<i32>::new();
        let count = Rc::new(Cell::new(0));
        let id = {
            let count = count.clone();
            listeners.connect(move |_| count.set(count.get() + 1))
        };

        listeners.emit(&1);
        assert!(listeners.disconnect(id));
        assert!(!listeners.disconnect(id));
        listeners.emit(&1);

        assert_eq!(count.get(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_connect_during_emit_is_deferred() {
        let listeners = Rc::new(Listeners::<i32>::new());
        let count = Rc::new(Cell::new(0));
        {
            let inner = listeners.clone();
            let count = count.clone();
            listeners.connect(move |_| {
                let count = count.clone();
                inner.connect(move |_| count.set(count.get() + 1));
            });
        }

        listeners.emit(&0);
        assert_eq!(count.get(), 0);
        assert_eq!(listeners.len(), 2);

        listeners.emit(&0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_disconnect_during_emit_skips_removed() {
        let listeners = Rc::new(Listeners::<i32>::new());
        let count = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(None));
        {
            let inner = listeners.clone();
            let second = second.clone();
            listeners.connect(move |_| {
                if let Some(id) = second.get() {
                    inner.disconnect(id);
                }
            });
        }
        {
            let count = count.clone();
            second.set(Some(listeners.connect(move |_| count.set(count.get() + 1))));
        }

        listeners.emit(&0);

        assert_eq!(count.get(), 0);
        assert_eq!(listeners.len(), 1);
    }
}
