//! Owned observer collection.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

pub struct Listeners<T> {
    next_id: u64,
    entries: Vec<(ListenerId, Callback<T>)>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<T> Listeners<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(eid, _)| *eid != id);
        self.entries.len() != before
    }

    /// Calls every listener in registration order.
    pub fn notify(&mut self, event: &T) {
        for (_, listener) in self.entries.iter_mut() {
            listener(event);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_notify_in_registration_order_and_remove() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut l: Listeners<u32> = Listeners::new();
        let a = {
            let seen = seen.clone();
            l.add(move |v| seen.borrow_mut().push(("a", *v)))
        };
        {
            let seen = seen.clone();
            l.add(move |v| seen.borrow_mut().push(("b", *v)));
        }
        l.notify(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);

        assert!(l.remove(a));
        assert!(!l.remove(a));
        l.notify(&8);
        assert_eq!(seen.borrow().last(), Some(&("b", 8)));
        assert_eq!(l.len(), 1);

        l.clear();
        assert!(l.is_empty());
    }
}
