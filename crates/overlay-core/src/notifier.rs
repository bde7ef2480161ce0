use std::cell::RefCell;
use std::rc::Rc;

use crate::Dispose;

pub type SubId = usize;

/// Broadcast channel for platform notifications (keyboard frame changes and the like).
///
/// Subscribers are snapshotted before dispatch, so a subscriber may
/// subscribe or unsubscribe while being notified.
pub struct Notifier<T>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    next_id: SubId,
    subs: Vec<(SubId, Rc<dyn Fn(&T)>)>,
}

impl<T> Clone for Notifier<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: 'static> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Notifier<T> {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Inner {
            next_id: 0,
            subs: Vec::new(),
        })))
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        let mut inner = self.0.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subs.push((id, Rc::new(f)));
        id
    }

    /// Subscribe and get back a guard that unsubscribes when run.
    pub fn subscribe_guarded(&self, f: impl Fn(&T) + 'static) -> Dispose {
        let id = self.subscribe(f);
        let weak = Rc::downgrade(&self.0);
        Dispose::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().subs.retain(|(sid, _)| *sid != id);
            }
        })
    }

    pub fn unsubscribe(&self, id: SubId) -> bool {
        let mut inner = self.0.borrow_mut();
        let before = inner.subs.len();
        inner.subs.retain(|(sid, _)| *sid != id);
        inner.subs.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.borrow().subs.len()
    }

    pub fn post(&self, value: &T) {
        let subs: Vec<Rc<dyn Fn(&T)>> =
            self.0.borrow().subs.iter().map(|(_, f)| f.clone()).collect();
        log::trace!("notifier: posting to {} subscriber(s)", subs.len());
        for s in subs {
            s(value);
        }
    }
}
