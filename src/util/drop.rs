use std::cell::Cell;
use std::rc::Rc;

/// Shared counter incremented every time a [`Tracked`] value is dropped.
#[derive(Debug, Default, Clone)]
pub struct DropCounter(Rc<Cell<usize>>);

impl DropCounter {
    pub fn new() -> DropCounter {
        DropCounter::default()
    }

    pub fn track<T>(&self, value: T) -> Tracked<T> {
        Tracked {
            value,
            counter: self.clone(),
        }
    }

    pub fn dropped(&self) -> usize {
        self.0.get()
    }
}

/// A value that reports its own drop to a [`DropCounter`].
#[derive(Debug, Clone)]
pub struct Tracked<T> {
    pub value: T,
    counter: DropCounter,
}

impl<T: PartialEq> PartialEq for Tracked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.counter.0.set(self.counter.0.get() + 1);
    }
}
