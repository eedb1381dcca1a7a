//! Change notification for owned lists.

/// Callback invoked with the full list after every mutation.
pub type Observer<T> = Box<dyn Fn(&[T])>;

/// A set of observers for one list.
pub struct Observers<T> {
    callbacks: Vec<Observer<T>>,
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }
}

impl<T> Observers<T> {
    pub fn push(&mut self, observer: Observer<T>) {
        self.callbacks.push(observer);
    }

    pub fn notify(&self, items: &[T]) {
        for callback in &self.callbacks {
            callback(items);
        }
    }
}

impl<T> std::fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}
