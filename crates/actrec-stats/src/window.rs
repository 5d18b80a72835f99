/// Fixed-capacity FIFO buffer of the most recent values.
///
/// Storage is a single allocation of `capacity` slots plus a head index. Once
/// the buffer is full, each push overwrites the oldest value, so insertion is
/// O(1) and memory never exceeds `capacity` values.
///
/// # Examples
///
/// ```
/// use actrec_stats::window::Window;
///
/// let mut window = Window::new(3);
/// for v in 1..=5 {
///     window.push(f64::from(v));
/// }
/// assert_eq!(window.iter().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Window {
    buf: Vec<f64>,
    capacity: usize,
    // index of the oldest value once the buffer has wrapped
    head: usize,
}

impl Window {
    /// Creates an empty window.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be positive");
        Self {
            buf: Vec::new(),
            capacity,
            head: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Appends a value, evicting the oldest one when full.
    pub fn push(&mut self, value: f64) {
        if self.buf.len() < self.capacity {
            if self.buf.capacity() == 0 {
                // grow lazily: small streams never pay for the full capacity
                self.buf.reserve(self.capacity.min(1024));
            }
            self.buf.push(value);
        } else {
            self.buf[self.head] = value;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.head = 0;
    }

    /// Iterates from the oldest to the newest retained value.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let (newer, older) = self.buf.split_at(self.head);
        older.iter().chain(newer).copied()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

impl Extend<f64> for Window {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for value in iter {
            self.push(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_full() {
        let mut window = Window::new(4);
        window.extend([1.0, 2.0]);
        assert_eq!(window.len(), 2);
        assert_eq!(window.to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_wraps_many_times() {
        let mut window = Window::new(3);
        window.extend((0..10).map(f64::from));
        assert_eq!(window.len(), 3);
        assert_eq!(window.to_vec(), vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_clear_resets_order() {
        let mut window = Window::new(2);
        window.extend([1.0, 2.0, 3.0]);
        window.clear();
        assert!(window.is_empty());
        window.extend([4.0, 5.0, 6.0]);
        assert_eq!(window.to_vec(), vec![5.0, 6.0]);
    }

    #[test]
    #[should_panic(expected = "window capacity must be positive")]
    fn test_zero_capacity() {
        let _ = Window::new(0);
    }
}
