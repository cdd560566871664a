//! Iterator wrapping with a guaranteed completion notification.

use crate::meter::Meter;

/// Iterator adapter that counts produced items against a borrowed meter.
///
/// Items pass through unchanged; each one observed as a single unit. `end()`
/// fires exactly once: on exhaustion, or from `Drop` when the consumer breaks
/// out early or unwinds.
pub struct Tracked<'a, M: Meter, I> {
    meter: &'a mut M,
    inner: I,
    done: bool,
}

impl<'a, M: Meter, I> Tracked<'a, M, I> {
    pub(crate) fn new(meter: &'a mut M, inner: I) -> Self {
        Tracked {
            meter,
            inner,
            done: false,
        }
    }

    fn finish(&mut self) {
        if !self.done {
            self.done = true;
            self.meter.end();
        }
    }
}

impl<M: Meter, I: Iterator> Iterator for Tracked<'_, M, I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        match self.inner.next() {
            Some(item) => {
                self.meter.observe(1);
                Some(item)
            }
            None => {
                self.finish();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<M: Meter, I> Drop for Tracked<'_, M, I> {
    fn drop(&mut self) {
        self.finish();
    }
}
