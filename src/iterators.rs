//! Iterators over entry names
//!
//! Provides the one traversal protocol shared by:
//! - Enumerating every entry of a corpus ([`Reader::entries`](crate::Reader::entries))
//! - Running a query ([`Query::entries`](crate::Query::entries))
//!
//! The engine cursor behind an [`EntryIter`] is destroyed as soon as the
//! traversal runs out, when [`EntryIter::release`] is called, or when the
//! iterator is dropped, whichever comes first.

use crate::engine::Cursor;
use std::fmt;
use std::iter::FusedIterator;
use tracing::trace;

/// Lazy, one-shot sequence of entry names
///
/// Values are pulled from the engine one at a time. The iterator cannot be
/// restarted; ask the reader or query for a new one instead.
///
/// # Examples
///
/// ```no_run
/// use alpinocorpus::Reader;
///
/// let reader = Reader::open("treebank.dact")?;
/// for name in reader.entries()?.take(10) {
///     println!("{}", name);
/// }
/// // The engine iterator was released when the loop stopped.
/// # Ok::<(), alpinocorpus::CorpusError>(())
/// ```
pub struct EntryIter<'r> {
    cursor: Option<Box<dyn Cursor + 'r>>,
    current: Option<String>,
}

impl<'r> EntryIter<'r> {
    pub(crate) fn new(cursor: Box<dyn Cursor + 'r>) -> Self {
        Self {
            cursor: Some(cursor),
            current: None,
        }
    }

    /// Current value, without advancing
    ///
    /// Returns `None` once the traversal is over. An engine cursor that turns
    /// out to have no value is released here.
    pub fn peek(&mut self) -> Option<&str> {
        if self.current.is_none() {
            let value = self.cursor.as_ref()?.value();
            match value {
                Some(value) => self.current = Some(value),
                None => self.release(),
            }
        }
        self.current.as_deref()
    }

    /// Move past the current value
    ///
    /// Returns whether a further value exists. When it does not, the engine
    /// cursor is released immediately.
    pub fn advance(&mut self) -> bool {
        let Some(cursor) = self.cursor.as_mut() else {
            return false;
        };
        self.current = None;
        let more = cursor.advance();
        if !more {
            self.release();
        }
        more
    }

    /// Stop the traversal and destroy the engine cursor
    ///
    /// Calling this more than once, or after exhaustion, does nothing.
    pub fn release(&mut self) {
        self.current = None;
        if self.cursor.take().is_some() {
            trace!("entry iterator released");
        }
    }

    /// Whether the engine cursor is still held
    pub fn is_live(&self) -> bool {
        self.cursor.is_some()
    }
}

impl Iterator for EntryIter<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.peek()?;
        let value = self.current.take();
        self.advance();
        value
    }
}

impl FusedIterator for EntryIter<'_> {}

impl Drop for EntryIter<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for EntryIter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryIter")
            .field("live", &self.is_live())
            .field("current", &self.current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Cursor over a fixed list that records when it is destroyed
    struct ListCursor {
        items: Vec<&'static str>,
        pos: usize,
        dropped: Rc<Cell<usize>>,
    }

    impl Cursor for ListCursor {
        fn value(&self) -> Option<String> {
            self.items.get(self.pos).map(|s| s.to_string())
        }

        fn advance(&mut self) -> bool {
            self.pos += 1;
            self.pos < self.items.len()
        }
    }

    impl Drop for ListCursor {
        fn drop(&mut self) {
            self.dropped.set(self.dropped.get() + 1);
        }
    }

    fn list_iter(items: Vec<&'static str>) -> (EntryIter<'static>, Rc<Cell<usize>>) {
        let dropped = Rc::new(Cell::new(0));
        let cursor = ListCursor {
            items,
            pos: 0,
            dropped: Rc::clone(&dropped),
        };
        (EntryIter::new(Box::new(cursor)), dropped)
    }

    #[test]
    fn test_yields_all_values_in_order() {
        let (iter, dropped) = list_iter(vec!["a", "b", "c"]);
        let names: Vec<_> = iter.collect();

        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(dropped.get(), 1);
    }

    #[test]
    fn test_exhaustion_releases_before_drop() {
        let (mut iter, dropped) = list_iter(vec!["a"]);

        assert_eq!(iter.next().as_deref(), Some("a"));
        assert!(!iter.is_live());
        assert_eq!(dropped.get(), 1);
        assert_eq!(iter.next(), None);
        drop(iter);
        assert_eq!(dropped.get(), 1);
    }

    #[test]
    fn test_empty_cursor_is_released() {
        let (mut iter, dropped) = list_iter(vec![]);

        assert_eq!(iter.next(), None);
        assert_eq!(dropped.get(), 1);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let (mut iter, _dropped) = list_iter(vec!["a", "b"]);

        assert_eq!(iter.peek(), Some("a"));
        assert_eq!(iter.peek(), Some("a"));
        assert!(iter.advance());
        assert_eq!(iter.peek(), Some("b"));
        assert!(!iter.advance());
        assert_eq!(iter.peek(), None);
    }

    #[test]
    fn test_early_break_releases_cursor() {
        let (iter, dropped) = list_iter(vec!["a", "b", "c"]);

        for name in iter {
            if name == "b" {
                break;
            }
        }
        assert_eq!(dropped.get(), 1);
    }

    #[test]
    fn test_explicit_release_is_idempotent() {
        let (mut iter, dropped) = list_iter(vec!["a", "b"]);

        iter.release();
        iter.release();
        assert_eq!(iter.next(), None);
        assert!(!iter.advance());
        drop(iter);
        assert_eq!(dropped.get(), 1);
    }
}
