//! Terminal operators: queries that may stop early, and plain consumers.

use super::{release, Stream};
use crate::error::{StreamError, StreamResult};

impl<T: Send + 'static> Stream<T> {
    /// Whether any element matches. Stops at the first match and releases the rest.
    ///
    /// An empty stream returns `false` without calling `predicate`.
    pub async fn any_match<P>(self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        let (mut source, engine) = self.into_parts();
        while let Some(item) = source.recv().await {
            if predicate(&item) {
                release(&engine, source);
                return true;
            }
        }
        false
    }

    /// Whether every element matches. Stops at the first mismatch and releases the rest.
    ///
    /// An empty stream returns `true` without calling `predicate`.
    pub async fn all_match<P>(self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        let (mut source, engine) = self.into_parts();
        while let Some(item) = source.recv().await {
            if !predicate(&item) {
                release(&engine, source);
                return false;
            }
        }
        true
    }

    pub async fn find_first(self) -> StreamResult<T> {
        let (mut source, engine) = self.into_parts();
        let first = source.recv().await.ok_or(StreamError::NoElement)?;
        release(&engine, source);
        Ok(first)
    }

    /// The last element. Always consumes the whole stream.
    pub async fn find_last(mut self) -> StreamResult<T> {
        let mut last = None;
        while let Some(item) = self.recv().await {
            last = Some(item);
        }
        last.ok_or(StreamError::NoElement)
    }

    pub async fn count(mut self) -> usize {
        let mut count = 0;
        while self.recv().await.is_some() {
            count += 1;
        }
        count
    }

    pub async fn for_each<F>(mut self, mut f: F)
    where
        F: FnMut(T),
    {
        while let Some(item) = self.recv().await {
            f(item);
        }
    }

    /// Consume and discard every element.
    pub async fn done(mut self) {
        while self.recv().await.is_some() {}
    }
}
