//! Fan-in and fan-out: concat, split, split_stream, copy.

use std::collections::HashMap;
use std::hash::Hash;

use futures::future::join_all;
use tokio::sync::mpsc;

use super::{release, Stream};
use crate::error::{StreamError, StreamResult};
use crate::stream_configuration::bounded_capacity;

impl<T: Send + 'static> Stream<T> {
    /// Interleave this stream with `others`. Each input keeps its own order;
    /// the order between inputs is unspecified.
    pub fn concat<I>(self, others: I) -> Stream<T>
    where
        I: IntoIterator<Item = Stream<T>>,
    {
        let engine = self.engine().clone();
        engine.concat(self, others)
    }

    /// Group consecutive elements into chunks of `n`; the final chunk may be shorter.
    ///
    /// A chunk size of zero is rejected after releasing the upstream.
    pub fn split(self, n: usize) -> StreamResult<Stream<Vec<T>>> {
        if n == 0 {
            let (source, engine) = self.into_parts();
            release(&engine, source);
            return Err(StreamError::InvalidArgument(
                "chunk size must be greater than 0".to_string(),
            ));
        }

        Ok(self.stage(move |mut source, sink| async move {
            let mut chunk = Vec::new();
            while let Some(item) = source.recv().await {
                chunk.push(item);
                if chunk.len() == n && sink.send(std::mem::take(&mut chunk)).await.is_err() {
                    return;
                }
            }
            if !chunk.is_empty() {
                let _ = sink.send(chunk).await;
            }
        }))
    }

    /// Like [`Stream::split`], but every chunk is delivered as its own stream.
    pub fn split_stream(self, n: usize) -> StreamResult<Stream<Stream<T>>> {
        let engine = self.engine().clone();
        let chunks = self.split(n)?;
        Ok(chunks.stage(move |mut source, sink| async move {
            while let Some(chunk) = source.recv().await {
                if sink.send(engine.of(chunk)).await.is_err() {
                    break;
                }
            }
        }))
    }

    /// Fan every element out to one independent stream per name, each buffered
    /// with the requested capacity (at least one).
    ///
    /// All copies advance together: an element is sent to every output before
    /// the next one is read. Outputs that get dropped are skipped from then on,
    /// and the upstream is released once none are left.
    pub fn copy<K, I>(self, outputs: I) -> HashMap<K, Stream<T>>
    where
        T: Clone,
        K: Eq + Hash,
        I: IntoIterator<Item = (K, usize)>,
    {
        let (mut source, engine) = self.into_parts();
        let mut sized = Vec::new();
        let mut streams = HashMap::new();
        for (name, capacity) in outputs {
            let capacity = bounded_capacity(capacity);
            let (tx, rx) = mpsc::channel(capacity);
            sized.push((capacity, tx));
            streams.insert(name, engine.range(rx));
        }
        if sized.is_empty() {
            release(&engine, source);
            return streams;
        }

        // larger buffers first: they are the least likely to block
        sized.sort_by(|a, b| b.0.cmp(&a.0));
        let mut senders: Vec<mpsc::Sender<T>> = sized.into_iter().map(|(_, tx)| tx).collect();

        engine.spawn(async move {
            while let Some(item) = source.recv().await {
                let sent = join_all(senders.iter().map(|tx| tx.send(item.clone()))).await;
                let mut sent = sent.into_iter();
                senders.retain(|_| matches!(sent.next(), Some(Ok(()))));
                if senders.is_empty() {
                    log::debug!("every copy was dropped, releasing upstream");
                    break;
                }
            }
        });

        streams
    }
}
