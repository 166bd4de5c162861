//! xstream - lazy, channel-backed streams with bounded parallel stages
//!
//! Every operator spawns a stage on the stream's [`Engine`] and hands back a
//! new [`Stream`] over the stage's bounded output channel, so a pipeline is a
//! chain of tasks connected by channels with backpressure between them.
//!
//! ```
//! use xstream::{of, Options};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let evens = of(1..=10)
//!     .filter(|x| x % 2 == 0, Options::default())
//!     .map(|x| x * 10, Options::default())
//!     .to_vec()
//!     .await;
//! assert_eq!(evens, vec![20, 40, 60, 80, 100]);
//! # }
//! ```
//!
//! The free functions below build streams on [`Engine::current`] and must be
//! called from inside a tokio runtime.

pub mod collector;
pub mod engine;
pub mod error;
pub mod ring;
pub mod stream;
pub mod stream_configuration;
pub mod task;
pub mod worker;

use std::future::Future;

use tokio::sync::mpsc;

pub use collector::{Collector, CollectorFn, GroupBy};
pub use engine::Engine;
pub use error::{RetryPolicy, StreamError, StreamResult};
pub use ring::Ring;
pub use stream::{Flat, Sink, Stream};
pub use stream_configuration::{with_options, with_work_size, Options};
pub use worker::{Gate, Worker};

/// A stream that ends immediately.
pub fn empty<T>() -> Stream<T> {
    Engine::current().empty()
}

/// A stream over the given items.
pub fn of<I, T>(items: I) -> Stream<T>
where
    I: IntoIterator<Item = T>,
{
    Engine::current().of(items)
}

/// A stream fed by a generator that pushes into the sink it is given.
pub fn from<T, G, Fut>(generate: G) -> Stream<T>
where
    T: Send + 'static,
    G: FnOnce(Sink<T>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Engine::current().from(generate)
}

/// Wrap an existing channel.
pub fn range<T>(source: mpsc::Receiver<T>) -> Stream<T> {
    Engine::current().range(source)
}

/// Fan `a` and `others` into one stream.
pub fn concat<T, I>(a: Stream<T>, others: I) -> Stream<T>
where
    T: Send + 'static,
    I: IntoIterator<Item = Stream<T>>,
{
    let engine = a.engine().clone();
    engine.concat(a, others)
}
