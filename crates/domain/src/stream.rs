use std::pin::Pin;

/// A boxed async stream, used for agent event streams.
pub type BoxStream<'a, T> = Pin<Box<dyn futures_core::Stream<Item = T> + Send + 'a>>;
