//! Static and adaptive arithmetic coding for byte streams.

/// Entropy coder family
// http://en.wikipedia.org/wiki/Entropy_encoding
pub mod entropy {
    pub mod ari;
}

pub use entropy::ari::{CoderError, Decoder, Encoder, Mode};
