//! Body drain-and-duplicate utility.
//!
//! Lets a request or response body be read once (e.g. parsed into a
//! [`Values`](crate::values::Values) map) and then still be forwarded
//! unconsumed: [`drain_body`] turns one body into two that replay
//! identical bytes. [`Body::Empty`] is the explicit "no body" sentinel
//! and passes through untouched.

use std::fmt;
use std::io::{self, Read};

use bytes::{Buf, Bytes};

/// An ownable, replayable request/response body.
pub enum Body {
    /// The explicit "no body" sentinel.
    Empty,
    /// Fully buffered content; duplicates without copying.
    Bytes(Bytes),
    /// Unread streaming content; consumed on first read.
    Stream(Box<dyn Read + Send>),
}

impl Body {
    pub fn from_reader(reader: impl Read + Send + 'static) -> Body {
        Body::Stream(Box::new(reader))
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Body {
        Body::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Body {
        Body::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Body {
        Body::Bytes(Bytes::from_static(s.as_bytes()))
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Body::Empty => Ok(0),
            Body::Bytes(bytes) => {
                let n = buf.len().min(bytes.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                bytes.advance(n);
                Ok(n)
            }
            Body::Stream(reader) => reader.read(buf),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Body::Empty"),
            Body::Bytes(bytes) => write!(f, "Body::Bytes({} bytes)", bytes.len()),
            Body::Stream(_) => f.write_str("Body::Stream"),
        }
    }
}

/// Consume `body` and return two bodies that each replay its full
/// content byte-for-byte.
///
/// [`Body::Empty`] in yields ([`Body::Empty`], [`Body::Empty`]) without
/// touching anything; buffered content is duplicated zero-copy; a
/// stream is read to end once.
pub fn drain_body(body: Body) -> io::Result<(Body, Body)> {
    match body {
        Body::Empty => Ok((Body::Empty, Body::Empty)),
        Body::Bytes(bytes) => Ok((Body::Bytes(bytes.clone()), Body::Bytes(bytes))),
        Body::Stream(mut reader) => {
            let mut buffered = Vec::new();
            reader.read_to_end(&mut buffered)?;
            let bytes = Bytes::from(buffered);
            Ok((Body::Bytes(bytes.clone()), Body::Bytes(bytes)))
        }
    }
}
