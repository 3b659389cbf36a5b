use std::io;

/// A type that can be rebuilt from a byte buffer received from the wire.
pub trait Deserialize<'a>: Sized {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self>;
}
