use std::io;

/// A type that can be written into a byte buffer to be sent over the wire.
pub trait Serialize {
    /// Appends the encoded form of `self` to `buf`.
    ///
    /// # Returns
    /// An `io::Error` if `self` can't be represented in the wire format.
    fn serialize(&self, buf: &mut Vec<u8>) -> io::Result<()>;
}
