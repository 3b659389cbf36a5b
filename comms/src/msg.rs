use std::{borrow::Cow, io};

use crate::{Deserialize, Serialize, SparseDelta};

type Header = u32;
const HEADER_SIZE: usize = size_of::<Header>();

type Count = u64;
const COUNT_SIZE: usize = size_of::<Count>();

type WireIndex = u32;
const INDEX_SIZE: usize = size_of::<WireIndex>();
const VALUE_SIZE: usize = size_of::<f32>();

const ERR: Header = 0;
const ACK: Header = 1;
const PULL: Header = 2;
const UPLOAD: Header = 3;
const DOWNLOAD: Header = 4;

/// The application layer message exchanged between clients and the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg<'a> {
    Err(Cow<'a, str>),
    /// The previous request was applied.
    Ack,
    /// Requests a download of the given density.
    Pull { density: f64 },
    /// Gradient values at the selected coordinates.
    Upload(SparseDelta),
    /// Global parameter values at the selected coordinates.
    Download(SparseDelta),
}

impl Msg<'_> {
    /// A short name of the message kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Msg::Err(_) => "err",
            Msg::Ack => "ack",
            Msg::Pull { .. } => "pull",
            Msg::Upload(_) => "upload",
            Msg::Download(_) => "download",
        }
    }

    fn invalid_data<T>(detail: impl Into<String>) -> io::Result<T> {
        Err(io::Error::new(io::ErrorKind::InvalidData, detail.into()))
    }

    fn serialize_delta(delta: &SparseDelta, buf: &mut Vec<u8>) -> io::Result<()> {
        let indices = delta
            .indices()
            .iter()
            .map(|&i| WireIndex::try_from(i))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        buf.extend_from_slice(&(delta.len() as Count).to_be_bytes());
        buf.extend_from_slice(bytemuck::cast_slice(indices.as_slice()));
        buf.extend_from_slice(bytemuck::cast_slice(delta.values()));
        Ok(())
    }

    fn deserialize_delta(buf: &[u8]) -> io::Result<SparseDelta> {
        let Some((count_buf, rest)) = buf.split_first_chunk::<COUNT_SIZE>() else {
            return Self::invalid_data(format!(
                "sparse delta body of {} bytes has no count",
                buf.len()
            ));
        };

        let count = Count::from_be_bytes(*count_buf);
        let expected = usize::try_from(count)
            .ok()
            .and_then(|n| n.checked_mul(INDEX_SIZE + VALUE_SIZE));

        if expected != Some(rest.len()) {
            return Self::invalid_data(format!(
                "sparse delta of {count} entries doesn't fit a body of {} bytes",
                rest.len()
            ));
        }

        let entries = rest.len() / (INDEX_SIZE + VALUE_SIZE);
        let (index_buf, value_buf) = rest.split_at(entries * INDEX_SIZE);

        let indices = index_buf
            .chunks_exact(INDEX_SIZE)
            .map(|c| bytemuck::pod_read_unaligned::<WireIndex>(c) as usize)
            .collect();

        let values = value_buf
            .chunks_exact(VALUE_SIZE)
            .map(bytemuck::pod_read_unaligned::<f32>)
            .collect();

        SparseDelta::new(indices, values).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl Serialize for Msg<'_> {
    fn serialize(&self, buf: &mut Vec<u8>) -> io::Result<()> {
        let kind = match self {
            Msg::Err(_) => ERR,
            Msg::Ack => ACK,
            Msg::Pull { .. } => PULL,
            Msg::Upload(_) => UPLOAD,
            Msg::Download(_) => DOWNLOAD,
        };

        buf.extend_from_slice(&kind.to_be_bytes());

        match self {
            Msg::Err(detail) => buf.extend_from_slice(detail.as_bytes()),
            Msg::Ack => {}
            Msg::Pull { density } => buf.extend_from_slice(&density.to_be_bytes()),
            Msg::Upload(delta) | Msg::Download(delta) => Self::serialize_delta(delta, buf)?,
        }

        Ok(())
    }
}

impl<'a> Deserialize<'a> for Msg<'a> {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self> {
        let Some((kind_buf, rest)) = buf.split_first_chunk::<HEADER_SIZE>() else {
            return Self::invalid_data(format!(
                "The given buffer is too small {}, must at least be {HEADER_SIZE} bytes",
                buf.len()
            ));
        };

        match Header::from_be_bytes(*kind_buf) {
            ERR => {
                let detail = std::str::from_utf8(rest)
                    .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

                Ok(Self::Err(Cow::Borrowed(detail)))
            }
            ACK if rest.is_empty() => Ok(Self::Ack),
            PULL => match <[u8; 8]>::try_from(rest) {
                Ok(bytes) => Ok(Self::Pull {
                    density: f64::from_be_bytes(bytes),
                }),
                Err(_) => Self::invalid_data(format!("pull body of {} bytes", rest.len())),
            },
            UPLOAD => Ok(Self::Upload(Self::deserialize_delta(rest)?)),
            DOWNLOAD => Ok(Self::Download(Self::deserialize_delta(rest)?)),
            kind => Self::invalid_data(format!("Received an invalid kind {kind}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(msg: &Msg) -> Vec<u8> {
        let mut buf = Vec::new();
        msg.serialize(&mut buf).unwrap();
        buf
    }

    #[test]
    fn upload_round_trip() {
        let delta = SparseDelta::new(vec![7, 2, 40], vec![-0.5, 1.25, 3.]).unwrap();
        let buf = encode(&Msg::Upload(delta.clone()));

        assert_eq!(buf.len(), HEADER_SIZE + COUNT_SIZE + 3 * (INDEX_SIZE + VALUE_SIZE));
        assert_eq!(Msg::deserialize(&buf).unwrap(), Msg::Upload(delta));
    }

    #[test]
    fn empty_download_round_trip() {
        let buf = encode(&Msg::Download(SparseDelta::default()));
        assert_eq!(
            Msg::deserialize(&buf).unwrap(),
            Msg::Download(SparseDelta::default())
        );
    }

    #[test]
    fn control_messages() {
        let pull = Msg::Pull { density: 0.2 };
        assert_eq!(Msg::deserialize(&encode(&pull)).unwrap(), pull);
        assert_eq!(Msg::deserialize(&encode(&Msg::Ack)).unwrap(), Msg::Ack);

        let err = Msg::Err(Cow::Borrowed("boom"));
        assert_eq!(Msg::deserialize(&encode(&err)).unwrap(), err);
    }

    #[test]
    fn rejects_truncated_delta() {
        let delta = SparseDelta::new(vec![1, 2], vec![1., 2.]).unwrap();
        let mut buf = encode(&Msg::Upload(delta));
        buf.pop();

        let err = Msg::deserialize(&buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn rejects_duplicate_indices() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&UPLOAD.to_be_bytes());
        buf.extend_from_slice(&2u64.to_be_bytes());
        buf.extend_from_slice(bytemuck::cast_slice(&[5u32, 5][..]));
        buf.extend_from_slice(bytemuck::cast_slice(&[1f32, 2.][..]));

        let err = Msg::deserialize(&buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(Msg::deserialize(&9u32.to_be_bytes()).is_err());
        assert!(Msg::deserialize(&[0, 0]).is_err());
    }
}
