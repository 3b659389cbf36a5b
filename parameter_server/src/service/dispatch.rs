use std::{borrow::Cow, io};

use comms::{Deserialize, Serialize, msg::Msg};
use log::warn;
use ml_core::Density;

use crate::{Aggregator, Result};

impl Aggregator {
    /// Answers a single encoded request, independently of how it was transported.
    ///
    /// An `Upload` is applied and acknowledged, a `Pull` is answered with a `Download`.
    /// Requests that are well formed but can't be honored, such as out of range indices
    /// or invalid densities, are answered with an `Err` message.
    ///
    /// # Arguments
    /// * `request` - The encoded request.
    /// * `reply` - Where the encoded reply gets appended.
    ///
    /// # Returns
    /// An `io::Error` if `request` can't be decoded.
    pub fn serve(&self, request: &[u8], reply: &mut Vec<u8>) -> io::Result<()> {
        let msg = Msg::deserialize(request)?;

        let response = match self.respond(&msg) {
            Ok(response) => response,
            Err(e) => {
                warn!(kind = msg.kind(); "rejected request: {e}");
                Msg::Err(Cow::Owned(e.to_string()))
            }
        };

        response.serialize(reply)
    }

    fn respond(&self, msg: &Msg<'_>) -> Result<Msg<'static>> {
        match msg {
            Msg::Upload(delta) => {
                self.apply_upload(delta)?;
                Ok(Msg::Ack)
            }
            Msg::Pull { density } => {
                let density = Density::new(*density)?;
                Ok(Msg::Download(self.select_download(density)?))
            }
            other => Ok(Msg::Err(Cow::Owned(format!(
                "unexpected {} message",
                other.kind()
            )))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use comms::SparseDelta;
    use ml_core::initialization::ConstParamGen;

    use super::*;

    fn aggregator() -> Aggregator {
        let nparams = NonZeroUsize::new(5).unwrap();
        Aggregator::new(nparams, nparams, ConstParamGen::new(1., 5)).unwrap()
    }

    fn exchange(agg: &Aggregator, request: Msg) -> Vec<u8> {
        let mut buf = Vec::new();
        request.serialize(&mut buf).unwrap();

        let mut reply = Vec::new();
        agg.serve(&buf, &mut reply).unwrap();
        reply
    }

    #[test]
    fn upload_then_pull() {
        let agg = aggregator();

        let delta = SparseDelta::new(vec![3, 0], vec![0.5, -1.]).unwrap();
        let reply = exchange(&agg, Msg::Upload(delta));
        assert_eq!(Msg::deserialize(&reply).unwrap(), Msg::Ack);

        let reply = exchange(&agg, Msg::Pull { density: 0.4 });
        let expected = SparseDelta::new(vec![0, 3], vec![0., 1.5]).unwrap();
        assert_eq!(Msg::deserialize(&reply).unwrap(), Msg::Download(expected));
    }

    #[test]
    fn out_of_range_upload_is_answered_with_err() {
        let agg = aggregator();

        let delta = SparseDelta::new(vec![1, 5], vec![1., 1.]).unwrap();
        let reply = exchange(&agg, Msg::Upload(delta));

        assert!(matches!(Msg::deserialize(&reply).unwrap(), Msg::Err(_)));
        assert_eq!(agg.update_counts(), [0; 5]);
    }

    #[test]
    fn invalid_density_is_answered_with_err() {
        let agg = aggregator();
        let reply = exchange(&agg, Msg::Pull { density: 1.5 });
        assert!(matches!(Msg::deserialize(&reply).unwrap(), Msg::Err(_)));
    }

    #[test]
    fn garbage_is_an_io_error() {
        let agg = aggregator();
        let mut reply = Vec::new();

        let err = agg.serve(&[0xff; 3], &mut reply).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(reply.is_empty());
    }
}
