use std::io;
use std::marker::PhantomData;

use bytes::BytesMut;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::codec::{Decoder, Encoder, LengthDelimitedCodec};

/// Combines LengthDelimitedCodec (framing) with bincode (serialization).
///
/// `In` is the message type decoded from the stream, `Out` the type encoded
/// onto it; the controller and the agent instantiate it with the two
/// directions swapped.
pub struct WireCodec<In, Out> {
    codec: LengthDelimitedCodec,
    _marker: PhantomData<(In, Out)>,
}

impl<In, Out> WireCodec<In, Out> {
    pub fn new() -> Self {
        Self { codec: LengthDelimitedCodec::new(), _marker: PhantomData }
    }
}

impl<In, Out> Default for WireCodec<In, Out> {
    fn default() -> Self {
        Self::new()
    }
}

impl<In, Out: Serialize> Encoder<Out> for WireCodec<In, Out> {
    type Error = io::Error;

    fn encode(&mut self, item: Out, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let bytes = bincode::serialize(&item).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let bytes = bytes::Bytes::from(bytes);
        self.codec.encode(bytes, dst)
    }
}

impl<In: DeserializeOwned, Out> Decoder for WireCodec<In, Out> {
    type Item = In;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.codec.decode(src)? {
            Some(bytes) => {
                let item = bincode::deserialize(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }
}
