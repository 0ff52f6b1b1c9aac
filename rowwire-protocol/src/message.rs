use crate::config::WireConfig;
use crate::error::{Error, ErrorMsg, Result};
use crate::rowblock::RowBlockMessage;
use crate::schema::SchemaMessage;
use crate::status::AppStatus;
use serde::de::DeserializeOwned;
use serde::Serialize;

const BINCODE_CONFIG: bincode::config::Configuration = bincode::config::standard();

/// WireMessage converts a message to and from its byte payload.
pub trait WireMessage: Serialize + DeserializeOwned {
    /// Serialize message into bytes.
    /// Fails if the payload exceeds max message size.
    #[inline]
    fn to_bytes(&self, config: &WireConfig) -> Result<Vec<u8>> {
        let bs = bincode::serde::encode_to_vec(self, BINCODE_CONFIG)?;
        check_size(config, bs.len())?;
        Ok(bs)
    }

    /// Deserialize message from bytes.
    /// The whole input must be consumed.
    #[inline]
    fn from_bytes(config: &WireConfig, bs: &[u8]) -> Result<Self> {
        check_size(config, bs.len())?;
        let (msg, n) = bincode::serde::decode_from_slice(bs, BINCODE_CONFIG)?;
        if n != bs.len() {
            return Err(Error::corruption(format!(
                "{} trailing bytes after message of {} bytes",
                bs.len() - n,
                n
            )));
        }
        Ok(msg)
    }
}

impl WireMessage for RowBlockMessage {}

impl WireMessage for SchemaMessage {}

impl WireMessage for AppStatus {}

#[inline]
fn check_size(config: &WireConfig, len: usize) -> Result<()> {
    if len > config.max_message_size() {
        log::warn!(
            "message of {} bytes exceeds limit {}",
            len,
            config.max_message_size()
        );
        return Err(Error::MessageTooLarge(ErrorMsg::new(format!(
            "{} bytes exceeds max message size {}",
            len,
            config.max_message_size()
        ))));
    }
    Ok(())
}
