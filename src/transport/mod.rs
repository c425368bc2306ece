pub mod codec;
pub mod endpoint;
pub mod protocol;
