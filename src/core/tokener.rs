use crate::error::Error;
use serde::{de::DeserializeOwned, Serialize};

pub trait Payload: Serialize + DeserializeOwned {
    /// The subject as it was written in the token, if it had one.
    fn user(&self) -> Option<&str>;
}

pub trait Tokener<P: Payload> {
    fn gen_token(&self, payload: &P) -> Result<String, Error>;
    fn verify_token(&self, token: &str) -> Result<P, Error>;
}
