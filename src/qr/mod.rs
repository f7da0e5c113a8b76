pub mod error;
pub mod service;

pub use self::{
    error::{MintError, VerifyError, WeakSecret},
    service::{DEFAULT_TTL_SECONDS, IssuedToken, MIN_SECRET_LEN, TokenService},
};
