pub mod credentials;
pub mod signer;

pub use credentials::Credentials;
pub use signer::RequestSigner;
