/*
[INPUT]:  Application private key material
[OUTPUT]: RSA signers and key loading helpers
[POS]:    Auth layer - owns the key used to sign gateway requests
[UPDATE]: When key formats or signature primitives change
*/

pub mod key_file;
pub mod signer;

pub use key_file::load_signer;
pub use signer::{RsaSigner, reconstruct_pem};
