//! StarkEx Signer: STARK 계정 키 파생 및 요청 서명 라이브러리
//!
//! 이더리움 지갑 서명에서 STARK 키를 결정적으로 파생하고, 요청 필드를
//! Pedersen 해시 체인으로 접어 서명합니다. 개인키는 매 호출마다 다시 파생되며
//! 저장되지 않습니다.

pub mod config;
pub mod crypto;
pub mod errors;
pub mod utils;

// Re-exports
pub use config::{NoncePolicy, SignerConfig};
pub use errors::{SignerError, SignerResult};
