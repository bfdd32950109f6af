//! EVM-compatible cryptographic utilities
//!
//! 지갑 기능(WalletCapability)의 Ethereum 측 구현을 제공합니다.
//!
//! # 모듈
//!
//! - `keccak`: Keccak256 해싱, personal_sign 해시
//! - `secp256k1`: ECDSA 서명, 주소 파생 및 복구
//! - `wallet`: 로컬 개인키 기반 지갑

mod keccak;
mod secp256k1;
mod wallet;

pub use keccak::{keccak256, keccak256_hex, personal_sign_hash};
pub use secp256k1::{
    is_valid_address, parse_private_key, private_key_to_address, recover_address,
    to_checksum_address,
};
pub use wallet::EvmWallet;
