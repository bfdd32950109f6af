//! Cryptographic Building Blocks
//!
//! STARK 계정 키 파생과 요청 서명을 위한 암호화 기능을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `common`: 공통 트레이트 (지갑 기능, secp256k1 서명 값)
//! - `evm`: Ethereum 측 구현 (Keccak256, secp256k1, 로컬 지갑)
//! - `stark`: STARK 곡선 측 구현 (키 파생, Pedersen 해시 체인, 서명, nonce)
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use starkex_signer::crypto::evm::EvmWallet;
//! use starkex_signer::crypto::stark::{
//!     ClockNonce, DerivationContext, MessageVector, StarkWallet, WalletSigner,
//! };
//!
//! // 로컬 이더리움 키를 지갑 기능으로 사용
//! let eth = EvmWallet::from_private_key("0x...")?;
//! let signer = WalletSigner::new(eth, DerivationContext::starkex_default());
//! let wallet = StarkWallet::new(signer, ClockNonce::new());
//!
//! // 요청 필드를 구성하고 nonce와 함께 서명
//! let vector = MessageVector::new().with_text("transfer").with_u64(1_000);
//! let request = wallet.sign_with_nonce(vector).await?;
//! println!("signature={}", request.signature_param());
//! ```

pub mod common;
pub mod evm;
pub mod stark;

// Re-exports: Common
pub use common::{Signature, WalletCapability};

// Re-exports: EVM
pub use evm::{keccak256, EvmWallet};

// Re-exports: STARK
pub use stark::{
    derive_key_pair, fold, parse_field, DerivationContext, FieldElement, KeyPairSigner,
    MessageVector, NonceProvider, SignedRequest, StarkKeyPair, StarkSignature, StarkSigner,
    StarkWallet, WalletSigner,
};
