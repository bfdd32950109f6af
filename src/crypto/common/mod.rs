//! Common cryptographic traits
//!
//! 외부 지갑 기능 인터페이스와 secp256k1 서명 타입을 정의합니다.
//!
//! ## 모듈 구성
//!
//! - [`traits`]: 지갑 기능 인터페이스 (WalletCapability), 서명 타입 (Signature)

mod traits;

pub use traits::{Signature, WalletCapability};
