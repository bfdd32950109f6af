//! STARK Key Derivation & Signing
//!
//! 이더리움 지갑 서명에서 STARK 키를 파생하고, 요청 필드를 Pedersen 해시 체인으로
//! 접어 서명합니다.
//!
//! # 구성
//!
//! - `field`: 필드 요소 파싱/렌더링
//! - `derivation`: 지갑 서명 → BIP-32 → 그라인딩 → STARK 키 쌍
//! - `hash_chain`: 순서 있는 필드 요소의 오른쪽 접기
//! - `curve`: STARK ECDSA 서명/검증
//! - `signer`, `nonce`, `wallet`: 서명자, nonce 정책, 둘을 묶은 지갑

mod curve;
mod derivation;
mod field;
mod hash_chain;
mod message;
mod nonce;
mod signer;
mod wallet;

pub use curve::{get_public_key, sign_digest, verify_signature, StarkSignature, MAX_K_ATTEMPTS};
pub use derivation::{
    account_path, derive_key_pair, grind_key, hash_key_with_index, key_pair_from_signature,
    private_key_from_path, stark_curve_order, DerivationContext, StarkKeyPair,
    DEFAULT_ACCOUNT_INDEX, DEFAULT_GRIND_ATTEMPTS, EIP2645_PURPOSE, STARKEX_APPLICATION,
    STARKEX_CHALLENGE_MESSAGE, STARKEX_LAYER,
};
pub use field::{
    biguint_to_felt, felt_to_biguint, field_from_u64, field_prime, hash_to_field, parse_field,
    render_decimal, render_hex, serialize_decimal, serialize_optional_decimal, FieldElement,
};
pub use hash_chain::{fold, fold_with, pedersen_hash};
pub use message::MessageVector;
pub use nonce::{Clock, ClockNonce, CounterNonce, MonotonicClockNonce, NonceProvider};
pub use signer::{KeyPairSigner, StarkSigner, WalletSigner};
pub use wallet::{SignedRequest, StarkWallet};
