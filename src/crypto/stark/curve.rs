//! STARK Curve Operations
//!
//! STARK 곡선 ECDSA 서명, 검증, 공개키 계산을 제공합니다.
//!
//! 서명의 k 값은 RFC 6979로 결정적으로 생성합니다.
//!
//! # 참조
//!
//! - [StarkEx Signatures](https://docs.starkware.co/starkex/crypto/signatures.html)

use super::field::{render_decimal, render_hex};
use crate::errors::{SignerError, SignerResult};
use starknet_crypto::{get_public_key as stark_get_public_key, rfc6979_generate_k, sign, verify, SignError};
use starknet_types_core::felt::Felt;
use tracing::trace;

/// RFC 6979 k 재시드 최대 횟수
pub const MAX_K_ATTEMPTS: u32 = 16;

/// STARK 서명
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarkSignature {
    /// r 값
    pub r: Felt,
    /// s 값
    pub s: Felt,
}

impl StarkSignature {
    /// 새 서명 생성
    pub fn new(r: Felt, s: Felt) -> Self {
        Self { r, s }
    }

    /// (r, s) 10진수 문자열
    pub fn to_decimal(&self) -> (String, String) {
        (render_decimal(&self.r), render_decimal(&self.s))
    }

    /// (r, s) 16진수 문자열
    pub fn to_hex(&self) -> (String, String) {
        (render_hex(&self.r), render_hex(&self.s))
    }
}

/// 다이제스트에 서명
///
/// # Arguments
///
/// * `private_key` - STARK 개인키 (0 < key < n)
/// * `digest` - 해시 체인으로 접은 메시지 다이제스트
///
/// # Errors
///
/// 다이제스트가 0이거나 서명 가능 범위(< 2^251)를 벗어나면 `SigningFailure`.
/// 유효한 k를 찾지 못한 경우도 `SigningFailure`.
pub fn sign_digest(private_key: &Felt, digest: &Felt) -> SignerResult<StarkSignature> {
    if *digest == Felt::ZERO {
        return Err(SignerError::SigningFailure {
            message: "digest is the zero field element".into(),
        });
    }

    let mut seed: Option<Felt> = None;
    for attempt in 0..MAX_K_ATTEMPTS {
        let k = rfc6979_generate_k(digest, private_key, seed.as_ref());

        match sign(private_key, digest, &k) {
            Ok(signature) => return Ok(StarkSignature::new(signature.r, signature.s)),
            Err(SignError::InvalidK) => {
                trace!(attempt, "rejected k, reseeding");
                seed = Some(seed.unwrap_or(Felt::ZERO) + Felt::ONE);
            },
            Err(e) => {
                return Err(SignerError::SigningFailure {
                    message: format!("digest {} rejected: {e:?}", render_hex(digest)),
                })
            },
        }
    }

    Err(SignerError::SigningFailure {
        message: format!("no valid k after {MAX_K_ATTEMPTS} attempts"),
    })
}

/// 서명 검증
pub fn verify_signature(
    public_key: &Felt,
    digest: &Felt,
    signature: &StarkSignature,
) -> SignerResult<bool> {
    verify(public_key, digest, &signature.r, &signature.s).map_err(|e| {
        SignerError::InvalidSignature {
            message: format!("STARK verification failed: {e:?}"),
        }
    })
}

/// 개인키에서 공개키(x 좌표, stark key) 계산
pub fn get_public_key(private_key: &Felt) -> Felt {
    stark_get_public_key(private_key)
}
