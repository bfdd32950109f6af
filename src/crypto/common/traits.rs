//! Wallet capability traits
//!
//! STARK 키 파생에 필요한 외부 지갑 인터페이스와 ECDSA 서명 타입을 정의합니다.

use crate::errors::{SignerError, SignerResult};
use async_trait::async_trait;
use std::sync::Arc;

/// ECDSA 서명 결과 (secp256k1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// r 값 (32 bytes)
    pub r: [u8; 32],
    /// s 값 (32 bytes)
    pub s: [u8; 32],
    /// v 값 (recovery id, 27 또는 28)
    pub v: u8,
}

impl Signature {
    /// 새 서명 생성
    pub fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Self { r, s, v }
    }

    /// 65바이트 형식으로 변환 (r || s || v)
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = self.v;
        bytes
    }

    /// 지갑이 돌려준 서명 바이트 파싱
    ///
    /// 65바이트 (r || s || v) 또는 EIP-2098 압축 형식 64바이트 (r || yParityAndS)를 허용합니다.
    /// 압축 형식은 s의 최상위 비트가 y parity이므로 이를 떼어내 `v = 27 + parity`로 복원합니다.
    pub fn from_slice(bytes: &[u8]) -> SignerResult<Self> {
        if bytes.len() != 64 && bytes.len() != 65 {
            return Err(SignerError::InvalidSignature {
                message: format!("Expected 64 or 65 bytes, got {}", bytes.len()),
            });
        }

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);

        let v = match bytes.get(64) {
            Some(v) => *v,
            None => {
                let parity = s[0] >> 7;
                s[0] &= 0x7f;
                27 + parity
            },
        };
        Ok(Self { r, s, v })
    }

    /// EIP-2098 압축 형식 (r || yParityAndS)
    ///
    /// s가 하위 절반(low-s)이어야 손실 없이 표현됩니다.
    pub fn to_compact(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..].copy_from_slice(&self.s);
        if matches!(self.v, 1 | 28) {
            bytes[32] |= 0x80;
        }
        bytes
    }

    /// Hex 문자열로 변환 (0x 접두사 포함)
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Hex 문자열에서 파싱 (0x 접두사 선택)
    pub fn from_hex(hex_str: &str) -> SignerResult<Self> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = hex::decode(hex_str).map_err(|e| SignerError::InvalidSignature {
            message: format!("Invalid hex: {e}"),
        })?;
        Self::from_slice(&bytes)
    }
}

/// 외부 지갑 기능 - STARK 키 파생의 유일한 외부 의존성
///
/// 브라우저 지갑, 하드웨어 지갑, 로컬 키 등 무엇이든 구현할 수 있습니다.
/// `sign_challenge`는 사용자 승인을 기다릴 수 있는 유일한 비동기 단계입니다.
#[async_trait]
pub trait WalletCapability: Send + Sync {
    /// 텍스트 챌린지에 대한 서명 (personal_sign 스타일, 65바이트 r || s || v)
    ///
    /// 사용자가 거부하거나 취소하면 에러를 반환해야 합니다.
    async fn sign_challenge(&self, challenge: &str) -> SignerResult<Vec<u8>>;

    /// 지갑 주소 (0x 접두사 hex)
    async fn address(&self) -> SignerResult<String>;
}

#[async_trait]
impl<T: WalletCapability + ?Sized> WalletCapability for Arc<T> {
    async fn sign_challenge(&self, challenge: &str) -> SignerResult<Vec<u8>> {
        (**self).sign_challenge(challenge).await
    }

    async fn address(&self) -> SignerResult<String> {
        (**self).address().await
    }
}

#[async_trait]
impl<T: WalletCapability + ?Sized> WalletCapability for Box<T> {
    async fn sign_challenge(&self, challenge: &str) -> SignerResult<Vec<u8>> {
        (**self).sign_challenge(challenge).await
    }

    async fn address(&self) -> SignerResult<String> {
        (**self).address().await
    }
}
