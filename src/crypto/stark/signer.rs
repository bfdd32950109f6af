//! STARK Signer
//!
//! 키 파생과 해시 체인을 결합한 서명자입니다.
//!
//! - [`WalletSigner`]: 지갑 기능에서 매 호출마다 키를 다시 파생 (개인키 캐시 없음)
//! - [`KeyPairSigner`]: 고정 키 쌍 기반 (테스트, 도구용)

use super::curve::StarkSignature;
use super::derivation::{derive_key_pair, DerivationContext, StarkKeyPair, DEFAULT_GRIND_ATTEMPTS};
use super::field::{parse_field, render_hex, FieldElement};
use super::message::MessageVector;
use crate::crypto::common::WalletCapability;
use crate::errors::SignerResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// 서명자 트레이트
#[async_trait]
pub trait StarkSigner: Send + Sync {
    /// 공개키 (stark key)
    async fn public_key(&self) -> SignerResult<FieldElement>;

    /// 메시지 벡터를 접어 서명
    ///
    /// # Returns
    ///
    /// (공개키, 서명) - 호출자가 키를 다시 파생할 필요가 없도록 공개키도 함께 반환
    async fn sign(&self, vector: &MessageVector) -> SignerResult<(FieldElement, StarkSignature)>;
}

#[async_trait]
impl<T: StarkSigner + ?Sized> StarkSigner for Arc<T> {
    async fn public_key(&self) -> SignerResult<FieldElement> {
        (**self).public_key().await
    }

    async fn sign(&self, vector: &MessageVector) -> SignerResult<(FieldElement, StarkSignature)> {
        (**self).sign(vector).await
    }
}

fn sign_with_key_pair(
    key_pair: &StarkKeyPair,
    vector: &MessageVector,
) -> SignerResult<(FieldElement, StarkSignature)> {
    let digest = vector.digest();
    debug!(
        elements = vector.len(),
        stark_key = %render_hex(&key_pair.public_key()),
        "signing message vector"
    );

    let signature = key_pair.sign_digest(&digest)?;
    Ok((key_pair.public_key(), signature))
}

/// 지갑 기반 서명자
pub struct WalletSigner<W> {
    wallet: W,
    context: DerivationContext,
    grind_attempts: u32,
}

impl<W: WalletCapability> WalletSigner<W> {
    /// 지갑과 파생 컨텍스트로 서명자 생성
    pub fn new(wallet: W, context: DerivationContext) -> Self {
        Self {
            wallet,
            context,
            grind_attempts: DEFAULT_GRIND_ATTEMPTS,
        }
    }

    /// 그라인딩 시도 한도 설정
    pub fn with_grind_attempts(mut self, attempts: u32) -> Self {
        self.grind_attempts = attempts;
        self
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn context(&self) -> &DerivationContext {
        &self.context
    }

    async fn derive(&self) -> SignerResult<StarkKeyPair> {
        derive_key_pair(&self.wallet, &self.context, self.grind_attempts).await
    }
}

#[async_trait]
impl<W: WalletCapability> StarkSigner for WalletSigner<W> {
    async fn public_key(&self) -> SignerResult<FieldElement> {
        Ok(self.derive().await?.public_key())
    }

    async fn sign(&self, vector: &MessageVector) -> SignerResult<(FieldElement, StarkSignature)> {
        let key_pair = self.derive().await?;
        sign_with_key_pair(&key_pair, vector)
    }
}

impl<W> std::fmt::Debug for WalletSigner<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSigner")
            .field("context", &self.context)
            .field("grind_attempts", &self.grind_attempts)
            .finish()
    }
}

/// 고정 키 쌍 서명자
#[derive(Debug, Clone)]
pub struct KeyPairSigner {
    key_pair: StarkKeyPair,
}

impl KeyPairSigner {
    /// STARK 개인키로 서명자 생성
    pub fn new(private_key: FieldElement) -> SignerResult<Self> {
        Ok(Self {
            key_pair: StarkKeyPair::from_private_key(private_key)?,
        })
    }

    /// 0x 16진수 또는 10진수 개인키로 서명자 생성
    pub fn from_numeral(private_key: &str) -> SignerResult<Self> {
        Self::new(parse_field(private_key)?)
    }

    pub fn key_pair(&self) -> &StarkKeyPair {
        &self.key_pair
    }
}

#[async_trait]
impl StarkSigner for KeyPairSigner {
    async fn public_key(&self) -> SignerResult<FieldElement> {
        Ok(self.key_pair.public_key())
    }

    async fn sign(&self, vector: &MessageVector) -> SignerResult<(FieldElement, StarkSignature)> {
        sign_with_key_pair(&self.key_pair, vector)
    }
}
