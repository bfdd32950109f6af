//! STARK Wallet
//!
//! 서명자 하나와 nonce 발급기 하나를 묶은 지갑입니다.
//!
//! `sign_with_nonce`는 nonce 발급과 서명을 하나의 임계 구역에서 수행하므로
//! 같은 지갑에 대한 동시 호출이 nonce 순서를 뒤섞지 않습니다.

use super::curve::StarkSignature;
use super::field::{render_decimal, render_hex, serialize_decimal, serialize_optional_decimal, FieldElement};
use super::message::MessageVector;
use super::nonce::NonceProvider;
use super::signer::{StarkSigner, WalletSigner};
use crate::config::SignerConfig;
use crate::crypto::common::WalletCapability;
use crate::errors::SignerResult;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

/// 전송 계층에 넘기는 서명된 요청
///
/// 모든 필드는 10진수 문자열로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedRequest {
    /// 서명자 공개키 (stark key)
    #[serde(serialize_with = "serialize_decimal")]
    pub stark_key: FieldElement,
    #[serde(serialize_with = "serialize_decimal")]
    pub r: FieldElement,
    #[serde(serialize_with = "serialize_decimal")]
    pub s: FieldElement,
    /// 메시지 벡터 끝에 바인딩된 nonce
    #[serde(
        serialize_with = "serialize_optional_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub nonce: Option<FieldElement>,
}

impl SignedRequest {
    fn new(stark_key: FieldElement, signature: StarkSignature, nonce: Option<FieldElement>) -> Self {
        Self {
            stark_key,
            r: signature.r,
            s: signature.s,
            nonce,
        }
    }

    pub fn signature(&self) -> StarkSignature {
        StarkSignature::new(self.r, self.s)
    }

    /// `"r,s"` 형식의 서명 파라미터 (10진수)
    pub fn signature_param(&self) -> String {
        format!("{},{}", render_decimal(&self.r), render_decimal(&self.s))
    }

    /// stark key 16진수 표기 (계정 등록 등 hex 필드용)
    pub fn stark_key_hex(&self) -> String {
        render_hex(&self.stark_key)
    }
}

/// STARK 지갑
pub struct StarkWallet<S, N> {
    signer: S,
    nonces: N,
    guard: Mutex<()>,
}

impl<S: StarkSigner, N: NonceProvider> StarkWallet<S, N> {
    /// 서명자와 nonce 발급기로 지갑 생성
    pub fn new(signer: S, nonces: N) -> Self {
        Self {
            signer,
            nonces,
            guard: Mutex::new(()),
        }
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    pub fn nonce_provider(&self) -> &N {
        &self.nonces
    }

    /// 공개키 (stark key)
    pub async fn public_key(&self) -> SignerResult<FieldElement> {
        self.signer.public_key().await
    }

    /// 다음 nonce 발급
    ///
    /// `sign_with_nonce`와 같은 잠금을 사용하므로 진행 중인 서명과 섞이지 않습니다.
    pub async fn next_nonce(&self) -> FieldElement {
        let _guard = self.guard.lock().await;
        self.nonces.next()
    }

    /// nonce 없이 메시지 벡터에 서명
    pub async fn sign(&self, vector: &MessageVector) -> SignerResult<SignedRequest> {
        let (stark_key, signature) = self.signer.sign(vector).await?;
        Ok(SignedRequest::new(stark_key, signature, None))
    }

    /// nonce를 발급해 벡터 끝에 추가한 뒤 서명
    ///
    /// # Arguments
    ///
    /// * `vector` - 요청 필드들 (nonce 제외)
    ///
    /// # Returns
    ///
    /// 서명된 요청. `nonce` 필드는 벡터에 추가된 값과 같습니다.
    pub async fn sign_with_nonce(&self, mut vector: MessageVector) -> SignerResult<SignedRequest> {
        let _guard = self.guard.lock().await;

        let nonce = self.nonces.next();
        debug!(nonce = %render_decimal(&nonce), "binding nonce to message vector");
        vector.push(nonce);

        let (stark_key, signature) = self.signer.sign(&vector).await?;
        Ok(SignedRequest::new(stark_key, signature, Some(nonce)))
    }
}

impl<W: WalletCapability> StarkWallet<WalletSigner<W>, Box<dyn NonceProvider>> {
    /// 설정으로 지갑 기반 서명자와 nonce 정책을 구성
    pub fn from_config(capability: W, config: &SignerConfig) -> Self {
        let signer = WalletSigner::new(capability, config.context().clone())
            .with_grind_attempts(config.grind_attempts());
        Self::new(signer, config.nonce_policy().build())
    }
}

impl<S: std::fmt::Debug, N> std::fmt::Debug for StarkWallet<S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StarkWallet")
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}
