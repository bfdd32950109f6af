//! STARK Key Derivation
//!
//! Ethereum 지갑의 챌린지 서명에서 STARK 키 쌍을 결정적으로 파생합니다.
//!
//! 1. 지갑이 고정 챌린지 텍스트에 서명 (유일한 비동기 단계)
//! 2. 서명의 s 성분을 BIP-32 마스터 시드로 사용
//! 3. `m/2645'/layer'/application'/eth1'/eth2'/index` 경로로 secp256k1 HD 파생
//! 4. 결과 키를 STARK 곡선 차수 n 범위로 그라인딩
//! 5. 공개키 = (개인키 · G)의 x 좌표
//!
//! 개인키는 저장하거나 캐시하지 않습니다. 서명할 때마다 다시 파생합니다.
//!
//! # 참조
//!
//! - [StarkEx Key Derivation](https://docs.starkware.co/starkex/crypto/key-derivation.html)
//! - [EIP-2645](https://eips.ethereum.org/EIPS/eip-2645)

use super::curve::{get_public_key, sign_digest, StarkSignature};
use super::field::{biguint_to_felt, felt_to_biguint, render_hex};
use crate::crypto::common::{Signature, WalletCapability};
use crate::crypto::evm::is_valid_address;
use crate::errors::{SignerError, SignerResult};
use bip32::{DerivationPath, XPrv};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use sha2::{Digest, Sha256};
use starknet_types_core::felt::Felt;
use tracing::{debug, trace, warn};

/// EIP-2645 purpose
pub const EIP2645_PURPOSE: u32 = 2645;

/// 기본 그라인딩 시도 한도
pub const DEFAULT_GRIND_ATTEMPTS: u32 = 100;

/// 기본 자식 인덱스 (경로 마지막, non-hardened)
pub const DEFAULT_ACCOUNT_INDEX: u32 = 1;

/// StarkEx 기본 레이어
pub const STARKEX_LAYER: &str = "starkex";

/// StarkEx 기본 애플리케이션
pub const STARKEX_APPLICATION: &str = "immutablex";

/// StarkEx 기본 챌린지 메시지
pub const STARKEX_CHALLENGE_MESSAGE: &str =
    "Only sign this request if you’ve initiated an action with Immutable X.";

/// STARK 곡선 차수 n (big-endian)
const STARK_CURVE_ORDER: [u8; 32] = [
    0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xb7, 0x81, 0x12, 0x6d, 0xca, 0xe7, 0xb2, 0x32,
    0x1e, 0x66, 0xa2, 0x41, 0xad, 0xc6, 0x4d, 0x2f,
];

const LOW_31_BITS: u64 = (1 << 31) - 1;

/// STARK 곡선 차수 n
pub fn stark_curve_order() -> BigUint {
    BigUint::from_bytes_be(&STARK_CURVE_ORDER)
}

/// 파생 컨텍스트
///
/// 배포마다 고정되는 값입니다. 챌린지 메시지와 파생 경로를 만듭니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationContext {
    layer: String,
    application: String,
    message: String,
    account_index: u32,
}

impl DerivationContext {
    /// 새 컨텍스트 생성 (자식 인덱스는 기본값 1)
    pub fn new(
        layer: impl Into<String>,
        application: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            layer: layer.into(),
            application: application.into(),
            message: message.into(),
            account_index: DEFAULT_ACCOUNT_INDEX,
        }
    }

    /// StarkEx 기본 컨텍스트
    pub fn starkex_default() -> Self {
        Self::new(STARKEX_LAYER, STARKEX_APPLICATION, STARKEX_CHALLENGE_MESSAGE)
    }

    /// 자식 인덱스 설정
    pub fn with_account_index(mut self, index: u32) -> Self {
        self.account_index = index;
        self
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    /// 지갑이 서명할 챌린지 텍스트
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn account_index(&self) -> u32 {
        self.account_index
    }
}

impl Default for DerivationContext {
    fn default() -> Self {
        Self::starkex_default()
    }
}

/// STARK 키 쌍
///
/// 개인키는 직렬화되지 않으며 Debug 출력에서도 가려집니다.
#[derive(Clone)]
pub struct StarkKeyPair {
    private_key: Felt,
    public_key: Felt,
}

impl StarkKeyPair {
    /// 개인키로 키 쌍 생성
    ///
    /// # Errors
    ///
    /// 0 < key < n 범위가 아니면 `InvalidPrivateKey`
    pub fn from_private_key(private_key: Felt) -> SignerResult<Self> {
        let value = felt_to_biguint(&private_key);
        if value.is_zero() || value >= stark_curve_order() {
            return Err(SignerError::InvalidPrivateKey {
                message: "STARK private key must be in (0, n)".into(),
            });
        }

        Ok(Self {
            private_key,
            public_key: get_public_key(&private_key),
        })
    }

    /// 공개키 (stark key, x 좌표)
    pub fn public_key(&self) -> Felt {
        self.public_key
    }

    /// 다이제스트 서명
    pub fn sign_digest(&self, digest: &Felt) -> SignerResult<StarkSignature> {
        sign_digest(&self.private_key, digest)
    }
}

impl std::fmt::Debug for StarkKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StarkKeyPair")
            .field("public_key", &render_hex(&self.public_key))
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// 바이트열의 하위 64비트
fn low_u64(bytes: &[u8]) -> u64 {
    let take = bytes.len().min(8);
    let mut buf = [0u8; 8];
    buf[8 - take..].copy_from_slice(&bytes[bytes.len() - take..]);
    u64::from_be_bytes(buf)
}

fn sha256_low_31(text: &str) -> u64 {
    low_u64(&Sha256::digest(text.as_bytes())) & LOW_31_BITS
}

/// EIP-2645 계정 경로 생성
///
/// `m/2645'/{layer}'/{application}'/{eth1}'/{eth2}'/{index}`
///
/// * `layer`, `application` - sha256 해시의 하위 31비트
/// * `eth1` - 주소의 하위 31비트, `eth2` - 그 다음 31비트
///
/// # Errors
///
/// 주소가 hex가 아니면 `MalformedField`
pub fn account_path(
    layer: &str,
    application: &str,
    eth_address: &str,
    index: u32,
) -> SignerResult<String> {
    let address_hex = eth_address.strip_prefix("0x").unwrap_or(eth_address);
    let address = hex::decode(address_hex)
        .map_err(|e| SignerError::malformed(eth_address, format!("invalid address hex: {e}")))?;

    let layer_int = sha256_low_31(layer);
    let application_int = sha256_low_31(application);
    let address_int = low_u64(&address);
    let eth1 = address_int & LOW_31_BITS;
    let eth2 = (address_int >> 31) & LOW_31_BITS;

    Ok(format!(
        "m/{EIP2645_PURPOSE}'/{layer_int}'/{application_int}'/{eth1}'/{eth2}'/{index}"
    ))
}

/// 시드와 경로로 secp256k1 HD 개인키 파생 (BIP-32)
pub fn private_key_from_path(seed: &[u8], path: &str) -> SignerResult<[u8; 32]> {
    let path: DerivationPath = path
        .parse()
        .map_err(|e| SignerError::unavailable(format!("Invalid derivation path: {e}")))?;

    let xprv = XPrv::derive_from_path(seed, &path)
        .map_err(|e| SignerError::unavailable(format!("HD key derivation failed: {e}")))?;

    let mut private_key = [0u8; 32];
    private_key.copy_from_slice(&xprv.private_key().to_bytes());
    Ok(private_key)
}

/// sha256(key || index) - index는 최소 1바이트 big-endian
pub fn hash_key_with_index(key: &[u8; 32], index: u32) -> [u8; 32] {
    let index_bytes = index.to_be_bytes();
    let skip = index_bytes.iter().take(3).take_while(|b| **b == 0).count();

    let mut hasher = Sha256::new();
    hasher.update(key);
    hasher.update(&index_bytes[skip..]);
    hasher.finalize().into()
}

/// 키 그라인딩
///
/// sha256(key || i)가 `2^256 - (2^256 mod n)` 미만일 때까지 반복하고 `mod n`을 취합니다.
/// 모듈러 편향 없이 (0, n) 범위에 균등 분포합니다. 0이 나오면 다음 인덱스로 계속합니다.
///
/// # Errors
///
/// `max_attempts` 안에 수렴하지 않으면 `DerivationExhausted`
pub fn grind_key(key_seed: &[u8; 32], max_attempts: u32) -> SignerResult<Felt> {
    let order = stark_curve_order();
    let two_256 = BigUint::one() << 256u32;
    let max_allowed = &two_256 - (&two_256 % &order);

    for index in 0..max_attempts {
        let candidate = BigUint::from_bytes_be(&hash_key_with_index(key_seed, index));
        if candidate >= max_allowed {
            continue;
        }

        let key = candidate % &order;
        if key.is_zero() {
            continue;
        }

        trace!(attempts = index + 1, "key grinding converged");
        return Ok(biguint_to_felt(&key));
    }

    warn!(max_attempts, "key grinding did not converge");
    Err(SignerError::DerivationExhausted {
        attempts: max_attempts,
    })
}

/// 챌린지 서명에서 키 쌍 파생 (순수 함수 단계)
///
/// # Arguments
///
/// * `signature` - 지갑 챌린지 서명 (r || s || v)
/// * `eth_address` - 서명한 지갑 주소
/// * `context` - 파생 컨텍스트
/// * `max_grind_attempts` - 그라인딩 시도 한도
pub fn key_pair_from_signature(
    signature: &[u8],
    eth_address: &str,
    context: &DerivationContext,
    max_grind_attempts: u32,
) -> SignerResult<StarkKeyPair> {
    let signature = Signature::from_slice(signature)
        .map_err(|e| SignerError::unavailable(format!("unusable challenge signature: {e}")))?;

    let path = account_path(
        context.layer(),
        context.application(),
        eth_address,
        context.account_index(),
    )?;
    trace!(%path, "derived account path");

    let hd_key = private_key_from_path(&signature.s, &path)?;
    let private_key = grind_key(&hd_key, max_grind_attempts)?;

    StarkKeyPair::from_private_key(private_key)
}

/// 지갑에서 STARK 키 쌍 파생
///
/// 지갑 주소를 확인하고 챌린지 서명을 요청한 뒤 [`key_pair_from_signature`]를 적용합니다.
///
/// # Errors
///
/// 지갑이 거부/취소하거나 잘못된 주소나 서명을 돌려주면 `DerivationUnavailable`,
/// 그라인딩이 수렴하지 않으면 `DerivationExhausted`
pub async fn derive_key_pair<W: WalletCapability + ?Sized>(
    wallet: &W,
    context: &DerivationContext,
    max_grind_attempts: u32,
) -> SignerResult<StarkKeyPair> {
    let address = wallet
        .address()
        .await
        .map_err(|e| SignerError::unavailable(format!("wallet address unavailable: {e}")))?;

    if !is_valid_address(&address) {
        return Err(SignerError::unavailable(format!(
            "wallet reported an invalid address: {address}"
        )));
    }

    debug!(
        %address,
        layer = context.layer(),
        application = context.application(),
        "requesting STARK key challenge signature"
    );

    let signature = wallet
        .sign_challenge(context.message())
        .await
        .map_err(|e| SignerError::unavailable(format!("challenge signature refused: {e}")))?;

    key_pair_from_signature(&signature, &address, context, max_grind_attempts)
}
