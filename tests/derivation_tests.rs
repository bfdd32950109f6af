//! Integration tests for STARK key derivation
//!
//! Tests for wallet-driven derivation, determinism, error mapping and grinding range

use async_trait::async_trait;
use num_traits::Zero;
use sha2::{Digest, Sha256};
use starkex_signer::crypto::common::WalletCapability;
use starkex_signer::crypto::evm::EvmWallet;
use starkex_signer::crypto::stark::{
    account_path, derive_key_pair, felt_to_biguint, grind_key, key_pair_from_signature,
    parse_field, private_key_from_path, render_decimal, render_hex, stark_curve_order,
    DerivationContext, StarkSigner, WalletSigner, DEFAULT_GRIND_ATTEMPTS,
};
use starkex_signer::{SignerError, SignerResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const TEST_PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

const SCENARIO_PATH: &str = "m/2645'/579218131'/821037576'/2142839398'/82113439'/1";
const SCENARIO_HD_KEY: &str = "9bfd043648427cb85520b6214251326b7d23d55027e57aac4b85eb14b0c9da67";
const SCENARIO_PRIVATE_KEY: &str = "0x5795c599d1663e0e7d89a0bb0ba2b740a7252ea1cf7e422f7c5b78015a73ac1";
const SCENARIO_STARK_KEY: &str = "0x70df6b3b13c1f4ecf5714af5185e04a5b07368a9baf0670019d9dadd39a54ca";
const SCENARIO_STARK_KEY_DECIMAL: &str =
    "3190861626021756117025797624170111090291463747079100318475079073708568630474";

fn scenario_signature() -> Vec<u8> {
    let mut signature = vec![0xabu8; 64];
    signature.push(27);
    signature
}

fn scenario_context() -> DerivationContext {
    DerivationContext::new("starkex", "test", "Test")
}

// === Test Wallets ===

/// 고정 서명을 반환하고 호출된 챌린지를 기록하는 지갑
struct FixedWallet {
    address: String,
    signature: Vec<u8>,
    challenges: std::sync::Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl FixedWallet {
    fn new(address: &str, signature: Vec<u8>) -> Self {
        Self {
            address: address.to_string(),
            signature,
            challenges: std::sync::Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl WalletCapability for FixedWallet {
    async fn sign_challenge(&self, challenge: &str) -> SignerResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.challenges.lock().unwrap().push(challenge.to_string());
        Ok(self.signature.clone())
    }

    async fn address(&self) -> SignerResult<String> {
        Ok(self.address.clone())
    }
}

/// 사용자가 서명을 거부하는 지갑
struct RejectingWallet;

#[async_trait]
impl WalletCapability for RejectingWallet {
    async fn sign_challenge(&self, _challenge: &str) -> SignerResult<Vec<u8>> {
        Err(SignerError::InvalidSignature {
            message: "user rejected the request".into(),
        })
    }

    async fn address(&self) -> SignerResult<String> {
        Ok(TEST_ADDRESS.to_string())
    }
}

/// 서명 요청에 영원히 응답하지 않는 지갑
struct PendingWallet;

#[async_trait]
impl WalletCapability for PendingWallet {
    async fn sign_challenge(&self, _challenge: &str) -> SignerResult<Vec<u8>> {
        std::future::pending().await
    }

    async fn address(&self) -> SignerResult<String> {
        Ok(TEST_ADDRESS.to_string())
    }
}

// === Golden Vectors ===

#[test]
fn test_scenario_path_and_intermediate_keys() {
    let path = account_path("starkex", "test", TEST_ADDRESS, 1).unwrap();
    assert_eq!(path, SCENARIO_PATH);

    let signature = scenario_signature();
    let hd_key = private_key_from_path(&signature[32..64], &path).unwrap();
    assert_eq!(hex::encode(hd_key), SCENARIO_HD_KEY);

    let private_key = grind_key(&hd_key, DEFAULT_GRIND_ATTEMPTS).unwrap();
    assert_eq!(private_key, parse_field(SCENARIO_PRIVATE_KEY).unwrap());
}

#[test]
fn test_scenario_stark_key_from_signature() {
    let key_pair = key_pair_from_signature(
        &scenario_signature(),
        TEST_ADDRESS,
        &scenario_context(),
        DEFAULT_GRIND_ATTEMPTS,
    )
    .unwrap();

    assert_eq!(render_hex(&key_pair.public_key()), SCENARIO_STARK_KEY);
    assert_eq!(render_decimal(&key_pair.public_key()), SCENARIO_STARK_KEY_DECIMAL);
}

#[tokio::test]
async fn test_scenario_stark_key_through_wallet() {
    let wallet = FixedWallet::new(TEST_ADDRESS, scenario_signature());

    let key_pair = derive_key_pair(&wallet, &scenario_context(), DEFAULT_GRIND_ATTEMPTS)
        .await
        .unwrap();

    assert_eq!(render_hex(&key_pair.public_key()), SCENARIO_STARK_KEY);
    assert_eq!(*wallet.challenges.lock().unwrap(), vec!["Test".to_string()]);
}

#[tokio::test]
async fn test_lowercase_address_derives_same_key() {
    let wallet = FixedWallet::new(&TEST_ADDRESS.to_lowercase(), scenario_signature());

    let key_pair = derive_key_pair(&wallet, &scenario_context(), DEFAULT_GRIND_ATTEMPTS)
        .await
        .unwrap();
    assert_eq!(render_hex(&key_pair.public_key()), SCENARIO_STARK_KEY);
}

#[test]
fn test_compact_signature_derives_from_cleared_s() {
    // 0xab..ab 64바이트는 압축 형식: s 최상위 비트가 parity
    let compact = vec![0xabu8; 64];
    let mut full = compact.clone();
    full[32] = 0x2b;
    full.push(28);

    let from_compact =
        key_pair_from_signature(&compact, TEST_ADDRESS, &scenario_context(), DEFAULT_GRIND_ATTEMPTS)
            .unwrap();
    let from_full =
        key_pair_from_signature(&full, TEST_ADDRESS, &scenario_context(), DEFAULT_GRIND_ATTEMPTS)
            .unwrap();

    assert_eq!(from_compact.public_key(), from_full.public_key());
    assert_ne!(render_hex(&from_compact.public_key()), SCENARIO_STARK_KEY);
}

// === Determinism ===

#[tokio::test]
async fn test_derivation_is_deterministic() {
    let wallet = FixedWallet::new(TEST_ADDRESS, scenario_signature());
    let context = scenario_context();

    let first = derive_key_pair(&wallet, &context, DEFAULT_GRIND_ATTEMPTS).await.unwrap();
    let second = derive_key_pair(&wallet, &context, DEFAULT_GRIND_ATTEMPTS).await.unwrap();

    assert_eq!(first.public_key(), second.public_key());
    assert_eq!(wallet.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_evm_wallet_derivation_is_deterministic() {
    let context = DerivationContext::starkex_default();
    let first = WalletSigner::new(EvmWallet::from_private_key(TEST_PRIVATE_KEY).unwrap(), context.clone());
    let second = WalletSigner::new(EvmWallet::from_private_key(TEST_PRIVATE_KEY).unwrap(), context);

    let first_key = first.public_key().await.unwrap();
    assert_eq!(first_key, first.public_key().await.unwrap());
    assert_eq!(first_key, second.public_key().await.unwrap());
}

#[tokio::test]
async fn test_context_changes_key() {
    let wallet = FixedWallet::new(TEST_ADDRESS, scenario_signature());

    let base = derive_key_pair(&wallet, &scenario_context(), DEFAULT_GRIND_ATTEMPTS)
        .await
        .unwrap();
    let other_app = derive_key_pair(
        &wallet,
        &DerivationContext::new("starkex", "other", "Test"),
        DEFAULT_GRIND_ATTEMPTS,
    )
    .await
    .unwrap();
    let other_index = derive_key_pair(
        &wallet,
        &scenario_context().with_account_index(2),
        DEFAULT_GRIND_ATTEMPTS,
    )
    .await
    .unwrap();

    assert_ne!(base.public_key(), other_app.public_key());
    assert_ne!(base.public_key(), other_index.public_key());
}

#[tokio::test]
async fn test_wallet_signer_rederives_per_call() {
    let wallet = std::sync::Arc::new(FixedWallet::new(TEST_ADDRESS, scenario_signature()));
    let signer = WalletSigner::new(wallet.clone(), scenario_context());

    signer.public_key().await.unwrap();
    signer.public_key().await.unwrap();

    assert_eq!(wallet.calls.load(Ordering::SeqCst), 2);
}

// === Error Mapping ===

#[tokio::test]
async fn test_rejecting_wallet_is_unavailable() {
    let err = derive_key_pair(&RejectingWallet, &scenario_context(), DEFAULT_GRIND_ATTEMPTS)
        .await
        .unwrap_err();

    assert!(matches!(err, SignerError::DerivationUnavailable { .. }));
    assert!(err.is_retryable());
    assert!(err.to_string().contains("user rejected"));
}

#[tokio::test]
async fn test_invalid_address_is_unavailable() {
    let wallet = FixedWallet::new("not-an-address", scenario_signature());
    let err = derive_key_pair(&wallet, &scenario_context(), DEFAULT_GRIND_ATTEMPTS)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "DERIVATION_UNAVAILABLE");
    assert_eq!(wallet.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_signature_is_unavailable() {
    let wallet = FixedWallet::new(TEST_ADDRESS, vec![0u8; 12]);
    let err = derive_key_pair(&wallet, &scenario_context(), DEFAULT_GRIND_ATTEMPTS)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "DERIVATION_UNAVAILABLE");
}

#[tokio::test]
async fn test_zero_grind_bound_is_exhausted() {
    let wallet = FixedWallet::new(TEST_ADDRESS, scenario_signature());
    let err = derive_key_pair(&wallet, &scenario_context(), 0).await.unwrap_err();

    assert_eq!(err, SignerError::DerivationExhausted { attempts: 0 });
    assert!(err.is_fatal());
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_pending_wallet_can_be_cancelled_by_caller() {
    let result = tokio::time::timeout(
        Duration::from_millis(50),
        derive_key_pair(&PendingWallet, &scenario_context(), DEFAULT_GRIND_ATTEMPTS),
    )
    .await;

    assert!(result.is_err());
}

// === Grinding Range ===

#[test]
fn test_grinding_range_over_many_seeds() {
    let order = stark_curve_order();
    let mut seed: [u8; 32] = Sha256::digest(b"grinding range").into();

    for _ in 0..10_000 {
        let key = grind_key(&seed, DEFAULT_GRIND_ATTEMPTS).unwrap();
        let value = felt_to_biguint(&key);

        assert!(!value.is_zero());
        assert!(value < order);

        seed = Sha256::digest(seed).into();
    }
}
