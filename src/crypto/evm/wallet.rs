//! EVM Wallet
//!
//! 로컬 secp256k1 개인키 기반 [`WalletCapability`] 구현입니다.
//! 브라우저 지갑 없이 STARK 키를 파생하거나 테스트할 때 사용합니다.

use super::keccak::personal_sign_hash;
use super::secp256k1::{parse_private_key, private_key_to_address, sign_hash, signing_key_from_bytes};
use crate::crypto::common::{Signature, WalletCapability};
use crate::errors::SignerResult;
use async_trait::async_trait;
use k256::ecdsa::SigningKey;

/// EVM 지갑
///
/// # Example
///
/// ```rust,ignore
/// use starkex_signer::crypto::evm::EvmWallet;
///
/// let wallet = EvmWallet::from_private_key("0x...")?;
/// println!("Address: {}", wallet.checksum_address());
/// ```
pub struct EvmWallet {
    /// 서명 키
    signing_key: SigningKey,
    /// 체크섬 형식의 주소
    address: String,
}

impl EvmWallet {
    /// Hex 개인키에서 지갑 생성 (0x 접두사 선택)
    pub fn from_private_key(private_key: &str) -> SignerResult<Self> {
        let key_bytes = parse_private_key(private_key)?;
        Self::from_bytes(&key_bytes)
    }

    /// 바이트 배열에서 지갑 생성
    pub fn from_bytes(private_key: &[u8; 32]) -> SignerResult<Self> {
        let signing_key = signing_key_from_bytes(private_key)?;
        let address = private_key_to_address(private_key)?;

        Ok(Self {
            signing_key,
            address,
        })
    }

    /// 체크섬 형식의 주소
    pub fn checksum_address(&self) -> &str {
        &self.address
    }

    /// personal_sign 스타일 메시지 서명 (동기)
    pub fn sign_message_sync(&self, message: &[u8]) -> SignerResult<Signature> {
        sign_hash(&self.signing_key, &personal_sign_hash(message))
    }
}

#[async_trait]
impl WalletCapability for EvmWallet {
    async fn sign_challenge(&self, challenge: &str) -> SignerResult<Vec<u8>> {
        let signature = self.sign_message_sync(challenge.as_bytes())?;
        Ok(signature.to_bytes().to_vec())
    }

    async fn address(&self) -> SignerResult<String> {
        Ok(self.address.clone())
    }
}

impl std::fmt::Debug for EvmWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmWallet")
            .field("address", &self.address)
            .finish()
    }
}
