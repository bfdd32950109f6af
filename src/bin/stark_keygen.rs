//! stark-keygen
//!
//! 로컬 이더리움 개인키에서 STARK 키를 파생해 JSON으로 출력합니다.
//!
//! ```text
//! ETH_PRIVATE_KEY=0x... STARK_APPLICATION=immutablex stark-keygen
//! ```
//!
//! 파생 설정은 `STARK_*` 환경 변수로 바꿀 수 있습니다. 로그 레벨은 `RUST_LOG`.

use starkex_signer::crypto::evm::EvmWallet;
use starkex_signer::crypto::stark::{account_path, render_decimal, render_hex, StarkSigner, WalletSigner};
use starkex_signer::utils::{now_secs, time::secs_to_rfc3339};
use starkex_signer::SignerConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const ENV_ETH_PRIVATE_KEY: &str = "ETH_PRIVATE_KEY";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();

    let private_key = std::env::var(ENV_ETH_PRIVATE_KEY)
        .map_err(|_| format!("{ENV_ETH_PRIVATE_KEY} is not set"))?;
    let config = SignerConfig::from_env()?;

    let wallet = EvmWallet::from_private_key(&private_key)?;
    let address = wallet.checksum_address().to_string();
    let context = config.context().clone();
    let path = account_path(
        context.layer(),
        context.application(),
        &address,
        context.account_index(),
    )?;

    info!(%address, %path, "deriving STARK key");

    let signer = WalletSigner::new(wallet, context).with_grind_attempts(config.grind_attempts());
    let stark_key = signer.public_key().await?;

    let output = serde_json::json!({
        "address": address,
        "path": path,
        "stark_key": render_hex(&stark_key),
        "stark_key_decimal": render_decimal(&stark_key),
        "derived_at": secs_to_rfc3339(now_secs()),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
