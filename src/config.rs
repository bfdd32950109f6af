//! Signer configuration
//!
//! 파생 컨텍스트, 그라인딩 한도, nonce 정책을 설정합니다.

use crate::crypto::stark::{
    ClockNonce, CounterNonce, DerivationContext, MonotonicClockNonce, NonceProvider,
    DEFAULT_ACCOUNT_INDEX, DEFAULT_GRIND_ATTEMPTS, STARKEX_APPLICATION, STARKEX_CHALLENGE_MESSAGE,
    STARKEX_LAYER,
};
use crate::errors::{SignerError, SignerResult};
use std::str::FromStr;

/// 환경 변수 키
pub const ENV_LAYER: &str = "STARK_LAYER";
pub const ENV_APPLICATION: &str = "STARK_APPLICATION";
pub const ENV_CHALLENGE: &str = "STARK_CHALLENGE";
pub const ENV_ACCOUNT_INDEX: &str = "STARK_ACCOUNT_INDEX";
pub const ENV_GRIND_ATTEMPTS: &str = "STARK_GRIND_ATTEMPTS";
pub const ENV_NONCE_POLICY: &str = "STARK_NONCE_POLICY";

/// nonce 발급 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoncePolicy {
    /// 초 단위 시각 (같은 초 안에서는 반복됨)
    #[default]
    Clock,
    /// 시작 값에서 1씩 증가
    Counter { start: u64 },
    /// 시각 기반, 이전 값보다 항상 큼
    MonotonicClock,
}

impl NoncePolicy {
    /// 정책에 맞는 nonce 발급기 생성
    pub fn build(&self) -> Box<dyn NonceProvider> {
        match self {
            NoncePolicy::Clock => Box::new(ClockNonce::new()),
            NoncePolicy::Counter { start } => Box::new(CounterNonce::starting_at(*start)),
            NoncePolicy::MonotonicClock => Box::new(MonotonicClockNonce::new()),
        }
    }
}

impl FromStr for NoncePolicy {
    type Err = SignerError;

    /// `clock`, `monotonic`, `counter`, `counter:<start>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: String| SignerError::InvalidConfig {
            key: ENV_NONCE_POLICY.into(),
            message,
        };

        match s.trim().to_lowercase().as_str() {
            "clock" => Ok(NoncePolicy::Clock),
            "monotonic" | "monotonic-clock" => Ok(NoncePolicy::MonotonicClock),
            "counter" => Ok(NoncePolicy::Counter { start: 0 }),
            other => match other.strip_prefix("counter:") {
                Some(start) => start
                    .parse()
                    .map(|start| NoncePolicy::Counter { start })
                    .map_err(|e| invalid(format!("invalid counter start {start:?}: {e}"))),
                None => Err(invalid(format!("unknown nonce policy {other:?}"))),
            },
        }
    }
}

/// 서명자 설정
#[derive(Debug, Clone)]
pub struct SignerConfig {
    context: DerivationContext,
    grind_attempts: u32,
    nonce_policy: NoncePolicy,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            context: DerivationContext::starkex_default(),
            grind_attempts: DEFAULT_GRIND_ATTEMPTS,
            nonce_policy: NoncePolicy::default(),
        }
    }
}

impl SignerConfig {
    /// 새 설정 생성 (StarkEx 기본 컨텍스트)
    pub fn new() -> Self {
        Self::default()
    }

    /// 파생 컨텍스트 설정
    pub fn with_context(mut self, context: DerivationContext) -> Self {
        self.context = context;
        self
    }

    /// 그라인딩 시도 한도 설정
    pub fn with_grind_attempts(mut self, attempts: u32) -> Self {
        self.grind_attempts = attempts;
        self
    }

    /// nonce 정책 설정
    pub fn with_nonce_policy(mut self, policy: NoncePolicy) -> Self {
        self.nonce_policy = policy;
        self
    }

    // === Getters ===

    pub fn context(&self) -> &DerivationContext {
        &self.context
    }

    pub fn grind_attempts(&self) -> u32 {
        self.grind_attempts
    }

    pub fn nonce_policy(&self) -> NoncePolicy {
        self.nonce_policy
    }

    /// 프로세스 환경 변수에서 설정 로드
    ///
    /// 설정되지 않은 키는 기본값을 사용합니다.
    pub fn from_env() -> SignerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 키 조회 함수에서 설정 로드
    ///
    /// # Errors
    ///
    /// 숫자 값이 잘못되었거나 그라인딩 한도가 0이면 `InvalidConfig`
    pub fn from_lookup<F>(lookup: F) -> SignerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let layer = lookup(ENV_LAYER).unwrap_or_else(|| STARKEX_LAYER.to_string());
        let application = lookup(ENV_APPLICATION).unwrap_or_else(|| STARKEX_APPLICATION.to_string());
        let message = lookup(ENV_CHALLENGE).unwrap_or_else(|| STARKEX_CHALLENGE_MESSAGE.to_string());
        let account_index = match lookup(ENV_ACCOUNT_INDEX) {
            Some(value) => parse_number(ENV_ACCOUNT_INDEX, &value)?,
            None => DEFAULT_ACCOUNT_INDEX,
        };

        let grind_attempts = match lookup(ENV_GRIND_ATTEMPTS) {
            Some(value) => parse_number(ENV_GRIND_ATTEMPTS, &value)?,
            None => DEFAULT_GRIND_ATTEMPTS,
        };
        if grind_attempts == 0 {
            return Err(SignerError::InvalidConfig {
                key: ENV_GRIND_ATTEMPTS.into(),
                message: "must be at least 1".into(),
            });
        }

        let nonce_policy = match lookup(ENV_NONCE_POLICY) {
            Some(value) => value.parse()?,
            None => NoncePolicy::default(),
        };

        let context = DerivationContext::new(layer, application, message).with_account_index(account_index);

        Ok(Self {
            context,
            grind_attempts,
            nonce_policy,
        })
    }
}

fn parse_number(key: &str, value: &str) -> SignerResult<u32> {
    value.trim().parse().map_err(|e| SignerError::InvalidConfig {
        key: key.into(),
        message: format!("invalid number {value:?}: {e}"),
    })
}
