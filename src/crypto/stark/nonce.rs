//! Nonce Providers
//!
//! 서명 요청에 바인딩되는 재전송 방지 nonce를 발급합니다.
//!
//! - [`ClockNonce`] (기본): 현재 시각의 초 단위 값. 같은 초 안의 두 호출은 같은 값을 반환합니다.
//! - [`CounterNonce`]: 원자적 증가 카운터
//! - [`MonotonicClockNonce`]: 시각 기반이지만 이전 값보다 항상 큰 값 (선택적 강화 정책)

use super::field::FieldElement;
use crate::utils::time::now_secs;
use starknet_types_core::felt::Felt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;

/// 초 단위 Unix 시각을 반환하는 시계
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

fn system_clock() -> Clock {
    Arc::new(now_secs)
}

/// 시계 값 (초). 음수이면 `None`
fn clock_secs(clock: &Clock) -> Option<u64> {
    let reading = clock();
    match u64::try_from(reading) {
        Ok(secs) => Some(secs),
        Err(_) => {
            warn!(reading, "clock returned a negative timestamp");
            None
        },
    }
}

/// nonce 발급 정책
pub trait NonceProvider: Send + Sync {
    /// 다음 nonce
    fn next(&self) -> FieldElement;
}

impl<T: NonceProvider + ?Sized> NonceProvider for Box<T> {
    fn next(&self) -> FieldElement {
        (**self).next()
    }
}

impl<T: NonceProvider + ?Sized> NonceProvider for Arc<T> {
    fn next(&self) -> FieldElement {
        (**self).next()
    }
}

/// 시각 기반 nonce (초 단위)
///
/// 1초 안에 여러 번 호출하면 같은 값이 나올 수 있습니다.
/// 반복되면 안 되는 경우 [`MonotonicClockNonce`] 또는 [`CounterNonce`]를 사용하세요.
///
/// 시계가 음수를 반환하면 마지막으로 발급한 값을 다시 반환합니다.
pub struct ClockNonce {
    clock: Clock,
    last: AtomicU64,
}

impl ClockNonce {
    /// 시스템 시계 사용
    pub fn new() -> Self {
        Self {
            clock: system_clock(),
            last: AtomicU64::new(0),
        }
    }

    /// 시계 주입 (테스트용)
    pub fn with_clock(clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
            last: AtomicU64::new(0),
        }
    }
}

impl Default for ClockNonce {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceProvider for ClockNonce {
    fn next(&self) -> FieldElement {
        let secs = match clock_secs(&self.clock) {
            Some(now) => {
                self.last.store(now, Ordering::Release);
                now
            },
            None => self.last.load(Ordering::Acquire),
        };
        Felt::from(secs)
    }
}

impl std::fmt::Debug for ClockNonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockNonce")
            .field("last", &self.last.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// 증가 카운터 nonce
#[derive(Debug)]
pub struct CounterNonce {
    next: AtomicU64,
}

impl CounterNonce {
    /// 시작 값 지정
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// 다음에 발급될 값 (발급하지 않음)
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Acquire)
    }
}

impl NonceProvider for CounterNonce {
    fn next(&self) -> FieldElement {
        Felt::from(self.next.fetch_add(1, Ordering::AcqRel))
    }
}

/// 단조 증가 시각 nonce
///
/// `max(현재 시각, 이전 값 + 1)`을 반환합니다. 같은 초 안의 호출도 서로 다른 값을 받습니다.
/// 시계가 음수를 반환하면 `이전 값 + 1`을 사용합니다.
pub struct MonotonicClockNonce {
    clock: Clock,
    floor: AtomicU64,
}

impl MonotonicClockNonce {
    /// 시스템 시계 사용
    pub fn new() -> Self {
        Self {
            clock: system_clock(),
            floor: AtomicU64::new(0),
        }
    }

    /// 시계 주입 (테스트용)
    pub fn with_clock(clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
            floor: AtomicU64::new(0),
        }
    }
}

impl Default for MonotonicClockNonce {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceProvider for MonotonicClockNonce {
    fn next(&self) -> FieldElement {
        let now = clock_secs(&self.clock).unwrap_or(0);
        let mut floor = self.floor.load(Ordering::Acquire);

        loop {
            let candidate = now.max(floor);
            match self.floor.compare_exchange_weak(
                floor,
                candidate.saturating_add(1),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Felt::from(candidate),
                Err(actual) => floor = actual,
            }
        }
    }
}

impl std::fmt::Debug for MonotonicClockNonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonotonicClockNonce")
            .field("floor", &self.floor.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
