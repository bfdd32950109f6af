//! Time utilities

use chrono::{DateTime, Utc};

/// 현재 UTC 타임스탬프 (초)
///
/// 시각 기반 nonce의 기본 시계입니다.
pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}

/// 초 단위 타임스탬프를 RFC 3339 문자열로 변환 (로그 표기용)
pub fn secs_to_rfc3339(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_secs_is_recent() {
        // 2023-11-14 이후
        assert!(now_secs() > 1_700_000_000);
    }

    #[test]
    fn test_secs_to_rfc3339() {
        assert_eq!(secs_to_rfc3339(0), "1970-01-01T00:00:00+00:00");
    }
}
