//! STARK Field Codec
//!
//! 필드 요소(Felt)와 10진수/16진수 텍스트 사이의 변환을 제공합니다.
//!
//! 경계 규칙: 코어 밖으로 나가는 모든 필드 요소는 10진수 문자열로 표현합니다.
//! 컨트랙트 주소처럼 명시적으로 hex인 필드만 `0x` 소문자 hex를 사용합니다.

use crate::crypto::evm::keccak256;
use crate::errors::{SignerError, SignerResult};
use num_bigint::BigUint;
use num_traits::One;
use serde::Serializer;
use starknet_types_core::felt::Felt;

/// STARK 소수체의 원소
pub type FieldElement = Felt;

/// STARK 필드 소수 p = 2^251 + 17 * 2^192 + 1
pub fn field_prime() -> BigUint {
    (BigUint::one() << 251u32) + (BigUint::from(17u32) << 192u32) + BigUint::one()
}

/// Felt를 BigUint로 변환
pub fn felt_to_biguint(felt: &Felt) -> BigUint {
    BigUint::from_bytes_be(&felt.to_bytes_be())
}

/// BigUint를 p로 축소하여 Felt로 변환
pub fn biguint_to_felt(value: &BigUint) -> Felt {
    let reduced = value % field_prime();
    let bytes = reduced.to_bytes_be();

    let mut padded = [0u8; 32];
    padded[32 - bytes.len()..].copy_from_slice(&bytes);
    Felt::from_bytes_be(&padded)
}

/// 10진수 또는 0x 접두사 16진수 텍스트를 필드 요소로 파싱
///
/// 공백 제거나 부호는 허용하지 않습니다. `0x`/`0X` 뒤의 16진수는 대소문자를 섞어도 됩니다.
///
/// # Errors
///
/// 유효한 숫자가 아니거나 값이 p 이상이면 `MalformedField`
pub fn parse_field(text: &str) -> SignerResult<FieldElement> {
    let (digits, radix) = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (text, 10),
    };

    if digits.is_empty() {
        return Err(SignerError::malformed(text, "empty numeral"));
    }

    if let Some(bad) = digits.chars().find(|c| !c.is_digit(radix)) {
        return Err(SignerError::malformed(
            text,
            format!("invalid base-{radix} digit {bad:?}"),
        ));
    }

    let value = BigUint::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| SignerError::malformed(text, "unparseable numeral"))?;

    if value >= field_prime() {
        return Err(SignerError::malformed(text, "value exceeds the STARK field prime"));
    }

    Ok(biguint_to_felt(&value))
}

/// 자유 형식 문자열을 필드 요소로 정규화 (이름, URI 등)
///
/// keccak256(문자열 UTF-8 바이트)를 big-endian 정수로 해석한 뒤 p로 축소합니다.
/// 입력 문자열은 그대로 해시됩니다 (trim, 정규화 없음).
pub fn hash_to_field(text: &str) -> FieldElement {
    biguint_to_felt(&BigUint::from_bytes_be(&keccak256(text.as_bytes())))
}

/// u64를 필드 요소로 변환
pub fn field_from_u64(value: u64) -> FieldElement {
    Felt::from(value)
}

/// 10진수 문자열 (경계 표준 형식)
pub fn render_decimal(felt: &FieldElement) -> String {
    felt_to_biguint(felt).to_str_radix(10)
}

/// 0x 접두사 소문자 16진수 문자열 (선행 0 없음, 0은 "0x0")
pub fn render_hex(felt: &FieldElement) -> String {
    format!("0x{}", felt_to_biguint(felt).to_str_radix(16))
}

/// serde `serialize_with`: 필드 요소를 10진수 문자열로 직렬화
pub fn serialize_decimal<S: Serializer>(felt: &FieldElement, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&render_decimal(felt))
}

/// serde `serialize_with`: Option 필드 요소를 10진수 문자열로 직렬화
pub fn serialize_optional_decimal<S: Serializer>(
    felt: &Option<FieldElement>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match felt {
        Some(felt) => serializer.serialize_some(&render_decimal(felt)),
        None => serializer.serialize_none(),
    }
}
