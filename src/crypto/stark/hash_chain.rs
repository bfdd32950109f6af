//! STARK Hash Chain
//!
//! 순서가 있는 필드 요소 목록을 Pedersen 해시로 접어 하나의 다이제스트를 만듭니다.
//!
//! 오른쪽 접기(right fold)입니다. 시드 0에서 시작해 마지막 원소부터 첫 원소까지
//! `acc = H(element, acc)`를 적용합니다. 첫 원소가 가장 바깥쪽 해시가 됩니다.
//!
//! ```text
//! fold([a, b, c]) = H(a, H(b, H(c, 0)))
//! fold([])        = 0
//! ```

use starknet_crypto::pedersen_hash as stark_pedersen_hash;
use starknet_types_core::felt::Felt;

/// STARK Pedersen 해시 (2개 입력, 비가환)
pub fn pedersen_hash(x: &Felt, y: &Felt) -> Felt {
    stark_pedersen_hash(x, y)
}

/// Pedersen 해시 체인으로 메시지 벡터를 다이제스트로 접기
pub fn fold(elements: &[Felt]) -> Felt {
    fold_with(elements, pedersen_hash)
}

/// 임의의 2입력 해시로 오른쪽 접기
///
/// # Arguments
///
/// * `elements` - 순서가 있는 필드 요소들
/// * `hash` - `H(element, acc)` 형태로 호출되는 해시 함수
pub fn fold_with<H>(elements: &[Felt], hash: H) -> Felt
where
    H: Fn(&Felt, &Felt) -> Felt,
{
    elements
        .iter()
        .rev()
        .fold(Felt::ZERO, |acc, element| hash(element, &acc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::stark::field::parse_field;

    #[test]
    fn test_empty_fold_is_seed() {
        assert_eq!(fold(&[]), Felt::ZERO);
    }

    #[test]
    fn test_single_element() {
        let a = Felt::from(7u64);
        assert_eq!(fold(&[a]), pedersen_hash(&a, &Felt::ZERO));
    }

    #[test]
    fn test_pedersen_known_vector() {
        // StarkWare crypto 참조 구현의 테스트 벡터
        let x = parse_field("0x03d937c035c878245caf64531a5756109c53068da139362728feb561405371cb").unwrap();
        let y = parse_field("0x0208a0a10250e382e1e4bbe2880906c2791bf6275695e02fbbc6aeff9cd8b31a").unwrap();
        let expected =
            parse_field("0x030e480bed5fe53fa909cc0f8c4d99b8f9f2c016be4c41e13a4848797979c662").unwrap();

        assert_eq!(pedersen_hash(&x, &y), expected);
    }

    #[test]
    fn test_fold_golden_digest() {
        let elements = [Felt::from(1u64), Felt::from(2u64), Felt::from(3u64)];
        let expected =
            parse_field("0x3c8d406feb4ea28af3f2fb33a81ecdb97ecd61eddc6dbcdb0acf79587de2cd7").unwrap();

        assert_eq!(fold(&elements), expected);
    }

    #[test]
    fn test_pedersen_is_not_commutative() {
        let a = Felt::from(1u64);
        let b = Felt::from(2u64);
        assert_ne!(pedersen_hash(&a, &b), pedersen_hash(&b, &a));
    }

    #[test]
    fn test_fold_with_records_right_to_left_order() {
        // 해시 대신 호출 순서를 기록해 접기 방향을 확인
        let calls = std::cell::RefCell::new(Vec::new());
        let elements = [Felt::from(1u64), Felt::from(2u64), Felt::from(3u64)];

        let result = fold_with(&elements, |x, acc| {
            calls.borrow_mut().push((*x, *acc));
            *x + *acc * Felt::from(10u64)
        });

        let calls = calls.into_inner();
        assert_eq!(calls[0], (Felt::from(3u64), Felt::ZERO));
        assert_eq!(calls[1], (Felt::from(2u64), Felt::from(3u64)));
        assert_eq!(calls[2], (Felt::from(1u64), Felt::from(32u64)));
        assert_eq!(result, Felt::from(321u64));
    }
}
