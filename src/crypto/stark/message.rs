//! Message Vector
//!
//! 서명할 요청 내용을 순서 있는 필드 요소 목록으로 구성합니다.
//! 순서가 의미를 가지므로 같은 값이라도 순서가 다르면 다른 다이제스트가 됩니다.

use super::field::{field_from_u64, hash_to_field, parse_field, FieldElement};
use super::hash_chain::fold;
use crate::errors::SignerResult;

/// 순서 있는 필드 요소 목록
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageVector {
    elements: Vec<FieldElement>,
}

impl MessageVector {
    /// 빈 벡터 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드 요소 추가
    pub fn with_field(mut self, element: FieldElement) -> Self {
        self.elements.push(element);
        self
    }

    /// 10진수 / 0x 16진수 텍스트를 파싱하여 추가
    pub fn with_numeral(mut self, text: &str) -> SignerResult<Self> {
        self.elements.push(parse_field(text)?);
        Ok(self)
    }

    /// 자유 형식 문자열을 해시하여 추가 (이름, URI 등)
    pub fn with_text(mut self, text: &str) -> Self {
        self.elements.push(hash_to_field(text));
        self
    }

    /// u64 값 추가
    pub fn with_u64(mut self, value: u64) -> Self {
        self.elements.push(field_from_u64(value));
        self
    }

    /// 끝에 필드 요소 추가 (nonce 바인딩 등)
    pub fn push(&mut self, element: FieldElement) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[FieldElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// 해시 체인 다이제스트
    pub fn digest(&self) -> FieldElement {
        fold(&self.elements)
    }

    pub fn into_inner(self) -> Vec<FieldElement> {
        self.elements
    }
}

impl From<Vec<FieldElement>> for MessageVector {
    fn from(elements: Vec<FieldElement>) -> Self {
        Self { elements }
    }
}

impl FromIterator<FieldElement> for MessageVector {
    fn from_iter<I: IntoIterator<Item = FieldElement>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl AsRef<[FieldElement]> for MessageVector {
    fn as_ref(&self) -> &[FieldElement] {
        &self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starknet_types_core::felt::Felt;

    #[test]
    fn test_builder_order() {
        let vector = MessageVector::new()
            .with_u64(1)
            .with_numeral("0x2")
            .unwrap()
            .with_text("name");

        assert_eq!(vector.len(), 3);
        assert_eq!(vector.elements()[0], Felt::from(1u64));
        assert_eq!(vector.elements()[1], Felt::from(2u64));
        assert_eq!(vector.elements()[2], hash_to_field("name"));
    }

    #[test]
    fn test_with_numeral_propagates_malformed() {
        let err = MessageVector::new().with_numeral("12a").unwrap_err();
        assert_eq!(err.code(), "MALFORMED_FIELD");
    }

    #[test]
    fn test_digest_matches_fold() {
        let vector: MessageVector = (1u64..=4).map(Felt::from).collect();
        assert_eq!(vector.digest(), fold(vector.elements()));
        assert_eq!(MessageVector::new().digest(), Felt::ZERO);
    }

    #[test]
    fn test_push_appends_last() {
        let mut vector = MessageVector::from(vec![Felt::from(5u64)]);
        vector.push(Felt::from(9u64));
        assert_eq!(vector.into_inner(), vec![Felt::from(5u64), Felt::from(9u64)]);
    }
}
