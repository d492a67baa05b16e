//! Domain factories for creating domain entities and value objects.

use rand::Rng;

use super::{
    RoomId,
    error::ValueObjectError,
    value_object::{ROOM_ID_ALPHABET, ROOM_ID_LENGTH},
};

/// Factory for generating RoomId instances.
///
/// Ids are generated client-side without a uniqueness check; with 36^6
/// possible ids, collisions are left to the store to report.
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Generate a new random RoomId.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<RoomId, ValueObjectError> {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Generate a RoomId from the given random source.
    pub fn generate_with<R: Rng>(rng: &mut R) -> Result<RoomId, ValueObjectError> {
        let id: String = (0..ROOM_ID_LENGTH)
            .map(|_| ROOM_ID_ALPHABET[rng.gen_range(0..ROOM_ID_ALPHABET.len())] as char)
            .collect();
        RoomId::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_room_id_factory_generate() {
        // テスト項目: RoomIdFactory::generate() で 6 文字の RoomId を生成できる
        // when (操作):
        let result = RoomIdFactory::generate();

        // then (期待する結果):
        assert!(result.is_ok());
        let room_id = result.unwrap();
        assert_eq!(room_id.as_str().len(), 6);
        assert!(
            room_id
                .as_str()
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        );
    }

    #[test]
    fn test_room_id_factory_is_deterministic_for_seed() {
        // テスト項目: 同じシードからは同じ RoomId が生成される
        // given (前提条件):
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        // when (操作):
        let id1 = RoomIdFactory::generate_with(&mut rng1).unwrap();
        let id2 = RoomIdFactory::generate_with(&mut rng2).unwrap();

        // then (期待する結果):
        assert_eq!(id1, id2);
    }
}
