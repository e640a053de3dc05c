//! ID generation.

use ulid::Ulid;

/// Generate a new entity ID.
///
/// ULIDs are lexicographically sortable, monotonically increasing within
/// the same millisecond, and shorter than UUIDs as strings. Lowercased to
/// match the rest of the string keys.
#[must_use]
pub fn generate_id() -> String {
    Ulid::new().to_string().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id() {
        let id1 = generate_id();
        let id2 = generate_id();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
        assert_eq!(id1, id1.to_lowercase());
    }
}
