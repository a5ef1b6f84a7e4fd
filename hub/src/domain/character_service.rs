//! Read-only queries over the character guide.

use tracing::debug;

use super::character::{Character, CharacterStatus, main_characters};

/// The character guide.
#[derive(Debug, Clone)]
pub struct CharacterService {
    characters: Vec<Character>,
}

impl Default for CharacterService {
    fn default() -> Self {
        Self::new(main_characters())
    }
}

impl CharacterService {
    /// Serve `characters`, kept in id order.
    #[must_use]
    pub fn new(mut characters: Vec<Character>) -> Self {
        characters.sort_by_key(|character| character.id);
        debug!(count = characters.len(), "character guide loaded");
        Self { characters }
    }

    /// Every character.
    #[must_use]
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Look up one character.
    #[must_use]
    pub fn character(&self, id: u64) -> Option<&Character> {
        self.characters.iter().find(|character| character.id == id)
    }

    /// Characters with the given status.
    #[must_use]
    pub fn with_status(&self, status: CharacterStatus) -> Vec<&Character> {
        self.characters
            .iter()
            .filter(|character| character.status == status)
            .collect()
    }

    /// Characters whose name or description contains `term`, ignoring case.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Character> {
        self.characters
            .iter()
            .filter(|character| character.matches(term))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn guide() -> CharacterService {
        CharacterService::default()
    }

    fn ids(characters: &[&Character]) -> Vec<u64> {
        characters.iter().map(|character| character.id).collect()
    }

    #[rstest]
    fn lookup_by_id(guide: CharacterService) {
        assert_eq!(guide.characters().len(), 6);
        assert_eq!(
            guide.character(4).map(|c| c.name.as_str()),
            Some("Dina Woodward")
        );
        assert!(guide.character(0).is_none());
        assert!(guide.character(7).is_none());
    }

    #[rstest]
    #[case::alive(CharacterStatus::Alive, &[1, 2, 4, 5, 6])]
    #[case::dead(CharacterStatus::Dead, &[3])]
    #[case::unknown(CharacterStatus::Unknown, &[])]
    fn status_filter(
        guide: CharacterService,
        #[case] status: CharacterStatus,
        #[case] expected: &[u64],
    ) {
        assert_eq!(ids(&guide.with_status(status)), expected);
    }

    #[rstest]
    #[case::name("miller", &[3, 5])]
    #[case::description("SERAPHITES", &[6])]
    #[case::location_is_not_searched("jackson", &[5])]
    #[case::nothing("clicker", &[])]
    fn search_ignores_case(guide: CharacterService, #[case] term: &str, #[case] expected: &[u64]) {
        assert_eq!(ids(&guide.search(term)), expected);
    }

    #[test]
    fn custom_catalogues_are_ordered_by_id() {
        let mut characters = main_characters();
        characters.reverse();
        let guide = CharacterService::new(characters);

        assert_eq!(guide.characters().first().map(|c| c.id), Some(1));
    }
}
