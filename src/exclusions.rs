/// Material exclusion patterns
/// Wildcards follow wildmatch rules: `*` any run of characters, `?` one character

use wildmatch::WildMatch;

#[derive(Debug, Default)]
pub struct ExclusionList {
    patterns: Vec<WildMatch>,
}

impl ExclusionList {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .map(WildMatch::new)
            .collect();
        Self { patterns }
    }

    /// Check if a material should be skipped (case-sensitive, like material names)
    pub fn should_exclude(&self, material: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(material))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_matching() {
        let list = ExclusionList::new(&["*_Glass", "Decal_*", "Sky??"]);

        assert!(list.should_exclude("Window_Glass"));
        assert!(list.should_exclude("Decal_Blood"));
        assert!(list.should_exclude("Sky01"));

        assert!(!list.should_exclude("Glass_Window"));
        assert!(!list.should_exclude("Sky001"));
        assert!(!list.should_exclude("decal_blood"));
    }

    #[test]
    fn test_exact_names() {
        let list = ExclusionList::new(&["Dummy"]);
        assert!(list.should_exclude("Dummy"));
        assert!(!list.should_exclude("Dummy2"));
    }

    #[test]
    fn test_blank_patterns_ignored() {
        let list = ExclusionList::new(&["", "   "]);
        assert!(list.is_empty());
        assert!(!list.should_exclude(""));
    }
}
