//! Static keyword tables for feature extraction.
//!
//! Matching is case-insensitive substring search.  Entries are word stems
//! ("analy" matches "analysis" and "analytical").

/// A named, fixed list of keyword stems.
#[derive(Debug, Clone, Copy)]
pub struct KeywordTable {
    pub name: &'static str,
    pub stems: &'static [&'static str],
}

impl KeywordTable {
    /// True when any stem occurs in `text`.
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.stems.iter().any(|stem| lower.contains(stem))
    }
}

macro_rules! tables {
    ($($ident:ident => [$($stem:literal),+ $(,)?];)+) => {
        $(
            pub const $ident: KeywordTable = KeywordTable {
                name: stringify!($ident),
                stems: &[$($stem),+],
            };
        )+
    };
}

tables! {
    // time perception
    TURNING_POINT => ["turning", "detect"];
    FUTURE => ["future", "long-term", "long term"];
    PRESENT => ["present", "moment"];
    SPEED => ["rapid", "immediate", "quick"];
    // relationships
    HARMONY => ["harmony", "cooperat"];
    INDIVIDUAL => ["individual", "independen"];
    HIERARCHY => ["hierarch", "rank"];
    EQUALITY => ["equal", "flat"];
    RESONANCE => ["resonan", "harmony"];
    HEART => ["heart", "feel"];
    ACHIEVEMENT => ["achievement", "result", "track record"];
    // cognition
    INTUITION => ["intuit", "sensing"];
    LOGIC => ["logic", "analy"];
    CAUSAL => ["causal"];
    CREATIVE => ["creativ", "innovat"];
    MEASURE => ["measur", "analy"];
    OBSERVE => ["observ", "sensing"];
    // communication
    EXPRESSION => ["express"];
    DIRECT => ["directly", "straightforward", "candid"];
    INDIRECT => ["indirect", "implicit", "subtle"];
    PERCEPTION => ["detect", "sens", "perceiv"];
    // decisions
    COMMITMENT => ["commit", "irrevers"];
    REVERSIBLE => ["iterat", "reversib"];
    // adaptability
    ADAPT => ["adapt", "change"];
    TRADITION => ["tradition", "heritage"];
    // quality scoring
    CHANGE => ["change", "adapt", "turning", "evolv", "growth"];
    CREATIVITY => ["creativ", "innovat", "invent", "intuit", "imagin"];
    EXPERIMENT => ["experiment", "explor"];
}

/// Tags that do not distinguish a protocol.
pub const COMMON_TAGS: [&str; 3] = ["experimental", "basic", "simple"];

/// True when any whitespace-separated word of `name` occurs in `text`.
pub fn shares_word(name: &str, text: &str) -> bool {
    let text = text.to_lowercase();
    name.to_lowercase()
        .split_whitespace()
        .any(|word| text.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(INTUITION.matches("Intuitive Leap"));
        assert!(LOGIC.matches("ANALYTICAL rigor"));
        assert!(!LOGIC.matches("gut feeling"));
    }

    #[test]
    fn test_direct_does_not_fire_on_indirect() {
        assert!(INDIRECT.matches("speaks in indirect hints"));
        assert!(!DIRECT.matches("speaks in indirect hints"));
        assert!(DIRECT.matches("states concerns directly"));
    }

    #[test]
    fn test_shares_word() {
        assert!(shares_word("Harmony Focus", "keeps the team in harmony"));
        assert!(!shares_word("", "anything"));
        assert!(!shares_word("Turning Point", "steady routine"));
    }
}
