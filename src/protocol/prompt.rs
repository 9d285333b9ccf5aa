//! Derived text rendering of a protocol.
//!
//! These strings are prompt fragments for a downstream text-generation
//! service; nothing in the crate parses them back.

use super::CultureProtocol;

impl CultureProtocol {
    /// Render the protocol as a system prompt.
    pub fn to_system_prompt(&self) -> String {
        let mut parts = vec![
            format!("You embody the \"{}\" culture protocol.", self.name),
            format!("Cultural character: {}", self.description),
            String::new(),
            "[Values]".to_string(),
        ];

        for token in &self.value_tokens {
            parts.push(format!("- {} (importance: {:.1})", token.name, token.value));
        }

        parts.push("\n[Practices]".to_string());
        for practice in &self.practices {
            parts.push(format!("- {}: {}", practice.name, practice.description));
        }

        parts.push("\n[Memes]".to_string());
        for meme in &self.memes {
            parts.push(format!("- \"{}\"", meme.content));
        }

        parts.push("\n[Myths and symbols]".to_string());
        for myth in &self.myths {
            parts.push(format!("- {}: {}", myth.name, myth.symbolism));
        }

        parts.push("\nThink and respond according to this culture protocol.".to_string());
        parts.join("\n")
    }

    /// One-line digest: name, id and element counts.
    pub fn summary(&self) -> String {
        format!(
            "{} [{}]: {} values, {} memes, {} practices, {} myths",
            self.name,
            self.id,
            self.value_tokens.len(),
            self.memes.len(),
            self.practices.len(),
            self.myths.len()
        )
    }
}
