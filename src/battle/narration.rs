/// The text box shared by every queue, plus a transcript of all lines shown.
#[derive(Debug, Clone, Default)]
pub struct Narration {
    text: String,
    revealed_chars: usize,
    transcript: Vec<String>,
}

impl Narration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the text box content with `text`, nothing revealed yet.
    pub fn begin(&mut self, text: String) {
        tracing::debug!(text = %text, "narration");
        self.transcript.push(text.clone());
        self.text = text;
        self.revealed_chars = 0;
    }

    pub fn reveal_to(&mut self, chars: usize) {
        self.revealed_chars = chars.min(self.text.chars().count());
    }

    /// The part of the current line revealed so far.
    pub fn visible_text(&self) -> &str {
        match self.text.char_indices().nth(self.revealed_chars) {
            Some((byte_index, _)) => &self.text[..byte_index],
            None => &self.text,
        }
    }

    pub fn current_line(&self) -> &str {
        &self.text
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.revealed_chars >= self.text.chars().count()
    }

    /// Every line shown so far, oldest first.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Lines shown after the first `seen`; empty when `seen` is past the end.
    pub fn lines_since(&self, seen: usize) -> &[String] {
        self.transcript.get(seen..).unwrap_or_default()
    }

    pub fn clear_box(&mut self) {
        self.text.clear();
        self.revealed_chars = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_reveal() {
        let mut narration = Narration::new();
        narration.begin("Foe Pidgey used Tackle!".to_string());
        assert_eq!(narration.visible_text(), "");
        narration.reveal_to(3);
        assert_eq!(narration.visible_text(), "Foe");
        assert!(!narration.is_fully_revealed());
        narration.reveal_to(1000);
        assert_eq!(narration.visible_text(), "Foe Pidgey used Tackle!");
        assert_eq!(narration.transcript(), &["Foe Pidgey used Tackle!".to_string()]);
    }

    #[test]
    fn test_lines_since() {
        let mut narration = Narration::new();
        narration.begin("Wild Pidgey appeared!".to_string());
        narration.begin("Go! Rattata!".to_string());

        assert_eq!(narration.lines_since(1), &["Go! Rattata!".to_string()]);
        assert!(narration.lines_since(2).is_empty());
        assert!(narration.lines_since(5).is_empty());
    }

    #[test]
    fn test_reveal_counts_characters_not_bytes() {
        let mut narration = Narration::new();
        narration.begin("Pokémon!".to_string());
        narration.reveal_to(5);
        assert_eq!(narration.visible_text(), "Pokém");
    }
}
