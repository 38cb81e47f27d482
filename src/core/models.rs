/// One vocabulary entry. Created once by the parser and shared read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VocabRecord {
    pub term: String,       // Headword, e.g. 高兴
    pub phonetic: String,   // Reading, e.g. gāoxìng (may be empty)
    pub definition: String, // Gloss shown on the back of the card
    pub category: String,   // Free-form tag such as "HSK 1" (may be empty)
    pub ordinal: usize,     // Position in the emitted parse sequence
}

impl VocabRecord {
    /// Text for the back of the card: `[pinyin]` on its own line when present.
    pub fn back_text(&self) -> String {
        if self.phonetic.is_empty() {
            self.definition.clone()
        } else {
            format!("[{}]\n{}", self.phonetic, self.definition)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    /// Horizontal sign of the exit animation: next cards leave to the left.
    pub fn exit_sign(&self) -> f32 {
        match self {
            Direction::Next => -1.0,
            Direction::Previous => 1.0,
        }
    }
}
