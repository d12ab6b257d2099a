// Session state: the single mutable record the orchestrator owns.
//
// Every user action, request outcome and reveal tick ends up as one of the
// mutators below. The TUI only ever sees clones of this struct.

use crate::protocol::InputEdit;

// ---------------------------------------------------------------------------
// User-facing messages
// ---------------------------------------------------------------------------

/// Shown when the user submits an empty or whitespace-only prompt.
pub const VALIDATION_MESSAGE: &str = "براہ کرم پہلے کہانی شروع کرنے کے لیے ایک جملہ لکھیں۔";

/// Shown for every request failure (transport, status, missing text).
pub const FAILURE_MESSAGE: &str = "کہانی بنانا ممکن نہیں تھا، دوبارہ کوشش کریں۔";

// ---------------------------------------------------------------------------
// MaxLength
// ---------------------------------------------------------------------------

/// Requested story length, always within `[MaxLength::MIN, MaxLength::MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaxLength(u16);

impl MaxLength {
    pub const MIN: u16 = 50;
    pub const MAX: u16 = 500;
    pub const DEFAULT: u16 = 300;
    /// Slider increment for a single adjust key press.
    pub const STEP: i32 = 10;

    /// Build a length, clamping out-of-range values to the nearest bound.
    pub fn clamped(value: i64) -> Self {
        let v = value.clamp(Self::MIN as i64, Self::MAX as i64);
        MaxLength(v as u16)
    }

    /// Build a length only if it is already in range.
    pub fn new(value: u16) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(MaxLength(value))
    }

    /// Move by `delta`, saturating at the bounds.
    pub fn adjusted(self, delta: i32) -> Self {
        Self::clamped(self.0 as i64 + delta as i64)
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for MaxLength {
    fn default() -> Self {
        MaxLength(Self::DEFAULT)
    }
}

impl std::fmt::Display for MaxLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// LengthPreset
// ---------------------------------------------------------------------------

/// Quick-select story lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthPreset {
    Short,
    Medium,
    Long,
}

impl LengthPreset {
    pub const ALL: [LengthPreset; 3] = [LengthPreset::Short, LengthPreset::Medium, LengthPreset::Long];

    pub fn max_length(self) -> MaxLength {
        match self {
            LengthPreset::Short => MaxLength(150),
            LengthPreset::Medium => MaxLength(300),
            LengthPreset::Long => MaxLength(450),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LengthPreset::Short => "مختصر",
            LengthPreset::Medium => "درمیانی",
            LengthPreset::Long => "طویل",
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Coarse lifecycle phase derived from the busy flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Generating,
    Streaming,
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Everything the story screen shows, owned by the orchestrator task.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    /// Prompt being edited.
    pub input_text: String,
    pub max_length: MaxLength,
    /// Words revealed so far, in reveal order.
    pub output_words: Vec<String>,
    /// True only while the network call is in flight.
    pub is_generating: bool,
    /// True only while the reveal ticker is emitting words.
    pub is_streaming: bool,
    /// Last user-facing error, if any.
    pub error: Option<String>,
    /// Copy acknowledgement; cleared by the copy deadline.
    pub copied: bool,
}

impl SessionState {
    pub fn new(max_length: MaxLength) -> Self {
        SessionState {
            max_length,
            ..Default::default()
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_generating {
            Phase::Generating
        } else if self.is_streaming {
            Phase::Streaming
        } else {
            Phase::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.phase() != Phase::Idle
    }

    /// The prompt is usable for a request.
    pub fn has_prompt(&self) -> bool {
        !self.input_text.trim().is_empty()
    }

    /// Revealed words joined with single spaces.
    pub fn story_text(&self) -> String {
        self.output_words.join(" ")
    }

    pub fn apply_edit(&mut self, edit: InputEdit) {
        match edit {
            InputEdit::Insert(c) => self.input_text.push(c),
            InputEdit::Paste(text) => self.input_text.push_str(&text),
            InputEdit::Newline => self.input_text.push('\n'),
            InputEdit::Backspace => {
                self.input_text.pop();
            }
            InputEdit::Replace(text) => self.input_text = text,
        }
    }

    pub fn set_max_length(&mut self, value: i64) {
        self.max_length = MaxLength::clamped(value);
    }

    pub fn adjust_max_length(&mut self, delta: i32) {
        self.max_length = self.max_length.adjusted(delta);
    }

    pub fn apply_preset(&mut self, preset: LengthPreset) {
        self.max_length = preset.max_length();
    }

    /// The preset matching the current length, if any.
    pub fn active_preset(&self) -> Option<LengthPreset> {
        LengthPreset::ALL
            .into_iter()
            .find(|p| p.max_length() == self.max_length)
    }

    /// Rejected submit: only the error changes.
    pub(crate) fn reject_prompt(&mut self) {
        self.error = Some(VALIDATION_MESSAGE.to_string());
    }

    /// Accepted submit: reset the previous attempt and enter GENERATING.
    pub(crate) fn begin_generation(&mut self) {
        self.error = None;
        self.output_words.clear();
        self.is_streaming = false;
        self.is_generating = true;
    }

    /// The current request reached a terminal state.
    pub(crate) fn end_generation(&mut self) {
        self.is_generating = false;
    }

    pub(crate) fn fail_generation(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    pub(crate) fn begin_reveal(&mut self) {
        self.output_words.clear();
        self.is_streaming = true;
    }

    pub(crate) fn push_word(&mut self, word: String) {
        self.output_words.push(word);
    }

    pub(crate) fn end_reveal(&mut self) {
        self.is_streaming = false;
    }

    /// Clear action: back to an empty IDLE screen. The length is kept.
    pub fn clear(&mut self) {
        self.input_text.clear();
        self.output_words.clear();
        self.error = None;
        self.is_streaming = false;
        self.is_generating = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
