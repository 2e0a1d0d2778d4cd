use ropey::Rope;

/// Cursor position in a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, in characters.
    pub col: usize,
    /// Remembered column for vertical movement.
    col_memory: usize,
}

impl Cursor {
    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A rope-backed editable text field with an optional character cap.
///
/// Single-line fields turn embedded newlines into spaces. Inserts that would
/// push the field past `max_chars` are truncated to fit.
#[derive(Debug, Clone)]
pub struct TextArea {
    rope: Rope,
    cursor: Cursor,
    max_chars: Option<usize>,
    single_line: bool,
}

impl Default for TextArea {
    fn default() -> Self {
        Self {
            rope: Rope::new(),
            cursor: Cursor::default(),
            max_chars: None,
            single_line: false,
        }
    }
}

impl TextArea {
    /// A multi-line field with no length cap.
    pub fn multi_line(text: &str) -> Self {
        let mut area = Self::default();
        area.insert_str(text);
        area.move_to_start();
        area
    }

    /// A single-line field capped at `max_chars` characters.
    pub fn single_line(text: &str, max_chars: usize) -> Self {
        let mut area = Self {
            max_chars: Some(max_chars),
            single_line: true,
            ..Self::default()
        };
        area.insert_str(text);
        area.move_to_start();
        area
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its trailing newline.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |line| line.chars().count())
    }

    /// Insert text at the cursor. Returns `true` if anything was inserted.
    pub fn insert_str(&mut self, text: &str) -> bool {
        let room = self
            .max_chars
            .map_or(usize::MAX, |max| max.saturating_sub(self.rope.len_chars()));
        let filtered: String = text
            .chars()
            .filter(|&ch| ch != '\r')
            .map(|ch| if self.single_line && ch == '\n' { ' ' } else { ch })
            .take(room)
            .collect();
        if filtered.is_empty() {
            return false;
        }

        let char_idx = self.cursor_char_idx();
        self.rope.insert(char_idx, &filtered);
        self.set_cursor_char_idx(char_idx + filtered.chars().count());
        true
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf))
    }

    /// Insert a line break. Single-line fields reject it.
    pub fn split_line(&mut self) -> bool {
        if self.single_line {
            return false;
        }
        self.insert_str("\n")
    }

    /// Delete the character before the cursor (Backspace).
    pub fn delete_back(&mut self) -> bool {
        let char_idx = self.cursor_char_idx();
        if char_idx == 0 {
            return false;
        }
        self.rope.remove(char_idx - 1..char_idx);
        self.set_cursor_char_idx(char_idx - 1);
        true
    }

    /// Delete the character at the cursor (Delete).
    pub fn delete_forward(&mut self) -> bool {
        let char_idx = self.cursor_char_idx();
        if char_idx >= self.rope.len_chars() {
            return false;
        }
        self.rope.remove(char_idx..=char_idx);
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                let idx = self.cursor_char_idx();
                self.set_cursor_char_idx(idx.saturating_sub(1));
            }
            Direction::Right => {
                let idx = self.cursor_char_idx();
                self.set_cursor_char_idx((idx + 1).min(self.rope.len_chars()));
            }
            Direction::Up if self.cursor.line > 0 => {
                self.cursor.line -= 1;
                self.cursor.col = self.cursor.col_memory.min(self.line_len(self.cursor.line));
            }
            Direction::Down if self.cursor.line + 1 < self.line_count() => {
                self.cursor.line += 1;
                self.cursor.col = self.cursor.col_memory.min(self.line_len(self.cursor.line));
            }
            Direction::Up | Direction::Down => {}
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    pub fn move_end(&mut self) {
        let len = self.line_len(self.cursor.line);
        self.cursor.set_col(len);
    }

    pub fn move_to_end(&mut self) {
        let len = self.rope.len_chars();
        self.set_cursor_char_idx(len);
    }

    const fn move_to_start(&mut self) {
        self.cursor = Cursor {
            line: 0,
            col: 0,
            col_memory: 0,
        };
    }

    // --- Private helpers ---

    fn cursor_char_idx(&self) -> usize {
        let line = self.cursor.line.min(self.line_count().saturating_sub(1));
        self.rope.line_to_char(line) + self.cursor.col.min(self.line_len(line))
    }

    fn set_cursor_char_idx(&mut self, char_idx: usize) {
        let char_idx = char_idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(char_idx);
        self.cursor.line = line;
        self.cursor.set_col(char_idx - self.rope.line_to_char(line));
    }
}
