//! Character classification for bracket-aware scanning.
//!
//! Every scanner that counts brackets asks this module whether a character is
//! real code or lies inside a string literal or comment. Classification is
//! left-to-right: string and line-comment state ends with the line, while
//! block-comment state carries into the next line through [`ScanState`].

/// Running state threaded through [`classify`] calls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    string_delimiter: Option<char>,
    in_line_comment: bool,
    in_block_comment: bool,
    escaped_next: bool,
    /// The `*` of an opening `/*` is still to come.
    opening_comment: bool,
    /// The `/` of a closing `*/` is still to come.
    closing_comment: bool,
}

impl ScanState {
    /// Whether a block comment is open at this point.
    #[must_use]
    pub fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }

    /// State to carry into the next line.
    #[must_use]
    pub fn end_line(self) -> Self {
        Self {
            in_block_comment: self.in_block_comment && !self.closing_comment,
            ..Self::default()
        }
    }
}

/// How a single character should be treated by bracket counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CharClass {
    pub in_string: bool,
    pub in_line_comment: bool,
    pub in_block_comment: bool,
    /// The following character is escaped by this backslash.
    pub escaped_next: bool,
}

impl CharClass {
    /// Whether the character is neither string nor comment content.
    #[must_use]
    pub fn is_code(&self) -> bool {
        !(self.in_string || self.in_line_comment || self.in_block_comment)
    }

    fn string() -> Self {
        Self {
            in_string: true,
            ..Self::default()
        }
    }

    fn line_comment() -> Self {
        Self {
            in_line_comment: true,
            ..Self::default()
        }
    }

    fn block_comment() -> Self {
        Self {
            in_block_comment: true,
            ..Self::default()
        }
    }
}

/// Classify `line[index]` given the state left by the previous character.
///
/// Returns the classification together with the state for the next call.
/// Indices past the end of the line classify as code and leave the state
/// untouched.
///
/// # Examples
///
/// ```rust
/// use drlparse::parser::classifier::{ScanState, classify};
///
/// let line: Vec<char> = "a\"(\"".chars().collect();
/// let mut state = ScanState::default();
/// let mut masked = Vec::new();
/// for index in 0..line.len() {
///     let (class, next) = classify(&line, index, state);
///     masked.push(!class.is_code());
///     state = next;
/// }
/// assert_eq!(masked, vec![false, true, true, true]);
/// ```
#[must_use]
pub fn classify(line: &[char], index: usize, state: ScanState) -> (CharClass, ScanState) {
    let Some(&ch) = line.get(index) else {
        return (CharClass::default(), state);
    };
    let next = line.get(index + 1).copied();
    let mut st = state;

    if st.in_line_comment {
        return (CharClass::line_comment(), st);
    }

    if st.in_block_comment {
        if st.closing_comment {
            st.closing_comment = false;
            st.in_block_comment = false;
        } else if st.opening_comment {
            st.opening_comment = false;
        } else if ch == '*' && next == Some('/') {
            st.closing_comment = true;
        }
        return (CharClass::block_comment(), st);
    }

    if let Some(quote) = st.string_delimiter {
        if st.escaped_next {
            st.escaped_next = false;
            return (CharClass::string(), st);
        }
        if ch == '\\' {
            st.escaped_next = true;
            let class = CharClass {
                escaped_next: true,
                ..CharClass::string()
            };
            return (class, st);
        }
        if ch == quote {
            st.string_delimiter = None;
        }
        return (CharClass::string(), st);
    }

    match (ch, next) {
        ('"' | '\'', _) => {
            st.string_delimiter = Some(ch);
            (CharClass::string(), st)
        }
        ('/', Some('/')) => {
            st.in_line_comment = true;
            (CharClass::line_comment(), st)
        }
        ('/', Some('*')) => {
            st.in_block_comment = true;
            st.opening_comment = true;
            (CharClass::block_comment(), st)
        }
        _ => (CharClass::default(), st),
    }
}

/// One classified character of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedChar {
    /// Byte offset within the line.
    pub byte: usize,
    /// Character column within the line.
    pub column: usize,
    pub ch: char,
    pub class: CharClass,
}

/// Classify every character of `line`, updating `state` to the value to
/// carry into the following line.
#[must_use]
pub fn scan_line(line: &str, state: &mut ScanState) -> Vec<ScannedChar> {
    let indexed: Vec<(usize, char)> = line.char_indices().collect();
    let chars: Vec<char> = indexed.iter().map(|&(_, ch)| ch).collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut st = *state;
    for (column, &(byte, ch)) in indexed.iter().enumerate() {
        let (class, next) = classify(&chars, column, st);
        out.push(ScannedChar {
            byte,
            column,
            ch,
            class,
        });
        st = next;
    }
    *state = st.end_line();
    out
}

/// Whether `line` holds nothing but whitespace, comments or string text.
#[must_use]
pub fn is_code_empty(line: &str, state: &mut ScanState) -> bool {
    scan_line(line, state)
        .iter()
        .all(|sc| !sc.class.is_code() || sc.ch.is_whitespace())
}
