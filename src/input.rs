/// Char-indexed view of the text being parsed.
///
/// Positions throughout the engine are char offsets, so `offsets[i]` holds the
/// byte offset of char `i` and one trailing entry for the end of the text.
#[derive(Debug)]
pub(crate) struct Input<'input> {
    text: &'input str,
    offsets: Vec<usize>,
}

impl<'input> Input<'input> {
    pub fn new(text: &'input str) -> Self {
        let mut offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        offsets.push(text.len());
        Input { text, offsets }
    }

    pub fn text(&self) -> &'input str {
        self.text
    }

    /// Number of chars.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn char_at(&self, pos: usize) -> Option<char> {
        let start = *self.offsets.get(pos)?;
        self.text[start..].chars().next()
    }

    /// The `len` chars starting at `pos`, or `None` if the text is too short.
    pub fn slice(&self, pos: usize, len: usize) -> Option<&'input str> {
        let start = *self.offsets.get(pos)?;
        let end = *self.offsets.get(pos.checked_add(len)?)?;
        Some(&self.text[start..end])
    }
}
