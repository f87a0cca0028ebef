//! Per-keystroke text correction: keeps parentheses balanced and turns the
//! `\` shorthand into `λ`. Every function here is pure in
//! `(before, after, cursor)`; [`Editor`] only carries the previous state
//! between calls.

use tracing::trace;

use crate::prelude::*;

/// Char offset of `index` as a byte offset into `text`, saturating at the end.
fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Returns `text` with `remove` chars starting at `index` replaced by `with`.
fn splice(text: &str, index: usize, remove: usize, with: &str) -> String {
    let start = byte_offset(text, index);
    let end = byte_offset(text, index + remove);
    let mut ret = String::with_capacity(text.len() + with.len());
    ret.push_str(&text[..start]);
    ret.push_str(with);
    ret.push_str(&text[end..]);
    ret
}

pub fn balanced(text: &str) -> bool {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Index of the `)` closing the `(` at `start`, or `None` if the input ends
/// first.
pub fn matching(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.chars().enumerate().skip(start + 1) {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            ')' => return Some(i),
            _ => {}
        }
    }
    None
}

pub fn expand_shorthand(text: &str) -> String {
    text.replace(SHORTHAND, LAMBDA)
}

/// The char inserted at `index` if `after` is `before` with exactly one char
/// inserted there.
fn single_insertion(before: &str, after: &str, index: usize) -> Option<char> {
    if char_len(before) + 1 != char_len(after) {
        return None;
    }
    let offset = byte_offset(after, index);
    let inserted = after[offset..].chars().next()?;
    let rest = offset + inserted.len_utf8();
    (before.get(..offset) == Some(&after[..offset]) && before.get(offset..) == Some(&after[rest..]))
        .then(|| inserted)
}

/// The char deleted at `index` if `after` is `before` with exactly one char
/// removed there.
fn single_deletion(before: &str, after: &str, index: usize) -> Option<char> {
    single_insertion(after, before, index)
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Correction {
    pub text: String,
    pub cursor: usize,
}

/// Corrects the transition from `before` (balanced) to `after`, given the
/// cursor position in `after`.
pub fn correct(before: &str, after: &str, cursor: usize) -> Correction {
    let accept = |text: String, cursor: usize| Correction { text, cursor };
    let inserted = cursor
        .checked_sub(1)
        .and_then(|p| single_insertion(before, after, p).map(|c| (p, c)));
    if let Some((p, c)) = inserted {
        trace!(position = p, inserted = %c, "single insertion");
        return match c {
            SHORTHAND => accept(splice(after, p, 1, LAMBDA), cursor),
            '(' => accept(splice(after, cursor, 0, ")"), cursor),
            ')' if after.chars().nth(cursor) == Some(')') => accept(before.to_string(), cursor),
            ')' => accept(before.to_string(), p),
            _ => accept(after.to_string(), cursor),
        };
    }
    if let Some(c) = single_deletion(before, after, cursor) {
        trace!(position = cursor, deleted = %c, "single deletion");
        return match c {
            '(' => match matching(before, cursor) {
                Some(end) => {
                    let without_close = splice(before, end, 1, "");
                    accept(splice(&without_close, cursor, 1, ""), cursor)
                }
                None => accept(after.to_string(), cursor),
            },
            ')' => accept(before.to_string(), cursor),
            _ => accept(after.to_string(), cursor),
        };
    }
    if balanced(after) {
        accept(expand_shorthand(after), cursor)
    } else {
        let before_len = char_len(before);
        let from_end = char_len(after).saturating_sub(cursor);
        accept(before.to_string(), before_len.saturating_sub(from_end))
    }
}

/// Text and selection of an editing surface.
#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct EditorState {
    pub text: String,
    pub selection: Span,
}
impl EditorState {
    pub fn new(text: impl Into<String>, cursor: usize) -> Self {
        Self {
            text: text.into(),
            selection: cursor..cursor,
        }
    }
    pub fn cursor(&self) -> usize {
        self.selection.start
    }
}

/// One editing session: remembers the last corrected state so each edit can
/// be classified against it.
#[derive(Default, Debug)]
pub struct Editor {
    previous: EditorState,
}
impl Editor {
    pub fn new(text: &str) -> Self {
        let text = expand_shorthand(text);
        let cursor = char_len(&text);
        Self {
            previous: EditorState::new(text, cursor),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.previous
    }

    /// Feeds the surface's state after an edit and returns what the surface
    /// should show instead.
    pub fn input(&mut self, current: EditorState) -> &EditorState {
        let cursor = current.cursor().min(char_len(&current.text));
        let Correction { text, cursor } = correct(&self.previous.text, &current.text, cursor);
        self.previous = EditorState::new(text, cursor);
        &self.previous
    }
}
