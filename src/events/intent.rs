/// What a key press asks the page to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyIntent {
    Next,
    Previous,
    First,
    Last,
    /// Zero-based section index from a digit key.
    Section(usize),
    ToggleHud,
    ToggleReduceMotion,
}

#[inline]
pub fn intent_for_key(key: &str) -> Option<KeyIntent> {
    match key {
        "ArrowDown" | "PageDown" | " " | "Spacebar" => Some(KeyIntent::Next),
        "ArrowUp" | "PageUp" => Some(KeyIntent::Previous),
        "Home" => Some(KeyIntent::First),
        "End" => Some(KeyIntent::Last),
        "h" | "H" => Some(KeyIntent::ToggleHud),
        "m" | "M" => Some(KeyIntent::ToggleReduceMotion),
        _ => section_for_digit(key).map(KeyIntent::Section),
    }
}

/// "1".."9" → 0..8.
#[inline]
pub fn section_for_digit(key: &str) -> Option<usize> {
    let mut chars = key.chars();
    let digit = chars.next()?.to_digit(10)?;
    if chars.next().is_some() || digit == 0 {
        return None;
    }
    Some(digit as usize - 1)
}

/// Section a navigation intent resolves to, or `None` when it would not move
/// (already at the edge, or the index does not exist).
pub fn target_section(intent: KeyIntent, current: usize, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let last = count - 1;
    let target = match intent {
        KeyIntent::Next => current.checked_add(1).filter(|&i| i <= last)?,
        KeyIntent::Previous => current.checked_sub(1)?,
        KeyIntent::First => 0,
        KeyIntent::Last => last,
        KeyIntent::Section(i) if i <= last => i,
        _ => return None,
    };
    (target != current).then_some(target)
}
