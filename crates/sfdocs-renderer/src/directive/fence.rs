//! Code fence tracking for block directive scanning.
//!
//! Directive markers (`:::`, `::name`) inside fenced code blocks are code,
//! not directives.

/// Tracks code fence state during line-by-line scanning.
///
/// Fences use three or more backticks or tildes. The closing fence must use
/// the same character and be at least as long as the opening fence.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    /// Character and length of the open fence.
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line. Returns `true` if the line opened or closed a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        match self.open {
            Some((fence_char, min_len)) => {
                if is_closing_fence(trimmed, fence_char, min_len) {
                    self.open = None;
                    return true;
                }
                false
            }
            None => {
                self.open = detect_fence(trimmed);
                self.open.is_some()
            }
        }
    }
}

/// Detect an opening fence, returning its character and length.
fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next().filter(|&c| c == '`' || c == '~')?;
    let count = trimmed.chars().take_while(|&c| c == first).count();
    if count < 3 {
        return None;
    }
    // Backtick info strings may not contain backticks (that's inline code)
    if first == '`' && trimmed[count..].contains('`') {
        return None;
    }
    Some((first, count))
}

/// Check whether a line closes a fence opened with `fence_char` x `min_len`.
fn is_closing_fence(trimmed: &str, fence_char: char, min_len: usize) -> bool {
    let count = trimmed.chars().take_while(|&c| c == fence_char).count();
    count >= min_len && trimmed[count..].chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtick_fence() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```rust\n"));
        assert!(tracker.in_fence());

        assert!(!tracker.update(":::warning\n"));
        assert!(tracker.in_fence());

        assert!(tracker.update("```\n"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_shorter_fence_not_closing() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("~~~~"));
        assert!(!tracker.update("~~~"));
        assert!(tracker.in_fence());
        assert!(tracker.update("~~~~~"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_mixed_fence_chars() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```"));
        assert!(!tracker.update("~~~"));
        assert!(tracker.in_fence());
    }

    #[test]
    fn test_inline_code_is_not_fence() {
        let mut tracker = FenceTracker::new();

        assert!(!tracker.update("``inline code``"));
        assert!(!tracker.update("```inline``` code"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_regular_lines() {
        let mut tracker = FenceTracker::new();

        assert!(!tracker.update("::video{src=a}"));
        assert!(!tracker.update(":::"));
        assert!(!tracker.in_fence());
    }
}
