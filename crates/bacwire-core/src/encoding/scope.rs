use core::fmt;

/// Deepest nesting recorded by a [`ScopePath`]; deeper scopes are counted only.
pub const MAX_SCOPE_DEPTH: usize = 16;

/// Stack of named scopes entered while decoding or encoding.
///
/// Purely diagnostic: it names the place a failure happened. It is `Copy` so
/// a reader checkpoint restores it together with the position.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ScopePath {
    names: [&'static str; MAX_SCOPE_DEPTH],
    depth: usize,
}

impl ScopePath {
    pub const fn new() -> Self {
        Self {
            names: [""; MAX_SCOPE_DEPTH],
            depth: 0,
        }
    }

    pub const fn depth(&self) -> usize {
        self.depth
    }

    pub fn push(&mut self, name: &'static str) {
        if self.depth < MAX_SCOPE_DEPTH {
            self.names[self.depth] = name;
        }
        self.depth += 1;
    }

    pub fn pop(&mut self, name: &'static str) {
        debug_assert!(self.depth > 0, "scope stack underflow popping {name}");
        if let Some(top) = self.depth.checked_sub(1).and_then(|i| self.names.get(i)) {
            debug_assert_eq!(*top, name, "unbalanced scope pop");
        }
        self.depth = self.depth.saturating_sub(1);
    }

    /// Recorded scope names, outermost first.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names[..self.depth.min(MAX_SCOPE_DEPTH)].iter().copied()
    }
}

impl Default for ScopePath {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.depth == 0 {
            return f.write_str("<root>");
        }
        for (i, name) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(name)?;
        }
        if self.depth > MAX_SCOPE_DEPTH {
            write!(f, "/… (+{})", self.depth - MAX_SCOPE_DEPTH)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ScopePath, MAX_SCOPE_DEPTH};
    use alloc::string::ToString;

    #[test]
    fn renders_nested_path() {
        let mut p = ScopePath::new();
        assert_eq!(p.to_string(), "<root>");
        p.push("Frame");
        p.push("Npdu");
        assert_eq!(p.to_string(), "Frame/Npdu");
        p.pop("Npdu");
        assert_eq!(p.to_string(), "Frame");
    }

    #[test]
    fn overflow_is_counted_not_recorded() {
        let mut p = ScopePath::new();
        for _ in 0..MAX_SCOPE_DEPTH + 2 {
            p.push("Level");
        }
        assert_eq!(p.depth(), MAX_SCOPE_DEPTH + 2);
        assert_eq!(p.iter().count(), MAX_SCOPE_DEPTH);
        assert!(p.to_string().ends_with("(+2)"));
        p.pop("Level");
        p.pop("Level");
        assert_eq!(p.iter().count(), MAX_SCOPE_DEPTH);
    }
}
