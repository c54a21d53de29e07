//! Recognise arrow-key escape sequences in a cooked-mode input line.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Up,
    Down,
}

/// Parse a line made only of up/down arrow sequences.
///
/// Returns `None` for ordinary input, including lines that mix arrows with
/// text.
pub fn parse_arrows(line: &str) -> Option<Vec<Arrow>> {
    let mut rest = line;
    let mut arrows = Vec::new();
    while !rest.is_empty() {
        let (arrow, tail) = if let Some(t) = strip_csi(rest, 'A') {
            (Arrow::Up, t)
        } else if let Some(t) = strip_csi(rest, 'B') {
            (Arrow::Down, t)
        } else {
            return None;
        };
        arrows.push(arrow);
        rest = tail;
    }
    if arrows.is_empty() { None } else { Some(arrows) }
}

/// Strip `ESC [ x` or `ESC O x`.
fn strip_csi(s: &str, code: char) -> Option<&str> {
    let body = s.strip_prefix('\u{1b}')?;
    let body = body.strip_prefix('[').or_else(|| body.strip_prefix('O'))?;
    body.strip_prefix(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_arrow_runs() {
        assert_eq!(parse_arrows("\x1b[A"), Some(vec![Arrow::Up]));
        assert_eq!(
            parse_arrows("\x1b[A\x1b[A\x1bOB"),
            Some(vec![Arrow::Up, Arrow::Up, Arrow::Down])
        );
    }

    #[test]
    fn ordinary_input_is_not_arrows() {
        assert_eq!(parse_arrows(""), None);
        assert_eq!(parse_arrows("ls"), None);
        assert_eq!(parse_arrows("\x1b[Als"), None);
        assert_eq!(parse_arrows("\x1b[C"), None);
    }
}
