//! Terminal width detection for the shell banner

use std::io;
use tracing::warn;

/// Width assumed when the terminal cannot be queried
pub const FALLBACK_WIDTH: usize = 80;

/// Current terminal width in columns
pub fn detect_width() -> io::Result<usize> {
    let (columns, _rows) = crossterm::terminal::size()?;
    if columns == 0 {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            "terminal reported zero columns",
        ));
    }
    Ok(usize::from(columns))
}

/// Use `fixed` if set, otherwise ask `detect`, falling back to 80 columns.
///
/// Detection failures are logged and never abort rendering.
pub fn resolve_width<F>(fixed: Option<usize>, detect: F) -> usize
where
    F: FnOnce() -> io::Result<usize>,
{
    if let Some(width) = fixed {
        return width;
    }
    match detect() {
        Ok(width) => width,
        Err(e) => {
            warn!(
                "couldn't get terminal width, assumed width of {}: {}",
                FALLBACK_WIDTH, e
            );
            FALLBACK_WIDTH
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_skips_detection() {
        let width = resolve_width(Some(120), || panic!("should not detect"));
        assert_eq!(width, 120);
    }

    #[test]
    fn test_detected_width() {
        assert_eq!(resolve_width(None, || Ok(100)), 100);
    }

    #[test]
    fn test_fallback_on_detection_failure() {
        let width = resolve_width(None, || {
            Err(io::Error::new(io::ErrorKind::Unsupported, "not a tty"))
        });
        assert_eq!(width, FALLBACK_WIDTH);
    }
}
