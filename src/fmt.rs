//! Truncating container rendering.
//!
//! The formatter's precision (`{:.3}`) is an explicit element-count limit
//! and takes priority over its width (`{:10}`), a display-width hint showing
//! `width / 2` elements but no fewer than 3; with neither hint the whole
//! collection is shown. Omitted elements are summarized as ` ...+K` inside
//! the brackets, and an empty collection renders as `[]`.

use core::fmt::{self, Display, Formatter};

const MIN_SHOWN: usize = 3;

/// Picks how many of `len > 0` elements to render.
pub(crate) fn limit_for(f: &Formatter<'_>, len: usize) -> usize {
    let limit = if let Some(precision) = f.precision() {
        precision
    } else if let Some(width) = f.width() {
        (width / 2).max(MIN_SHOWN)
    } else {
        len
    };
    limit.clamp(1, len)
}

/// Renders `shown` out of `len` elements, space-separated in brackets, with
/// the ` ...+K` truncation marker.
pub(crate) fn write_run<'a, T: Display + 'a>(
    f: &mut Formatter<'_>,
    shown: impl ExactSizeIterator<Item = &'a T>,
    len: usize,
) -> fmt::Result {
    let limit = shown.len();
    f.write_str("[")?;
    for (i, value) in shown.enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{value}")?;
    }
    if limit < len {
        write!(f, " ...+{}", len - limit)?;
    }
    f.write_str("]")
}
