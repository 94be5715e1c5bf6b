//! Serializer output flags.

use bitflags::bitflags;

bitflags! {
    /// Controls the textual shape of [`crate::Document::write`]'s output. Named `PrintFlags` after
    /// the original implementation's `jprint_flags_t`.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
    pub struct PrintFlags: u32 {
        /// 4-space indentation per nesting depth, a newline after every member/element, and a
        /// single space after each `:`. Without this flag, output is fully compact.
        const PRETTY = 1 << 0;
        /// Escape every non-ASCII code point as `\uXXXX` (or a `\uXXXX\uXXXX` surrogate pair above
        /// the BMP). Without this flag, non-ASCII text is written as raw UTF-8.
        const ESC_UNI = 1 << 1;
        /// Use `\r\n` line endings instead of `\n`. Only meaningful together with `PRETTY`.
        const NEWLINE_WIN = 1 << 2;
    }
}
