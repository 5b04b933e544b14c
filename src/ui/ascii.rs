// Control characters and the macros that compose ANSI sequences from them.

pub const ESC: char = '\x1B';

/// `ESC [` followed by `suffix`, built at compile time.
#[macro_export]
macro_rules! csi {
    ($suffix:literal) => {
        concat!("\x1B[", $suffix)
    };
}

#[macro_export]
macro_rules! csi2 {
    ($first:literal, $second:literal) => {
        concat!("\x1B[", $first, "\x1B[", $second)
    };
}
