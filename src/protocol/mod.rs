//! Line protocol spoken by the button controller
//!
//! Each message is one ASCII line, `<ButtonId>:<level>`, terminated by a
//! newline. There is no checksum or framing beyond the newline.

mod parser;

pub use parser::{decode_line, parse_line};
