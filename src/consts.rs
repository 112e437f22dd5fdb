//! Wire-format constants: header layout and opcode tags/masks.

/// Size of the fixed QOI file header, in bytes.
pub const QOI_HEADER_SIZE: usize = 14;

/// The four magic bytes every QOI file starts with.
pub const QOI_MAGIC: [u8; 4] = *b"qoif";

/// 8-byte end-of-stream marker every encoded file is terminated with.
pub const QOI_PADDING: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

/// Number of bytes in [`QOI_PADDING`].
pub const QOI_PADDING_SIZE: usize = QOI_PADDING.len();

/// Number of slots in the running pixel-hash cache.
pub const QOI_CACHE_SIZE: usize = 64;

// Opcode tags. `INDEX`/`DIFF`/`LUMA`/`RUN` are 2-bit tags occupying the top
// bits of a single byte; `RGB`/`RGBA` are the two reserved full-byte values
// that would otherwise collide with `RUN`'s tag space.
pub const QOI_OP_INDEX: u8 = 0x00; // 00xxxxxx
pub const QOI_OP_DIFF: u8 = 0x40; // 01xxxxxx
pub const QOI_OP_LUMA: u8 = 0x80; // 10xxxxxx
pub const QOI_OP_RUN: u8 = 0xc0; // 11xxxxxx
pub const QOI_OP_RGB: u8 = 0xfe;
pub const QOI_OP_RGBA: u8 = 0xff;

/// Mask selecting the 2-bit tag from an opcode's leading byte.
pub const QOI_MASK_2: u8 = 0xc0;

/// Maximum pixel count a single `RUN` opcode can encode.
pub const QOI_RUN_MAX: u8 = 62;
