/// 每个像素参与隐写的颜色通道数 (R, G, B)。
/// Alpha 通道即使存在也不参与隐写。
pub const CHANNELS: usize = 3;

/// 每个通道字节的位数。
pub const BITS_PER_CHANNEL: usize = 8;

/// 一个十六进制字符对应的位数。
pub const BITS_PER_HEX_DIGIT: usize = 4;

/// 固定模式下保留载体像素的高半字节。
pub const HIGH_NIBBLE: u8 = 0xF0;

/// 固定模式下存放隐藏图像的低半字节。
pub const LOW_NIBBLE: u8 = 0x0F;

/// 半字节的位宽，即固定模式下高低半字节之间的移位量。
pub const NIBBLE_SHIFT: u8 = 4;

/// 默认掩码：每个通道的位 4-7 (低半字节) 作为插入位置。
///
/// ```text
///        0  1  2  3  4  5  6  7
/// R)  0 |0  0  0  0  1  1  1  1
/// G)  1 |0  0  0  0  1  1  1  1
/// B)  2 |0  0  0  0  1  1  1  1
/// ```
pub const DEFAULT_MASK_JSON: &str =
    "[[0,0,0,0,1,1,1,1],[0,0,0,0,1,1,1,1],[0,0,0,0,1,1,1,1]]";

/// 未指定输出路径时，`merge` 结果文件名使用的前缀。
pub const MERGED_PREFIX: &str = "merged_";

/// 未指定输出路径时，`unmerge` 结果文件名使用的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";

/// 未指定输出路径时，`insert-hex` 结果文件名使用的前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 默认输出文件的扩展名。只有无损格式才能保留隐藏的位。
pub const DEFAULT_OUTPUT_EXTENSION: &str = "png";
