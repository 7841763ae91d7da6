//! # 十六进制编解码模块
//!
//! 在十六进制字符串与位流之间转换。每个十六进制字符对应 4 位，高位在前。

use crate::constants::BITS_PER_HEX_DIGIT;
use crate::error::StegError;

/// 将十六进制字符串转换为位流，长度恰好为 `4 * hex.len()`。
///
/// 大小写均可。前导零会被保留。
///
/// # Errors
///
/// 如果字符串中包含非十六进制字符，返回 [`StegError::Validation`]。
pub fn hex_to_bits(hex: &str) -> Result<Vec<bool>, StegError> {
    let mut bits = Vec::with_capacity(hex.len() * BITS_PER_HEX_DIGIT);

    for (i, c) in hex.chars().enumerate() {
        let digit = c.to_digit(16).ok_or_else(|| {
            StegError::Validation(format!("'{c}' at index {i} is not a hexadecimal digit"))
        })?;
        bits.extend((0..BITS_PER_HEX_DIGIT).rev().map(|shift| (digit >> shift) & 1 == 1));
    }

    Ok(bits)
}

/// 将位流转换为小写十六进制字符串。
///
/// 位数不是 4 的倍数时，在左侧补零后再转换，即按其数值解释。
/// 空位流返回空字符串。
pub fn bits_to_hex(bits: &[bool]) -> String {
    let padding = (BITS_PER_HEX_DIGIT - bits.len() % BITS_PER_HEX_DIGIT) % BITS_PER_HEX_DIGIT;

    let padded: Vec<bool> = std::iter::repeat_n(false, padding)
        .chain(bits.iter().copied())
        .collect();

    padded
        .chunks_exact(BITS_PER_HEX_DIGIT)
        .map(|nibble| {
            let value = nibble
                .iter()
                .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit));
            // value < 16，必然是合法的十六进制数字
            char::from_digit(value, 16).unwrap_or('0')
        })
        .collect()
}
