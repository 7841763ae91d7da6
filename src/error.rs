//! # 错误类型模块
//!
//! 定义隐写核心 (`steganography`、`mask`、`hex`) 可能返回的所有错误。
//! 处理器层再通过 `anyhow` 为这些错误附加上下文。

use thiserror::Error;

/// 隐写核心操作的错误。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StegError {
    /// 要隐藏的图像在任一方向上大于载体图像。
    #[error(
        "Image 2 should not be larger than Image 1! Carrier: {}x{}, payload: {}x{}",
        .carrier.0, .carrier.1, .payload.0, .payload.1
    )]
    Dimension {
        carrier: (u32, u32),
        payload: (u32, u32),
    },

    /// 十六进制负载所需的位数超过了掩码与偏移允许的插槽数。
    #[error(
        "Full length of hex code binary {required} is too large for insertion space in image {available}"
    )]
    Capacity { required: usize, available: usize },

    /// 输入格式错误，例如掩码形状不对或十六进制字符非法。
    #[error("Invalid input: {0}")]
    Validation(String),
}
