//! # lsb_merge 库
//!
//! 本库包含位平面隐写工具的核心逻辑：固定 4 位的图像合并/分离，
//! 以及按通道掩码写入/读取十六进制数据。

// 声明库包含的所有模块。

pub mod cli;
pub mod constants;
pub mod error;
pub mod grid;
pub mod handler;
pub mod hex;
pub mod mask;
pub mod steganography;
