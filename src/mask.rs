//! # 通道掩码模块
//!
//! [`ChannelMask`] 是一个 3x8 的布尔矩阵，每行对应一个通道 (R, G, B)，
//! 每列对应一个位位置 (0 为最高位)。为 `true` 的位置即为负载插槽。
//!
//! 插槽的遍历顺序 (先 R 行、再 G 行、最后 B 行，行内从左到右) 决定了
//! 负载位流在像素中的排列，插入和提取必须使用同一顺序。

use std::str::FromStr;

use serde::Deserialize;

use crate::constants::{BITS_PER_CHANNEL, CHANNELS};
use crate::error::StegError;

/// 一个插槽：`(通道索引, 位位置)`，位位置 0 为最高位。
pub type Slot = (usize, usize);

/// 每个通道中哪些位用于承载负载。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMask {
    bits: [[bool; BITS_PER_CHANNEL]; CHANNELS],
}

/// JSON 中的单个掩码元素，接受 `true/false` 或 `0/1`。
#[derive(Deserialize)]
#[serde(untagged)]
enum MaskCell {
    Flag(bool),
    Number(i64),
}

impl ChannelMask {
    pub fn new(bits: [[bool; BITS_PER_CHANNEL]; CHANNELS]) -> Self {
        Self { bits }
    }

    /// 每个通道的低半字节 (位 4-7) 作为插槽。
    pub fn low_nibble() -> Self {
        let row = [false, false, false, false, true, true, true, true];
        Self::new([row; CHANNELS])
    }

    /// 从 3x8 的 JSON 数组解析掩码。
    ///
    /// # Errors
    ///
    /// JSON 无法解析、形状不是 3x8，或元素不是布尔值/0/1 时，
    /// 返回 [`StegError::Validation`]。
    pub fn from_json(json: &str) -> Result<Self, StegError> {
        let rows: Vec<Vec<MaskCell>> = serde_json::from_str(json).map_err(|e| {
            StegError::Validation(format!(
                "mask must be a 3x8 JSON array of 0/1 or true/false values: {e}"
            ))
        })?;

        if rows.len() != CHANNELS {
            return Err(StegError::Validation(format!(
                "mask must have {CHANNELS} rows, got {}",
                rows.len()
            )));
        }

        let mut bits = [[false; BITS_PER_CHANNEL]; CHANNELS];
        for (channel, row) in rows.iter().enumerate() {
            if row.len() != BITS_PER_CHANNEL {
                return Err(StegError::Validation(format!(
                    "mask row {channel} must have {BITS_PER_CHANNEL} entries, got {}",
                    row.len()
                )));
            }
            for (position, cell) in row.iter().enumerate() {
                bits[channel][position] = match *cell {
                    MaskCell::Flag(flag) => flag,
                    MaskCell::Number(0) => false,
                    MaskCell::Number(1) => true,
                    MaskCell::Number(other) => {
                        return Err(StegError::Validation(format!(
                            "mask entry [{channel}][{position}] must be 0 or 1, got {other}"
                        )));
                    }
                };
            }
        }

        Ok(Self::new(bits))
    }

    /// 按行优先顺序列出所有插槽。
    pub fn slots(&self) -> Vec<Slot> {
        self.bits
            .iter()
            .enumerate()
            .flat_map(|(channel, row)| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &selected)| selected)
                    .map(move |(position, _)| (channel, position))
            })
            .collect()
    }

    /// 每个像素提供的插槽数。
    pub fn slots_per_pixel(&self) -> usize {
        self.bits.iter().flatten().filter(|&&selected| selected).count()
    }
}

impl Default for ChannelMask {
    fn default() -> Self {
        Self::low_nibble()
    }
}

impl FromStr for ChannelMask {
    type Err = StegError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

/// 位位置 (0 为最高位) 对应的字节掩码。
pub fn bit_mask(position: usize) -> u8 {
    1 << (BITS_PER_CHANNEL - 1 - position)
}
