//! # 位平面隐写核心
//!
//! 两种模式共用同一套扫描顺序：外层遍历 `x`，内层遍历 `y`。
//!
//! * 固定 4 位模式：[`merge`] 将载体通道的高半字节与隐藏图像通道的高半字节拼接，
//!   [`unmerge`] / [`unmerge_cropped`] 还原隐藏图像。
//! * 可配置掩码模式：[`insert_hex`] 把十六进制负载写入 [`ChannelMask`] 选中的位，
//!   [`get_hex_code`] 按相同的掩码、偏移和顺序读回。

use log::{debug, trace};

use crate::constants::{BITS_PER_HEX_DIGIT, HIGH_NIBBLE, LOW_NIBBLE, NIBBLE_SHIFT};
use crate::error::StegError;
use crate::grid::{Channels, PixelGrid};
use crate::hex::{bits_to_hex, hex_to_bits};
use crate::mask::{ChannelMask, bit_mask};

const BLACK: Channels = [0, 0, 0];

/// 将 `payload` 隐藏到 `carrier` 中，返回新的、完全不透明的网格。
///
/// 每个通道的输出字节为 `(carrier & 0xF0) | (payload >> 4)`。
/// 超出 `payload` 范围的坐标按黑色像素处理。两个输入都不会被修改。
///
/// # Errors
///
/// `payload` 在任一方向上大于 `carrier` 时返回 [`StegError::Dimension`]。
pub fn merge<G, P>(carrier: &G, payload: &P) -> Result<G, StegError>
where
    G: PixelGrid,
    P: PixelGrid,
{
    let (width, height) = carrier.dimensions();
    let (payload_width, payload_height) = payload.dimensions();

    if payload_width > width || payload_height > height {
        return Err(StegError::Dimension {
            carrier: (width, height),
            payload: (payload_width, payload_height),
        });
    }

    let mut merged = G::blank(width, height);
    for x in 0..width {
        for y in 0..height {
            let hidden = if x < payload_width && y < payload_height {
                payload.get(x, y)
            } else {
                BLACK
            };
            merged.set(x, y, merge_channels(carrier.get(x, y), hidden));
        }
    }

    debug!("merged {payload_width}x{payload_height} payload into {width}x{height} carrier");
    Ok(merged)
}

/// 取出每个通道的低半字节并移到高半字节，得到隐藏图像。尺寸与输入相同。
pub fn unmerge<G: PixelGrid>(merged: &G) -> G {
    map_channels(merged, |byte| (byte & LOW_NIBBLE) << NIBBLE_SHIFT)
}

/// 与 [`unmerge`] 相同，但会把结果裁剪到扫描顺序中最后一个非黑像素处。
///
/// 记录的尺寸初始为整幅图像，只在遇到非黑像素时更新为 `(x + 1, y + 1)`。
/// 因此全黑的隐藏图像不会被裁剪，保持原尺寸。
pub fn unmerge_cropped<G: PixelGrid>(merged: &G) -> G {
    let (width, height) = merged.dimensions();
    let mut extracted = G::blank(width, height);
    let mut size = (width, height);

    for x in 0..width {
        for y in 0..height {
            let rgb = merged
                .get(x, y)
                .map(|byte| (byte & LOW_NIBBLE) << NIBBLE_SHIFT);
            extracted.set(x, y, rgb);
            if rgb != BLACK {
                size = (x + 1, y + 1);
            }
        }
    }

    if size == (width, height) {
        return extracted;
    }

    debug!("cropping extracted image from {width}x{height} to {}x{}", size.0, size.1);
    crop(&extracted, size.0, size.1)
}

/// 清除每个通道的低半字节，得到合并后仍可见的载体图像。
pub fn carrier_remnant<G: PixelGrid>(merged: &G) -> G {
    map_channels(merged, |byte| byte & HIGH_NIBBLE)
}

/// 从 `(x0, y0)` 开始、按 `mask` 计算的可用插槽总数。
///
/// 偏移超出图像边界时，对应的跨度按 0 计算。
pub fn hex_capacity(width: u32, height: u32, x0: u32, y0: u32, mask: &ChannelMask) -> usize {
    let columns = width.saturating_sub(x0) as usize;
    let rows = height.saturating_sub(y0) as usize;
    columns
        .saturating_mul(rows)
        .saturating_mul(mask.slots_per_pixel())
}

/// 把十六进制负载写入 `image` 中 `mask` 选中的位，从 `(x0, y0)` 开始原地修改。
///
/// 负载写完后立即停止，其余像素保持不变。
///
/// # Errors
///
/// * `hex_code` 含非法字符时返回 [`StegError::Validation`]。
/// * 负载位数超过 [`hex_capacity`] 时返回 [`StegError::Capacity`]。
///
/// 两种情况下图像都不会被修改。
pub fn insert_hex<G: PixelGrid>(
    image: &mut G,
    hex_code: &str,
    x0: u32,
    y0: u32,
    mask: &ChannelMask,
) -> Result<(), StegError> {
    let slots = mask.slots();
    let bits = hex_to_bits(hex_code)?;

    let (width, height) = image.dimensions();
    let available = hex_capacity(width, height, x0, y0, mask);
    if available < bits.len() {
        return Err(StegError::Capacity {
            required: bits.len(),
            available,
        });
    }

    if bits.is_empty() {
        return Ok(());
    }

    let mut payload = bits.iter().copied();
    for x in x0..width {
        for y in y0..height {
            let mut rgb = image.get(x, y);
            let mut exhausted = false;

            for &(channel, position) in &slots {
                match payload.next() {
                    Some(bit) => {
                        let flag = bit_mask(position);
                        rgb[channel] = if bit {
                            rgb[channel] | flag
                        } else {
                            rgb[channel] & !flag
                        };
                    }
                    None => {
                        exhausted = true;
                        break;
                    }
                }
            }

            image.set(x, y, rgb);
            if exhausted || payload.len() == 0 {
                trace!("payload ended at pixel ({x}, {y})");
                return Ok(());
            }
        }
    }

    Ok(())
}

/// 从 `(x0, y0)` 开始按 `mask` 读取 `hex_length` 个十六进制字符。
///
/// 扫描区域先耗尽时返回较短的字符串，由调用方判断长度是否一致。
/// `hex_length` 可以任意大，实际读取的位数不会超过 [`hex_capacity`]。
/// 空掩码或 `hex_length == 0` 返回空字符串。
pub fn get_hex_code<G: PixelGrid>(
    image: &G,
    hex_length: usize,
    x0: u32,
    y0: u32,
    mask: &ChannelMask,
) -> String {
    let slots = mask.slots();
    let wanted = hex_length.saturating_mul(BITS_PER_HEX_DIGIT);

    let (width, height) = image.dimensions();
    let mut bits = Vec::with_capacity(wanted.min(hex_capacity(width, height, x0, y0, mask)));
    'scan: for x in x0..width {
        for y in y0..height {
            if bits.len() == wanted {
                break 'scan;
            }
            let rgb = image.get(x, y);
            for &(channel, position) in &slots {
                if bits.len() == wanted {
                    break 'scan;
                }
                bits.push(rgb[channel] & bit_mask(position) != 0);
            }
        }
    }

    if bits.len() < wanted {
        debug!("scan region exhausted after {} of {wanted} bits", bits.len());
    }
    bits_to_hex(&bits)
}

fn merge_channels(carrier: Channels, hidden: Channels) -> Channels {
    [0, 1, 2].map(|i| (carrier[i] & HIGH_NIBBLE) | (hidden[i] >> NIBBLE_SHIFT))
}

fn map_channels<G: PixelGrid>(source: &G, f: impl Fn(u8) -> u8) -> G {
    let (width, height) = source.dimensions();
    let mut output = G::blank(width, height);
    for x in 0..width {
        for y in 0..height {
            output.set(x, y, source.get(x, y).map(&f));
        }
    }
    output
}

fn crop<G: PixelGrid>(source: &G, width: u32, height: u32) -> G {
    let mut cropped = G::blank(width, height);
    for x in 0..width {
        for y in 0..height {
            cropped.set(x, y, source.get(x, y));
        }
    }
    cropped
}
