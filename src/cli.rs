//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::Parser;
use std::path::PathBuf;

use crate::constants::DEFAULT_MASK_JSON;
use crate::mask::ChannelMask;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于把一幅图像或一段十六进制数据隐藏到另一幅图像的位平面中。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于把一幅图像或一段十六进制数据隐藏到另一幅图像的位平面中。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 把第二幅图像隐藏到第一幅图像的低 4 位中。
    Merge(MergeArgs),

    /// 从合并后的图像中恢复被隐藏的图像。
    Unmerge(UnmergeArgs),

    /// 按通道掩码把十六进制数据写入图像。
    InsertHex(InsertHexArgs),

    /// 按通道掩码从图像中读取十六进制数据。
    GetHexCode(GetHexCodeArgs),
}

/// 'merge' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// 用于隐藏另一幅图像的载体图像路径。
    #[arg(long)]
    pub image1: PathBuf,

    /// 将被隐藏的图像路径，尺寸不能超过载体图像。
    #[arg(long)]
    pub image2: PathBuf,

    /// 结果图像的输出路径。默认为载体图像旁的 `merged_<文件名>.png`。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'unmerge' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct UnmergeArgs {
    /// 已隐藏图像的合并图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复出的图像的输出路径。默认为输入旁的 `recovered_<文件名>.png`。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 同时保存去除隐藏数据后的载体图像。
    #[arg(long)]
    pub carrier_output: Option<PathBuf>,

    /// 不按最后一个非黑像素裁剪恢复出的图像。
    #[arg(long)]
    pub no_crop: bool,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'insert-hex' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct InsertHexArgs {
    /// 要写入十六进制数据的图像路径。
    #[arg(long)]
    pub img: PathBuf,

    /// 要写入的十六进制字符串。
    #[arg(long, alias = "hex_code")]
    pub hex_code: String,

    /// 结果图像的输出路径。默认为输入旁的 `doctored_<文件名>.png`。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 开始写入的像素 X 坐标。
    #[arg(long, default_value_t = 0)]
    pub x: u32,

    /// 开始写入的像素 Y 坐标。
    #[arg(long, default_value_t = 0)]
    pub y: u32,

    /// 3x8 的 JSON 数组 (0/1)，指定每个通道中哪些位被覆盖。默认为每个通道的低 4 位。
    #[arg(long, default_value = DEFAULT_MASK_JSON)]
    pub rgb: ChannelMask,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'get-hex-code' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct GetHexCodeArgs {
    /// 要读取十六进制数据的图像路径。
    #[arg(long)]
    pub img: PathBuf,

    /// 要读取的十六进制字符数。
    #[arg(long, alias = "hex_length")]
    pub hex_length: usize,

    /// 开始读取的像素 X 坐标。
    #[arg(long, default_value_t = 0)]
    pub x: u32,

    /// 开始读取的像素 Y 坐标。
    #[arg(long, default_value_t = 0)]
    pub y: u32,

    /// 3x8 的 JSON 数组 (0/1)，必须与写入时使用的掩码一致。
    #[arg(long, default_value = DEFAULT_MASK_JSON)]
    pub rgb: ChannelMask,
}
