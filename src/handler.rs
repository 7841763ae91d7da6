//! # 命令处理逻辑模块
//!
//! 包含处理 `merge`、`unmerge`、`insert-hex` 和 `get-hex-code` 子命令的高级业务逻辑。
//! 本模块负责协调图像文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{GetHexCodeArgs, InsertHexArgs, MergeArgs, UnmergeArgs};
use crate::constants::{DEFAULT_OUTPUT_EXTENSION, DOCTORED_PREFIX, MERGED_PREFIX, RECOVERED_PREFIX};
use crate::steganography::{
    carrier_remnant, get_hex_code, hex_capacity, insert_hex, merge, unmerge, unmerge_cropped,
};
use anyhow::{Context, Result};
use colored::Colorize;
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// 处理 'Merge' 命令的执行逻辑。
///
/// 读取载体图像和要隐藏的图像，把后者的高 4 位写入前者的低 4 位，
/// 然后保存结果图像。结果与载体图像的类型一致：带 Alpha 的载体输出 RGBA8，
/// 否则输出 RGB8。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取任一输入图像。
/// * 要隐藏的图像大于载体图像。
/// * 输出文件已存在且未指定 `--force`。
/// * 无法写入到目标图像文件。
pub fn handle_merge(args: MergeArgs) -> Result<()> {
    let output = resolve_output(args.output, &args.image1, MERGED_PREFIX, args.force)?;

    let carrier = open_image(&args.image1)?;
    let payload = load_image(&args.image2)?;

    let merged = if carrier.color().has_alpha() {
        merge(&carrier.to_rgba8(), &payload).map(DynamicImage::ImageRgba8)
    } else {
        merge(&carrier.to_rgb8(), &payload).map(DynamicImage::ImageRgb8)
    }
    .with_context(|| {
        format!(
            "Unable to hide {} inside {}",
            args.image2.to_string_lossy().red().bold(),
            args.image1.to_string_lossy().red().bold()
        )
    })?;

    save_image(merged, &output)?;

    println!(
        "The image has been successfully hidden and saved: {}",
        output.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Unmerge' 命令的执行逻辑。
///
/// 从合并图像的低 4 位恢复隐藏图像，默认裁剪到最后一个非黑像素。
/// 指定 `--carrier-output` 时，同时保存清除了低 4 位的载体图像。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入图像。
/// * `--output` 与 `--carrier-output` 指向同一路径。
/// * 输出文件已存在且未指定 `--force`。
/// * 无法写入到目标图像文件。
pub fn handle_unmerge(args: UnmergeArgs) -> Result<()> {
    let output = resolve_output(args.output, &args.image, RECOVERED_PREFIX, args.force)?;
    let carrier_output = args
        .carrier_output
        .map(|path| resolve_output(Some(path), &args.image, "", args.force))
        .transpose()?;

    anyhow::ensure!(
        carrier_output.as_ref() != Some(&output),
        "The recovered image and the carrier image cannot share one output path: {}",
        output.to_string_lossy().red().bold()
    );

    let merged = load_image(&args.image)?;

    let extracted = if args.no_crop {
        unmerge(&merged)
    } else {
        unmerge_cropped(&merged)
    };
    info!(
        "extracted a {}x{} image from {}",
        extracted.width(),
        extracted.height(),
        args.image.display()
    );

    save_image(extracted, &output)?;

    println!(
        "The hidden image has been successfully recovered and saved: {}",
        output.to_string_lossy().green().bold()
    );

    if let Some(path) = carrier_output {
        save_image(carrier_remnant(&merged), &path)?;
        println!(
            "The carrier image has been saved: {}",
            path.to_string_lossy().green().bold()
        );
    }

    Ok(())
}

/// 处理 'InsertHex' 命令的执行逻辑。
///
/// 按掩码把十六进制数据从指定坐标开始写入图像，然后保存结果图像。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入图像。
/// * 十六进制字符串非法，或图像在给定掩码和偏移下没有足够的空间。
/// * 输出文件已存在且未指定 `--force`。
/// * 无法写入到目标图像文件。
pub fn handle_insert_hex(args: InsertHexArgs) -> Result<()> {
    let output = resolve_output(args.output, &args.img, DOCTORED_PREFIX, args.force)?;

    let mut picture = load_image(&args.img)?;

    let available = hex_capacity(picture.width(), picture.height(), args.x, args.y, &args.rgb);
    debug!(
        "{} slots per pixel, {available} bits available from ({}, {})",
        args.rgb.slots_per_pixel(),
        args.x,
        args.y
    );

    insert_hex(&mut picture, &args.hex_code, args.x, args.y, &args.rgb).with_context(|| {
        format!(
            "Not enough space or invalid hex code for {}. \nAvailable bits: {}",
            args.img.to_string_lossy().red().bold(),
            available.to_string().green().bold()
        )
    })?;

    save_image(picture, &output)?;

    println!(
        "The hex code has been successfully inserted and saved: {}",
        output.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'GetHexCode' 命令的执行逻辑。
///
/// 按掩码从指定坐标开始读取十六进制数据并打印。若读取到的长度与请求不一致，
/// 只打印提示，不视为错误。
///
/// # Errors
///
/// 无法读取输入图像时返回错误。
pub fn handle_get_hex_code(args: GetHexCodeArgs) -> Result<String> {
    let picture = load_image(&args.img)?;

    let pattern = get_hex_code(&picture, args.hex_length, args.x, args.y, &args.rgb);

    println!("Extracted pattern: \n\n{}", pattern.green().bold());
    if pattern.len() != args.hex_length {
        println!(
            "{}",
            format!(
                "Extracted pattern doesn't match hex_length ({} != {}). This can be caused by placing X & Y too far into the image.",
                pattern.len(),
                args.hex_length
            )
            .yellow()
        );
    }

    Ok(pattern)
}

/// 读取图像文件，保留其原始颜色类型。
fn open_image(path: &Path) -> Result<DynamicImage> {
    let picture = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    debug!("loaded {} ({:?})", path.display(), picture.color());
    Ok(picture)
}

/// 读取图像文件并转换为 RGBA8，保留原有的 Alpha 通道。
fn load_image(path: &Path) -> Result<RgbaImage> {
    open_image(path).map(|picture| picture.to_rgba8())
}

/// 按输出路径的扩展名保存图像。JPEG 不支持 Alpha，会先转换为 RGB8。
fn save_image(picture: impl Into<DynamicImage>, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path).with_context(|| {
        format!(
            "Unsupported output image format: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    let picture: DynamicImage = picture.into();
    let result = if format == ImageFormat::Jpeg {
        warn!(
            "{} is a lossy format, hidden bits will not survive compression",
            path.display()
        );
        picture.to_rgb8().save_with_format(path, format)
    } else {
        picture.save_with_format(path, format)
    };

    result.with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// 确定输出路径。
///
/// 未指定时，在输入文件旁生成 `<前缀><文件名>.png`。
/// 目标文件已存在且未指定 `force` 时返回错误。
fn resolve_output(
    output: Option<PathBuf>,
    input: &Path,
    prefix: &str,
    force: bool,
) -> Result<PathBuf> {
    let output = match output {
        Some(path) => path,
        None => {
            let stem = input
                .file_stem()
                .with_context(|| {
                    format!(
                        "Unable to derive an output file name from: {}",
                        input.to_string_lossy().red().bold()
                    )
                })?
                .to_string_lossy();
            input.with_file_name(format!("{prefix}{stem}.{DEFAULT_OUTPUT_EXTENSION}"))
        }
    };

    anyhow::ensure!(
        force || !output.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        output.to_string_lossy().red().bold()
    );

    Ok(output)
}
