use image::{ImageBuffer, Rgba, RgbaImage};
use lsb_merge::{
    cli::{GetHexCodeArgs, InsertHexArgs, MergeArgs, UnmergeArgs},
    handler::{handle_get_hex_code, handle_insert_hex, handle_merge, handle_unmerge},
    mask::ChannelMask,
};
use rand::RngCore;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的测试图像
fn create_test_image(path: &Path, width: u32, height: u32) -> RgbaImage {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(4))
        .for_each(|(pixel, chunk)| {
            // 最高位置 1，保证隐藏后的像素不会是黑色
            *pixel = Rgba([chunk[0] | 0x80, chunk[1], chunk[2], 255]);
        });

    img_buf.save(path).expect("Failed to create test image.");
    img_buf
}

fn insert_args(img: &Path, hex_code: &str, output: Option<&Path>) -> InsertHexArgs {
    InsertHexArgs {
        img: img.to_path_buf(),
        hex_code: hex_code.to_string(),
        output: output.map(Path::to_path_buf),
        x: 0,
        y: 0,
        rgb: ChannelMask::default(),
        force: false,
    }
}

fn get_args(img: &Path, hex_length: usize) -> GetHexCodeArgs {
    GetHexCodeArgs {
        img: img.to_path_buf(),
        hex_length,
        x: 0,
        y: 0,
        rgb: ChannelMask::default(),
    }
}

/// 验证从合并到分离的完整流程
#[test]
fn test_handle_merge_and_unmerge_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let secret_path = dir.path().join("secret.png");
    let merged_path = dir.path().join("merged.png");
    let recovered_path = dir.path().join("recovered.png");

    create_test_image(&carrier_path, 64, 48);
    let secret = create_test_image(&secret_path, 20, 16);

    // 2. 测试 handle_merge
    handle_merge(MergeArgs {
        image1: carrier_path.clone(),
        image2: secret_path.clone(),
        output: Some(merged_path.clone()),
        force: false,
    })?;
    assert!(merged_path.exists(), "Merged image should be created.");

    // 3. 测试 handle_unmerge
    handle_unmerge(UnmergeArgs {
        image: merged_path.clone(),
        output: Some(recovered_path.clone()),
        carrier_output: None,
        no_crop: false,
        force: false,
    })?;

    // 4. 验证结果：裁剪回隐藏图像的尺寸，且每个通道保留高 4 位
    let recovered = image::open(&recovered_path)?.to_rgba8();
    assert_eq!(recovered.dimensions(), (20, 16));
    for (x, y, pixel) in recovered.enumerate_pixels() {
        let original = secret.get_pixel(x, y);
        for c in 0..3 {
            assert_eq!(pixel[c], original[c] & 0xF0, "pixel ({x}, {y}) channel {c}");
        }
    }

    Ok(())
}

/// 验证 `--no-crop` 与 `--carrier-output` 的输出
#[test]
fn test_handle_unmerge_without_crop_and_with_carrier() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let secret_path = dir.path().join("secret.png");
    let merged_path = dir.path().join("merged.png");
    let recovered_path = dir.path().join("recovered.png");
    let remnant_path = dir.path().join("remnant.bmp");

    let carrier = create_test_image(&carrier_path, 30, 30);
    create_test_image(&secret_path, 10, 10);

    handle_merge(MergeArgs {
        image1: carrier_path,
        image2: secret_path,
        output: Some(merged_path.clone()),
        force: false,
    })?;

    handle_unmerge(UnmergeArgs {
        image: merged_path,
        output: Some(recovered_path.clone()),
        carrier_output: Some(remnant_path.clone()),
        no_crop: true,
        force: false,
    })?;

    let recovered = image::open(&recovered_path)?.to_rgba8();
    assert_eq!(recovered.dimensions(), (30, 30));
    assert_eq!(recovered.get_pixel(25, 25), &Rgba([0, 0, 0, 255]));

    let remnant = image::open(&remnant_path)?.to_rgba8();
    for (x, y, pixel) in remnant.enumerate_pixels() {
        let original = carrier.get_pixel(x, y);
        for c in 0..3 {
            assert_eq!(pixel[c], original[c] & 0xF0);
        }
    }

    Ok(())
}

/// 验证隐藏图像大于载体图像时的错误处理
#[test]
fn test_handle_merge_payload_too_large() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("small.png");
    let secret_path = dir.path().join("large.png");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&carrier_path, 10, 10);
    create_test_image(&secret_path, 10, 11);

    let result = handle_merge(MergeArgs {
        image1: carrier_path,
        image2: secret_path,
        output: Some(dest_path.clone()),
        force: false,
    });

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("Image 2 should not be larger than Image 1!"));
    }
    assert!(!dest_path.exists(), "No output should be written on failure.");

    Ok(())
}

/// 验证十六进制数据的写入与读取
#[test]
fn test_handle_insert_and_get_hex_code_integration() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let hexed_path = dir.path().join("hexed.png");

    create_test_image(&image_path, 40, 40);
    let mask = ChannelMask::from_json(
        "[[0,0,0,0,0,0,1,1],[0,0,0,0,0,0,0,1],[1,0,0,0,0,0,0,1]]",
    )?;
    let hex_code = "00deadbeef0123456789abcdef";

    handle_insert_hex(InsertHexArgs {
        x: 7,
        y: 3,
        rgb: mask,
        ..insert_args(&image_path, hex_code, Some(&hexed_path))
    })?;

    let pattern = handle_get_hex_code(GetHexCodeArgs {
        x: 7,
        y: 3,
        rgb: mask,
        ..get_args(&hexed_path, hex_code.len())
    })?;
    assert_eq!(pattern, hex_code);

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径
#[test]
fn test_handle_insert_hex_with_defaults() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("original.png");

    create_test_image(&image_path, 16, 16);
    handle_insert_hex(insert_args(&image_path, "cafe", None))?;

    let expected_path = dir.path().join("doctored_original.png");
    assert!(
        expected_path.exists(),
        "Default output image should be created at: {:?}",
        expected_path
    );
    assert_eq!(handle_get_hex_code(get_args(&expected_path, 4))?, "cafe");

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 20, 20);
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let result = handle_insert_hex(insert_args(&image_path, "ab", Some(&dest_path)));
    assert!(result.is_err(), "Execution should fail without --force when file exists.");
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    let result = handle_insert_hex(InsertHexArgs {
        force: true,
        ..insert_args(&image_path, "ab", Some(&dest_path))
    });
    assert!(result.is_ok(), "Execution should succeed with --force when file exists.");

    let content = fs::read(&dest_path)?;
    assert_ne!(content, b"this is a dummy file to be overwritten");

    Ok(())
}

/// 验证空间不足时的错误处理，且不会写出任何文件
#[test]
fn test_handle_insert_hex_not_enough_space() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("small.png");
    let dest_path = dir.path().join("dest.png");

    // 4x4 像素 * 12 位 = 192 位，容纳不下 100 个十六进制字符
    create_test_image(&image_path, 4, 4);
    let result = handle_insert_hex(insert_args(&image_path, &"a".repeat(100), Some(&dest_path)));

    assert!(result.is_err());
    if let Err(e) = result {
        let message = format!("{e:#}");
        assert!(message.contains("Not enough space"));
        assert!(message.contains("too large for insertion space"));
    }
    assert!(!dest_path.exists());

    Ok(())
}

/// 验证扫描区域不足时只返回较短的结果而不报错
#[test]
fn test_handle_get_hex_code_shorter_than_requested() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let hexed_path = dir.path().join("hexed.png");

    create_test_image(&image_path, 5, 5);
    handle_insert_hex(InsertHexArgs {
        x: 4,
        y: 4,
        ..insert_args(&image_path, "f0e", Some(&hexed_path))
    })?;

    // 最后一个像素只提供 12 位，即 3 个字符
    let pattern = handle_get_hex_code(GetHexCodeArgs {
        x: 4,
        y: 4,
        ..get_args(&hexed_path, 8)
    })?;
    assert_eq!(pattern, "f0e");

    Ok(())
}

/// 验证请求的长度远超图像容量时仍返回整幅区域的结果
#[test]
fn test_handle_get_hex_code_with_huge_length() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let hexed_path = dir.path().join("hexed.png");

    create_test_image(&image_path, 1, 2);
    handle_insert_hex(insert_args(&image_path, "123456", Some(&hexed_path)))?;

    let pattern = handle_get_hex_code(get_args(&hexed_path, 1 << 40))?;
    assert_eq!(pattern, "123456");

    Ok(())
}

/// 验证 RGB 载体合并后仍输出 RGB 图像
#[test]
fn test_handle_merge_keeps_rgb_carrier_kind() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let secret_path = dir.path().join("secret.png");
    let merged_path = dir.path().join("merged.png");

    let carrier = create_test_image(&carrier_path, 12, 12);
    image::DynamicImage::ImageRgba8(carrier)
        .to_rgb8()
        .save(&carrier_path)?;
    create_test_image(&secret_path, 6, 6);

    handle_merge(MergeArgs {
        image1: carrier_path,
        image2: secret_path,
        output: Some(merged_path.clone()),
        force: false,
    })?;

    let merged = image::open(&merged_path)?;
    assert_eq!(merged.color(), image::ColorType::Rgb8);
    assert_eq!((merged.width(), merged.height()), (12, 12));

    Ok(())
}

/// 验证恢复图像与载体图像不能写到同一路径
#[test]
fn test_handle_unmerge_rejects_shared_output_path() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let merged_path = dir.path().join("merged.png");
    let output_path = dir.path().join("out.png");

    create_test_image(&merged_path, 8, 8);

    let result = handle_unmerge(UnmergeArgs {
        image: merged_path,
        output: Some(output_path.clone()),
        carrier_output: Some(output_path.clone()),
        no_crop: false,
        force: false,
    });

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("cannot share one output path"));
    }
    assert!(!output_path.exists());

    Ok(())
}
