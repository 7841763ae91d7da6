use clap::Parser;
use env_logger::Env;

use lsb_merge::{
    cli::{Cli, Commands},
    handler::{handle_get_hex_code, handle_insert_hex, handle_merge, handle_unmerge},
};

/// 程序的主入口点
///
/// 负责初始化日志、解析命令行参数，并根据指定的子命令
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 默认只输出警告，可通过 RUST_LOG 调整
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    // 解析命令行参数
    let cli = Cli::parse();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Merge(args) => handle_merge(args),
        Commands::Unmerge(args) => handle_unmerge(args),
        Commands::InsertHex(args) => handle_insert_hex(args),
        Commands::GetHexCode(args) => handle_get_hex_code(args).map(|_| ()),
    }
}
