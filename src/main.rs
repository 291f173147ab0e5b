//! bismuth-hd 主入口
//!
//! 用法：`bismuth-hd [count] [start]`
//! 未给出参数时从索引 0 派生 `BIS_DEFAULT_COUNT` 个地址

use std::path::Path;

use anyhow::{Context, Result};
use bismuth_hd::{
    config::Config,
    infrastructure::{logging, WalletFile},
    AddressRecord, Deriver,
};

/// 新钱包使用 256 位熵（24 词）
const NEW_WALLET_STRENGTH: u32 = 256;

fn main() {
    if let Err(e) = run() {
        tracing::error!(error = %e, "bismuth-hd failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // 1. 加载环境变量与配置
    dotenvy::dotenv().ok();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "bismuth-hd.toml".into());
    let config = Config::from_env_and_file(Some(config_path.as_str()))?;
    config.validate()?;

    // 2. 初始化日志
    logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let (count, start) = parse_window(std::env::args().skip(1), config.derivation.default_count)?;

    // 3. 加载或创建钱包
    let (wallet, created) = WalletFile::load_or_create(
        Path::new(&config.wallet.path),
        NEW_WALLET_STRENGTH,
        config.derivation.checksum_policy,
    )?;
    if created {
        println!("Generated a new 24-word mnemonic in {}", config.wallet.path);
        println!("  Mnemonic: {}\n", wallet.mnemonic);
    }

    // 4. 派生并输出
    let passphrase = zeroize::Zeroizing::new(std::env::var("BIS_PASSPHRASE").unwrap_or_default());
    let deriver = Deriver::from_config(&config.derivation);
    let records = deriver.derive_addresses(&wallet.mnemonic, &passphrase, start, count)?;

    println!("Deriving {} addresses starting at index {}...", count, start);
    for (i, record) in records.iter().enumerate() {
        print_record(i + 1, record);
    }

    Ok(())
}

/// argv: [count] [start]
fn parse_window<I>(mut args: I, default_count: u32) -> Result<(u32, u32)>
where
    I: Iterator<Item = String>,
{
    let count = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid address count: {}", raw))?,
        None => default_count,
    };
    let start = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid start index: {}", raw))?,
        None => 0,
    };
    Ok((count, start))
}

fn print_record(ordinal: usize, record: &AddressRecord) {
    println!("--- Address #{} ---", ordinal);
    println!("  Address:     {}", record.address);
    println!("  Private Key: {}", record.private_key);
    println!("  Public Key:  {}", record.public_key);
    println!("  Derivation Path: {}", record.derivation_path);
}
