// ==========================================
// 纸品库存系统 - 导入命令行入口
// ==========================================
// 用法:
//   paper-inventory-import [--schema stock|consumables] [--config <path>] [--log-json] <file>...
//   paper-inventory-import --template [--schema stock|consumables]
// 输出: 每个文件的导入批次（JSON，stdout）；日志写 stderr
// 退出码: 任一文件出现作业级错误时为 1
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use paper_inventory_core::config::ConfigManager;
use paper_inventory_core::importer::{
    template_csv, ImportSchema, StockImporter, StockImporterImpl,
};
use paper_inventory_core::logging;
use std::path::PathBuf;

struct CliArgs {
    schema: String,
    config: Option<PathBuf>,
    log_json: bool,
    template: bool,
    files: Vec<PathBuf>,
}

fn parse_args() -> Result<CliArgs> {
    let mut parsed = CliArgs {
        schema: "stock".to_string(),
        config: None,
        log_json: false,
        template: false,
        files: Vec::new(),
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--schema" => {
                parsed.schema = args.next().ok_or_else(|| anyhow!("--schema 缺少参数"))?;
            }
            "--config" => {
                let path = args.next().ok_or_else(|| anyhow!("--config 缺少参数"))?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--log-json" => parsed.log_json = true,
            "--template" => parsed.template = true,
            flag if flag.starts_with("--") => bail!("未知参数: {}", flag),
            file => parsed.files.push(PathBuf::from(file)),
        }
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;

    if args.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    let schema = ImportSchema::by_name(&args.schema)
        .ok_or_else(|| anyhow!("未知导入模板: {}（可选 stock / consumables）", args.schema))?;

    if args.template {
        print!("{}", template_csv(&schema)?);
        return Ok(());
    }

    if args.files.is_empty() {
        bail!("未指定导入文件");
    }

    let config = ConfigManager::load(args.config.as_deref()).context("配置加载失败")?;
    tracing::info!(
        app = paper_inventory_core::APP_NAME,
        version = paper_inventory_core::VERSION,
        config = %config.get_config_snapshot()?,
        "启动导入"
    );

    let importer = StockImporterImpl::with_defaults(config, schema);
    let results = importer.batch_import(args.files.clone()).await;

    let mut fatal = 0;
    let mut report = Vec::with_capacity(results.len());
    for (file, result) in args.files.iter().zip(results) {
        let entry = match result {
            Ok(batch) => serde_json::json!({
                "file": file.display().to_string(),
                "summary_text": batch.summary.to_string(),
                "messages": batch.error_messages(),
                "batch": batch,
            }),
            Err(e) => {
                fatal += 1;
                serde_json::json!({
                    "file": file.display().to_string(),
                    "error": e.to_string(),
                })
            }
        };
        report.push(entry);
    }

    println!("{}", serde_json::to_string_pretty(&report)?);

    if fatal > 0 {
        std::process::exit(1);
    }
    Ok(())
}
