// ==========================================
// 纸品库存系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、环境变量覆写
// 存储: JSON 配置文件（扁平 key-value），缺省时使用内置默认值
// 优先级: 环境变量 > 配置文件 > 默认值
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// 环境变量前缀: PAPER_INVENTORY_<KEY 大写>
pub const ENV_PREFIX: &str = "PAPER_INVENTORY_";

// ==========================================
// 配置错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误 ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// ==========================================
// 导入配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSettings {
    pub max_file_size_bytes: u64,
    pub skip_blank_rows: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 5 * 1024 * 1024, // 5MB
            skip_blank_rows: true,
        }
    }
}

impl ImportConfigReader for ImportSettings {
    fn get_max_file_size_bytes(&self) -> u64 {
        self.max_file_size_bytes
    }

    fn get_skip_blank_rows(&self) -> bool {
        self.skip_blank_rows
    }
}

// ==========================================
// 表格配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSettings {
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            page_size_options: vec![5, 10, 25, 50],
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: BTreeMap<String, String>,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 仅使用默认值
    pub fn new() -> Self {
        Self::default()
    }

    /// 加载配置
    ///
    /// # 参数
    /// - path: 显式指定的配置文件（必须存在）；None 时尝试默认路径，不存在则使用默认值
    ///
    /// # 说明
    /// 加载后统一应用环境变量覆写
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut manager = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => {
                    debug!("未找到配置文件，使用默认配置");
                    Self::new()
                }
            },
        };

        manager.apply_overrides(std::env::vars());
        Ok(manager)
    }

    /// 从 JSON 文件读取（扁平对象，值可为字符串 / 数字 / 布尔 / 数组）
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;

        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path_str.clone(),
                source,
            })?;

        let values = map
            .into_iter()
            .map(|(k, v)| {
                let value = match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, value)
            })
            .collect();

        info!(path = %path_str, "配置文件加载完成");
        Ok(Self {
            values,
            source: Some(path.to_path_buf()),
        })
    }

    /// 默认配置路径: <系统配置目录>/paper-inventory/config.json
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("paper-inventory").join("config.json"))
    }

    /// 应用覆写（环境变量形式: PAPER_INVENTORY_MAX_FILE_SIZE_MB=10）
    pub fn apply_overrides<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            if let Some(key) = name.strip_prefix(ENV_PREFIX) {
                let key = key.to_lowercase();
                debug!(key = %key, "环境变量覆写配置");
                self.values.insert(key, value);
            }
        }
    }

    pub fn set_config_value(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// 读取配置值
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 读取并解析配置值，缺失或格式错误时使用默认值
    fn get_parsed_or_default<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        match self.get_config_value(key) {
            None => default,
            Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
                warn!(config_key = key, raw_value = %raw, "配置值格式错误，使用默认值");
                default
            }),
        }
    }

    pub fn import_settings(&self) -> ImportSettings {
        let defaults = ImportSettings::default();
        let max_mb = self.get_parsed_or_default::<u64>(config_keys::MAX_FILE_SIZE_MB, 0);
        ImportSettings {
            max_file_size_bytes: if max_mb > 0 {
                max_mb.saturating_mul(1024 * 1024)
            } else {
                defaults.max_file_size_bytes
            },
            skip_blank_rows: self
                .get_parsed_or_default(config_keys::SKIP_BLANK_ROWS, defaults.skip_blank_rows),
        }
    }

    pub fn table_settings(&self) -> TableSettings {
        let defaults = TableSettings::default();

        let default_page_size = match self
            .get_parsed_or_default::<usize>(config_keys::DEFAULT_PAGE_SIZE, 0)
        {
            0 => defaults.default_page_size,
            n => n,
        };

        let page_size_options = self
            .get_config_value(config_keys::PAGE_SIZE_OPTIONS)
            .and_then(|raw| match serde_json::from_str::<Vec<usize>>(raw) {
                Ok(v) if !v.is_empty() && v.iter().all(|&n| n > 0) => Some(v),
                _ => {
                    warn!(
                        config_key = config_keys::PAGE_SIZE_OPTIONS,
                        raw_value = %raw,
                        "页大小选项格式错误，使用默认值"
                    );
                    None
                }
            })
            .unwrap_or(defaults.page_size_options);

        TableSettings {
            default_page_size,
            page_size_options,
        }
    }

    /// 生效配置快照（JSON），用于诊断输出
    pub fn get_config_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&serde_json::json!({
            "import": self.import_settings(),
            "table": self.table_settings(),
        }))
    }
}

impl ImportConfigReader for ConfigManager {
    fn get_max_file_size_bytes(&self) -> u64 {
        self.import_settings().max_file_size_bytes
    }

    fn get_skip_blank_rows(&self) -> bool {
        self.import_settings().skip_blank_rows
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 导入
    pub const MAX_FILE_SIZE_MB: &str = "max_file_size_mb";
    pub const SKIP_BLANK_ROWS: &str = "skip_blank_rows";

    // 表格
    pub const DEFAULT_PAGE_SIZE: &str = "default_page_size";
    pub const PAGE_SIZE_OPTIONS: &str = "page_size_options"; // JSON 数组
}
