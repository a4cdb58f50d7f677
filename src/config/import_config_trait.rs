// ==========================================
// 纸品库存系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（配置文件 + 环境变量）、ImportSettings（固定值）
pub trait ImportConfigReader: Send + Sync {
    /// 获取单个导入文件大小上限（字节）
    ///
    /// # 默认值
    /// - 5MB
    fn get_max_file_size_bytes(&self) -> u64;

    /// 是否跳过全空行
    ///
    /// # 默认值
    /// - true
    fn get_skip_blank_rows(&self) -> bool;
}
