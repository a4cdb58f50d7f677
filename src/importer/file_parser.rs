// ==========================================
// 纸品库存系统 - 文件解析器实现
// ==========================================
// 阶段 1: 文件读取与解析（表头 + 原始文本行）
// 支持: Excel (.xlsx/.xls，仅第一个工作表) / CSV (.csv，逗号分隔)
// 红线: 解析结果与格式无关，后续校验 / 去重不感知文件类型
// ==========================================

use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::stock_importer_trait::{DataCleaner as _, FileParser};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

// ==========================================
// 原始解析结果
// ==========================================

/// 原始行记录（表头 → 清洗后文本）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub row_number: usize, // 1 起始，不含表头；按保留下来的记录顺序编号
    pub values: HashMap<String, String>,
}

impl RawRecord {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.values.get(header).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 重复表头只记录一次告警，取值时保留第一列
fn warn_duplicate_headers(headers: &[String]) {
    let mut seen = HashSet::with_capacity(headers.len());
    let mut reported = HashSet::new();
    for header in headers.iter().filter(|h| !h.is_empty()) {
        if !seen.insert(header.as_str()) && reported.insert(header.as_str()) {
            warn!(header = %header, "表头重复，仅使用第一列");
        }
    }
}

/// 按表头组装一行并追加到 records；空白行跳过且不占行号
fn push_record(
    cleaner: &DataCleaner,
    headers: &[String],
    cells: Vec<String>,
    skip_blank_rows: bool,
    records: &mut Vec<RawRecord>,
) {
    if skip_blank_rows && cleaner.is_blank_record(&cells) {
        debug!(after_row = records.len(), "跳过空白行");
        return;
    }

    let mut values = HashMap::with_capacity(headers.len());
    for (header, cell) in headers.iter().zip(cells) {
        if header.is_empty() {
            continue;
        }
        values
            .entry(header.clone())
            .or_insert_with(|| cleaner.clean_text(&cell));
    }

    records.push(RawRecord {
        row_number: records.len() + 1,
        values,
    });
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
#[derive(Debug, Clone)]
pub struct CsvParser {
    skip_blank_rows: bool,
    cleaner: DataCleaner,
}

impl CsvParser {
    pub fn new(skip_blank_rows: bool) -> Self {
        Self {
            skip_blank_rows,
            cleaner: DataCleaner,
        }
    }

    /// 从任意输入流解析（首行为表头）
    pub fn parse_reader<R: Read>(&self, input: R) -> ImportResult<RawTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(input);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| self.cleaner.clean_header(h))
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Ok(RawTable::default());
        }
        warn_duplicate_headers(&headers);

        // 行号按记录计数，引号内换行不影响编号
        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let cells = record.iter().map(str::to_string).collect();
            push_record(
                &self.cleaner,
                &headers,
                cells,
                self.skip_blank_rows,
                &mut records,
            );
        }

        Ok(RawTable { headers, records })
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FileParser for CsvParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        // 检查扩展名
        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        self.parse_reader(file)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
#[derive(Debug, Clone)]
pub struct ExcelParser {
    skip_blank_rows: bool,
    cleaner: DataCleaner,
}

impl ExcelParser {
    pub fn new(skip_blank_rows: bool) -> Self {
        Self {
            skip_blank_rows,
            cleaner: DataCleaner,
        }
    }
}

impl Default for ExcelParser {
    fn default() -> Self {
        Self::new(true)
    }
}

/// 单元格转文本: 日期统一为 YYYY-MM-DD，整数值浮点去掉小数部分
fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        // 检查扩展名
        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 仅读取第一个工作表
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))??;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| self.cleaner.clean_header(&cell_to_text(cell)))
                .collect(),
            None => return Ok(RawTable::default()),
        };
        warn_duplicate_headers(&headers);

        let mut records = Vec::new();
        for data_row in rows {
            let cells = data_row.iter().map(cell_to_text).collect();
            push_record(
                &self.cleaner,
                &headers,
                cells,
                self.skip_blank_rows,
                &mut records,
            );
        }

        Ok(RawTable { headers, records })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Debug, Clone)]
pub struct UniversalFileParser {
    csv: CsvParser,
    excel: ExcelParser,
}

impl UniversalFileParser {
    pub fn new(skip_blank_rows: bool) -> Self {
        Self {
            csv: CsvParser::new(skip_blank_rows),
            excel: ExcelParser::new(skip_blank_rows),
        }
    }

    pub fn is_supported(path: &Path) -> bool {
        matches!(extension_of(path).as_str(), "csv" | "xlsx" | "xls")
    }
}

impl Default for UniversalFileParser {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FileParser for UniversalFileParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        match extension_of(file_path).as_str() {
            "csv" => self.csv.parse_to_raw_table(file_path),
            "xlsx" | "xls" => self.excel.parse_to_raw_table(file_path),
            ext => Err(ImportError::UnsupportedFormat(ext.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let file = csv_file(&[
            "Date,ItemCode,Unit",
            "2024-01-15, PAPER001 ,ream",
            "2024-01-16,PAPER002,sheet",
        ]);

        let table = CsvParser::default().parse_to_raw_table(file.path()).unwrap();

        assert_eq!(table.headers, vec!["Date", "ItemCode", "Unit"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].row_number, 1);
        assert_eq!(table.records[0].get("ItemCode"), Some("PAPER001"));
        assert_eq!(table.records[1].get("Unit"), Some("sheet"));
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser::default().parse_to_raw_table(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    fn row_numbers(table: &RawTable) -> Vec<usize> {
        table.records.iter().map(|r| r.row_number).collect()
    }

    #[test]
    fn test_csv_blank_rows_skipped_and_not_numbered() {
        // 逗号空行与真正的空行编号规则一致
        let table = CsvParser::default()
            .parse_reader("ItemCode,Qty\nA,1\n,\nB,2\n\nC,3\n".as_bytes())
            .unwrap();

        assert_eq!(table.records.len(), 3);
        assert_eq!(row_numbers(&table), vec![1, 2, 3]);
        assert_eq!(table.records[2].get("ItemCode"), Some("C"));
    }

    #[test]
    fn test_csv_blank_rows_kept_when_configured() {
        let table = CsvParser::new(false)
            .parse_reader("ItemCode,Qty\nA,1\n,\nB,2\n".as_bytes())
            .unwrap();
        assert_eq!(table.records.len(), 3);
        assert_eq!(row_numbers(&table), vec![1, 2, 3]);
    }

    #[test]
    fn test_csv_multiline_quoted_cell_keeps_record_numbering() {
        let input = "ItemCode,Remark\nP1,\"line one\nline two\nline three\"\nP2,\nP3,ok\n";
        let table = CsvParser::default().parse_reader(input.as_bytes()).unwrap();

        assert_eq!(row_numbers(&table), vec![1, 2, 3]);
        assert_eq!(
            table.records[0].get("Remark"),
            Some("line one\nline two\nline three")
        );
        assert_eq!(table.records[1].get("ItemCode"), Some("P2"));
    }

    #[test]
    fn test_csv_duplicate_header_keeps_first_column() {
        let table = CsvParser::default()
            .parse_reader("ItemCode,Qty,Qty\nA,1,9\n".as_bytes())
            .unwrap();
        assert_eq!(table.headers, vec!["ItemCode", "Qty", "Qty"]);
        assert_eq!(table.records[0].get("Qty"), Some("1"));
    }

    #[test]
    fn test_csv_short_row_and_bom_header() {
        let table = CsvParser::default()
            .parse_reader("\u{feff}Date,Item,Remark\n2024-01-15,Glue\n".as_bytes())
            .unwrap();

        assert_eq!(table.headers[0], "Date");
        assert_eq!(table.records[0].get("Item"), Some("Glue"));
        assert_eq!(table.records[0].get("Remark"), None);
    }

    #[test]
    fn test_csv_empty_input() {
        let table = CsvParser::default().parse_reader("".as_bytes()).unwrap();
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = UniversalFileParser::default().parse_to_raw_table(file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"));
    }

    #[test]
    fn test_corrupt_spreadsheet_is_parse_error() {
        let mut file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        writeln!(file, "this is not a zip archive").unwrap();
        let result = UniversalFileParser::default().parse_to_raw_table(file.path());
        assert!(matches!(result, Err(ImportError::ExcelParseError(_))));
    }

    #[test]
    fn test_cell_to_text() {
        assert_eq!(cell_to_text(&Data::Float(80.0)), "80");
        assert_eq!(cell_to_text(&Data::Float(2.25)), "2.25");
        assert_eq!(cell_to_text(&Data::Int(5)), "5");
        assert_eq!(cell_to_text(&Data::String("ream".to_string())), "ream");
        assert_eq!(cell_to_text(&Data::Empty), "");
    }
}
