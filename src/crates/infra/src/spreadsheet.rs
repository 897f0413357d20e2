use application::import::RawRow;
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("file is empty")]
    Empty,
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("xlsx parse error: {0}")]
    Xlsx(String),
}

/// XLSX 本质是 ZIP，按魔数识别
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];

/// 解出表格行：列名 → 单元格文本
///
/// 支持 CSV 与 XLSX 两种上传格式，首行视为表头。
/// 列名保留上传文件里的原始拼写，归一化交给导入管线。
pub fn read_rows(bytes: &[u8]) -> Result<Vec<RawRow>, SpreadsheetError> {
    if bytes.is_empty() {
        return Err(SpreadsheetError::Empty);
    }
    if bytes.starts_with(&ZIP_MAGIC) {
        read_xlsx(bytes)
    } else {
        read_csv(bytes)
    }
}

/// 运营导出的文件分隔符不统一，按首行内容猜测逗号/分号
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let head = String::from_utf8_lossy(bytes);
    let first_line = head.lines().next().unwrap_or("");
    let commas = first_line.matches(',').count();
    let semicolons = first_line.matches(';').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

fn read_csv(bytes: &[u8]) -> Result<Vec<RawRow>, SpreadsheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(bytes))
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                // 短行按空单元格补齐
                (header.clone(), record.get(i).unwrap_or("").to_string())
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // 整数值不带小数点输出，和 CSV 的文本形态保持一致
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn read_xlsx(bytes: &[u8]) -> Result<Vec<RawRow>, SpreadsheetError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook: Xlsx<_> =
        Xlsx::new(cursor).map_err(|e| SpreadsheetError::Xlsx(e.to_string()))?;

    // 只看第一个工作表
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SpreadsheetError::Xlsx("workbook has no worksheets".to_string()))?
        .map_err(|e| SpreadsheetError::Xlsx(e.to_string()))?;

    let mut iter = range.rows();
    let headers: Vec<String> = match iter.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for record in iter {
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = record.get(i).map(cell_to_string).unwrap_or_default();
                (header.clone(), value)
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_with_headers() {
        let bytes = b"Partner ID,Name,Car target\nP-1,Speedy,75\nP-2,Slow,\n";
        let rows = read_rows(bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], ("Partner ID".to_string(), "P-1".to_string()));
        assert_eq!(rows[0][2], ("Car target".to_string(), "75".to_string()));
        assert_eq!(rows[1][2].1, "");
    }

    #[test]
    fn test_semicolon_delimiter_sniffing() {
        let bytes = b"Partner ID;Name\nP-1;Speedy\n";
        let rows = read_rows(bytes).unwrap();
        assert_eq!(rows[0][1], ("Name".to_string(), "Speedy".to_string()));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let bytes = b"a,b,c\n1\n";
        let rows = read_rows(bytes).unwrap();
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0][1].1, "");
    }

    #[test]
    fn test_empty_file_rejected() {
        assert!(matches!(read_rows(b""), Err(SpreadsheetError::Empty)));
    }

    #[test]
    fn test_zip_magic_routes_to_xlsx() {
        // 只有魔数的残缺文件应当报 xlsx 解析错误而不是按 CSV 处理
        let bytes = [0x50, 0x4b, 0x03, 0x04, 0x00, 0x00];
        assert!(matches!(
            read_rows(&bytes),
            Err(SpreadsheetError::Xlsx(_))
        ));
    }

    #[test]
    fn test_float_cell_formatting() {
        assert_eq!(cell_to_string(&Data::Float(75.0)), "75");
        assert_eq!(cell_to_string(&Data::Float(7.5)), "7.5");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
