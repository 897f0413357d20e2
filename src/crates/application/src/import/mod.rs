pub mod normalize;
pub mod reconcile;
pub mod validate;

/// 表格原始行：列名 → 单元格文本，保持上传文件里的列顺序
pub type RawRow = Vec<(String, String)>;
