//! SimTalk commands for moving explorer tables in and out of files

use crate::session::command::quote;
use std::path::Path;

/// File format of an imported or exported table, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableFormat {
    /// `.xlsx` and `.xls` workbooks; a sheet may be named
    Excel,
    /// `.xml` files; sheet names are ignored
    Xml,
    /// Tab-delimited text, used for every other extension
    Text,
}

impl TableFormat {
    /// Pick the format from the lowercased extension of `path`
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .map(|extension| extension.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xls" => TableFormat::Excel,
            "xml" => TableFormat::Xml,
            _ => TableFormat::Text,
        }
    }

    /// Table method that reads a file of this format
    pub fn reader(&self) -> &'static str {
        match self {
            TableFormat::Excel => "readExcelFile",
            TableFormat::Xml => "readXMLFile",
            TableFormat::Text => "readFile",
        }
    }

    /// Table method that writes a file of this format
    pub fn writer(&self) -> &'static str {
        match self {
            TableFormat::Excel => "writeExcelFile",
            TableFormat::Xml => "writeXMLFile",
            TableFormat::Text => "writeFile",
        }
    }

    /// Whether a sheet name is passed along
    pub fn accepts_sheet(&self) -> bool {
        !matches!(self, TableFormat::Xml)
    }

    /// `("<file>"[, "<sheet>"])`
    fn arguments(&self, file: &Path, sheet: Option<&str>) -> String {
        let file = quote(&file.to_string_lossy());
        match sheet {
            Some(sheet) if self.accepts_sheet() => format!("({}, {})", file, quote(sheet)),
            _ => format!("({})", file),
        }
    }
}

/// Command that loads `file` into a fresh table and assigns it to the
/// explorer's `ExplorerTable`
///
/// `file` is expected to be absolute already.
pub fn import_command(explorer: &str, file: &Path, sheet: Option<&str>) -> String {
    let format = TableFormat::from_path(file);
    format!(
        "var t: table; t.create; t.ColumnIndex := True; t.RowIndex := True; t.{}{}; {}.ExplorerTable := t",
        format.reader(),
        format.arguments(file, sheet),
        explorer
    )
}

/// Command that writes the explorer's `ExplorerTable` to `file`
pub fn export_command(explorer: &str, file: &Path, sheet: Option<&str>) -> String {
    let format = TableFormat::from_path(file);
    format!("{}.ExplorerTable.{}{}", explorer, format.writer(), format.arguments(file, sheet))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(TableFormat::from_path(Path::new("/data/in.xlsx")), TableFormat::Excel);
        assert_eq!(TableFormat::from_path(Path::new("/data/IN.XLS")), TableFormat::Excel);
        assert_eq!(TableFormat::from_path(Path::new("/data/in.Xml")), TableFormat::Xml);
        assert_eq!(TableFormat::from_path(Path::new("/data/in.csv")), TableFormat::Text);
        assert_eq!(TableFormat::from_path(Path::new("/data/in")), TableFormat::Text);
    }

    #[test]
    fn test_import_command_excel_with_sheet() {
        let command = import_command(".Models.Model.Explorer", Path::new("/data/in.xlsx"), Some("Data"));
        assert_eq!(
            command,
            "var t: table; t.create; t.ColumnIndex := True; t.RowIndex := True; \
             t.readExcelFile(\"/data/in.xlsx\", \"Data\"); .Models.Model.Explorer.ExplorerTable := t"
        );
    }

    #[test]
    fn test_import_command_xml_ignores_sheet() {
        let command = import_command("Model.E", Path::new("/data/in.xml"), Some("Data"));
        assert!(command.contains("t.readXMLFile(\"/data/in.xml\");"));
        assert!(!command.contains("Data\""));
    }

    #[test]
    fn test_export_command() {
        assert_eq!(
            export_command("Model.E", Path::new("/data/out.txt"), None),
            "Model.E.ExplorerTable.writeFile(\"/data/out.txt\")"
        );
        assert_eq!(
            export_command("Model.E", Path::new("/data/out.xls"), Some("Sheet1")),
            "Model.E.ExplorerTable.writeExcelFile(\"/data/out.xls\", \"Sheet1\")"
        );
    }
}
