use std::path::Path;

pub const TEXT_FILE_EXTENSION: &str = "txt";
pub const PDF_FILE_EXTENSION: &str = "pdf";
pub const TIFF_FILE_EXTENSION: &str = "tiff";
pub const TIF_FILE_EXTENSION: &str = "tif";
pub const JPEG_FILE_EXTENSION: &str = "jpeg";
pub const JPG_FILE_EXTENSION: &str = "jpg";
pub const PNG_FILE_EXTENSION: &str = "png";
pub const DOC_FILE_EXTENSION: &str = "doc";
pub const DOCX_FILE_EXTENSION: &str = "docx";
pub const ODT_FILE_EXTENSION: &str = "odt";
pub const EMPTY_FILE_EXTENSION: &str = "";

const MS_WORD_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const SUPPORTED_EXTENSIONS: [&str; 10] = [
    TEXT_FILE_EXTENSION,
    PDF_FILE_EXTENSION,
    TIFF_FILE_EXTENSION,
    JPEG_FILE_EXTENSION,
    JPG_FILE_EXTENSION,
    PNG_FILE_EXTENSION,
    DOC_FILE_EXTENSION,
    DOCX_FILE_EXTENSION,
    TIF_FILE_EXTENSION,
    ODT_FILE_EXTENSION,
];

/// Raw extension of `path`: everything after the last dot of the file name
/// (a bare `.pdf` counts), with dots, newlines and surrounding whitespace
/// removed, lowercased. No support check.
pub fn calculate_file_extension(path: &str) -> String {
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = name
        .rfind('.')
        .map(|idx| &name[idx..])
        .unwrap_or(EMPTY_FILE_EXTENSION);
    ext.replace(['.', '\n'], "").trim().to_lowercase()
}

/// Extension of `path` if it is one the fax API accepts, otherwise `""`.
pub fn extract_file_extension(path: &str) -> String {
    let ext = calculate_file_extension(path);
    if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        ext
    } else {
        EMPTY_FILE_EXTENSION.to_string()
    }
}

pub fn content_type_for(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        PDF_FILE_EXTENSION => Some("application/pdf"),
        JPEG_FILE_EXTENSION => Some("image/jpeg"),
        JPG_FILE_EXTENSION => Some("image/jpg"),
        PNG_FILE_EXTENSION => Some("image/png"),
        TIFF_FILE_EXTENSION | TIF_FILE_EXTENSION => Some("image/tiff"),
        DOCX_FILE_EXTENSION | DOC_FILE_EXTENSION => Some(MS_WORD_CONTENT_TYPE),
        ODT_FILE_EXTENSION => Some("application/vnd.oasis.opendocument.text"),
        _ => None,
    }
}

/// Dotted extensions for file pickers, e.g. `.pdf`.
pub fn all_valid_extensions() -> Vec<String> {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect()
}
