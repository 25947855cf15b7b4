pub mod csv;
pub mod docx;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod text;

pub use self::csv::CsvLoader;
pub use docx::DocxLoader;
pub use text::TextLoader;

#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;
