// Embedded request fixtures

/// Minimal single-page PDF submitted by the upload check. The service
/// extracts text from it, so the byte content is preserved exactly and
/// kept outside source text.
pub const TEST_RESUME_PDF: &[u8] = include_bytes!("../fixtures/test_resume.pdf");

pub const TEST_RESUME_FILENAME: &str = "test_resume.pdf";
