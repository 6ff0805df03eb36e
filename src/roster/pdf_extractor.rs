//! PDF text extraction wrapper
//!
//! Wraps pdf-extract with error handling for:
//! - Encrypted PDFs
//! - Corrupted PDFs
//! - Panics inside the parser on malformed input

use super::RosterError;
use std::panic::{self, AssertUnwindSafe};

/// Extract plain text from PDF bytes, one string per page in document order
pub fn extract_pages(pdf_bytes: &[u8]) -> Result<Vec<String>, RosterError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
    }));

    match result {
        Ok(Ok(pages)) => {
            tracing::debug!(pages = pages.len(), bytes = pdf_bytes.len(), "extracted PDF text");
            Ok(pages)
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "PDF text extraction failed");
            Err(RosterError::DocumentParse(e.to_string()))
        }
        Err(_) => {
            tracing::warn!("PDF text extraction panicked");
            Err(RosterError::DocumentParse("malformed document".to_string()))
        }
    }
}

/// Minimal one-page PDF with one Helvetica text line per entry
#[cfg(test)]
pub(crate) fn roster_pdf(lines: &[&str]) -> Vec<u8> {
    let mut content = String::from("BT\n/F1 11 Tf\n14 TL\n40 760 Td\n");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            content.push_str("T*\n");
        }
        let escaped = line.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)");
        content.push_str(&format!("({}) Tj\n", escaped));
    }
    content.push_str("ET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{}endstream", content.len(), content),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_start = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        xref.push_str(&format!("{:010} 00000 n \n", offset));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_start
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_in_document_order() {
        let pdf = roster_pdf(&["John Doe U12345678 Computer Science"]);
        let pages = extract_pages(&pdf).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("U12345678"));
    }

    #[test]
    fn test_garbage_bytes_fail() {
        let err = extract_pages(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, RosterError::DocumentParse(_)));
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(extract_pages(&[]).is_err());
    }
}
