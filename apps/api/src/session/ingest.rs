//! Resume ingestion: PDF bytes to plain text. Parsing itself is delegated to `pdf-extract`.

use bytes::Bytes;
use thiserror::Error;
use tracing::info;

/// How far into the upload the `%PDF-` header may appear.
const HEADER_SCAN_LIMIT: usize = 1024;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("uploaded file is empty")]
    Empty,

    #[error("uploaded file is not a PDF")]
    NotPdf,

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("PDF extractor crashed on this file")]
    Crashed,
}

/// Extracts the text of every page, in page order, and concatenates it.
///
/// Runs on the blocking pool: extraction is CPU-bound and `pdf-extract` can panic on
/// malformed input, which surfaces here as [`ExtractionError::Crashed`].
pub async fn extract_resume_text(bytes: Bytes) -> Result<String, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::Empty);
    }
    if !looks_like_pdf(&bytes) {
        return Err(ExtractionError::NotPdf);
    }

    let size = bytes.len();
    let pages = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    })
    .await
    .map_err(|_| ExtractionError::Crashed)?
    .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    let text = join_pages(&pages);
    info!(
        "Extracted {} chars from {} page(s) ({size} bytes)",
        text.len(),
        pages.len()
    );
    Ok(text)
}

/// Page texts joined in order. A page with no extractable text contributes "".
pub fn join_pages(pages: &[String]) -> String {
    pages.concat()
}

fn looks_like_pdf(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(HEADER_SCAN_LIMIT)];
    head.windows(5).any(|w| w == b"%PDF-")
}

/// Builds a minimal PDF with one Helvetica text line per page, xref offsets included.
#[cfg(test)]
pub(crate) fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    let font_id = 3;
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + 2 * i).collect();
    let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for (text, page_id) in pages.iter().zip(&page_ids) {
        let stream = format!("BT /F1 18 Tf 72 720 Td ({text}) Tj ET");
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 {font_id} 0 R >> >> /Contents {} 0 R >>",
            page_id + 1
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }
    let xref_at = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}
