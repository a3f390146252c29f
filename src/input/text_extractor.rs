//! Text extraction from various file formats

use crate::error::{RelevanceError, Result};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            RelevanceError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;
        Ok(text)
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        Self::extract_from_bytes(&bytes).map_err(|e| match e {
            RelevanceError::DocxExtraction(msg) => {
                RelevanceError::DocxExtraction(format!("'{}': {}", path.display(), msg))
            }
            other => other,
        })
    }
}

impl DocxExtractor {
    /// Pull the body text out of a DOCX container, one paragraph per line
    pub fn extract_from_bytes(bytes: &[u8]) -> Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| RelevanceError::DocxExtraction(format!("Not a DOCX container: {}", e)))?;

        let mut document_xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| RelevanceError::DocxExtraction(format!("Missing word/document.xml: {}", e)))?
            .read_to_string(&mut document_xml)?;

        Self::xml_to_text(&document_xml)
    }

    fn xml_to_text(xml: &str) -> Result<String> {
        let marked = xml
            .replace("</w:p>", "\n")
            .replace("<w:tab/>", "\t")
            .replace("<w:br/>", "\n");

        let tag_regex = Regex::new(r"<[^>]*>")
            .map_err(|e| RelevanceError::Processing(format!("Invalid tag regex: {}", e)))?;
        let stripped = tag_regex.replace_all(&marked, "");

        let text = decode_entities(&stripped);
        Ok(text
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string())
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        self.html_to_text(&html_output)
    }
}

impl MarkdownExtractor {
    fn html_to_text(&self, html: &str) -> Result<String> {
        // Block-level closers become line breaks so headings stay on their own line
        let text = html
            .replace("<br>", "\n")
            .replace("<br />", "\n")
            .replace("</p>", "\n\n")
            .replace("</li>", "\n");
        let closers = Regex::new(r"</h[1-6]>")
            .map_err(|e| RelevanceError::Processing(format!("Invalid heading regex: {}", e)))?;
        let text = closers.replace_all(&text, "\n");

        let re = Regex::new(r"<[^>]*>")
            .map_err(|e| RelevanceError::Processing(format!("Invalid tag regex: {}", e)))?;
        let clean_text = decode_entities(&re.replace_all(&text, ""));

        let lines: Vec<String> = clean_text
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
