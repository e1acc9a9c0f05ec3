//! Text extraction from various file formats

use crate::error::{AtsTailorError, Result};
use pulldown_cmark::{Event, Parser, Tag};
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;
use zip::ZipArchive;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            AtsTailorError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        docx_to_text(&bytes).map_err(|e| match e {
            AtsTailorError::DocxExtraction(msg) => {
                AtsTailorError::DocxExtraction(format!("'{}': {}", path.display(), msg))
            }
            other => other,
        })
    }
}

fn docx_error(err: impl std::fmt::Display) -> AtsTailorError {
    AtsTailorError::DocxExtraction(err.to_string())
}

/// Paragraph text of a Word document, one line per paragraph.
/// Numbered or bulleted paragraphs get a "- " marker.
pub fn docx_to_text(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(docx_error)?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(docx_error)?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut lines = Vec::new();
    let mut paragraph = String::new();
    let mut listed = false;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(docx_error)? {
            XmlEvent::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    paragraph.clear();
                    listed = false;
                }
                b"w:t" => in_text = true,
                b"w:numPr" => listed = true,
                _ => {}
            },
            XmlEvent::Empty(e) => match e.name().as_ref() {
                b"w:tab" => paragraph.push(' '),
                b"w:br" => paragraph.push('\n'),
                b"w:numPr" => listed = true,
                _ => {}
            },
            XmlEvent::Text(text) if in_text => {
                paragraph.push_str(&text.unescape().map_err(docx_error)?);
            }
            XmlEvent::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    let text = paragraph.trim();
                    if !text.is_empty() {
                        lines.push(if listed {
                            format!("- {}", text)
                        } else {
                            text.to_string()
                        });
                    }
                }
                _ => {}
            },
            XmlEvent::Eof => break,
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&content))
    }
}

/// Flatten Markdown to plain lines. List items keep a "- " marker so the
/// resume extractor still sees them as bullets.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut out = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Item) => {
                start_line(&mut out);
                out.push_str("- ");
            }
            Event::Start(Tag::Heading(..)) | Event::Start(Tag::Paragraph) => {
                if !out.ends_with("- ") {
                    start_line(&mut out);
                }
            }
            Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(..))
            | Event::End(Tag::Item)
            | Event::End(Tag::CodeBlock(_))
            | Event::End(Tag::TableRow)
            | Event::End(Tag::TableHead) => start_line(&mut out),
            Event::End(Tag::TableCell) => out.push(' '),
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak | Event::Rule => start_line(&mut out),
            _ => {}
        }
    }

    out.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn start_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}
