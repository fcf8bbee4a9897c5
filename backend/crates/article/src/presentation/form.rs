//! Multipart article form
//!
//! Sections arrive either as one `sections` part holding a JSON array, or
//! as bracketed fields (`sections[0][content]`, `sections[0][id]`) the way
//! HTML forms encode nested arrays. Every part carrying a file name is an
//! upload, whatever its field name.

use std::collections::BTreeMap;

use axum::extract::Multipart;
use serde::Deserialize;

use crate::application::form::{ArticleForm, SectionInput, UploadedFile};
use crate::error::{ArticleError, ArticleResult};

/// Which half of a section a bracketed field carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionPart {
    Id,
    Content,
}

/// `sections[3][content]` → `(3, Content)`
pub fn parse_indexed_section_field(name: &str) -> Option<(usize, SectionPart)> {
    let rest = name.strip_prefix("sections[")?;
    let (index, rest) = rest.split_once(']')?;
    let index = index.parse().ok()?;

    let part = match rest.trim_start_matches('.').trim_matches(|c| c == '[' || c == ']') {
        "content" => SectionPart::Content,
        "id" => SectionPart::Id,
        _ => return None,
    };
    Some((index, part))
}

#[derive(Deserialize)]
struct SectionPayload {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    content: String,
}

impl SectionPayload {
    fn into_input(self) -> SectionInput {
        let id = match self.id {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(id)) => Some(id),
            Some(other) => Some(other.to_string()),
        };
        SectionInput {
            id,
            content: self.content,
        }
    }
}

/// `sections` part holding a JSON array
pub fn parse_sections_json(raw: &str) -> ArticleResult<Vec<SectionInput>> {
    let payload: Vec<SectionPayload> = serde_json::from_str(raw)
        .map_err(|_| ArticleError::field("sections", "invalid sections"))?;
    Ok(payload.into_iter().map(SectionPayload::into_input).collect())
}

/// Drain the multipart body into an [`ArticleForm`]
pub async fn read_article_form(
    mut multipart: Multipart,
    max_files: usize,
) -> ArticleResult<ArticleForm> {
    let mut form = ArticleForm::default();
    let mut indexed: BTreeMap<usize, SectionInput> = BTreeMap::new();

    while let Some(field) = multipart.next_field().await? {
        if field.file_name().is_some() {
            if form.files.len() >= max_files {
                return Err(ArticleError::field("files", "too many files"));
            }
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await?;
            form.files.push(UploadedFile {
                file_name,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = field.text().await?,
            "sections" => form.sections = parse_sections_json(&field.text().await?)?,
            _ => {
                if let Some((index, part)) = parse_indexed_section_field(&name) {
                    let value = field.text().await?;
                    let section = indexed.entry(index).or_default();
                    match part {
                        SectionPart::Content => section.content = value,
                        SectionPart::Id => section.id = Some(value),
                    }
                }
            }
        }
    }

    form.sections.extend(indexed.into_values());
    Ok(form)
}
