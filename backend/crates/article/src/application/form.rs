//! Article form input
//!
//! What the multipart body carries once parsed, before validation.

use kernel::error::app_error::{AppResult, FieldError};
use kernel::id::SectionId;

use crate::domain::value_object::{article_title::ArticleTitle, section_content::SectionContent};
use crate::error::{ArticleError, ArticleResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionInput {
    /// Existing section id, only meaningful on update
    pub id: Option<String>,
    pub content: String,
}

/// One file part of a multipart body
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleForm {
    pub title: String,
    pub sections: Vec<SectionInput>,
    pub files: Vec<UploadedFile>,
}

/// Validated title and section contents, in form order
#[derive(Debug)]
pub struct ValidForm {
    pub title: ArticleTitle,
    pub sections: Vec<(Option<String>, SectionContent)>,
}

impl ArticleForm {
    /// Check every field and report all failures at once
    pub fn validate(&self) -> ArticleResult<ValidForm> {
        self.check(true)
    }

    /// Same checks, but an update may leave every section as it is
    pub fn validate_update(&self) -> ArticleResult<ValidForm> {
        self.check(false)
    }

    fn check(&self, require_section: bool) -> ArticleResult<ValidForm> {
        let mut errors = Vec::new();

        let title = collect(ArticleTitle::new(&self.title), &mut errors);

        if require_section && self.sections.is_empty() {
            errors.push(FieldError {
                field: "sections".into(),
                message: "at least one section".into(),
            });
        }

        let sections: Vec<_> = self
            .sections
            .iter()
            .enumerate()
            .filter_map(|(i, section)| {
                let field = format!("sections[{}].content", i);
                collect(SectionContent::new(&section.content, field), &mut errors)
                    .map(|content| (section.id.clone(), content))
            })
            .collect();

        match title {
            Some(title) if errors.is_empty() => Ok(ValidForm { title, sections }),
            _ => Err(ArticleError::Validation(errors)),
        }
    }

    /// Files with content; empty parts come from blank file inputs
    pub fn non_empty_files(&self) -> impl Iterator<Item = &UploadedFile> {
        self.files.iter().filter(|file| !file.bytes.is_empty())
    }
}

/// Parse a listed section id; anything unparseable matches nothing
pub fn parse_section_id(raw: Option<&str>) -> Option<SectionId> {
    raw.map(str::trim)
        .filter(|id| !id.is_empty())
        .and_then(|id| id.parse().ok())
}

fn collect<T>(result: AppResult<T>, errors: &mut Vec<FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            errors.extend(err.fields().iter().cloned());
            None
        }
    }
}
