use std::fs;
use std::path::Path;

use log::trace;
use mime::Mime;
use reqwest::multipart::{Form, Part as FormPart};

use crate::{Result, UploadError};

const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const XLS_MIME: &str = "application/vnd.ms-excel";

/// A file held in memory, ready to be attached to a multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub filename: String,
    pub content_type: Mime,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new<S: Into<String>>(
        filename: S,
        content_type: Mime,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            bytes,
        }
    }

    /// Read a file from disk, guessing its content type from the extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                UploadError::MissingFile(path.display().to_string())
            })?
            .to_owned();
        if !path.is_file() {
            return Err(UploadError::MissingFile(path.display().to_string()));
        }

        let bytes = fs::read(path)?;
        trace!("Read {} bytes from {}", bytes.len(), path.display());

        Ok(Self {
            content_type: guess_content_type(&filename),
            filename,
            bytes,
        })
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

pub fn guess_content_type(filename: &str) -> Mime {
    let ext = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("csv") => mime::TEXT_CSV,
        Some("txt") => mime::TEXT_PLAIN,
        Some("json") => mime::APPLICATION_JSON,
        Some("xlsx") => XLSX_MIME
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        Some("xls") => XLS_MIME
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartValue {
    File(FilePart),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    pub value: PartValue,
}

/// Ordered multipart payload. Field names may repeat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadRequest {
    parts: Vec<Part>,
}

impl UploadRequest {
    pub fn builder() -> UploadRequestBuilder {
        UploadRequestBuilder::default()
    }

    /// Lay out two groups of files followed by optional text fields.
    ///
    /// Every file of `multiple` goes under `multiple_name`, then every file
    /// of `single` under `single_name`. Additional fields without a value
    /// are skipped.
    pub fn from_file_groups<M, S>(
        multiple: M,
        multiple_name: &str,
        single: S,
        single_name: &str,
        additional_fields: &[(&str, Option<String>)],
    ) -> Self
    where
        M: IntoIterator<Item = FilePart>,
        S: IntoIterator<Item = FilePart>,
    {
        let mut builder = Self::builder();
        for file in multiple {
            builder = builder.file(multiple_name, file);
        }
        for file in single {
            builder = builder.file(single_name, file);
        }
        for (name, value) in additional_fields {
            if let Some(value) = value {
                builder = builder.text(*name, value.clone());
            }
        }
        builder.build()
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part.value, PartValue::File(_)))
            .count()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|part| part.name.as_str())
    }

    pub(crate) fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for Part { name, value } in self.parts {
            form = match value {
                PartValue::File(file) => {
                    let part = FormPart::bytes(file.bytes)
                        .file_name(file.filename)
                        .mime_str(file.content_type.as_ref())?;
                    form.part(name, part)
                }
                PartValue::Text(text) => form.text(name, text),
            };
        }
        Ok(form)
    }
}

#[derive(Debug, Default)]
pub struct UploadRequestBuilder {
    parts: Vec<Part>,
}

impl UploadRequestBuilder {
    pub fn file<S: Into<String>>(mut self, name: S, file: FilePart) -> Self {
        self.parts.push(Part {
            name: name.into(),
            value: PartValue::File(file),
        });
        self
    }

    pub fn files<S, I>(mut self, name: S, files: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = FilePart>,
    {
        let name = name.into();
        for file in files {
            self = self.file(name.clone(), file);
        }
        self
    }

    pub fn text<S: Into<String>, V: Into<String>>(
        mut self,
        name: S,
        value: V,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            value: PartValue::Text(value.into()),
        });
        self
    }

    pub fn build(self) -> UploadRequest {
        UploadRequest { parts: self.parts }
    }
}
