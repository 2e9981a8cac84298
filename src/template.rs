//! Corporate message templates with named placeholders.
//!
//! Template text is parsed once into literal and placeholder segments, so
//! unknown placeholder names are rejected when the template is built rather
//! than left unfilled in a rendered message. Rendering fills every non-body
//! field from the caller's [`TemplateFields`] and then splices the free-form
//! body in place of `{body}`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use thiserror::Error;

/// Sentinel template name meaning "use the raw body".
pub const NO_TEMPLATE: &str = "(none)";

/// Name of the distinguished body placeholder.
pub const BODY_FIELD: &str = "body";

/// Placeholder names a template may reference.
pub const KNOWN_FIELDS: [&str; 5] = ["recipient", "sender", "subject", "times", BODY_FIELD];

const BUILTIN_TEMPLATES: [(&str, &str); 2] = [
    (
        "General Professional Email",
        "Dear {recipient},\n\n{body}\n\nBest regards,\n{sender}",
    ),
    (
        "Meeting Request",
        concat!(
            "Subject: Meeting Request - {subject}\n\n",
            "Hi {recipient},\n\n",
            "I would like to request a meeting regarding {subject}. ",
            "Proposed times: {times}.\n\n",
            "Best regards,\n{sender}",
        ),
    ),
];

static BUILTIN: LazyLock<TemplateCatalog> = LazyLock::new(|| {
    TemplateCatalog::from_sources(BUILTIN_TEMPLATES).unwrap_or_else(|err| {
        tracing::error!(error = %err, "builtin template catalog failed to parse");
        TemplateCatalog::default()
    })
});

/// Template construction and rendering errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A referenced non-body placeholder has no supplied value.
    #[error("template '{template}' requires a value for '{field}'")]
    FieldMissing {
        /// Template name.
        template: String,
        /// Missing field name.
        field: String,
    },
    /// The template text references a placeholder outside [`KNOWN_FIELDS`].
    #[error("template '{template}' references unknown placeholder '{{{placeholder}}}'")]
    UnknownPlaceholder {
        /// Template name.
        template: String,
        /// Offending placeholder name.
        placeholder: String,
    },
    /// A `{` was opened but never closed.
    #[error("template '{template}' has an unterminated placeholder")]
    Unterminated {
        /// Template name.
        template: String,
    },
}

/// Caller-supplied values for non-body placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFields {
    values: BTreeMap<String, String>,
}

impl TemplateFields {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field value, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    /// Returns the value for a field, if supplied.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
    Body,
}

/// A parsed, immutable message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    name: String,
    segments: Vec<Segment>,
}

impl TemplateSpec {
    /// Parse template text, validating every placeholder name.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownPlaceholder`] for names outside
    /// [`KNOWN_FIELDS`] and [`TemplateError::Unterminated`] for an unclosed `{`.
    pub fn parse(name: &str, text: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = text;

        while let Some(open) = rest.find('{') {
            let (literal, tail) = rest.split_at(open);
            if !literal.is_empty() {
                segments.push(Segment::Literal(literal.to_owned()));
            }
            let inner = &tail[1..];
            let close = inner.find('}').ok_or_else(|| TemplateError::Unterminated {
                template: name.to_owned(),
            })?;
            let placeholder = &inner[..close];
            if !KNOWN_FIELDS.contains(&placeholder) {
                return Err(TemplateError::UnknownPlaceholder {
                    template: name.to_owned(),
                    placeholder: placeholder.to_owned(),
                });
            }
            segments.push(if placeholder == BODY_FIELD {
                Segment::Body
            } else {
                Segment::Field(placeholder.to_owned())
            });
            rest = &inner[close.saturating_add(1)..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_owned()));
        }

        Ok(Self {
            name: name.to_owned(),
            segments,
        })
    }

    /// Template name as shown in the catalog.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-body fields this template references, in first-use order.
    pub fn required_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Field(field) = segment {
                if !fields.contains(&field.as_str()) {
                    fields.push(field);
                }
            }
        }
        fields
    }

    /// Whether the template has a `{body}` insertion point.
    pub fn has_body(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Body))
    }

    /// Check that every required field has a value.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::FieldMissing`] for the first absent field.
    pub fn validate(&self, fields: &TemplateFields) -> Result<(), TemplateError> {
        match self
            .required_fields()
            .into_iter()
            .find(|field| fields.get(field).is_none())
        {
            Some(field) => Err(TemplateError::FieldMissing {
                template: self.name.clone(),
                field: field.to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// Render the template: fields first, then the body.
    ///
    /// The body is inserted verbatim, so braces inside user text are never
    /// interpreted as placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::FieldMissing`] when a required field is absent.
    pub fn render(&self, fields: &TemplateFields, body: &str) -> Result<String, TemplateError> {
        self.validate(fields)?;

        let mut rendered = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Field(field) => rendered.push_str(fields.get(field).unwrap_or_default()),
                Segment::Body => rendered.push_str(body),
            }
        }
        Ok(rendered)
    }
}

/// A named collection of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<TemplateSpec>,
}

impl TemplateCatalog {
    /// The static catalog of built-in corporate templates.
    pub fn builtin() -> &'static TemplateCatalog {
        &BUILTIN
    }

    /// Build a catalog from `(name, text)` pairs.
    ///
    /// # Errors
    ///
    /// Returns the first template parse error.
    pub fn from_sources<'a>(
        sources: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, TemplateError> {
        let templates = sources
            .into_iter()
            .map(|(name, text)| TemplateSpec::parse(name, text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { templates })
    }

    /// Look up a template by name. The [`NO_TEMPLATE`] sentinel never matches.
    pub fn get(&self, name: &str) -> Option<&TemplateSpec> {
        if name == NO_TEMPLATE {
            return None;
        }
        self.templates.iter().find(|t| t.name == name)
    }

    /// Template names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(TemplateSpec::name)
    }

    /// Render `body` through the named template.
    ///
    /// A missing name, the [`NO_TEMPLATE`] sentinel, or a name not in the
    /// catalog all return the body unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::FieldMissing`] when the selected template
    /// references a field the caller did not supply.
    pub fn render(
        &self,
        name: Option<&str>,
        fields: &TemplateFields,
        body: &str,
    ) -> Result<String, TemplateError> {
        match name.and_then(|n| self.get(n)) {
            Some(template) => template.render(fields, body),
            None => Ok(body.to_owned()),
        }
    }
}
