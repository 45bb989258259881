use crate::error::{DocubricksError, DocubricksResult};
use docubricks_models::{Author, Brick, Part};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

pub fn validate_model<T: Validate>(entity: &str, model: &T) -> DocubricksResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(DocubricksError::validation(entity, error_messages))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages("", errors, &mut messages);
    messages.join(", ")
}

fn collect_messages(prefix: &str, errors: &ValidationErrors, messages: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = match &error.message {
                        Some(message) => format!("{}: {}", path, message),
                        None => format!("Validation failed for field '{}': {}", path, error.code),
                    };
                    messages.push(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(&path, nested, messages),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_messages(&format!("{}[{}]", path, index), nested, messages);
                }
            }
        }
    }
}

/// Field-level checks over every entity of a freshly loaded document.
pub fn validate_entities(
    bricks: &[Brick],
    parts: &[Part],
    authors: &[Author],
) -> DocubricksResult<()> {
    for brick in bricks {
        validate_model(&format!("brick '{}'", brick.id), brick)?;
    }
    for part in parts {
        validate_model(&format!("part '{}'", part.id), part)?;
    }
    for author in authors {
        validate_model(&format!("author '{}'", author.id), author)?;
    }
    Ok(())
}

pub fn validate_file_type(file_name: &str, allowed_types: &[&str]) -> DocubricksResult<()> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if !allowed_types.contains(&extension.to_lowercase().as_str()) {
        return Err(DocubricksError::validation(
            "file_type",
            format!(
                "File type '{}' not allowed. Allowed types: {}",
                extension,
                allowed_types.join(", ")
            ),
        ));
    }

    Ok(())
}

pub fn validate_file_size(file_size: u64, max_size: u64) -> DocubricksResult<()> {
    if file_size > max_size {
        return Err(DocubricksError::validation(
            "file_size",
            format!(
                "File size {} bytes exceeds maximum allowed size {} bytes",
                file_size, max_size
            ),
        ));
    }

    Ok(())
}
