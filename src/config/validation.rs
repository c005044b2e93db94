use super::models::Config;
use crate::negotiation::is_image_media_type;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.web_root must not be empty")]
    EmptyWebRoot,

    #[error("Cost ratio for '{media_type}' must be a positive number, got {value}")]
    InvalidCostRatio { media_type: String, value: f64 },

    #[error("Cost ratio configured for '{media_type}', which is not a substitutable image type")]
    UnknownImageMediaType { media_type: String },

    #[error("Content type mapping '{extension}' has an empty extension")]
    EmptyExtension { extension: String },

    #[error("Content type mapping '{extension}' = '{media_type}' is not a valid media type")]
    InvalidMediaType {
        extension: String,
        media_type: String,
    },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_server(config)?;
    validate_cost_ratios(config)?;
    validate_content_types(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.web_root.as_os_str().is_empty() {
        return Err(ValidationError::EmptyWebRoot);
    }

    Ok(())
}

/// Every ratio must be finite and positive and target a known image type
fn validate_cost_ratios(config: &Config) -> Result<(), ValidationError> {
    for (media_type, &value) in &config.negotiation.image_substitution_cost_ratio {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::InvalidCostRatio {
                media_type: media_type.clone(),
                value,
            });
        }

        if !is_image_media_type(media_type) {
            return Err(ValidationError::UnknownImageMediaType {
                media_type: media_type.clone(),
            });
        }
    }

    Ok(())
}

fn validate_content_types(config: &Config) -> Result<(), ValidationError> {
    for (extension, media_type) in &config.content_types {
        if extension.trim_start_matches('.').is_empty() {
            return Err(ValidationError::EmptyExtension {
                extension: extension.clone(),
            });
        }

        if media_type.parse::<mime::Mime>().is_err() {
            return Err(ValidationError::InvalidMediaType {
                extension: extension.clone(),
                media_type: media_type.clone(),
            });
        }
    }

    Ok(())
}
