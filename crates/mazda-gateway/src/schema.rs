//! Request payload schemas

use crate::error::ApiError;
use crate::extract::validation_error;
use mazda_client::{Credentials, Region};
use serde::Deserialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// `POST /auth` body
#[derive(Debug, Deserialize, Validate)]
pub struct AuthRequest {
    #[validate(required(message = "Missing data for required field."), length(min = 1, message = "Field may not be empty."))]
    pub email: Option<String>,

    #[validate(required(message = "Missing data for required field."), length(min = 1, message = "Field may not be empty."))]
    pub password: Option<String>,

    #[validate(custom(function = "validate_region"))]
    pub region: Option<String>,
}

fn validate_region(region: &str) -> Result<(), ValidationError> {
    region.parse::<Region>().map(|_| ()).map_err(|_| {
        let allowed: Vec<&str> = Region::ALL.iter().map(Region::as_str).collect();
        ValidationError::new("one_of")
            .with_message(Cow::Owned(format!("Must be one of: {}.", allowed.join(", "))))
    })
}

impl AuthRequest {
    /// Validate the request and turn it into a credential set
    pub fn into_credentials(self) -> Result<Credentials, ApiError> {
        self.validate().map_err(validation_error)?;
        let (Some(email), Some(password)) = (self.email, self.password) else {
            return Err(ApiError::Internal("validated request lost its credentials".to_string()));
        };

        let region = match self.region.as_deref() {
            Some(code) => code
                .parse()
                .map_err(|e: mazda_client::UnknownRegion| ApiError::malformed_body(e.to_string()))?,
            None => Region::default(),
        };

        Ok(Credentials::new(email, password, region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn request(email: Option<&str>, password: Option<&str>, region: Option<&str>) -> AuthRequest {
        AuthRequest {
            email: email.map(str::to_string),
            password: password.map(str::to_string),
            region: region.map(str::to_string),
        }
    }

    #[rstest]
    #[case(Some("MNAO"), Region::Mnao)]
    #[case(Some("MME"), Region::Mme)]
    #[case(Some("MJO"), Region::Mjo)]
    #[case(None, Region::Mnao)]
    fn test_valid_request(#[case] region: Option<&str>, #[case] expected: Region) {
        let req = request(Some("a@b.com"), Some("p"), region);
        assert!(req.validate().is_ok());

        let credentials = req.into_credentials().unwrap();
        assert_eq!(credentials, Credentials::new("a@b.com", "p", expected));
    }

    #[test]
    fn test_conversion_validates() {
        let err = request(Some(""), Some("p"), None).into_credentials().unwrap_err();
        match err {
            ApiError::Validation { fields, .. } => {
                assert_eq!(fields["email"], vec!["Field may not be empty.".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_reported() {
        let errors = request(None, None, None).validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("region"));
    }

    #[test]
    fn test_empty_password_reported() {
        let errors = request(Some("a@b.com"), Some(""), None).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_unknown_region_reported() {
        let errors = request(Some("a@b.com"), Some("p"), Some("EU")).validate().unwrap_err();
        let fields = errors.field_errors();

        let region = &fields["region"];
        assert_eq!(region[0].code, "one_of");
        assert_eq!(
            region[0].message.as_deref(),
            Some("Must be one of: MNAO, MME, MJO.")
        );
    }
}
