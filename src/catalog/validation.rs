use std::fmt;
use std::io::Cursor;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use image::{ImageFormat, ImageReader};
use serde::Deserialize;
use thiserror::Error;

use super::actor::Actor;
use crate::storage::models::{Listing, Sex};

/// A rejected submission input, naming the first offending field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field} {problem}")]
pub struct ValidationError {
    field: &'static str,
    problem: Problem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Problem {
    Required,
    Invalid(String),
    TooLarge(u64),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Required => write!(f, "is required"),
            Problem::Invalid(reason) => write!(f, "is invalid: {reason}"),
            Problem::TooLarge(max) => write!(f, "exceeds the maximum size of {max} bytes"),
        }
    }
}

impl ValidationError {
    fn required(field: &'static str) -> Self {
        Self {
            field,
            problem: Problem::Required,
        }
    }

    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            problem: Problem::Invalid(reason.into()),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.problem, Problem::Required)
    }

    pub fn is_too_large(&self) -> bool {
        matches!(self.problem, Problem::TooLarge(_))
    }
}

/// Raw listing fields as submitted, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingDraft {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub weight: Option<String>,
    pub address: Option<String>,
    pub about: Option<String>,
    pub category: Option<String>,
    pub sex: Option<String>,
}

impl ListingDraft {
    /// Assign a field by its form name. Returns false for unknown names.
    pub fn set(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "breed" => &mut self.breed,
            "age" => &mut self.age,
            "weight" => &mut self.weight,
            "address" => &mut self.address,
            "about" => &mut self.about,
            "category" => &mut self.category,
            "sex" => &mut self.sex,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Check every structured field in order, failing on the first problem.
    pub fn validate_fields(&self) -> Result<ListingFields, ValidationError> {
        let name = required_text("name", &self.name)?;
        let breed = required_text("breed", &self.breed)?;

        let age = required_text("age", &self.age)?;
        let age: u32 = age
            .parse()
            .map_err(|_| ValidationError::invalid("age", "must be a whole number of years"))?;
        if age == 0 {
            return Err(ValidationError::invalid("age", "must be greater than 0"));
        }

        let weight = required_text("weight", &self.weight)?;
        let weight: f64 = weight
            .parse()
            .map_err(|_| ValidationError::invalid("weight", "must be a number"))?;
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ValidationError::invalid("weight", "must be greater than 0"));
        }

        let address = required_text("address", &self.address)?;
        let about = required_text("about", &self.about)?;
        let category = required_text("category", &self.category)?;

        let sex = required_text("sex", &self.sex)?;
        let sex = Sex::parse(&sex)
            .ok_or_else(|| ValidationError::invalid("sex", "must be Male or Female"))?;

        Ok(ListingFields {
            name,
            breed,
            category,
            sex,
            age,
            weight,
            address,
            about,
        })
    }
}

fn required_text(field: &'static str, value: &Option<String>) -> Result<String, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ValidationError::required(field)),
    }
}

/// Structured listing fields that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFields {
    name: String,
    breed: String,
    category: String,
    sex: Sex,
    age: u32,
    weight: f64,
    address: String,
    about: String,
}

/// An uploaded photo as received from the client.
#[derive(Debug, Clone)]
pub struct Photo {
    pub file_name: Option<String>,
    pub data: Bytes,
}

impl Photo {
    pub fn new(file_name: Option<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name,
            data: data.into(),
        }
    }
}

/// A photo whose bytes were recognized as a decodable image.
#[derive(Debug, Clone)]
pub struct CheckedPhoto {
    pub(crate) file_name: Option<String>,
    pub(crate) data: Bytes,
    pub(crate) format: ImageFormat,
}

impl CheckedPhoto {
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Default extension for the detected format.
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("img")
    }
}

/// Check that a photo is present, within the size limit, and decodes fully
/// in a recognized image format.
pub fn validate_photo(
    photo: Option<Photo>,
    max_bytes: u64,
) -> Result<CheckedPhoto, ValidationError> {
    let photo = match photo {
        Some(photo) if !photo.data.is_empty() => photo,
        _ => return Err(ValidationError::required("photo")),
    };

    if photo.data.len() as u64 > max_bytes {
        return Err(ValidationError {
            field: "photo",
            problem: Problem::TooLarge(max_bytes),
        });
    }

    let reader = ImageReader::new(Cursor::new(photo.data.as_ref()))
        .with_guessed_format()
        .map_err(|e| ValidationError::invalid("photo", e.to_string()))?;
    let format = reader
        .format()
        .ok_or_else(|| ValidationError::invalid("photo", "not a recognized image format"))?;
    reader
        .decode()
        .map_err(|e| ValidationError::invalid("photo", e.to_string()))?;

    Ok(CheckedPhoto {
        file_name: photo.file_name,
        data: photo.data,
        format,
    })
}

impl Listing {
    /// Assemble a listing from validated fields, snapshotting the owner.
    pub fn publish(
        fields: ListingFields,
        external_id: String,
        image_url: String,
        owner: &Actor,
        created_at: DateTime<Utc>,
    ) -> Listing {
        Listing {
            external_id,
            name: fields.name,
            breed: fields.breed,
            category: fields.category,
            sex: fields.sex,
            age: fields.age,
            weight: fields.weight,
            address: fields.address,
            about: fields.about,
            image_url,
            owner_id: owner.id().to_string(),
            owner_name: owner.display_name().map(str::to_string),
            owner_email: owner.email().map(str::to_string),
            owner_image_url: owner.image_url().map(str::to_string),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> ListingDraft {
        let mut draft = ListingDraft::default();
        for (field, value) in [
            ("name", "Rex"),
            ("breed", "Labrador"),
            ("age", "3"),
            ("weight", "28"),
            ("address", "Istanbul"),
            ("about", "Friendly"),
            ("category", "Dogs"),
            ("sex", "Male"),
        ] {
            assert!(draft.set(field, value.to_string()));
        }
        draft
    }

    #[test]
    fn complete_draft_validates() {
        let fields = complete_draft().validate_fields().unwrap();
        assert_eq!(fields.age, 3);
        assert_eq!(fields.weight, 28.0);
        assert_eq!(fields.sex, Sex::Male);
    }

    #[test]
    fn first_missing_field_is_reported() {
        let mut draft = complete_draft();
        draft.about = None;
        draft.sex = Some("   ".to_string());

        let err = draft.validate_fields().unwrap_err();
        assert_eq!(err.field(), "about");
        assert!(err.is_missing());
        assert_eq!(err.to_string(), "about is required");
    }

    #[test]
    fn age_must_be_positive_integer() {
        for bad in ["0", "-1", "2.5", "three"] {
            let mut draft = complete_draft();
            draft.age = Some(bad.to_string());
            let err = draft.validate_fields().unwrap_err();
            assert_eq!(err.field(), "age", "input {bad}");
            assert!(!err.is_missing());
        }
    }

    #[test]
    fn weight_must_be_positive_finite() {
        for bad in ["0", "-3", "NaN", "inf", "heavy"] {
            let mut draft = complete_draft();
            draft.weight = Some(bad.to_string());
            assert_eq!(draft.validate_fields().unwrap_err().field(), "weight");
        }
    }

    #[test]
    fn sex_is_case_insensitive() {
        let mut draft = complete_draft();
        draft.sex = Some("female".to_string());
        assert_eq!(draft.validate_fields().unwrap().sex, Sex::Female);

        draft.sex = Some("unknown".to_string());
        assert_eq!(draft.validate_fields().unwrap_err().field(), "sex");
    }

    #[test]
    fn unknown_form_field_is_not_assigned() {
        let mut draft = ListingDraft::default();
        assert!(!draft.set("color", "brown".to_string()));
    }

    #[test]
    fn photo_must_be_present_and_an_image() {
        let err = validate_photo(None, 1024).unwrap_err();
        assert_eq!(err.field(), "photo");
        assert!(err.is_missing());

        let err = validate_photo(Some(Photo::new(None, Bytes::new())), 1024).unwrap_err();
        assert!(err.is_missing());

        let err = validate_photo(Some(Photo::new(None, &b"not an image at all"[..])), 1024)
            .unwrap_err();
        assert_eq!(err.field(), "photo");
        assert!(!err.is_missing());
    }

    #[test]
    fn photo_size_is_limited() {
        let err = validate_photo(Some(Photo::new(None, vec![0u8; 2048])), 1024).unwrap_err();
        assert_eq!(err.to_string(), "photo exceeds the maximum size of 1024 bytes");
    }

    #[test]
    fn png_photo_is_accepted() {
        let mut png = Vec::new();
        image::RgbImage::new(2, 2)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let checked = validate_photo(Some(Photo::new(Some("rex.png".into()), png)), 1 << 20)
            .unwrap();
        assert_eq!(checked.content_type(), "image/png");
        assert_eq!(checked.extension(), "png");
    }

    #[test]
    fn truncated_photo_is_rejected() {
        let mut png = Vec::new();
        let gradient = image::RgbImage::from_fn(64, 64, |x, y| {
            image::Rgb([(x * 4) as u8, (y * 4) as u8, (x ^ y) as u8])
        });
        gradient
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        png.truncate(png.len() / 2);

        let err = validate_photo(Some(Photo::new(Some("rex.png".into()), png)), 1 << 20)
            .unwrap_err();
        assert_eq!(err.field(), "photo");
        assert!(!err.is_missing());
    }
}
