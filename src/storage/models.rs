use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sex of the listed pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Case-insensitive parse of `Male`/`Female`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

/// A published adoption listing, stored in redb.
///
/// Listings are only ever constructed by the submission pipeline; the
/// storage-internal document key is never part of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub(crate) external_id: String,
    pub(crate) name: String,
    pub(crate) breed: String,
    pub(crate) category: String,
    pub(crate) sex: Sex,
    pub(crate) age: u32,
    pub(crate) weight: f64,
    pub(crate) address: String,
    pub(crate) about: String,
    pub(crate) image_url: String,

    // Owner snapshot taken at submission time
    pub(crate) owner_id: String,
    #[serde(default)]
    pub(crate) owner_name: Option<String>,
    #[serde(default)]
    pub(crate) owner_email: Option<String>,
    #[serde(default)]
    pub(crate) owner_image_url: Option<String>,

    pub(crate) created_at: DateTime<Utc>,
}

impl Listing {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn breed(&self) -> &str {
        &self.breed
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn about(&self) -> &str {
        &self.about
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn owner_name(&self) -> Option<&str> {
        self.owner_name.as_deref()
    }

    pub fn owner_email(&self) -> Option<&str> {
        self.owner_email.as_deref()
    }

    pub fn owner_image_url(&self) -> Option<&str> {
        self.owner_image_url.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Reference entity populating the allowed listing categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}
