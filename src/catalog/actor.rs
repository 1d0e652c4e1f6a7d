use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActorError {
    #[error("actor id must not be empty")]
    MissingId,
}

/// The already-authenticated end user on whose behalf a call is made.
///
/// Authentication happens upstream; this type only carries the identity.
/// Every mutating catalog call takes `&Actor`, so an operation can only
/// ever act as its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: String,
    display_name: Option<String>,
    email: Option<String>,
    image_url: Option<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>) -> Result<Self, ActorError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ActorError::MissingId);
        }
        Ok(Self {
            id,
            display_name: None,
            email: None,
            image_url: None,
        })
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = non_empty(display_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = non_empty(email.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = non_empty(image_url.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
