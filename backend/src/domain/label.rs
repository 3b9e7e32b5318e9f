//! Tags and ingredients.
//!
//! Both are short owner-scoped names attached to recipes, so they share one
//! entity type distinguished by [`LabelKind`].

use std::fmt;

use super::UserId;

/// Maximum accepted length for a label name.
pub const LABEL_NAME_MAX: usize = 255;

/// Which catalogue a label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LabelKind {
    Tag,
    Ingredient,
}

impl LabelKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Ingredient => "ingredient",
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database identifier of a tag or ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelId(i64);

impl LabelId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised by [`LabelName::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelNameError {
    Blank,
    TooLong { max: usize },
}

impl fmt::Display for LabelNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => write!(f, "this field may not be blank"),
            Self::TooLong { max } => write!(f, "ensure this field has no more than {max} characters"),
        }
    }
}

impl std::error::Error for LabelNameError {}

/// Trimmed, non-blank label name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelName(String);

impl LabelName {
    pub fn new(raw: &str) -> Result<Self, LabelNameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LabelNameError::Blank);
        }
        if trimmed.chars().count() > LABEL_NAME_MAX {
            return Err(LabelNameError::TooLong {
                max: LABEL_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Rebuild a name loaded from storage.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for LabelName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A tag or ingredient owned by one user.
///
/// # Examples
/// ```
/// use recipe_backend::domain::{Label, LabelId, LabelKind, LabelName, UserId};
///
/// let tag = Label::new(
///     LabelId::new(1),
///     UserId::random(),
///     LabelKind::Tag,
///     LabelName::new("Vegan").unwrap(),
/// );
/// assert_eq!(tag.to_string(), "Vegan");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    id: LabelId,
    owner: UserId,
    kind: LabelKind,
    name: LabelName,
}

impl Label {
    pub fn new(id: LabelId, owner: UserId, kind: LabelKind, name: LabelName) -> Self {
        Self {
            id,
            owner,
            kind,
            name,
        }
    }

    pub fn id(&self) -> LabelId {
        self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn kind(&self) -> LabelKind {
        self.kind
    }

    pub fn name(&self) -> &LabelName {
        &self.name
    }

    /// Replace the name, keeping identity and ownership.
    pub fn with_name(mut self, name: LabelName) -> Self {
        self.name = name;
        self
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_ref())
    }
}

/// Values needed to create a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLabel {
    pub owner: UserId,
    pub kind: LabelKind,
    pub name: LabelName,
}

/// Order labels the way listings present them: name descending, then newest first.
pub fn sort_for_listing(labels: &mut [Label]) {
    labels.sort_by(|a, b| b.name.cmp(&a.name).then_with(|| b.id.cmp(&a.id)));
}
