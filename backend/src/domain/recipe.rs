//! Recipe aggregate and its value types.

use std::fmt;
use std::str::FromStr;

use super::{Label, LabelId, UserId};

/// Maximum accepted length for titles and links.
pub const RECIPE_TEXT_MAX: usize = 255;
/// Largest representable price in cents (`999.99`).
pub const PRICE_MAX_CENTS: u32 = 99_999;

/// Database identifier of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecipeId(i64);

impl RecipeId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Field-level validation failures for recipe input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    BlankTitle,
    TitleTooLong { max: usize },
    LinkTooLong { max: usize },
    InvalidPrice,
    PriceOutOfRange,
    TooManyPriceDecimals,
}

impl RecipeValidationError {
    /// Request field the failure refers to.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::BlankTitle | Self::TitleTooLong { .. } => "title",
            Self::LinkTooLong { .. } => "link",
            Self::InvalidPrice | Self::PriceOutOfRange | Self::TooManyPriceDecimals => "price",
        }
    }

    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BlankTitle => "blank",
            Self::TitleTooLong { .. } | Self::LinkTooLong { .. } => "max_length",
            Self::InvalidPrice => "invalid",
            Self::PriceOutOfRange => "max_digits",
            Self::TooManyPriceDecimals => "max_decimal_places",
        }
    }
}

impl fmt::Display for RecipeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title may not be blank"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::LinkTooLong { max } => write!(f, "link must be at most {max} characters"),
            Self::InvalidPrice => write!(f, "a valid non-negative number is required"),
            Self::PriceOutOfRange => write!(f, "price must not exceed 999.99"),
            Self::TooManyPriceDecimals => {
                write!(f, "ensure that there are no more than 2 decimal places")
            }
        }
    }
}

impl std::error::Error for RecipeValidationError {}

/// Trimmed, non-blank recipe title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeTitle(String);

impl RecipeTitle {
    pub fn new(raw: &str) -> Result<Self, RecipeValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RecipeValidationError::BlankTitle);
        }
        if trimmed.chars().count() > RECIPE_TEXT_MAX {
            return Err(RecipeValidationError::TitleTooLong {
                max: RECIPE_TEXT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Rebuild a title loaded from storage.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for RecipeTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Optional external link; the empty string means "no link".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeLink(String);

impl RecipeLink {
    pub fn new(raw: &str) -> Result<Self, RecipeValidationError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() > RECIPE_TEXT_MAX {
            return Err(RecipeValidationError::LinkTooLong {
                max: RECIPE_TEXT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn from_stored(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for RecipeLink {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Non-negative price with two decimal places, held as whole cents.
///
/// # Examples
/// ```
/// use recipe_backend::domain::Price;
///
/// let price: Price = "5.5".parse().unwrap();
/// assert_eq!(price.cents(), 550);
/// assert_eq!(price.to_string(), "5.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u32);

impl Price {
    /// Build a price from cents, rejecting values above `999.99`.
    pub fn from_cents(cents: u32) -> Result<Self, RecipeValidationError> {
        if cents > PRICE_MAX_CENTS {
            return Err(RecipeValidationError::PriceOutOfRange);
        }
        Ok(Self(cents))
    }

    pub const fn cents(self) -> u32 {
        self.0
    }
}

impl FromStr for Price {
    type Err = RecipeValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(RecipeValidationError::InvalidPrice);
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(RecipeValidationError::InvalidPrice);
        }
        // Trailing zeros beyond the second decimal carry no value.
        let fraction = fraction.trim_end_matches('0');
        if fraction.len() > 2 {
            return Err(RecipeValidationError::TooManyPriceDecimals);
        }
        let whole = whole.trim_start_matches('0');
        if whole.len() > 3 {
            return Err(RecipeValidationError::PriceOutOfRange);
        }
        let units: u32 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| RecipeValidationError::InvalidPrice)?
        };
        let cents: u32 = match fraction.len() {
            0 => 0,
            1 => fraction
                .parse::<u32>()
                .map_err(|_| RecipeValidationError::InvalidPrice)?
                .saturating_mul(10),
            _ => fraction
                .parse()
                .map_err(|_| RecipeValidationError::InvalidPrice)?,
        };
        Self::from_cents(units.saturating_mul(100).saturating_add(cents))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Recipe with its resolved tags and ingredients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub owner: UserId,
    pub title: RecipeTitle,
    pub time_minutes: u32,
    pub price: Price,
    pub link: RecipeLink,
    /// Media-relative path of the uploaded image, if any.
    pub image: Option<String>,
    pub tags: Vec<Label>,
    pub ingredients: Vec<Label>,
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title.as_ref())
    }
}

/// Values needed to create or fully replace a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: RecipeTitle,
    pub time_minutes: u32,
    pub price: Price,
    pub link: RecipeLink,
    pub tags: Vec<LabelId>,
    pub ingredients: Vec<LabelId>,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeChanges {
    pub title: Option<RecipeTitle>,
    pub time_minutes: Option<u32>,
    pub price: Option<Price>,
    pub link: Option<RecipeLink>,
    pub tags: Option<Vec<LabelId>>,
    pub ingredients: Option<Vec<LabelId>>,
}

impl RecipeChanges {
    /// Apply the changes on top of an existing recipe's values.
    pub fn merge_into(self, current: &Recipe) -> RecipeDraft {
        RecipeDraft {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            time_minutes: self.time_minutes.unwrap_or(current.time_minutes),
            price: self.price.unwrap_or(current.price),
            link: self.link.unwrap_or_else(|| current.link.clone()),
            tags: self
                .tags
                .unwrap_or_else(|| current.tags.iter().map(Label::id).collect()),
            ingredients: self
                .ingredients
                .unwrap_or_else(|| current.ingredients.iter().map(Label::id).collect()),
        }
    }
}

impl From<RecipeDraft> for RecipeChanges {
    fn from(draft: RecipeDraft) -> Self {
        Self {
            title: Some(draft.title),
            time_minutes: Some(draft.time_minutes),
            price: Some(draft.price),
            link: Some(draft.link),
            tags: Some(draft.tags),
            ingredients: Some(draft.ingredients),
        }
    }
}

/// Listing restriction: recipes linked to any of the given labels.
///
/// Empty lists impose no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tags: Vec<LabelId>,
    pub ingredients: Vec<LabelId>,
}

impl RecipeFilter {
    /// Whether a recipe passes both label restrictions.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let hit = |wanted: &[LabelId], linked: &[Label]| {
            wanted.is_empty() || linked.iter().any(|label| wanted.contains(&label.id()))
        };
        hit(&self.tags, &recipe.tags) && hit(&self.ingredients, &recipe.ingredients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LabelKind, LabelName};
    use rstest::rstest;

    #[rstest]
    #[case("5", 500)]
    #[case("5.00", 500)]
    #[case("5.5", 550)]
    #[case("5.50", 550)]
    #[case("0.05", 5)]
    #[case(".25", 25)]
    #[case("999.99", 99_999)]
    #[case("12.500", 1250)]
    #[case("007.10", 710)]
    fn parses_prices(#[case] raw: &str, #[case] cents: u32) {
        let price: Price = raw.parse().expect("valid price");
        assert_eq!(price.cents(), cents);
    }

    #[rstest]
    #[case("", RecipeValidationError::InvalidPrice)]
    #[case(".", RecipeValidationError::InvalidPrice)]
    #[case("-1.00", RecipeValidationError::InvalidPrice)]
    #[case("abc", RecipeValidationError::InvalidPrice)]
    #[case("1e3", RecipeValidationError::InvalidPrice)]
    #[case("1.005", RecipeValidationError::TooManyPriceDecimals)]
    #[case("1000", RecipeValidationError::PriceOutOfRange)]
    #[case("1000.00", RecipeValidationError::PriceOutOfRange)]
    fn rejects_invalid_prices(#[case] raw: &str, #[case] expected: RecipeValidationError) {
        assert_eq!(raw.parse::<Price>(), Err(expected));
    }

    #[rstest]
    #[case(0, "0.00")]
    #[case(5, "0.05")]
    #[case(500, "5.00")]
    #[case(99_999, "999.99")]
    fn formats_with_two_decimals(#[case] cents: u32, #[case] expected: &str) {
        assert_eq!(Price::from_cents(cents).expect("in range").to_string(), expected);
    }

    fn recipe(tags: Vec<Label>, ingredients: Vec<Label>) -> Recipe {
        Recipe {
            id: RecipeId::new(1),
            owner: UserId::random(),
            title: RecipeTitle::new("Steak and mushroom sauce").expect("title"),
            time_minutes: 5,
            price: Price::from_cents(500).expect("price"),
            link: RecipeLink::default(),
            image: None,
            tags,
            ingredients,
        }
    }

    fn label(id: i64, kind: LabelKind) -> Label {
        Label::new(
            LabelId::new(id),
            UserId::random(),
            kind,
            LabelName::new("x").expect("name"),
        )
    }

    #[test]
    fn displays_as_title() {
        assert_eq!(recipe(vec![], vec![]).to_string(), "Steak and mushroom sauce");
    }

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(RecipeTitle::new("  "), Err(RecipeValidationError::BlankTitle));
    }

    #[test]
    fn filter_requires_any_match_per_dimension() {
        let subject = recipe(
            vec![label(1, LabelKind::Tag)],
            vec![label(7, LabelKind::Ingredient)],
        );
        let by_tag = RecipeFilter {
            tags: vec![LabelId::new(2), LabelId::new(1)],
            ingredients: vec![],
        };
        let both = RecipeFilter {
            tags: vec![LabelId::new(1)],
            ingredients: vec![LabelId::new(8)],
        };
        assert!(RecipeFilter::default().matches(&subject));
        assert!(by_tag.matches(&subject));
        assert!(!both.matches(&subject));
    }

    #[test]
    fn changes_keep_unspecified_fields() {
        let current = recipe(vec![label(3, LabelKind::Tag)], vec![]);
        let changes = RecipeChanges {
            title: Some(RecipeTitle::new("Chicken tikka").expect("title")),
            ..RecipeChanges::default()
        };
        let draft = changes.merge_into(&current);
        assert_eq!(draft.title.as_ref(), "Chicken tikka");
        assert_eq!(draft.price, current.price);
        assert_eq!(draft.tags, vec![LabelId::new(3)]);
    }
}
