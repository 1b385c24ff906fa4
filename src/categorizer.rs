use crate::error::{AppError, Result};
use crate::llm::Completion;
use crate::models::Category;

/// Keyword dictionary, checked in order. The first category with a keyword
/// contained in the lower-cased text wins. `Other` has no keywords and is
/// only ever assigned as a fallback.
pub const DICTIONARY: &[(Category, &[&str])] = &[
    (
        Category::Food,
        &[
            "продукт", "кафе", "ресторан", "бургер", "пицц", "шаурм", "кофе", "обедал",
            "на обед", "ланч", "ужин", "завтрак", "суши", "столовая", "доставк", "food",
            "lunch", "dinner", "coffee", "burger", "pizza", "grocer",
        ],
    ),
    (
        Category::Clothing,
        &[
            "одежд", "куртк", "джинс", "обувь", "кроссовк", "футболк", "плать", "рубашк",
            "шапк", "носки", "clothes", "shoes", "jacket", "jeans",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "кино", "концерт", "театр", "видеоигр", "игрушк", "ночной клуб", "боулинг",
            "караоке", "подписк", "netflix", "spotify", "cinema", "movie", "concert",
            "video game",
        ],
    ),
    (
        Category::Transport,
        &[
            "такси", "автобус", "метро", "бензин", "топлив", "парковк", "поезд", "самол",
            "проезд", "taxi", "uber", "bus fare", "bus ticket", "fuel", "parking",
            "train ticket", "subway",
        ],
    ),
    (
        Category::Home,
        &[
            "квартир", "аренд", "коммунал", "электричеств", "интернет", "мебел", "ремонт",
            "посуд", "landlord", "utilities", "furniture", "internet",
        ],
    ),
    (Category::Other, &[]),
];

/// Deterministic keyword match. `None` means no category's keyword occurs in
/// the text.
pub fn match_category(text: &str) -> Option<Category> {
    let lower = text.to_lowercase();
    DICTIONARY
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
}

const CLASSIFY_SYSTEM: &str = "You classify personal expenses. \
Answer with exactly one word from this list and nothing else: \
Food, Clothing, Entertainment, Transport, Home, Other.";

/// How a category was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Keyword,
    Model,
}

/// Keyword match first, then a single language-model attempt. A failed model
/// call is an error; an unusable model answer is coerced to `Other`.
pub async fn classify(text: &str, llm: &dyn Completion) -> Result<(Category, Source)> {
    if let Some(category) = match_category(text) {
        return Ok((category, Source::Keyword));
    }

    let user = format!("Classify this expense: \"{text}\"");
    let answer = llm
        .complete(CLASSIFY_SYSTEM, &user)
        .await
        .map_err(|e| AppError::ClassificationFailure(e.to_string()))?;

    let category = Category::coerce(&answer);
    if Category::parse(answer.trim()).is_none() {
        tracing::warn!(answer = %answer, "model returned an unknown category, using Other");
    }
    Ok((category, Source::Model))
}
