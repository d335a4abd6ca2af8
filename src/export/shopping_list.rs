//! Checkbox shopping list built from a recipe's ingredients section.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static IMAGE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid image regex"));
static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]\s*").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Produce,
    Proteins,
    Dairy,
    Bakery,
    Pantry,
    Spices,
    Frozen,
    Beverages,
    Other,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Produce => "Produce",
            Category::Proteins => "Proteins",
            Category::Dairy => "Dairy",
            Category::Bakery => "Bakery",
            Category::Pantry => "Pantry",
            Category::Spices => "Spices",
            Category::Frozen => "Frozen",
            Category::Beverages => "Beverages",
            Category::Other => "Other",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Produce => "🥬",
            Category::Proteins => "🥩",
            Category::Dairy => "🥛",
            Category::Bakery => "🥖",
            Category::Pantry => "🥫",
            Category::Spices => "🌶️",
            Category::Frozen => "🧊",
            Category::Beverages => "🥤",
            Category::Other => "🛒",
        }
    }
}

/// Keyword tables checked in this order; the first hit decides.
const KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Produce,
        &[
            "lettuce", "tomato", "onion", "garlic", "pepper", "carrot", "celery", "cucumber",
            "spinach", "kale", "potato", "broccoli", "cauliflower", "mushroom", "zucchini",
            "squash", "bean", "peas", "corn", "avocado", "lime", "lemon", "orange", "apple",
            "banana", "berries", "ginger", "herbs", "cilantro", "parsley", "basil", "mint",
            "thyme", "rosemary", "cabbage", "scallion",
        ],
    ),
    (
        Category::Proteins,
        &[
            "chicken", "beef", "pork", "lamb", "fish", "salmon", "tuna", "shrimp", "prawn",
            "tofu", "egg", "turkey", "duck", "bacon", "sausage", "ham", "steak", "mince",
        ],
    ),
    (
        Category::Dairy,
        &[
            "milk", "cream", "butter", "cheese", "yogurt", "parmesan", "mozzarella",
            "cheddar", "feta", "ricotta",
        ],
    ),
    (
        Category::Pantry,
        &[
            "rice", "pasta", "noodles", "flour", "sugar", "salt", "oil", "vinegar",
            "soy sauce", "sauce", "stock", "broth", "canned", "dried", "wrapper",
        ],
    ),
    (
        Category::Spices,
        &[
            "cumin", "paprika", "chili", "cinnamon", "nutmeg", "oregano", "turmeric",
            "coriander", "cardamom", "clove", "cayenne", "curry",
        ],
    ),
    (
        Category::Bakery,
        &["bread", "rolls", "buns", "tortilla", "pita", "baguette", "croissant"],
    ),
    (Category::Frozen, &["frozen", "ice cream"]),
    (
        Category::Beverages,
        &["wine", "beer", "juice", "coffee", "tea", "water"],
    ),
];

/// List items found under the first heading that mentions "ingredient".
/// Image references are stripped from each item.
pub fn extract_ingredients(markdown: &str) -> Vec<String> {
    let mut ingredients = Vec::new();
    let mut in_section = false;

    for line in markdown.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            if in_section {
                break;
            }
            in_section = trimmed.to_lowercase().contains("ingredient");
            continue;
        }
        if !in_section {
            continue;
        }

        let item = if let Some(rest) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            rest
        } else if let Some(m) = NUMBERED.find(trimmed) {
            &trimmed[m.end()..]
        } else {
            continue;
        };

        let cleaned = IMAGE_REF.replace_all(item, "");
        let cleaned = cleaned.trim();
        if !cleaned.is_empty() {
            ingredients.push(cleaned.to_string());
        }
    }

    ingredients
}

pub fn categorize(ingredient: &str) -> Category {
    let lower = ingredient.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|word| lower.contains(word)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// Render the shopping list markdown, categories in store-walk order and
/// items sorted within each.
pub fn generate_shopping_list(markdown: &str) -> String {
    let ingredients = extract_ingredients(markdown);
    if ingredients.is_empty() {
        return "# Shopping List\n\nNo ingredients found.\n".to_string();
    }

    let mut grouped: BTreeMap<Category, Vec<String>> = BTreeMap::new();
    for ingredient in ingredients {
        grouped
            .entry(categorize(&ingredient))
            .or_default()
            .push(ingredient);
    }

    let mut out = String::from("# 🛒 Shopping List\n\n");
    for (category, mut items) in grouped {
        items.sort();
        out.push_str(&format!("## {} {}\n\n", category.emoji(), category.label()));
        for item in items {
            out.push_str(&format!("- [ ] {}\n", item));
        }
        out.push('\n');
    }
    out
}
