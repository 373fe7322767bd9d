//! Off-topic detection.
//!
//! Two deliberately distinct checks. `is_query_off_topic` runs before
//! intent classification and combines explicit off-topic phrasing with a
//! keyword test. `is_general_query_off_topic` is a stricter second net,
//! applied only to queries the classifier already marked as general
//! small talk; it requires explicit anchored phrasing so that vague but
//! on-topic chatter is not refused. They overlap on purpose and must not
//! be merged: their call sites tolerate different false-positive rates.

use once_cell::sync::Lazy;

use super::PatternRule;

pub const OFF_TOPIC_REFUSAL: &str =
    "I specialize in mobile phone recommendations. I can help you find phones based on your budget, preferred features, or specific needs. What type of phone are you looking for?";

/// Topic-unrelated keywords. A query containing one of these and none of
/// the domain keywords is treated as off-topic.
const OFF_TOPIC_KEYWORDS: &[&str] = &[
    "weather",
    "news",
    "recipe",
    "cooking",
    "movie",
    "film",
    "book",
    "sports",
    "politics",
    "stock",
    "crypto",
    "bitcoin",
    "election",
    "music",
    "song",
    "lyrics",
    "poem",
    "poetry",
    "story",
    "game",
    "video game",
    "gaming pc",
    "console",
    "travel",
    "vacation",
    "hotel",
    "flight",
    "medical",
    "health",
    "doctor",
    "medicine",
    "legal",
    "lawyer",
    "court",
    "lawsuit",
    "astronomy",
    "space",
    "planet",
    "star",
    "history",
    "historical",
    "ancient",
    "mathematics",
    "math problem",
    "algebra",
    "translate",
    "translation",
    "language learning",
    "capital of",
    "president",
    "geography",
];

/// Domain-relevance keywords for the pre-classification check.
const DOMAIN_KEYWORDS: &[&str] = &[
    "phone",
    "mobile",
    "smartphone",
    "device",
    "camera",
    "battery",
    "display",
    "ram",
    "storage",
    "processor",
    "screen",
    "gb",
    "5g",
    "4g",
    "android",
    "ios",
    "pixel",
    "iphone",
    "samsung",
    "oneplus",
    "xiaomi",
    "oppo",
    "vivo",
    "realme",
    "charging",
    "specs",
    "specifications",
    "model",
    "brand",
    "handset",
    "cellphone",
];

/// Wider domain vocabulary used by the post-classification check; a hit
/// here immediately marks a general query as on-topic.
const GENERAL_DOMAIN_KEYWORDS: &[&str] = &[
    "phone",
    "mobile",
    "smartphone",
    "device",
    "camera",
    "battery",
    "display",
    "ram",
    "storage",
    "processor",
    "screen",
    "gb",
    "5g",
    "4g",
    "android",
    "ios",
    "pixel",
    "iphone",
    "samsung",
    "oneplus",
    "xiaomi",
    "oppo",
    "vivo",
    "realme",
    "charging",
    "specs",
    "specifications",
    "model",
    "brand",
    "handset",
    "cellphone",
    "app",
    "gaming",
    "performance",
    "speed",
    "megapixel",
    "mp",
    "refresh rate",
];

static EXPLICIT_OFF_TOPIC_RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        // Jokes and entertainment
        PatternRule::new(
            r"(?i)(^|\s)(tell|write|give|show)\s+(me\s+)?(a\s+|an\s+|some\s+)?(joke|story|poem|song|essay|riddle|quote)",
            None,
        ),
        PatternRule::new(r"(?i)(^|\s)(make|create)\s+(me\s+)?(a\s+|an\s+)?(poem|song|joke)", None),
        // Weather
        PatternRule::new(r"(?i)what'?s?\s+(the\s+)?(weather|temperature|forecast)", None),
        PatternRule::new(r"(?i)(is\s+it|will\s+it)\s+(rain|snow|sunny|hot|cold)", None),
        // Food and recipes
        PatternRule::new(
            r"(?i)(recipe|how\s+to\s+(cook|bake|make|prepare))\s+",
            Some(r"(?i)phone"),
        ),
        PatternRule::new(r"(?i)how\s+(do\s+i|to|can\s+i)\s+(cook|bake|prepare)\s+", None),
        // Politics and news
        PatternRule::new(
            r"(?i)who\s+(won|will\s+win|is\s+winning)\s+(the\s+)?(election|race|game|match)",
            None,
        ),
        PatternRule::new(r"(?i)(president|politics|politician|election|vote|voting)", None),
        // Geography
        PatternRule::new(r"(?i)what\s+(is|are)\s+(the\s+)?capital\s+of", None),
        PatternRule::new(r"(?i)where\s+is\s+", Some(r"(?i)(phone|mobile)")),
        // General knowledge
        PatternRule::new(r"(?i)when\s+(did|was|were)\s+", Some(r"(?i)phone")),
        PatternRule::new(r"(?i)who\s+(is|was|were|are)\s+", Some(r"(?i)phone")),
        // Math
        PatternRule::new(r"(?i)(calculate|solve|compute|do\s+this)\s+(math|equation|problem)", None),
        PatternRule::new(r"(?i)what\s+is\s+\d+\s*[+\-*/]", None),
        // Other creative tasks
        PatternRule::new(r"(?i)^(play|sing|draw|paint|dance|write\s+code)", None),
        PatternRule::new(r"(?i)translate\s+.*\s+to\s+", None),
    ]
});

static GENERAL_OFF_TOPIC_RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        // General knowledge questions
        PatternRule::new(
            r"(?i)^what (is|are) (the )?(capital|population|currency|language) of",
            None,
        ),
        PatternRule::new(
            r"(?i)^who (is|was|are|were) (the )?(president|king|queen|leader|founder|inventor)",
            None,
        ),
        PatternRule::new(r"(?i)^when (did|was|were|is|are)", None),
        PatternRule::new(r"(?i)^where (is|are|was|were|can i find)", None),
        // Entertainment requests
        PatternRule::new(
            r"(?i)^(tell|give|show) me (a |an |some )?(joke|story|poem|riddle|quote)",
            None,
        ),
        PatternRule::new(r"(?i)^write (a |an |me )?(poem|story|song|essay|letter)", None),
        // Instruction requests
        PatternRule::new(
            r"(?i)^how (to|do i|can i) (cook|bake|make|build|create|write|draw|paint) ",
            Some(r"(?i)phone"),
        ),
        // Weather and time
        PatternRule::new(r"(?i)^what'?s? (the |today'?s? )?(weather|temperature|time|date)", None),
        // Math
        PatternRule::new(
            r"(?i)^(calculate|solve|compute|what is) (\d+|\w+) (\+|-|\*|/|plus|minus|times|divided)",
            None,
        ),
        // Translation
        PatternRule::new(r"(?i)^(translate|how do you say) (.+) (in|to) ", Some(r"(?i)phone")),
    ]
});

/// True when the query contains at least one topic-unrelated keyword.
pub fn has_off_topic_keyword(query: &str) -> bool {
    let q = query.to_lowercase();
    OFF_TOPIC_KEYWORDS.iter().any(|k| q.contains(k))
}

/// True when the query contains at least one domain-relevance keyword.
pub fn has_domain_keyword(query: &str) -> bool {
    let q = query.to_lowercase();
    DOMAIN_KEYWORDS.iter().any(|k| q.contains(k))
}

/// Pre-classification off-topic check: explicit phrasing, or an
/// off-topic keyword with no domain keyword anywhere in the query.
pub fn is_query_off_topic(query: &str) -> bool {
    let q = query.to_lowercase();
    let q = q.trim();

    if EXPLICIT_OFF_TOPIC_RULES.iter().any(|r| r.is_match(q)) {
        return true;
    }

    has_off_topic_keyword(q) && !has_domain_keyword(q)
}

/// Post-classification check for queries the classifier marked as
/// general. Stricter: a domain keyword anywhere makes it on-topic, and
/// only explicitly anchored off-topic phrasing can flag it.
pub fn is_general_query_off_topic(query: &str) -> bool {
    let q = query.to_lowercase();
    let q = q.trim();

    if GENERAL_DOMAIN_KEYWORDS.iter().any(|k| q.contains(k)) {
        return false;
    }

    GENERAL_OFF_TOPIC_RULES.iter().any(|r| r.is_match(q))
}
