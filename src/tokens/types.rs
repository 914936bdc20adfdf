use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Token taxonomy categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenCategory {
    Color,
    Spacing,
    Typography,
    Effect,
    Border,
}

impl TokenCategory {
    pub const ALL: [TokenCategory; 5] = [
        TokenCategory::Color,
        TokenCategory::Spacing,
        TokenCategory::Typography,
        TokenCategory::Effect,
        TokenCategory::Border,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenCategory::Color => "color",
            TokenCategory::Spacing => "spacing",
            TokenCategory::Typography => "typography",
            TokenCategory::Effect => "effect",
            TokenCategory::Border => "border",
        }
    }

    /// Lenient parse of the category labels a generator tends to produce
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "color" | "colors" | "colour" | "colours" => Some(TokenCategory::Color),
            "spacing" | "space" | "padding" | "gap" => Some(TokenCategory::Spacing),
            "typography" | "font" | "fonts" | "text" => Some(TokenCategory::Typography),
            "effect" | "effects" | "shadow" | "shadows" | "elevation" => Some(TokenCategory::Effect),
            "border" | "borders" | "radius" | "stroke" => Some(TokenCategory::Border),
            _ => None,
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a token's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenOrigin {
    DesignSystemReference,
    HardCoded,
    AiSuggestion,
}

impl TokenOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenOrigin::DesignSystemReference => "design-system-reference",
            TokenOrigin::HardCoded => "hard-coded",
            TokenOrigin::AiSuggestion => "ai-suggestion",
        }
    }
}

/// A named, classified visual value
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DesignToken {
    pub name: String,
    pub value: String,
    pub category: TokenCategory,
    pub origin: TokenOrigin,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub suggestion: String,
}

impl DesignToken {
    pub fn is_actual_token(&self) -> bool {
        self.origin == TokenOrigin::DesignSystemReference
    }
}

// Hand-written so `is_actual_token` is always derived from `origin`
impl Serialize for DesignToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DesignToken", 7)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("category", &self.category)?;
        state.serialize_field("origin", &self.origin)?;
        state.serialize_field("is_actual_token", &self.is_actual_token())?;
        state.serialize_field("recommendation", &self.recommendation)?;
        state.serialize_field("suggestion", &self.suggestion)?;
        state.end()
    }
}

/// Per-category token lists.
///
/// Lists are only reachable through [`TokenAnalysis::push`], which enforces
/// the (value, origin) uniqueness rule, and the summary is always computed
/// from the lists, so counts can never drift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "TokenAnalysisRepr", from = "TokenAnalysisRepr")]
pub struct TokenAnalysis {
    color: Vec<DesignToken>,
    spacing: Vec<DesignToken>,
    typography: Vec<DesignToken>,
    effect: Vec<DesignToken>,
    border: Vec<DesignToken>,
}

impl TokenAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token unless its (value, origin) pair is already in the
    /// category. The first occurrence wins. Returns whether it was added.
    pub fn push(&mut self, token: DesignToken) -> bool {
        let list = self.list_mut(token.category);
        if list
            .iter()
            .any(|t| t.value == token.value && t.origin == token.origin)
        {
            return false;
        }
        list.push(token);
        true
    }

    pub fn tokens(&self, category: TokenCategory) -> &[DesignToken] {
        match category {
            TokenCategory::Color => &self.color,
            TokenCategory::Spacing => &self.spacing,
            TokenCategory::Typography => &self.typography,
            TokenCategory::Effect => &self.effect,
            TokenCategory::Border => &self.border,
        }
    }

    fn list_mut(&mut self, category: TokenCategory) -> &mut Vec<DesignToken> {
        match category {
            TokenCategory::Color => &mut self.color,
            TokenCategory::Spacing => &mut self.spacing,
            TokenCategory::Typography => &mut self.typography,
            TokenCategory::Effect => &mut self.effect,
            TokenCategory::Border => &mut self.border,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DesignToken> {
        TokenCategory::ALL
            .into_iter()
            .flat_map(move |c| self.tokens(c).iter())
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Whether any token of the category already carries this value
    pub fn contains_value(&self, category: TokenCategory, value: &str) -> bool {
        self.tokens(category).iter().any(|t| t.value == value)
    }

    pub fn count_origin(&self, category: TokenCategory, origin: TokenOrigin) -> usize {
        self.tokens(category)
            .iter()
            .filter(|t| t.origin == origin)
            .count()
    }

    pub fn summary(&self) -> TokenSummary {
        let mut by_category = BTreeMap::new();
        for category in TokenCategory::ALL {
            by_category.insert(
                category,
                CategoryCounts {
                    total: self.tokens(category).len(),
                    actual: self.count_origin(category, TokenOrigin::DesignSystemReference),
                    hard_coded: self.count_origin(category, TokenOrigin::HardCoded),
                    ai_suggestions: self.count_origin(category, TokenOrigin::AiSuggestion),
                },
            );
        }

        TokenSummary {
            total_tokens: by_category.values().map(|c| c.total).sum(),
            actual_tokens: by_category.values().map(|c| c.actual).sum(),
            hard_coded_values: by_category.values().map(|c| c.hard_coded).sum(),
            ai_suggestions: by_category.values().map(|c| c.ai_suggestions).sum(),
            by_category,
        }
    }

    /// Sorted `category:isActualToken:origin` triples
    pub fn fingerprint_triples(&self) -> Vec<String> {
        let mut triples: Vec<String> = self
            .iter()
            .map(|t| {
                format!(
                    "{}:{}:{}",
                    t.category.as_str(),
                    t.is_actual_token(),
                    t.origin.as_str()
                )
            })
            .collect();
        triples.sort();
        triples
    }
}

/// Counts derived from a [`TokenAnalysis`]; never stored independently
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSummary {
    pub total_tokens: usize,
    pub actual_tokens: usize,
    pub hard_coded_values: usize,
    pub ai_suggestions: usize,
    pub by_category: BTreeMap<TokenCategory, CategoryCounts>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub total: usize,
    pub actual: usize,
    pub hard_coded: usize,
    pub ai_suggestions: usize,
}

/// Wire shape: the lists plus a freshly computed summary. An incoming
/// summary is ignored and recomputed.
#[derive(Serialize, Deserialize)]
struct TokenAnalysisRepr {
    #[serde(default)]
    color: Vec<DesignToken>,
    #[serde(default)]
    spacing: Vec<DesignToken>,
    #[serde(default)]
    typography: Vec<DesignToken>,
    #[serde(default)]
    effect: Vec<DesignToken>,
    #[serde(default)]
    border: Vec<DesignToken>,
    #[serde(default)]
    summary: TokenSummary,
}

impl From<TokenAnalysis> for TokenAnalysisRepr {
    fn from(analysis: TokenAnalysis) -> Self {
        let summary = analysis.summary();
        Self {
            color: analysis.color,
            spacing: analysis.spacing,
            typography: analysis.typography,
            effect: analysis.effect,
            border: analysis.border,
            summary,
        }
    }
}

impl From<TokenAnalysisRepr> for TokenAnalysis {
    fn from(repr: TokenAnalysisRepr) -> Self {
        let mut analysis = TokenAnalysis::new();
        let lists = [repr.color, repr.spacing, repr.typography, repr.effect, repr.border];
        for token in lists.into_iter().flatten() {
            analysis.push(token);
        }
        analysis
    }
}
