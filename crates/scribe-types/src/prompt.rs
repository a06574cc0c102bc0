//! Prompt option catalogs and the prompt composer.
//!
//! The composer turns a set of independent UI selections into one
//! instruction string for the generation backend. The backend relies on a
//! stable instruction shape, so the phrase order below is fixed:
//!
//! event reference → output type → tone → platform → length → structure →
//! include phrases → avoid phrases → avoid topic → goal → variation phrases.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::content_type::ContentType;

/// Static catalog entry: the phrase in `prompt_text` is what lands in the
/// generated prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptOption {
    pub id: &'static str,
    pub label: &'static str,
    pub prompt_text: &'static str,
}

const fn opt(id: &'static str, label: &'static str, prompt_text: &'static str) -> PromptOption {
    PromptOption { id, label, prompt_text }
}

pub const PROMPT_TYPE_OPTIONS: &[PromptOption] = &[
    opt("social-media", "Social Media", "Create social media content."),
    opt("newsletter", "Newsletter", "Create newsletter content."),
    opt("blog-post", "Blog Post", "Create a blog post."),
    opt("donor-email", "Donor Email", "Create donor email content."),
];

pub const PROMPT_OUTPUT_OPTIONS: &[PromptOption] = &[
    opt("caption", "Generate a caption idea", "Generate a caption idea."),
    opt("email-hook", "Generate an email hook", "Generate an email hook subject line."),
    opt(
        "complete-post",
        "Generate a complete post",
        "Generate a complete post with a title, brief caption, body and hashtag sets.",
    ),
];

pub const WRITING_TONE_OPTIONS: &[PromptOption] = &[
    opt(
        "upbeat",
        "Make the tone upbeat and cheerful",
        "Write with a tone that sounds upbeat, cheerful and approachable.",
    ),
    opt(
        "warm",
        "Make the tone warm and human",
        "Write with a tone that sounds warm, inviting and empathetic.",
    ),
    opt(
        "professional",
        "Make the tone professional and direct",
        "Write with a tone that sounds professional and direct about impact.",
    ),
];

pub const SOCIAL_MEDIA_TYPE_OPTIONS: &[PromptOption] = &[
    opt("linkedin", "LinkedIn", "Write the post in a format suitable for LinkedIn."),
    opt("instagram", "Instagram", "Write the post in a format suitable for Instagram."),
];

pub const LENGTH_OPTIONS: &[PromptOption] = &[
    opt("150", "Keep under 150 words", "Keep under 150 words."),
    opt("300", "Keep under 300 words", "Keep under 300 words."),
    opt(
        "5para",
        "Keep concise with fewer than 5 total paragraphs",
        "Keep concise with fewer than 5 total paragraphs.",
    ),
];

pub const STRUCTURE_OPTIONS: &[PromptOption] = &[
    opt(
        "longer",
        "Use longer structured sentences when possible",
        "Use longer structured sentences when possible.",
    ),
    opt(
        "shorter",
        "Use shorter sentences when possible",
        "Use shorter sentences when possible.",
    ),
    opt(
        "bullets",
        "Include bullet point style formatting when necessary",
        "Include bullet point style formatting when necessary.",
    ),
];

pub const INCLUDE_OPTIONS: &[PromptOption] = &[
    opt("cta", "Include a call to action", "Include a call to action."),
    opt("data", "Include a data point", "Include a data point."),
    opt("credibility", "Include credibility signals", "Include credibility signals."),
];

pub const AVOID_OPTIONS: &[PromptOption] = &[
    opt("buzzwords", "Avoid buzzwords", "Avoid buzzwords."),
    opt("sales", "Avoid sounding sales-driven", "Avoid sounding sales-driven."),
];

pub const STRATEGIC_GOAL_OPTIONS: &[PromptOption] = &[
    opt("trust", "Focus on building trust", "Focus on building trust."),
    opt(
        "impact",
        "Focus on demonstrating measurable impact",
        "Focus on demonstrating measurable impact.",
    ),
    opt("awareness", "Focus on building awareness", "Focus on building awareness."),
];

pub const OUTPUT_VARIATION_OPTIONS: &[PromptOption] = &[
    opt(
        "hook-style",
        "Each variation should use a different hook style",
        "Each variation should use a different hook style.",
    ),
    opt(
        "statistic",
        "Each variation should emphasize a different statistic or fact",
        "Each variation should emphasize a different statistic or fact.",
    ),
    opt("concise", "Make one variation concise", "Make one variation concise."),
];

/// All option catalogs, as served to the prompt dialog.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptCatalog {
    pub prompt_type: &'static [PromptOption],
    pub prompt_output: &'static [PromptOption],
    pub writing_tone: &'static [PromptOption],
    pub social_media_type: &'static [PromptOption],
    pub length: &'static [PromptOption],
    pub structure: &'static [PromptOption],
    pub include: &'static [PromptOption],
    pub avoid: &'static [PromptOption],
    pub strategic_goal: &'static [PromptOption],
    pub output_variation: &'static [PromptOption],
}

pub const CATALOG: PromptCatalog = PromptCatalog {
    prompt_type: PROMPT_TYPE_OPTIONS,
    prompt_output: PROMPT_OUTPUT_OPTIONS,
    writing_tone: WRITING_TONE_OPTIONS,
    social_media_type: SOCIAL_MEDIA_TYPE_OPTIONS,
    length: LENGTH_OPTIONS,
    structure: STRUCTURE_OPTIONS,
    include: INCLUDE_OPTIONS,
    avoid: AVOID_OPTIONS,
    strategic_goal: STRATEGIC_GOAL_OPTIONS,
    output_variation: OUTPUT_VARIATION_OPTIONS,
};

/// Phrase of the option with `id`, if the catalog has one.
pub fn lookup(options: &[PromptOption], id: &str) -> Option<&'static str> {
    options.iter().find(|o| o.id == id).map(|o| o.prompt_text)
}

/// Insertion-ordered set of phrases. Empty phrases are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PhraseSet(Vec<String>);

impl PhraseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the phrase was already present (or empty).
    pub fn insert(&mut self, phrase: impl Into<String>) -> bool {
        let phrase = phrase.into();
        if phrase.is_empty() || self.contains(&phrase) {
            return false;
        }
        self.0.push(phrase);
        true
    }

    pub fn remove(&mut self, phrase: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|p| p != phrase);
        self.0.len() != before
    }

    /// Add the phrase if missing, drop it otherwise (checkbox semantics).
    pub fn toggle(&mut self, phrase: impl Into<String>) {
        let phrase = phrase.into();
        if !self.remove(&phrase) {
            self.insert(phrase);
        }
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.0.iter().any(|p| p == phrase)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PhraseSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = PhraseSet::new();
        for phrase in iter {
            set.insert(phrase);
        }
        set
    }
}

impl From<Vec<String>> for PhraseSet {
    fn from(phrases: Vec<String>) -> Self {
        phrases.into_iter().collect()
    }
}

impl From<PhraseSet> for Vec<String> {
    fn from(set: PhraseSet) -> Self {
        set.0
    }
}

/// Phrases chosen in the prompt dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptSelections {
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub prompt_output: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub social_type: Option<String>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub structure: Option<String>,
    #[serde(default)]
    pub include: PhraseSet,
    #[serde(default)]
    pub avoid: PhraseSet,
    #[serde(default)]
    pub avoid_topic: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub variations: PhraseSet,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Compose the instruction string. Absent or empty fields contribute
/// nothing; the result never carries leading, trailing or doubled spaces
/// introduced by missing fields.
pub fn build_prompt_from_selections(parts: &PromptSelections) -> String {
    let mut bits: Vec<String> = Vec::new();

    if let Some(event) = present(&parts.event_name) {
        bits.push(format!("Based on the event summary: \"{event}\"."));
    }
    for scalar in [
        &parts.prompt_output,
        &parts.tone,
        &parts.social_type,
        &parts.length,
        &parts.structure,
    ] {
        if let Some(phrase) = present(scalar) {
            bits.push(phrase.to_owned());
        }
    }
    for set in [&parts.include, &parts.avoid] {
        if !set.is_empty() {
            bits.push(set.iter().collect::<Vec<_>>().join(" "));
        }
    }
    if let Some(topic) = present(&parts.avoid_topic) {
        bits.push(format!("Avoid specific topic: {topic}."));
    }
    if let Some(goal) = present(&parts.goal) {
        bits.push(goal.to_owned());
    }
    if !parts.variations.is_empty() {
        bits.push(parts.variations.iter().collect::<Vec<_>>().join(" "));
    }

    bits.join(" ")
}

/// Option identifiers chosen in the prompt dialog.
///
/// [`PromptChoices::resolve`] maps them onto catalog phrases; identifiers the
/// catalogs do not know contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptChoices {
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub prompt_output: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub social_type: Option<String>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub structure: Option<String>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub avoid: Vec<String>,
    #[serde(default)]
    pub avoid_topic: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub variations: Vec<String>,
}

impl PromptChoices {
    pub fn resolve(&self) -> PromptSelections {
        let single = |options: &[PromptOption], id: &Option<String>| {
            id.as_deref().and_then(|id| lookup(options, id)).map(str::to_owned)
        };
        let many = |options: &[PromptOption], ids: &[String]| {
            ids.iter().filter_map(|id| lookup(options, id)).collect::<PhraseSet>()
        };

        // The platform picker only exists for social media posts.
        let social_type = if self.content_type == ContentType::SocialMedia {
            single(SOCIAL_MEDIA_TYPE_OPTIONS, &self.social_type)
        } else {
            None
        };

        PromptSelections {
            event_name: self.event_name.clone().filter(|e| !e.is_empty()),
            prompt_output: single(PROMPT_OUTPUT_OPTIONS, &self.prompt_output),
            tone: single(WRITING_TONE_OPTIONS, &self.tone),
            social_type,
            length: single(LENGTH_OPTIONS, &self.length),
            structure: single(STRUCTURE_OPTIONS, &self.structure),
            include: many(INCLUDE_OPTIONS, &self.include),
            avoid: many(AVOID_OPTIONS, &self.avoid),
            avoid_topic: self
                .avoid_topic
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
            goal: single(STRATEGIC_GOAL_OPTIONS, &self.goal),
            variations: many(OUTPUT_VARIATION_OPTIONS, &self.variations),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_selections_build_empty_prompt() {
        assert_eq!(build_prompt_from_selections(&PromptSelections::default()), "");
    }

    #[test]
    fn caption_scenario() {
        let selections = PromptSelections {
            prompt_output: Some("Generate a caption idea.".into()),
            tone: Some("Write with a tone that sounds upbeat, cheerful and approachable.".into()),
            length: Some("Keep under 150 words.".into()),
            include: ["Include a call to action."].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(
            build_prompt_from_selections(&selections),
            "Generate a caption idea. Write with a tone that sounds upbeat, cheerful and \
             approachable. Keep under 150 words. Include a call to action."
        );
    }

    #[test]
    fn event_and_avoid_topic_are_wrapped() {
        let selections = PromptSelections {
            event_name: Some("Spring Gala".into()),
            avoid_topic: Some("politics".into()),
            goal: Some("Focus on building trust.".into()),
            ..Default::default()
        };
        assert_eq!(
            build_prompt_from_selections(&selections),
            "Based on the event summary: \"Spring Gala\". Avoid specific topic: politics. \
             Focus on building trust."
        );
    }

    #[test]
    fn empty_strings_are_treated_as_absent() {
        let selections = PromptSelections {
            tone: Some(String::new()),
            length: Some("Keep under 300 words.".into()),
            ..Default::default()
        };
        assert_eq!(build_prompt_from_selections(&selections), "Keep under 300 words.");
    }

    #[test]
    fn phrase_set_keeps_first_insertion_order() {
        let mut set = PhraseSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert!(!set.insert(""));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "a"]);
        set.toggle("b");
        set.toggle("c");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn phrase_set_deserialization_drops_duplicates() {
        let set: PhraseSet = serde_json::from_str(r#"["x","y","x"]"#).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn choices_resolve_through_catalogs() {
        let choices = PromptChoices {
            content_type: ContentType::SocialMedia,
            prompt_output: Some("caption".into()),
            social_type: Some("instagram".into()),
            include: vec!["cta".into(), "nope".into(), "cta".into()],
            avoid_topic: Some("   ".into()),
            ..Default::default()
        };
        let selections = choices.resolve();
        assert_eq!(selections.prompt_output.as_deref(), Some("Generate a caption idea."));
        assert_eq!(
            selections.social_type.as_deref(),
            Some("Write the post in a format suitable for Instagram.")
        );
        assert_eq!(selections.include.iter().collect::<Vec<_>>(), vec!["Include a call to action."]);
        assert_eq!(selections.avoid_topic, None);
    }

    #[test]
    fn platform_ignored_outside_social_media() {
        let choices = PromptChoices {
            content_type: ContentType::Newsletter,
            social_type: Some("linkedin".into()),
            ..Default::default()
        };
        assert_eq!(choices.resolve().social_type, None);
    }

    #[test]
    fn unknown_ids_contribute_nothing() {
        let choices = PromptChoices {
            tone: Some("sarcastic".into()),
            goal: Some("virality".into()),
            ..Default::default()
        };
        assert_eq!(build_prompt_from_selections(&choices.resolve()), "");
    }

    fn maybe(options: &'static [PromptOption]) -> impl Strategy<Value = Option<String>> {
        proptest::option::of(proptest::sample::select(options).prop_map(|o| o.prompt_text.to_owned()))
    }

    fn phrases(options: &'static [PromptOption]) -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec(
            proptest::sample::select(options).prop_map(|o| o.prompt_text.to_owned()),
            0..6,
        )
    }

    prop_compose! {
        fn arb_selections()(
            event_name in proptest::option::of("[A-Za-z]{1,12}"),
            prompt_output in maybe(PROMPT_OUTPUT_OPTIONS),
            tone in maybe(WRITING_TONE_OPTIONS),
            social_type in maybe(SOCIAL_MEDIA_TYPE_OPTIONS),
            length in maybe(LENGTH_OPTIONS),
            structure in maybe(STRUCTURE_OPTIONS),
            include in phrases(INCLUDE_OPTIONS),
            avoid in phrases(AVOID_OPTIONS),
            avoid_topic in proptest::option::of("[a-z]{1,10}"),
            goal in maybe(STRATEGIC_GOAL_OPTIONS),
            variations in phrases(OUTPUT_VARIATION_OPTIONS),
        ) -> PromptSelections {
            PromptSelections {
                event_name,
                prompt_output,
                tone,
                social_type,
                length,
                structure,
                include: include.into_iter().collect(),
                avoid: avoid.into_iter().collect(),
                avoid_topic,
                goal,
                variations: variations.into_iter().collect(),
            }
        }
    }

    proptest! {
        #[test]
        fn output_follows_declared_field_order(s in arb_selections()) {
            let prompt = build_prompt_from_selections(&s);

            let mut expected: Vec<String> = Vec::new();
            if let Some(e) = &s.event_name {
                expected.push(format!("Based on the event summary: \"{e}\"."));
            }
            expected.extend(
                [&s.prompt_output, &s.tone, &s.social_type, &s.length, &s.structure]
                    .into_iter()
                    .flatten()
                    .cloned(),
            );
            expected.extend(s.include.iter().map(str::to_owned));
            expected.extend(s.avoid.iter().map(str::to_owned));
            if let Some(t) = &s.avoid_topic {
                expected.push(format!("Avoid specific topic: {t}."));
            }
            expected.extend(s.goal.iter().cloned());
            expected.extend(s.variations.iter().map(str::to_owned));

            prop_assert_eq!(prompt, expected.join(" "));
        }

        #[test]
        fn output_has_no_stray_separators(s in arb_selections()) {
            let prompt = build_prompt_from_selections(&s);
            prop_assert!(!prompt.starts_with(' '));
            prop_assert!(!prompt.ends_with(' '));
            prop_assert!(!prompt.contains("  "));
        }

        #[test]
        fn repeated_phrases_appear_once(picks in phrases(INCLUDE_OPTIONS)) {
            let mut doubled = picks.clone();
            doubled.extend(picks.iter().cloned());
            let selections = PromptSelections {
                include: doubled.into_iter().collect(),
                ..Default::default()
            };
            let prompt = build_prompt_from_selections(&selections);

            let mut unique: Vec<String> = Vec::new();
            for p in picks {
                if !unique.contains(&p) {
                    unique.push(p);
                }
            }
            prop_assert_eq!(selections.include.len(), unique.len());
            prop_assert_eq!(prompt, unique.join(" "));
        }
    }
}
