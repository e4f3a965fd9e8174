use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Feedback a user can attach to an assistant message.
///
/// Positive/negative/neutral are the top-level verdicts; the remaining tags
/// are the quality and harm sub-reasons offered after a negative verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTag {
    Neutral,
    Positive,
    Negative,
    MissingCitation,
    WrongCitation,
    OutOfScope,
    InaccurateOrIrrelevant,
    OtherUnhelpful,
    HateSpeech,
    Violent,
    Sexual,
    Manipulative,
    // The remote store persists this exact spelling.
    #[serde(rename = "other_harmlful")]
    OtherHarmful,
}

impl FeedbackTag {
    pub fn all() -> [FeedbackTag; 13] {
        [
            FeedbackTag::Neutral,
            FeedbackTag::Positive,
            FeedbackTag::Negative,
            FeedbackTag::MissingCitation,
            FeedbackTag::WrongCitation,
            FeedbackTag::OutOfScope,
            FeedbackTag::InaccurateOrIrrelevant,
            FeedbackTag::OtherUnhelpful,
            FeedbackTag::HateSpeech,
            FeedbackTag::Violent,
            FeedbackTag::Sexual,
            FeedbackTag::Manipulative,
            FeedbackTag::OtherHarmful,
        ]
    }

    /// Wire value sent to `/history/message_feedback`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackTag::Neutral => "neutral",
            FeedbackTag::Positive => "positive",
            FeedbackTag::Negative => "negative",
            FeedbackTag::MissingCitation => "missing_citation",
            FeedbackTag::WrongCitation => "wrong_citation",
            FeedbackTag::OutOfScope => "out_of_scope",
            FeedbackTag::InaccurateOrIrrelevant => "inaccurate_or_irrelevant",
            FeedbackTag::OtherUnhelpful => "other_unhelpful",
            FeedbackTag::HateSpeech => "hate_speech",
            FeedbackTag::Violent => "violent",
            FeedbackTag::Sexual => "sexual",
            FeedbackTag::Manipulative => "manipulative",
            FeedbackTag::OtherHarmful => "other_harmlful",
        }
    }

    /// True for the harm sub-reasons (as opposed to quality ones).
    pub fn is_harm(&self) -> bool {
        matches!(
            self,
            FeedbackTag::HateSpeech
                | FeedbackTag::Violent
                | FeedbackTag::Sexual
                | FeedbackTag::Manipulative
                | FeedbackTag::OtherHarmful
        )
    }
}

impl fmt::Display for FeedbackTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedbackTag::all()
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("unknown feedback tag: {s}"))
    }
}
