use serde::Serialize;

use crate::services::face_detection::FaceObservation;
use crate::services::sentiment::SentimentLabel;

/// Skills recognized in extracted document text, matched as case-insensitive
/// substrings.
pub(crate) const SKILL_KEYWORDS: &[&str] = &[
    "AWS",
    "Azure",
    "GCP",
    "Google Cloud",
    "Cloud Computing",
    "Docker",
    "Kubernetes",
    "Terraform",
    "Ansible",
    "CI/CD",
    "Jenkins",
    "GitHub Actions",
    "CloudFormation",
    "Python",
    "Java",
    "JavaScript",
    "TypeScript",
    "C++",
    "C#",
    "Go",
    "Ruby",
    "PHP",
    "Swift",
    "React",
    "Angular",
    "Vue",
    "Next.js",
    "Nuxt.js",
    "Spring Boot",
    "Django",
    "Flask",
    "Express",
    "SQL",
    "MySQL",
    "PostgreSQL",
    "NoSQL",
    "MongoDB",
    "DynamoDB",
    "Redis",
    "Elasticsearch",
    "Machine Learning",
    "Deep Learning",
    "TensorFlow",
    "Keras",
    "PyTorch",
    "Scikit-learn",
    "Pandas",
    "NumPy",
    "Data Science",
    "NLP",
    "Computer Vision",
    "Git",
    "GitHub",
    "Bitbucket",
    "Linux",
    "Networking",
    "REST API",
    "GraphQL",
    "Microservices",
    "Agile",
    "Scrum",
];

/// Keywords contributing to the transcript content sub-score.
const CONTENT_KEYWORDS: &[&str] =
    &["experience", "project", "internship", "developed", "built", "designed", "certification"];

const MAX_DOCUMENT_SCORE: u32 = 100;
const MAX_MENTION_SCORE: u32 = 20;

/// Sub-score used when the detector reported nothing to average over.
const NEUTRAL_BASELINE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) enum InternshipKind {
    #[serde(rename = "internship")]
    Internship,
    #[serde(rename = "industry experience")]
    IndustryExperience,
}

impl InternshipKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Internship => "internship",
            Self::IndustryExperience => "industry experience",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DocumentScore {
    pub(crate) score: u32,
    pub(crate) has_project: bool,
    pub(crate) has_internship: bool,
    pub(crate) internship_kind: Option<InternshipKind>,
    pub(crate) cert_count: u32,
}

pub(crate) fn extract_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    SKILL_KEYWORDS
        .iter()
        .filter(|skill| lower.contains(&skill.to_lowercase()))
        .map(|skill| skill.to_string())
        .collect()
}

pub(crate) fn score_document(skills: &[String], text: &str) -> DocumentScore {
    let lower = text.to_lowercase();

    let has_project = lower.contains("project");

    let (has_internship, internship_kind) = if lower.contains("internship") {
        (true, Some(InternshipKind::Internship))
    } else if lower.contains("industry experience") {
        (true, Some(InternshipKind::IndustryExperience))
    } else {
        (false, None)
    };

    let cert_count =
        (lower.matches("certificate").count() + lower.matches("certification").count()) as u32;

    let mut score = 10 + skills.len() as u32 * 3;
    if has_project {
        score += 10;
    }
    if has_internship {
        score += 10;
    }
    score += cert_count * 5;

    DocumentScore {
        score: score.min(MAX_DOCUMENT_SCORE),
        has_project,
        has_internship,
        internship_kind,
        cert_count,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct VideoSubScores {
    pub(crate) facial: f64,
    pub(crate) gesture: f64,
    pub(crate) grammar: u32,
    pub(crate) content: f64,
    pub(crate) communication: u32,
    pub(crate) project: u32,
    pub(crate) internship: u32,
    pub(crate) certification: u32,
}

impl VideoSubScores {
    /// Arithmetic mean of the eight sub-scores, rounded to two decimals.
    pub(crate) fn composite(&self) -> f64 {
        let total = self.facial
            + self.gesture
            + f64::from(self.grammar)
            + self.content
            + f64::from(self.communication)
            + f64::from(self.project)
            + f64::from(self.internship)
            + f64::from(self.certification);
        round2(total / 8.0)
    }

    pub(crate) fn confidence_level(&self) -> f64 {
        round2((self.facial + self.gesture) / 2.0)
    }
}

/// Persisted breakdown of a video analysis. `confidence_level` is derived from
/// facial and gesture but is not part of the eight-way composite.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct VideoScoreBreakdown {
    pub(crate) facial_expressions: f64,
    pub(crate) hand_gestures: f64,
    pub(crate) confidence_level: f64,
    pub(crate) communication_skills: u32,
    pub(crate) grammar: u32,
    pub(crate) content: f64,
    pub(crate) projects: u32,
    pub(crate) internship: u32,
    pub(crate) certifications: u32,
    pub(crate) total_score: f64,
}

impl VideoScoreBreakdown {
    pub(crate) fn from_sub_scores(sub: &VideoSubScores) -> Self {
        Self {
            facial_expressions: sub.facial,
            hand_gestures: sub.gesture,
            confidence_level: sub.confidence_level(),
            communication_skills: sub.communication,
            grammar: sub.grammar,
            content: sub.content,
            projects: sub.project,
            internship: sub.internship,
            certifications: sub.certification,
            total_score: sub.composite(),
        }
    }
}

/// Mean confidence of HAPPY emotion readings across all faces that report one.
pub(crate) fn facial_expression_score(faces: &[FaceObservation]) -> f64 {
    let confidences: Vec<f64> = faces
        .iter()
        .flat_map(|face| face.emotions.iter())
        .filter(|emotion| emotion.kind == "HAPPY")
        .map(|emotion| emotion.confidence)
        .collect();
    mean_or_baseline(&confidences)
}

/// Mean smile confidence across faces where a smile was actually detected.
pub(crate) fn smile_gesture_score(faces: &[FaceObservation]) -> f64 {
    let confidences: Vec<f64> = faces
        .iter()
        .filter_map(|face| face.smile.as_ref())
        .filter(|smile| smile.value)
        .map(|smile| smile.confidence)
        .collect();
    mean_or_baseline(&confidences)
}

pub(crate) fn grammar_score(word_count: usize) -> u32 {
    if word_count < 30 {
        50
    } else if word_count < 100 {
        70
    } else {
        90
    }
}

pub(crate) fn content_score(word_count: usize, keyword_hits: usize) -> f64 {
    (word_count as f64 / 2.0 + keyword_hits as f64 * 5.0).min(100.0)
}

pub(crate) fn content_keyword_hits(transcript: &str) -> usize {
    let lower = transcript.to_lowercase();
    CONTENT_KEYWORDS.iter().map(|keyword| lower.matches(keyword).count()).sum()
}

pub(crate) fn communication_score(sentiment: SentimentLabel) -> u32 {
    match sentiment {
        SentimentLabel::Positive => 90,
        SentimentLabel::Neutral => 75,
        _ => 60,
    }
}

pub(crate) fn mention_score(transcript: &str, term: &str) -> u32 {
    let count = transcript.to_lowercase().matches(term).count() as u32;
    (count * 5).min(MAX_MENTION_SCORE)
}

pub(crate) fn certification_mention_score(transcript: &str) -> u32 {
    let lower = transcript.to_lowercase();
    let count =
        (lower.matches("certification").count() + lower.matches("certificate").count()) as u32;
    (count * 5).min(MAX_MENTION_SCORE)
}

fn mean_or_baseline(values: &[f64]) -> f64 {
    if values.is_empty() {
        NEUTRAL_BASELINE
    } else {
        round2(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::face_detection::{EmotionReading, FaceObservation, SmileReading};

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn scores_known_scenario() {
        let text = "Led a project team. Holds a certification and another certification.";
        let outcome = score_document(&skills(&["Python", "AWS", "Docker"]), text);

        assert_eq!(outcome.score, 39);
        assert!(outcome.has_project);
        assert!(!outcome.has_internship);
        assert_eq!(outcome.internship_kind, None);
        assert_eq!(outcome.cert_count, 2);
    }

    #[test]
    fn document_score_stays_within_bounds() {
        let all_skills: Vec<String> = SKILL_KEYWORDS.iter().map(|s| s.to_string()).collect();
        let outcome = score_document(&all_skills, "project internship certification certificate");
        assert_eq!(outcome.score, 100);

        let floor = score_document(&[], "");
        assert_eq!(floor.score, 10);
        assert!(!floor.has_project);
        assert!(!floor.has_internship);
        assert_eq!(floor.cert_count, 0);
    }

    #[test]
    fn document_score_is_monotonic() {
        let base = score_document(&skills(&["Python"]), "plain text").score;
        let more_skills = score_document(&skills(&["Python", "AWS"]), "plain text").score;
        let with_project = score_document(&skills(&["Python"]), "a project").score;
        let with_certs = score_document(&skills(&["Python"]), "certificate").score;

        assert!(more_skills > base);
        assert!(with_project > base);
        assert!(with_certs > base);
    }

    #[test]
    fn internship_kind_prefers_literal_internship() {
        let outcome = score_document(&[], "internship and industry experience");
        assert_eq!(outcome.internship_kind, Some(InternshipKind::Internship));

        let outcome = score_document(&[], "industry experience only");
        assert_eq!(outcome.internship_kind, Some(InternshipKind::IndustryExperience));
        assert!(outcome.has_internship);
    }

    #[test]
    fn extract_skills_matches_case_insensitively_in_keyword_order() {
        let found = extract_skills("Shipped services in python on AWS with docker.");
        assert_eq!(found, skills(&["AWS", "Docker", "Python"]));
    }

    #[test]
    fn extract_skills_of_empty_text_is_empty() {
        assert!(extract_skills("").is_empty());
    }

    #[test]
    fn composite_is_exact_mean_to_two_decimals() {
        let sub = VideoSubScores {
            facial: 80.5,
            gesture: 70.25,
            grammar: 70,
            content: 33.5,
            communication: 75,
            project: 10,
            internship: 5,
            certification: 0,
        };
        // (80.5 + 70.25 + 70 + 33.5 + 75 + 10 + 5 + 0) / 8 = 43.03125
        assert_eq!(sub.composite(), 43.03);
        assert_eq!(sub.confidence_level(), 75.38);
    }

    #[test]
    fn empty_transcript_degrades_to_floor_values() {
        assert_eq!(grammar_score(0), 50);
        assert_eq!(content_score(0, 0), 0.0);
        assert_eq!(mention_score("", "project"), 0);
        assert_eq!(mention_score("", "internship"), 0);
        assert_eq!(certification_mention_score(""), 0);
    }

    #[test]
    fn grammar_score_brackets() {
        assert_eq!(grammar_score(29), 50);
        assert_eq!(grammar_score(30), 70);
        assert_eq!(grammar_score(99), 70);
        assert_eq!(grammar_score(100), 90);
    }

    #[test]
    fn content_score_clamps_at_one_hundred() {
        assert_eq!(content_score(300, 10), 100.0);
        assert_eq!(content_score(50, 2), 35.0);
    }

    #[test]
    fn content_keyword_hits_counts_occurrences() {
        let transcript = "I built a project and developed experience with another project";
        assert_eq!(content_keyword_hits(transcript), 5);
    }

    #[test]
    fn mention_score_clamps_at_twenty() {
        let transcript = "project ".repeat(10);
        assert_eq!(mention_score(&transcript, "project"), 20);
        assert_eq!(mention_score("one project", "project"), 5);
    }

    #[test]
    fn certification_counts_both_spellings() {
        assert_eq!(certification_mention_score("certificate and certification"), 10);
    }

    #[test]
    fn communication_score_maps_sentiment() {
        assert_eq!(communication_score(SentimentLabel::Positive), 90);
        assert_eq!(communication_score(SentimentLabel::Neutral), 75);
        assert_eq!(communication_score(SentimentLabel::Negative), 60);
        assert_eq!(communication_score(SentimentLabel::Mixed), 60);
    }

    fn face(happy: Option<f64>, smile: Option<(bool, f64)>) -> FaceObservation {
        FaceObservation {
            emotions: happy
                .map(|confidence| {
                    vec![EmotionReading { kind: "HAPPY".to_string(), confidence }]
                })
                .unwrap_or_default(),
            smile: smile.map(|(value, confidence)| SmileReading { value, confidence }),
        }
    }

    #[test]
    fn facial_score_averages_happy_confidences() {
        let faces = vec![face(Some(90.0), None), face(Some(70.0), None), face(None, None)];
        assert_eq!(facial_expression_score(&faces), 80.0);
    }

    #[test]
    fn facial_score_defaults_without_detections() {
        assert_eq!(facial_expression_score(&[]), 50.0);
        assert_eq!(facial_expression_score(&[face(None, None)]), 50.0);
    }

    #[test]
    fn gesture_score_only_counts_detected_smiles() {
        let faces = vec![
            face(None, Some((true, 88.0))),
            face(None, Some((false, 99.0))),
            face(None, Some((true, 62.0))),
        ];
        assert_eq!(smile_gesture_score(&faces), 75.0);
        assert_eq!(smile_gesture_score(&[face(None, Some((false, 99.0)))]), 50.0);
    }

    #[test]
    fn empty_transcript_scenario_composes_neutral_composite() {
        let transcript = "";
        let word_count = transcript.split_whitespace().count();
        let sub = VideoSubScores {
            facial: facial_expression_score(&[]),
            gesture: smile_gesture_score(&[]),
            grammar: grammar_score(word_count),
            content: content_score(word_count, content_keyword_hits(transcript)),
            communication: communication_score(SentimentLabel::Neutral),
            project: mention_score(transcript, "project"),
            internship: mention_score(transcript, "internship"),
            certification: certification_mention_score(transcript),
        };

        assert_eq!(sub.facial, 50.0);
        assert_eq!(sub.gesture, 50.0);
        assert_eq!(sub.grammar, 50);
        assert_eq!(sub.content, 0.0);
        // (50 + 50 + 50 + 0 + 75 + 0 + 0 + 0) / 8 = 28.125
        assert_eq!(sub.composite(), 28.13);
    }

    #[test]
    fn breakdown_mirrors_sub_scores() {
        let sub = VideoSubScores {
            facial: 50.0,
            gesture: 50.0,
            grammar: 50,
            content: 0.0,
            communication: 75,
            project: 0,
            internship: 0,
            certification: 0,
        };
        let breakdown = VideoScoreBreakdown::from_sub_scores(&sub);
        assert_eq!(breakdown.total_score, sub.composite());
        assert_eq!(breakdown.confidence_level, 50.0);
        assert_eq!(breakdown.communication_skills, 75);
    }
}
