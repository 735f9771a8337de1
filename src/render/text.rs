//! The service sometimes answers with a markdown-like string instead of a
//! structured report. Such text is drawn line by line: each line is matched
//! against an ordered rule table and the first rule that matches decides how
//! it is shown. Rules overlap (a sub-heading also contains `**`, a bold
//! paragraph may start with `*`), so the order of [`RULES`] is significant.

use std::sync::LazyLock;

use regex::Regex;

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\.").expect("this must never fail"));

/// A classified line of free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A blank line; drawn as vertical space.
    Spacer,
    /// A section heading (`## ...`).
    Heading(String),
    /// A sub-heading (`**Label:**`), drawn with a divider beneath.
    SubHeading(String),
    /// A numbered requirement (`3. ...`).
    Numbered {
        /// The number, as written.
        number: String,
        /// The text after the number.
        body: String,
    },
    /// A bulleted fact (`* ...`), styled by what it talks about.
    Fact {
        /// What the fact is about.
        kind: FactKind,
        /// The text after the bullet.
        text: String,
    },
    /// A paragraph with bold runs.
    Emphasis(Vec<Span>),
    /// A horizontal divider.
    Divider,
    /// A plain paragraph, verbatim.
    Paragraph(String),
}

/// A run of text within an [`Line::Emphasis`] paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// The text of the run.
    pub text: String,
    /// Whether the run is bold.
    pub bold: bool,
}

/// What a bulleted fact talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactKind {
    /// Money.
    Cost,
    /// Durations.
    Time,
    /// Tips and recommendations.
    Tip,
    /// Explanations.
    Explanation,
    /// Anything else.
    General,
}

impl FactKind {
    /// Checked in order; the first kind with a matching keyword wins.
    const KEYWORDS: [(Self, &'static [&'static str]); 4] = [
        (Self::Cost, &["עלות", "₪"]),
        (Self::Time, &["זמן", "שבוע", "ימים"]),
        (Self::Tip, &["טיפ", "המלצה"]),
        (Self::Explanation, &["עברית פשוטה", "הסבר"]),
    ];

    /// Works out what `text` talks about by keyword.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        Self::KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
            .map_or(Self::General, |(kind, _)| *kind)
    }
}

struct Rule {
    name: &'static str,
    matches: fn(&str) -> bool,
    build: fn(&str) -> Line,
}

const RULES: [Rule; 8] = [
    Rule {
        name: "spacer",
        matches: is_blank,
        build: spacer,
    },
    Rule {
        name: "heading",
        matches: is_heading,
        build: heading,
    },
    Rule {
        name: "sub-heading",
        matches: is_sub_heading,
        build: sub_heading,
    },
    Rule {
        name: "numbered",
        matches: is_numbered,
        build: numbered,
    },
    Rule {
        name: "fact",
        matches: is_fact,
        build: fact,
    },
    Rule {
        name: "emphasis",
        matches: has_bold,
        build: emphasis,
    },
    Rule {
        name: "divider",
        matches: is_divider,
        build: divider,
    },
    Rule {
        name: "paragraph",
        matches: always,
        build: paragraph,
    },
];

/// Classifies every line of `text`.
#[must_use]
pub fn classify(text: &str) -> Vec<Line> {
    text.split('\n').map(classify_line).collect()
}

/// Classifies a single line.
#[must_use]
pub fn classify_line(line: &str) -> Line {
    RULES
        .iter()
        .find(|rule| (rule.matches)(line))
        .map_or_else(
            || paragraph(line),
            |rule| {
                tracing::trace!(rule = rule.name, line, "classified line");
                (rule.build)(line)
            },
        )
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn spacer(_: &str) -> Line {
    Line::Spacer
}

fn is_heading(line: &str) -> bool {
    line.starts_with("##")
}

fn heading(line: &str) -> Line {
    Line::Heading(line.replace("##", "").trim().to_string())
}

fn is_sub_heading(line: &str) -> bool {
    line.contains("**") && line.contains(":**")
}

fn sub_heading(line: &str) -> Line {
    Line::SubHeading(line.replace("**", "").replacen(':', "", 1))
}

/// Matches on the trimmed line, so an indented `  12. ...` is still an item
/// with number `12`. Leading whitespace does not demote it to a paragraph.
fn is_numbered(line: &str) -> bool {
    NUMBERED_ITEM.is_match(line.trim())
}

fn numbered(line: &str) -> Line {
    let line = line.trim();
    let Some(captures) = NUMBERED_ITEM.captures(line) else {
        return paragraph(line);
    };
    Line::Numbered {
        number: captures[1].to_string(),
        body: line[captures[0].len()..].trim().to_string(),
    }
}

fn is_fact(line: &str) -> bool {
    line.trim().starts_with('*') && !line.contains("**")
}

fn fact(line: &str) -> Line {
    let text = line.trim().trim_start_matches('*').trim();
    Line::Fact {
        kind: FactKind::detect(text),
        text: text.to_string(),
    }
}

fn has_bold(line: &str) -> bool {
    line.contains("**")
}

/// Every `**` toggles bold, paired or not.
fn emphasis(line: &str) -> Line {
    Line::Emphasis(
        line.split("**")
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .map(|(i, text)| Span {
                text: text.to_string(),
                bold: i % 2 == 1,
            })
            .collect(),
    )
}

fn is_divider(line: &str) -> bool {
    line.contains("---")
}

fn divider(_: &str) -> Line {
    Line::Divider
}

const fn always(_: &str) -> bool {
    true
}

fn paragraph(line: &str) -> Line {
    Line::Paragraph(line.to_string())
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn plain(text: &str) -> Span {
        Span {
            text: text.to_string(),
            bold: false,
        }
    }

    fn bold(text: &str) -> Span {
        Span {
            text: text.to_string(),
            bold: true,
        }
    }

    #[test_case(""; "empty")]
    #[test_case("   \t"; "whitespace only")]
    fn blank_lines_are_spacers(line: &str) {
        assert_eq!(classify_line(line), Line::Spacer);
    }

    #[test]
    fn heading_marker_is_stripped() {
        assert_eq!(
            classify_line("## Title"),
            Line::Heading("Title".to_string())
        );
    }

    #[test]
    fn sub_heading_strips_markers_and_first_colon() {
        assert_eq!(
            classify_line("**Label:**"),
            Line::SubHeading("Label".to_string())
        );
        assert_eq!(
            classify_line("**שעות: פתיחה:**"),
            Line::SubHeading("שעות פתיחה:".to_string())
        );
    }

    #[test]
    fn numbered_item_captures_number_and_body() {
        assert_eq!(
            classify_line("1. Do X"),
            Line::Numbered {
                number: "1".to_string(),
                body: "Do X".to_string()
            }
        );
        assert_eq!(
            classify_line("  12.רישיון עסק"),
            Line::Numbered {
                number: "12".to_string(),
                body: "רישיון עסק".to_string()
            }
        );
    }

    #[test_case("* עלות: ₪500", FactKind::Cost; "cost keyword")]
    #[test_case("* כ-₪1,200", FactKind::Cost; "currency symbol")]
    #[test_case("* זמן משוער: שבועיים", FactKind::Time; "time keyword")]
    #[test_case("* 14 ימים", FactKind::Time; "days")]
    #[test_case("* טיפ: להזמין מראש", FactKind::Tip; "tip")]
    #[test_case("* המלצה: לפנות ליועץ", FactKind::Tip; "recommendation")]
    #[test_case("* הסבר: צריך אישור", FactKind::Explanation; "explanation")]
    #[test_case("* אישור משרד הבריאות", FactKind::General; "no keyword")]
    #[test_case("* עלות ו-זמן", FactKind::Cost; "cost is checked before time")]
    fn facts_are_classified_by_keyword(line: &str, expected: FactKind) {
        let Line::Fact { kind, .. } = classify_line(line) else {
            panic!("expected a fact");
        };
        assert_eq!(kind, expected);
    }

    #[test]
    fn fact_text_drops_the_bullet() {
        assert_eq!(
            classify_line("  * עלות: ₪500"),
            Line::Fact {
                kind: FactKind::Cost,
                text: "עלות: ₪500".to_string()
            }
        );
    }

    #[test]
    fn paired_markers_bold_the_enclosed_text() {
        assert_eq!(
            classify_line("יש **חובה** להתקין"),
            Line::Emphasis(vec![plain("יש "), bold("חובה"), plain(" להתקין")])
        );
    }

    #[test]
    fn unpaired_marker_still_toggles_bold() {
        assert_eq!(
            classify_line("a **b** c **d"),
            Line::Emphasis(vec![plain("a "), bold("b"), plain(" c "), bold("d")])
        );
    }

    #[test]
    fn bullet_with_bold_is_emphasis_not_fact() {
        assert_eq!(
            classify_line("* **עלות** גבוהה"),
            Line::Emphasis(vec![plain("* "), bold("עלות"), plain(" גבוהה")])
        );
    }

    #[test]
    fn heading_wins_over_sub_heading() {
        assert_eq!(
            classify_line("## **סיכום:**"),
            Line::Heading("**סיכום:**".to_string())
        );
    }

    #[test_case("---"; "bare")]
    #[test_case("--- סוף ---"; "with text")]
    fn dashes_are_dividers(line: &str) {
        assert_eq!(classify_line(line), Line::Divider);
    }

    #[test]
    fn anything_else_is_a_verbatim_paragraph() {
        assert_eq!(
            classify_line("  טקסט רגיל "),
            Line::Paragraph("  טקסט רגיל ".to_string())
        );
    }

    #[test]
    fn classification_is_per_line() {
        let lines = classify("## דוח\n\n1. רישיון\n* עלות: ₪500\n---\nסוף");

        assert_eq!(
            lines,
            vec![
                Line::Heading("דוח".to_string()),
                Line::Spacer,
                Line::Numbered {
                    number: "1".to_string(),
                    body: "רישיון".to_string()
                },
                Line::Fact {
                    kind: FactKind::Cost,
                    text: "עלות: ₪500".to_string()
                },
                Line::Divider,
                Line::Paragraph("סוף".to_string()),
            ]
        );
    }
}
