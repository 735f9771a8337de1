//! Terminal capability detection and the colored report writer.

use std::io::{self, Write};

use owo_colors::{OwoColorize, colors::css};

use super::{
    Body, FALLBACK_NOTICE, FactKind, HeaderSummary, Line, RegulationView, ReportView,
    RequirementCard, StructuredView, cost_range, days, quantity,
};
use crate::domain::Importance;

const RULE: &str = "────────────────────";

/// Detects whether colored output should be enabled.
#[must_use]
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available.
#[must_use]
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Check if terminal is narrow (< 60 columns).
#[must_use]
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 60)
}

/// The color scheme of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Green: money and positive outcomes.
    Success,
    /// Amber: tips and warnings.
    Warning,
    /// Red: critical items and errors.
    Danger,
    /// Blue: headings and explanations.
    Info,
    /// Purple: durations.
    Accent,
    /// Gray: secondary text.
    Muted,
}

/// How output should look on the current terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Whether ANSI colors are emitted.
    pub color: bool,
    /// Whether multi-column layouts are stacked.
    pub narrow: bool,
}

impl Style {
    /// Inspects stdout.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            color: supports_color(),
            narrow: is_narrow(),
        }
    }

    /// No colors, wide layout.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            color: false,
            narrow: false,
        }
    }

    /// Colors `text` in the given tone.
    #[must_use]
    pub fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.color {
            return text.to_string();
        }
        match tone {
            Tone::Success => text.fg::<css::Green>().to_string(),
            Tone::Warning => text.fg::<css::Orange>().to_string(),
            Tone::Danger => text.fg::<css::Red>().to_string(),
            Tone::Info => text.fg::<css::LightBlue>().to_string(),
            Tone::Accent => text.fg::<css::MediumPurple>().to_string(),
            Tone::Muted => text.dimmed().to_string(),
        }
    }

    /// Makes `text` bold.
    #[must_use]
    pub fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Bold and colored, for headings.
    #[must_use]
    pub fn heading(&self, text: &str, tone: Tone) -> String {
        self.bold(&self.paint(text, tone))
    }
}

impl Importance {
    const fn tone(self) -> Tone {
        match self {
            Self::Critical => Tone::Danger,
            Self::Important => Tone::Warning,
            Self::Recommended => Tone::Muted,
        }
    }
}

impl FactKind {
    const fn icon(self) -> &'static str {
        match self {
            Self::Cost => "₪",
            Self::Time => "⏱",
            Self::Tip => "💡",
            Self::Explanation => "📄",
            Self::General => "•",
        }
    }

    const fn tone(self) -> Tone {
        match self {
            Self::Cost => Tone::Success,
            Self::Time => Tone::Accent,
            Self::Tip => Tone::Warning,
            Self::Explanation => Tone::Info,
            Self::General => Tone::Muted,
        }
    }
}

/// Writes a whole report.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_report<W: Write>(view: &ReportView, out: &mut W, style: Style) -> io::Result<()> {
    write_header(&view.header, out, style)?;
    writeln!(out)?;

    writeln!(out, "{}", style.heading("פירוט הדרישות וההמלצות", Tone::Info))?;
    writeln!(out, "{}", style.paint(RULE, Tone::Muted))?;
    match &view.body {
        Body::Structured(structured) => write_structured(structured, out, style)?,
        Body::Text(lines) => write_lines(lines, out, style)?,
    }
    writeln!(out)?;

    write_regulations(&view.regulations, out, style)
}

fn write_header<W: Write>(header: &HeaderSummary, out: &mut W, style: Style) -> io::Result<()> {
    writeln!(out, "{}", style.heading("סיכום דוח רישוי", Tone::Success))?;
    writeln!(out, "{}", style.paint(RULE, Tone::Muted))?;

    let facts = [
        ("דרישות רלוונטיות", header.relevant_regulations.to_string()),
        ("סה״כ דרישות", header.total_regulations.to_string()),
        ("שטח", format!("{} מ״ר", quantity(header.size))),
        ("מקומות ישיבה", quantity(header.seats)),
    ];
    for (label, value) in facts {
        writeln!(out, "  {label}: {}", style.bold(&value))?;
    }

    if !header.badges.is_empty() {
        let badges: Vec<String> = header
            .badges
            .iter()
            .map(|badge| format!("[{}]", badge.label()))
            .collect();
        writeln!(out, "  {}", style.paint(&badges.join(" "), Tone::Info))?;
    }
    Ok(())
}

fn write_structured<W: Write>(view: &StructuredView, out: &mut W, style: Style) -> io::Result<()> {
    writeln!(out, "{}", style.heading("סיכום", Tone::Info))?;
    writeln!(out, "  {}", view.summary)?;
    if view.error {
        writeln!(out, "  {}", style.paint(FALLBACK_NOTICE, Tone::Danger))?;
    }

    if let Some(overview) = &view.overview {
        writeln!(out)?;
        if let Some(cost) = &overview.cost {
            write!(
                out,
                "  {} {}",
                style.paint("עלות משוערת:", Tone::Success),
                style.bold(&cost_range(cost))
            )?;
            match &cost.notes {
                Some(notes) => writeln!(out, " {}", style.paint(&format!("({notes})"), Tone::Muted))?,
                None => writeln!(out)?,
            }
        }
        if let Some(total) = overview.days {
            writeln!(
                out,
                "  {} {}",
                style.paint("זמן משוער:", Tone::Accent),
                style.bold(&days(total))
            )?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{}",
        style.heading(&format!("דרישות מפורטות ({})", view.requirements.len()), Tone::Info)
    )?;
    for card in &view.requirements {
        writeln!(out)?;
        write_card(card, out, style)?;
    }

    if let Some(steps) = &view.next_steps {
        writeln!(out)?;
        writeln!(out, "{}", style.heading("השלבים הבאים", Tone::Info))?;
        for (i, step) in steps.iter().enumerate() {
            writeln!(out, "  {}. {step}", i + 1)?;
        }
    }

    if let Some(notes) = &view.notes {
        writeln!(out)?;
        writeln!(out, "{}", style.heading("הערות חשובות", Tone::Warning))?;
        for note in notes {
            writeln!(out, "  {} {note}", style.paint("•", Tone::Warning))?;
        }
    }
    Ok(())
}

fn write_card<W: Write>(card: &RequirementCard, out: &mut W, style: Style) -> io::Result<()> {
    writeln!(
        out,
        "{} {} {} {}",
        style.heading(&format!("{:>2}.", card.position), Tone::Info),
        style.bold(&card.title),
        style.paint(&format!("[{}]", card.importance), card.importance.tone()),
        style.paint(&format!("[{}]", card.category), Tone::Muted),
    )?;

    writeln!(
        out,
        "    {} {}",
        style.paint("הסבר בעברית פשוטה:", Tone::Info),
        card.explanation
    )?;

    if let Some(tips) = &card.tips {
        writeln!(out, "    {}", style.paint("טיפים מעשיים:", Tone::Warning))?;
        for tip in tips {
            writeln!(out, "      {} {tip}", style.paint("•", Tone::Warning))?;
        }
    }

    let mut facts = vec![
        format!("{} {}", style.paint("עלות:", Tone::Success), cost_range(&card.cost)),
        format!("{} {}", style.paint("זמן:", Tone::Accent), days(card.days)),
    ];
    if let Some(professionals) = &card.professionals {
        facts.push(format!(
            "{} {}",
            style.paint("נדרשים:", Tone::Muted),
            professionals.join(", ")
        ));
    }

    if style.narrow {
        for fact in &facts {
            writeln!(out, "    {fact}")?;
        }
    } else {
        writeln!(out, "    {}", facts.join(style.paint("  │  ", Tone::Muted).as_str()))?;
    }

    if let Some(notes) = &card.cost.notes {
        writeln!(out, "    {}", style.paint(notes, Tone::Muted))?;
    }
    Ok(())
}

/// Writes the classified lines of a free-text report.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_lines<W: Write>(lines: &[Line], out: &mut W, style: Style) -> io::Result<()> {
    for line in lines {
        match line {
            Line::Spacer => writeln!(out)?,
            Line::Heading(text) => {
                writeln!(out)?;
                writeln!(out, "{}", style.heading(text, Tone::Info))?;
            }
            Line::SubHeading(text) => {
                writeln!(out, "{}", style.bold(text))?;
                writeln!(out, "{}", style.paint(RULE, Tone::Muted))?;
            }
            Line::Numbered { number, body } => {
                writeln!(
                    out,
                    "{} {}",
                    style.heading(&format!("({number})"), Tone::Info),
                    body
                )?;
            }
            Line::Fact { kind, text } => {
                writeln!(
                    out,
                    "  {} {}",
                    style.paint(kind.icon(), kind.tone()),
                    style.paint(text, kind.tone())
                )?;
            }
            Line::Emphasis(spans) => {
                let text: String = spans
                    .iter()
                    .map(|span| {
                        if span.bold {
                            style.bold(&span.text)
                        } else {
                            span.text.clone()
                        }
                    })
                    .collect();
                writeln!(out, "{text}")?;
            }
            Line::Divider => writeln!(out, "{}", style.paint(RULE, Tone::Muted))?,
            Line::Paragraph(text) => writeln!(out, "{text}")?,
        }
    }
    Ok(())
}

/// Writes the raw regulations list.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_regulations<W: Write>(
    regulations: &[RegulationView],
    out: &mut W,
    style: Style,
) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        style.heading(
            &format!("דרישות גולמיות מהחוק ({})", regulations.len()),
            Tone::Warning
        )
    )?;
    for regulation in regulations {
        writeln!(out, "{:>3}. {}", regulation.position, regulation.text)?;

        let mut badges = vec![style.paint(&format!("[{}]", regulation.category), Tone::Muted)];
        if regulation.critical {
            badges.push(style.paint(&format!("[{}]", Importance::Critical), Tone::Danger));
        }
        badges.push(style.paint(&format!("[{}]", regulation.page), Tone::Muted));
        writeln!(out, "     {}", badges.join(" "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::report::fixtures;

    fn render(view: &ReportView, style: Style) -> String {
        let mut out = Vec::new();
        write_report(view, &mut out, style).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn plain_style_emits_no_escape_codes() {
        let view = ReportView::from_response(&fixtures::response(2));

        let output = render(&view, Style::plain());

        assert!(!output.contains('\u{1b}'));
        assert!(output.contains("דרישות מפורטות (2)"));
        assert!(output.contains(" 1. דרישה 1 [קריטי] [בטיחות אש]"));
        assert!(output.contains(" 2. דרישה 2"));
        assert!(output.contains("עלות: ₪500 - ₪1,200"));
        assert!(output.contains("זמן: 3 ימים"));
        assert!(output.contains("[משתמש בגז למטבח]"));
        assert!(!output.contains("מגיש בשר"));
        assert!(!output.contains("השלבים הבאים"));
        assert!(!output.contains("הערות חשובות"));
    }

    #[test]
    fn fallback_report_carries_a_notice() {
        let mut payload = fixtures::structured(0);
        payload["report"]["error"] = json!("Expecting value: line 1 column 1");
        let view = ReportView::from_response(&serde_json::from_value(payload).unwrap());

        let output = render(&view, Style::plain());
        let normal = render(&ReportView::from_response(&fixtures::response(0)), Style::plain());

        assert!(output.contains(&format!(
            "  מסעדה בינונית עם מטבח גז\n  {FALLBACK_NOTICE}\n"
        )));
        assert!(!normal.contains(FALLBACK_NOTICE));
    }

    #[test]
    fn colored_style_emits_escape_codes() {
        let style = Style {
            color: true,
            narrow: false,
        };

        assert!(style.paint("x", Tone::Danger).contains('\u{1b}'));
        assert_eq!(Style::plain().paint("x", Tone::Danger), "x");
    }

    #[test]
    fn narrow_terminals_stack_card_facts() {
        let mut payload = fixtures::structured(1);
        payload["report"]["requirements"][0]["required_professionals"] = json!(["קבלן", "חשמלאי"]);
        let view = ReportView::from_response(&serde_json::from_value(payload).unwrap());

        let wide = render(&view, Style::plain());
        let narrow = render(
            &view,
            Style {
                color: false,
                narrow: true,
            },
        );

        assert!(wide.contains("עלות: ₪500 - ₪1,200  │  זמן: 3 ימים  │  נדרשים: קבלן, חשמלאי"));
        assert!(narrow.contains("    זמן: 3 ימים\n    נדרשים: קבלן, חשמלאי\n"));
    }

    #[test]
    fn text_lines() {
        let lines = crate::render::text::classify("## כותרת\n**שלב:**\n2. להגיש\n* עלות: ₪500\n---");
        let mut out = Vec::new();

        write_lines(&lines, &mut out, Style::plain()).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("\nכותרת\nשלב\n{RULE}\n(2) להגיש\n  ₪ עלות: ₪500\n{RULE}\n")
        );
    }

    #[test]
    fn regulations_list() {
        let regulations = vec![RegulationView {
            position: 1,
            text: "מטף".to_string(),
            category: "כיבוי אש".to_string(),
            critical: true,
            page: "עמוד 50+".to_string(),
        }];
        let mut out = Vec::new();

        write_regulations(&regulations, &mut out, Style::plain()).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("דרישות גולמיות מהחוק (1)\n"));
        assert!(output.contains("  1. מטף\n     [כיבוי אש] [קריטי] [עמוד 50+]\n"));
    }
}
