//! The printable document is a single self-contained, right-to-left HTML
//! page. Class names carry the styling decisions (importance, fact kind) so
//! the print pipeline only needs the embedded stylesheet.

use std::fmt::{self, Write};

use super::{
    Body, FALLBACK_NOTICE, FactKind, HeaderSummary, Line, RegulationView, ReportView,
    RequirementCard, StructuredView, cost_range, days, quantity,
};
use crate::{domain::Importance, export::PrintSettings};

const SCREEN_STYLESHEET: &str = r"
body { font-family: sans-serif; color: #334155; max-width: 56rem; margin: 0 auto; padding: 1rem; }
h1, h2, h3, h4 { color: #0f172a; }
.print-header { display: none; text-align: center; }
.fallback-notice { background: #fef2f2; border: 1px solid #fecaca; color: #b91c1c; border-radius: 0.5rem; padding: 0.75rem; margin: 0.5rem 0; }
.stats { display: flex; gap: 1rem; flex-wrap: wrap; }
.stat { border: 1px solid #e2e8f0; border-radius: 0.75rem; padding: 1rem; text-align: center; flex: 1; }
.badge { display: inline-block; border: 1px solid #cbd5e1; border-radius: 9999px; padding: 0.1rem 0.6rem; font-size: 0.8rem; margin-inline-end: 0.3rem; }
.summary { background: #eff6ff; border-inline-start: 4px solid #3b82f6; padding: 1rem; border-radius: 0.5rem; }
.overview { display: flex; gap: 1rem; }
.overview > div { flex: 1; text-align: center; border-radius: 0.5rem; padding: 1rem; }
.total-cost { background: #f0fdf4; color: #15803d; }
.total-days { background: #faf5ff; color: #7e22ce; }
.requirement-card { border: 1px solid #e2e8f0; border-radius: 0.5rem; padding: 1.5rem; margin: 1rem 0; }
.position { display: inline-block; width: 2rem; height: 2rem; line-height: 2rem; border-radius: 50%; background: #3b82f6; color: #fff; text-align: center; font-weight: bold; }
.importance-critical { background: #fee2e2; color: #b91c1c; }
.importance-important { background: #fef3c7; color: #b45309; }
.importance-recommended { background: #f3f4f6; color: #374151; }
.explanation { background: #eff6ff; border: 1px solid #bfdbfe; border-radius: 0.5rem; padding: 0.75rem; }
.tips { background: #fffbeb; border: 1px solid #fde68a; border-radius: 0.5rem; padding: 0.75rem; }
.facts { display: grid; grid-template-columns: repeat(3, 1fr); gap: 0.75rem; }
.fact-cost { background: #f0fdf4; border: 1px solid #bbf7d0; color: #166534; }
.fact-time { background: #faf5ff; border: 1px solid #e9d5ff; color: #6b21a8; }
.fact-tip { background: #fffbeb; border: 1px solid #fde68a; color: #92400e; }
.fact-explanation { background: #eff6ff; border: 1px solid #bfdbfe; color: #1e40af; }
.fact-general, .fact-professionals { background: #f9fafb; border: 1px solid #e5e7eb; color: #374151; }
.fact { border-radius: 0.5rem; padding: 0.75rem; margin: 0.5rem 0; }
.next-steps { background: #eff6ff; border-inline-start: 4px solid #3b82f6; padding: 1rem; }
.notes { background: #fffbeb; border-inline-start: 4px solid #f59e0b; padding: 1rem; }
.numbered { background: #eff6ff; border-inline-start: 4px solid #3b82f6; border-radius: 0.5rem; padding: 1rem; margin: 1rem 0; }
.spacer { height: 0.5rem; }
@media print { .print-header { display: block; } }
";

/// Renders `view` as a complete printable HTML document.
#[must_use]
pub fn document(view: &ReportView, settings: &PrintSettings) -> String {
    let mut out = String::new();
    write_document(&mut out, view, settings).expect("this must never fail");
    out
}

/// Escapes text for use in HTML content and attribute values.
#[must_use]
pub fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn write_document(out: &mut String, view: &ReportView, settings: &PrintSettings) -> fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, r#"<html lang="he" dir="rtl">"#)?;
    writeln!(out, "<head>")?;
    writeln!(out, r#"<meta charset="utf-8">"#)?;
    writeln!(out, "<title>{}</title>", escape(&settings.title))?;
    writeln!(out, "<style>{SCREEN_STYLESHEET}{}</style>", settings.stylesheet)?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;

    writeln!(out, r#"<header class="print-header">"#)?;
    writeln!(out, "<h1>{}</h1>", escape(crate::export::PRINT_HEADER))?;
    writeln!(out, "<p>תאריך: {}</p>", escape(&settings.date))?;
    writeln!(out, "</header>")?;

    write_header(out, &view.header)?;

    writeln!(out, r#"<section class="report">"#)?;
    writeln!(out, "<h2>פירוט הדרישות וההמלצות</h2>")?;
    match &view.body {
        Body::Structured(structured) => write_structured(out, structured)?,
        Body::Text(lines) => write_lines(out, lines)?,
    }
    writeln!(out, "</section>")?;

    write_regulations(out, &view.regulations)?;

    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn write_header(out: &mut String, header: &HeaderSummary) -> fmt::Result {
    writeln!(out, r#"<section class="header-summary">"#)?;
    writeln!(out, "<h2>סיכום דוח רישוי</h2>")?;
    writeln!(out, r#"<div class="stats">"#)?;
    let stats = [
        (header.relevant_regulations.to_string(), "דרישות רלוונטיות"),
        (header.total_regulations.to_string(), "סה״כ דרישות"),
        (format!("{} מ״ר", quantity(header.size)), "שטח"),
        (quantity(header.seats), "מקומות ישיבה"),
    ];
    for (value, label) in stats {
        writeln!(
            out,
            r#"<div class="stat"><strong>{}</strong><div>{label}</div></div>"#,
            escape(&value)
        )?;
    }
    writeln!(out, "</div>")?;
    for badge in &header.badges {
        writeln!(out, r#"<span class="badge feature">{}</span>"#, badge.label())?;
    }
    writeln!(out, "</section>")
}

fn write_structured(out: &mut String, view: &StructuredView) -> fmt::Result {
    writeln!(
        out,
        r#"<div class="summary"><h3>סיכום</h3><p>{}</p></div>"#,
        escape(&view.summary)
    )?;
    if view.error {
        writeln!(
            out,
            r#"<div class="fallback-notice">{}</div>"#,
            escape(FALLBACK_NOTICE)
        )?;
    }

    if let Some(overview) = &view.overview {
        writeln!(out, r#"<div class="overview">"#)?;
        if let Some(cost) = &overview.cost {
            write!(
                out,
                r#"<div class="total-cost"><strong>{}</strong><div>עלות משוערת</div>"#,
                escape(&cost_range(cost))
            )?;
            if let Some(notes) = &cost.notes {
                write!(out, "<small>{}</small>", escape(notes))?;
            }
            writeln!(out, "</div>")?;
        }
        if let Some(total) = overview.days {
            writeln!(
                out,
                r#"<div class="total-days"><strong>{}</strong><div>זמן משוער</div></div>"#,
                escape(&days(total))
            )?;
        }
        writeln!(out, "</div>")?;
    }

    writeln!(
        out,
        "<h3>דרישות מפורטות ({})</h3>",
        view.requirements.len()
    )?;
    for card in &view.requirements {
        write_card(out, card)?;
    }

    if let Some(steps) = &view.next_steps {
        writeln!(out, r#"<div class="next-steps"><h3>השלבים הבאים</h3><ol>"#)?;
        for step in steps {
            writeln!(out, "<li>{}</li>", escape(step))?;
        }
        writeln!(out, "</ol></div>")?;
    }

    if let Some(notes) = &view.notes {
        writeln!(out, r#"<div class="notes"><h3>הערות חשובות</h3><ul>"#)?;
        for note in notes {
            writeln!(out, "<li>{}</li>", escape(note))?;
        }
        writeln!(out, "</ul></div>")?;
    }
    Ok(())
}

const fn importance_class(importance: Importance) -> &'static str {
    match importance {
        Importance::Critical => "importance-critical",
        Importance::Important => "importance-important",
        Importance::Recommended => "importance-recommended",
    }
}

fn write_card(out: &mut String, card: &RequirementCard) -> fmt::Result {
    writeln!(out, r#"<article class="requirement-card">"#)?;
    writeln!(
        out,
        r#"<h4><span class="position">{}</span> {} <span class="badge {}">{}</span> <span class="badge">{}</span></h4>"#,
        card.position,
        escape(&card.title),
        importance_class(card.importance),
        card.importance,
        escape(&card.category),
    )?;
    writeln!(
        out,
        r#"<div class="explanation"><h5>הסבר בעברית פשוטה</h5><p>{}</p></div>"#,
        escape(&card.explanation)
    )?;

    if let Some(tips) = &card.tips {
        writeln!(out, r#"<div class="tips"><h5>טיפים מעשיים</h5><ul>"#)?;
        for tip in tips {
            writeln!(out, "<li>{}</li>", escape(tip))?;
        }
        writeln!(out, "</ul></div>")?;
    }

    writeln!(out, r#"<div class="facts">"#)?;
    write!(
        out,
        r#"<div class="fact fact-cost"><h5>עלות</h5><strong>{}</strong>"#,
        escape(&cost_range(&card.cost))
    )?;
    if let Some(notes) = &card.cost.notes {
        write!(out, "<small>{}</small>", escape(notes))?;
    }
    writeln!(out, "</div>")?;
    writeln!(
        out,
        r#"<div class="fact fact-time"><h5>זמן</h5><strong>{}</strong></div>"#,
        escape(&days(card.days))
    )?;
    if let Some(professionals) = &card.professionals {
        writeln!(
            out,
            r#"<div class="fact fact-professionals"><h5>נדרשים</h5>{}</div>"#,
            escape(&professionals.join(", "))
        )?;
    }
    writeln!(out, "</div>")?;
    writeln!(out, "</article>")
}

const fn fact_class(kind: FactKind) -> &'static str {
    match kind {
        FactKind::Cost => "fact-cost",
        FactKind::Time => "fact-time",
        FactKind::Tip => "fact-tip",
        FactKind::Explanation => "fact-explanation",
        FactKind::General => "fact-general",
    }
}

fn write_lines(out: &mut String, lines: &[Line]) -> fmt::Result {
    for line in lines {
        match line {
            Line::Spacer => writeln!(out, r#"<div class="spacer"></div>"#)?,
            Line::Heading(text) => writeln!(out, "<h2>{}</h2>", escape(text))?,
            Line::SubHeading(text) => writeln!(out, "<h3>{}</h3><hr>", escape(text))?,
            Line::Numbered { number, body } => writeln!(
                out,
                r#"<div class="numbered"><span class="position">{}</span> <p>{}</p></div>"#,
                escape(number),
                escape(body)
            )?,
            Line::Fact { kind, text } => writeln!(
                out,
                r#"<div class="fact {}"><p>{}</p></div>"#,
                fact_class(*kind),
                escape(text)
            )?,
            Line::Emphasis(spans) => {
                write!(out, "<p>")?;
                for span in spans {
                    if span.bold {
                        write!(out, "<strong>{}</strong>", escape(&span.text))?;
                    } else {
                        write!(out, "{}", escape(&span.text))?;
                    }
                }
                writeln!(out, "</p>")?;
            }
            Line::Divider => writeln!(out, "<hr>")?,
            Line::Paragraph(text) => writeln!(out, "<p>{}</p>", escape(text))?,
        }
    }
    Ok(())
}

fn write_regulations(out: &mut String, regulations: &[RegulationView]) -> fmt::Result {
    writeln!(out, r#"<section class="regulations page-break">"#)?;
    writeln!(out, "<h2>דרישות גולמיות מהחוק ({})</h2>", regulations.len())?;
    writeln!(out, "<ol>")?;
    for regulation in regulations {
        write!(
            out,
            r#"<li><p>{}</p><span class="badge">{}</span>"#,
            escape(&regulation.text),
            escape(&regulation.category)
        )?;
        if regulation.critical {
            write!(
                out,
                r#"<span class="badge importance-critical">{}</span>"#,
                Importance::Critical
            )?;
        }
        writeln!(
            out,
            r#"<span class="badge">{}</span></li>"#,
            escape(&regulation.page)
        )?;
    }
    writeln!(out, "</ol>")?;
    writeln!(out, "</section>")
}
