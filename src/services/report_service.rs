use std::sync::Arc;

use printpdf::{
    BuiltinFont, Color, Greyscale, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, Rgb,
    TextItem,
};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{quiz_attempt::percentage, QuizAttempt},
        dto::response::{QuizReport, QuizSummary},
    },
    repositories::{QuizAttemptRepository, QuizRepository},
};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const LEFT_MM: f32 = 20.0;
const TOP_MM: f32 = 275.0;
const BOTTOM_MM: f32 = 20.0;
const ROW_MM: f32 = 7.0;

/// Column offsets for name, score, percentage and date.
const COLUMNS_MM: [f32; 4] = [0.0, 80.0, 110.0, 135.0];

pub struct ReportService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl ReportService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, attempts: Arc<dyn QuizAttemptRepository>) -> Self {
        Self { quizzes, attempts }
    }

    pub async fn quiz_report(&self, share_link: &str) -> AppResult<QuizReport> {
        let quiz = self
            .quizzes
            .find_by_share_link(share_link)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz '{}' not found", share_link)))?;

        let attempts = self.attempts.list_by_quiz(&quiz.id).await?;
        Ok(build_report(
            QuizSummary::from_quiz(&quiz, attempts.len() as i32),
            attempts,
        ))
    }
}

pub fn build_report(quiz: QuizSummary, attempts: Vec<QuizAttempt>) -> QuizReport {
    let total_attempts = attempts.len() as i32;

    let (average_score, average_percentage) = if attempts.is_empty() {
        (0.0, 0.0)
    } else {
        let n = attempts.len() as f64;
        let score_sum: f64 = attempts.iter().map(|a| f64::from(a.score)).sum();
        let percentage_sum: f64 = attempts.iter().map(QuizAttempt::percentage).sum();
        (score_sum / n, percentage_sum / n)
    };

    QuizReport {
        quiz,
        attempts,
        total_attempts,
        average_score,
        average_percentage,
    }
}

fn escape_csv_field(value: &str) -> String {
    // neutralise spreadsheet formulas
    let sanitized = if value.starts_with(['=', '+', '@', '-', '\t', '\r', '\n']) {
        format!("\t{}", value)
    } else {
        value.to_string()
    };

    if sanitized.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", sanitized.replace('"', "\"\""))
    } else {
        sanitized
    }
}

pub fn render_csv(report: &QuizReport) -> Vec<u8> {
    let mut lines =
        vec!["Respondent,Email,Score,Total Questions,Percentage,Completed At".to_string()];

    for attempt in &report.attempts {
        lines.push(format!(
            "{},{},{},{},{:.1},{}",
            escape_csv_field(&attempt.respondent_name),
            escape_csv_field(attempt.respondent_email.as_deref().unwrap_or("")),
            attempt.score,
            attempt.total_questions,
            attempt.percentage(),
            attempt.completed_at.to_rfc3339()
        ));
    }

    let mut csv = lines.join("\n");
    csv.push('\n');
    csv.into_bytes()
}

pub fn render_pdf(report: &QuizReport) -> Vec<u8> {
    let mut document = PdfDocument::new(&format!("{} report", report.quiz.title));

    let accent = Color::Rgb(Rgb {
        r: 0.16,
        g: 0.4,
        b: 0.69,
        icc_profile: None,
    });
    let text = Color::Greyscale(Greyscale::new(0.08, None));

    let mut pages = Vec::new();
    let mut ops = Vec::new();

    push_text(
        &mut ops,
        LEFT_MM,
        TOP_MM,
        BuiltinFont::HelveticaBold,
        18.0,
        report.quiz.title.clone(),
        &accent,
    );

    let summary = [
        format!("Topic: {} ({})", report.quiz.topic, report.quiz.difficulty),
        format!("Questions: {}", report.quiz.question_count),
        format!("Attempts: {}", report.total_attempts),
        format!(
            "Average score: {:.2} / {} ({:.1}%)",
            report.average_score, report.quiz.question_count, report.average_percentage
        ),
    ];

    let mut y = TOP_MM - 12.0;
    for line in summary {
        push_text(&mut ops, LEFT_MM, y, BuiltinFont::Helvetica, 11.0, line, &text);
        y -= ROW_MM;
    }

    y -= ROW_MM;
    push_header_row(&mut ops, y, &accent);
    y -= ROW_MM;

    if report.attempts.is_empty() {
        push_text(
            &mut ops,
            LEFT_MM,
            y,
            BuiltinFont::Helvetica,
            10.0,
            "No attempts yet".to_string(),
            &text,
        );
    }

    for attempt in &report.attempts {
        if y < BOTTOM_MM {
            pages.push(PdfPage::new(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                std::mem::take(&mut ops),
            ));
            y = TOP_MM;
            push_header_row(&mut ops, y, &accent);
            y -= ROW_MM;
        }

        let cells = [
            truncate(&attempt.respondent_name, 40),
            format!("{}/{}", attempt.score, attempt.total_questions),
            format!("{:.1}%", percentage(attempt.score, attempt.total_questions)),
            attempt.completed_at.format("%Y-%m-%d %H:%M").to_string(),
        ];
        for (offset, cell) in COLUMNS_MM.iter().zip(cells) {
            push_text(
                &mut ops,
                LEFT_MM + offset,
                y,
                BuiltinFont::Helvetica,
                10.0,
                cell,
                &text,
            );
        }
        y -= ROW_MM;
    }

    pages.push(PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops));

    let mut warnings = Vec::new();
    document
        .with_pages(pages)
        .save(&PdfSaveOptions::default(), &mut warnings)
}

fn push_header_row(ops: &mut Vec<Op>, y: f32, color: &Color) {
    let headers = ["Respondent", "Score", "Percent", "Completed"];
    for (offset, header) in COLUMNS_MM.iter().zip(headers) {
        push_text(
            ops,
            LEFT_MM + offset,
            y,
            BuiltinFont::HelveticaBold,
            10.0,
            header.to_string(),
            color,
        );
    }
}

fn push_text(
    ops: &mut Vec<Op>,
    x_mm: f32,
    y_mm: f32,
    font: BuiltinFont,
    font_size: f32,
    text: String,
    color: &Color,
) {
    ops.extend([
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point::new(Mm(x_mm), Mm(y_mm)),
        },
        Op::SetFontSizeBuiltinFont {
            size: Pt(font_size),
            font,
        },
        Op::SetLineHeight {
            lh: Pt(font_size + 2.0),
        },
        Op::SetFillColor { col: color.clone() },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text)],
            font,
        },
        Op::EndTextSection,
    ]);
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max_chars - 3).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{Difficulty, Quiz, QuizQuestion};
    use chrono::Utc;

    fn summary() -> QuizSummary {
        let quiz = Quiz::new(
            "Space Quiz",
            "Space",
            Difficulty::Medium,
            "spacelink01",
            false,
            vec![
                QuizQuestion {
                    question: "Closest star?".to_string(),
                    options: vec!["Sun".into(), "Sirius".into(), "Vega".into(), "Rigel".into()],
                    correct_index: 0,
                },
                QuizQuestion {
                    question: "Red planet?".to_string(),
                    options: vec!["Mars".into(), "Venus".into(), "Earth".into(), "Pluto".into()],
                    correct_index: 0,
                },
            ],
        );
        QuizSummary::from_quiz(&quiz, 0)
    }

    fn attempt(name: &str, score: i32) -> QuizAttempt {
        QuizAttempt {
            id: format!("attempt-{}", name),
            quiz_id: "quiz".to_string(),
            respondent_name: name.to_string(),
            respondent_email: None,
            score,
            total_questions: 2,
            answers: vec![],
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn empty_report_has_zero_averages() {
        let report = build_report(summary(), vec![]);

        assert_eq!(report.total_attempts, 0);
        assert_eq!(report.average_score, 0.0);
        assert_eq!(report.average_percentage, 0.0);
    }

    #[test]
    fn averages_cover_all_attempts() {
        let report = build_report(summary(), vec![attempt("a", 2), attempt("b", 1)]);

        assert_eq!(report.total_attempts, 2);
        assert_eq!(report.average_score, 1.5);
        assert_eq!(report.average_percentage, 75.0);
    }

    #[test]
    fn csv_quotes_fields_with_commas_and_quotes() {
        let report = build_report(
            summary(),
            vec![attempt("Lovelace, Ada", 2), attempt("The \"Count\"", 0)],
        );
        let csv = String::from_utf8(render_csv(&report)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Respondent,Email,Score"));
        assert!(lines[1].starts_with("\"Lovelace, Ada\",,2,2,100.0,"));
        assert!(lines[2].starts_with("\"The \"\"Count\"\"\",,0,2,0.0,"));
    }

    #[test]
    fn csv_neutralises_formulas() {
        assert_eq!(escape_csv_field("=SUM(A1)"), "\t=SUM(A1)");
        assert_eq!(escape_csv_field("plain"), "plain");
    }

    #[test]
    fn pdf_is_a_pdf_document() {
        let report = build_report(summary(), vec![attempt("Ada", 2)]);
        let bytes = render_pdf(&report);

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn pdf_paginates_long_reports() {
        let attempts = (0..120).map(|i| attempt(&format!("r{}", i), i % 3)).collect();
        let bytes = render_pdf(&build_report(summary(), attempts));

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn truncate_keeps_short_values() {
        assert_eq!(truncate("Ada", 10), "Ada");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
