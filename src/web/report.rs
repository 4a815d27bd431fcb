use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use tokio::try_join;
use tracing::error;

use crate::{
    feedback::{FeedbackFilters, RatingDistribution, SuggestionView},
    web::{AppState, escape_html, render_page},
};

pub async fn report_page(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(filters): Query<FeedbackFilters>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let service = state.feedback();
    let (distribution, suggestions) = try_join!(
        service.get_distribution(&category, &filters),
        service.get_suggestions(&category, &filters),
    )
    .map_err(|err| {
        error!(?err, %category, "failed to build feedback report");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>Server error</h1><p>Please try again later.</p>".to_string()),
        )
    })?;

    Ok(Html(render_report(
        &category,
        &filters,
        &distribution,
        &suggestions,
    )))
}

fn render_report(
    category: &str,
    filters: &FeedbackFilters,
    distribution: &RatingDistribution,
    suggestions: &[SuggestionView],
) -> String {
    let mut bars = String::new();
    for share in &distribution.stats {
        bars.push_str(&format!(
            r#"<div class="bar-row"><span>{label}</span><div class="bar-track"><div class="bar-fill" style="width: {width}%"></div></div><span>{percentage:.1}%</span></div>"#,
            label = escape_html(share.label),
            width = share.percentage.clamp(0.0, 100.0),
            percentage = share.percentage,
        ));
    }

    let mut rows = String::new();
    if suggestions.is_empty() {
        rows.push_str(r#"<tr><td colspan="5">No feedback matches these filters yet.</td></tr>"#);
    } else {
        for view in suggestions {
            rows.push_str(&format!(
                "<tr><td>{user}</td><td>{name}</td><td>{suggestion}</td><td>{department}</td><td>{year}</td></tr>",
                user = escape_html(&view.submitter),
                name = escape_html(&view.subject_name),
                suggestion = escape_html(view.suggestion.as_deref().unwrap_or("")),
                department = escape_html(view.department.as_deref().unwrap_or("-")),
                year = escape_html(view.year.as_deref().unwrap_or("-")),
            ));
        }
    }

    let note = format!(
        "{total} responses · department: {department} · year: {year}",
        total = distribution.total,
        department = escape_html(present_or_all(filters.department.as_deref())),
        year = escape_html(present_or_all(filters.year.as_deref())),
    );

    let body = format!(
        r#"        <section class="panel">
            <h2>Rating distribution</h2>
            {bars}
        </section>
        <section class="panel">
            <h2>Suggestions</h2>
            <table>
                <thead>
                    <tr><th>User</th><th>Subject</th><th>Suggestion</th><th>Department</th><th>Year</th></tr>
                </thead>
                <tbody>
                    {rows}
                </tbody>
            </table>
        </section>"#
    );

    render_page(
        &format!("Feedback report · {category}"),
        &format!("Feedback report: {category}"),
        &note,
        &body,
    )
}

fn present_or_all(value: Option<&str>) -> &str {
    match value {
        Some(inner) if !inner.is_empty() => inner,
        _ => "all",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{model::RATING_LABELS, stats::compute_distribution};

    #[test]
    fn bars_render_in_survey_order() {
        let distribution = compute_distribution(&[
            Some("Excellent".to_string()),
            Some("Poor".to_string()),
        ]);
        let html = render_report("CS101", &FeedbackFilters::default(), &distribution, &[]);

        let positions: Vec<usize> = RATING_LABELS
            .iter()
            .map(|label| html.find(&format!("<span>{label}</span>")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(html.contains("50.0%"));
        assert!(html.contains("No feedback matches"));
        assert!(html.contains("department: all"));
    }

    #[test]
    fn suggestion_text_is_escaped() {
        let distribution = compute_distribution(&[Some("Good".to_string())]);
        let suggestions = vec![SuggestionView {
            submitter: "alice".to_string(),
            subject_name: "Data <Structures>".to_string(),
            suggestion: Some("<b>louder</b>".to_string()),
            department: None,
            year: Some("2024".to_string()),
        }];
        let filters = FeedbackFilters {
            department: Some("CSE".to_string()),
            year: None,
        };

        let html = render_report("CS101", &filters, &distribution, &suggestions);
        assert!(html.contains("&lt;b&gt;louder&lt;/b&gt;"));
        assert!(html.contains("Data &lt;Structures&gt;"));
        assert!(html.contains("department: CSE"));
        assert!(!html.contains("<b>louder</b>"));
    }
}
