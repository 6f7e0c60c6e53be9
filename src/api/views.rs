//! HTML views
//!
//! Pure functions from plain data to markup. All user-provided text passes
//! through [`escape`] before it is embedded.

use crate::types::{FeedbackRecord, MAX_RATING, MIN_RATING};

const CHART_SCRIPT: &str = r#"<script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
<script>
    fetch('/grafico_dados')
        .then(response => response.json())
        .then(data => {
            const ctx = document.getElementById('ratingsChart').getContext('2d');
            new Chart(ctx, {
                type: 'bar',
                data: {
                    labels: data.names,
                    datasets: [{
                        label: 'Average rating',
                        data: data.averages,
                        backgroundColor: 'rgba(75, 192, 192, 0.6)'
                    }]
                },
                options: {
                    responsive: true,
                    scales: { y: { beginAtZero: true, max: 5 } }
                }
            });
        });
</script>"#;

/// Escape text for HTML element content and quoted attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

/// Feedback form, optionally with an error banner above it
pub fn form_page(error: Option<&str>) -> String {
    let banner = error
        .map(|message| format!("<p class=\"error\">{}</p>\n", escape(message)))
        .unwrap_or_default();

    let body = format!(
        r#"<h2>Service Feedback</h2>
{banner}<form method="POST" action="/">
    Your name (optional): <input type="text" name="respondent_name"><br><br>
    Attendant name: <input type="text" name="attendant_name" required><br><br>
    Rating ({min} to {max}): <input type="number" name="rating" min="{min}" max="{max}" required><br><br>
    Comment:<br><textarea name="comment"></textarea><br><br>
    <button type="submit">Send</button>
</form>"#,
        banner = banner,
        min = MIN_RATING,
        max = MAX_RATING,
    );

    layout("Service Feedback", &body)
}

pub fn confirmation_page() -> String {
    layout(
        "Thank you",
        "<h2>Thank you for your feedback!</h2>\n<a href=\"/\">Back</a>",
    )
}

/// Report page: filter form, chart canvas, and the filtered table
pub fn report_page(filter: &str, records: &[FeedbackRecord]) -> String {
    let mut rows = String::new();
    for record in records {
        rows.push_str(&format!(
            "    <tr>\n        <td>{}</td>\n        <td>{}</td>\n        <td>{}</td>\n        <td>{}</td>\n        <td>{}</td>\n    </tr>\n",
            escape(record.respondent_display()),
            escape(&record.attendant_name),
            record.rating,
            escape(record.comment_display()),
            escape(&record.timestamp),
        ));
    }

    let body = format!(
        r#"<h2>Feedback Report</h2>
<form method="get" action="/relatorios">
    <input type="text" name="atendente" placeholder="Filter by attendant" value="{filter}">
    <button type="submit">Filter</button>
    <a href="/exportar_excel"><button type="button">Export to Excel</button></a>
</form>
<canvas id="ratingsChart"></canvas>
<table border="1" cellpadding="5" cellspacing="0">
    <tr>
        <th>Respondent</th>
        <th>Attendant</th>
        <th>Rating</th>
        <th>Comment</th>
        <th>Date/Time</th>
    </tr>
{rows}</table>
{script}"#,
        filter = escape(filter),
        rows = rows,
        script = CHART_SCRIPT,
    );

    layout("Feedback Report", &body)
}

pub fn error_page(title: &str, message: &str) -> String {
    let body = format!(
        "<h2>{}</h2>\n<p>{}</p>\n<a href=\"/\">Back</a>",
        escape(title),
        escape(message)
    );
    layout(title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeedbackId;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Ana" & 'Joe'</b>"#),
            "&lt;b&gt;&quot;Ana&quot; &amp; &#x27;Joe&#x27;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_report_page_renders_rows() {
        let records = vec![FeedbackRecord {
            id: FeedbackId(7),
            respondent_name: None,
            attendant_name: "Ana <script>".to_string(),
            rating: 4,
            comment: Some("ok".to_string()),
            timestamp: "2024-03-01 09:15:00".to_string(),
        }];

        let html = report_page("an\"", &records);
        assert!(html.contains("<td>Anonymous</td>"));
        assert!(html.contains("<td>Ana &lt;script&gt;</td>"));
        assert!(html.contains("value=\"an&quot;\""));
        assert!(html.contains("fetch('/grafico_dados')"));
    }

    #[test]
    fn test_form_page_banner() {
        assert!(!form_page(None).contains("class=\"error\""));
        assert!(form_page(Some("rating out of range")).contains("rating out of range"));
    }
}
