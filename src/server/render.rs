//! Minimal HTML view for the form endpoint.
//!
//! Styling is left to whoever fronts the service; this page carries the form, the
//! result table, the rollout trajectory and the error message.

use chrono::NaiveDate;

use crate::domain::{ColumnSet, DailyRow, ForecastKind, ForecastResult};
use crate::report::format_row;

/// What to show under the form.
pub enum Outcome<'a> {
    Result(&'a ForecastResult),
    Error(&'a str),
}

/// Collects the ticked checkboxes into the `crops` JSON array on submit.
const CROPS_SCRIPT: &str = r#"<script>
document.querySelector('form').addEventListener('submit', function () {
  var picked = Array.from(document.querySelectorAll('input.crop:checked')).map(function (el) { return el.value; });
  document.getElementById('crops').value = JSON.stringify(picked);
});
</script>
"#;

pub fn page(columns: &ColumnSet, default_date: Option<NaiveDate>, outcome: Option<Outcome<'_>>) -> String {
    let date = default_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
    // Re-tick whatever the last result showed; everything otherwise.
    let shown = match &outcome {
        Some(Outcome::Result(result)) => Some(&result.columns),
        _ => None,
    };

    let mut out = String::new();
    out.push_str("<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>Commodity price forecast</title></head>\n<body>\n");
    out.push_str("<h1>Commodity price forecast</h1>\n");
    out.push_str("<form method=\"post\" action=\"/\">\n");
    out.push_str(&format!(
        "<label>Date <input type=\"date\" name=\"future_date\" value=\"{}\"></label>\n",
        escape(&date)
    ));
    out.push_str("<fieldset>\n<legend>Commodities</legend>\n");
    for name in columns.iter() {
        let checked = shown.is_none_or(|cols| cols.index_of(name).is_some());
        out.push_str(&format!(
            "<label><input type=\"checkbox\" class=\"crop\" value=\"{}\"{}> {}</label>\n",
            escape(name),
            if checked { " checked" } else { "" },
            escape(name)
        ));
    }
    out.push_str("</fieldset>\n");
    // Left empty without scripting, which selects every column.
    out.push_str("<input type=\"hidden\" id=\"crops\" name=\"crops\" value=\"\">\n");
    out.push_str("<button type=\"submit\">Forecast</button>\n</form>\n");

    match outcome {
        Some(Outcome::Result(result)) => {
            out.push_str(&result_table(result));
            out.push_str(&trajectory_table(result));
        }
        Some(Outcome::Error(message)) => {
            out.push_str(&format!("<p class=\"error\">{}</p>\n", escape(message)));
        }
        None => {}
    }

    out.push_str(CROPS_SCRIPT);
    out.push_str("</body>\n</html>\n");
    out
}

fn result_table(result: &ForecastResult) -> String {
    let mut out = String::from("<section class=\"prediction-result\">\n");
    let heading = match result.kind {
        ForecastKind::History => "Historical values",
        ForecastKind::Forecast => "Forecast",
    };
    out.push_str(&format!("<h2>{heading}</h2>\n"));

    if result.is_empty() {
        out.push_str("<p>No data for the requested date.</p>\n</section>\n");
        return out;
    }

    out.push_str(&rows_table(&result.columns, &result.rows, result.decimals));
    out.push_str("</section>\n");
    out
}

/// Unadjusted daily predictions that led up to a rolled-out target.
fn trajectory_table(result: &ForecastResult) -> String {
    if result.trajectory.is_empty() {
        return String::new();
    }
    let mut out = String::from("<section class=\"trajectory\">\n");
    out.push_str(&format!("<h3>Daily rollout ({} steps)</h3>\n", result.steps));
    out.push_str(&rows_table(&result.columns, &result.trajectory, result.decimals));
    out.push_str("</section>\n");
    out
}

fn rows_table(columns: &ColumnSet, rows: &[DailyRow], decimals: usize) -> String {
    let mut out = String::from("<table>\n<tr><th>Date</th>");
    for name in columns.iter() {
        out.push_str(&format!("<th>{}</th>", escape(name)));
    }
    out.push_str("</tr>\n");

    for row in rows {
        out.push_str(&format!("<tr><td>{}</td>", row.date.format("%Y-%m-%d")));
        for value in format_row(row, decimals) {
            out.push_str(&format!("<td>{value}</td>"));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_carries_default_date_and_columns() {
        let html = page(&ColumnSet::default(), NaiveDate::from_ymd_opt(2024, 1, 10), None);
        assert!(html.contains("value=\"2024-01-10\""));
        assert!(html.contains("Atta (Wheat)"));
        assert_eq!(html.matches("type=\"checkbox\" class=\"crop\"").count(), 5);
        assert!(html.contains("value=\"Rice\" checked"));
        assert!(html.contains("name=\"crops\""));
    }

    #[test]
    fn rollout_renders_trajectory_and_ticks_shown_columns() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let result = ForecastResult {
            kind: ForecastKind::Forecast,
            columns: ColumnSet::new(["Wheat"]).unwrap(),
            decimals: 4,
            rows: vec![DailyRow {
                date: d(12),
                values: vec![30.5],
            }],
            trajectory: vec![
                DailyRow {
                    date: d(11),
                    values: vec![30.1],
                },
                DailyRow {
                    date: d(12),
                    values: vec![30.2],
                },
            ],
            steps: 2,
        };
        let html = page(&ColumnSet::default(), Some(d(10)), Some(Outcome::Result(&result)));

        assert!(html.contains("Daily rollout (2 steps)"));
        assert!(html.contains("<tr><td>2024-01-11</td><td>30.1000</td></tr>"));
        assert!(html.contains("<tr><td>2024-01-12</td><td>30.2000</td></tr>"));
        assert!(html.contains("value=\"Wheat\" checked"));
        assert!(!html.contains("value=\"Rice\" checked"));
    }

    #[test]
    fn errors_are_escaped() {
        let html = page(&ColumnSet::default(), None, Some(Outcome::Error("<b>bad</b>")));
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
    }

    #[test]
    fn result_rows_use_result_precision() {
        let result = ForecastResult {
            kind: ForecastKind::History,
            columns: ColumnSet::new(["Rice"]).unwrap(),
            decimals: 2,
            rows: vec![DailyRow {
                date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                values: vec![40.126],
            }],
            trajectory: Vec::new(),
            steps: 0,
        };
        let html = page(&result.columns, None, Some(Outcome::Result(&result)));
        assert!(html.contains("<td>40.13</td>"));
        assert!(html.contains("Historical values"));
    }
}
