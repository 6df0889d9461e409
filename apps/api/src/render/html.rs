//! Server-rendered HTML for the single-page tool.
//!
//! Every piece of user or provider text goes through `escape`.

use std::fmt::Write;

use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::render::report::{ReportView, GAUGE_RADIUS};
use crate::statement::validation::StatementMetrics;

const STYLE: &str = r#"
body{margin:0;font-family:system-ui,sans-serif;background:#f8fafc;color:#111827}
header,footer{background:#fff;border-bottom:1px solid #e5e7eb;padding:1rem 2rem}
footer{border-top:1px solid #e5e7eb;border-bottom:none;text-align:center;font-size:.85rem;color:#6b7280;margin-top:3rem}
main{max-width:72rem;margin:0 auto;padding:2rem 1rem}
.card{background:#fff;border:1px solid #f3f4f6;border-radius:1rem;padding:1.5rem;margin-bottom:1.5rem;box-shadow:0 1px 2px rgba(0,0,0,.05)}
.grid{display:grid;gap:1rem;grid-template-columns:repeat(auto-fit,minmax(16rem,1fr))}
label{display:block;font-weight:600;margin-bottom:.5rem}
input,textarea{width:100%;box-sizing:border-box;padding:.6rem;border:1px solid #d1d5db;border-radius:.5rem;font:inherit}
textarea{height:24rem}
textarea.over{border:2px solid #ef4444;background:#fef2f2}
.counter{font-family:monospace;font-size:.8rem;color:#6b7280;float:right}
.counter.over{color:#dc2626;font-weight:700}
.alert{padding:.75rem;border-radius:.5rem;background:#fef2f2;color:#b91c1c;margin-top:1rem}
.warn{color:#dc2626;font-size:.9rem;margin-top:.5rem}
button{padding:.7rem 2rem;border:none;border-radius:999px;background:#2563eb;color:#fff;font-weight:600;cursor:pointer}
button:disabled{background:#9ca3af;cursor:not-allowed}
button.plain{background:#fff;color:#374151;border:1px solid #d1d5db;border-radius:.5rem}
.gauge{text-align:center}
.gauge .value{font-size:2.5rem;font-weight:700}
.tone-green{background:#f0fdf4;color:#15803d;border:1px solid #bbf7d0}
.tone-amber{background:#fefce8;color:#a16207;border:1px solid #fef08a}
.tone-red{background:#fef2f2;color:#b91c1c;border:1px solid #fecaca}
.pill{display:inline-block;padding:.3rem 1rem;border-radius:999px;font-size:.8rem;font-weight:700}
.note{font-size:.75rem;color:#6b7280;background:#f9fafb;padding:.75rem;border-radius:.5rem}
.tips{background:#fef9c3;border:1px solid #fde047}
.strengths{background:#f0fdf4}
.improvements{background:#fef2f2}
.highlights{margin-top:3rem;text-align:center}
.highlights p{font-size:.9rem;color:#4b5563}
@media print{.no-print{display:none!important}}
"#;

const HIGHLIGHTS: [(&str, &str); 3] = [
    ("Instant Feedback", "Get detailed analysis in seconds, not days."),
    ("Subject Specific", "Tailored advice for your specific degree course."),
    ("Admissions Criteria", "Evaluated against real UCAS selection standards."),
];

const COUNTER_SCRIPT: &str = r#"
(function(){
  var ta=document.getElementById('statement'),c=document.getElementById('counter'),b=document.getElementById('submit');
  if(!ta||!c||ta.disabled)return;
  ta.addEventListener('input',function(){
    var n=Array.from(ta.value).length,l=ta.value.split('\n').length,over=n>4000||l>47;
    c.textContent=n+'/4000 chars • '+l+'/47 lines';
    c.className='counter'+(over?' over':'');ta.className=over?'over':'';
    b.disabled=!ta.value.trim();
  });
})();
"#;

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, refresh_secs: Option<u32>, body: &str) -> String {
    let refresh = refresh_secs
        .map(|s| format!(r#"<meta http-equiv="refresh" content="{s}">"#))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}<title>{title} · UniStatement Tutor</title>
<style>{STYLE}</style>
</head>
<body>
<header class="no-print"><strong>UniStatement Tutor</strong></header>
<main>
{body}
</main>
<footer class="no-print">&copy; {year} UniStatement Tutor. Not affiliated with UCAS. Always verify advice with your school counselor.</footer>
</body>
</html>"#,
        title = escape(title),
        year = Utc::now().year(),
    )
}

/// Values echoed back into the input form.
#[derive(Debug, Default, Clone)]
pub struct FormView<'a> {
    pub subject: &'a str,
    pub university: &'a str,
    pub statement: &'a str,
    pub error: Option<&'a str>,
    pub analyzing: bool,
}

pub fn render_form_page(form: &FormView<'_>) -> String {
    let metrics = StatementMetrics::measure(form.statement);
    let over = if metrics.over_limit { " over" } else { "" };
    let disabled = if form.analyzing { " disabled" } else { "" };
    // The script re-enables the button as soon as something is typed.
    let submit_disabled = if form.analyzing || form.statement.trim().is_empty() {
        " disabled"
    } else {
        ""
    };

    let mut body = String::new();
    body.push_str(
        r#"<h1>Craft Your Future</h1>
<p>Paste your draft UCAS personal statement below to receive comprehensive feedback from an AI admissions tutor.</p>
<form class="card" method="post" action="/analyze">
<div class="grid">
"#,
    );
    let _ = write!(
        body,
        r#"<div><label for="subject">Course / Subject *</label><input id="subject" name="subject" type="text" placeholder="e.g. Computer Science, Law, Medicine" value="{}"{disabled}></div>
<div><label for="university">Target University (Optional)</label><input id="university" name="university" type="text" placeholder="e.g. Oxford, Manchester, Imperial" value="{}"{disabled}></div>
</div>
<p><label for="statement">Personal Statement Draft <span id="counter" class="counter{over}">{}</span></label>
<textarea id="statement" name="statement" class="{}" placeholder="Paste your personal statement here..." spellcheck="false"{disabled}>{}</textarea></p>
"#,
        escape(form.subject),
        escape(form.university),
        metrics.counter_label(),
        over.trim(),
        escape(form.statement),
    );
    if let Some(warning) = metrics.warning() {
        let _ = write!(body, r#"<p class="warn">{}</p>"#, escape(warning));
    }
    if let Some(error) = form.error {
        let _ = write!(body, r#"<div class="alert">{}</div>"#, escape(error));
    }
    let label = if form.analyzing {
        "Analyzing..."
    } else {
        "Analyze Statement"
    };
    let _ = write!(
        body,
        r#"<p><small><strong>Pro Tip:</strong> Focus on your academic interests more than extra-curriculars.</small>
<button id="submit" type="submit"{submit_disabled}>{label}</button></p>
</form>
<script>{COUNTER_SCRIPT}</script>"#
    );
    body.push_str(r#"<div class="grid highlights no-print">"#);
    for (title, text) in HIGHLIGHTS {
        let _ = write!(body, "<div><h3>{title}</h3><p>{text}</p></div>");
    }
    body.push_str("</div>");

    let refresh = form.analyzing.then_some(2);
    layout("Analyze your statement", refresh, &body)
}

fn bullet_list(class: &str, title: &str, items: &[String]) -> String {
    let mut out = format!(r#"<div class="card {class}"><h3>{}</h3><ul>"#, escape(title));
    for item in items {
        let _ = write!(out, "<li>{}</li>", escape(item));
    }
    out.push_str("</ul></div>");
    out
}

pub fn render_report_page(view: &ReportView, session_id: Uuid) -> String {
    let gauge = &view.gauge;
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<div class="no-print" style="display:flex;align-items:center;gap:1rem">
<form method="post" action="/sessions/{session_id}/reset"><button class="plain" type="submit" title="Analyze another statement">&larr;</button></form>
<div style="flex-grow:1"><h2>Analysis Report</h2><p>Review your personalized feedback below.</p></div>
<button class="plain" type="button" onclick="window.print()" title="Save report as PDF">Save as PDF</button>
</div>
<div class="grid">
<div>
<div class="card gauge"><h3>Overall Strength</h3>
<svg width="180" height="180" viewBox="0 0 180 180" role="img" aria-label="Score {score} out of 100">
<circle cx="90" cy="90" r="{r}" fill="none" stroke="{track}" stroke-width="20"/>
<circle cx="90" cy="90" r="{r}" fill="none" stroke="{color}" stroke-width="20" stroke-dasharray="{arc:.2} {circ:.2}" transform="rotate(-90 90 90)"/>
</svg>
<div class="value" style="color:{color}">{score}</div><small>OUT OF 100</small>
<p>{caption}</p></div>
<div class="card"><h3>Tutor Feedback</h3><p>{summary}</p></div>
<div class="card tips"><h3>Priority Actions</h3><ol>"#,
        score = gauge.score,
        r = GAUGE_RADIUS,
        track = gauge.track_color,
        color = gauge.color,
        arc = gauge.arc_length,
        circ = gauge.circumference,
        caption = escape(gauge.caption),
        summary = escape(&view.summary),
    );
    for tip in &view.tips {
        let _ = write!(
            body,
            r#"<li value="{}">{}</li>"#,
            tip.number,
            escape(&tip.text)
        );
    }
    body.push_str("</ol></div>\n</div>\n<div>");

    let banner = &view.originality;
    let _ = write!(
        body,
        r#"<div class="card"><h3>Originality &amp; Plagiarism Risk <span class="pill {tone}">{status}</span></h3>
<p>{feedback}</p><p class="note"><strong>Note:</strong> {note}</p></div>
<div class="grid">"#,
        tone = banner.tone.css_class(),
        status = escape(banner.status),
        feedback = escape(&banner.feedback),
        note = escape(banner.note),
    );
    for card in &view.categories {
        let _ = write!(
            body,
            r#"<div class="card"><h4>{}</h4><p>{}</p></div>"#,
            escape(card.title),
            escape(&card.body)
        );
    }
    body.push_str(r#"</div><div class="grid">"#);
    body.push_str(&bullet_list("strengths", "Key Strengths", &view.strengths));
    body.push_str(&bullet_list(
        "improvements",
        "Areas for Improvement",
        &view.improvements,
    ));
    let _ = write!(
        body,
        r#"</div>
<div class="card no-print" style="text-align:center"><p>Ready to improve your draft? Apply these changes and run the analysis again to see your score improve.</p>
<form method="post" action="/sessions/{session_id}/reset"><button class="plain" type="submit">Refine Another Draft</button></form></div>
</div>
</div>"#
    );

    layout("Analysis Report", None, &body)
}

pub fn render_error_page(message: &str, session_id: Uuid) -> String {
    let body = format!(
        r#"<div class="card" style="text-align:center;max-width:40rem;margin:0 auto">
<h2>Analysis Failed</h2>
<p>{}</p>
<form method="post" action="/sessions/{session_id}/reset"><button type="submit">Try Again</button></form>
</div>"#,
        escape(message)
    );
    layout("Analysis Failed", None, &body)
}
