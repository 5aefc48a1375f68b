//! HTML rendering for the single-page form.

use extractqa::pipeline::{AnswerOutcome, AnswerRequest};

/// Result block shown under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    fn class(&self) -> &'static str {
        match self {
            Notice::Success(_) => "notice success",
            Notice::Warning(_) => "notice warning",
            Notice::Error(_) => "notice error",
        }
    }

    fn text(&self) -> &str {
        match self {
            Notice::Success(t) | Notice::Warning(t) | Notice::Error(t) => t,
        }
    }
}

impl From<&AnswerOutcome> for Notice {
    fn from(outcome: &AnswerOutcome) -> Self {
        match outcome {
            AnswerOutcome::Answered { .. } => Notice::Success(outcome.message()),
            AnswerOutcome::ContextMissing | AnswerOutcome::QuestionMissing => {
                Notice::Warning(format!("⚠️ {}", outcome.message()))
            }
            AnswerOutcome::NoValidAnswer => Notice::Error(format!("❌ {}", outcome.message())),
        }
    }
}

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; background: #eef3f7; margin: 0; }
.layout { display: flex; gap: 24px; max-width: 1100px; margin: 0 auto; padding: 24px; }
aside { flex: 1; background: #fff; border-radius: 10px; padding: 16px; }
main { flex: 2; background: rgba(255, 255, 255, 0.9); border-radius: 10px; padding: 20px; }
h1 { text-align: center; color: #333; }
textarea, input[type=text] { width: 100%; box-sizing: border-box; border-radius: 10px; border: 2px solid #007BFF; padding: 8px; }
textarea { height: 180px; }
button { background: #007BFF; color: #fff; font-size: 18px; border: 0; border-radius: 10px; padding: 10px; width: 100%; margin-top: 12px; }
button:hover { background: #0056b3; }
.notice { border-radius: 8px; padding: 12px; margin-top: 16px; }
.success { background: #e3f6e8; }
.warning { background: #fff4d6; }
.error { background: #fde2e2; }
"#;

/// Renders the whole page with the submitted values and an optional notice.
pub fn render_page(request: &AnswerRequest, notice: Option<&Notice>) -> String {
    let result = match notice {
        Some(notice) => format!(
            "<h2>💡 Answer:</h2>\n<div class=\"{}\" id=\"result\">{}</div>",
            notice.class(),
            escape_html(notice.text())
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>BERT QA</title>
<style>{style}</style>
</head>
<body>
<div class="layout">
<main>
<h1>🤖 AI Question Answering with BERT 📝</h1>
<p>Enter a paragraph and ask a question. The model will pick the answer out of the paragraph.</p>
<form method="post" action="/">
<label for="context">📜 Enter a paragraph (context):</label>
<textarea id="context" name="context">{context}</textarea>
<label for="question">❓ Ask a question based on the paragraph:</label>
<input type="text" id="question" name="question" value="{question}">
<button type="submit">🚀 Get Answer</button>
</form>
{result}
</main>
<aside>
<h2>📌 How to Use</h2>
<ol>
<li>Enter a paragraph in the text box.</li>
<li>Type your question based on the paragraph.</li>
<li>Click <strong>Get Answer</strong> to see the result.</li>
</ol>
<p>Answers come from <code>{model_id}</code>, a BERT model fine-tuned on SQuAD.</p>
</aside>
</div>
</body>
</html>
"#,
        style = STYLE,
        context = escape_html(&request.context),
        question = escape_html(&request.question),
        result = result,
        model_id = extractqa::constants::MODEL_ID,
    )
}
