use crate::server::api::{self, ApiError};
use crate::server::AppState;

pub struct HttpResponse {
    pub status_code: u16,
    pub content_type: &'static str,
    pub body: String,
}

pub fn route_request(state: &AppState, method: &str, path: &str, body: &str) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    let store = &state.store;

    match (method, path) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => json_result(api::health_payload()),
        ("GET", "/api/characters") => json_result(api::characters_payload(store)),
        ("GET", "/api/combos") => json_result(api::combos_payload(store)),
        ("GET", "/api/decks") => json_result(api::decks_payload(store)),
        ("POST", "/api/decks") => json_result(api::deck_post_payload(store, body)),
        ("POST", "/api/evaluate") => json_result(api::evaluate_payload(store, body)),
        (method, path) if path.starts_with("/api/decks/") => {
            let raw_id = path.trim_start_matches("/api/decks/").trim_end_matches('/');
            let Ok(id) = raw_id.parse::<u64>() else {
                return error_response(400, &format!("invalid deck id '{raw_id}'"));
            };
            match method {
                "GET" => json_result(api::deck_get_payload(store, id)),
                "PUT" => json_result(api::deck_put_payload(store, id, body)),
                _ => error_response(405, "Method not allowed"),
            }
        }
        _ => error_response(404, "Route not found"),
    }
}

fn json_result(result: Result<String, ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse {
            status_code: 200,
            content_type: "application/json",
            body: payload,
        },
        Err(ApiError::Validation(payload)) => validation_error_response(400, payload),
        Err(err @ ApiError::Parse(_)) => error_response(400, &err.to_string()),
        Err(err @ ApiError::DeckNotFound) => error_response(404, &err.to_string()),
        Err(err @ ApiError::Aggregate(_)) => error_response(422, &err.to_string()),
        Err(err @ ApiError::Store(_)) => {
            tracing::error!(error = %err, "data store failure");
            error_response(500, &err.to_string())
        }
    }
}

fn validation_error_response(status_code: u16, payload: api::ValidationErrorResponse) -> HttpResponse {
    let fallback =
        "{\n  \"status\": \"error\",\n  \"message\": \"Validation failed\"\n}".to_string();

    HttpResponse {
        status_code,
        content_type: "application/json",
        body: serde_json::to_string_pretty(&payload).unwrap_or(fallback),
    }
}

pub(crate) fn error_response(status_code: u16, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Bullpen Deck Console</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    input { width: 100%; padding: 8px; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 14px; }
    pre { background: #111; color: #aef2ae; padding: 12px; overflow: auto; border-radius: 6px; min-height: 180px; }
  </style>
</head>
<body>
  <h1>Bullpen Deck API</h1>

  <div class="card">
    <button id="characters-btn">GET /api/characters</button>
    <button id="combos-btn">GET /api/combos</button>
    <button id="decks-btn">GET /api/decks</button>
  </div>

  <div class="card">
    <strong>Evaluate</strong>
    <label for="members">Member ids (comma separated, up to 6)</label>
    <input id="members" value="1,2" />
    <div><button id="evaluate-btn">POST /api/evaluate</button></div>
  </div>

  <pre id="output">Ready.</pre>

  <script>
    const output = document.getElementById('output');

    async function request(path, options) {
      output.textContent = 'Loading...';
      const response = await fetch(path, options);
      output.textContent = 'HTTP ' + response.status + '\n' + await response.text();
    }

    document.getElementById('characters-btn').addEventListener('click', () => request('/api/characters'));
    document.getElementById('combos-btn').addEventListener('click', () => request('/api/combos'));
    document.getElementById('decks-btn').addEventListener('click', () => request('/api/decks'));

    document.getElementById('evaluate-btn').addEventListener('click', () => {
      const memberIds = document.getElementById('members').value
        .split(',')
        .map(s => s.trim())
        .filter(s => s.length > 0)
        .map(Number);
      request('/api/evaluate', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ member_ids: memberIds }),
      });
    });
  </script>
</body>
</html>
"#
    .to_string()
}
